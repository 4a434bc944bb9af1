use crawl_logging::{crawl_debug, crawl_info, crawl_warn};

use crate::catalog::CatalogState;
use crate::download::result_filename;
use crate::form::validate;
use crate::{AppState, Effect, LaunchState, Msg, StartOutcome};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => request_catalog(&mut state),
        Msg::FormChanged(form) => {
            state.set_form(form);
            if let Some(count) = state.estimate() {
                crawl_info!("Estimated crawl units: {}", count);
            }
            Vec::new()
        }
        Msg::FormSubmitted => submit(&mut state),
        Msg::QuickTodayClicked { today } => {
            if state.launch() != LaunchState::Ready {
                return (state, Vec::new());
            }
            let mut form = state.form().clone();
            form.set_dates(today, today);
            state.set_form(form);
            submit(&mut state)
        }
        Msg::StartFinished(outcome) => apply_start_outcome(&mut state, outcome),
        Msg::StatusPolled {
            generation,
            seq,
            status,
        } => {
            if !state.session_mut().accept(generation, seq) {
                crawl_debug!(
                    "Discarding stale status generation={} seq={}",
                    generation,
                    seq
                );
                return (state, Vec::new());
            }

            let complete = status.is_complete();
            state.apply_status(status);
            if complete {
                crawl_info!("Job complete (generation={} seq={})", generation, seq);
                state.session_mut().complete();
                state.finish_job();
                let mut effects = vec![Effect::StopPolling { generation }];
                effects.extend(request_catalog(&mut state));
                effects
            } else {
                Vec::new()
            }
        }
        Msg::StatusPollFailed {
            generation,
            seq,
            error,
        } => {
            crawl_warn!(
                "Status poll failed generation={} seq={}: {}",
                generation,
                seq,
                error
            );
            Vec::new()
        }
        Msg::FilesRefreshClicked => request_catalog(&mut state),
        Msg::FilesLoaded { request, files } => {
            let count = files.len();
            if state.finish_listing(request, CatalogState::from_listing(files)) {
                crawl_info!("File list loaded: {} entries", count);
            } else {
                crawl_debug!("Discarding superseded file list {}", request);
            }
            Vec::new()
        }
        Msg::FilesFailed { request, error } => {
            if state.finish_listing(request, CatalogState::Error(error.clone())) {
                crawl_warn!("File list failed: {}", error);
            } else {
                crawl_debug!("Discarding superseded file list failure {}", request);
            }
            Vec::new()
        }
        Msg::ResultDownloadClicked => {
            let filename = state
                .session()
                .result_path()
                .map(result_filename)
                .filter(|name| !name.is_empty())
                .map(str::to_string);
            match filename {
                Some(filename) => download(&mut state, filename),
                None => Vec::new(),
            }
        }
        Msg::FileDownloadClicked { name } => download(&mut state, name),
        Msg::DownloadFinished { filename, result } => match result {
            Ok(saved_to) => {
                crawl_info!("Downloaded {} to {}", filename, saved_to);
                state.end_download(Some(saved_to));
                Vec::new()
            }
            Err(error) => {
                state.end_download(None);
                vec![Effect::ShowNotice {
                    message: format!("Could not download {filename}: {error}"),
                }]
            }
        },
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    if state.launch() != LaunchState::Ready {
        crawl_debug!("Ignoring submission while {:?}", state.launch());
        return Vec::new();
    }
    match validate(state.form()) {
        Ok(request) => {
            crawl_info!(
                "Submitting job {} to {} ({})",
                request.start_date,
                request.end_date,
                request.mode
            );
            state.begin_submit();
            vec![Effect::SubmitJob { request }]
        }
        Err(err) => vec![Effect::ShowNotice {
            message: err.to_string(),
        }],
    }
}

fn apply_start_outcome(state: &mut AppState, outcome: StartOutcome) -> Vec<Effect> {
    if state.launch() != LaunchState::Submitting {
        crawl_warn!("Unexpected start outcome while {:?}", state.launch());
        return Vec::new();
    }
    match outcome {
        StartOutcome::Accepted { message } => {
            crawl_info!("Job accepted: {}", message);
            state.enter_running();
            let generation = state.session_mut().start();
            vec![Effect::StartPolling { generation }]
        }
        StartOutcome::Rejected { message } => {
            crawl_info!("Job rejected: {}", message);
            state.abort_submit();
            vec![Effect::ShowNotice { message }]
        }
        StartOutcome::Failed { error } => {
            crawl_warn!("Job start failed: {}", error);
            state.abort_submit();
            vec![Effect::ShowNotice {
                message: format!("An error occurred while starting the crawl: {error}"),
            }]
        }
    }
}

fn request_catalog(state: &mut AppState) -> Vec<Effect> {
    let request = state.begin_listing();
    vec![Effect::RefreshFiles { request }]
}

fn download(state: &mut AppState, filename: String) -> Vec<Effect> {
    state.begin_download();
    vec![Effect::Download { filename }]
}
