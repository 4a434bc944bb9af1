use std::path::PathBuf;
use std::time::Duration;

use crawl_core::{Effect, Msg, StartOutcome};
use crawl_engine::{ClientSettings, EngineEvent, EngineHandle, EngineStopped};
use crawl_logging::{crawl_info, crawl_warn};

/// Executes engine-bound effects and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    download_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(settings: &ClientSettings, download_dir: PathBuf) -> anyhow::Result<Self> {
        let engine = EngineHandle::new(settings)?;
        Ok(Self {
            engine,
            download_dir,
        })
    }

    /// Runs one effect. Notices are left to the caller and returned unchanged.
    pub fn run(&self, effect: Effect) -> Option<String> {
        match effect {
            Effect::ShowNotice { message } => return Some(message),
            Effect::SubmitJob { request } => {
                crawl_info!(
                    "SubmitJob {}..{} mode={} format={:?}",
                    request.start_date,
                    request.end_date,
                    request.mode,
                    request.output_format
                );
                self.engine.submit_job(request);
            }
            Effect::StartPolling { generation } => self.engine.start_polling(generation),
            Effect::StopPolling { generation } => self.engine.stop_polling(generation),
            Effect::RefreshFiles { request } => self.engine.list_files(request),
            Effect::Download { filename } => {
                self.engine.download(filename, self.download_dir.clone());
            }
        }
        None
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineStopped> {
        Ok(self.engine.recv_timeout(timeout)?.map(map_event))
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::JobStarted(Ok(answer)) if answer.success => {
            Msg::StartFinished(StartOutcome::Accepted {
                message: answer.message,
            })
        }
        EngineEvent::JobStarted(Ok(answer)) => Msg::StartFinished(StartOutcome::Rejected {
            message: answer.message,
        }),
        EngineEvent::JobStarted(Err(err)) => {
            crawl_warn!("Start request failed: {}", err);
            Msg::StartFinished(StartOutcome::Failed {
                error: err.message,
            })
        }
        EngineEvent::StatusPolled {
            generation,
            seq,
            status,
        } => Msg::StatusPolled {
            generation,
            seq,
            status,
        },
        EngineEvent::StatusPollFailed {
            generation,
            seq,
            error,
        } => Msg::StatusPollFailed {
            generation,
            seq,
            error: error.to_string(),
        },
        EngineEvent::FilesListed {
            request,
            result: Ok(files),
        } => Msg::FilesLoaded { request, files },
        EngineEvent::FilesListed {
            request,
            result: Err(err),
        } => Msg::FilesFailed {
            request,
            error: err.to_string(),
        },
        EngineEvent::DownloadCompleted { filename, result } => Msg::DownloadFinished {
            filename,
            result: result
                .map(|path| path.display().to_string())
                .map_err(|err| err.to_string()),
        },
    }
}
