use crate::catalog::{CatalogState, ListingId};
use crate::estimate::estimate_for_form;
use crate::progress::render_progress;
use crate::result::{present_result, ResultView};
use crate::session::JobSession;
use crate::view_model::{AppViewModel, FormView};
use crate::{FormInput, JobStatus};

/// Where the launch controls are in the job lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchState {
    /// Controls enabled, no job owned by this client.
    #[default]
    Ready,
    /// Start request in flight; further submissions are ignored.
    Submitting,
    /// Job accepted; controls disabled until terminal detection.
    Running,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    form: FormInput,
    estimate: Option<u32>,
    launch: LaunchState,
    progress_visible: bool,
    last_status: Option<JobStatus>,
    result: Option<ResultView>,
    session: JobSession,
    catalog: CatalogState,
    latest_listing: ListingId,
    pending_downloads: usize,
    last_download: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let progress = self.progress_visible.then(|| {
            render_progress(self.last_status.as_ref().unwrap_or(&JobStatus::default()))
        });
        AppViewModel {
            form: FormView {
                input: self.form.clone(),
                estimated_count: self.estimate,
                sheets_url_visible: self.form.google_sheets,
            },
            controls_enabled: self.launch == LaunchState::Ready,
            progress,
            result: self.result.clone(),
            catalog: self.catalog.view(),
            last_download: self.last_download.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Nothing is in flight: no start request, no poll loop, no listing, no download.
    pub fn is_settled(&self) -> bool {
        self.launch == LaunchState::Ready
            && !self.session.is_polling()
            && !self.catalog.is_loading()
            && self.pending_downloads == 0
    }

    pub fn launch(&self) -> LaunchState {
        self.launch
    }

    pub fn session(&self) -> &JobSession {
        &self.session
    }

    pub fn form(&self) -> &FormInput {
        &self.form
    }

    pub(crate) fn set_form(&mut self, form: FormInput) {
        self.estimate = estimate_for_form(&form);
        self.form = form;
        self.mark_dirty();
    }

    pub(crate) fn estimate(&self) -> Option<u32> {
        self.estimate
    }

    pub(crate) fn begin_submit(&mut self) {
        self.launch = LaunchState::Submitting;
    }

    pub(crate) fn abort_submit(&mut self) {
        self.launch = LaunchState::Ready;
    }

    pub(crate) fn session_mut(&mut self) -> &mut JobSession {
        &mut self.session
    }

    /// Launch accepted: disable controls, show progress, hide the old result.
    pub(crate) fn enter_running(&mut self) {
        self.launch = LaunchState::Running;
        self.progress_visible = true;
        self.last_status = None;
        self.result = None;
        self.session.reset();
        self.mark_dirty();
    }

    pub(crate) fn apply_status(&mut self, status: JobStatus) {
        if let Some(path) = status.result_file.as_deref() {
            self.session.record_result_path(path);
        }
        self.last_status = Some(status);
        self.mark_dirty();
    }

    /// Terminal detection on the last applied snapshot.
    pub(crate) fn finish_job(&mut self) {
        let result = self.last_status.as_ref().map(present_result);
        self.launch = LaunchState::Ready;
        self.result = result;
        self.mark_dirty();
    }

    /// Supersedes any outstanding listing and shows the loading state.
    pub(crate) fn begin_listing(&mut self) -> ListingId {
        self.latest_listing += 1;
        self.catalog = CatalogState::Loading;
        self.mark_dirty();
        self.latest_listing
    }

    /// Applies the answer to `request`. Answers to superseded requests are refused.
    pub(crate) fn finish_listing(&mut self, request: ListingId, catalog: CatalogState) -> bool {
        if request != self.latest_listing {
            return false;
        }
        self.catalog = catalog;
        self.mark_dirty();
        true
    }

    pub(crate) fn begin_download(&mut self) {
        self.pending_downloads += 1;
    }

    pub(crate) fn end_download(&mut self, saved_to: Option<String>) {
        self.pending_downloads = self.pending_downloads.saturating_sub(1);
        if saved_to.is_some() {
            self.last_download = saved_to;
            self.mark_dirty();
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
