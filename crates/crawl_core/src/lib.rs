//! Crawl controller core: pure job-lifecycle state machine and view-model helpers.
mod catalog;
mod download;
mod effect;
mod estimate;
mod form;
mod msg;
mod progress;
mod result;
mod session;
mod state;
mod status;
mod update;
mod view_model;

pub use catalog::{
    format_size_kb, CatalogState, CatalogView, FileRowView, ListingId, FILES_ERROR_MESSAGE,
    LOADING_FILES_MESSAGE, NO_FILES_MESSAGE,
};
pub use download::{result_filename, DOWNLOAD_ROUTE};
pub use effect::Effect;
pub use estimate::{estimate_count, estimate_for_form};
pub use form::{
    parse_optional_date, validate, CadenceMode, FormInput, JobRequest, OutputFormat,
    ValidationError, DATE_FORMAT,
};
pub use msg::{Msg, StartOutcome};
pub use progress::{percent, render_progress, ProgressView, CURRENT_DATE_PLACEHOLDER};
pub use result::{present_result, ResultView, NO_DATA_MESSAGE};
pub use session::{JobSession, PollGeneration, PollState};
pub use state::{AppState, LaunchState};
pub use status::{FileEntry, JobStatus, StartResponse};
pub use update::update;
pub use view_model::{AppViewModel, FormView};
