use crate::download::result_filename;
use crate::status::JobStatus;

/// Shown when a job finished without an artifact and without a message.
pub const NO_DATA_MESSAGE: &str = "No data was collected.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub message: String,
    /// File name offered by the download action; `None` hides the action.
    pub download: Option<String>,
}

/// Terminal outcome for the final snapshot of a job.
pub fn present_result(status: &JobStatus) -> ResultView {
    match status.result_file.as_deref() {
        Some(path) => ResultView {
            message: status.message.clone(),
            download: Some(result_filename(path).to_string()).filter(|name| !name.is_empty()),
        },
        None => ResultView {
            message: if status.message.is_empty() {
                NO_DATA_MESSAGE.to_string()
            } else {
                status.message.clone()
            },
            download: None,
        },
    }
}
