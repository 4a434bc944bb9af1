use chrono::NaiveDate;

use crate::{FileEntry, FormInput, JobStatus, ListingId, PollGeneration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Binding layer is ready; the page loads the file list once.
    Started,
    /// User edited the form.
    FormChanged(FormInput),
    /// User submitted the current form.
    FormSubmitted,
    /// User clicked the quick-start button: both dates become `today`, then submit.
    QuickTodayClicked { today: NaiveDate },
    /// Start endpoint answered (or failed to).
    StartFinished(StartOutcome),
    /// One poll cycle produced a snapshot.
    StatusPolled {
        generation: PollGeneration,
        seq: u64,
        status: JobStatus,
    },
    /// One poll cycle failed in transport.
    StatusPollFailed {
        generation: PollGeneration,
        seq: u64,
        error: String,
    },
    /// User asked for a fresh file list.
    FilesRefreshClicked,
    /// Answer to the listing tagged `request`.
    FilesLoaded {
        request: ListingId,
        files: Vec<FileEntry>,
    },
    FilesFailed {
        request: ListingId,
        error: String,
    },
    /// User clicked the download action of the result panel.
    ResultDownloadClicked,
    /// User clicked the download link of a catalog entry.
    FileDownloadClicked { name: String },
    /// A download navigation finished; `Ok` carries the saved location.
    DownloadFinished {
        filename: String,
        result: Result<String, String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Accepted { message: String },
    /// Server answered with `success == false`.
    Rejected { message: String },
    /// The request never produced a usable answer.
    Failed { error: String },
}
