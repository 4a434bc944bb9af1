use crate::{JobRequest, ListingId, PollGeneration};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Blocking user-facing notice.
    ShowNotice { message: String },
    SubmitJob { request: JobRequest },
    /// Arm the poll loop for `generation`, cancelling any other loop first.
    StartPolling { generation: PollGeneration },
    StopPolling { generation: PollGeneration },
    RefreshFiles { request: ListingId },
    Download { filename: String },
}
