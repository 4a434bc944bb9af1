use std::fmt;
use std::path::PathBuf;

use crawl_core::{FileEntry, JobStatus, ListingId, PollGeneration, StartResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    JobStarted(Result<StartResponse, ApiError>),
    StatusPolled {
        generation: PollGeneration,
        seq: u64,
        status: JobStatus,
    },
    StatusPollFailed {
        generation: PollGeneration,
        seq: u64,
        error: ApiError,
    },
    FilesListed {
        request: ListingId,
        result: Result<Vec<FileEntry>, ApiError>,
    },
    DownloadCompleted {
        filename: String,
        result: Result<PathBuf, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// The engine thread is gone; no further events will arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("engine thread has stopped")]
pub struct EngineStopped;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// Response body was not the expected JSON shape.
    Decode,
    /// Server answered with `success == false`.
    Rejected,
    /// Local filesystem failure while saving a download.
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Rejected => write!(f, "rejected by server"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
