//! Crawl engine: HTTP calls, the status poll loop and effect execution.
mod client;
mod download;
mod engine;
mod persist;
mod poller;
mod types;

pub use client::{
    download_url, endpoint_url, ChannelEventSink, ClientSettings, EventSink, JobApi,
    ReqwestJobApi,
};
pub use download::save_download;
pub use engine::EngineHandle;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use poller::StatusPoller;
pub use types::{ApiError, EngineEvent, EngineStopped, FailureKind};
