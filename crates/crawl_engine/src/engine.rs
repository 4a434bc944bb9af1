use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use crawl_core::{JobRequest, ListingId, PollGeneration};
use crawl_logging::{crawl_error, crawl_info};

use crate::client::{ChannelEventSink, ClientSettings, EventSink, JobApi, ReqwestJobApi};
use crate::download::save_download;
use crate::poller::StatusPoller;
use crate::{ApiError, EngineEvent, EngineStopped};

enum EngineCommand {
    SubmitJob(JobRequest),
    StartPolling { generation: PollGeneration },
    StopPolling { generation: PollGeneration },
    ListFiles { request: ListingId },
    Download { filename: String, dir: PathBuf },
}

/// Owns the IO thread. Commands go in, [`EngineEvent`]s come out in arrival order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let api: Arc<dyn JobApi> = Arc::new(ReqwestJobApi::new(settings)?);
        Ok(Self::with_api(api, settings.poll_period))
    }

    pub fn with_api(api: Arc<dyn JobApi>, poll_period: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    crawl_error!("Could not start the engine runtime: {}", err);
                    return;
                }
            };
            let _guard = runtime.enter();
            let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
            let mut poller = StatusPoller::new(api.clone(), sink.clone(), poll_period);

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartPolling { generation } => poller.start(generation),
                    EngineCommand::StopPolling { generation } => poller.stop(generation),
                    other => {
                        let api = api.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            handle_command(api.as_ref(), other, sink.as_ref()).await;
                        });
                    }
                }
            }
            poller.cancel();
            crawl_info!("Engine command channel closed");
        });

        Self { cmd_tx, event_rx }
    }

    pub fn submit_job(&self, request: JobRequest) {
        let _ = self.cmd_tx.send(EngineCommand::SubmitJob(request));
    }

    pub fn start_polling(&self, generation: PollGeneration) {
        let _ = self.cmd_tx.send(EngineCommand::StartPolling { generation });
    }

    pub fn stop_polling(&self, generation: PollGeneration) {
        let _ = self.cmd_tx.send(EngineCommand::StopPolling { generation });
    }

    pub fn list_files(&self, request: ListingId) {
        let _ = self.cmd_tx.send(EngineCommand::ListFiles { request });
    }

    pub fn download(&self, filename: impl Into<String>, dir: impl Into<PathBuf>) {
        let _ = self.cmd_tx.send(EngineCommand::Download {
            filename: filename.into(),
            dir: dir.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Waits up to `timeout`. `Ok(None)` means nothing arrived in time.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineStopped),
        }
    }
}

async fn handle_command(api: &dyn JobApi, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::SubmitJob(request) => {
            let result = api.start_job(&request).await;
            sink.emit(EngineEvent::JobStarted(result));
        }
        EngineCommand::ListFiles { request } => {
            let result = api.list_files().await;
            sink.emit(EngineEvent::FilesListed { request, result });
        }
        EngineCommand::Download { filename, dir } => {
            let result = save_download(api, &filename, &dir).await;
            sink.emit(EngineEvent::DownloadCompleted { filename, result });
        }
        // Poll commands are handled on the engine thread.
        EngineCommand::StartPolling { .. } | EngineCommand::StopPolling { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_engine_thread_is_reported() {
        let (cmd_tx, _cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let engine = EngineHandle { cmd_tx, event_rx };

        assert_eq!(engine.recv_timeout(Duration::from_millis(10)), Ok(None));

        drop(event_tx);
        assert_eq!(
            engine.recv_timeout(Duration::from_millis(10)),
            Err(EngineStopped)
        );
    }
}
