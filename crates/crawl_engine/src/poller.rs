//! Repeating job-status poll loop.
//!
//! One loop is active at a time. Each cycle awaits its response before the
//! next tick is taken, so responses from one loop are delivered in order.
//! Snapshots carry the loop's generation and a sequence number, letting the
//! receiver discard anything a superseded loop still delivers.

use std::sync::Arc;
use std::time::Duration;

use crawl_core::PollGeneration;
use crawl_logging::{crawl_debug, crawl_info, crawl_warn};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::client::{EventSink, JobApi};
use crate::EngineEvent;

struct ActivePoll {
    generation: PollGeneration,
    token: CancellationToken,
    task: JoinHandle<()>,
}

pub struct StatusPoller {
    api: Arc<dyn JobApi>,
    sink: Arc<dyn EventSink>,
    period: Duration,
    active: Option<ActivePoll>,
}

impl StatusPoller {
    pub fn new(api: Arc<dyn JobApi>, sink: Arc<dyn EventSink>, period: Duration) -> Self {
        Self {
            api,
            sink,
            period,
            active: None,
        }
    }

    /// Cancels any active loop, then arms a new one that fetches immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, generation: PollGeneration) {
        if let Some(previous) = self.cancel() {
            crawl_info!("Poll generation {} superseded by {}", previous, generation);
        }
        let token = CancellationToken::new();
        let task = tokio::spawn(poll_loop(
            self.api.clone(),
            self.sink.clone(),
            self.period,
            generation,
            token.clone(),
        ));
        self.active = Some(ActivePoll {
            generation,
            token,
            task,
        });
    }

    /// Cancels the loop only if it still belongs to `generation`.
    pub fn stop(&mut self, generation: PollGeneration) {
        if self.active_generation() == Some(generation) {
            self.cancel();
        }
    }

    /// Cancels the active loop, returning its generation.
    pub fn cancel(&mut self) -> Option<PollGeneration> {
        let active = self.active.take()?;
        active.token.cancel();
        Some(active.generation)
    }

    /// Generation of the armed loop, if any. A loop that ended on its own
    /// after observing completion is no longer reported.
    pub fn active_generation(&self) -> Option<PollGeneration> {
        self.active
            .as_ref()
            .filter(|active| !active.task.is_finished())
            .map(|active| active.generation)
    }

    pub fn is_active(&self) -> bool {
        self.active_generation().is_some()
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn poll_loop(
    api: Arc<dyn JobApi>,
    sink: Arc<dyn EventSink>,
    period: Duration,
    generation: PollGeneration,
    token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(period);
    // A slow response delays the schedule instead of bursting to catch up.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut seq: u64 = 0;

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        seq += 1;
        let result = api.job_status().await;
        if token.is_cancelled() {
            crawl_debug!("Dropping status for cancelled generation {}", generation);
            break;
        }

        match result {
            Ok(status) => {
                let complete = status.is_complete();
                crawl_debug!(
                    "Poll generation={} seq={} progress={}/{} running={}",
                    generation,
                    seq,
                    status.progress,
                    status.total,
                    status.is_running
                );
                sink.emit(EngineEvent::StatusPolled {
                    generation,
                    seq,
                    status,
                });
                if complete {
                    crawl_info!("Poll generation {} observed completion", generation);
                    break;
                }
            }
            Err(error) => {
                crawl_warn!(
                    "Poll generation={} seq={} failed: {}",
                    generation,
                    seq,
                    error
                );
                sink.emit(EngineEvent::StatusPollFailed {
                    generation,
                    seq,
                    error,
                });
            }
        }
    }
}
