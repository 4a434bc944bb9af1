use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use crawl_core::{FileEntry, JobRequest, JobStatus, StartResponse};
use crawl_engine::{ApiError, EngineEvent, EventSink, FailureKind, JobApi, StatusPoller};

/// Scripted status source. The last scripted answer repeats forever.
struct ScriptedApi {
    script: Mutex<VecDeque<Result<JobStatus, ApiError>>>,
    last: Mutex<Option<Result<JobStatus, ApiError>>>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedApi {
    fn new(script: Vec<Result<JobStatus, ApiError>>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            delay,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_answer(&self) -> Result<JobStatus, ApiError> {
        let mut script = self.script.lock().unwrap();
        let mut last = self.last.lock().unwrap();
        if let Some(answer) = script.pop_front() {
            *last = Some(answer);
        }
        last.clone().expect("script must not be empty")
    }
}

#[async_trait]
impl JobApi for ScriptedApi {
    async fn start_job(&self, _request: &JobRequest) -> Result<StartResponse, ApiError> {
        unimplemented!("not used by the poller")
    }

    async fn job_status(&self) -> Result<JobStatus, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        let answer = self.next_answer();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        answer
    }

    async fn list_files(&self) -> Result<Vec<FileEntry>, ApiError> {
        unimplemented!("not used by the poller")
    }

    async fn download(&self, _filename: &str) -> Result<Bytes, ApiError> {
        unimplemented!("not used by the poller")
    }
}

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    fn snapshot(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn running(progress: u32) -> Result<JobStatus, ApiError> {
    Ok(JobStatus {
        is_running: true,
        progress,
        total: 5,
        current_date: None,
        message: "crawling".to_string(),
        result_file: None,
    })
}

fn done() -> Result<JobStatus, ApiError> {
    Ok(JobStatus {
        is_running: false,
        progress: 5,
        total: 5,
        current_date: None,
        message: "Done".to_string(),
        result_file: Some("output/r.csv".to_string()),
    })
}

fn not_started() -> Result<JobStatus, ApiError> {
    Ok(JobStatus::default())
}

fn transport_error() -> Result<JobStatus, ApiError> {
    Err(ApiError {
        kind: FailureKind::Network,
        message: "connection reset".to_string(),
    })
}

/// Polls `sink` until `pred` holds or five seconds pass.
async fn wait_for(sink: &TestSink, pred: impl Fn(&[EngineEvent]) -> bool) -> Vec<EngineEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let events = sink.snapshot();
        if pred(&events) {
            return events;
        }
        assert!(Instant::now() < deadline, "timed out; events: {events:?}");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

fn saw_completion(events: &[EngineEvent]) -> bool {
    events.iter().any(|event| {
        matches!(event, EngineEvent::StatusPolled { status, .. } if status.is_complete())
    })
}

fn events_of(events: &[EngineEvent], wanted: u64) -> usize {
    events
        .iter()
        .filter(|event| match event {
            EngineEvent::StatusPolled { generation, .. }
            | EngineEvent::StatusPollFailed { generation, .. } => *generation == wanted,
            _ => false,
        })
        .count()
}

fn poller(api: Arc<ScriptedApi>, sink: Arc<TestSink>, period: Duration) -> StatusPoller {
    StatusPoller::new(api, sink, period)
}

#[tokio::test(flavor = "multi_thread")]
async fn first_fetch_is_immediate_and_completion_ends_the_loop() {
    let api = ScriptedApi::new(vec![done()], Duration::ZERO);
    let sink = Arc::new(TestSink::default());
    // A period far beyond the test timeout proves the first fetch does not wait for a tick.
    let mut poller = poller(api.clone(), sink.clone(), Duration::from_secs(3600));

    poller.start(1);
    let events = wait_for(&sink, saw_completion).await;

    assert_eq!(events.len(), 1);
    let EngineEvent::StatusPolled {
        generation, seq, ..
    } = &events[0]
    else {
        panic!("expected a snapshot, got {events:?}");
    };
    assert_eq!((*generation, *seq), (1, 1));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!poller.is_active());
    assert_eq!(api.calls(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn transport_failures_do_not_stop_polling() {
    let api = ScriptedApi::new(
        vec![running(1), transport_error(), running(3), done()],
        Duration::ZERO,
    );
    let sink = Arc::new(TestSink::default());
    let mut poller = poller(api.clone(), sink.clone(), Duration::from_millis(10));

    poller.start(4);
    let events = wait_for(&sink, saw_completion).await;

    let seqs: Vec<u64> = events
        .iter()
        .map(|event| match event {
            EngineEvent::StatusPolled { seq, .. } | EngineEvent::StatusPollFailed { seq, .. } => {
                *seq
            }
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(seqs, vec![1, 2, 3, 4]);
    assert!(matches!(
        events[1],
        EngineEvent::StatusPollFailed { generation: 4, .. }
    ));

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(api.calls(), 4);
    assert_eq!(sink.snapshot().len(), 4);
}

#[tokio::test(flavor = "multi_thread")]
async fn pre_start_snapshot_keeps_polling() {
    let api = ScriptedApi::new(vec![not_started(), not_started(), done()], Duration::ZERO);
    let sink = Arc::new(TestSink::default());
    let mut poller = poller(api.clone(), sink.clone(), Duration::from_millis(10));

    poller.start(1);
    let events = wait_for(&sink, saw_completion).await;
    assert_eq!(events.len(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn restart_cancels_the_previous_loop() {
    let api = ScriptedApi::new(vec![running(1)], Duration::ZERO);
    let sink = Arc::new(TestSink::default());
    let mut poller = poller(api.clone(), sink.clone(), Duration::from_millis(10));

    poller.start(1);
    wait_for(&sink, |events| events_of(events, 1) >= 2).await;

    poller.start(2);
    assert_eq!(poller.active_generation(), Some(2));
    let events = wait_for(&sink, |events| events_of(events, 2) >= 3).await;
    let first_generation_events = events_of(&events, 1);

    tokio::time::sleep(Duration::from_millis(60)).await;
    let events = sink.snapshot();
    assert_eq!(events_of(&events, 1), first_generation_events);
    assert!(events_of(&events, 2) > 3);
    poller.cancel();
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_ignores_other_generations() {
    let api = ScriptedApi::new(vec![running(1)], Duration::ZERO);
    let sink = Arc::new(TestSink::default());
    let mut poller = poller(api, sink, Duration::from_millis(10));

    poller.start(3);
    poller.stop(2);
    assert_eq!(poller.active_generation(), Some(3));

    poller.stop(3);
    assert!(!poller.is_active());
    assert_eq!(poller.cancel(), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_responses_never_overlap() {
    // Each response takes five periods; a timer-driven design would stack requests.
    let api = ScriptedApi::new(vec![running(1)], Duration::from_millis(50));
    let sink = Arc::new(TestSink::default());
    let mut poller = poller(api.clone(), sink.clone(), Duration::from_millis(10));

    poller.start(1);
    wait_for(&sink, |events| events.len() >= 4).await;
    poller.cancel();

    assert_eq!(api.max_in_flight.load(Ordering::SeqCst), 1);
    let seqs: Vec<u64> = sink
        .snapshot()
        .iter()
        .filter_map(|event| match event {
            EngineEvent::StatusPolled { seq, .. } => Some(*seq),
            _ => None,
        })
        .collect();
    assert!(seqs.windows(2).all(|pair| pair[0] < pair[1]));
}
