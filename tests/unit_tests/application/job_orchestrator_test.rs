use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};

use callsheet::application::ports::{JobStore, StrategySet};
use callsheet::application::services::{
    BatchFile, BatchPayload, CancelOutcome, CancellationRegistry, ExtractionPipeline,
    ExtractionWorker, JobOrchestrator, JobWatchers, RoutingPolicy, RoutingRules, SharedQueue,
    SinglePayload, SubmitError,
};
use callsheet::domain::{
    BatchItemOutcome, ErrorKind, ExtractionFailure, ExtractionOptions, JobId, JobKind, JobPriority,
    JobResult, JobStatus, MimeKind, RawContact, StrategyKind,
};
use callsheet::infrastructure::cache::MemoryResultCache;
use callsheet::infrastructure::ingest::MockIngestor;
use callsheet::infrastructure::jobs::MemoryJobStore;
use callsheet::infrastructure::strategies::MockStrategy;

const TEST_SYNC_WAIT: Duration = Duration::from_secs(5);
const TEST_TEXT: &str = "crew roster text";

struct Harness {
    orchestrator: JobOrchestrator,
    store: Arc<dyn JobStore>,
    _high_rx: SharedQueue,
    _normal_rx: SharedQueue,
}

fn test_pipeline(
    pattern: MockStrategy,
    model: MockStrategy,
) -> Arc<ExtractionPipeline<MockIngestor>> {
    Arc::new(ExtractionPipeline::new(
        Arc::new(MockIngestor::returning(TEST_TEXT)),
        StrategySet::new(Arc::new(pattern), Arc::new(model)),
        Arc::new(MemoryResultCache::new(16, Duration::from_secs(60))),
        RoutingPolicy::new(RoutingRules::default()),
        Duration::from_secs(5),
    ))
}

fn harness(
    workers: usize,
    queue_capacity: usize,
    pattern: MockStrategy,
    model: MockStrategy,
) -> Harness {
    let store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
    let watchers = Arc::new(JobWatchers::new());
    let cancellations = Arc::new(CancellationRegistry::new());
    let (high_tx, high_rx) = mpsc::channel(queue_capacity);
    let (normal_tx, normal_rx) = mpsc::channel(queue_capacity);
    let high_rx: SharedQueue = Arc::new(Mutex::new(high_rx));
    let normal_rx: SharedQueue = Arc::new(Mutex::new(normal_rx));

    let pipeline = test_pipeline(pattern, model);
    for id in 0..workers {
        let worker = ExtractionWorker::new(
            id,
            Arc::clone(&high_rx),
            Arc::clone(&normal_rx),
            Arc::clone(&pipeline),
            Arc::clone(&store),
            Arc::clone(&watchers),
            Arc::clone(&cancellations),
        );
        tokio::spawn(worker.run());
    }

    let orchestrator = JobOrchestrator::new(
        Arc::clone(&store),
        high_tx,
        normal_tx,
        watchers,
        cancellations,
        TEST_SYNC_WAIT,
    );
    Harness {
        orchestrator,
        store,
        _high_rx: high_rx,
        _normal_rx: normal_rx,
    }
}

fn payload(data: &[u8], options: ExtractionOptions) -> SinglePayload {
    SinglePayload {
        filename: "sheet.pdf".to_string(),
        data: data.to_vec(),
        mime: MimeKind::Text,
        options,
    }
}

fn force_pattern(priority: JobPriority) -> ExtractionOptions {
    ExtractionOptions::new(Some(StrategyKind::Pattern), priority)
}

fn jane() -> RawContact {
    RawContact::new("Jane Doe", StrategyKind::Pattern, 0.85)
        .with_role("Director")
        .with_email("jane@apex.com")
        .with_phone("+1 555 010 0100")
}

#[tokio::test]
async fn given_submitted_job_when_worker_finishes_then_completed_with_contacts() {
    let harness = harness(
        1,
        8,
        MockStrategy::returning(StrategyKind::Pattern, vec![jane()]),
        MockStrategy::empty(StrategyKind::Model),
    );

    let job_id = harness
        .orchestrator
        .submit_single(payload(b"doc one", force_pattern(JobPriority::Normal)))
        .await
        .unwrap();
    let job = harness
        .orchestrator
        .wait_for_terminal(job_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.progress, 100);
    assert!(job.started_at.is_some());
    assert!(job.finished_at.is_some());
    let Some(JobResult::Contacts {
        candidates,
        from_cache,
    }) = job.result
    else {
        panic!("expected a contacts result");
    };
    assert!(!from_cache);
    assert_eq!(candidates[0].name, "Jane Doe");
}

#[tokio::test]
async fn given_queued_backlog_when_worker_starts_then_high_priority_runs_first() {
    let store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
    let watchers = Arc::new(JobWatchers::new());
    let cancellations = Arc::new(CancellationRegistry::new());
    let (high_tx, high_rx) = mpsc::channel(8);
    let (normal_tx, normal_rx) = mpsc::channel(8);
    let high_rx: SharedQueue = Arc::new(Mutex::new(high_rx));
    let normal_rx: SharedQueue = Arc::new(Mutex::new(normal_rx));
    let orchestrator = JobOrchestrator::new(
        Arc::clone(&store),
        high_tx,
        normal_tx,
        Arc::clone(&watchers),
        Arc::clone(&cancellations),
        TEST_SYNC_WAIT,
    );

    let normal_id = orchestrator
        .submit_single(payload(b"normal priority doc", force_pattern(JobPriority::Normal)))
        .await
        .unwrap();
    let high_id = orchestrator
        .submit_single(payload(b"high priority doc", force_pattern(JobPriority::High)))
        .await
        .unwrap();
    let pipeline = test_pipeline(
        MockStrategy::returning(StrategyKind::Pattern, vec![jane()])
            .with_delay(Duration::from_millis(25)),
        MockStrategy::empty(StrategyKind::Model),
    );
    tokio::spawn(
        ExtractionWorker::new(
            0,
            Arc::clone(&high_rx),
            Arc::clone(&normal_rx),
            pipeline,
            Arc::clone(&store),
            Arc::clone(&watchers),
            Arc::clone(&cancellations),
        )
        .run(),
    );

    let high = orchestrator
        .wait_for_terminal(high_id)
        .await
        .unwrap()
        .unwrap();
    let normal = orchestrator
        .wait_for_terminal(normal_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(high.status, JobStatus::Completed);
    assert_eq!(normal.status, JobStatus::Completed);
    assert!(normal.started_at.unwrap() >= high.finished_at.unwrap());
}

#[tokio::test]
async fn given_full_queue_when_submitting_then_rejected_and_not_stored() {
    let harness = harness(
        0,
        1,
        MockStrategy::empty(StrategyKind::Pattern),
        MockStrategy::empty(StrategyKind::Model),
    );

    let first = harness
        .orchestrator
        .submit_single(payload(b"first doc", force_pattern(JobPriority::Normal)))
        .await
        .unwrap();
    let second = harness
        .orchestrator
        .submit_single(payload(b"second doc", force_pattern(JobPriority::Normal)))
        .await;

    assert!(matches!(second, Err(SubmitError::QueueFull)));
    let stored = harness.store.get(first).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Queued);
}

#[tokio::test]
async fn given_closed_queues_when_submitting_then_workers_unavailable() {
    let store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
    let (high_tx, high_rx) = mpsc::channel(8);
    let (normal_tx, normal_rx) = mpsc::channel(8);
    drop(high_rx);
    drop(normal_rx);
    let orchestrator = JobOrchestrator::new(
        store,
        high_tx,
        normal_tx,
        Arc::new(JobWatchers::new()),
        Arc::new(CancellationRegistry::new()),
        TEST_SYNC_WAIT,
    );

    let result = orchestrator
        .submit_single(payload(b"doc", ExtractionOptions::default()))
        .await;

    assert!(matches!(result, Err(SubmitError::WorkersUnavailable)));
}

#[tokio::test]
async fn given_queued_job_when_cancelled_then_failed_before_start() {
    let harness = harness(
        0,
        8,
        MockStrategy::empty(StrategyKind::Pattern),
        MockStrategy::empty(StrategyKind::Model),
    );
    let job_id = harness
        .orchestrator
        .submit_single(payload(b"queued doc", force_pattern(JobPriority::Normal)))
        .await
        .unwrap();

    let outcome = harness.orchestrator.cancel(job_id).await.unwrap();

    assert_eq!(outcome, CancelOutcome::Cancelled);
    let job = harness.store.get(job_id).await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.started_at.is_none());
    let error = job.error.unwrap();
    assert_eq!(error.kind, ErrorKind::JobCancelled);
    assert_eq!(error.reason, "cancelled before start");
}

#[tokio::test]
async fn given_running_job_when_cancelled_then_fails_with_cancellation() {
    let harness = harness(
        1,
        8,
        MockStrategy::returning(StrategyKind::Pattern, vec![jane()])
            .with_delay(Duration::from_millis(500)),
        MockStrategy::empty(StrategyKind::Model),
    );
    let job_id = harness
        .orchestrator
        .submit_single(payload(b"slow doc", force_pattern(JobPriority::Normal)))
        .await
        .unwrap();
    let mut running = false;
    for _ in 0..100 {
        let job = harness.store.get(job_id).await.unwrap().unwrap();
        if job.status == JobStatus::Running {
            running = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(running);

    let outcome = harness.orchestrator.cancel(job_id).await.unwrap();
    let job = harness
        .orchestrator
        .wait_for_terminal(job_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome, CancelOutcome::Cancelled);
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error.unwrap().kind, ErrorKind::JobCancelled);
}

#[tokio::test]
async fn given_unknown_job_when_cancelled_then_not_found() {
    let harness = harness(
        0,
        8,
        MockStrategy::empty(StrategyKind::Pattern),
        MockStrategy::empty(StrategyKind::Model),
    );

    let outcome = harness.orchestrator.cancel(JobId::new()).await.unwrap();

    assert_eq!(outcome, CancelOutcome::NotFound);
}

#[tokio::test]
async fn given_finished_job_when_cancelled_then_already_finished() {
    let harness = harness(
        1,
        8,
        MockStrategy::returning(StrategyKind::Pattern, vec![jane()]),
        MockStrategy::empty(StrategyKind::Model),
    );
    let job_id = harness
        .orchestrator
        .submit_single(payload(b"done doc", force_pattern(JobPriority::Normal)))
        .await
        .unwrap();
    harness
        .orchestrator
        .wait_for_terminal(job_id)
        .await
        .unwrap()
        .unwrap();

    let outcome = harness.orchestrator.cancel(job_id).await.unwrap();

    assert_eq!(
        outcome,
        CancelOutcome::AlreadyFinished(JobStatus::Completed)
    );
}

#[tokio::test]
async fn given_batch_with_rejected_item_when_processed_then_every_file_reported() {
    let harness = harness(
        1,
        8,
        MockStrategy::returning(StrategyKind::Pattern, vec![jane()]),
        MockStrategy::empty(StrategyKind::Model),
    );
    let batch = BatchPayload {
        files: vec![
            BatchFile {
                filename: "day-one.txt".to_string(),
                data: b"call sheet one".to_vec(),
                mime: MimeKind::Text,
            },
            BatchFile {
                filename: "day-two.txt".to_string(),
                data: b"call sheet two".to_vec(),
                mime: MimeKind::Text,
            },
        ],
        rejected: vec![BatchItemOutcome::failed(
            "archive.zip",
            ExtractionFailure::new(
                ErrorKind::UnsupportedFormat,
                "unsupported content type: application/zip",
            ),
        )],
        options: force_pattern(JobPriority::Normal),
    };

    let job_id = harness.orchestrator.submit_batch(batch).await.unwrap();
    let job = harness
        .orchestrator
        .wait_for_terminal(job_id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.kind, JobKind::Batch { file_count: 3 });
    assert_eq!(job.progress, 100);
    let Some(JobResult::Batch(items)) = job.result else {
        panic!("expected a batch result");
    };
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].filename, "archive.zip");
    assert_eq!(
        items[0].error.as_ref().unwrap().kind,
        ErrorKind::UnsupportedFormat
    );
    assert!(items[1].error.is_none());
    assert_eq!(items[1].candidates[0].name, "Jane Doe");
    assert!(items[2].error.is_none());
}

#[tokio::test]
async fn given_no_workers_when_waiting_then_latest_state_returned_after_window() {
    let store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
    let (high_tx, _high_rx) = mpsc::channel(8);
    let (normal_tx, _normal_rx) = mpsc::channel(8);
    let orchestrator = JobOrchestrator::new(
        Arc::clone(&store),
        high_tx,
        normal_tx,
        Arc::new(JobWatchers::new()),
        Arc::new(CancellationRegistry::new()),
        Duration::from_millis(50),
    );
    let job_id = orchestrator
        .submit_single(payload(b"waiting doc", ExtractionOptions::default()))
        .await
        .unwrap();

    let job = orchestrator.wait_for_terminal(job_id).await.unwrap().unwrap();

    assert_eq!(job.status, JobStatus::Queued);
}

#[tokio::test]
async fn given_unknown_job_when_waiting_then_none() {
    let harness = harness(
        0,
        8,
        MockStrategy::empty(StrategyKind::Pattern),
        MockStrategy::empty(StrategyKind::Model),
    );

    let job = harness
        .orchestrator
        .wait_for_terminal(JobId::new())
        .await
        .unwrap();

    assert!(job.is_none());
}
