use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};

use crate::application::ports::{DocumentIngest, JobStore, ResultCache, StrategySet};
use crate::application::services::{
    CancellationRegistry, ExtractionPipeline, ExtractionWorker, JobOrchestrator, JobWatchers,
    RetentionSweeper, RoutingPolicy, RoutingRules,
};
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<JobOrchestrator>,
    pub job_store: Arc<dyn JobStore>,
    pub result_cache: Arc<dyn ResultCache>,
    pub settings: Settings,
}

impl AppState {
    /// Wires the pipeline, worker pool, retention sweeper and
    /// orchestrator around the given adapters, and spawns the
    /// background tasks.
    pub fn assemble<I>(
        ingestor: Arc<I>,
        strategies: StrategySet,
        cache: Arc<dyn ResultCache>,
        store: Arc<dyn JobStore>,
        settings: Settings,
    ) -> AppState
    where
        I: DocumentIngest + 'static,
    {
        let pipeline = Arc::new(ExtractionPipeline::new(
            ingestor,
            strategies,
            Arc::clone(&cache),
            RoutingPolicy::new(RoutingRules {
                size_ceiling_bytes: settings.routing.size_ceiling_bytes,
            }),
            Duration::from_secs(settings.strategies.timeout_secs),
        ));

        let (high_tx, high_rx) = mpsc::channel(settings.jobs.queue_capacity);
        let (normal_tx, normal_rx) = mpsc::channel(settings.jobs.queue_capacity);
        let high_rx = Arc::new(Mutex::new(high_rx));
        let normal_rx = Arc::new(Mutex::new(normal_rx));

        let watchers = Arc::new(JobWatchers::new());
        let cancellations = Arc::new(CancellationRegistry::new());

        for worker_id in 0..settings.jobs.workers.max(1) {
            let worker = ExtractionWorker::new(
                worker_id,
                Arc::clone(&high_rx),
                Arc::clone(&normal_rx),
                Arc::clone(&pipeline),
                Arc::clone(&store),
                Arc::clone(&watchers),
                Arc::clone(&cancellations),
            );
            tokio::spawn(worker.run());
        }

        let sweeper = RetentionSweeper::new(
            Arc::clone(&store),
            Duration::from_secs(settings.jobs.sweep_interval_secs),
            chrono::Duration::seconds(settings.jobs.retention_secs as i64),
        );
        tokio::spawn(sweeper.run());

        let orchestrator = Arc::new(JobOrchestrator::new(
            Arc::clone(&store),
            high_tx,
            normal_tx,
            watchers,
            cancellations,
            Duration::from_secs(settings.jobs.sync_wait_secs),
        ));

        AppState {
            orchestrator,
            job_store: store,
            result_cache: cache,
            settings,
        }
    }
}
