use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    DocumentIngest, ExtractorError, ProgressSink, ResultCache, StrategySet,
};
use crate::application::services::confidence_scorer::ConfidenceScorer;
use crate::application::services::document_profiler::DocumentProfiler;
use crate::application::services::result_merger::ResultMerger;
use crate::application::services::routing_policy::RoutingPolicy;
use crate::domain::{
    Candidate, DocumentProfile, ErrorKind, ExecutionPlan, ExtractionFailure, ExtractionOptions,
    Fingerprint, MimeKind, RawContact, StrategyKind,
};

const PROGRESS_PROFILED: u8 = 15;
const PROGRESS_ROUTED: u8 = 25;
const PROGRESS_TEXT_READY: u8 = 40;
const PROGRESS_STRATEGIES_DONE: u8 = 70;
const PROGRESS_MERGED: u8 = 85;
const PROGRESS_SCORED: u8 = 95;

#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub candidates: Vec<Candidate>,
    pub from_cache: bool,
}

/// Runs one document through the full extraction flow: cache lookup,
/// profiling, routing, text ingestion, the routed strategies, merging
/// and scoring, then a cache write.
pub struct ExtractionPipeline<I>
where
    I: DocumentIngest,
{
    ingestor: Arc<I>,
    strategies: StrategySet,
    cache: Arc<dyn ResultCache>,
    profiler: DocumentProfiler,
    router: RoutingPolicy,
    merger: ResultMerger,
    scorer: ConfidenceScorer,
    strategy_timeout: Duration,
}

impl<I> ExtractionPipeline<I>
where
    I: DocumentIngest,
{
    pub fn new(
        ingestor: Arc<I>,
        strategies: StrategySet,
        cache: Arc<dyn ResultCache>,
        router: RoutingPolicy,
        strategy_timeout: Duration,
    ) -> Self {
        Self {
            ingestor,
            strategies,
            cache,
            profiler: DocumentProfiler::new(),
            router,
            merger: ResultMerger::new(),
            scorer: ConfidenceScorer::new(),
            strategy_timeout,
        }
    }

    #[tracing::instrument(
        skip(self, data, options, cancel, progress),
        fields(mime = %mime, size_bytes = data.len())
    )]
    pub async fn run(
        &self,
        data: &[u8],
        mime: MimeKind,
        options: &ExtractionOptions,
        cancel: &CancellationToken,
        progress: &dyn ProgressSink,
    ) -> Result<ExtractionOutcome, ExtractionFailure> {
        let fingerprint = Fingerprint::compute(data, mime, options);

        match self.cache.get(&fingerprint).await {
            Ok(Some(candidates)) => {
                tracing::info!(fingerprint = %fingerprint, "Serving extraction from cache");
                return Ok(ExtractionOutcome {
                    candidates,
                    from_cache: true,
                });
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kind = %ErrorKind::CacheUnavailable,
                    "Result cache lookup failed, extracting fresh"
                );
            }
        }

        self.ensure_not_cancelled(cancel)?;

        let profile = self.profiler.profile(data, mime);
        progress.report(PROGRESS_PROFILED).await;

        let plan = self
            .router
            .decide(&profile, data.len() as u64, options)
            .map_err(|e| ExtractionFailure::new(ErrorKind::RoutingDecisionFailed, e.to_string()))?;
        progress.report(PROGRESS_ROUTED).await;

        let text = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled()),
            loaded = self.ingestor.read_text(data, mime) => {
                loaded.map_err(|e| ExtractionFailure::new(e.kind(), e.to_string()))?
            }
        };
        if text.trim().is_empty() {
            return Err(ExtractionFailure::new(
                ErrorKind::EmptyDocument,
                "document yielded no text",
            ));
        }
        progress.report(PROGRESS_TEXT_READY).await;

        let raw = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled()),
            extracted = self.execute(&plan, &text, &profile, options) => extracted?,
        };
        progress.report(PROGRESS_STRATEGIES_DONE).await;

        self.ensure_not_cancelled(cancel)?;

        let merged = self
            .merger
            .merge(raw.into_iter().map(Candidate::from_raw).collect());
        progress.report(PROGRESS_MERGED).await;

        let scored = self.scorer.score(merged, &profile);
        progress.report(PROGRESS_SCORED).await;

        if scored.is_empty() {
            return Err(ExtractionFailure::new(
                ErrorKind::NoCandidatesFound,
                "no contacts found in document",
            ));
        }

        if let Err(e) = self.cache.put(fingerprint, scored.clone()).await {
            tracing::warn!(
                error = %e,
                kind = %ErrorKind::CacheUnavailable,
                "Result cache write failed"
            );
        }

        tracing::info!(
            candidates = scored.len(),
            plan = %plan,
            "Extraction finished"
        );

        Ok(ExtractionOutcome {
            candidates: scored,
            from_cache: false,
        })
    }

    async fn execute(
        &self,
        plan: &ExecutionPlan,
        text: &str,
        profile: &DocumentProfile,
        options: &ExtractionOptions,
    ) -> Result<Vec<RawContact>, ExtractionFailure> {
        match plan {
            ExecutionPlan::Single(kind) => self
                .run_strategy(*kind, text, profile, options)
                .await
                .map_err(|e| strategy_failure(*kind, &e)),
            ExecutionPlan::FallbackChain(kinds) => {
                let mut last_error: Option<ExtractionFailure> = None;
                for kind in kinds {
                    match self.run_strategy(*kind, text, profile, options).await {
                        Ok(contacts) if !contacts.is_empty() => return Ok(contacts),
                        Ok(_) => {
                            tracing::debug!(strategy = %kind, "Strategy found nothing, falling back");
                        }
                        Err(e) => {
                            tracing::warn!(strategy = %kind, error = %e, "Strategy failed, falling back");
                            last_error = Some(strategy_failure(*kind, &e));
                        }
                    }
                }
                match last_error {
                    Some(failure) => Err(failure),
                    None => Ok(Vec::new()),
                }
            }
            ExecutionPlan::RaceAndMerge(kinds) => {
                let runs = kinds.iter().map(|kind| async move {
                    (*kind, self.run_strategy(*kind, text, profile, options).await)
                });
                let results = futures::future::join_all(runs).await;

                let mut contacts = Vec::new();
                let mut failures: Vec<ExtractionFailure> = Vec::new();
                for (kind, result) in results {
                    match result {
                        Ok(found) => {
                            tracing::debug!(strategy = %kind, contacts = found.len(), "Strategy finished");
                            contacts.extend(found);
                        }
                        Err(e) => {
                            tracing::warn!(strategy = %kind, error = %e, "Strategy failed during race");
                            failures.push(strategy_failure(kind, &e));
                        }
                    }
                }

                if contacts.is_empty() {
                    if let Some(first) = failures.first() {
                        let reasons = failures
                            .iter()
                            .map(|f| f.reason.clone())
                            .collect::<Vec<_>>()
                            .join("; ");
                        return Err(ExtractionFailure::new(first.kind, reasons));
                    }
                }
                Ok(contacts)
            }
        }
    }

    async fn run_strategy(
        &self,
        kind: StrategyKind,
        text: &str,
        profile: &DocumentProfile,
        options: &ExtractionOptions,
    ) -> Result<Vec<RawContact>, ExtractorError> {
        let extractor = self.strategies.get(kind);
        let attempt = extractor.extract(text, profile, options);
        match tokio::time::timeout(self.strategy_timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(ExtractorError::Timeout(self.strategy_timeout.as_secs())),
        }
    }

    fn ensure_not_cancelled(&self, cancel: &CancellationToken) -> Result<(), ExtractionFailure> {
        if cancel.is_cancelled() {
            Err(cancelled())
        } else {
            Ok(())
        }
    }
}

fn cancelled() -> ExtractionFailure {
    ExtractionFailure::new(ErrorKind::JobCancelled, "cancelled by caller")
}

fn strategy_failure(kind: StrategyKind, error: &ExtractorError) -> ExtractionFailure {
    ExtractionFailure::new(error.kind(), format!("{}: {}", kind, error))
}
