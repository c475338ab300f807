use async_trait::async_trait;

/// Receives percentage updates while an extraction runs. Reporting is
/// best-effort: a sink must never fail the extraction that feeds it.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn report(&self, pct: u8);
}

/// Sink for callers that do not track progress, such as the synchronous
/// request path.
pub struct NoopProgress;

#[async_trait]
impl ProgressSink for NoopProgress {
    async fn report(&self, _pct: u8) {}
}
