use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use callsheet::application::ports::{DocumentIngest, JobStore, ResultCache, StrategySet};
use callsheet::domain::MimeKind;
use callsheet::infrastructure::cache::MemoryResultCache;
use callsheet::infrastructure::ingest::{CompositeIngestor, PlainTextIngestor, RemoteDocIngestor};
use callsheet::infrastructure::jobs::MemoryJobStore;
use callsheet::infrastructure::observability::{init_tracing, TracingConfig};
use callsheet::infrastructure::strategies::{ModelStrategy, PatternStrategy};
use callsheet::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();

    init_tracing(TracingConfig::default(), settings.server.port);

    let layout: Arc<dyn DocumentIngest> = Arc::new(RemoteDocIngestor::new(
        &settings.ingest.layout_endpoint,
        &settings.ingest.layout_api_key,
    ));
    let ingestor = Arc::new(CompositeIngestor::new(vec![
        (MimeKind::Text, Arc::new(PlainTextIngestor) as Arc<dyn DocumentIngest>),
        (MimeKind::Pdf, Arc::clone(&layout)),
        (MimeKind::Docx, Arc::clone(&layout)),
        (MimeKind::Xlsx, Arc::clone(&layout)),
        (MimeKind::Png, Arc::clone(&layout)),
        (MimeKind::Jpeg, Arc::clone(&layout)),
    ]));

    let strategies = StrategySet::new(
        Arc::new(PatternStrategy::new()),
        Arc::new(ModelStrategy::new(
            &settings.strategies.model_base_url,
            &settings.strategies.model_name,
            &settings.strategies.model_api_key,
        )),
    );

    let cache: Arc<dyn ResultCache> = Arc::new(MemoryResultCache::new(
        settings.cache.capacity,
        Duration::from_secs(settings.cache.ttl_secs),
    ));
    let store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());

    let host = settings.server.host.clone();
    let port = settings.server.port;

    let state = AppState::assemble(ingestor, strategies, cache, store, settings);
    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
