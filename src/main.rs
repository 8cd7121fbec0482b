use anyhow::{Context, Result};
use clap::Parser;
use meeting_scribe::events::{EventBus, MemoryEventBus, NatsEventBus};
use meeting_scribe::{
    create_router, AppState, Config, InMemoryTranscriptionRepository, LocalUploadSink,
    ProviderFactory,
};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "meeting-scribe", about = "Streaming transcription session service")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/meeting-scribe")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} starting", cfg.service.name);

    let sink = Arc::new(LocalUploadSink::new(cfg.storage.uploads_path.clone()));
    let factory = Arc::new(ProviderFactory::new(&cfg.transcription, sink));
    let repository = Arc::new(InMemoryTranscriptionRepository::new());

    let events: Arc<dyn EventBus> = if cfg.nats.enabled {
        match NatsEventBus::connect(&cfg.nats.url).await {
            Ok(bus) => Arc::new(bus),
            Err(e) => {
                warn!("NATS unavailable ({}); session events will not be published", e);
                Arc::new(MemoryEventBus::new())
            }
        }
    } else {
        Arc::new(MemoryEventBus::new())
    };

    let state = AppState::new(factory, repository, events);
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, router)
        .await
        .context("HTTP server error")?;

    Ok(())
}
