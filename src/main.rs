use anyhow::{Context, Result};
use clap::Parser;
use live_assistant::{
    create_router, AppState, ChannelCaptureWidget, Config, NatsLiveClient, SessionController,
};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "live-assistant", about = "Live multimodal assistant service")]
struct Args {
    /// Path to the config file (without extension)
    #[arg(long, default_value = "config/live-assistant")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Live model: {} via {}", cfg.live.model, cfg.live.nats_url);

    let (widget, injector) = ChannelCaptureWidget::new();
    let client = NatsLiveClient::new(
        cfg.live.nats_url.clone(),
        cfg.live.model.clone(),
        cfg.live.response_modalities.clone(),
    );
    let controller = SessionController::new(Arc::new(widget), Arc::new(client));

    let state = AppState::new(controller, injector, cfg.media.clone());
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, router)
        .await
        .context("HTTP server error")?;

    Ok(())
}
