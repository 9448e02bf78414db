use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

mod api;
mod config;
mod crop;
mod error;
mod service;

use crate::config::StaticConfig;
use crate::service::LabelCropService;

// Re-export config crate types to avoid namespace collision
use ::config::{Config as ConfigBuilder, Environment, File};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("Starting labelsnip service v{}", env!("CARGO_PKG_VERSION"));

    // Load static configuration (server binding, upload limits)
    let static_config: StaticConfig = ConfigBuilder::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(
            Environment::with_prefix("LABELSNIP")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    info!(
        host = %static_config.server.host,
        port = static_config.server.port,
        max_upload_bytes = static_config.limits.max_upload_bytes,
        "Static configuration loaded"
    );

    let config = Arc::new(static_config);
    let service = Arc::new(LabelCropService::new(config.clone()));

    // Fail fast if the PDFium library is missing rather than on first upload
    if let Err(e) = crop::create_pdfium() {
        tracing::warn!(error = %e, "PDFium library not loadable at startup; crop requests will fail");
    }

    let app = api::router(service, &config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let format = fmt::format()
        .with_target(true)
        .with_thread_ids(true)
        .compact();

    // Use RUST_LOG if set, otherwise default to info level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("labelsnip_service=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().event_format(format))
        .with(filter)
        .init();
}
