//! GeoQA HTTP server
//!
//! ```bash
//! GEOQA_CONFIG=config/geoqa.yaml cargo run --bin geoqa_server --features server
//! curl 'http://localhost:5000/qa?core=Which+parks+are+in+Walle%3F&lang=en'
//! ```

use std::sync::Arc;

use geoqa::{api, Orchestrator, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let settings = Settings::from_env()?;
    let orchestrator = Arc::new(Orchestrator::from_settings(&settings)?);
    let app = api::router(orchestrator);

    let addr = std::env::var("GEOQA_BIND").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
    info!("geoqa_server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
