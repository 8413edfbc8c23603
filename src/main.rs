use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod advisor;
mod api;
mod classifier;
mod detection;
mod model;
mod storage;
mod store;

use advisor::KnowledgeBase;
use api::AppState;
use storage::PhotoStore;
use store::MemoryStore;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_PREDICT_DELAY_MS: u64 = 1500;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // -----------------------------
    // Logging
    // -----------------------------
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("🌱 Starting CropGuard advisory server...");

    // -----------------------------
    // Shared state / Dependencies
    // -----------------------------
    let knowledge = Arc::new(KnowledgeBase::load()?);
    let store = Arc::new(MemoryStore::with_seed_data()?);

    let upload_dir =
        dotenvy::var("CROPGUARD_UPLOAD_DIR").unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string());
    let photos = Arc::new(PhotoStore::new(&upload_dir).await?);

    let predict_delay_ms = dotenvy::var("CROPGUARD_PREDICT_DELAY_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_PREDICT_DELAY_MS);

    let state = AppState {
        knowledge,
        store,
        photos,
        predict_delay: Duration::from_millis(predict_delay_ms),
    };

    // -----------------------------
    // Router
    // -----------------------------
    let app = Router::new()
        .merge(api::router())
        // CORS for the dashboard frontend
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state);

    let addr = dotenvy::var("CROPGUARD_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    println!("🌐 HTTP listening on http://{addr}");
    println!("🤖 Advisor at http://{addr}/api/advisor");
    println!("🔬 Detection at http://{addr}/api/predict");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
