use std::{sync::Arc, time::Duration};

use axum::{
    routing::{get, post},
    Router,
};

use crate::{advisor::KnowledgeBase, storage::PhotoStore, store::MemoryStore};

pub mod handlers;
pub mod types;

use handlers::{advise, get_photo, list_alerts, list_detections, predict};

#[derive(Clone)]
pub struct AppState {
    pub knowledge: Arc<KnowledgeBase>,
    pub store: Arc<MemoryStore>,
    pub photos: Arc<PhotoStore>,
    pub predict_delay: Duration,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/advisor", post(advise))
        .route("/api/predict", post(predict))
        .route("/api/detections", get(list_detections))
        .route("/api/alerts", get(list_alerts))
        .route("/api/photos/{filename}", get(get_photo))
}
