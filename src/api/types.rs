use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Alert, Detection, Severity};

#[derive(Debug, Deserialize)]
pub struct AdvisorRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AdvisorResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub disease: String,
    pub confidence: f64,
    pub severity: Severity,
    pub treatment: String,
    pub crop_type: String,
    pub image_url: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub prediction: Prediction,
}

/// JSON fallback body for clients that cannot send multipart uploads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictJsonRequest {
    pub crop_type: String,
    #[serde(default)]
    pub filename: Option<String>,
    pub image_base64: String,
}

#[derive(Debug, Serialize)]
pub struct DetectionsResponse {
    pub success: bool,
    pub detections: Vec<Detection>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub success: bool,
    pub alerts: Vec<Alert>,
    pub total: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlertQuery {
    #[serde(default)]
    pub crop: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}
