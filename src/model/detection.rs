use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{GeoPoint, Severity};

/// One disease-detection record as shown in the dashboard history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub crop_type: String,
    pub disease_name: String,
    pub confidence: f64,
    pub severity: Severity,
    pub treatment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
}
