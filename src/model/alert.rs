use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{GeoPoint, Severity};

/// Community disease alert shown on the regional outbreak map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub disease_name: String,
    pub crop_type: String,
    pub region: String,
    pub severity: Severity,
    pub reported_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
}
