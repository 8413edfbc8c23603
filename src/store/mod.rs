use anyhow::{Context, Result};
use tokio::sync::RwLock;

use crate::model::{Alert, Detection};

/// Query filters for the alert listing. `None` or the literal `"all"`
/// disables a filter.
#[derive(Debug, Default, Clone)]
pub struct AlertFilter {
    pub crop: Option<String>,
    pub severity: Option<String>,
    pub region: Option<String>,
}

/// In-memory record store.
///
/// The dashboard keeps no server-side database: detections and alerts are
/// mock rows seeded at startup, plus whatever predictions this process has
/// produced since. Everything is gone on restart, which is the intended
/// lifecycle.
pub struct MemoryStore {
    detections: RwLock<Vec<Detection>>,
    alerts: RwLock<Vec<Alert>>,
}

impl MemoryStore {
    pub fn with_seed_data() -> Result<Self> {
        let detections: Vec<Detection> =
            serde_json::from_str(include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/data/seed_detections.json"
            )))
            .context("invalid detection seed data")?;
        let alerts: Vec<Alert> = serde_json::from_str(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/data/seed_alerts.json"
        )))
        .context("invalid alert seed data")?;

        Ok(Self {
            detections: RwLock::new(detections),
            alerts: RwLock::new(alerts),
        })
    }

    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            detections: RwLock::new(Vec::new()),
            alerts: RwLock::new(Vec::new()),
        }
    }

    pub async fn add_detection(&self, detection: Detection) {
        self.detections.write().await.push(detection);
    }

    pub async fn list_detections(&self) -> Vec<Detection> {
        self.detections.read().await.clone()
    }

    pub async fn list_alerts(&self, filter: &AlertFilter) -> Vec<Alert> {
        let alerts = self.alerts.read().await;
        alerts
            .iter()
            .filter(|alert| {
                matches_filter(filter.crop.as_deref(), &alert.crop_type)
                    && matches_filter(filter.severity.as_deref(), alert.severity.as_str())
                    && matches_filter(filter.region.as_deref(), &alert.region)
            })
            .cloned()
            .collect()
    }
}

fn matches_filter(wanted: Option<&str>, actual: &str) -> bool {
    match wanted {
        None => true,
        Some("all") => true,
        Some(value) => value == actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;
    use chrono::Utc;

    #[tokio::test]
    async fn seed_data_loads() {
        let store = MemoryStore::with_seed_data().expect("seed data must parse");
        assert_eq!(store.list_detections().await.len(), 5);
        assert_eq!(store.list_alerts(&AlertFilter::default()).await.len(), 8);
    }

    #[tokio::test]
    async fn alert_filters_compose() {
        let store = MemoryStore::with_seed_data().unwrap();

        let tomato = store
            .list_alerts(&AlertFilter {
                crop: Some("Tomato".into()),
                ..Default::default()
            })
            .await;
        assert_eq!(tomato.len(), 4);

        let tomato_high = store
            .list_alerts(&AlertFilter {
                crop: Some("Tomato".into()),
                severity: Some("high".into()),
                ..Default::default()
            })
            .await;
        assert_eq!(tomato_high.len(), 2);

        // "all" is a no-op filter, matching the dashboard's dropdown default
        let all = store
            .list_alerts(&AlertFilter {
                crop: Some("all".into()),
                severity: Some("all".into()),
                region: None,
            })
            .await;
        assert_eq!(all.len(), 8);

        let nowhere = store
            .list_alerts(&AlertFilter {
                region: Some("South India".into()),
                ..Default::default()
            })
            .await;
        assert!(nowhere.is_empty());
    }

    #[tokio::test]
    async fn new_detections_append() {
        let store = MemoryStore::empty();
        store
            .add_detection(Detection {
                id: "t1".into(),
                image_url: None,
                crop_type: "Tomato".into(),
                disease_name: "Healthy".into(),
                confidence: 97.8,
                severity: Severity::Low,
                treatment: "No treatment needed.".into(),
                location: None,
                created_at: Utc::now(),
            })
            .await;
        assert_eq!(store.list_detections().await.len(), 1);
    }
}
