use rand::Rng;

use crate::model::Severity;

/// One canned outcome of the simulated disease analysis.
#[derive(Debug, Clone, Copy)]
pub struct PredictionOutcome {
    pub disease: &'static str,
    pub confidence: f64,
    pub severity: Severity,
    pub treatment: &'static str,
}

// There is no model behind this: a prediction is a uniform draw from a
// fixed pool, made only after the content classifier has accepted the photo.
pub const PREDICTION_POOL: &[PredictionOutcome] = &[
    PredictionOutcome {
        disease: "Early Blight",
        confidence: 94.5,
        severity: Severity::High,
        treatment: "Apply copper-based fungicide immediately. Remove affected leaves. Ensure proper spacing between plants for better air circulation.",
    },
    PredictionOutcome {
        disease: "Late Blight",
        confidence: 89.2,
        severity: Severity::High,
        treatment: "Apply metalaxyl-based fungicide. Remove and destroy all infected plant material. Avoid overhead irrigation.",
    },
    PredictionOutcome {
        disease: "Powdery Mildew",
        confidence: 86.3,
        severity: Severity::Medium,
        treatment: "Apply sulfur-based or neem oil fungicide. Improve air circulation. Remove infected leaves.",
    },
    PredictionOutcome {
        disease: "Leaf Mold",
        confidence: 91.1,
        severity: Severity::Medium,
        treatment: "Reduce humidity. Apply chlorothalonil or copper fungicide. Ensure proper ventilation.",
    },
    PredictionOutcome {
        disease: "Bacterial Spot",
        confidence: 82.7,
        severity: Severity::Medium,
        treatment: "Apply copper hydroxide spray. Use disease-free seeds. Remove heavily infected plants.",
    },
    PredictionOutcome {
        disease: "Healthy",
        confidence: 97.8,
        severity: Severity::Low,
        treatment: "No treatment needed. Your crop appears healthy. Continue regular monitoring.",
    },
];

pub fn mock_prediction() -> &'static PredictionOutcome {
    let idx = rand::thread_rng().gen_range(0..PREDICTION_POOL.len());
    &PREDICTION_POOL[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_comes_from_the_pool() {
        for _ in 0..50 {
            let outcome = mock_prediction();
            assert!(PREDICTION_POOL
                .iter()
                .any(|candidate| candidate.disease == outcome.disease));
        }
    }

    #[test]
    fn healthy_is_the_only_low_severity_outcome() {
        let low: Vec<_> = PREDICTION_POOL
            .iter()
            .filter(|o| o.severity == Severity::Low)
            .collect();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].disease, "Healthy");
    }

    #[test]
    fn confidences_look_like_percentages() {
        for outcome in PREDICTION_POOL {
            assert!(outcome.confidence > 0.0 && outcome.confidence <= 100.0);
        }
    }
}
