use async_trait::async_trait;

use crate::error::ClassifyError;

/// External service mapping a speed to a short label.
///
/// Implementations may be slow or fail; callers never see the failure, the
/// gateway turns it into the fallback label.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, speed_kmh: f64) -> Result<String, ClassifyError>;
}

/// Fixed speed bands, in whole km/h.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeedBandClassifier;

impl SpeedBandClassifier {
    pub fn label_for(speed_kmh: f64) -> &'static str {
        let speed = speed_kmh.max(0.0).round() as i64;
        match speed {
            0 => "🚶",
            1..=10 => "🐌",
            11..=30 => "🚶‍♀️",
            31..=50 => "🚴",
            51..=70 => "🚗",
            71..=90 => "🚕",
            91..=110 => "🏎️",
            _ => "🚀",
        }
    }
}

#[async_trait]
impl Classifier for SpeedBandClassifier {
    async fn classify(&self, speed_kmh: f64) -> Result<String, ClassifyError> {
        if !speed_kmh.is_finite() {
            return Err(ClassifyError::Failed(format!("speed is not finite: {}", speed_kmh)));
        }
        Ok(Self::label_for(speed_kmh).to_string())
    }
}
