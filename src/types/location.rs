use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One reading from the location source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub coordinate: Coordinate,
    pub speed_mps: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Sample {
    pub fn new(coordinate: Coordinate, speed_mps: Option<f64>) -> Self {
        Self {
            coordinate,
            speed_mps,
            timestamp: Utc::now(),
        }
    }

    /// Reported speed in m/s, with missing and non-positive readings treated as standing still.
    pub fn effective_speed_mps(&self) -> f64 {
        match self.speed_mps {
            Some(speed) if speed > 0.0 => speed,
            _ => 0.0,
        }
    }
}
