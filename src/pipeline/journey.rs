use crate::pipeline::distance::distance_km;
use crate::types::location::Coordinate;
use crate::types::session::JourneyStatus;

/// Running distance over a user-delimited journey.
///
/// `total_distance_km` always equals the sum of great-circle legs between
/// consecutive entries of `path`; `path` is empty whenever the journey is idle.
#[derive(Debug, Clone, Default)]
pub struct JourneyAccumulator {
    status: JourneyStatus,
    path: Vec<Coordinate>,
    total_distance_km: f64,
}

impl JourneyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a fresh journey from any state.
    pub fn start(&mut self) {
        self.status = JourneyStatus::Tracking;
        self.path.clear();
        self.total_distance_km = 0.0;
    }

    /// Appends a coordinate while tracking; ignored otherwise.
    pub fn on_sample(&mut self, coordinate: Coordinate) {
        if self.status != JourneyStatus::Tracking {
            return;
        }

        if let Some(last) = self.path.last() {
            self.total_distance_km += distance_km(*last, coordinate);
        }
        self.path.push(coordinate);
    }

    /// Stops tracking and keeps path and distance as the journey summary.
    pub fn finish(&mut self) {
        if self.status == JourneyStatus::Tracking {
            self.status = JourneyStatus::Finished;
        }
    }

    pub fn reset(&mut self) {
        self.status = JourneyStatus::Idle;
        self.path.clear();
        self.total_distance_km = 0.0;
    }

    pub fn status(&self) -> JourneyStatus {
        self.status
    }

    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }
}
