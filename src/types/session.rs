use serde::{Deserialize, Serialize};

use crate::pipeline::convert::DisplayReadout;
use crate::types::location::Coordinate;
use crate::types::preferences::{Theme, Unit, ViewMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    #[default]
    Pending,
    Granted,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JourneyStatus {
    #[default]
    Idle,
    Tracking,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationState {
    pub current_label: String,
    pub pending_request_speed: Option<f64>,
}

/// Read-only view of the session handed to presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Canonical m/s; `None` until the first sample arrives.
    pub speed: Option<f64>,
    pub unit: Unit,
    pub permission_status: PermissionStatus,
    pub error_message: Option<String>,
    pub current_label: String,
    pub view_mode: ViewMode,
    pub journey_status: JourneyStatus,
    pub journey_path: Vec<Coordinate>,
    pub journey_distance_km: f64,
    pub theme: Theme,
    pub display: DisplayReadout,
}
