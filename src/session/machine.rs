use crate::error::LocationError;
use crate::pipeline::convert::{mps_to_kmh, DisplayReadout};
use crate::pipeline::journey::JourneyAccumulator;
use crate::types::location::Sample;
use crate::types::preferences::{DisplayPreferences, Theme, Unit, ViewMode};
use crate::types::session::{JourneyStatus, PermissionStatus, SessionSnapshot};

/// Synchronous core of the session. Every transition completes in place;
/// side effects (classification, persistence) are left to the caller.
#[derive(Debug, Clone, Default)]
pub struct SessionMachine {
    permission: PermissionStatus,
    error_message: Option<String>,
    speed_mps: Option<f64>,
    preferences: DisplayPreferences,
    journey: JourneyAccumulator,
}

impl SessionMachine {
    pub fn new(preferences: DisplayPreferences) -> Self {
        Self {
            preferences,
            ..Self::default()
        }
    }

    /// A fresh subscription lifecycle starts over at pending.
    pub fn begin_observing(&mut self) {
        self.permission = PermissionStatus::Pending;
        self.error_message = None;
    }

    /// Applies one sample and returns the km/h value to classify.
    /// Denied is terminal for the subscription, so samples are ignored there.
    pub fn on_sample(&mut self, sample: &Sample) -> Option<f64> {
        if self.permission == PermissionStatus::Denied {
            return None;
        }

        self.permission = PermissionStatus::Granted;
        let speed = sample.effective_speed_mps();
        self.speed_mps = Some(speed);
        self.journey.on_sample(sample.coordinate);

        Some(mps_to_kmh(speed))
    }

    pub fn on_error(&mut self, error: LocationError) {
        self.permission = PermissionStatus::Denied;
        self.error_message = Some(error.to_string());
    }

    pub fn toggle_unit(&mut self) -> Unit {
        self.preferences.unit = self.preferences.unit.next();
        self.preferences.unit
    }

    pub fn toggle_view(&mut self) -> ViewMode {
        self.preferences.view_mode = self.preferences.view_mode.toggled();
        self.preferences.view_mode
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.preferences.theme = self.preferences.theme.toggled();
        self.preferences.theme
    }

    pub fn start_journey(&mut self) {
        self.journey.start();
    }

    pub fn end_journey(&mut self) {
        self.journey.finish();
    }

    pub fn reset_journey(&mut self) {
        self.journey.reset();
    }

    pub fn permission(&self) -> PermissionStatus {
        self.permission
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn speed_mps(&self) -> Option<f64> {
        self.speed_mps
    }

    pub fn preferences(&self) -> DisplayPreferences {
        self.preferences
    }

    pub fn journey(&self) -> &JourneyAccumulator {
        &self.journey
    }

    pub fn journey_status(&self) -> JourneyStatus {
        self.journey.status()
    }

    pub fn snapshot(&self, current_label: String) -> SessionSnapshot {
        let unit = self.preferences.unit;
        let distance_km = self.journey.total_distance_km();

        SessionSnapshot {
            speed: self.speed_mps,
            unit,
            permission_status: self.permission,
            error_message: self.error_message.clone(),
            current_label,
            view_mode: self.preferences.view_mode,
            journey_status: self.journey.status(),
            journey_path: self.journey.path().to_vec(),
            journey_distance_km: distance_km,
            theme: self.preferences.theme,
            display: DisplayReadout::new(self.speed_mps, distance_km, unit),
        }
    }
}
