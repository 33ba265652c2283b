use serde::{Deserialize, Serialize};

use crate::types::preferences::Unit;

const MPS_TO_KMH: f64 = 3.6;
const MPS_PER_MPH: f64 = 0.44704;
const MILES_PER_KM: f64 = 0.621371;

/// Converts a canonical m/s speed into `unit`. Full precision.
pub fn speed_to_unit(mps: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Kmh => mps * MPS_TO_KMH,
        Unit::Mph => mps / MPS_PER_MPH,
        Unit::Mps => mps,
    }
}

/// Converts canonical kilometers into the distance unit paired with `unit`.
/// Only mph has a distinct distance unit (miles).
pub fn distance_to_unit(km: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Kmh | Unit::Mps => km,
        Unit::Mph => km * MILES_PER_KM,
    }
}

pub fn kmh_to_mps(kmh: f64) -> f64 {
    kmh / MPS_TO_KMH
}

pub fn mps_to_kmh(mps: f64) -> f64 {
    mps * MPS_TO_KMH
}

pub fn speed_label(unit: Unit) -> &'static str {
    match unit {
        Unit::Kmh => "km/h",
        Unit::Mph => "mph",
        Unit::Mps => "m/s",
    }
}

pub fn distance_label(unit: Unit) -> &'static str {
    match unit {
        Unit::Kmh | Unit::Mps => "km",
        Unit::Mph => "mi",
    }
}

/// Full-scale value of the analogue gauge for each unit.
pub fn gauge_max(unit: Unit) -> u32 {
    match unit {
        Unit::Kmh => 220,
        Unit::Mph => 140,
        Unit::Mps => 60,
    }
}

/// Speed rounded to the nearest whole display unit.
pub fn display_speed(mps: Option<f64>, unit: Unit) -> i64 {
    mps.map(|speed| speed_to_unit(speed, unit).round() as i64)
        .unwrap_or(0)
}

pub fn display_distance(km: f64, unit: Unit) -> String {
    format!("{:.2}", distance_to_unit(km, unit))
}

/// Presentation-ready numbers for the current unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayReadout {
    pub speed: i64,
    pub speed_label: String,
    pub distance: String,
    pub distance_label: String,
    pub gauge_max: u32,
}

impl DisplayReadout {
    pub fn new(speed_mps: Option<f64>, distance_km: f64, unit: Unit) -> Self {
        Self {
            speed: display_speed(speed_mps, unit),
            speed_label: speed_label(unit).to_string(),
            distance: display_distance(distance_km, unit),
            distance_label: distance_label(unit).to_string(),
            gauge_max: gauge_max(unit),
        }
    }
}
