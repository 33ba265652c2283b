use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Kmh,
    Mph,
    Mps,
}

impl Unit {
    /// Toggle order: kmh -> mph -> mps -> kmh.
    pub fn next(self) -> Self {
        match self {
            Unit::Kmh => Unit::Mph,
            Unit::Mph => Unit::Mps,
            Unit::Mps => Unit::Kmh,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kmh => "kmh",
            Unit::Mph => "mph",
            Unit::Mps => "mps",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Digital,
    Analogue,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Digital => ViewMode::Analogue,
            ViewMode::Analogue => ViewMode::Digital,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPreferences {
    pub unit: Unit,
    pub view_mode: ViewMode,
    pub theme: Theme,
}
