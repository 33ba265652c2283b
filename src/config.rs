use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub classify_debounce: Duration,
    pub classify_timeout: Duration,
    /// `None` disables the no-sample watchdog.
    pub location_timeout: Option<Duration>,
    pub preferences_path: Option<PathBuf>,
    pub location_supported: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            classify_debounce: Duration::from_millis(500),
            classify_timeout: Duration::from_millis(5000),
            location_timeout: Some(Duration::from_millis(10_000)),
            preferences_path: None,
            location_supported: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let classify_debounce = env_millis("CLASSIFY_DEBOUNCE_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.classify_debounce);

        let classify_timeout = env_millis("CLASSIFY_TIMEOUT_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.classify_timeout);

        let location_timeout = match env_millis("LOCATION_TIMEOUT_MS") {
            Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
            None => defaults.location_timeout,
        };

        let preferences_path = std::env::var("PREFERENCES_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let location_supported = std::env::var("LOCATION_SUPPORTED")
            .ok()
            .map(|s| !matches!(s.trim().to_lowercase().as_str(), "0" | "false" | "no"))
            .unwrap_or(defaults.location_supported);

        Self {
            port,
            classify_debounce,
            classify_timeout,
            location_timeout,
            preferences_path,
            location_supported,
        }
    }
}

fn env_millis(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
