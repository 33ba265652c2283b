pub mod machine;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::error::LocationError;
use crate::location::{LocationEvent, LocationSource, Subscription};
use crate::pipeline::gateway::ClassifierGateway;
use crate::store::PreferenceStore;
use crate::types::location::Sample;
use crate::types::preferences::{DisplayPreferences, Theme, Unit, ViewMode};
use crate::types::session::SessionSnapshot;

pub use machine::SessionMachine;

pub const THEME_KEY: &str = "theme";

/// The single session context observed by presentation.
///
/// Location events are applied one at a time under the machine lock. The
/// classifier gateway and the preference store are the only side effects.
pub struct Session {
    machine: Mutex<SessionMachine>,
    gateway: ClassifierGateway,
    store: Arc<dyn PreferenceStore>,
}

impl Session {
    pub fn new(
        preferences: DisplayPreferences,
        gateway: ClassifierGateway,
        store: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            machine: Mutex::new(SessionMachine::new(preferences)),
            gateway,
            store,
        }
    }

    /// Builds a session with the persisted theme, if any.
    pub async fn load(gateway: ClassifierGateway, store: Arc<dyn PreferenceStore>) -> Self {
        let theme = match store.get(THEME_KEY).await {
            Ok(Some(value)) => Theme::from_str(&value).unwrap_or_else(|| {
                tracing::warn!("Ignoring unknown stored theme {:?}", value);
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(err) => {
                tracing::warn!("Could not read theme preference: {}", err);
                Theme::default()
            }
        };

        let preferences = DisplayPreferences {
            theme,
            ..DisplayPreferences::default()
        };
        Self::new(preferences, gateway, store)
    }

    pub async fn begin_observing(&self) {
        self.machine.lock().await.begin_observing();
    }

    pub async fn on_sample(&self, sample: Sample) {
        let mut machine = self.machine.lock().await;
        tracing::debug!(
            "Sample at ({:.5}, {:.5}) speed {:?}",
            sample.coordinate.latitude,
            sample.coordinate.longitude,
            sample.speed_mps
        );
        if let Some(speed_kmh) = machine.on_sample(&sample) {
            self.gateway.request_label(speed_kmh);
        }
    }

    pub async fn on_error(&self, error: LocationError) {
        tracing::warn!("Location source failed: {:?}", error);
        self.machine.lock().await.on_error(error);
    }

    /// Opens a subscription on `source` and processes its events until the
    /// source closes or reports an error.
    pub async fn run(&self, source: Arc<dyn LocationSource>, sample_timeout: Option<Duration>) {
        self.begin_observing().await;
        self.observe(Subscription::open(source), sample_timeout).await;
    }

    /// Processes events from an already opened subscription. A source error
    /// or a quiet period longer than `sample_timeout` ends observation; no
    /// retry is attempted.
    pub async fn observe(
        &self,
        subscription: Result<Subscription, LocationError>,
        sample_timeout: Option<Duration>,
    ) {
        let _teardown = Teardown(&self.gateway);

        let mut subscription = match subscription {
            Ok(subscription) => subscription,
            Err(err) => {
                self.on_error(err).await;
                return;
            }
        };
        tracing::info!("Observing location (subscription {})", subscription.id());

        loop {
            let next = match sample_timeout {
                Some(limit) => tokio::time::timeout(limit, subscription.next())
                    .await
                    .unwrap_or(Some(LocationEvent::Error(LocationError::Timeout))),
                None => subscription.next().await,
            };

            match next {
                Some(LocationEvent::Sample(sample)) => self.on_sample(sample).await,
                Some(LocationEvent::Error(err)) => {
                    self.on_error(err).await;
                    break;
                }
                None => {
                    tracing::info!("Location source closed subscription {}", subscription.id());
                    break;
                }
            }
        }
    }

    pub async fn toggle_unit(&self) -> Unit {
        self.machine.lock().await.toggle_unit()
    }

    pub async fn toggle_view(&self) -> ViewMode {
        self.machine.lock().await.toggle_view()
    }

    /// Flips the theme and persists it. A failed write is logged and the
    /// in-memory theme still changes.
    pub async fn toggle_theme(&self) -> Theme {
        // The guard spans the write so stored and in-memory themes change in the same order.
        let mut machine = self.machine.lock().await;
        let theme = machine.toggle_theme();
        if let Err(err) = self.store.set(THEME_KEY, theme.as_str()).await {
            tracing::warn!("Could not persist theme preference: {}", err);
        }
        drop(machine);
        theme
    }

    pub async fn start_journey(&self) {
        self.machine.lock().await.start_journey();
        tracing::info!("Journey started");
    }

    pub async fn end_journey(&self) {
        let mut machine = self.machine.lock().await;
        machine.end_journey();
        tracing::info!(
            "Journey ended at {:.2} km over {} points",
            machine.journey().total_distance_km(),
            machine.journey().path().len()
        );
    }

    pub async fn reset_journey(&self) {
        self.machine.lock().await.reset_journey();
        tracing::info!("Journey reset");
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let machine = self.machine.lock().await;
        machine.snapshot(self.gateway.current_label())
    }
}

/// Disarms the debounce timer when observation ends, including on abort.
struct Teardown<'a>(&'a ClassifierGateway);

impl Drop for Teardown<'_> {
    fn drop(&mut self) {
        self.0.cancel_pending();
    }
}
