use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::location::{BroadcastLocationSource, LocationSource, Subscription};
use crate::pipeline::classify::{Classifier, SpeedBandClassifier};
use crate::pipeline::gateway::ClassifierGateway;
use crate::session::Session;
use crate::store::{FileStore, MemoryStore, PreferenceStore};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    session: Arc<Session>,
    location: Arc<BroadcastLocationSource>,
    observer: Mutex<Option<JoinHandle<()>>>,
}

impl AppState {
    pub async fn new(config: Config) -> Self {
        let store: Arc<dyn PreferenceStore> = match &config.preferences_path {
            Some(path) => {
                tracing::info!("Persisting preferences to {}", path.display());
                Arc::new(FileStore::new(path.clone()))
            }
            None => Arc::new(MemoryStore::new()),
        };
        Self::with_parts(config, Arc::new(SpeedBandClassifier), store).await
    }

    pub async fn with_parts(
        config: Config,
        classifier: Arc<dyn Classifier>,
        store: Arc<dyn PreferenceStore>,
    ) -> Self {
        let gateway = ClassifierGateway::new(
            classifier,
            config.classify_debounce,
            config.classify_timeout,
        );
        let session = Session::load(gateway, store).await;
        let location = if config.location_supported {
            BroadcastLocationSource::new()
        } else {
            BroadcastLocationSource::unsupported()
        };

        Self {
            inner: Arc::new(AppStateInner {
                config,
                session: Arc::new(session),
                location: Arc::new(location),
                observer: Mutex::new(None),
            }),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }

    pub fn location(&self) -> &Arc<BroadcastLocationSource> {
        &self.inner.location
    }

    /// (Re)starts observation: any previous observer is torn down, the
    /// session re-enters pending and a new subscription is opened before
    /// this returns, so no published sample is missed. Concurrent restarts
    /// are serialised on the observer slot, leaving exactly one observer.
    pub async fn start_observing(&self) {
        let mut observer = self.inner.observer.lock().await;
        shutdown(observer.take()).await;

        let session = Arc::clone(&self.inner.session);
        session.begin_observing().await;

        let source: Arc<dyn LocationSource> = self.inner.location.clone();
        let subscription = match Subscription::open(source) {
            Ok(subscription) => subscription,
            Err(err) => {
                session.on_error(err).await;
                return;
            }
        };
        let sample_timeout = self.inner.config.location_timeout;

        *observer = Some(tokio::spawn(async move {
            session.observe(Ok(subscription), sample_timeout).await;
        }));
    }

    pub async fn stop_observing(&self) {
        let mut observer = self.inner.observer.lock().await;
        shutdown(observer.take()).await;
    }
}

/// Aborts an observer and waits for it to drop its subscription and timer.
async fn shutdown(handle: Option<JoinHandle<()>>) {
    if let Some(handle) = handle {
        handle.abort();
        let _ = handle.await;
    }
}
