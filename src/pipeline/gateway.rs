use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::ClassifyError;
use crate::pipeline::classify::Classifier;
use crate::types::session::ClassificationState;

/// Shown before the first classification and whenever the service fails.
pub const FALLBACK_LABEL: &str = "🤔";
/// Applied directly for a stationary reading, without asking the service.
pub const STATIONARY_LABEL: &str = "🚶";

/// Debounced caller of a [`Classifier`].
///
/// Every request gets a fresh id. Only the latest request of a burst
/// survives the quiescence window, and a response is applied only while its
/// id is still the latest one issued.
#[derive(Clone)]
pub struct ClassifierGateway {
    inner: Arc<Inner>,
}

struct Inner {
    classifier: Arc<dyn Classifier>,
    debounce: Duration,
    timeout: Duration,
    latest_request: AtomicU64,
    pending: Mutex<Option<JoinHandle<()>>>,
    state: watch::Sender<ClassificationState>,
}

impl Inner {
    fn lock_pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ClassifierGateway {
    pub fn new(classifier: Arc<dyn Classifier>, debounce: Duration, timeout: Duration) -> Self {
        let (state, _) = watch::channel(ClassificationState {
            current_label: FALLBACK_LABEL.to_string(),
            pending_request_speed: None,
        });

        Self {
            inner: Arc::new(Inner {
                classifier,
                debounce,
                timeout,
                latest_request: AtomicU64::new(0),
                pending: Mutex::new(None),
                state,
            }),
        }
    }

    /// Schedules a lookup for `speed_kmh`, replacing any lookup still waiting
    /// out its debounce window. Must be called within a tokio runtime.
    pub fn request_label(&self, speed_kmh: f64) {
        let speed_kmh = speed_kmh.max(0.0);

        let mut pending = self.inner.lock_pending();
        let request_id = self.inner.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(timer) = pending.take() {
            timer.abort();
        }

        if speed_kmh <= 0.0 {
            self.inner.state.send_modify(|state| {
                state.current_label = STATIONARY_LABEL.to_string();
                state.pending_request_speed = None;
            });
            return;
        }

        self.inner
            .state
            .send_modify(|state| state.pending_request_speed = Some(speed_kmh));

        let inner = Arc::clone(&self.inner);
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            // Once dispatched the call runs to completion; only its result can be dropped.
            tokio::spawn(dispatch(inner, request_id, speed_kmh));
        }));
    }

    /// Disarms a timer that has not fired yet. Calls already dispatched still land.
    pub fn cancel_pending(&self) {
        let mut pending = self.inner.lock_pending();
        if let Some(timer) = pending.take() {
            timer.abort();
        }
        self.inner
            .state
            .send_modify(|state| state.pending_request_speed = None);
    }

    pub fn state(&self) -> ClassificationState {
        self.inner.state.borrow().clone()
    }

    pub fn current_label(&self) -> String {
        self.inner.state.borrow().current_label.clone()
    }
}

async fn dispatch(inner: Arc<Inner>, request_id: u64, speed_kmh: f64) {
    tracing::debug!("Classifying {:.1} km/h (request {})", speed_kmh, request_id);

    let outcome = match tokio::time::timeout(inner.timeout, inner.classifier.classify(speed_kmh)).await {
        Ok(result) => result,
        Err(_) => Err(ClassifyError::Timeout),
    };

    let label = match outcome {
        Ok(label) if !label.trim().is_empty() => label,
        Ok(_) => {
            tracing::warn!("Classifier returned an empty label for {:.1} km/h", speed_kmh);
            FALLBACK_LABEL.to_string()
        }
        Err(err) => {
            tracing::warn!("Falling back to default label: {}", err);
            FALLBACK_LABEL.to_string()
        }
    };

    let _pending = inner.lock_pending();
    if inner.latest_request.load(Ordering::SeqCst) != request_id {
        tracing::debug!("Discarding stale label for request {}", request_id);
        return;
    }

    inner.state.send_modify(|state| {
        state.current_label = label;
        state.pending_request_speed = None;
    });
}
