use super::{ModelLoadError, ModelParameters, ModelSource};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type LoadResult = Result<Arc<ModelParameters>, ModelLoadError>;
type InFlightLoad = Shared<BoxFuture<'static, LoadResult>>;

enum LoadState {
    Empty,
    Loading(InFlightLoad),
    Loaded(Arc<ModelParameters>),
}

/// Loads the model parameters once and shares them read-only afterwards.
///
/// Callers arriving while a load is in flight wait for that load and all see
/// its outcome, success or failure. A failed load leaves the store empty so a
/// later call starts a fresh attempt.
pub struct ModelStore {
    source: Arc<ModelSource>,
    state: Mutex<LoadState>,
    load_attempts: AtomicUsize,
}

impl ModelStore {
    pub fn new(source: ModelSource) -> Self {
        Self {
            source: Arc::new(source),
            state: Mutex::new(LoadState::Empty),
            load_attempts: AtomicUsize::new(0),
        }
    }

    /// Store that is already loaded, for callers holding parameters in hand
    pub fn with_parameters(params: ModelParameters) -> Self {
        Self {
            source: Arc::new(ModelSource::Inline(String::new())),
            state: Mutex::new(LoadState::Loaded(Arc::new(params))),
            load_attempts: AtomicUsize::new(0),
        }
    }

    pub fn source(&self) -> &ModelSource {
        &self.source
    }

    pub async fn get(&self) -> LoadResult {
        let load = {
            let mut state = self.lock_state();
            let in_flight = match &*state {
                LoadState::Loaded(params) => return Ok(Arc::clone(params)),
                LoadState::Loading(load) => Some(load.clone()),
                LoadState::Empty => None,
            };

            match in_flight {
                Some(load) => load,
                None => {
                    let load = self.start_load();
                    *state = LoadState::Loading(load.clone());
                    load
                }
            }
        };

        let result = load.clone().await;

        // Only the attempt that is still current may settle the state
        let mut state = self.lock_state();
        let is_current = matches!(&*state, LoadState::Loading(current) if current.ptr_eq(&load));
        if is_current {
            *state = match &result {
                Ok(params) => LoadState::Loaded(Arc::clone(params)),
                Err(_) => LoadState::Empty,
            };
        }

        result
    }

    fn start_load(&self) -> InFlightLoad {
        self.load_attempts.fetch_add(1, Ordering::SeqCst);
        let source = Arc::clone(&self.source);

        async move {
            log::info!("Loading model parameters from {}", source);
            match source.load().await {
                Ok(params) => {
                    log::info!("Loaded model with {} features", params.len());
                    Ok(Arc::new(params))
                }
                Err(e) => {
                    log::error!("Failed to load model from {}: {}", source, e);
                    Err(e)
                }
            }
        }
        .boxed()
        .shared()
    }

    fn lock_state(&self) -> MutexGuard<'_, LoadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Parameters if a load has already completed
    pub fn loaded(&self) -> Option<Arc<ModelParameters>> {
        match &*self.lock_state() {
            LoadState::Loaded(params) => Some(Arc::clone(params)),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded().is_some()
    }

    pub fn load_attempts(&self) -> usize {
        self.load_attempts.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for ModelStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelStore")
            .field("source", &self.source)
            .field("loaded", &self.is_loaded())
            .field("load_attempts", &self.load_attempts())
            .finish()
    }
}
