//! Encoding engine contract and lifecycle management.
//!
//! An [`EncodingEngine`] is a black box with its own working filesystem: files
//! are written into it by name, an encode is run against those names, and the
//! output is read back. [`EngineHandle`] owns one engine, loads it lazily and
//! serializes jobs against it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};

use clipsmith_common::error::{ClipsmithError, ClipsmithResult};

/// Progress sink for one engine invocation, fed fractions in `[0, 1]`.
pub type ExecProgress<'a> = &'a (dyn Fn(f64) + Send + Sync);

/// An encoding engine with a private working filesystem.
#[async_trait::async_trait]
pub trait EncodingEngine: Send + Sync {
    /// Prepare the engine for use. Called at most once per successful load.
    async fn load(&self) -> ClipsmithResult<()>;

    /// Write a file into the engine's working filesystem.
    async fn write_file(&self, name: &str, data: &[u8]) -> ClipsmithResult<()>;

    /// Read a file back out of the working filesystem.
    async fn read_file(&self, name: &str) -> ClipsmithResult<Vec<u8>>;

    /// Remove a file from the working filesystem.
    async fn delete_file(&self, name: &str) -> ClipsmithResult<()>;

    /// Run one encode. `args` name inputs and outputs by working-filesystem
    /// name; the engine adds nothing but its own housekeeping flags.
    async fn exec(&self, args: &[String], progress: ExecProgress<'_>) -> ClipsmithResult<()>;

    /// Engine name for logs.
    fn name(&self) -> &str;
}

/// Observable lifecycle state of an [`EngineHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Unloaded,
    Loading,
    Ready,
}

type LoadFuture = Shared<BoxFuture<'static, Result<(), String>>>;

enum LoadState {
    Unloaded,
    Loading(LoadFuture),
    Ready,
}

/// Exclusive right to run a job against the engine.
pub type JobGuard<'a> = tokio::sync::MutexGuard<'a, ()>;

/// Owns one engine instance.
///
/// Concurrent [`ensure_ready`](Self::ensure_ready) calls during a load all
/// await the same load. A failed load returns the handle to
/// [`EngineState::Unloaded`] so the next call starts over.
pub struct EngineHandle {
    engine: Arc<dyn EncodingEngine>,
    state: Mutex<LoadState>,
    jobs: tokio::sync::Mutex<()>,
}

impl EngineHandle {
    pub fn new(engine: Arc<dyn EncodingEngine>) -> Self {
        Self {
            engine,
            state: Mutex::new(LoadState::Unloaded),
            jobs: tokio::sync::Mutex::new(()),
        }
    }

    pub fn engine(&self) -> &dyn EncodingEngine {
        self.engine.as_ref()
    }

    pub fn state(&self) -> EngineState {
        match &*self.lock_state() {
            LoadState::Unloaded => EngineState::Unloaded,
            LoadState::Loading(_) => EngineState::Loading,
            LoadState::Ready => EngineState::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == EngineState::Ready
    }

    /// Load the engine if needed, joining any load already in flight.
    pub async fn ensure_ready(&self) -> ClipsmithResult<()> {
        let load = {
            let mut state = self.lock_state();
            match &*state {
                LoadState::Ready => return Ok(()),
                LoadState::Loading(load) => load.clone(),
                LoadState::Unloaded => {
                    let engine = Arc::clone(&self.engine);
                    tracing::info!(engine = engine.name(), "Loading encoding engine");
                    let load = async move { engine.load().await.map_err(|e| e.detail()) }
                        .boxed()
                        .shared();
                    *state = LoadState::Loading(load.clone());
                    load
                }
            }
        };

        let result = load.clone().await;

        {
            let mut state = self.lock_state();
            // Only the load we awaited may settle the state.
            if let LoadState::Loading(current) = &*state {
                if current.ptr_eq(&load) {
                    *state = match &result {
                        Ok(()) => {
                            tracing::info!(engine = self.engine.name(), "Encoding engine ready");
                            LoadState::Ready
                        }
                        Err(message) => {
                            tracing::error!(
                                engine = self.engine.name(),
                                error = %message,
                                "Encoding engine failed to load"
                            );
                            LoadState::Unloaded
                        }
                    };
                }
            }
        }

        result.map_err(ClipsmithError::load)
    }

    /// Ensure the engine is loaded, then wait for exclusive use of it.
    ///
    /// Waiters are served in FIFO order.
    pub async fn begin_job(&self) -> ClipsmithResult<JobGuard<'_>> {
        self.ensure_ready().await?;
        Ok(self.jobs.lock().await)
    }

    fn lock_state(&self) -> MutexGuard<'_, LoadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("engine", &self.engine.name())
            .field("state", &self.state())
            .finish()
    }
}
