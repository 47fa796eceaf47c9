//! Thread-shared pipeline handle.
//!
//! Loads run on a background thread; while one is in flight requests fail
//! fast with [`PipelineError::NotReady`] instead of waiting on the lock, and
//! a second load is refused. Requests never wait on the lock: one arriving
//! while another is running fails with [`PipelineError::Busy`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::thread::{self, JoinHandle};

use tabml_model::{InferenceResponse, PipelineState, Prediction, Record};

use crate::backend::InferenceBackend;
use crate::error::PipelineError;
use crate::pipeline::{InferencePipeline, LoadReport, respond};

pub struct SharedPipeline<B: InferenceBackend> {
    inner: Arc<Mutex<InferencePipeline<B>>>,
    loading: Arc<AtomicBool>,
}

impl<B: InferenceBackend> Clone for SharedPipeline<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            loading: Arc::clone(&self.loading),
        }
    }
}

/// Clears the loading flag when the load finishes, including by panic.
struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self, PipelineError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PipelineError::LoadInProgress)?;
        Ok(Self(Arc::clone(flag)))
    }
}

impl Drop for LoadingFlag {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<B> SharedPipeline<B>
where
    B: InferenceBackend + Send + 'static,
    B::Session: Send,
{
    pub fn new(pipeline: InferencePipeline<B>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pipeline)),
            loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Start a load on a background thread.
    pub fn spawn_load(
        &self,
    ) -> Result<JoinHandle<Result<LoadReport, PipelineError>>, PipelineError> {
        let flag = LoadingFlag::acquire(&self.loading)?;
        let inner = Arc::clone(&self.inner);
        Ok(thread::spawn(move || {
            let _flag = flag;
            let mut pipeline = inner.lock().map_err(|_| PipelineError::Poisoned)?;
            pipeline.load()
        }))
    }

    /// Load on the calling thread.
    pub fn load(&self) -> Result<LoadReport, PipelineError> {
        let _flag = LoadingFlag::acquire(&self.loading)?;
        self.lock()?.load()
    }

    pub fn try_infer(&self, record: &Record) -> Result<Prediction, PipelineError> {
        if self.is_loading() {
            return Err(PipelineError::NotReady);
        }
        let mut pipeline = match self.inner.try_lock() {
            Ok(pipeline) => pipeline,
            // The loading flag is set before a load takes the lock and
            // cleared after it releases it.
            Err(TryLockError::WouldBlock) if self.is_loading() => {
                return Err(PipelineError::NotReady);
            }
            Err(TryLockError::WouldBlock) => return Err(PipelineError::Busy),
            Err(TryLockError::Poisoned(_)) => return Err(PipelineError::Poisoned),
        };
        pipeline.try_infer(record)
    }

    pub fn infer(&self, record: &Record) -> InferenceResponse {
        respond(self.try_infer(record))
    }

    /// Current lifecycle state. Reports `Loading` without waiting while a
    /// load is in flight.
    pub fn state(&self) -> PipelineState {
        if self.is_loading() {
            return PipelineState::Loading;
        }
        self.lock()
            .map(|pipeline| pipeline.state())
            .unwrap_or(PipelineState::LoadError)
    }

    pub fn close(&self) -> Result<(), PipelineError> {
        if self.is_loading() {
            return Err(PipelineError::LoadInProgress);
        }
        self.lock()?.close();
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, InferencePipeline<B>>, PipelineError> {
        self.inner.lock().map_err(|_| PipelineError::Poisoned)
    }
}
