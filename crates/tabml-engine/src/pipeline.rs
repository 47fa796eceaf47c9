//! Inference pipeline state machine.
//!
//! One pipeline owns one model session and the preprocessing configuration
//! loaded with it. Requests run one at a time through `&mut self`; hosts that
//! dispatch from several threads wrap it in [`crate::SharedPipeline`].

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tracing::{debug, error, info, info_span};

use tabml_config::{ConfigSource, load_preprocessor_config};
use tabml_model::{
    ConfigLoadWarning, InferenceResponse, PipelineState, PipelineStatus, Prediction,
    PreprocessorConfig, Record,
};
use tabml_transform::build_tensor;

use crate::backend::{InferenceBackend, InferenceSession};
use crate::error::{EngineError, ModelLoadError, PipelineError};
use crate::settings::PipelineSettings;
use crate::sink::{StatusSink, TracingSink};

/// Summary of a successful load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub model_path: PathBuf,
    pub config_path: PathBuf,
    pub config_source: ConfigSource,
    pub config_warning: Option<ConfigLoadWarning>,
    /// Configured feature count; zero when records are used in their own order.
    pub feature_count: usize,
    /// Model input the tensor is submitted under.
    pub input_name: String,
}

struct LoadedModel<S> {
    session: S,
    input_name: String,
    config: PreprocessorConfig,
}

pub struct InferencePipeline<B: InferenceBackend> {
    backend: B,
    settings: PipelineSettings,
    state: PipelineState,
    loaded: Option<LoadedModel<B::Session>>,
    sink: Box<dyn StatusSink>,
}

impl<B: InferenceBackend> InferencePipeline<B> {
    /// Create an unloaded pipeline. Status changes go to `tracing` until a
    /// sink is attached.
    pub fn new(backend: B, settings: PipelineSettings) -> Self {
        Self {
            backend,
            settings,
            state: PipelineState::Unloaded,
            loaded: None,
            sink: Box::new(TracingSink),
        }
    }

    /// Builder method to route status changes to `sink`.
    pub fn with_status_sink(mut self, sink: impl StatusSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Active preprocessing configuration, if a model is loaded.
    pub fn config(&self) -> Option<&PreprocessorConfig> {
        self.loaded.as_ref().map(|loaded| &loaded.config)
    }

    pub fn input_name(&self) -> Option<&str> {
        self.loaded.as_ref().map(|loaded| loaded.input_name.as_str())
    }

    pub fn is_ready(&self) -> bool {
        self.state.accepts_requests() && self.loaded.is_some()
    }

    /// Load (or reload) the model and its preprocessing configuration.
    ///
    /// Any previous session is released first. On failure the pipeline is
    /// left in [`PipelineState::LoadError`] until the next load.
    pub fn load(&mut self) -> Result<LoadReport, PipelineError> {
        if !self.state.can_load() {
            return Err(PipelineError::LoadInProgress);
        }

        let model_path = self.settings.resolve_model_path();
        let config_path = self.settings.resolve_config_path(&model_path);
        let span = info_span!("model_load", model = %model_path.display());
        let _guard = span.enter();

        self.loaded = None;
        self.set_state(PipelineState::Loading);

        match self.open_model(&model_path, &config_path) {
            Ok((loaded, report)) => {
                info!(
                    engine = self.backend.name(),
                    input = %report.input_name,
                    config = %report.config_path.display(),
                    features = report.feature_count,
                    "model loaded"
                );
                self.loaded = Some(loaded);
                self.set_state(PipelineState::Ready);
                Ok(report)
            }
            Err(load_error) => {
                error!(error = %load_error, "model load failed");
                self.set_state(PipelineState::LoadError);
                Err(load_error.into())
            }
        }
    }

    fn open_model(
        &self,
        model_path: &Path,
        config_path: &Path,
    ) -> Result<(LoadedModel<B::Session>, LoadReport), ModelLoadError> {
        fs::metadata(model_path).map_err(|source| ModelLoadError::ModelNotAccessible {
            path: model_path.to_path_buf(),
            source,
        })?;

        let loaded_config = load_preprocessor_config(config_path);

        let session_error = |source: EngineError| ModelLoadError::Session {
            path: model_path.to_path_buf(),
            source,
        };
        let session = self.backend.open(model_path).map_err(session_error)?;
        let input_name = session
            .input_names()
            .first()
            .cloned()
            .ok_or_else(|| session_error(EngineError::NoInputs))?;

        let report = LoadReport {
            model_path: model_path.to_path_buf(),
            config_path: loaded_config.path,
            config_source: loaded_config.source,
            config_warning: loaded_config.warning,
            feature_count: loaded_config.config.feature_order.len(),
            input_name: input_name.clone(),
        };
        let loaded = LoadedModel {
            session,
            input_name,
            config: loaded_config.config,
        };
        Ok((loaded, report))
    }

    /// Run one record through the model.
    ///
    /// Fails with [`PipelineError::NotReady`] without touching the state when
    /// no session is loaded. Per-request failures leave the pipeline ready.
    pub fn try_infer(&mut self, record: &Record) -> Result<Prediction, PipelineError> {
        if !self.is_ready() {
            error!(state = ?self.state, "inference requested before model is ready");
            return Err(PipelineError::NotReady);
        }

        self.set_state(PipelineState::Inferring);
        let outcome = match self.loaded.as_mut() {
            Some(loaded) => run_record(loaded, &self.settings, record),
            None => Err(PipelineError::NotReady),
        };
        self.state = PipelineState::Ready;

        match &outcome {
            Ok(prediction) => {
                debug!(%prediction, "inference complete");
                self.sink.publish(PipelineStatus::Ready);
            }
            Err(failure) => {
                error!(error = %failure, "inference failed");
                self.sink.publish(PipelineStatus::Error);
            }
        }
        outcome
    }

    /// Run one record and package the outcome as a response payload.
    ///
    /// Every call yields exactly one response; failures become
    /// [`InferenceResponse::Error`].
    pub fn infer(&mut self, record: &Record) -> InferenceResponse {
        respond(self.try_infer(record))
    }

    /// Release the session and configuration.
    pub fn close(&mut self) {
        if self.loaded.take().is_some() {
            info!("model session released");
        }
        self.set_state(PipelineState::Unloaded);
    }

    fn set_state(&mut self, state: PipelineState) {
        self.state = state;
        self.sink.publish(PipelineStatus::from(state));
    }
}

fn run_record<S: InferenceSession>(
    loaded: &mut LoadedModel<S>,
    settings: &PipelineSettings,
    record: &Record,
) -> Result<Prediction, PipelineError> {
    let prepared = build_tensor(record, &loaded.config)?;
    for unknown in &prepared.unknown {
        debug!(feature = %unknown.feature, code = unknown.code, "fallback category code used");
    }

    let outputs = loaded.session.run(&loaded.input_name, &prepared.tensor)?;
    let (name, tensor) = outputs
        .primary(&settings.label_output)
        .ok_or(EngineError::MissingOutput)?;
    let value = tensor.first().ok_or_else(|| EngineError::EmptyOutput {
        name: name.to_string(),
    })?;
    Ok(Prediction::from_engine_value(
        value,
        settings.prediction_policy,
    ))
}

/// Package an inference outcome as a response payload.
pub fn respond(outcome: Result<Prediction, PipelineError>) -> InferenceResponse {
    match outcome {
        Ok(prediction) => InferenceResponse::success(prediction, timestamp_now()),
        Err(failure) => InferenceResponse::error(failure.to_string()),
    }
}

/// Current UTC time as an RFC 3339 timestamp with millisecond precision.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
