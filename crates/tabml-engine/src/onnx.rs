//! ONNX Runtime backend.
//!
//! Compiled against `ort` only with the `onnx` feature. Without it a stub
//! `OnnxBackend` is provided whose sessions never open, so hosts build the
//! same way either way and fail at load time instead.

#[cfg(feature = "onnx")]
mod inner {
    use std::fmt::Display;
    use std::path::Path;

    use ort::execution_providers::CPUExecutionProvider;
    use ort::session::Session;
    use ort::value::{DynValue, Tensor};
    use tracing::{debug, info};

    use tabml_transform::InputTensor;

    use crate::backend::{EngineOutputs, InferenceBackend, InferenceSession, OutputTensor};
    use crate::error::EngineError;

    /// Opens ONNX models on the CPU execution provider only.
    #[derive(Debug, Clone, Default)]
    pub struct OnnxBackend {
        intra_threads: Option<usize>,
    }

    impl OnnxBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Whether sessions can be opened in this build.
        pub const fn is_available() -> bool {
            true
        }

        /// Limit the intra-op thread pool.
        pub fn with_intra_threads(mut self, threads: usize) -> Self {
            self.intra_threads = Some(threads);
            self
        }
    }

    pub struct OnnxSession {
        session: Session,
        input_names: Vec<String>,
        output_names: Vec<String>,
    }

    fn open_error(error: impl Display) -> EngineError {
        EngineError::SessionOpen {
            message: error.to_string(),
        }
    }

    fn run_error(error: impl Display) -> EngineError {
        EngineError::Run {
            message: error.to_string(),
        }
    }

    impl InferenceBackend for OnnxBackend {
        type Session = OnnxSession;

        fn name(&self) -> &'static str {
            "onnxruntime"
        }

        fn open(&self, model_path: &Path) -> Result<OnnxSession, EngineError> {
            let mut builder = Session::builder()
                .map_err(open_error)?
                .with_execution_providers([CPUExecutionProvider::default().build()])
                .map_err(open_error)?;
            if let Some(threads) = self.intra_threads {
                builder = builder.with_intra_threads(threads).map_err(open_error)?;
            }
            let session = builder.commit_from_file(model_path).map_err(open_error)?;

            let input_names: Vec<String> = session
                .inputs()
                .iter()
                .map(|input| input.name().to_string())
                .collect();
            let output_names: Vec<String> = session
                .outputs()
                .iter()
                .map(|output| output.name().to_string())
                .collect();
            info!(
                inputs = ?input_names,
                outputs = ?output_names,
                "ONNX session opened"
            );

            Ok(OnnxSession {
                session,
                input_names,
                output_names,
            })
        }
    }

    impl InferenceSession for OnnxSession {
        fn input_names(&self) -> &[String] {
            &self.input_names
        }

        fn output_names(&self) -> &[String] {
            &self.output_names
        }

        fn run(
            &mut self,
            input_name: &str,
            tensor: &InputTensor,
        ) -> Result<EngineOutputs, EngineError> {
            let [rows, cols] = tensor.shape();
            let input = Tensor::from_array((vec![rows as i64, cols as i64], tensor.data().to_vec()))
                .map_err(run_error)?;

            let outputs = self
                .session
                .run(ort::inputs![input_name => input])
                .map_err(run_error)?;

            let mut result = EngineOutputs::new();
            for name in &self.output_names {
                let Some(value) = outputs.get(name.as_str()) else {
                    continue;
                };
                match extract_numeric(value) {
                    Some(output) => result.push(name.clone(), output),
                    None => debug!(output = %name, "skipping non-numeric output"),
                }
            }
            Ok(result)
        }
    }

    /// Widen a numeric tensor output to f64. Maps and sequences yield `None`.
    fn extract_numeric(value: &DynValue) -> Option<OutputTensor> {
        if let Ok((shape, data)) = value.try_extract_tensor::<f32>() {
            return Some(OutputTensor::new(
                shape.iter().copied().collect(),
                data.iter().map(|v| f64::from(*v)).collect(),
            ));
        }
        if let Ok((shape, data)) = value.try_extract_tensor::<f64>() {
            return Some(OutputTensor::new(shape.iter().copied().collect(), data.to_vec()));
        }
        if let Ok((shape, data)) = value.try_extract_tensor::<i64>() {
            return Some(OutputTensor::new(
                shape.iter().copied().collect(),
                data.iter().map(|v| *v as f64).collect(),
            ));
        }
        if let Ok((shape, data)) = value.try_extract_tensor::<i32>() {
            return Some(OutputTensor::new(
                shape.iter().copied().collect(),
                data.iter().map(|v| f64::from(*v)).collect(),
            ));
        }
        None
    }
}

#[cfg(not(feature = "onnx"))]
mod inner {
    use std::path::Path;

    use tabml_transform::InputTensor;

    use crate::backend::{EngineOutputs, InferenceBackend, InferenceSession};
    use crate::error::EngineError;

    const UNAVAILABLE: &str = "built without the 'onnx' feature";

    /// Stub `OnnxBackend` when the `onnx` feature is not enabled.
    #[derive(Debug, Clone, Default)]
    pub struct OnnxBackend;

    impl OnnxBackend {
        pub fn new() -> Self {
            Self
        }

        pub const fn is_available() -> bool {
            false
        }

        pub fn with_intra_threads(self, _threads: usize) -> Self {
            self
        }
    }

    /// Never constructed without the `onnx` feature.
    pub struct OnnxSession {
        names: Vec<String>,
    }

    impl InferenceBackend for OnnxBackend {
        type Session = OnnxSession;

        fn name(&self) -> &'static str {
            "onnxruntime"
        }

        fn open(&self, _model_path: &Path) -> Result<OnnxSession, EngineError> {
            Err(EngineError::Unavailable(UNAVAILABLE.to_string()))
        }
    }

    impl InferenceSession for OnnxSession {
        fn input_names(&self) -> &[String] {
            &self.names
        }

        fn output_names(&self) -> &[String] {
            &self.names
        }

        fn run(
            &mut self,
            _input_name: &str,
            _tensor: &InputTensor,
        ) -> Result<EngineOutputs, EngineError> {
            Err(EngineError::Unavailable(UNAVAILABLE.to_string()))
        }
    }
}

pub use inner::{OnnxBackend, OnnxSession};
