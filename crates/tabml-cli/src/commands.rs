use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::json;
use tracing::{info, info_span, trace};

use tabml_config::{ConfigSource, load_preprocessor_config};
use tabml_engine::{InferenceBackend, InferencePipeline, OnnxBackend, PipelineSettings};
use tabml_model::{InferenceResponse, PredictionPolicy, PreprocessorConfig, Record};
use tabml_transform::build_tensor;

use crate::cli::{InspectArgs, PredictArgs, TensorArgs};
use crate::logging::redact_value;
use crate::summary::config_table;

/// Counts for one pass over the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub records: usize,
    pub failures: usize,
}

pub fn settings_from_args(args: &PredictArgs) -> PipelineSettings {
    let policy = if args.raw {
        PredictionPolicy::Raw
    } else {
        PredictionPolicy::Round
    };
    PipelineSettings::new(&args.model)
        .with_preprocessor_path(args.preprocessor.clone())
        .with_label_output(args.label_output.as_str())
        .with_prediction_policy(policy)
}

pub fn run_predict(args: &PredictArgs) -> Result<RunSummary> {
    if !OnnxBackend::is_available() {
        bail!("this build has no ONNX Runtime backend; rebuild with the 'onnx' feature");
    }
    let mut pipeline = InferencePipeline::new(OnnxBackend::new(), settings_from_args(args));
    pipeline.load().context("load model")?;

    let input = open_input(&args.input)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = predict_records(&mut pipeline, input, &mut out)?;
    pipeline.close();
    Ok(summary)
}

/// Predict every record in `input`, writing one JSON response per record.
///
/// Lines that are not JSON objects produce an error response.
pub fn predict_records<B, R, W>(
    pipeline: &mut InferencePipeline<B>,
    input: R,
    out: &mut W,
) -> Result<RunSummary>
where
    B: InferenceBackend,
    R: BufRead,
    W: Write + ?Sized,
{
    let span = info_span!("predict");
    let _guard = span.enter();
    let mut summary = RunSummary::default();
    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("read input line {line_number}"))?;
        if line.trim().is_empty() {
            continue;
        }
        trace!(line = line_number, record = redact_value(&line), "record received");
        let response = match parse_record(&line) {
            Ok(record) => pipeline.infer(&record),
            Err(error) => {
                InferenceResponse::error(format!("invalid record on line {line_number}: {error}"))
            }
        };
        summary.records += 1;
        if !response.is_success() {
            summary.failures += 1;
        }
        write_json_line(out, &response)?;
    }
    info!(
        records = summary.records,
        failures = summary.failures,
        "predict finished"
    );
    Ok(summary)
}

pub fn run_tensor(args: &TensorArgs) -> Result<RunSummary> {
    let config = match &args.preprocessor {
        Some(path) => load_preprocessor_config(path).config,
        None => PreprocessorConfig::empty(),
    };
    let input = open_input(&args.input)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    tensor_records(&config, input, &mut out)
}

/// Preprocess every record in `input` and write its feature vector.
pub fn tensor_records<R, W>(
    config: &PreprocessorConfig,
    input: R,
    out: &mut W,
) -> Result<RunSummary>
where
    R: BufRead,
    W: Write + ?Sized,
{
    let mut summary = RunSummary::default();
    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("read input line {line_number}"))?;
        if line.trim().is_empty() {
            continue;
        }
        summary.records += 1;
        let record = match parse_record(&line) {
            Ok(record) => record,
            Err(error) => {
                summary.failures += 1;
                let response = InferenceResponse::error(format!(
                    "invalid record on line {line_number}: {error}"
                ));
                write_json_line(out, &response)?;
                continue;
            }
        };
        match build_tensor(&record, config) {
            Ok(prepared) => {
                let value = json!({
                    "features": prepared.features,
                    "shape": prepared.tensor.shape(),
                    "standardized": prepared.standardized,
                    "unknown": prepared.unknown,
                });
                write_json_line(out, &value)?;
            }
            Err(error) => {
                summary.failures += 1;
                write_json_line(out, &InferenceResponse::error(error.to_string()))?;
            }
        }
    }
    Ok(summary)
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let loaded = load_preprocessor_config(&args.preprocessor);
    match loaded.source {
        ConfigSource::File => println!("Config: {}", loaded.path.display()),
        ConfigSource::Missing => println!(
            "Config: {} (not found, numeric inputs only)",
            loaded.path.display()
        ),
        ConfigSource::Fallback => println!("Config: {} (unusable)", loaded.path.display()),
    }
    if let Some(warning) = &loaded.warning {
        println!("Warning: {}", warning.message);
    }
    println!("{}", config_table(&loaded.config));
    Ok(())
}

/// Open a file, or stdin for `-`.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("open input {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn parse_record(line: &str) -> serde_json::Result<Record> {
    serde_json::from_str(line)
}

fn write_json_line<W, T>(out: &mut W, value: &T) -> Result<()>
where
    W: Write + ?Sized,
    T: Serialize + ?Sized,
{
    serde_json::to_writer(&mut *out, value).context("serialize output")?;
    writeln!(out).context("write output")?;
    Ok(())
}
