//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "tabml",
    version,
    about = "Preprocess tabular records and run them through an ONNX model",
    long_about = "Preprocess tabular records and run them through an ONNX model.\n\n\
                  Records are read as newline-delimited JSON objects and one JSON\n\
                  response is written per record."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow raw record values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a model and predict every input record.
    Predict(PredictArgs),

    /// Print the feature vector built for every input record.
    Tensor(TensorArgs),

    /// Show a preprocessor configuration after normalization.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct PredictArgs {
    /// Model file to load.
    #[arg(long = "model", value_name = "PATH")]
    pub model: PathBuf,

    /// Preprocessor config (default: the model path with a .json extension).
    #[arg(long = "preprocessor", value_name = "PATH")]
    pub preprocessor: Option<PathBuf>,

    /// Newline-delimited JSON records ("-" for stdin).
    #[arg(long = "input", value_name = "FILE", default_value = "-")]
    pub input: PathBuf,

    /// Report engine scores without rounding to labels.
    #[arg(long = "raw")]
    pub raw: bool,

    /// Output to read in preference to the first declared output.
    #[arg(long = "label-output", value_name = "NAME", default_value = "label")]
    pub label_output: String,
}

#[derive(Parser)]
pub struct TensorArgs {
    /// Preprocessor config. Without one, records are used in their own order.
    #[arg(long = "preprocessor", value_name = "PATH")]
    pub preprocessor: Option<PathBuf>,

    /// Newline-delimited JSON records ("-" for stdin).
    #[arg(long = "input", value_name = "FILE", default_value = "-")]
    pub input: PathBuf,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Preprocessor config to show.
    #[arg(value_name = "PREPROCESSOR")]
    pub preprocessor: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
