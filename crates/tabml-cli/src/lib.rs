//! Command-line host for tabular model inference.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
