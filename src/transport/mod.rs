//! Transport layer: the interactive dashboard and one-shot CLI commands

pub mod cli;

pub use cli::OutputFormat;
