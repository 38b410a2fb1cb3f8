pub mod report;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for deident
#[derive(Parser, Debug)]
#[command(name = "deident")]
#[command(about = "DICOM batch anonymization tool")]
#[command(version)]
pub struct Cli {
    /// DICOM files to anonymize together as one batch
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Directory to write anonymized files to
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Filename prefix for anonymized files
    #[arg(long, default_value = "anon_")]
    pub prefix: String,

    /// Organization UID root for generated UIDs
    #[arg(long, value_name = "ROOT")]
    pub uid_root: Option<String>,

    /// Output format for the action summary
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
    /// Output file paths only (one per line)
    Paths,
}
