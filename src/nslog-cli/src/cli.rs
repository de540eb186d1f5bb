//! CLI argument definitions for nslog

use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nslog")]
#[command(about = "Decode NSLogger binary log files into delimited text", long_about = None)]
#[command(version)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// NSLogger binary files to decode
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Field separator for text output (default ",")
    #[arg(short, long, env = "NSLOG_SEPARATOR")]
    pub separator: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, env = "NSLOG_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Output file, only valid with a single input.
    /// Defaults to the input path with ".txt" (or ".jsonl") appended.
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write decoded output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Stop the walk the way older decoders did (may drop the last message)
    #[arg(long)]
    pub legacy_boundary: bool,

    /// Fail when a message's declared size doesn't match its parts
    #[arg(long)]
    pub strict: bool,

    /// Accept application-defined part keys (100 and above)
    #[arg(long)]
    pub user_keys: bool,

    /// Config file (defaults to <config dir>/nslog/config.toml)
    #[arg(long, env = "NSLOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Output format for decoded messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One separator-delimited line per message
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl OutputFormat {
    /// Extension appended to the input path for output files
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "jsonl",
        }
    }
}
