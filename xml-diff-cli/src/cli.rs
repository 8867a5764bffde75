use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "xml-diff")]
#[command(about = "Compare two XML documents by structure rather than by text")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Compare two XML files and show structural differences.
    Diff(DiffArgs),
}

#[derive(Parser, Debug)]
pub struct DiffArgs {
    /// The baseline document.
    pub expected: PathBuf,
    /// The document being compared against the baseline.
    pub actual: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Suppress Added/Removed edits for nodes carrying no properties.
    #[arg(long)]
    pub exclude_empty: bool,
    /// Drop every element with this tag (and its subtree) from both documents
    /// before diffing. May be repeated.
    #[arg(long = "ignore-tag")]
    pub ignore_tag: Vec<String>,
    /// Print only the added/modified/removed counts.
    #[arg(long)]
    pub summary: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
