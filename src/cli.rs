use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::codec::CsvQuoting;
use crate::schema::CandidateFormat;

#[derive(Debug, Parser)]
#[command(author, version, about = "Normalize recruiter candidate sheets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Deduplicate and remap candidate sheets, writing the processed files
    Process(ProcessArgs),
    /// Preview the first few normalized rows of a single sheet
    Preview(PreviewArgs),
    /// Show the column mapping for each candidate format
    Formats,
}

#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// One or more .csv, .xlsx, or .zip files to process
    #[arg(short = 'i', long = "input", required = true, action = clap::ArgAction::Append)]
    pub inputs: Vec<PathBuf>,
    /// Directory for processed output (defaults to the current directory)
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Option<PathBuf>,
    /// Candidate sheet format the columns are mapped against
    #[arg(long, value_enum, default_value = "experience")]
    pub format: CandidateFormat,
    /// CSV parsing mode: `legacy` splits on bare commas, `strict` honours quoting
    #[arg(long = "csv-quoting", value_enum, default_value = "legacy")]
    pub csv_quoting: CsvQuoting,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Write a JSON per-file summary to this path
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input .csv or .xlsx file to preview
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Candidate sheet format the columns are mapped against
    #[arg(long, value_enum, default_value = "experience")]
    pub format: CandidateFormat,
    /// CSV parsing mode: `legacy` splits on bare commas, `strict` honours quoting
    #[arg(long = "csv-quoting", value_enum, default_value = "legacy")]
    pub csv_quoting: CsvQuoting,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}
