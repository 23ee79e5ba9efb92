//! Multi-file request handling: classify inputs, expand ZIP archives, run
//! each sheet through the pipeline, and package the results.

use std::io::{Cursor, Read, Write};
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};
use regex::Regex;
use serde::Serialize;
use zip::{CompressionMethod, ZipArchive, ZipWriter, write::SimpleFileOptions};

use crate::codec::{self, DecodeOptions, TableFormat};
use crate::errors::PipelineError;
use crate::schema::CandidateFormat;
use crate::transform::{self, TableStats};

/// One uploaded input, already read into memory.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// One normalized sheet ready to be written or bundled.
#[derive(Debug)]
pub struct ProcessedFile {
    pub name: String,
    pub format: TableFormat,
    pub bytes: Vec<u8>,
}

/// Per-sheet summary emitted with `--summary`.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub input: String,
    pub output: String,
    pub content_type: &'static str,
    #[serde(flatten)]
    pub stats: TableStats,
}

/// What the request produced: one file as-is, or several bundled into a ZIP.
#[derive(Debug)]
pub enum BatchOutput {
    Single(ProcessedFile),
    Bundle {
        name: String,
        bytes: Vec<u8>,
        members: usize,
    },
}

#[derive(Debug)]
pub struct BatchResult {
    pub output: BatchOutput,
    pub reports: Vec<FileReport>,
}

/// Runs every eligible input through the pipeline. Files that are neither
/// tables nor archives are skipped; a table that fails to process aborts the
/// whole request.
pub fn process_request(
    files: Vec<SourceFile>,
    format: CandidateFormat,
    options: &DecodeOptions,
) -> Result<BatchResult> {
    let mut outputs: Vec<ProcessedFile> = Vec::new();
    let mut reports: Vec<FileReport> = Vec::new();

    for file in &files {
        if is_archive(&file.name) {
            expand_archive(file, format, options, &mut outputs, &mut reports)?;
        } else if let Some(table_format) = TableFormat::from_name(&file.name) {
            let (processed, report) =
                process_single(&file.name, &file.bytes, table_format, format, options)?;
            outputs.push(processed);
            reports.push(report);
        } else {
            debug!("Skipping unsupported file '{}'", file.name);
        }
    }

    let output = match outputs.len() {
        0 => return Err(PipelineError::NoValidFiles.into()),
        1 => BatchOutput::Single(outputs.remove(0)),
        _ => {
            let bytes = bundle(&outputs)?;
            BatchOutput::Bundle {
                name: format!("processed_files_{}.zip", Utc::now().timestamp_millis()),
                bytes,
                members: outputs.len(),
            }
        }
    };

    Ok(BatchResult { output, reports })
}

fn is_archive(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

fn expand_archive(
    file: &SourceFile,
    format: CandidateFormat,
    options: &DecodeOptions,
    outputs: &mut Vec<ProcessedFile>,
    reports: &mut Vec<FileReport>,
) -> Result<()> {
    let mut archive = ZipArchive::new(Cursor::new(file.bytes.as_slice()))
        .with_context(|| format!("opening archive '{}'", file.name))?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .with_context(|| format!("reading entry {index} of '{}'", file.name))?;
        if entry.is_dir() {
            continue;
        }
        let Some(table_format) = TableFormat::from_name(entry.name()) else {
            debug!("Skipping archive entry '{}'", entry.name());
            continue;
        };
        // Entries may sit in subdirectories; output names keep only the
        // file name itself.
        let entry_name = base_name(entry.name());
        let mut bytes = Vec::with_capacity(entry_capacity(entry.size()));
        entry
            .read_to_end(&mut bytes)
            .with_context(|| format!("reading archive entry '{entry_name}'"))?;

        let (processed, report) =
            process_single(&entry_name, &bytes, table_format, format, options)?;
        outputs.push(processed);
        reports.push(report);
    }
    Ok(())
}

fn process_single(
    name: &str,
    bytes: &[u8],
    table_format: TableFormat,
    format: CandidateFormat,
    options: &DecodeOptions,
) -> Result<(ProcessedFile, FileReport)> {
    let table =
        codec::decode(bytes, table_format, options).with_context(|| format!("decoding '{name}'"))?;
    let (output, stats) =
        transform::normalize(&table, format).with_context(|| format!("normalizing '{name}'"))?;
    let encoded =
        codec::encode(&output, table_format).with_context(|| format!("encoding '{name}'"))?;

    let output_name = processed_name(name);
    info!(
        "Processed '{name}' -> '{output_name}' ({} of {} row(s) kept)",
        stats.rows_emitted, stats.rows_read
    );

    Ok((
        ProcessedFile {
            name: output_name.clone(),
            format: table_format,
            bytes: encoded,
        },
        FileReport {
            input: name.to_string(),
            output: output_name,
            content_type: table_format.content_type(),
            stats,
        },
    ))
}

fn processed_name(input: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"));
    format!("processed_{}", whitespace.replace_all(input, "_"))
}

fn bundle(outputs: &[ProcessedFile]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let zip_options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in outputs {
        writer
            .start_file(file.name.as_str(), zip_options)
            .with_context(|| format!("adding '{}' to bundle", file.name))?;
        writer
            .write_all(&file.bytes)
            .with_context(|| format!("writing '{}' into bundle", file.name))?;
    }

    let cursor = writer.finish().context("finalizing bundle")?;
    Ok(cursor.into_inner())
}

/// Declared entry sizes are archive metadata and may lie; the preallocation
/// hint is capped.
fn entry_capacity(declared: u64) -> usize {
    const MAX_PREALLOC: u64 = 1 << 20;
    declared.min(MAX_PREALLOC) as usize
}

fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string()
}
