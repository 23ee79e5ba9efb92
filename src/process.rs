//! `process` and `preview` command implementations.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::info;
use uuid::Uuid;

use crate::{
    batch::{self, BatchOutput, BatchResult, SourceFile},
    cli::{PreviewArgs, ProcessArgs},
    codec::{self, CsvQuoting, DecodeOptions, TableFormat},
    table, transform,
};

pub fn execute(args: &ProcessArgs) -> Result<()> {
    let options = decode_options(args.csv_quoting, args.input_encoding.as_deref())?;

    let mut sources = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        let bytes = fs::read(path).with_context(|| format!("Reading {path:?}"))?;
        sources.push(SourceFile {
            name: file_name(path)?,
            bytes,
        });
    }
    info!("Processing {} input file(s)", sources.len());

    let result = batch::process_request(sources, args.format, &options)?;

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Creating output directory {output_dir:?}"))?;

    match &result.output {
        BatchOutput::Single(file) => {
            let path = output_dir.join(&file.name);
            write_output(&path, &file.bytes)?;
            info!("Wrote {path:?}");
        }
        BatchOutput::Bundle {
            name,
            bytes,
            members,
        } => {
            let path = output_dir.join(name);
            write_output(&path, bytes)?;
            info!("Wrote {path:?} bundling {members} processed file(s)");
        }
    }

    write_summary(args.summary.as_deref(), &result)?;
    Ok(())
}

pub fn preview(args: &PreviewArgs) -> Result<()> {
    let options = decode_options(args.csv_quoting, args.input_encoding.as_deref())?;
    let name = file_name(&args.input)?;
    let table_format = TableFormat::from_name(&name)
        .ok_or_else(|| anyhow!("'{name}' is not a .csv or .xlsx table"))?;
    let bytes = fs::read(&args.input).with_context(|| format!("Reading {:?}", args.input))?;

    let table = codec::decode(&bytes, table_format, &options)
        .with_context(|| format!("Decoding '{name}'"))?;
    let (output, stats) = transform::normalize(&table, args.format)
        .with_context(|| format!("Normalizing '{name}'"))?;

    let rows: Vec<Vec<String>> = output.rows.iter().take(args.rows).cloned().collect();
    table::print_table(&output.headers, &rows);
    info!(
        "Displayed {} of {} normalized row(s) from {:?} ({} duplicate(s) collapsed, {} blank candidate id(s) skipped)",
        rows.len(),
        stats.rows_emitted,
        args.input,
        stats.duplicates_collapsed,
        stats.blank_candidate_ids
    );
    Ok(())
}

fn decode_options(quoting: CsvQuoting, encoding: Option<&str>) -> Result<DecodeOptions> {
    Ok(DecodeOptions {
        quoting,
        encoding: codec::resolve_encoding(encoding)?,
    })
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Input path {path:?} has no usable file name"))
}

/// Writes through a sibling temp file so a crash never leaves a half-written
/// output under the final name.
fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(format!(".{}.tmp", Uuid::new_v4()));
    let tmp = PathBuf::from(tmp_name);

    if let Err(err) = fs::write(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(err).with_context(|| format!("Writing {tmp:?}"));
    }
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err).with_context(|| format!("Moving {tmp:?} into place at {path:?}"));
    }
    Ok(())
}

fn write_summary(path: Option<&Path>, result: &BatchResult) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("Creating summary file {path:?}"))?;
    serde_json::to_writer_pretty(file, &result.reports)
        .with_context(|| format!("Writing summary JSON to {path:?}"))?;
    info!(
        "Summary for {} file(s) written to {path:?}",
        result.reports.len()
    );
    Ok(())
}
