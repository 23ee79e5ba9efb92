//! Decoding and encoding of candidate sheets: CSV in two quoting modes and
//! XLSX via `calamine` / `rust_xlsxwriter`.

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use anyhow::{Result, anyhow};
use calamine::{Data, Reader, Xlsx};
use clap::ValueEnum;
use csv::Trim;
use encoding_rs::{Encoding, UTF_8};
use itertools::Itertools;
use rust_xlsxwriter::{Workbook, XlsxError};

use crate::errors::PipelineError;
use crate::table::{InputTable, OutputTable};

/// Spreadsheet container recognized by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Xlsx,
}

impl TableFormat {
    /// Maps a file name to its format. Extensions compare case-insensitively;
    /// anything else (including `.zip`) is not a table.
    pub fn from_name(name: &str) -> Option<TableFormat> {
        match Path::new(name).extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Some(TableFormat::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => Some(TableFormat::Xlsx),
            _ => None,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            TableFormat::Csv => "text/csv",
            TableFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableFormat::Csv => "csv",
            TableFormat::Xlsx => "xlsx",
        })
    }
}

/// How CSV text is split into cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CsvQuoting {
    /// Comma-split with per-cell trimming and no quote handling, matching the
    /// importer these sheets historically went through.
    #[default]
    Legacy,
    /// RFC 4180 parsing: quoted fields may carry embedded commas.
    Strict,
}

#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    pub quoting: CsvQuoting,
    pub encoding: &'static Encoding,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            quoting: CsvQuoting::default(),
            encoding: UTF_8,
        }
    }
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn decode(
    bytes: &[u8],
    format: TableFormat,
    options: &DecodeOptions,
) -> Result<InputTable, PipelineError> {
    match format {
        TableFormat::Csv => decode_csv(bytes, options),
        TableFormat::Xlsx => decode_xlsx(bytes),
    }
}

pub fn encode(table: &OutputTable, format: TableFormat) -> Result<Vec<u8>, PipelineError> {
    match format {
        TableFormat::Csv => Ok(encode_csv(table)),
        TableFormat::Xlsx => encode_xlsx(table),
    }
}

fn decode_text(bytes: &[u8], encoding: &'static Encoding) -> Result<String, PipelineError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(PipelineError::codec(
            TableFormat::Csv,
            format!("text is not valid {}", encoding.name()),
        ))
    } else {
        Ok(text.into_owned())
    }
}

fn decode_csv(bytes: &[u8], options: &DecodeOptions) -> Result<InputTable, PipelineError> {
    let text = decode_text(bytes, options.encoding)?;
    match options.quoting {
        CsvQuoting::Legacy => decode_csv_legacy(&text),
        CsvQuoting::Strict => decode_csv_strict(&text),
    }
}

fn decode_csv_legacy(text: &str) -> Result<InputTable, PipelineError> {
    let mut rows: Vec<Vec<String>> = text
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split(',').map(|cell| cell.trim().to_string()).collect())
        .collect();
    if rows.is_empty() {
        return Err(PipelineError::EmptyInput);
    }
    let headers = rows.remove(0);
    Ok(InputTable { headers, rows })
}

fn decode_csv_strict(text: &str) -> Result<InputTable, PipelineError> {
    // Same emptiness rule as the legacy mode: a sheet of blank lines has no
    // rows, not a single blank header.
    if text.lines().all(|line| line.trim().is_empty()) {
        return Err(PipelineError::EmptyInput);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| PipelineError::codec(TableFormat::Csv, err))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| PipelineError::codec(TableFormat::Csv, err))?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok(InputTable { headers, rows })
}

fn decode_xlsx(bytes: &[u8]) -> Result<InputTable, PipelineError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))
        .map_err(|err| PipelineError::codec(TableFormat::Xlsx, err))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(PipelineError::EmptyInput)?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|err| PipelineError::codec(TableFormat::Xlsx, err))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(row) => row.iter().map(cell_text).collect(),
        None => return Err(PipelineError::EmptyInput),
    };
    let rows: Vec<Vec<String>> = rows_iter
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok(InputTable { headers, rows })
}

/// String cells pass through verbatim (no trim); everything else renders via
/// `Display`, so whole-number floats come out without a trailing `.0`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// No quoting on output: cells are joined as-is, the same shape the
// downstream trackers already ingest.
fn encode_csv(table: &OutputTable) -> Vec<u8> {
    let mut text = String::new();
    text.push_str(&table.headers.iter().join(","));
    text.push('\n');
    for row in &table.rows {
        text.push_str(&row.iter().join(","));
        text.push('\n');
    }
    text.into_bytes()
}

fn encode_xlsx(table: &OutputTable) -> Result<Vec<u8>, PipelineError> {
    let xlsx_err = |err: XlsxError| PipelineError::codec(TableFormat::Xlsx, err);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Sheet1").map_err(xlsx_err)?;

    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, header)
            .map_err(xlsx_err)?;
    }
    for (row_idx, row) in table.rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32 + 1, col as u16, cell)
                .map_err(xlsx_err)?;
        }
    }

    workbook.save_to_buffer().map_err(xlsx_err)
}
