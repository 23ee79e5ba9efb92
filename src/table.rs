//! In-memory sheet representation shared by the decoders and the pipeline,
//! plus the plain-text renderer used by `preview` and `formats`.

use std::borrow::Cow;
use std::fmt::Write as _;

/// A decoded sheet: the header row plus every data row, all cells as text.
/// Rows may be ragged; use [`cell_value`] to read them uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A normalized sheet ready for encoding. Every row has exactly
/// `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Reads a cell from a possibly ragged row. Out-of-range cells are empty.
pub fn cell_value(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| cell_width(h)).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(cell_width(cell));
        }
    }

    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();

    let header_line = format_row(headers, &widths);
    let _ = writeln!(output, "{header_line}");

    let separator_widths = widths.iter().map(|w| (*w).max(3)).collect::<Vec<usize>>();
    let separator_cells = separator_widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>();
    let separator_line = format_row(&separator_cells, &separator_widths);
    let _ = writeln!(output, "{separator_line}");

    for row in rows {
        let row_line = format_row(row, &widths);
        let _ = writeln!(output, "{row_line}");
    }

    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    let rendered = render_table(headers, rows);
    print!("{rendered}");
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        if idx >= widths.len() {
            break;
        }
        let sanitized = sanitize_cell(value);
        let display = cell_width(sanitized.as_ref());
        let mut cell = sanitized.into_owned();
        let padding = widths
            .get(idx)
            .copied()
            .unwrap_or_default()
            .saturating_sub(display);
        if padding > 0 {
            cell.push_str(&" ".repeat(padding));
        }
        cells.push(cell);
    }
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn cell_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        let mut sanitized = String::with_capacity(value.len());
        for ch in value.chars() {
            match ch {
                '\n' | '\r' | '\t' => sanitized.push(' '),
                other => sanitized.push(other),
            }
        }
        Cow::Owned(sanitized)
    } else {
        Cow::Borrowed(value)
    }
}
