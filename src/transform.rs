//! The normalize pass: resolve the column plan, collapse duplicates, and
//! render the surviving rows into the output layout.

use serde::Serialize;

use crate::dates;
use crate::dedupe;
use crate::errors::PipelineError;
use crate::plan::{ColumnPlan, ColumnSource};
use crate::schema::{self, CandidateFormat};
use crate::table::{InputTable, OutputTable, cell_value};

/// Per-sheet counters reported alongside the output.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct TableStats {
    pub rows_read: usize,
    pub rows_emitted: usize,
    pub duplicates_collapsed: usize,
    pub blank_candidate_ids: usize,
}

/// Renders one input row through the plan. The two date outputs are replaced
/// by their serial form; everything else passes through as-is.
pub fn render_row(row: &[String], plan: &ColumnPlan) -> Vec<String> {
    plan.columns
        .iter()
        .map(|column| match column.source {
            ColumnSource::Default(value) => value.to_string(),
            ColumnSource::Input(idx) => {
                let value = cell_value(row, idx);
                if column.output_name == schema::UPDATION_DATE
                    || column.output_name == plan.format.application_date_output()
                {
                    dates::to_display(value)
                } else {
                    value.to_string()
                }
            }
        })
        .collect()
}

pub fn normalize(
    table: &InputTable,
    format: CandidateFormat,
) -> Result<(OutputTable, TableStats), PipelineError> {
    let plan = ColumnPlan::resolve(&table.headers, format)?;
    let outcome = dedupe::dedupe(table, &plan);

    let rows: Vec<Vec<String>> = outcome
        .survivors
        .iter()
        .map(|survivor| render_row(&table.rows[survivor.row], &plan))
        .collect();

    let stats = TableStats {
        rows_read: table.rows.len(),
        rows_emitted: rows.len(),
        duplicates_collapsed: table.rows.len() - outcome.skipped_blank_id - rows.len(),
        blank_candidate_ids: outcome.skipped_blank_id,
    };

    Ok((
        OutputTable {
            headers: plan.output_headers(),
            rows,
        },
        stats,
    ))
}
