//! Resolves a [`ColumnPlan`] against a sheet's header row: which input column
//! (or fixed default) feeds each output column, and where the dedupe keys sit.

use std::collections::HashMap;

use log::warn;

use crate::errors::PipelineError;
use crate::schema::{self, CandidateFormat};

/// Where an output column's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    /// Index into the input row.
    Input(usize),
    /// Fixed text written to every row.
    Default(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct PlannedColumn {
    pub source: ColumnSource,
    pub source_name: &'static str,
    pub output_name: &'static str,
}

/// Header-name lookup. Duplicate headers resolve to the leftmost occurrence.
pub struct HeaderIndex {
    by_name: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn build(headers: &[String]) -> Self {
        let mut by_name = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            by_name.entry(header.clone()).or_insert(idx);
        }
        HeaderIndex { by_name }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }
}

/// Input positions of the columns the dedupe pass reads directly. `Tags` is
/// read by name whether or not the plan kept it.
#[derive(Debug, Clone, Copy)]
pub struct KeyColumns {
    pub candidate_id: usize,
    pub created_date: usize,
    pub application_date: Option<usize>,
}

#[derive(Debug)]
pub struct ColumnPlan {
    pub columns: Vec<PlannedColumn>,
    pub keys: KeyColumns,
    pub format: CandidateFormat,
}

impl ColumnPlan {
    pub fn resolve(headers: &[String], format: CandidateFormat) -> Result<Self, PipelineError> {
        let layout = format.layout();
        let index = HeaderIndex::build(headers);

        let mut columns: Vec<PlannedColumn> = Vec::with_capacity(layout.mapping.len());
        for &(input, output) in layout.mapping {
            match index.get(input) {
                Some(idx) => columns.push(PlannedColumn {
                    source: ColumnSource::Input(idx),
                    source_name: input,
                    output_name: output,
                }),
                None if output == schema::STATUS_COLUMN => {
                    warn!("column '{input}' not found; '{output}' defaults to '{}'", schema::STATUS_DEFAULT);
                    columns.push(PlannedColumn {
                        source: ColumnSource::Default(schema::STATUS_DEFAULT),
                        source_name: input,
                        output_name: output,
                    });
                }
                None => {
                    warn!("column '{input}' not found; dropping '{output}'");
                }
            }
        }

        // Sheets exported without review columns still get Status and
        // Comments, but never a second copy of one the plan already has.
        for (output, default) in [
            (schema::STATUS_COLUMN, schema::STATUS_DEFAULT),
            (schema::COMMENTS_COLUMN, ""),
        ] {
            let already_planned = columns.iter().any(|c| c.output_name == output);
            if !index.contains(output) && !already_planned {
                columns.push(PlannedColumn {
                    source: ColumnSource::Default(default),
                    source_name: output,
                    output_name: output,
                });
            }
        }

        if let Some(order) = layout.output_order {
            columns = order
                .iter()
                .filter_map(|name| columns.iter().find(|c| c.output_name == *name).copied())
                .collect();
        }

        if columns.is_empty() {
            return Err(PipelineError::ColumnPlanEmpty);
        }

        let candidate_id = index
            .get(schema::CANDIDATE_ID)
            .ok_or(PipelineError::RequiredColumnMissing(schema::CANDIDATE_ID))?;
        let created_date = index
            .get(schema::CREATED_DATE)
            .ok_or(PipelineError::RequiredColumnMissing(schema::CREATED_DATE))?;
        let application_date = index.get(schema::APPLICATION_DATE_SOURCE);

        Ok(ColumnPlan {
            columns,
            keys: KeyColumns {
                candidate_id,
                created_date,
                application_date,
            },
            format,
        })
    }

    pub fn output_headers(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.output_name.to_string())
            .collect()
    }
}
