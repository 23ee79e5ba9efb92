use std::fmt;

use thiserror::Error;

use crate::codec::TableFormat;

/// Failures produced by the normalization pipeline itself, as opposed to
/// filesystem or CLI errors which stay in `anyhow` at the application edge.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The file decoded to nothing: no sheet, or not a single non-blank line.
    #[error("input has no rows to process")]
    EmptyInput,
    /// `Candidate ID` and `CREATED_DATE` must exist in every input regardless
    /// of the selected format.
    #[error("required column '{0}' is missing from the input headers")]
    RequiredColumnMissing(&'static str),
    #[error("none of the mapped columns were found in the input headers")]
    ColumnPlanEmpty,
    #[error("no .csv, .xlsx, or .zip inputs were eligible for processing")]
    NoValidFiles,
    #[error("malformed {format} input: {message}")]
    Codec {
        format: TableFormat,
        message: String,
    },
}

impl PipelineError {
    pub fn codec(format: TableFormat, source: impl fmt::Display) -> Self {
        PipelineError::Codec {
            format,
            message: source.to_string(),
        }
    }
}
