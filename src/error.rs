//! Error taxonomy for the estate pipeline.
//!
//! Two kinds of failure abort an analysis: a required column that cannot be
//! found in the inventory header, and a policy parameter outside its domain.
//! Malformed numeric cells never surface here; they are coerced to zero and
//! counted in the loader's report instead.

use crate::types::CanonicalField;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// One or more required canonical fields had no matching column.
    #[error("could not find a column for {}", join_fields(.fields))]
    MissingColumn { fields: Vec<CanonicalField> },

    /// A sizing, pricing, labor or projection parameter violates its constraint.
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("unknown edition '{0}'")]
    UnknownEdition(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub fn invalid_policy(msg: impl Into<String>) -> Self {
        EngineError::InvalidPolicy(msg.into())
    }
}

fn join_fields(fields: &[CanonicalField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, EngineError>;
