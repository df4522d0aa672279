use thiserror::Error;

use crate::source::{AbsentReason, TableKind};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("required table {table} is unavailable: {reason}")]
    MissingInput {
        table: TableKind,
        reason: AbsentReason,
    },

    #[error("{table} validation failed: {reason}")]
    Validation { table: TableKind, reason: String },
}
