//! Evaluator error types

use thiserror::Error;

/// Fatal evaluation errors. Malformed individual rows and cells never show up
/// here; they are dropped or treated as missing, and only exhaustion of the
/// whole series escalates.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// One or more required logical channels could not be resolved to a column
    #[error("required channel(s) not found in table: {}", channels.join(", "))]
    Schema { channels: Vec<String> },

    /// No usable rows remain after cleaning
    #[error("no usable data rows after cleaning: {reason}")]
    Data { reason: &'static str },

    /// Ambient temperature input did not parse as a number
    #[error("invalid ambient temperature: {raw:?}")]
    InvalidAmbient { raw: String },
}
