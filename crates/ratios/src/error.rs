//! Error types for ratio computation.
//!
//! Degraded inputs (missing facts, zero denominators) are not errors. They
//! surface as [`DataQuality`](crate::DataQuality) on each result; the variants
//! here cover only conditions that stop a request.

use crate::facts::{FiscalYear, LineItem};
use thiserror::Error;

/// Result type for ratio operations.
pub type Result<T> = std::result::Result<T, RatioError>;

/// Errors that can occur while loading facts or assembling reports.
#[derive(Debug, Error)]
pub enum RatioError {
    /// Unknown ratio name or company identifier
    #[error("Not found: {0}")]
    NotFound(String),

    /// The subject company has no facts at all
    #[error("Insufficient data: no facts available for {company}")]
    InsufficientData {
        /// Company identifier
        company: String,
    },

    /// A second fact was supplied for an existing key
    #[error("Duplicate fact for {company} FY{fiscal_year} {line_item}")]
    DuplicateFact {
        /// Company identifier
        company: String,
        /// Fiscal year of the fact
        fiscal_year: FiscalYear,
        /// Line item of the fact
        line_item: LineItem,
    },

    /// Empty or malformed year window
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Missing required column in input data
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Reading or writing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Unparseable input value
    #[error("Parse error: {0}")]
    Parse(String),

    /// A fact or peer provider failed
    #[error("Provider error: {0}")]
    Provider(String),

    /// Polars DataFrame error
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),
}
