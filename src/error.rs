//! Rich diagnostic error types for the chunking engine.
//!
//! Only caller contract violations and I/O at the edges surface as errors.
//! Messy tables, non-numeric columns and unknown element kinds are recovered
//! locally and never reach this type.

use miette::Diagnostic;
use thiserror::Error;

/// Errors from decoding elements, loading configuration, or writing output.
#[derive(Debug, Error, Diagnostic)]
pub enum ChunkError {
    #[error("table element #{index} has no table data")]
    #[diagnostic(
        code(strata::element::missing_table_data),
        help(
            "Every element of type `Table` must carry either a `table` payload \
             (header_row + rows) or `metadata.text_as_html`. Fix the upstream \
             parser output; the chunker does not guess table contents."
        )
    )]
    MissingTableData { index: usize },

    #[error("element #{index} is invalid: {message}")]
    #[diagnostic(
        code(strata::element::invalid),
        help("Each element needs at least a `type` field. Check the parser output around this position.")
    )]
    InvalidElement { index: usize, message: String },

    #[error("could not decode element stream: {message}")]
    #[diagnostic(
        code(strata::element::decode),
        help("The input must be a JSON array of element records.")
    )]
    ElementDecode { message: String },

    #[error("failed to read config file: {path}")]
    #[diagnostic(
        code(strata::config::read),
        help("Check that the file exists and is readable.")
    )]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    #[diagnostic(
        code(strata::config::parse),
        help("The config file must be valid TOML. Run `strata config` to print a template.")
    )]
    ConfigParse { path: String, message: String },

    #[error("invalid config value for `{field}`: {message}")]
    #[diagnostic(
        code(strata::config::invalid),
        help("`numeric_threshold` must lie in [0, 1] and `row_cap` must be at least 1.")
    )]
    InvalidConfig { field: String, message: String },

    #[error("failed to serialize output: {message}")]
    #[diagnostic(code(strata::output::serialize))]
    Serialize { message: String },

    #[error("I/O error: {source}")]
    #[diagnostic(
        code(strata::io),
        help("A filesystem operation failed. Check file paths and permissions.")
    )]
    Io {
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for ChunkError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}

/// Convenience alias for chunking results.
pub type ChunkResult<T> = std::result::Result<T, ChunkError>;
