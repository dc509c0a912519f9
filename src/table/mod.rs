//! Table decomposition and column statistics.
//!
//! A raw [`TableData`](crate::element::TableData) is normalized into a
//! [`StructuredTable`] (rectangular, typed cells), from which per-column
//! [`ColumnStatistics`] and [`CategoricalSummary`] values are derived.
//! Neither step can fail: ragged rows, missing headers and empty tables all
//! produce a best-effort result.

pub mod decompose;
pub mod html;
pub mod stats;

pub use decompose::{CellValue, Column, StructuredTable, decompose, parse_numeric};
pub use html::{table_from_html, tables_in_html};
pub use stats::{
    CategoricalSummary, ColumnStatistics, MAX_DISTINCT_VALUES, compute_categorical,
    compute_statistics,
};
