//! Rendering of the three table chunk variants.
//!
//! - `table_overview`: what the table is about (columns, size, section).
//! - `table_analysis`: min/max/mean/sum per numeric column, distinct values
//!   per other column.
//! - `table_query`: every row as `column: value` pairs, split into parts of
//!   at most `row_cap` rows.

use std::fmt::Write as _;

use crate::chunk::{Chunk, ChunkMetadata, ChunkType};
use crate::config::ChunkerConfig;
use crate::element::{ElementKind, TableData};
use crate::section::StructuralContext;
use crate::table::{
    CategoricalSummary, ColumnStatistics, StructuredTable, compute_categorical,
    compute_statistics, decompose,
};

/// A table element together with the context it was found in.
pub(crate) struct TableSource<'a> {
    pub index: usize,
    pub page_number: Option<u32>,
    pub context: &'a StructuralContext,
    pub data: &'a TableData,
}

impl TableSource<'_> {
    fn table_id(&self) -> String {
        format!("table_{}", self.index)
    }

    fn metadata(&self, chunk_type: ChunkType, config: &ChunkerConfig) -> ChunkMetadata {
        let mut meta = ChunkMetadata::new(
            chunk_type,
            self.context,
            &config.path_separator,
            self.index,
            ElementKind::Table,
        );
        meta.page_number = self.page_number;
        meta.table_id = Some(self.table_id());
        meta.caption = self.data.caption.clone();
        meta
    }

    /// ` "caption"` when the table has one.
    fn caption_clause(&self) -> String {
        match &self.data.caption {
            Some(caption) => format!(" \"{caption}\""),
            None => String::new(),
        }
    }

    fn section_clause(&self, config: &ChunkerConfig) -> String {
        if config.include_path_in_overview && !self.context.is_root() {
            format!(
                " in section \"{}\"",
                self.context.path(&config.path_separator)
            )
        } else {
            String::new()
        }
    }
}

/// Decompose, analyse and render one table.
pub(crate) fn table_chunks(source: &TableSource<'_>, config: &ChunkerConfig) -> Vec<Chunk> {
    let table = decompose(source.data);

    if table.row_count == 0 || table.columns.is_empty() {
        tracing::warn!(
            table_id = %source.table_id(),
            "table has no extractable rows, emitting overview only"
        );
        return vec![empty_overview(source, &table, config)];
    }

    let stats = compute_statistics(&table, config.numeric_threshold);
    let categorical = compute_categorical(&table, config.numeric_threshold);
    tracing::debug!(
        table_id = %source.table_id(),
        rows = table.row_count,
        columns = table.columns.len(),
        numeric_columns = stats.len(),
        categorical_columns = categorical.len(),
        "table decomposed"
    );

    let mut chunks = Vec::with_capacity(3);
    chunks.push(overview(source, &table, &stats, config));
    chunks.push(analysis(source, &table, &stats, &categorical, config));
    chunks.extend(query_parts(source, &table, config));
    chunks
}

fn empty_overview(source: &TableSource<'_>, table: &StructuredTable, config: &ChunkerConfig) -> Chunk {
    let mut content = format!(
        "Table{}{} with no extractable rows.",
        source.caption_clause(),
        source.section_clause(config)
    );
    if !table.columns.is_empty() {
        let _ = write!(content, " Columns: {}.", table.column_names().join(", "));
    }

    let mut meta = source.metadata(ChunkType::TableOverview, config);
    meta.row_count = Some(0);
    meta.column_names = Some(owned_names(table));
    meta.dropped_cells = nonzero(table.dropped_cells);
    Chunk {
        content,
        metadata: meta,
    }
}

fn overview(
    source: &TableSource<'_>,
    table: &StructuredTable,
    stats: &[ColumnStatistics],
    config: &ChunkerConfig,
) -> Chunk {
    let mut content = format!(
        "Table{}{} with {} and {}.\nColumns: {}.",
        source.caption_clause(),
        source.section_clause(config),
        plural(table.row_count, "row"),
        plural(table.columns.len(), "column"),
        table.column_names().join(", "),
    );
    if !stats.is_empty() {
        let numeric: Vec<&str> = stats.iter().map(|s| s.column_name.as_str()).collect();
        let _ = write!(content, "\nNumeric columns: {}.", numeric.join(", "));
    }

    let mut meta = source.metadata(ChunkType::TableOverview, config);
    meta.row_count = Some(table.row_count);
    meta.column_names = Some(owned_names(table));
    meta.dropped_cells = nonzero(table.dropped_cells);
    Chunk {
        content,
        metadata: meta,
    }
}

fn analysis(
    source: &TableSource<'_>,
    table: &StructuredTable,
    stats: &[ColumnStatistics],
    categorical: &[CategoricalSummary],
    config: &ChunkerConfig,
) -> Chunk {
    let mut content = format!(
        "Statistics for table{}{} ({}):",
        source.caption_clause(),
        source.section_clause(config),
        plural(table.row_count, "row"),
    );
    if stats.is_empty() {
        content.push_str("\nNo numeric columns detected.");
        if categorical.is_empty() {
            let _ = write!(content, " Columns: {}.", table.column_names().join(", "));
        }
    }
    for s in stats {
        let _ = write!(
            content,
            "\n{}: count {}, min {}, max {}, mean {}, sum {}",
            s.column_name,
            s.count,
            fmt_number(s.min),
            fmt_number(s.max),
            fmt_number(s.mean),
            fmt_number(s.sum),
        );
    }
    for c in categorical {
        let more = if c.is_truncated() { ", ..." } else { "" };
        let _ = write!(
            content,
            "\n{}: {} ({}{more})",
            c.column_name,
            plural(c.distinct_count, "distinct value"),
            c.values.join(", "),
        );
    }

    let mut meta = source.metadata(ChunkType::TableAnalysis, config);
    meta.row_count = Some(table.row_count);
    meta.numeric_columns = Some(stats.iter().map(|s| s.column_name.clone()).collect());
    meta.statistics = Some(stats.to_vec());
    meta.categorical = Some(categorical.to_vec());
    Chunk {
        content,
        metadata: meta,
    }
}

fn query_parts(
    source: &TableSource<'_>,
    table: &StructuredTable,
    config: &ChunkerConfig,
) -> Vec<Chunk> {
    let cap = config.row_cap.max(1);
    let part_count = table.row_count.div_ceil(cap);
    let names = owned_names(table);

    (0..part_count)
        .map(|part| {
            let start = part * cap;
            let end = (start + cap).min(table.row_count);

            let mut content = format!(
                "Table rows {}-{} of {}{}:",
                start + 1,
                end,
                table.row_count,
                source.section_clause(config),
            );
            for row in start..end {
                let _ = write!(content, "\nRow {}: {}", row + 1, render_row(table, row));
            }

            let mut meta = source.metadata(ChunkType::TableQuery, config);
            meta.column_names = Some(names.clone());
            meta.row_count = Some(end - start);
            meta.row_range = Some(format!("{}-{}", start + 1, end));
            meta.part_index = Some(part);
            meta.part_count = Some(part_count);
            Chunk {
                content,
                metadata: meta,
            }
        })
        .collect()
}

/// `col: value` pairs for one row, empty cells skipped.
fn render_row(table: &StructuredTable, row: usize) -> String {
    let pairs: Vec<String> = table
        .row(row)
        .filter(|(_, v)| !v.is_empty())
        .map(|(name, v)| format!("{name}: {}", v.raw()))
        .collect();
    if pairs.is_empty() {
        "(empty)".into()
    } else {
        pairs.join("; ")
    }
}

fn owned_names(table: &StructuredTable) -> Vec<String> {
    table.columns.iter().map(|c| c.name.clone()).collect()
}

fn nonzero(n: usize) -> Option<usize> {
    (n > 0).then_some(n)
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Integers print without a fraction; everything else with up to four
/// decimals, trailing zeros trimmed.
pub(crate) fn fmt_number(value: f64) -> String {
    // -0.0 == 0.0, so this also clears the sign of a negative zero.
    let value = if value == 0.0 { 0.0 } else { value };
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{value:.0}");
    }
    let s = format!("{value:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".into() } else { s.to_string() }
}
