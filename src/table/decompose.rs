//! Raw table → structured record.
//!
//! - Missing headers are synthesized as `Column_1..Column_N` from the widest row.
//! - Rows are padded with empty cells or truncated to the header width;
//!   truncated cells are counted in `dropped_cells`.
//! - Rows whose cells are all blank are skipped, so a table of blank rows has
//!   no extractable rows.
//! - Each cell is parsed as a number after stripping currency symbols,
//!   percent signs and thousands separators. Cells that do not parse keep
//!   their original text.

use serde::Serialize;

use crate::element::TableData;

/// Leading symbols stripped before numeric parsing.
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₹', '₩', '₽', '¢'];

/// A single normalized cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CellValue {
    /// Cell with no content (including padding for short rows).
    Empty,
    /// Parsed number plus the text it came from.
    Number { raw: String, value: f64 },
    /// Anything that is neither empty nor numeric.
    Text { raw: String },
}

impl CellValue {
    fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match parse_numeric(trimmed) {
            Some(value) => Self::Number {
                raw: trimmed.to_string(),
                value,
            },
            None => Self::Text {
                raw: trimmed.to_string(),
            },
        }
    }

    /// Cell text as it appeared in the source (trimmed).
    pub fn raw(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Number { raw, .. } | Self::Text { raw } => raw,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// One column of a structured table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    /// One value per row, in row order.
    pub values: Vec<CellValue>,
    /// True when at least one cell parsed as a number.
    pub is_numeric: bool,
}

impl Column {
    /// Number of cells that parsed as numbers.
    pub fn numeric_count(&self) -> usize {
        self.values.iter().filter(|v| v.as_number().is_some()).count()
    }

    /// Number of non-empty cells.
    pub fn non_empty_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_empty()).count()
    }

    /// Share of non-empty cells that are numeric; 0 for an all-empty column.
    pub fn numeric_ratio(&self) -> f64 {
        let non_empty = self.non_empty_count();
        if non_empty == 0 {
            return 0.0;
        }
        self.numeric_count() as f64 / non_empty as f64
    }
}

/// Rectangular, typed view of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredTable {
    pub columns: Vec<Column>,
    pub row_count: usize,
    /// Cells discarded because their row was wider than the header.
    pub dropped_cells: usize,
    /// Source rows skipped because every cell was blank.
    pub blank_rows: usize,
}

impl StructuredTable {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Cells of row `index` paired with their column names.
    pub fn row(&self, index: usize) -> impl Iterator<Item = (&str, &CellValue)> {
        self.columns
            .iter()
            .filter_map(move |c| c.values.get(index).map(|v| (c.name.as_str(), v)))
    }
}

/// Normalize a raw table. Never fails.
pub fn decompose(data: &TableData) -> StructuredTable {
    let rows: Vec<&Vec<String>> = data
        .rows
        .iter()
        .filter(|r| r.iter().any(|c| !c.trim().is_empty()))
        .collect();
    let blank_rows = data.rows.len() - rows.len();
    let widest = rows.iter().map(|r| r.len()).max().unwrap_or(0);

    let names: Vec<String> = if data.header_row.is_empty() {
        (1..=widest).map(|i| format!("Column_{i}")).collect()
    } else {
        data.header_row
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = h.trim();
                if h.is_empty() {
                    format!("Column_{}", i + 1)
                } else {
                    h.to_string()
                }
            })
            .collect()
    };

    let width = names.len();
    let mut values: Vec<Vec<CellValue>> = vec![Vec::with_capacity(rows.len()); width];
    let mut dropped_cells = 0usize;

    for row in &rows {
        if row.len() > width {
            dropped_cells += row.len() - width;
        }
        for (col, slot) in values.iter_mut().enumerate() {
            let cell = row.get(col).map(String::as_str).unwrap_or("");
            slot.push(CellValue::from_raw(cell));
        }
    }

    if blank_rows > 0 {
        tracing::debug!(blank_rows, "blank table rows skipped");
    }
    if dropped_cells > 0 {
        tracing::warn!(
            dropped_cells,
            width,
            "table rows wider than header, extra cells dropped"
        );
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| {
            let is_numeric = values.iter().any(|v| v.as_number().is_some());
            Column {
                name,
                values,
                is_numeric,
            }
        })
        .collect();

    StructuredTable {
        columns,
        row_count: rows.len(),
        dropped_cells,
        blank_rows,
    }
}

/// Parse a cell as a number, tolerating common decorations.
///
/// Accepts `1,234.5`, `$1,200`, `-€3`, `20%`, `%20` and accounting-style
/// negatives such as `(1,500)`. Returns `None` for anything else, including
/// `NaN` and infinities.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let mut s = raw.trim();
    let mut negative = false;

    if s.len() >= 2 && s.starts_with('(') && s.ends_with(')') {
        negative = true;
        s = s[1..s.len() - 1].trim();
    }

    s = s.trim_start_matches('%').trim_end_matches('%').trim();

    if let Some(rest) = s.strip_prefix('-') {
        negative = !negative;
        s = rest.trim_start();
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest.trim_start();
    }

    s = s.trim_start_matches(CURRENCY_SYMBOLS).trim();

    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty()
        || !cleaned.chars().any(|c| c.is_ascii_digit())
        || !cleaned
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+'))
    {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative { -value } else { value })
}
