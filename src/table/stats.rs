//! Per-column summaries: numeric statistics for numeric columns, distinct
//! values for the rest.

use std::collections::HashSet;

use serde::Serialize;

use crate::table::decompose::{Column, StructuredTable};

/// Summary of one numeric column. Computed over parsed cells only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStatistics {
    pub column_name: String,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub sum: f64,
}

impl ColumnStatistics {
    fn from_column(column: &Column) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0f64;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in column.values.iter().filter_map(|v| v.as_number()) {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            column_name: column.name.clone(),
            count,
            min,
            max,
            mean: sum / count as f64,
            sum,
        })
    }
}

/// Statistics for every column that is numeric and whose numeric-cell ratio
/// reaches `threshold`. Other columns are omitted, not zero-filled.
pub fn compute_statistics(table: &StructuredTable, threshold: f64) -> Vec<ColumnStatistics> {
    table
        .columns
        .iter()
        .filter(|c| c.is_numeric && c.numeric_ratio() >= threshold)
        .filter_map(ColumnStatistics::from_column)
        .collect()
}

/// Most distinct values listed for one categorical column.
pub const MAX_DISTINCT_VALUES: usize = 10;

/// Summary of a non-numeric column: its distinct values in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoricalSummary {
    pub column_name: String,
    /// Number of distinct non-empty values in the column.
    pub distinct_count: usize,
    /// The first [`MAX_DISTINCT_VALUES`] of them.
    pub values: Vec<String>,
}

impl CategoricalSummary {
    fn from_column(column: &Column) -> Option<Self> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for raw in column.values.iter().map(|v| v.raw()).filter(|r| !r.is_empty()) {
            if seen.insert(raw) && values.len() < MAX_DISTINCT_VALUES {
                values.push(raw.to_string());
            }
        }
        if seen.is_empty() {
            return None;
        }
        Some(Self {
            column_name: column.name.clone(),
            distinct_count: seen.len(),
            values,
        })
    }

    pub fn is_truncated(&self) -> bool {
        self.distinct_count > self.values.len()
    }
}

/// Distinct-value summaries for every column that has content but did not
/// reach the numeric `threshold`. All-empty columns are omitted.
pub fn compute_categorical(table: &StructuredTable, threshold: f64) -> Vec<CategoricalSummary> {
    table
        .columns
        .iter()
        .filter(|c| !(c.is_numeric && c.numeric_ratio() >= threshold))
        .filter_map(CategoricalSummary::from_column)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::TableData;
    use crate::table::decompose::decompose;

    fn single_column(values: &[&str]) -> StructuredTable {
        decompose(&TableData::new(
            vec!["Value".into()],
            values.iter().map(|v| vec![v.to_string()]).collect(),
        ))
    }

    #[test]
    fn mixed_column_over_threshold() {
        let table = single_column(&["10", "20%", "abc", "30"]);
        let stats = compute_statistics(&table, 0.5);
        assert_eq!(stats.len(), 1);
        let s = &stats[0];
        assert_eq!(s.column_name, "Value");
        assert_eq!(s.count, 3);
        assert_eq!(s.min, 10.0);
        assert_eq!(s.max, 30.0);
        assert_eq!(s.mean, 20.0);
        assert_eq!(s.sum, 60.0);
    }

    #[test]
    fn column_below_threshold_omitted() {
        let table = single_column(&["Q1", "Q2", "Q3", "2024"]);
        assert!(compute_statistics(&table, 0.5).is_empty());
        assert_eq!(compute_statistics(&table, 0.25).len(), 1);
    }

    #[test]
    fn empty_cells_not_in_denominator() {
        let table = single_column(&["", "", "4", "x"]);
        // 1 numeric of 2 non-empty.
        let stats = compute_statistics(&table, 0.5);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].count, 1);
        assert_eq!(stats[0].mean, 4.0);
    }

    #[test]
    fn text_and_empty_columns_omitted() {
        let data = TableData::new(
            vec!["Name".into(), "Blank".into(), "Amount".into()],
            vec![
                vec!["a".into(), "".into(), "$1,000".into()],
                vec!["b".into(), "".into(), "(250)".into()],
            ],
        );
        let stats = compute_statistics(&decompose(&data), 0.5);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].column_name, "Amount");
        assert_eq!(stats[0].min, -250.0);
        assert_eq!(stats[0].sum, 750.0);
    }

    #[test]
    fn zero_threshold_still_needs_a_number() {
        let table = single_column(&["a", "b"]);
        assert!(compute_statistics(&table, 0.0).is_empty());
    }

    #[test]
    fn categorical_values_in_first_seen_order() {
        let data = TableData::new(
            vec!["Region".into(), "Sales".into(), "Note".into()],
            vec![
                vec!["North".into(), "10".into(), "".into()],
                vec!["South".into(), "20".into(), "".into()],
                vec!["North".into(), "30".into(), "".into()],
                vec!["East".into(), "40".into(), "".into()],
            ],
        );
        let summaries = compute_categorical(&decompose(&data), 0.5);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].column_name, "Region");
        assert_eq!(summaries[0].distinct_count, 3);
        assert_eq!(summaries[0].values, vec!["North", "South", "East"]);
        assert!(!summaries[0].is_truncated());
    }

    #[test]
    fn categorical_values_are_bounded() {
        let values: Vec<String> = (0..25).map(|i| format!("item-{i}")).collect();
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let summaries = compute_categorical(&single_column(&refs), 0.5);
        assert_eq!(summaries[0].distinct_count, 25);
        assert_eq!(summaries[0].values.len(), MAX_DISTINCT_VALUES);
        assert_eq!(summaries[0].values[0], "item-0");
        assert!(summaries[0].is_truncated());
    }

    #[test]
    fn mostly_text_column_is_categorical() {
        let table = single_column(&["Q1", "Q2", "Q3", "2024"]);
        let summaries = compute_categorical(&table, 0.5);
        assert_eq!(summaries[0].values, vec!["Q1", "Q2", "Q3", "2024"]);
        assert!(compute_categorical(&table, 0.25).is_empty());
    }
}
