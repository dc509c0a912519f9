//! Chunk output model: content to embed plus citation metadata.

use serde::{Deserialize, Serialize};

use crate::element::ElementKind;
use crate::error::{ChunkError, ChunkResult};
use crate::section::StructuralContext;
use crate::table::{CategoricalSummary, ColumnStatistics};

/// Which rendering a chunk is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkType {
    Prose,
    TableOverview,
    TableAnalysis,
    TableQuery,
}

impl ChunkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prose => "prose",
            Self::TableOverview => "table_overview",
            Self::TableAnalysis => "table_analysis",
            Self::TableQuery => "table_query",
        }
    }

    pub fn is_table(&self) -> bool {
        !matches!(self, Self::Prose)
    }
}

impl std::fmt::Display for ChunkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata stored verbatim next to the embedded content.
///
/// Field order is the serialization order; optional fields are omitted when
/// absent so the mapping only carries what applies to the chunk type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkMetadata {
    pub chunk_type: ChunkType,
    /// Enclosing heading titles joined by the configured separator.
    pub structural_path: String,
    /// The same path as `(level, title)` pairs, outermost first. Unambiguous
    /// even when a title contains the separator.
    pub sections: StructuralContext,
    /// `sequence_index` of the element this chunk came from.
    pub source_element_index: usize,
    pub element_kind: ElementKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Vec<ColumnStatistics>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorical: Option<Vec<CategoricalSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
    /// 1-based inclusive row span of a query part, e.g. `"51-100"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped_cells: Option<usize>,
}

impl ChunkMetadata {
    /// Metadata with only the mandatory keys set.
    pub fn new(
        chunk_type: ChunkType,
        sections: &StructuralContext,
        separator: &str,
        source_element_index: usize,
        element_kind: ElementKind,
    ) -> Self {
        Self {
            chunk_type,
            structural_path: sections.path(separator),
            sections: sections.clone(),
            source_element_index,
            element_kind,
            page_number: None,
            table_id: None,
            caption: None,
            column_names: None,
            numeric_columns: None,
            statistics: None,
            categorical: None,
            row_count: None,
            row_range: None,
            part_index: None,
            part_count: None,
            dropped_cells: None,
        }
    }
}

/// A unit of content handed to embedding and storage. Content is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chunk {
    pub content: String,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn chunk_type(&self) -> ChunkType {
        self.metadata.chunk_type
    }

    pub fn table_id(&self) -> Option<&str> {
        self.metadata.table_id.as_deref()
    }

    /// Flat JSON mapping for the storage collaborator.
    pub fn metadata_map(&self) -> ChunkResult<serde_json::Map<String, serde_json::Value>> {
        match serde_json::to_value(&self.metadata) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            Ok(other) => Err(ChunkError::Serialize {
                message: format!("metadata serialized to non-object: {other}"),
            }),
            Err(e) => Err(ChunkError::Serialize {
                message: e.to_string(),
            }),
        }
    }
}

/// Serialize a chunk sequence as pretty JSON.
pub fn chunks_to_json(chunks: &[Chunk]) -> ChunkResult<String> {
    serde_json::to_string_pretty(chunks).map_err(|e| ChunkError::Serialize {
        message: e.to_string(),
    })
}

/// Per-document tallies over a chunk sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChunkSummary {
    pub prose: usize,
    pub table_overview: usize,
    pub table_analysis: usize,
    pub table_query: usize,
    /// Distinct tables seen (one overview each).
    pub tables: usize,
    /// Tables with no extractable rows.
    pub empty_tables: usize,
    /// Cells dropped from over-wide rows across all tables.
    pub dropped_cells: usize,
}

impl ChunkSummary {
    pub fn from_chunks(chunks: &[Chunk]) -> Self {
        let mut summary = Self::default();
        for chunk in chunks {
            match chunk.chunk_type() {
                ChunkType::Prose => summary.prose += 1,
                ChunkType::TableOverview => {
                    summary.table_overview += 1;
                    summary.tables += 1;
                    if chunk.metadata.row_count == Some(0) {
                        summary.empty_tables += 1;
                    }
                    summary.dropped_cells += chunk.metadata.dropped_cells.unwrap_or(0);
                }
                ChunkType::TableAnalysis => summary.table_analysis += 1,
                ChunkType::TableQuery => summary.table_query += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.prose + self.table_overview + self.table_analysis + self.table_query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::SectionHeading;

    fn prose(idx: usize) -> Chunk {
        let context = StructuralContext::new(vec![SectionHeading {
            level: 1,
            title: "Intro".into(),
        }]);
        Chunk {
            content: "hello".into(),
            metadata: ChunkMetadata::new(
                ChunkType::Prose,
                &context,
                " > ",
                idx,
                ElementKind::NarrativeText,
            ),
        }
    }

    #[test]
    fn metadata_map_omits_absent_fields() {
        let map = prose(3).metadata_map().unwrap();
        assert_eq!(map["chunk_type"], "prose");
        assert_eq!(map["structural_path"], "Intro");
        assert_eq!(map["sections"], serde_json::json!([{"level": 1, "title": "Intro"}]));
        assert_eq!(map["source_element_index"], 3);
        assert_eq!(map["element_kind"], "NarrativeText");
        assert!(!map.contains_key("table_id"));
        assert!(!map.contains_key("part_index"));
    }

    #[test]
    fn table_metadata_present() {
        let mut chunk = prose(1);
        chunk.metadata.chunk_type = ChunkType::TableQuery;
        chunk.metadata.table_id = Some("table_1".into());
        chunk.metadata.part_index = Some(0);
        let map = chunk.metadata_map().unwrap();
        assert_eq!(map["chunk_type"], "table_query");
        assert_eq!(map["table_id"], "table_1");
        assert_eq!(map["part_index"], 0);
    }

    #[test]
    fn summary_counts() {
        let mut overview = prose(0);
        overview.metadata.chunk_type = ChunkType::TableOverview;
        overview.metadata.row_count = Some(0);
        overview.metadata.dropped_cells = Some(2);
        let summary = ChunkSummary::from_chunks(&[prose(1), overview]);
        assert_eq!(summary.prose, 1);
        assert_eq!(summary.tables, 1);
        assert_eq!(summary.empty_tables, 1);
        assert_eq!(summary.dropped_cells, 2);
        assert_eq!(summary.total(), 2);
    }

    #[test]
    fn json_output_shape() {
        let json = chunks_to_json(&[prose(0)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["content"], "hello");
        assert_eq!(value[0]["metadata"]["chunk_type"], "prose");
    }
}
