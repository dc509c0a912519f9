//! Parsed document elements: the engine's input model.
//!
//! The parser collaborator hands over loosely-typed records (`RawElement`).
//! They are decoded once into the closed [`ElementBody`] variant so the rest
//! of the engine matches exhaustively instead of probing for attributes.

use serde::{Deserialize, Serialize};

use crate::error::{ChunkError, ChunkResult};
use crate::table::html::table_from_html;

/// Raw tabular payload as extracted by the parser.
///
/// Rows may be ragged; the decomposer normalizes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    /// Column names, possibly empty when the source had no header row.
    #[serde(default)]
    pub header_row: Vec<String>,
    /// Body rows in document order.
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
    /// Table title, e.g. the HTML `<caption>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl TableData {
    pub fn new(header_row: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            header_row,
            rows,
            caption: None,
        }
    }

    /// Attach a caption; blank captions are ignored.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        let caption = caption.into();
        let caption = caption.trim();
        self.caption = (!caption.is_empty()).then(|| caption.to_string());
        self
    }
}

/// The kind tag of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Title,
    NarrativeText,
    ListItem,
    Table,
    Other,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::NarrativeText => "NarrativeText",
            Self::ListItem => "ListItem",
            Self::Table => "Table",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific content of an element. Table data exists only on tables.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementBody {
    Title {
        text: String,
        /// Heading level supplied upstream (1 = outermost), if known.
        level: Option<u8>,
    },
    NarrativeText {
        text: String,
    },
    ListItem {
        text: String,
    },
    Table {
        /// Flattened text the parser produced alongside the cells, if any.
        text: String,
        data: TableData,
    },
    Other {
        text: String,
        /// Category name as reported upstream (e.g. "FigureCaption").
        category: String,
    },
}

/// One parsed unit of a source document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentElement {
    sequence_index: usize,
    page_number: Option<u32>,
    body: ElementBody,
}

impl DocumentElement {
    pub fn new(sequence_index: usize, body: ElementBody) -> Self {
        Self {
            sequence_index,
            page_number: None,
            body,
        }
    }

    pub fn title(sequence_index: usize, text: impl Into<String>, level: Option<u8>) -> Self {
        Self::new(
            sequence_index,
            ElementBody::Title {
                text: text.into(),
                level,
            },
        )
    }

    pub fn narrative(sequence_index: usize, text: impl Into<String>) -> Self {
        Self::new(sequence_index, ElementBody::NarrativeText { text: text.into() })
    }

    pub fn list_item(sequence_index: usize, text: impl Into<String>) -> Self {
        Self::new(sequence_index, ElementBody::ListItem { text: text.into() })
    }

    pub fn table(sequence_index: usize, data: TableData) -> Self {
        Self::new(
            sequence_index,
            ElementBody::Table {
                text: String::new(),
                data,
            },
        )
    }

    pub fn other(
        sequence_index: usize,
        category: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::new(
            sequence_index,
            ElementBody::Other {
                text: text.into(),
                category: category.into(),
            },
        )
    }

    /// Attach the source page number.
    pub fn with_page(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }

    /// Position in the original document order.
    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }

    pub fn page_number(&self) -> Option<u32> {
        self.page_number
    }

    pub fn body(&self) -> &ElementBody {
        &self.body
    }

    pub fn kind(&self) -> ElementKind {
        match self.body {
            ElementBody::Title { .. } => ElementKind::Title,
            ElementBody::NarrativeText { .. } => ElementKind::NarrativeText,
            ElementBody::ListItem { .. } => ElementKind::ListItem,
            ElementBody::Table { .. } => ElementKind::Table,
            ElementBody::Other { .. } => ElementKind::Other,
        }
    }

    /// Raw textual content; empty for tables without a text rendering.
    pub fn text(&self) -> &str {
        match &self.body {
            ElementBody::Title { text, .. }
            | ElementBody::NarrativeText { text }
            | ElementBody::ListItem { text }
            | ElementBody::Table { text, .. }
            | ElementBody::Other { text, .. } => text,
        }
    }

    pub fn table_data(&self) -> Option<&TableData> {
        match &self.body {
            ElementBody::Table { data, .. } => Some(data),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Parser wire records
// ---------------------------------------------------------------------------

/// Element record as emitted by the parser collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct RawElement {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub metadata: RawMetadata,
    /// Pre-extracted cells, when the parser already split the table.
    #[serde(default)]
    pub table: Option<TableData>,
}

/// The subset of parser metadata the chunker consumes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMetadata {
    #[serde(default)]
    pub page_number: Option<u32>,
    /// Zero-based heading depth.
    #[serde(default)]
    pub category_depth: Option<u8>,
    #[serde(default)]
    pub text_as_html: Option<String>,
}

impl RawElement {
    /// Convert into a typed element at the given document position.
    ///
    /// A `Table` record without cells or HTML violates the parser contract
    /// and fails with [`ChunkError::MissingTableData`].
    pub fn into_element(self, sequence_index: usize) -> ChunkResult<DocumentElement> {
        let RawElement {
            kind,
            text,
            metadata,
            table,
        } = self;

        let body = match kind.as_str() {
            "Title" => ElementBody::Title {
                text,
                level: metadata.category_depth.map(|d| d.saturating_add(1)),
            },
            "NarrativeText" => ElementBody::NarrativeText { text },
            "ListItem" => ElementBody::ListItem { text },
            "Table" => {
                let data = match (table, metadata.text_as_html.as_deref()) {
                    (Some(data), _) => data,
                    (None, Some(html)) if !html.trim().is_empty() => table_from_html(html),
                    _ => return Err(ChunkError::MissingTableData { index: sequence_index }),
                };
                ElementBody::Table { text, data }
            }
            _ => {
                tracing::debug!(index = sequence_index, category = %kind, "unknown element kind, treating as prose");
                ElementBody::Other {
                    text,
                    category: kind,
                }
            }
        };

        Ok(DocumentElement {
            sequence_index,
            page_number: metadata.page_number,
            body,
        })
    }
}

/// Decode a JSON array of parser records, assigning sequence indices by
/// position.
pub fn decode_elements(json: &str) -> ChunkResult<Vec<DocumentElement>> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| ChunkError::ElementDecode {
            message: e.to_string(),
        })?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let raw: RawElement =
                serde_json::from_value(value).map_err(|e| ChunkError::InvalidElement {
                    index,
                    message: e.to_string(),
                })?;
            raw.into_element(index)
        })
        .collect()
}
