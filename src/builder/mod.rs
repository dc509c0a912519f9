//! Semantic chunk builder.
//!
//! One linear pass over a document's elements. The section tracker attaches a
//! structural path to each element; prose elements become one chunk each and
//! table elements fan out into overview, analysis and query chunks.
//!
//! The builder holds no state between calls, so one instance can serve many
//! documents, including concurrently.

mod variants;

use rayon::prelude::*;

use crate::chunk::{Chunk, ChunkMetadata, ChunkSummary, ChunkType};
use crate::config::ChunkerConfig;
use crate::element::{DocumentElement, ElementBody};
use crate::error::ChunkResult;
use crate::section::{
    DefaultHeadingClassifier, HeadingClassifier, SectionTracker, StructuralContext,
    structural_contexts,
};

use variants::{TableSource, table_chunks};

/// Turns parsed elements into retrieval-ready chunks.
pub struct SemanticChunker {
    config: ChunkerConfig,
    classifier: Box<dyn HeadingClassifier + Send + Sync>,
}

impl SemanticChunker {
    /// Create a chunker, rejecting invalid configuration.
    pub fn new(config: ChunkerConfig) -> ChunkResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            classifier: Box::new(DefaultHeadingClassifier),
        })
    }

    /// Replace the heading-level heuristic.
    pub fn with_classifier(
        mut self,
        classifier: impl HeadingClassifier + Send + Sync + 'static,
    ) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Chunk one document in a single sequential pass.
    pub fn build(&self, elements: &[DocumentElement]) -> Vec<Chunk> {
        let mut tracker = SectionTracker::with_classifier(&self.classifier);
        let chunks: Vec<Chunk> = elements
            .iter()
            .flat_map(|el| {
                let context = tracker.observe(el);
                self.element_chunks(el, &context)
            })
            .collect();

        tracing::debug!(
            elements = elements.len(),
            chunks = chunks.len(),
            "document chunked"
        );
        chunks
    }

    /// Same output as [`build`](Self::build), with per-element work spread
    /// over the rayon pool once the (sequential) section pass is done.
    pub fn build_parallel(&self, elements: &[DocumentElement]) -> Vec<Chunk> {
        let contexts = structural_contexts(elements, &self.classifier);
        let per_element: Vec<Vec<Chunk>> = elements
            .par_iter()
            .zip(contexts.par_iter())
            .map(|(el, context)| self.element_chunks(el, context))
            .collect();

        let chunks: Vec<Chunk> = per_element.into_iter().flatten().collect();
        tracing::debug!(
            elements = elements.len(),
            chunks = chunks.len(),
            "document chunked in parallel"
        );
        chunks
    }

    /// Tally a chunk sequence by type.
    pub fn summarize(chunks: &[Chunk]) -> ChunkSummary {
        ChunkSummary::from_chunks(chunks)
    }

    fn element_chunks(&self, element: &DocumentElement, context: &StructuralContext) -> Vec<Chunk> {
        match element.body() {
            ElementBody::Table { data, .. } => {
                let source = TableSource {
                    index: element.sequence_index(),
                    page_number: element.page_number(),
                    context,
                    data,
                };
                table_chunks(&source, &self.config)
            }
            ElementBody::Title { .. }
            | ElementBody::NarrativeText { .. }
            | ElementBody::ListItem { .. }
            | ElementBody::Other { .. } => {
                vec![prose_chunk(element, context, &self.config.path_separator)]
            }
        }
    }
}

impl Default for SemanticChunker {
    fn default() -> Self {
        Self {
            config: ChunkerConfig::default(),
            classifier: Box::new(DefaultHeadingClassifier),
        }
    }
}

/// One prose chunk carrying the element text verbatim. Blank elements get a
/// placeholder so content is never empty.
fn prose_chunk(
    element: &DocumentElement,
    context: &StructuralContext,
    separator: &str,
) -> Chunk {
    let text = element.text();
    let content = if text.trim().is_empty() {
        tracing::debug!(
            index = element.sequence_index(),
            kind = %element.kind(),
            "blank element, emitting placeholder"
        );
        format!("[empty {} element]", element.kind())
    } else {
        text.to_string()
    };

    let mut metadata = ChunkMetadata::new(
        ChunkType::Prose,
        context,
        separator,
        element.sequence_index(),
        element.kind(),
    );
    metadata.page_number = element.page_number();
    Chunk { content, metadata }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, TableData};

    fn doc() -> Vec<DocumentElement> {
        vec![
            DocumentElement::narrative(0, "Preamble."),
            DocumentElement::title(1, "Annual Report", Some(1)),
            DocumentElement::title(2, "Revenue", Some(2)),
            DocumentElement::narrative(3, "Revenue grew.").with_page(3),
            DocumentElement::table(
                4,
                TableData::new(
                    vec!["Year".into(), "Revenue".into()],
                    vec![vec!["2022".into(), "10".into()], vec!["2023".into(), "12".into()]],
                ),
            ),
            DocumentElement::title(5, "Outlook", Some(2)),
            DocumentElement::list_item(6, "Expand"),
        ]
    }

    #[test]
    fn prose_and_tables() {
        let chunks = SemanticChunker::default().build(&doc());
        // 6 prose + 3 table variants.
        assert_eq!(chunks.len(), 9);

        assert_eq!(chunks[0].metadata.structural_path, "");
        assert_eq!(chunks[1].metadata.structural_path, "Annual Report");
        assert_eq!(chunks[3].content, "Revenue grew.");
        assert_eq!(chunks[3].metadata.structural_path, "Annual Report > Revenue");
        assert_eq!(chunks[3].metadata.page_number, Some(3));

        let table: Vec<_> = chunks.iter().filter(|c| c.chunk_type().is_table()).collect();
        assert_eq!(table.len(), 3);
        assert!(table.iter().all(|c| c.metadata.structural_path == "Annual Report > Revenue"));

        let last = chunks.last().unwrap();
        assert_eq!(last.metadata.element_kind, ElementKind::ListItem);
        assert_eq!(last.metadata.structural_path, "Annual Report > Outlook");
    }

    #[test]
    fn heading_text_not_duplicated_into_prose() {
        let chunks = SemanticChunker::default().build(&doc());
        assert!(!chunks[3].content.contains("Revenue >"));
        assert_eq!(chunks[3].content, "Revenue grew.");
    }

    #[test]
    fn parallel_matches_sequential() {
        let chunker = SemanticChunker::default();
        let elements = doc();
        assert_eq!(chunker.build(&elements), chunker.build_parallel(&elements));
    }

    #[test]
    fn blank_element_gets_placeholder() {
        let chunks = SemanticChunker::default().build(&[DocumentElement::narrative(0, "  ")]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "[empty NarrativeText element]");
    }

    #[test]
    fn unknown_kind_passes_text_verbatim() {
        let chunks =
            SemanticChunker::default().build(&[DocumentElement::other(0, "Formula", " E = mc^2 ")]);
        assert_eq!(chunks[0].content, " E = mc^2 ");
        assert_eq!(chunks[0].chunk_type(), ChunkType::Prose);
        assert_eq!(chunks[0].metadata.element_kind, ElementKind::Other);
    }

    #[test]
    fn custom_separator() {
        let chunker = SemanticChunker::new(ChunkerConfig {
            path_separator: " / ".into(),
            ..Default::default()
        })
        .unwrap();
        let chunks = chunker.build(&doc());
        assert_eq!(chunks[3].metadata.structural_path, "Annual Report / Revenue");
    }

    #[test]
    fn invalid_config_rejected() {
        let result = SemanticChunker::new(ChunkerConfig {
            row_cap: 0,
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn custom_classifier_is_used() {
        struct Flat;
        impl HeadingClassifier for Flat {
            fn classify_heading_level(&self, _: &DocumentElement) -> u8 {
                1
            }
        }
        let chunks = SemanticChunker::default().with_classifier(Flat).build(&doc());
        // Every heading is a sibling, so no nesting.
        assert_eq!(chunks[3].metadata.structural_path, "Revenue");
    }

    #[test]
    fn sections_disambiguate_separator_in_title() {
        let chunker = SemanticChunker::default();
        let single = chunker.build(&[
            DocumentElement::title(0, "A > B", Some(1)),
            DocumentElement::narrative(1, "text"),
        ]);
        let nested = chunker.build(&[
            DocumentElement::title(0, "A", Some(1)),
            DocumentElement::title(1, "B", Some(2)),
            DocumentElement::narrative(2, "text"),
        ]);

        let single = &single.last().unwrap().metadata;
        let nested = &nested.last().unwrap().metadata;
        assert_eq!(single.structural_path, nested.structural_path);
        assert_ne!(single.sections, nested.sections);

        let titles: Vec<_> = single.sections.titles().collect();
        assert_eq!(titles, vec!["A > B"]);
        let levels: Vec<_> = nested.sections.headings().iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![1, 2]);
    }
}
