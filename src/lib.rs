// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # strata
//!
//! Structure-aware semantic chunking for retrieval pipelines.
//!
//! Parsed document elements (headings, paragraphs, list items, tables) go in;
//! embedding-ready chunks with traceable metadata come out.
//!
//! ## Architecture
//!
//! - **Elements** (`element`): closed, typed model of parser output
//! - **Tables** (`table`): ragged-table normalization, numeric parsing, column statistics
//! - **Sections** (`section`): heading stack producing a structural path per element
//! - **Builder** (`builder`): prose chunks plus overview/analysis/query chunks per table
//! - **Chunks** (`chunk`): output contract consumed by embedding and storage
//!
//! ## Library usage
//!
//! ```
//! use strata::builder::SemanticChunker;
//! use strata::element::{DocumentElement, TableData};
//!
//! let elements = vec![
//!     DocumentElement::title(0, "Results", Some(1)),
//!     DocumentElement::table(
//!         1,
//!         TableData::new(
//!             vec!["Quarter".into(), "Revenue".into()],
//!             vec![vec!["Q1".into(), "$1,200".into()], vec!["Q2".into(), "$1,450".into()]],
//!         ),
//!     ),
//! ];
//! let chunks = SemanticChunker::default().build(&elements);
//! assert_eq!(chunks.len(), 4);
//! ```

pub mod builder;
pub mod chunk;
pub mod config;
pub mod element;
pub mod error;
pub mod section;
pub mod table;

pub use builder::SemanticChunker;
pub use chunk::{Chunk, ChunkMetadata, ChunkSummary, ChunkType};
pub use config::ChunkerConfig;
pub use element::{DocumentElement, ElementBody, ElementKind, TableData, decode_elements};
pub use error::{ChunkError, ChunkResult};
pub use section::{HeadingClassifier, SectionTracker, StructuralContext};
