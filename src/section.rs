//! Section tracking: the heading path enclosing each element.
//!
//! A single forward pass keeps a stack of `(level, title)` pairs. A heading of
//! level `L` pops every active heading of level `>= L` before being pushed, so
//! siblings replace each other instead of nesting.

use serde::Serialize;

use crate::element::{DocumentElement, ElementBody};

/// One heading on the active path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SectionHeading {
    /// Heading depth, 1 = outermost.
    pub level: u8,
    pub title: String,
}

/// Immutable snapshot of the heading path, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StructuralContext {
    headings: Vec<SectionHeading>,
}

impl StructuralContext {
    pub fn new(headings: Vec<SectionHeading>) -> Self {
        Self { headings }
    }

    pub fn headings(&self) -> &[SectionHeading] {
        &self.headings
    }

    pub fn is_root(&self) -> bool {
        self.headings.is_empty()
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.headings.iter().map(|h| h.title.as_str())
    }

    /// Titles joined with `separator`; empty string at the root.
    pub fn path(&self, separator: &str) -> String {
        self.titles().collect::<Vec<_>>().join(separator)
    }
}

/// Decides the level of a heading element.
pub trait HeadingClassifier {
    /// Level of `element`, 1 = outermost. Only called for `Title` elements.
    fn classify_heading_level(&self, element: &DocumentElement) -> u8;
}

impl<T: HeadingClassifier + ?Sized> HeadingClassifier for &T {
    fn classify_heading_level(&self, element: &DocumentElement) -> u8 {
        (**self).classify_heading_level(element)
    }
}

impl<T: HeadingClassifier + ?Sized> HeadingClassifier for Box<T> {
    fn classify_heading_level(&self, element: &DocumentElement) -> u8 {
        (**self).classify_heading_level(element)
    }
}

/// Upstream level if present, else the depth of a numbered prefix
/// (`"2.3.1 Scope"` is level 3), else 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHeadingClassifier;

impl HeadingClassifier for DefaultHeadingClassifier {
    fn classify_heading_level(&self, element: &DocumentElement) -> u8 {
        if let ElementBody::Title {
            level: Some(level), ..
        } = element.body()
        {
            return (*level).max(1);
        }
        numbered_prefix_depth(element.text()).unwrap_or(1)
    }
}

/// Depth of an outline number such as `3.`, `1.2` or `4.1.7` at the start of
/// a heading.
fn numbered_prefix_depth(text: &str) -> Option<u8> {
    let token = text.split_whitespace().next()?;
    let token = token.strip_suffix('.').unwrap_or(token);
    if token.is_empty() {
        return None;
    }
    let mut depth = 0u8;
    for segment in token.split('.') {
        if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        depth = depth.saturating_add(1);
    }
    Some(depth)
}

/// Forward-only tracker of the active heading path.
pub struct SectionTracker<C = DefaultHeadingClassifier> {
    stack: Vec<SectionHeading>,
    classifier: C,
}

impl SectionTracker {
    pub fn new() -> Self {
        Self::with_classifier(DefaultHeadingClassifier)
    }
}

impl Default for SectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: HeadingClassifier> SectionTracker<C> {
    pub fn with_classifier(classifier: C) -> Self {
        Self {
            stack: Vec::new(),
            classifier,
        }
    }

    /// Process one element and return the path in effect after it.
    ///
    /// Headings update the stack (and appear in their own path); every other
    /// element sees the stack unchanged. Blank headings are ignored.
    pub fn observe(&mut self, element: &DocumentElement) -> StructuralContext {
        if let ElementBody::Title { text, .. } = element.body() {
            let title = text.trim();
            if !title.is_empty() {
                let level = self.classifier.classify_heading_level(element).max(1);
                while self.stack.last().is_some_and(|h| h.level >= level) {
                    self.stack.pop();
                }
                self.stack.push(SectionHeading {
                    level,
                    title: title.to_string(),
                });
            }
        }
        self.current()
    }

    /// Snapshot of the current path.
    pub fn current(&self) -> StructuralContext {
        StructuralContext::new(self.stack.clone())
    }
}

/// Run a tracker over a whole document, one context per element.
pub fn structural_contexts<C: HeadingClassifier>(
    elements: &[DocumentElement],
    classifier: C,
) -> Vec<StructuralContext> {
    let mut tracker = SectionTracker::with_classifier(classifier);
    elements.iter().map(|el| tracker.observe(el)).collect()
}
