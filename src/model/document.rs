//! Document Structure
//!
//! Pages, chapters, per-character rollups, and the aggregate snapshot the
//! pipeline emits. All collections use insertion-ordered maps so a re-run
//! over unchanged input serializes byte-identically.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::redaction::RedactedSpan;
use crate::revelation::RevelationIndex;

use super::annotation::Annotation;
use super::character::Character;

/// One paginated slice of a chapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Contiguous from 1 within the numbering scope (corpus or chapter,
    /// depending on the configured mode)
    pub number: usize,
    /// Label of the owning chapter
    pub chapter: String,
    /// Paragraph-aligned text slice, paragraphs joined by blank lines
    pub text: String,
    pub word_count: usize,
    /// Placed annotations in assignment order
    pub annotations: Vec<Annotation>,
    /// Redacted spans found within this page's text slice
    pub redacted_spans: Vec<RedactedSpan>,
}

/// A chapter and its pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    /// Derived from the chapter's Roman-numeral label
    pub ordinal: u32,
    pub name: String,
    pub pages: Vec<Page>,
    pub word_count: usize,
}

/// Chronological rollup of one character's annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterTimeline {
    pub character: Character,
    pub full_name: String,
    pub role: String,
    /// Years the character was active, from their profile
    pub active_years: String,
    /// Annotation ids ordered by year (ties broken by id)
    pub annotation_ids: Vec<String>,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
}

/// A redacted span located within the corpus, for the flattened
/// document-level listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionEntry {
    pub chapter_ordinal: u32,
    pub chapter: String,
    pub span: RedactedSpan,
}

/// Corpus-wide counters. The classification-gap counters exist so quality
/// regressions show up in output instead of crashing the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusStats {
    pub total_chapters: usize,
    pub total_pages: usize,
    pub total_words: usize,
    pub total_annotations: usize,
    pub embedded_annotations: usize,
    /// Annotations that resolved to the Unknown sentinel
    pub unknown_character: usize,
    /// Externally supplied annotations dropped because every page in their
    /// chapter was already at the per-page cap
    pub overflow_annotations: usize,
    pub redacted_spans: usize,
    /// Per-character annotation counts in canonical discovery order
    pub per_character: IndexMap<String, usize>,
    /// Annotation counts per reveal tier, index 0 = tier 1
    pub per_tier: [usize; 5],
}

/// The immutable output of one compilation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub title: String,
    pub author: String,
    pub chapters: Vec<Chapter>,
    /// Rollups keyed by character id, canonical discovery order
    pub timelines: IndexMap<String, CharacterTimeline>,
    pub revelation: RevelationIndex,
    /// Every redacted span in the corpus, flattened for quick lookup
    pub redactions: Vec<RedactionEntry>,
    pub stats: CorpusStats,
}

impl Snapshot {
    /// Iterate every placed annotation across all chapters and pages.
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.chapters
            .iter()
            .flat_map(|c| c.pages.iter())
            .flat_map(|p| p.annotations.iter())
    }
}
