//! Data Model
//!
//! Core types shared across the compilation pipeline: annotations and their
//! placement, characters, pages, chapters, and the output snapshot.

pub mod annotation;
pub mod character;
pub mod document;

pub use annotation::{Annotation, AnnotationType, Position, RevealLevel, Zone};
pub use character::Character;
pub use document::{Chapter, CharacterTimeline, CorpusStats, Page, RedactionEntry, Snapshot};

/// Era boundaries that gate annotation behavior.
///
/// These constants are load-bearing for snapshot layout: changing them
/// changes classification and placement of existing corpora.
pub mod eras {
    /// Years before this resolve to the base (academic) reveal tier.
    pub const HISTORICAL_YEAR: i32 = 1960;

    /// Years at or after this mark the modern era: annotations become
    /// interactive, draggable, and may be placed in the content zone.
    pub const MODERN_YEAR: i32 = 2000;

    /// Fallback year used for chronological ordering when a record
    /// carries no year at all.
    pub const DEFAULT_TIMELINE_YEAR: i32 = 1967;
}
