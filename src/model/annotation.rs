//! Annotation Types
//!
//! A fully classified and placed annotation, plus the supporting enums for
//! type, page zone, placement, and reveal tier.

use serde::{Deserialize, Serialize};

use super::character::Character;

/// What kind of mark the annotation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationType {
    /// Fixed, non-interactive note anchored to a page margin
    Marginalia,
    /// Draggable, freely placed note; modern era only
    InteractiveNote,
    /// A mark covering withheld text
    Redaction,
    /// Official stamp or seal
    Stamp,
    /// Present in the data but not rendered until revealed
    Hidden,
}

impl AnnotationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Marginalia => "marginalia",
            Self::InteractiveNote => "interactive_note",
            Self::Redaction => "redaction",
            Self::Stamp => "stamp",
            Self::Hidden => "hidden",
        }
    }
}

/// Page regions an annotation can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    LeftMargin,
    RightMargin,
    TopMargin,
    BottomMargin,
    Content,
}

impl Zone {
    /// All zones, in a fixed order (placement draws index into this).
    pub const ALL: [Zone; 5] = [
        Self::LeftMargin,
        Self::RightMargin,
        Self::TopMargin,
        Self::BottomMargin,
        Self::Content,
    ];

    /// The four margin bands; the only zones open to historical annotations.
    pub const MARGINS: [Zone; 4] =
        [Self::LeftMargin, Self::RightMargin, Self::TopMargin, Self::BottomMargin];

    pub fn is_margin(&self) -> bool {
        !matches!(self, Self::Content)
    }
}

/// Resolution-independent placement on a page.
///
/// `x` and `y` are fractions of page width/height in `[0, 1]`; rotation is
/// radians around the annotation's own center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub zone: Zone,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

/// Progressive-disclosure tier, ordinal 1 (everything hidden but the
/// academic text) through 5 (full revelation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealLevel {
    Academic,
    FamilySecrets,
    Investigation,
    ModernMystery,
    CompleteTruth,
}

impl RevealLevel {
    /// All tiers in ascending order.
    pub const ALL: [RevealLevel; 5] = [
        Self::Academic,
        Self::FamilySecrets,
        Self::Investigation,
        Self::ModernMystery,
        Self::CompleteTruth,
    ];

    /// Ordinal in 1..=5.
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Academic => 1,
            Self::FamilySecrets => 2,
            Self::Investigation => 3,
            Self::ModernMystery => 4,
            Self::CompleteTruth => 5,
        }
    }

    /// Inverse of [`ordinal`](Self::ordinal); out-of-range values clamp to
    /// the base tier rather than failing.
    pub fn from_ordinal(n: u8) -> Self {
        match n {
            2 => Self::FamilySecrets,
            3 => Self::Investigation,
            4 => Self::ModernMystery,
            5 => Self::CompleteTruth,
            _ => Self::Academic,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Academic => "Academic Study",
            Self::FamilySecrets => "Family Secrets",
            Self::Investigation => "Research Investigation",
            Self::ModernMystery => "Modern Mystery",
            Self::CompleteTruth => "Complete Truth",
        }
    }
}

/// A fully classified, placed annotation as it appears in the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    /// Stable unique id; the placement seed derives from it
    pub id: String,
    pub character: Character,
    /// Raw annotation text, style markers and signoffs included
    pub text: String,
    /// Display text with style markers and trailing signoffs stripped
    pub clean_text: String,
    #[serde(rename = "type")]
    pub kind: AnnotationType,
    pub year: Option<i32>,
    /// Label of the chapter this annotation belongs to, when known
    pub chapter: Option<String>,
    pub position: Position,
    pub reveal_level: RevealLevel,
    /// Discovered by scanning body text rather than supplied as a record
    pub embedded: bool,
    /// Modern-era interactive notes can be repositioned by the reader
    pub draggable: bool,
    /// Weak references to related annotation ids; lookup only, no ownership
    pub related: Vec<String>,
}
