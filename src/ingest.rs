//! Input Records
//!
//! Raw, serde-deserializable input shapes and their normalization. Shape
//! irregularities (character field as single value vs list) are resolved
//! here, at the ingestion boundary; nothing downstream sees them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One chapter of source text, carrying its Roman-numeral label.
/// Loading these from disk is the caller's concern; the pipeline takes
/// them fully materialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterSource {
    /// e.g. "CHAPTER_IV_THE_EAST_WING"
    pub label: String,
    pub text: String,
}

/// The character field as found in the wild: a single value or a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacterField {
    One(String),
    Many(Vec<String>),
}

impl CharacterField {
    /// Collapse to a single canonical value: lists take their first
    /// element, empty values yield `None` (which classifies to Unknown).
    pub fn normalize(&self) -> Option<&str> {
        let s = match self {
            Self::One(s) => s.as_str(),
            Self::Many(v) => v.first().map(String::as_str).unwrap_or(""),
        };
        let s = s.trim();
        if s.is_empty() {
            None
        } else {
            Some(s)
        }
    }
}

/// A raw annotation record. Every field except `text` is optional;
/// malformed records default rather than abort.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationRecord {
    pub id: Option<String>,
    pub character: Option<CharacterField>,
    pub text: String,
    pub year: Option<i32>,
    pub chapter: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

// ============================================================================
// Roman-numeral chapter ordinals
// ============================================================================

static CHAPTER_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CHAPTER_([IVXLCDM]+)").expect("Invalid chapter label regex"));

/// Sort key for chapters whose label carries no parseable numeral:
/// they keep their input order, after every numbered chapter.
pub const UNNUMBERED_ORDINAL: u32 = u32::MAX;

/// Extract a chapter ordinal from a `CHAPTER_<numeral>` label.
pub fn chapter_ordinal(label: &str) -> Option<u32> {
    let caps = CHAPTER_LABEL.captures(label)?;
    Some(roman_to_int(caps.get(1).map(|m| m.as_str())?))
}

/// Convert a Roman numeral using standard subtractive notation.
/// Unrecognized characters contribute zero.
pub fn roman_to_int(roman: &str) -> u32 {
    fn value(c: char) -> u32 {
        match c {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => 0,
        }
    }

    let chars: Vec<char> = roman.chars().collect();
    let mut total: i64 = 0;
    for (i, &c) in chars.iter().enumerate() {
        let current = value(c) as i64;
        let next = chars.get(i + 1).map(|&n| value(n) as i64).unwrap_or(0);
        if current < next {
            total -= current;
        } else {
            total += current;
        }
    }
    total.max(0) as u32
}
