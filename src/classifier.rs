//! Annotation Classification
//!
//! Resolves which character wrote an annotation and at which disclosure
//! tier it becomes visible. Attribution is heuristic and inherently
//! approximate; the precedence below is fixed and first-match-wins:
//!
//! 1. explicit structured character field (normalized at ingestion)
//! 2. literal stylistic marker substring in the text
//! 3. trailing signoff of the form `-<initials>, <year>`
//! 4. era bucket from the year, disambiguated by domain keywords
//!
//! When both era and keyword heuristics could match different characters,
//! the era bucket is decided first and keywords only disambiguate within
//! it. Anything unresolvable is `Unknown`, never an error.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::annotation::{AnnotationType, RevealLevel};
use crate::model::character::Character;
use crate::model::eras;

// ============================================================================
// Compiled patterns
// ============================================================================

/// Literal style markers scribes leave in embedded annotations: each known
/// character's bracketed handwriting description, plus two spelled-out
/// signatures observed in official notes.
static STYLE_MARKERS: Lazy<Vec<(String, Character)>> = Lazy::new(|| {
    let mut markers: Vec<(String, Character)> = Character::ALL
        .iter()
        .filter(|c| **c != Character::Unknown)
        .map(|c| (format!("[{}]", c.script_description()), *c))
        .collect();
    markers.push(("Detective Sharma".to_string(), Character::Sharma));
    markers.push(("Dr. Chambers".to_string(), Character::Chambers));
    markers
});

/// Trailing signoff: `-MB, 1967` (optionally followed by punctuation).
static SIGNOFF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-([A-Z]{2}),\s*((?:19|20)\d{2})\s*[.!]?\s*$").expect("Invalid signoff regex")
});

/// Any plausible four-digit year, for records that bury the date in prose
/// (e.g. "April 2, 2024").
static YEAR_IN_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("Invalid year regex"));

/// Style markers and signoffs to strip for display text.
static CLEAN_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\[(?:Elegant blue script|Messy black ballpoint|Precise red pen|Hurried pencil|Detective's green ink|Official black ink)\]\s*",
        r"\s*-[A-Z]{1,2},?\s*\d{4}\s*[.!]?\s*$",
        r"\s*-[A-Z]{1,2}\s*$",
        r"\s*-Dr\.\s*Chambers\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid clean pattern"))
    .collect()
});

/// Keywords marking the fully supernatural tier.
const ENTITY_KEYWORDS: [&str; 2] = ["supernatural", "entity"];

/// Keywords marking redaction-style annotations.
const REDACTION_KEYWORDS: [&str; 2] = ["REDACTED", "CLASSIFIED"];

// ============================================================================
// Classification
// ============================================================================

/// The classifier's verdict for one annotation.
#[derive(Debug, Clone)]
pub struct Classification {
    pub character: Character,
    /// Explicit year, or one recovered from a signoff or from prose
    pub year: Option<i32>,
    pub kind: AnnotationType,
    pub reveal_level: RevealLevel,
    /// Display text with markers and signoffs stripped
    pub clean_text: String,
}

/// Classify an annotation from its normalized explicit character field,
/// raw text, and optional explicit year. Pure and total.
pub fn classify(explicit: Option<&str>, text: &str, year: Option<i32>) -> Classification {
    let (character, recovered_year) = resolve_character(explicit, text, year);
    let year = year.or(recovered_year);
    let reveal_level = reveal_level(character, year, text);
    let kind = annotation_kind(text, year);

    Classification {
        character,
        year,
        kind,
        reveal_level,
        clean_text: clean_text(text),
    }
}

/// Resolve the authoring character. Returns the character and any year
/// recovered from the text while resolving (a signoff year, or a year
/// found in prose when the record carries none).
pub fn resolve_character(
    explicit: Option<&str>,
    text: &str,
    year: Option<i32>,
) -> (Character, Option<i32>) {
    let signoff = signoff_year(text);
    let text_year = year.or(signoff).or_else(|| first_year_in(text));

    // 1. Explicit structured field wins outright, even when it names
    //    someone the heuristics would disagree with.
    if let Some(s) = explicit {
        let parsed = Character::parse(s);
        if parsed != Character::Unknown {
            return (parsed, text_year);
        }
        log::debug!("Explicit character field {s:?} not recognized, falling through");
    }

    // 2. Literal stylistic markers.
    for (marker, character) in STYLE_MARKERS.iter() {
        if text.contains(marker.as_str()) {
            return (*character, text_year);
        }
    }

    // 3. Trailing signoff initials.
    if let Some(caps) = SIGNOFF.captures(text.trim_end()) {
        let initials = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let parsed = Character::parse(initials);
        if parsed != Character::Unknown {
            return (parsed, text_year);
        }
    }

    // 4. Era bucket, disambiguated by domain keywords within the bucket.
    (era_fallback(text_year, text), text_year)
}

fn era_fallback(year: Option<i32>, text: &str) -> Character {
    let Some(year) = year else {
        return Character::Unknown;
    };
    let lower = text.to_lowercase();

    if year >= eras::MODERN_YEAR {
        if lower.contains("detective") || lower.contains("police") {
            Character::Sharma
        } else if lower.contains("department") || lower.contains("classified") {
            Character::Chambers
        } else {
            Character::Sw
        }
    } else if year >= 1970 {
        if lower.contains("structural") || lower.contains("engineer") || lower.contains("red pen") {
            Character::Ew
        } else if lower.contains("research")
            || lower.contains("university")
            || lower.contains("ballpoint")
        {
            Character::Jr
        } else {
            Character::Mb
        }
    } else {
        // The family held the house alone before the researchers arrived.
        Character::Mb
    }
}

/// Reveal level as a pure function of (character, year, text).
///
/// Order matters: a family-era annotation that happens to mention an
/// entity stays at the family tier; the keyword rule only catches text
/// no character set claimed.
pub fn reveal_level(character: Character, year: Option<i32>, text: &str) -> RevealLevel {
    match year {
        None => return RevealLevel::Academic,
        Some(y) if y < eras::HISTORICAL_YEAR => return RevealLevel::Academic,
        Some(_) => {}
    }

    if character.is_family() {
        RevealLevel::FamilySecrets
    } else if character.is_research() {
        RevealLevel::Investigation
    } else if character.is_modern() {
        RevealLevel::ModernMystery
    } else {
        let lower = text.to_lowercase();
        if ENTITY_KEYWORDS.iter().any(|k| lower.contains(k)) {
            RevealLevel::CompleteTruth
        } else {
            RevealLevel::Academic
        }
    }
}

/// Derive the annotation type from year and content.
pub fn annotation_kind(text: &str, year: Option<i32>) -> AnnotationType {
    if year.is_some_and(|y| y >= eras::MODERN_YEAR) {
        AnnotationType::InteractiveNote
    } else {
        let upper = text.to_uppercase();
        if REDACTION_KEYWORDS.iter().any(|k| upper.contains(k)) {
            AnnotationType::Redaction
        } else {
            AnnotationType::Marginalia
        }
    }
}

/// Strip style markers and trailing signoffs for display.
pub fn clean_text(text: &str) -> String {
    let mut out = text.to_string();
    for pattern in CLEAN_PATTERNS.iter() {
        out = pattern.replace_all(&out, "").into_owned();
    }
    out.trim().to_string()
}

/// Whether the text carries an embedded-annotation style marker.
pub fn is_embedded(text: &str) -> bool {
    STYLE_MARKERS
        .iter()
        .any(|(marker, _)| marker.starts_with('[') && text.contains(marker.as_str()))
}

fn signoff_year(text: &str) -> Option<i32> {
    SIGNOFF
        .captures(text.trim_end())
        .and_then(|caps| caps.get(2))
        .and_then(|m| m.as_str().parse().ok())
}

fn first_year_in(text: &str) -> Option<i32> {
    YEAR_IN_TEXT.find(text).and_then(|m| m.as_str().parse().ok())
}

// ============================================================================
// Embedded annotation extraction
// ============================================================================

/// An annotation discovered inside chapter body text.
#[derive(Debug, Clone)]
pub struct EmbeddedNote {
    pub character: Character,
    pub text: String,
    pub year: Option<i32>,
}

/// Per-character signature patterns for embedded annotations. Each couples
/// the character's style marker to their customary signoff.
static EMBEDDED_PATTERNS: Lazy<Vec<(Character, Regex)>> = Lazy::new(|| {
    [
        (Character::Mb, r"(?si)\[Elegant blue script\](.*?)-MB, (\d{4})"),
        (Character::Jr, r"(?si)\[Messy black ballpoint\](.*?)-JR, (\d{4})"),
        (Character::Ew, r"(?si)\[Precise red pen\](.*?)-EW, (\d{4})"),
        (Character::Sw, r"(?si)\[Hurried pencil\](.*?)-SW, (\w+\s+\d+,\s+\d{4})"),
        (Character::Sharma, r"(?si)\[Detective's green ink\](.*?)Detective [A-Za-z]+ Sharma"),
        (Character::Chambers, r"(?si)\[Official black ink\](.*?)-Dr\.\s*Chambers"),
    ]
    .iter()
    .map(|(c, p)| (*c, Regex::new(p).expect("Invalid embedded pattern")))
    .collect()
});

/// Scan chapter body text for embedded annotations. Scan order follows the
/// fixed pattern table, so output order is stable for a given text.
pub fn extract_embedded(text: &str) -> Vec<EmbeddedNote> {
    let mut notes = Vec::new();

    for (character, pattern) in EMBEDDED_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let body = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            let year = caps.get(2).and_then(|m| parse_year(m.as_str()));
            notes.push(EmbeddedNote {
                character: *character,
                text: body.to_string(),
                year,
            });
        }
    }

    notes
}

/// Parse a year out of a date string in any of the observed formats
/// ("1967", "April 2, 2024").
fn parse_year(s: &str) -> Option<i32> {
    s.trim().parse().ok().or_else(|| first_year_in(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_marginalia_classifies_to_family_tier() {
        let c = classify(None, "[Elegant blue script] Stay away from the east wing. -MB, 1967", None);
        assert_eq!(c.character, Character::Mb);
        assert_eq!(c.year, Some(1967));
        assert_eq!(c.kind, AnnotationType::Marginalia);
        assert_eq!(c.reveal_level, RevealLevel::FamilySecrets);
        assert_eq!(c.clean_text, "Stay away from the east wing.");
    }

    #[test]
    fn test_explicit_field_beats_markers() {
        let text = "[Messy black ballpoint] borrowed observation -JR, 1986";
        let (character, year) = resolve_character(Some("EW"), text, None);
        assert_eq!(character, Character::Ew);
        assert_eq!(year, Some(1986)); // year still recovered from signoff
    }

    #[test]
    fn test_unrecognized_explicit_field_falls_through_to_markers() {
        let text = "[Precise red pen] load calculations are wrong";
        let (character, _) = resolve_character(Some("someone"), text, None);
        assert_eq!(character, Character::Ew);
    }

    #[test]
    fn test_signoff_resolves_initials_and_year() {
        let (character, year) = resolve_character(None, "The foundations shift at night. -JR, 1987", None);
        assert_eq!(character, Character::Jr);
        assert_eq!(year, Some(1987));
    }

    #[test]
    fn test_era_fallback_modern_police() {
        let (character, _) =
            resolve_character(None, "Police report filed April 2, 2024 regarding the missing hiker", None);
        assert_eq!(character, Character::Sharma);
    }

    #[test]
    fn test_era_fallback_research_keywords() {
        let (character, _) =
            resolve_character(None, "University research notes from the 1986 survey", None);
        assert_eq!(character, Character::Jr);

        let (character, _) =
            resolve_character(None, "Structural assessment dated 1996 shows impossible loads", None);
        assert_eq!(character, Character::Ew);
    }

    #[test]
    fn test_no_year_no_marker_is_unknown() {
        let (character, year) = resolve_character(None, "an unattributable scrawl", None);
        assert_eq!(character, Character::Unknown);
        assert_eq!(year, None);
    }

    #[test]
    fn test_reveal_level_is_total() {
        let cases = [
            (Character::Mb, Some(1967), "note"),
            (Character::Jr, Some(1986), "note"),
            (Character::Sw, Some(2024), "note"),
            (Character::Unknown, None, "note"),
            (Character::Unknown, Some(2024), "the entity watches"),
            (Character::Mb, Some(1950), "pre-threshold"),
        ];
        for (character, year, text) in cases {
            let n = reveal_level(character, year, text).ordinal();
            assert!((1..=5).contains(&n));
        }
    }

    #[test]
    fn test_reveal_level_rules() {
        assert_eq!(reveal_level(Character::Mb, None, ""), RevealLevel::Academic);
        assert_eq!(reveal_level(Character::Mb, Some(1950), ""), RevealLevel::Academic);
        assert_eq!(reveal_level(Character::Mb, Some(1967), ""), RevealLevel::FamilySecrets);
        assert_eq!(reveal_level(Character::Ew, Some(1996), ""), RevealLevel::Investigation);
        assert_eq!(reveal_level(Character::Chambers, Some(2024), ""), RevealLevel::ModernMystery);
        assert_eq!(
            reveal_level(Character::Unknown, Some(2024), "a supernatural manifestation"),
            RevealLevel::CompleteTruth
        );
        assert_eq!(reveal_level(Character::Unknown, Some(2024), "plain text"), RevealLevel::Academic);
    }

    #[test]
    fn test_character_sets_outrank_entity_keywords() {
        // A family-era note mentioning an entity stays at the family tier.
        assert_eq!(
            reveal_level(Character::Mb, Some(1975), "the entity in the walls"),
            RevealLevel::FamilySecrets
        );
    }

    #[test]
    fn test_annotation_kind_derivation() {
        assert_eq!(annotation_kind("note", Some(2024)), AnnotationType::InteractiveNote);
        assert_eq!(annotation_kind("[REDACTED] by order", Some(1988)), AnnotationType::Redaction);
        assert_eq!(annotation_kind("plain margin note", Some(1967)), AnnotationType::Marginalia);
        assert_eq!(annotation_kind("plain margin note", None), AnnotationType::Marginalia);
    }

    #[test]
    fn test_clean_text_strips_markers_and_signoffs() {
        assert_eq!(
            clean_text("[Hurried pencil] She was here. I know it. -SW"),
            "She was here. I know it."
        );
        assert_eq!(clean_text("[Precise red pen] Beam B-7 is unsupported. -EW, 1996."), "Beam B-7 is unsupported.");
    }

    #[test]
    fn test_extract_embedded_finds_each_hand() {
        let text = "The east wing was completed in 1894.\n\n\
            [Elegant blue script] Do not trust the measurements. -MB, 1967\n\n\
            More architectural description follows here.\n\n\
            [Hurried pencil] Claire stood right here. -SW, April 2, 2024";

        let notes = extract_embedded(text);
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].character, Character::Mb);
        assert_eq!(notes[0].year, Some(1967));
        assert_eq!(notes[0].text, "Do not trust the measurements.");
        assert_eq!(notes[1].character, Character::Sw);
        assert_eq!(notes[1].year, Some(2024));
    }

    #[test]
    fn test_extract_embedded_empty_text() {
        assert!(extract_embedded("").is_empty());
        assert!(extract_embedded("no annotations in this chapter at all").is_empty());
    }

    #[test]
    fn test_is_embedded_detects_style_markers_only() {
        assert!(is_embedded("[Elegant blue script] a note"));
        assert!(!is_embedded("Detective Sharma filed the report"));
        assert!(!is_embedded("plain text"));
    }
}
