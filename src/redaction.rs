//! Redacted Span Extraction
//!
//! Pattern-based discovery of withheld text. Spans are recorded against
//! the original string, before any display markup exists, so offsets stay
//! valid for any consumer. Extraction is best-effort: unmatched syntax is
//! simply not flagged, and the scan never fails the run.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::annotation::RevealLevel;

/// One alternation over every redaction marker. Literal bracketed markers
/// plus runs of at least four block characters left by physical blackouts.
static REDACTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\[REDACTED\]|\[CLASSIFIED\]|\[DATA EXPUNGED\]|\[REMOVED BY ORDER OF\]|\u{2588}{4,}",
    )
    .expect("Invalid redaction pattern")
});

/// What each known marker conceals. Unknown markers (including block runs)
/// fall back to a generic placeholder.
fn reveal_for(marker: &str) -> &'static str {
    match marker {
        "[REDACTED]" => "dimensional entities",
        "[CLASSIFIED]" => "supernatural manifestations",
        "[DATA EXPUNGED]" => "The Watchers",
        "[REMOVED BY ORDER OF]" => "Department 8 - Anomalous Phenomena Division",
        _ => "classified information",
    }
}

/// A withheld span within one piece of text.
///
/// `start` and `end` are character offsets into the original string
/// (half-open), not byte offsets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactedSpan {
    pub start: usize,
    pub end: usize,
    /// The literal marker as it appears in the text
    pub hidden_text: String,
    /// What the marker conceals, from the static reveal table
    pub revealed_text: String,
    /// Redactions only lift at the maximum tier
    pub reveal_level: RevealLevel,
}

/// Text annotated with its redacted spans; enough metadata for a consumer
/// to toggle hidden/revealed rendering without re-scanning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactedText {
    pub text: String,
    pub spans: Vec<RedactedSpan>,
}

impl RedactedText {
    /// Render the text as seen from a given tier: at the maximum tier the
    /// reveal strings replace the markers, below it the markers stand.
    pub fn render(&self, level: RevealLevel) -> String {
        if level < RevealLevel::CompleteTruth || self.spans.is_empty() {
            return self.text.clone();
        }

        let chars: Vec<char> = self.text.chars().collect();
        let mut out = String::with_capacity(self.text.len());
        let mut cursor = 0usize;
        for span in &self.spans {
            out.extend(&chars[cursor..span.start]);
            out.push_str(&span.revealed_text);
            cursor = span.end;
        }
        out.extend(&chars[cursor..]);
        out
    }
}

/// Scan text for every non-overlapping redaction marker.
pub fn extract(text: &str) -> RedactedText {
    let mut spans = Vec::new();

    for m in REDACTION_PATTERN.find_iter(text) {
        // Offsets are converted from bytes to characters so they survive
        // any non-ASCII prose around the marker.
        let start = text[..m.start()].chars().count();
        let end = start + m.as_str().chars().count();
        spans.push(RedactedSpan {
            start,
            end,
            hidden_text: m.as_str().to_string(),
            revealed_text: reveal_for(m.as_str()).to_string(),
            reveal_level: RevealLevel::CompleteTruth,
        });
    }

    if !spans.is_empty() {
        log::debug!("Found {} redacted span(s)", spans.len());
    }

    RedactedText { text: text.to_string(), spans }
}
