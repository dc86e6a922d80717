//! Character Identities
//!
//! The annotating cast is an open but mostly-fixed set: six known hands plus
//! an `Unknown` sentinel for anything the classifier cannot attribute.

use serde::{Deserialize, Serialize};

/// A known annotating character, or `Unknown` when attribution fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Character {
    /// Margaret Blackthorn - last of the family, kept its secrets
    #[serde(rename = "MB")]
    Mb,
    /// James Reed - independent researcher, disappeared 1989
    #[serde(rename = "JR")]
    Jr,
    /// Eliza Winston - structural engineer, precise red pen
    #[serde(rename = "EW")]
    Ew,
    /// Simon Wells - current investigator, searching for his sister
    #[serde(rename = "SW")]
    Sw,
    /// Detective Moira Sharma - county police, official green ink
    Sharma,
    /// Dr. E. Chambers - government analyst, Department 8
    Chambers,
    /// Attribution failed; observable in snapshot counters
    Unknown,
}

impl Character {
    /// Every known character, in canonical discovery order. `Unknown` is
    /// deliberately last so rollup maps serialize in a stable order.
    pub const ALL: [Character; 7] = [
        Self::Mb,
        Self::Jr,
        Self::Ew,
        Self::Sw,
        Self::Sharma,
        Self::Chambers,
        Self::Unknown,
    ];

    /// Machine-readable identifier (matches the serialized form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mb => "MB",
            Self::Jr => "JR",
            Self::Ew => "EW",
            Self::Sw => "SW",
            Self::Sharma => "Sharma",
            Self::Chambers => "Chambers",
            Self::Unknown => "Unknown",
        }
    }

    /// Full display name.
    pub fn full_name(&self) -> &'static str {
        match self {
            Self::Mb => "Margaret Blackthorn",
            Self::Jr => "James Reed",
            Self::Ew => "Eliza Winston",
            Self::Sw => "Simon Wells",
            Self::Sharma => "Detective Moira Sharma",
            Self::Chambers => "Dr. E. Chambers",
            Self::Unknown => "Unknown",
        }
    }

    /// Narrative role.
    pub fn role(&self) -> &'static str {
        match self {
            Self::Mb => "Family Guardian",
            Self::Jr => "Independent Researcher",
            Self::Ew => "Structural Engineer",
            Self::Sw => "Current Investigator",
            Self::Sharma => "Police Investigator",
            Self::Chambers => "Government Analyst",
            Self::Unknown => "Unknown",
        }
    }

    /// Years the character was active, as printed in front matter.
    pub fn active_years(&self) -> &'static str {
        match self {
            Self::Mb => "1930-1999",
            Self::Jr => "1984-1990",
            Self::Ew => "1995-1999",
            Self::Sw | Self::Sharma | Self::Chambers => "2024+",
            Self::Unknown => "unknown",
        }
    }

    /// Handwriting description used by embedded-annotation style markers.
    pub fn script_description(&self) -> &'static str {
        match self {
            Self::Mb => "Elegant blue script",
            Self::Jr => "Messy black ballpoint",
            Self::Ew => "Precise red pen",
            Self::Sw => "Hurried pencil",
            Self::Sharma => "Detective's green ink",
            Self::Chambers => "Official black ink",
            Self::Unknown => "Unidentified hand",
        }
    }

    /// Family set: knowledge passed down inside the household.
    pub fn is_family(&self) -> bool {
        matches!(self, Self::Mb)
    }

    /// Research set: the 1980s/90s investigation.
    pub fn is_research(&self) -> bool {
        matches!(self, Self::Jr | Self::Ew)
    }

    /// Modern investigator/official set.
    pub fn is_modern(&self) -> bool {
        matches!(self, Self::Sw | Self::Sharma | Self::Chambers)
    }

    /// Parse a character from an explicit record field. Initials, full
    /// names, and a few observed aliases are accepted; anything else is
    /// `Unknown` (classification gaps never raise).
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "MB" | "Margaret Blackthorn" | "Margaret" => Self::Mb,
            "JR" | "James Reed" => Self::Jr,
            "EW" | "Eliza Winston" => Self::Ew,
            "SW" | "Simon Wells" => Self::Sw,
            "Sharma" | "Detective Sharma" | "Detective Moira Sharma" | "Detective" => Self::Sharma,
            "Chambers" | "Dr. Chambers" | "Dr. E. Chambers" => Self::Chambers,
            _ => Self::Unknown,
        }
    }
}
