// src/scoring/category.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::error::ScoringError;

/// The readiness dimension a quiz exercises and a goal tracks.
///
/// Shared by the specialization mapping, `ReadinessScores` and goals so that
/// a mismatch is a parse failure instead of a silently skipped comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessCategory {
    /// Older goal rows call this dimension "readiness".
    #[serde(alias = "readiness")]
    Overall,
    Technical,
    SoftSkills,
    Leadership,
}

impl ReadinessCategory {
    /// The three dimensions `overall` is derived from.
    pub const SUB_DIMENSIONS: [ReadinessCategory; 3] = [
        ReadinessCategory::Technical,
        ReadinessCategory::SoftSkills,
        ReadinessCategory::Leadership,
    ];

    pub const ALL: [ReadinessCategory; 4] = [
        ReadinessCategory::Overall,
        ReadinessCategory::Technical,
        ReadinessCategory::SoftSkills,
        ReadinessCategory::Leadership,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadinessCategory::Overall => "overall",
            ReadinessCategory::Technical => "technical",
            ReadinessCategory::SoftSkills => "soft_skills",
            ReadinessCategory::Leadership => "leadership",
        }
    }

    /// Human readable label used in benchmark insights.
    pub fn label(&self) -> &'static str {
        match self {
            ReadinessCategory::Overall => "Overall readiness",
            ReadinessCategory::Technical => "Technical skills",
            ReadinessCategory::SoftSkills => "Soft skills",
            ReadinessCategory::Leadership => "Leadership",
        }
    }
}

impl fmt::Display for ReadinessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadinessCategory {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overall" | "readiness" => Ok(ReadinessCategory::Overall),
            "technical" => Ok(ReadinessCategory::Technical),
            "soft_skills" => Ok(ReadinessCategory::SoftSkills),
            "leadership" => Ok(ReadinessCategory::Leadership),
            _ => Err(ScoringError::InvalidCategory(s.to_string())),
        }
    }
}
