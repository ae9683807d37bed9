use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Epistemic category assigned to a claim or to a whole verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerdictCategory {
    VerifiedFact,
    ExpertConsensus,
    PartiallyVerified,
    Opinion,
    Speculation,
    Disputed,
    LikelyFalse,
    ConfirmedFalse,
}

impl VerdictCategory {
    pub const ALL: [VerdictCategory; 8] = [
        VerdictCategory::VerifiedFact,
        VerdictCategory::ExpertConsensus,
        VerdictCategory::PartiallyVerified,
        VerdictCategory::Opinion,
        VerdictCategory::Speculation,
        VerdictCategory::Disputed,
        VerdictCategory::LikelyFalse,
        VerdictCategory::ConfirmedFalse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictCategory::VerifiedFact => "verified_fact",
            VerdictCategory::ExpertConsensus => "expert_consensus",
            VerdictCategory::PartiallyVerified => "partially_verified",
            VerdictCategory::Opinion => "opinion",
            VerdictCategory::Speculation => "speculation",
            VerdictCategory::Disputed => "disputed",
            VerdictCategory::LikelyFalse => "likely_false",
            VerdictCategory::ConfirmedFalse => "confirmed_false",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            VerdictCategory::VerifiedFact => "Verified fact",
            VerdictCategory::ExpertConsensus => "Expert consensus",
            VerdictCategory::PartiallyVerified => "Partially verified",
            VerdictCategory::Opinion => "Opinion",
            VerdictCategory::Speculation => "Speculation",
            VerdictCategory::Disputed => "Disputed",
            VerdictCategory::LikelyFalse => "Likely false",
            VerdictCategory::ConfirmedFalse => "Confirmed false",
        }
    }

    /// Parse a provider-supplied category, defaulting to `PartiallyVerified`
    ///
    /// Accepts the canonical snake_case names plus the spaced / hyphenated
    /// spellings models tend to produce ("Verified Fact", "likely-false").
    pub fn parse_or_default(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .unwrap_or(VerdictCategory::PartiallyVerified)
    }

    /// Categories that assert the claim is established as true
    pub fn is_affirmative(&self) -> bool {
        matches!(
            self,
            VerdictCategory::VerifiedFact | VerdictCategory::ExpertConsensus
        )
    }
}

impl fmt::Display for VerdictCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated classification of a single claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClassificationResult {
    pub category: VerdictCategory,
    /// Confidence in [0, 1]
    pub confidence: f64,
    pub reasoning: String,
}

impl ClassificationResult {
    pub fn new(category: VerdictCategory, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self {
            category,
            confidence: clamp_unit(confidence),
            reasoning: reasoning.into(),
        }
    }
}

/// Clamp a score into [0, 1]; non-finite values collapse to the midpoint
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        for category in VerdictCategory::ALL {
            assert_eq!(VerdictCategory::parse_or_default(category.as_str()), category);
        }
    }

    #[test]
    fn test_parse_loose_spellings() {
        assert_eq!(
            VerdictCategory::parse_or_default("Verified Fact"),
            VerdictCategory::VerifiedFact
        );
        assert_eq!(
            VerdictCategory::parse_or_default(" likely-false "),
            VerdictCategory::LikelyFalse
        );
    }

    #[test]
    fn test_unknown_category_defaults_to_partially_verified() {
        assert_eq!(
            VerdictCategory::parse_or_default("mostly true"),
            VerdictCategory::PartiallyVerified
        );
        assert_eq!(
            VerdictCategory::parse_or_default(""),
            VerdictCategory::PartiallyVerified
        );
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(ClassificationResult::new(VerdictCategory::Opinion, 1.7, "").confidence, 1.0);
        assert_eq!(ClassificationResult::new(VerdictCategory::Opinion, -0.2, "").confidence, 0.0);
        assert_eq!(clamp_unit(f64::NAN), 0.5);
    }
}
