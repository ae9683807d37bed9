//! Oracle-extractable output shapes
//!
//! Category and type fields are kept as strings on purpose: they are parsed
//! into closed enums (with defaults) by the services that consume them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawClassification {
    /// One of: verified_fact, expert_consensus, partially_verified, opinion,
    /// speculation, disputed, likely_false, confirmed_false
    pub category: String,
    /// Confidence between 0 and 1
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawDecomposition {
    #[serde(default)]
    pub components: Vec<RawComponent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawComponent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    /// One of: verifiable_fact, value_judgment, prediction, presupposition
    #[serde(rename = "type", default)]
    pub component_type: String,
    /// Verifiability between 0 and 1
    #[serde(default)]
    pub verifiability_score: f64,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawClaims {
    #[serde(default)]
    pub claims: Vec<RawClaim>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawClaim {
    #[serde(default)]
    pub text: String,
    /// One of: factual, opinion, prediction
    #[serde(rename = "type", default)]
    pub claim_type: String,
    /// Confidence between 0 and 1 that this is a check-worthy claim
    #[serde(default)]
    pub confidence: f64,
}
