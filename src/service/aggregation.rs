//! Verdict aggregation
//!
//! Combines per-claim classifications with third-party fact-check consensus into
//! one overall verdict. Pure; cannot fail.

use std::collections::HashSet;

use crate::model::{ClassificationResult, FactCheckRecord, Source, VerdictCategory};

const CONSENSUS_CONFIDENCE: u8 = 85;
const SINGLE_FALSE_CONFIDENCE: u8 = 75;
const NO_CLAIMS_CONFIDENCE: u8 = 50;

/// Ratings that read as "false", matched as substrings of the lowercased verdict
const FALSE_MARKERS: &[&str] = &[
    "false",
    "pants on fire",
    "fake",
    "incorrect",
    "inaccurate",
    "untrue",
    "not true",
    "not correct",
    "not accurate",
    "hoax",
    "fabricated",
    "debunked",
    "baseless",
    "wrong",
];

/// Ratings that read as "true"; checked only after the false markers
const TRUE_MARKERS: &[&str] = &["true", "correct", "accurate", "verified"];

/// Mixed ratings, never counted on either side
const MIXED_MARKERS: &[&str] = &["mostly true", "partly true", "partially true", "half true"];

/// Overall outcome of aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateVerdict {
    pub category: VerdictCategory,
    /// Confidence in [0, 100]
    pub confidence: u8,
}

/// Whether a fact-check rating belongs to the "false" family
pub fn is_false_verdict(verdict: &str) -> bool {
    let v = verdict.to_lowercase();
    if MIXED_MARKERS.iter().any(|m| v.contains(m)) {
        return false;
    }
    FALSE_MARKERS.iter().any(|m| v.contains(m))
}

/// Whether a fact-check rating belongs to the "true" family
pub fn is_true_verdict(verdict: &str) -> bool {
    let v = verdict.to_lowercase();
    if is_false_verdict(&v) || MIXED_MARKERS.iter().any(|m| v.contains(m)) {
        return false;
    }
    TRUE_MARKERS.iter().any(|m| v.contains(m))
}

fn url_key(url: &str) -> String {
    url.trim().trim_end_matches('/').to_lowercase()
}

/// Deduplicate sources by URL, keeping the first occurrence
pub fn dedup_sources(sources: Vec<Source>) -> Vec<Source> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|s| seen.insert(url_key(&s.url)))
        .collect()
}

/// Deduplicate fact-checks by (organisation, verdict), keeping the first occurrence
pub fn dedup_fact_checks(fact_checks: Vec<FactCheckRecord>) -> Vec<FactCheckRecord> {
    let mut seen = HashSet::new();
    fact_checks
        .into_iter()
        .filter(|f| {
            seen.insert((
                f.org.trim().to_lowercase(),
                f.verdict.trim().to_lowercase(),
            ))
        })
        .collect()
}

/// Count (false-family, true-family) ratings
pub fn count_verdict_families(fact_checks: &[FactCheckRecord]) -> (usize, usize) {
    fact_checks.iter().fold((0, 0), |(f, t), fc| {
        if is_false_verdict(&fc.verdict) {
            (f + 1, t)
        } else if is_true_verdict(&fc.verdict) {
            (f, t + 1)
        } else {
            (f, t)
        }
    })
}

/// Aggregate per-claim classifications and fact-checks into one verdict
///
/// Priority: fact-check consensus (false, then single false, then true) beats the
/// per-claim majority vote; with no claims the result is `partially_verified`.
pub fn aggregate(
    claims: &[ClassificationResult],
    fact_checks: &[FactCheckRecord],
) -> AggregateVerdict {
    let fact_checks = dedup_fact_checks(fact_checks.to_vec());
    let (false_count, true_count) = count_verdict_families(&fact_checks);

    if false_count >= 2 {
        return AggregateVerdict {
            category: VerdictCategory::ConfirmedFalse,
            confidence: CONSENSUS_CONFIDENCE,
        };
    }

    if false_count == 1 && true_count == 0 {
        return AggregateVerdict {
            category: VerdictCategory::LikelyFalse,
            confidence: SINGLE_FALSE_CONFIDENCE,
        };
    }

    if true_count >= 2 {
        return AggregateVerdict {
            category: VerdictCategory::VerifiedFact,
            confidence: CONSENSUS_CONFIDENCE,
        };
    }

    if claims.is_empty() {
        return AggregateVerdict {
            category: VerdictCategory::PartiallyVerified,
            confidence: NO_CLAIMS_CONFIDENCE,
        };
    }

    AggregateVerdict {
        category: majority_category(claims),
        confidence: mean_confidence(claims),
    }
}

/// Most frequent category; ties go to the first encountered
fn majority_category(claims: &[ClassificationResult]) -> VerdictCategory {
    let mut counts: Vec<(VerdictCategory, usize)> = Vec::new();
    for claim in claims {
        match counts.iter_mut().find(|(c, _)| *c == claim.category) {
            Some((_, n)) => *n += 1,
            None => counts.push((claim.category, 1)),
        }
    }

    let mut best = counts[0];
    for entry in counts.iter().skip(1) {
        if entry.1 > best.1 {
            best = *entry;
        }
    }
    best.0
}

fn mean_confidence(claims: &[ClassificationResult]) -> u8 {
    let total: f64 = claims.iter().map(|c| c.confidence.clamp(0.0, 1.0)).sum();
    let mean = total / claims.len() as f64;
    (mean * 100.0).round().clamp(0.0, 100.0) as u8
}
