//! Prompts for claim classification

use crate::model::{FactCheckRecord, Source};

/// Longest snippet forwarded to the oracle per source
const MAX_SNIPPET_CHARS: usize = 400;

/// System prompt for evidence-grounded classification
pub const CLASSIFICATION_SYSTEM_PROMPT: &str = r#"You are an epistemic classifier for a fact-checking service.

Your role is to decide what kind of statement a claim is and how well the
available evidence supports it.

## Categories

Return exactly one of:
- verified_fact: directly confirmed by multiple reliable sources
- expert_consensus: the established position of the relevant scientific or scholarly field
- partially_verified: some parts are supported, others are unsupported or missing
- opinion: a value judgment, preference or interpretation that evidence cannot settle
- speculation: a prediction or hypothesis about things not yet known
- disputed: credible sources genuinely disagree
- likely_false: the weight of evidence is against the claim
- confirmed_false: directly contradicted by reliable sources or fact-checks

## Rules

1. Intent and motivation are never facts. "X based Y on Z", "X was inspired by Z",
   "X was designed to", "X symbolizes" describe what someone meant or intended.
   Classify them as opinion even when observable details are documented.

2. Value words make a claim opinion. Whether something was necessary, justified,
   fair, the best or the worst depends on values, not only on evidence.

3. Mind the polarity of denials. If a claim DENIES a well-established fact
   ("the Holocaust never happened", "vaccines cause autism", "the Earth is flat"),
   the claim itself is confirmed_false. Do not answer verified_fact because the
   underlying fact is verified.

4. Fact-checks from recognised organisations weigh heavily. Two or more
   independent "False" ratings are strong evidence that the claim is false.

5. Prefer higher-reliability sources. A single low-reliability source is not
   confirmation.

## Output

- confidence: a number between 0 and 1 reflecting how well the evidence supports
  your category
- reasoning: 2-4 sentences about the claim itself, written for a general reader.
  Explain what the evidence shows. Do not describe the sources you were given,
  their length, or any limitations of this process.

Your output must be structured JSON only and conform to the requested schema."#;

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// Build the classification prompt for one claim and its evidence
pub fn build_classification_prompt(
    claim_text: &str,
    sources: &[Source],
    fact_checks: &[FactCheckRecord],
) -> String {
    let mut prompt = format!("## Claim\n\n{claim_text}\n\n");

    prompt.push_str("## Fact-checks\n\n");
    if fact_checks.is_empty() {
        prompt.push_str("No published fact-checks found.\n\n");
    } else {
        for (i, fc) in fact_checks.iter().enumerate() {
            prompt.push_str(&format!("{}. {} rated it \"{}\" ({})\n", i + 1, fc.org, fc.verdict, fc.date));
            if let Some(reviewed) = &fc.claim_reviewed {
                prompt.push_str(&format!("   Claim reviewed: {}\n", reviewed));
            }
        }
        prompt.push('\n');
    }

    prompt.push_str("## Sources\n\n");
    if sources.is_empty() {
        prompt.push_str("No sources found.\n\n");
    } else {
        for (i, source) in sources.iter().enumerate() {
            prompt.push_str(&format!(
                "{}. {} (reliability {}/100, {:?})\n   URL: {}\n",
                i + 1,
                source.name,
                source.reliability,
                source.source_type,
                source.url
            ));
            if let Some(title) = &source.title {
                prompt.push_str(&format!("   Title: {}\n", title));
            }
            if let Some(snippet) = &source.snippet {
                prompt.push_str(&format!("   Excerpt: {}\n", truncate(snippet, MAX_SNIPPET_CHARS)));
            }
        }
        prompt.push('\n');
    }

    prompt.push_str("Classify the claim.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceType;

    #[test]
    fn test_prompt_lists_evidence() {
        let sources = vec![Source {
            name: "reuters.com".to_string(),
            url: "https://www.reuters.com/a".to_string(),
            source_type: SourceType::NewsWire,
            reliability: 90,
            title: Some("Headline".to_string()),
            snippet: Some("x".repeat(1000)),
        }];
        let fact_checks = vec![FactCheckRecord {
            org: "PolitiFact".to_string(),
            verdict: "False".to_string(),
            date: "2024-01-02".to_string(),
            url: None,
            claim_reviewed: Some("The claim".to_string()),
        }];

        let prompt = build_classification_prompt("The claim", &sources, &fact_checks);
        assert!(prompt.contains("PolitiFact rated it \"False\""));
        assert!(prompt.contains("reliability 90/100"));
        assert!(prompt.contains("Title: Headline"));
        assert!(!prompt.contains(&"x".repeat(401)));
    }

    #[test]
    fn test_prompt_without_evidence() {
        let prompt = build_classification_prompt("The claim", &[], &[]);
        assert!(prompt.contains("No published fact-checks found."));
        assert!(prompt.contains("No sources found."));
    }
}
