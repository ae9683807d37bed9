//! Strips meta-commentary about the evidence pipeline from user-facing reasoning

use std::sync::LazyLock;

use regex::Regex;

/// Used when every sentence of the reasoning was meta-commentary
pub const FALLBACK_REASONING: &str = "Classification reflects the weight of the evidence reviewed.";

static META_COMMENTARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(sources? provided|provided sources?|the (search )?results (provided|given|returned)|search results|excerpts?|snippets?|limited (detail|details|information)|the provided (evidence|information|context|material)|based on the (available|provided|given) (sources|information|evidence|search results)|the sources (do not|don'?t|did not|didn'?t) (mention|contain|provide|include|address)|not mentioned in the sources)\b",
    )
    .unwrap()
});

fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
            if at_boundary {
                let end = i + c.len_utf8();
                sentences.push(text[start..end].trim());
                start = end;
            }
        }
    }
    if start < text.len() {
        sentences.push(text[start..].trim());
    }

    sentences.into_iter().filter(|s| !s.is_empty()).collect()
}

/// Remove sentences that talk about the sources rather than the claim
///
/// Idempotent: sanitizing sanitized text returns it unchanged.
pub fn sanitize_reasoning(reasoning: &str) -> String {
    let kept: Vec<&str> = split_sentences(reasoning)
        .into_iter()
        .filter(|s| !META_COMMENTARY.is_match(s))
        .collect();

    if kept.is_empty() {
        FALLBACK_REASONING.to_string()
    } else {
        kept.join(" ")
    }
}
