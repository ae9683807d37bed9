//! Cache key generation for verification results

use sha2::{Digest, Sha256};

/// Normalize claim text so trivially different spellings share a cache entry
///
/// Lowercases, collapses whitespace and trims trailing punctuation.
pub fn normalize_claim_text(text: &str) -> String {
    let collapsed = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    collapsed
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim_end()
        .to_string()
}

/// Cache key hash for a verification of `text`
pub fn verification_cache_key(text: &str) -> String {
    hash_string(&normalize_claim_text(text))
}

/// Hash a string to a hex string using SHA256
fn hash_string(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        assert_eq!(normalize_claim_text("  The Earth   is FLAT!!  "), "the earth is flat");
        assert_eq!(normalize_claim_text("Is it true?"), "is it true");
        assert_eq!(normalize_claim_text("3.5%"), "3.5");
        assert_eq!(normalize_claim_text("..."), "");
    }

    #[test]
    fn test_equivalent_texts_share_a_key() {
        let key = verification_cache_key("The Earth is flat.");
        assert_eq!(key, verification_cache_key("the earth\nis  flat"));
        assert_ne!(key, verification_cache_key("The Earth is round."));
        assert_eq!(key.len(), 64);
    }
}
