//! Source reliability evaluation
//!
//! Pure domain-classification lookup: URL in, trust score out. No network.

use url::Url;

use crate::model::{SourceEvaluation, SourceType};

/// Domains with a track record of fabricated or satirical content
const UNRELIABLE_DOMAINS: &[&str] = &[
    "infowars.com",
    "naturalnews.com",
    "beforeitsnews.com",
    "worldnewsdailyreport.com",
    "yournewswire.com",
    "newspunch.com",
    "theonion.com",
    "babylonbee.com",
    "thegatewaypundit.com",
    "dailybuzzlive.com",
    "empirenews.net",
    "nationalreport.net",
    "zerohedge.com",
    "sputniknews.com",
    "rt.com",
];

const GOVERNMENT_SUFFIXES: &[&str] = &[
    ".gov", ".mil", ".gov.uk", ".gouv.fr", ".gc.ca", ".gov.au", ".govt.nz", ".gov.in",
];

const GOVERNMENT_DOMAINS: &[&str] = &["europa.eu", "who.int", "un.org", "worldbank.org"];

const ACADEMIC_SUFFIXES: &[&str] = &[".edu", ".ac.uk", ".edu.au", ".ac.jp", ".ac.nz", ".edu.cn"];

const ACADEMIC_DOMAINS: &[&str] = &["arxiv.org", "jstor.org", "scholar.google.com", "ssrn.com"];

const SCIENTIFIC_DOMAINS: &[&str] = &[
    "nature.com",
    "science.org",
    "sciencedirect.com",
    "thelancet.com",
    "nejm.org",
    "cell.com",
    "springer.com",
    "wiley.com",
    "plos.org",
    "bmj.com",
    "jamanetwork.com",
    "ipcc.ch",
    "pnas.org",
];

const NEWS_WIRE_DOMAINS: &[&str] = &["reuters.com", "apnews.com", "afp.com", "upi.com"];

const FACT_CHECKER_DOMAINS: &[&str] = &[
    "snopes.com",
    "politifact.com",
    "factcheck.org",
    "fullfact.org",
    "leadstories.com",
    "checkyourfact.com",
    "africacheck.org",
    "healthfeedback.org",
    "climatefeedback.org",
];

const MAJOR_NEWS_DOMAINS: &[&str] = &[
    "bbc.com",
    "bbc.co.uk",
    "nytimes.com",
    "washingtonpost.com",
    "theguardian.com",
    "wsj.com",
    "npr.org",
    "economist.com",
    "ft.com",
    "bloomberg.com",
    "cnn.com",
    "nbcnews.com",
    "cbsnews.com",
    "abcnews.go.com",
    "aljazeera.com",
    "pbs.org",
    "latimes.com",
    "usatoday.com",
];

const SOCIAL_MEDIA_DOMAINS: &[&str] = &[
    "twitter.com",
    "x.com",
    "facebook.com",
    "instagram.com",
    "tiktok.com",
    "reddit.com",
    "youtube.com",
    "medium.com",
    "quora.com",
    "threads.net",
    "truthsocial.com",
];

const COMMERCIAL_SUFFIXES: &[&str] = &[".com", ".net", ".biz", ".io", ".co"];

const UNRELIABLE_SCORE: u8 = 10;
const INVALID_URL_SCORE: u8 = 20;

/// Evaluate a URL's trustworthiness from its domain alone
pub fn evaluate(url: &str) -> SourceEvaluation {
    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => {
            return SourceEvaluation {
                reliability_score: INVALID_URL_SCORE,
                source_type: SourceType::Unknown,
                factors: vec!["Unparseable URL".to_string()],
            };
        }
    };

    let host = match parsed.host_str() {
        Some(h) => normalize_host(h),
        None => {
            return SourceEvaluation {
                reliability_score: INVALID_URL_SCORE,
                source_type: SourceType::Unknown,
                factors: vec!["URL has no host".to_string()],
            };
        }
    };

    let source_type = classify_domain(&host);
    let mut factors = vec![format!("Domain type: {}", type_label(source_type))];

    if matches_any(&host, UNRELIABLE_DOMAINS) {
        factors.push("Known unreliable domain".to_string());
        return SourceEvaluation {
            reliability_score: UNRELIABLE_SCORE,
            source_type,
            factors,
        };
    }

    let mut score = base_score(source_type);

    if parsed.scheme() == "https" {
        score += 5;
        factors.push("Served over HTTPS".to_string());
    } else {
        score -= 10;
        factors.push("Not served over HTTPS".to_string());
    }

    if has_deep_subdomain(&host, source_type) {
        score -= 5;
        factors.push("Deeply nested subdomain".to_string());
    }

    SourceEvaluation {
        reliability_score: score.clamp(0, 100) as u8,
        source_type,
        factors,
    }
}

/// Display name for a source: its host without a leading `www.`
pub fn source_name(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(normalize_host))
        .unwrap_or_else(|| url.to_string())
}

fn normalize_host(host: &str) -> String {
    let host = host.to_lowercase();
    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

/// Exact domain or any subdomain of it
fn matches_any(host: &str, domains: &[&str]) -> bool {
    domains
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{d}")))
}

fn ends_with_any(host: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|s| host.ends_with(s))
}

fn classify_domain(host: &str) -> SourceType {
    if matches_any(host, FACT_CHECKER_DOMAINS) {
        SourceType::FactChecker
    } else if matches_any(host, NEWS_WIRE_DOMAINS) {
        SourceType::NewsWire
    } else if matches_any(host, SCIENTIFIC_DOMAINS) {
        SourceType::Scientific
    } else if ends_with_any(host, GOVERNMENT_SUFFIXES) || matches_any(host, GOVERNMENT_DOMAINS) {
        SourceType::Government
    } else if ends_with_any(host, ACADEMIC_SUFFIXES) || matches_any(host, ACADEMIC_DOMAINS) {
        SourceType::Academic
    } else if matches_any(host, MAJOR_NEWS_DOMAINS) {
        SourceType::MajorNews
    } else if matches_any(host, SOCIAL_MEDIA_DOMAINS) {
        SourceType::SocialMedia
    } else if host.ends_with(".org") {
        SourceType::Nonprofit
    } else if ends_with_any(host, COMMERCIAL_SUFFIXES) {
        SourceType::Commercial
    } else {
        SourceType::Unknown
    }
}

fn base_score(source_type: SourceType) -> i32 {
    match source_type {
        SourceType::Government => 88,
        SourceType::Scientific => 88,
        SourceType::NewsWire => 85,
        SourceType::Academic => 85,
        SourceType::FactChecker => 82,
        SourceType::MajorNews => 75,
        SourceType::Nonprofit => 60,
        SourceType::Commercial => 48,
        SourceType::Unknown => 40,
        SourceType::SocialMedia => 25,
    }
}

fn type_label(source_type: SourceType) -> &'static str {
    match source_type {
        SourceType::Government => "government",
        SourceType::Academic => "academic",
        SourceType::Scientific => "scientific",
        SourceType::NewsWire => "news wire",
        SourceType::MajorNews => "major news",
        SourceType::FactChecker => "fact-checker",
        SourceType::Nonprofit => "nonprofit",
        SourceType::Commercial => "commercial",
        SourceType::SocialMedia => "social media",
        SourceType::Unknown => "unknown",
    }
}

/// More than one label in front of the registrable domain, e.g. `a.b.example.com`
///
/// Government and academic hosts are exempt; deep hierarchies are normal there.
fn has_deep_subdomain(host: &str, source_type: SourceType) -> bool {
    if matches!(source_type, SourceType::Government | SourceType::Academic) {
        return false;
    }
    let labels = host.split('.').count();
    // two-part public suffixes such as co.uk keep one extra label
    let suffix_labels = if host.ends_with(".co.uk") || host.ends_with(".com.au") {
        3
    } else {
        2
    };
    labels > suffix_labels + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_government_domain() {
        let eval = evaluate("https://www.cdc.gov/vaccines/index.html");
        assert_eq!(eval.source_type, SourceType::Government);
        assert_eq!(eval.reliability_score, 93);
    }

    #[test]
    fn test_news_wire_and_subdomain_match() {
        let eval = evaluate("https://www.reuters.com/world/");
        assert_eq!(eval.source_type, SourceType::NewsWire);
        let eval = evaluate("https://apnews.com/article/x");
        assert_eq!(eval.source_type, SourceType::NewsWire);
        assert_eq!(eval.reliability_score, 90);
    }

    #[test]
    fn test_lookalike_domain_is_not_matched() {
        let eval = evaluate("https://notreuters.com/story");
        assert_eq!(eval.source_type, SourceType::Commercial);
    }

    #[test]
    fn test_unreliable_domain_blocklisted() {
        let eval = evaluate("https://www.infowars.com/posts/anything");
        assert_eq!(eval.reliability_score, UNRELIABLE_SCORE);
        assert!(eval.factors.iter().any(|f| f.contains("unreliable")));
    }

    #[test]
    fn test_http_penalty() {
        let https = evaluate("https://example.org/page");
        let http = evaluate("http://example.org/page");
        assert_eq!(https.source_type, SourceType::Nonprofit);
        assert_eq!(https.reliability_score - http.reliability_score, 15);
    }

    #[test]
    fn test_deep_subdomain_penalty() {
        let shallow = evaluate("https://blog.example.com/");
        let deep = evaluate("https://a.b.example.com/");
        assert_eq!(shallow.reliability_score - deep.reliability_score, 5);
    }

    #[test]
    fn test_academic_deep_subdomain_not_penalized() {
        let eval = evaluate("https://news.med.stanford.edu/article");
        assert_eq!(eval.source_type, SourceType::Academic);
        assert_eq!(eval.reliability_score, 90);
    }

    #[test]
    fn test_social_media_and_fact_checker() {
        assert_eq!(evaluate("https://x.com/user/status/1").source_type, SourceType::SocialMedia);
        assert_eq!(
            evaluate("https://www.snopes.com/fact-check/flat-earth/").source_type,
            SourceType::FactChecker
        );
    }

    #[test]
    fn test_invalid_url() {
        let eval = evaluate("not a url");
        assert_eq!(eval.source_type, SourceType::Unknown);
        assert_eq!(eval.reliability_score, INVALID_URL_SCORE);
    }

    #[test]
    fn test_scores_stay_in_range() {
        for url in [
            "https://www.nasa.gov",
            "http://a.b.c.d.weird",
            "https://nature.com/articles/1",
            "ftp://files.example.com/x",
        ] {
            assert!(evaluate(url).reliability_score <= 100);
        }
    }

    #[test]
    fn test_source_name_strips_www() {
        assert_eq!(source_name("https://www.bbc.co.uk/news"), "bbc.co.uk");
        assert_eq!(source_name("garbage"), "garbage");
    }
}
