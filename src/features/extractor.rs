//! Lexical feature extraction from raw URL strings.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::{PhishGuardError, Result};
use crate::features::domain::DomainParts;
use crate::features::vector::FeatureVector;

/// Keywords commonly used by credential-harvesting pages.
pub const SUSPICIOUS_WORDS: &[&str] = &[
    "login",
    "signin",
    "account",
    "update",
    "verify",
    "secure",
    "banking",
    "paypal",
    "amazon",
    "ebay",
    "password",
    "confirm",
    "suspend",
    "restricted",
    "alert",
    "notification",
];

/// Characters counted over the whole URL, with the feature name for each.
const COUNTED_CHARS: &[(&str, char)] = &[
    ("num_dots", '.'),
    ("num_hyphens", '-'),
    ("num_underscores", '_'),
    ("num_slashes", '/'),
    ("num_questionmarks", '?'),
    ("num_equal", '='),
    ("num_at", '@'),
    ("num_ampersand", '&'),
    ("num_exclamation", '!'),
    ("num_tilde", '~'),
    ("num_comma", ','),
    ("num_plus", '+'),
    ("num_asterisk", '*'),
    ("num_hashtag", '#'),
    ("num_dollar", '$'),
    ("num_percent", '%'),
];

/// Feature names in the order [`extract`] emits them.
pub const FEATURE_NAMES: &[&str] = &[
    // Length
    "url_length",
    "domain_length",
    "path_length",
    // Character counts
    "num_dots",
    "num_hyphens",
    "num_underscores",
    "num_slashes",
    "num_questionmarks",
    "num_equal",
    "num_at",
    "num_ampersand",
    "num_exclamation",
    "num_tilde",
    "num_comma",
    "num_plus",
    "num_asterisk",
    "num_hashtag",
    "num_dollar",
    "num_percent",
    // Protocol
    "is_https",
    "has_ip",
    // Domain
    "subdomain_level",
    "has_www",
    // Lexical suspicion
    "has_suspicious_words",
    "digit_ratio",
    "letter_ratio",
    // Path / query
    "path_depth",
    "num_query_params",
];

/// Version of the feature set. Bump when [`FEATURE_NAMES`] changes.
pub const LAYOUT_VERSION: u32 = 1;

static IP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").expect("valid regex"));

/// Extracts the lexical feature vector from a URL.
///
/// The extractor holds no state; it exists so callers can pass an extractor
/// around where a trait object or generic would otherwise be needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlFeatureExtractor;

impl UrlFeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract all features from `url`.
    ///
    /// Fails with [`PhishGuardError::Extraction`] when `url` is not an absolute
    /// URL with a host. Empty and scheme-less strings fail rather than
    /// producing a default vector.
    ///
    /// The parser only validates the URL and supplies the scheme and the host
    /// used for public-suffix splitting. Authority, path and query features
    /// are measured on the text as written, before any normalization.
    pub fn extract(&self, url: &str) -> Result<FeatureVector> {
        if url.trim().is_empty() {
            return Err(PhishGuardError::extraction(url, "empty URL"));
        }

        let parsed = Url::parse(url).map_err(|e| PhishGuardError::extraction(url, e.to_string()))?;
        let host = parsed
            .host()
            .ok_or_else(|| PhishGuardError::extraction(url, "URL has no host"))?;

        let raw = RawParts::split(url);
        let parts = DomainParts::from_host(&host);

        let mut features = FeatureVector::with_capacity(FEATURE_NAMES.len());

        features.insert("url_length", char_len(url) as f64);
        features.insert("domain_length", char_len(raw.authority) as f64);
        features.insert("path_length", char_len(raw.path) as f64);

        for (name, ch) in COUNTED_CHARS {
            features.insert(*name, url.matches(*ch).count() as f64);
        }

        features.insert("is_https", flag(parsed.scheme() == "https"));
        features.insert("has_ip", flag(has_ip_address(raw.authority)));

        features.insert("subdomain_level", parts.subdomain_depth() as f64);
        features.insert("has_www", flag(raw.authority.contains("www")));

        features.insert("has_suspicious_words", flag(has_suspicious_words(url)));
        features.insert("digit_ratio", digit_ratio(url));
        features.insert("letter_ratio", letter_ratio(url));

        features.insert("path_depth", path_depth(raw.path) as f64);
        features.insert("num_query_params", query_param_count(raw.query) as f64);

        Ok(features)
    }
}

/// Authority, path and query sliced out of the URL text without normalizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RawParts<'a> {
    authority: &'a str,
    path: &'a str,
    query: Option<&'a str>,
}

impl<'a> RawParts<'a> {
    /// Split `scheme:[//authority]path[?query][#fragment]`.
    ///
    /// The authority runs from `//` to the first `/`, `?` or `#`; a URL
    /// without `//` has an empty authority.
    fn split(url: &'a str) -> Self {
        let text = url.trim_matches(|c: char| c <= ' ');
        let rest = match text.find(':') {
            Some(colon) => &text[colon + 1..],
            None => text,
        };

        let (authority, rest) = match rest.strip_prefix("//") {
            Some(after) => {
                let end = after.find(['/', '?', '#']).unwrap_or(after.len());
                after.split_at(end)
            }
            None => ("", rest),
        };

        let rest = rest.split_once('#').map_or(rest, |(before, _)| before);
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };

        Self {
            authority,
            path,
            query,
        }
    }
}

/// Extract features with the default extractor.
pub fn extract(url: &str) -> Result<FeatureVector> {
    UrlFeatureExtractor::new().extract(url)
}

/// Whether `authority` contains a dotted-quad IPv4 address.
pub fn has_ip_address(authority: &str) -> bool {
    IP_PATTERN.is_match(authority)
}

/// Whether any [`SUSPICIOUS_WORDS`] entry occurs, ignoring case.
pub fn has_suspicious_words(url: &str) -> bool {
    let lower = url.to_lowercase();
    SUSPICIOUS_WORDS.iter().any(|word| lower.contains(word))
}

/// Fraction of characters that are ASCII digits; 0.0 for an empty string.
pub fn digit_ratio(url: &str) -> f64 {
    ratio(url, |c| c.is_ascii_digit())
}

/// Fraction of characters that are letters; 0.0 for an empty string.
pub fn letter_ratio(url: &str) -> f64 {
    ratio(url, char::is_alphabetic)
}

fn ratio(text: &str, predicate: fn(char) -> bool) -> f64 {
    let total = char_len(text);
    if total == 0 {
        return 0.0;
    }
    text.chars().filter(|c| predicate(*c)).count() as f64 / total as f64
}

fn path_depth(path: &str) -> usize {
    path.split('/').filter(|segment| !segment.is_empty()).count()
}

fn query_param_count(query: Option<&str>) -> usize {
    match query {
        Some(q) if !q.is_empty() => q.split('&').count(),
        _ => 0,
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}
