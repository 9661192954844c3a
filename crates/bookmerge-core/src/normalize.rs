//! URL canonicalization and text normalization
//!
//! These functions produce the stable comparison forms the deduplication
//! engine groups on: a canonical URL, a whitespace-collapsed title, and a
//! lowercase host key.

use std::collections::HashSet;

use lazy_static::lazy_static;
use url::form_urlencoded;
use url::Url;

lazy_static! {
    // Query parameters that only carry tracking state, matched
    // case-insensitively against decoded keys.
    static ref TRACKING_PARAMS: HashSet<&'static str> = [
        "utm_source",
        "utm_medium",
        "utm_campaign",
        "utm_term",
        "utm_content",
        "gclid",
        "fbclid",
        "mc_cid",
        "mc_eid",
        "igshid",
        "yclid",
        "_hsenc",
        "_hsmi",
        "mkt_tok",
        "ref",
        "cmp",
        "spm",
        "ved",
        "si",
        "s",
        "trk",
        "scid",
        "ck_subscriber_id",
    ]
    .into_iter()
    .collect();
}

/// Canonicalize a URL into its stable comparison form.
///
/// - Lowercases scheme and host and strips explicit default ports
/// - Drops the fragment
/// - Removes tracking parameters and empty-valued parameters, then
///   re-serializes the surviving query sorted by key
/// - Drops one trailing slash from any path other than the bare root
///
/// Empty, whitespace-only, and unparsable inputs are returned unchanged.
/// Idempotent for any input that parses.
pub fn canonicalize_url(url: &str) -> String {
    if url.trim().is_empty() {
        return url.to_string();
    }
    let Ok(mut parsed) = Url::parse(url.trim()) else {
        return url.to_string();
    };

    parsed.set_fragment(None);

    // Decode, filter, and stably re-serialize the query. Sorting by key
    // fixes the overall order while keeping per-key value order.
    let mut pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, value)| {
            !value.is_empty() && !TRACKING_PARAMS.contains(key.to_lowercase().as_str())
        })
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    if pairs.is_empty() {
        parsed.set_query(None);
    } else {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&pairs)
            .finish();
        parsed.set_query(Some(&query));
    }

    let path = parsed.path();
    if path != "/" && path.ends_with('/') {
        let trimmed = path[..path.len() - 1].to_string();
        parsed.set_path(&trimmed);
    }

    parsed.to_string()
}

/// Collapse every whitespace run to a single space and trim the ends.
/// Empty or all-whitespace input yields an empty string.
pub fn normalize_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;

    for c in s.trim().chars() {
        if c.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(c);
            prev_was_space = false;
        }
    }

    result
}

/// Lowercase host of a URL with any port stripped; empty when the URL
/// cannot be parsed or has no host.
pub fn domain_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|host| host.to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("http://example.com:80/page", "http://example.com/page"; "http default port")]
    #[test_case("https://example.com:443/page", "https://example.com/page"; "https default port")]
    #[test_case("https://example.com:8443/page", "https://example.com:8443/page"; "explicit port kept")]
    #[test_case("HTTPS://EXAMPLE.com/Page", "https://example.com/Page"; "scheme and host lowered, path kept")]
    #[test_case("https://example.com/page#section", "https://example.com/page"; "fragment dropped")]
    #[test_case("https://example.com/page/", "https://example.com/page"; "trailing slash dropped")]
    #[test_case("https://example.com/", "https://example.com/"; "root path unchanged")]
    fn test_canonicalize_cases(input: &str, expected: &str) {
        assert_eq!(canonicalize_url(input), expected);
    }

    #[test]
    fn test_canonicalize_strips_tracking_params() {
        let canonical = canonicalize_url("https://example.com/p?utm_source=feed&id=42&fbclid=abc");
        assert_eq!(canonical, "https://example.com/p?id=42");
    }

    #[test]
    fn test_canonicalize_is_case_insensitive_on_tracking_keys() {
        let canonical = canonicalize_url("https://example.com/p?UTM_Source=feed&id=42");
        assert_eq!(canonical, "https://example.com/p?id=42");
    }

    #[test]
    fn test_canonicalize_sorts_surviving_params() {
        let canonical = canonicalize_url("https://example.com/p?z=1&a=2&m=3");
        assert_eq!(canonical, "https://example.com/p?a=2&m=3&z=1");
    }

    #[test]
    fn test_canonicalize_keeps_repeated_key_order() {
        let canonical = canonicalize_url("https://example.com/p?tag=b&tag=a");
        assert_eq!(canonical, "https://example.com/p?tag=b&tag=a");
    }

    #[test]
    fn test_canonicalize_drops_blank_values() {
        let canonical = canonicalize_url("https://example.com/p?empty=&id=42");
        assert_eq!(canonical, "https://example.com/p?id=42");
    }

    #[test]
    fn test_canonicalize_passes_through_unparsable_input() {
        assert_eq!(canonicalize_url("not a url"), "not a url");
        assert_eq!(canonicalize_url(""), "");
        assert_eq!(canonicalize_url("   "), "   ");
    }

    #[test]
    fn test_canonicalize_idempotent_on_messy_input() {
        let input = "HTTPS://Example.COM:443/a/b/?z=1&utm_campaign=x&a=2#frag";
        let once = canonicalize_url(input);
        assert_eq!(canonicalize_url(&once), once);
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \t b\n\nc  "), "a b c");
        assert_eq!(normalize_whitespace("plain"), "plain");
        assert_eq!(normalize_whitespace("   "), "");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_domain_of() {
        assert_eq!(domain_of("https://Example.COM:8080/x"), "example.com");
        assert_eq!(domain_of("https://sub.example.com/x"), "sub.example.com");
        assert_eq!(domain_of("mailto:someone@example.com"), "");
        assert_eq!(domain_of("not a url"), "");
        assert_eq!(domain_of(""), "");
    }
}
