use super::entropy::shannon_entropy;
use super::tld_risk::{self, HostProfile};
use super::{flag, FeatureSet};
use crate::domain_utils::DomainUtils;
use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

/// Host used for structural parsing when the input is not a URL at all
pub const PLACEHOLDER_HOST: &str = "invalid-url.xyz";

const SPECIAL_CHARS: [char; 12] = ['@', '%', ':', '=', '?', '&', '+', '$', ',', ';', '_', '~'];

lazy_static! {
    static ref LOGIN_KEYWORDS: Regex =
        Regex::new(r"(?i)(login|signin|account|verify|secure|update|confirm|auth)").unwrap();
    static ref FINANCE_KEYWORDS: Regex =
        Regex::new(r"(?i)(bank|paypal|wallet|payment|invoice|credit|card|billing)").unwrap();
    static ref ENCODED_BYTE: Regex = Regex::new(r"%[0-9A-Fa-f]{2}").unwrap();
    static ref EMAIL: Regex =
        Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap();
    static ref HEX_RUN: Regex = Regex::new(r"[0-9a-fA-F]{6,}").unwrap();
    static ref UUID_STRICT: Regex = Regex::new(
        r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}"
    )
    .unwrap();
    static ref UUID_LOOSE: Regex = Regex::new(r"[0-9a-fA-F]{8,}[-_][0-9a-fA-F]{4,}").unwrap();
}

/// Structural pieces of a parsed URL
struct UrlParts {
    scheme: String,
    hostname: String,
    path: String,
    query: String,
}

impl UrlParts {
    fn from_url(parsed: &Url) -> Self {
        let query = match parsed.query() {
            Some(q) if !q.is_empty() => format!("?{}", q),
            _ => String::new(),
        };

        Self {
            scheme: parsed.scheme().to_lowercase(),
            hostname: parsed.host_str().unwrap_or_default().to_string(),
            path: parsed.path().to_string(),
            query,
        }
    }

    fn parse(fixed: &str) -> Self {
        match Url::parse(fixed) {
            Ok(parsed) => Self::from_url(&parsed),
            Err(e) => {
                log::debug!("Using placeholder host for unparsable URL {:?}: {}", fixed, e);
                Self {
                    scheme: "http".to_string(),
                    hostname: PLACEHOLDER_HOST.to_string(),
                    path: "/".to_string(),
                    query: String::new(),
                }
            }
        }
    }
}

/// Turns a raw URL string into the 28 lexical features the model was fit on
#[derive(Debug, Default, Clone, Copy)]
pub struct UrlFeatureExtractor;

impl UrlFeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Never fails; unparsable input is structurally parsed as the placeholder
    pub fn extract(&self, raw_url: &str) -> FeatureSet {
        let trimmed = raw_url.trim();
        let full = DomainUtils::fix_scheme(trimmed);
        let parts = UrlParts::parse(&full);
        let host = HostProfile::new(&parts.hostname);

        let url_length = full.chars().count();
        let hostname_length = parts.hostname.chars().count();
        let count_digits = full.chars().filter(|c| c.is_ascii_digit()).count();
        let count_special_chars = full.chars().filter(|c| SPECIAL_CHARS.contains(c)).count();

        FeatureSet {
            url: trimmed.to_string(),

            url_length,
            hostname_length,
            path_length: parts.path.chars().count(),
            query_length: parts.query.chars().count(),

            count_dots: full.matches('.').count(),
            count_hyphens: full.matches('-').count(),
            count_digits,
            count_special_chars,
            count_slashes: full.matches('/').count(),

            is_https: flag(parts.scheme == "https"),
            subdomain_count: host.subdomain_count,
            tld_length: host.tld_length(),
            is_suspicious_tld: flag(host.is_suspicious_tld()),
            is_ip: flag(tld_risk::is_ip_like(&parts.hostname)),
            first_subdomain_length: host.first_subdomain_length(),
            has_multiple_subdomains: flag(host.has_multiple_subdomains()),
            starts_with_number: flag(tld_risk::starts_with_number(&parts.hostname)),

            contains_repeated_chars: flag(has_triple_run(&full)),
            contains_login_keyword: flag(LOGIN_KEYWORDS.is_match(&full)),
            contains_finance_keyword: flag(FINANCE_KEYWORDS.is_match(&full)),
            contains_encoded_chars: flag(ENCODED_BYTE.is_match(&full)),
            contains_email_pattern: flag(EMAIL.is_match(&full)),
            contains_hex_pattern: flag(HEX_RUN.is_match(&full)),
            contains_uuid_pattern: flag(UUID_STRICT.is_match(&full) || UUID_LOOSE.is_match(&full)),

            digit_ratio: ratio(count_digits, hostname_length),
            special_char_ratio: ratio(count_special_chars, url_length),
            entropy_hostname: shannon_entropy(&parts.hostname),
            entropy_path: shannon_entropy(&parts.path),
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Any character except `\n` three times in a row, as `(.)\1\1` matches in
/// the training pipeline
fn has_triple_run(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    chars
        .windows(3)
        .any(|w| w[0] == w[1] && w[1] == w[2] && w[0] != '\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(url: &str) -> FeatureSet {
        UrlFeatureExtractor::new().extract(url)
    }

    #[test]
    fn test_structural_lengths() {
        let f = extract("https://www.example.com/a/b?x=1&y=2");

        assert_eq!(f.url_length, 35);
        assert_eq!(f.hostname_length, 15);
        assert_eq!(f.path_length, 4);
        assert_eq!(f.query_length, 8);
        assert_eq!(f.is_https, 1);
    }

    #[test]
    fn test_counts_use_scheme_fixed_string() {
        let f = extract("  example.com/a-b  ");

        // "http://example.com/a-b"
        assert_eq!(f.url, "example.com/a-b");
        assert_eq!(f.url_length, 22);
        assert_eq!(f.count_slashes, 3);
        assert_eq!(f.count_dots, 1);
        assert_eq!(f.count_hyphens, 1);
        assert_eq!(f.count_special_chars, 1);
        assert_eq!(f.is_https, 0);
    }

    #[test]
    fn test_empty_path_is_root() {
        let f = extract("http://example.com");
        assert_eq!(f.path_length, 1);
        assert_eq!(f.entropy_path, 0.0);
    }

    #[test]
    fn test_bare_question_mark_has_no_query() {
        let f = extract("http://example.com/?");
        assert_eq!(f.query_length, 0);
    }

    #[test]
    fn test_special_chars() {
        let f = extract("http://a.com/@%:=?&+$,;_~");
        // one ':' from the scheme plus the twelve in the path
        assert_eq!(f.count_special_chars, 13);
        assert!((f.special_char_ratio - 13.0 / f.url_length as f64).abs() < 1e-12);
    }

    #[test]
    fn test_host_features() {
        let f = extract("http://login.secure.paypal-verify.xyz/update");

        assert_eq!(f.subdomain_count, 2);
        assert_eq!(f.has_multiple_subdomains, 1);
        assert_eq!(f.first_subdomain_length, 5);
        assert_eq!(f.tld_length, 3);
        assert_eq!(f.is_suspicious_tld, 1);
        assert_eq!(f.contains_login_keyword, 1);
        assert_eq!(f.contains_finance_keyword, 1);
        assert_eq!(f.is_ip, 0);
    }

    #[test]
    fn test_ip_host() {
        let f = extract("http://203.0.113.5/secure-login.php");

        assert_eq!(f.is_ip, 1);
        assert_eq!(f.starts_with_number, 1);
        assert_eq!(f.tld_length, 1);
        assert_eq!(f.count_digits, 8);
        assert!((f.digit_ratio - 8.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_unparsable_input_uses_placeholder() {
        let f = extract("http://exa mple.com/<>");

        assert_eq!(f.hostname_length, PLACEHOLDER_HOST.len());
        assert_eq!(f.is_suspicious_tld, 1);
        assert_eq!(f.path_length, 1);
        // lengths and counts still describe the input itself
        assert_eq!(f.url_length, "http://exa mple.com/<>".len());
        assert_eq!(f.count_hyphens, 0);
    }

    #[test]
    fn test_pattern_flags() {
        let f = extract("http://example.com/r?to=alice%40mail.example.org&id=deadbeef");
        assert_eq!(f.contains_encoded_chars, 1);
        assert_eq!(f.contains_hex_pattern, 1);
        assert_eq!(f.contains_email_pattern, 0);
        assert_eq!(f.contains_uuid_pattern, 0);

        let f = extract("http://example.com/u/alice@mail.example.org");
        assert_eq!(f.contains_email_pattern, 1);

        let f = extract("http://example.com/s/123e4567-e89b-12d3-a456-426614174000");
        assert_eq!(f.contains_uuid_pattern, 1);

        let f = extract("http://example.com/s/abcdef12_3456");
        assert_eq!(f.contains_uuid_pattern, 1);
    }

    #[test]
    fn test_repeated_chars() {
        assert_eq!(extract("http://wwww.example.com").contains_repeated_chars, 1);
        assert_eq!(extract("http://example.com/a").contains_repeated_chars, 0);
        assert_eq!(extract("http://example.com/a\n\n\nb").contains_repeated_chars, 0);
        assert_eq!(extract("http://example.com/a\r\r\rb").contains_repeated_chars, 1);
        assert_eq!(extract("http://example.com/a\u{2028}\u{2028}\u{2028}b").contains_repeated_chars, 1);
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let f = extract("HTTP://EXAMPLE.COM/SIGNIN/BANK");
        assert_eq!(f.contains_login_keyword, 1);
        assert_eq!(f.contains_finance_keyword, 1);
        assert_eq!(f.is_https, 0);
    }

    #[test]
    fn test_hostname_entropy() {
        assert_eq!(extract("http://aaaa").entropy_hostname, 0.0);
        assert_eq!(extract("http://abcd").entropy_hostname, 2.0);
    }

    #[test]
    fn test_deterministic() {
        let url = "https://secure-update.account.example-bank.top/verify?session=9f8e7d6c5b4a";
        assert_eq!(extract(url), extract(url));
    }
}
