use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

lazy_static! {
    static ref SCHEME_PREFIX: Regex = Regex::new(r"^[a-zA-Z]+://").unwrap();
    static ref HTTP_PREFIX: Regex = Regex::new(r"^https?://").unwrap();
    static ref DOTTED_QUAD: Regex = Regex::new(r"^[0-9]{1,3}(\.[0-9]{1,3}){3}$").unwrap();
}

/// Hostname and URL helpers shared by feature extraction and overrides
pub struct DomainUtils;

impl DomainUtils {
    /// Prepend `http://` when the input has no `scheme://` prefix
    pub fn fix_scheme(url: &str) -> String {
        if SCHEME_PREFIX.is_match(url) {
            url.to_string()
        } else {
            format!("http://{}", url)
        }
    }

    /// Parse a trimmed URL after scheme fixing
    pub fn parse_fixed(url: &str) -> Option<Url> {
        Url::parse(&Self::fix_scheme(url)).ok()
    }

    /// Lowercased hostname, falling back to a string split when parsing fails
    pub fn extract_hostname(url: &str) -> String {
        if let Some(parsed) = Self::parse_fixed(url.trim()) {
            if let Some(host) = parsed.host_str() {
                return host.to_lowercase();
            }
        }

        log::debug!("URL parse failed, splitting hostname by hand: {}", url);
        let stripped = HTTP_PREFIX.replace(url.trim(), "");
        stripped
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }

    /// Check if domain matches any in list (with hierarchy support)
    pub fn matches_domain_list(domain: &str, domain_list: &[&str]) -> bool {
        Self::find_domain(domain, domain_list).is_some()
    }

    /// Exact or subdomain match, returning the list entry that matched
    pub fn find_domain<'a>(domain: &str, domain_list: &[&'a str]) -> Option<&'a str> {
        let domain_lower = domain.to_lowercase();

        domain_list.iter().copied().find(|pattern| {
            let pattern_lower = pattern.to_lowercase();
            domain_lower == pattern_lower || domain_lower.ends_with(&format!(".{}", pattern_lower))
        })
    }

    /// Four groups of one to three digits
    pub fn is_dotted_quad(host: &str) -> bool {
        DOTTED_QUAD.is_match(host)
    }
}
