use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// TLDs commonly used for spam/phishing
pub const SUSPICIOUS_TLDS: [&str; 16] = [
    "xyz", "top", "shop", "fit", "loan", "live", "club", "online", "site", "pw", "icu", "info",
    "biz", "click", "win", "country",
];

lazy_static! {
    static ref SUSPICIOUS_TLD_SET: HashSet<&'static str> = SUSPICIOUS_TLDS.iter().copied().collect();
    // Digits and dots only; malformed addresses count too
    static ref LAX_IP: Regex = Regex::new(r"^[0-9.]+$").unwrap();
}

/// Structural breakdown of a hostname
#[derive(Debug, Clone, PartialEq)]
pub struct HostProfile<'a> {
    pub segments: Vec<&'a str>,
    pub subdomain_count: usize,
    pub tld: &'a str,
}

impl<'a> HostProfile<'a> {
    pub fn new(hostname: &'a str) -> Self {
        let segments: Vec<&str> = hostname.split('.').filter(|s| !s.is_empty()).collect();
        let subdomain_count = segments.len().saturating_sub(2);
        let tld = segments.last().copied().unwrap_or("");

        Self {
            segments,
            subdomain_count,
            tld,
        }
    }

    pub fn tld_length(&self) -> usize {
        self.tld.chars().count()
    }

    pub fn is_suspicious_tld(&self) -> bool {
        SUSPICIOUS_TLD_SET.contains(self.tld)
    }

    /// Length of the leading label, only when there is a subdomain
    pub fn first_subdomain_length(&self) -> usize {
        if self.segments.len() > 2 {
            self.segments[0].chars().count()
        } else {
            0
        }
    }

    pub fn has_multiple_subdomains(&self) -> bool {
        self.subdomain_count > 1
    }
}

pub fn is_ip_like(hostname: &str) -> bool {
    LAX_IP.is_match(hostname)
}

pub fn starts_with_number(hostname: &str) -> bool {
    hostname.chars().next().is_some_and(|c| c.is_ascii_digit())
}
