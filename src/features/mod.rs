pub mod entropy;
pub mod extractor;
pub mod tld_risk;

pub use extractor::UrlFeatureExtractor;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical feature order used by the training pipeline
pub const FEATURE_NAMES: [&str; 28] = [
    "url_length",
    "hostname_length",
    "path_length",
    "query_length",
    "count_dots",
    "count_hyphens",
    "count_digits",
    "count_special_chars",
    "count_slashes",
    "is_https",
    "subdomain_count",
    "tld_length",
    "is_suspicious_tld",
    "is_ip",
    "first_subdomain_length",
    "has_multiple_subdomains",
    "starts_with_number",
    "contains_repeated_chars",
    "contains_login_keyword",
    "contains_finance_keyword",
    "contains_encoded_chars",
    "contains_email_pattern",
    "contains_hex_pattern",
    "contains_uuid_pattern",
    "digit_ratio",
    "special_char_ratio",
    "entropy_hostname",
    "entropy_path",
];

/// Name-based access to numeric feature values.
///
/// The predictor only sees features through this trait, so any mapping
/// (the extractor's typed [`FeatureSet`], or a plain map) can be scored.
pub trait FeatureLookup {
    fn value(&self, name: &str) -> Option<f64>;
}

impl FeatureLookup for HashMap<String, f64> {
    fn value(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// The 28 lexical features of one URL
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Trimmed input, kept for explanation text
    #[serde(skip)]
    pub url: String,

    pub url_length: usize,
    pub hostname_length: usize,
    pub path_length: usize,
    pub query_length: usize,

    pub count_dots: usize,
    pub count_hyphens: usize,
    pub count_digits: usize,
    pub count_special_chars: usize,
    pub count_slashes: usize,

    pub is_https: u8,
    pub subdomain_count: usize,
    pub tld_length: usize,
    pub is_suspicious_tld: u8,
    pub is_ip: u8,
    pub first_subdomain_length: usize,
    pub has_multiple_subdomains: u8,
    pub starts_with_number: u8,

    pub contains_repeated_chars: u8,
    pub contains_login_keyword: u8,
    pub contains_finance_keyword: u8,
    pub contains_encoded_chars: u8,
    pub contains_email_pattern: u8,
    pub contains_hex_pattern: u8,
    pub contains_uuid_pattern: u8,

    pub digit_ratio: f64,
    pub special_char_ratio: f64,
    pub entropy_hostname: f64,
    pub entropy_path: f64,
}

impl FeatureSet {
    pub fn get(&self, name: &str) -> Option<f64> {
        let value = match name {
            "url_length" => self.url_length as f64,
            "hostname_length" => self.hostname_length as f64,
            "path_length" => self.path_length as f64,
            "query_length" => self.query_length as f64,
            "count_dots" => self.count_dots as f64,
            "count_hyphens" => self.count_hyphens as f64,
            "count_digits" => self.count_digits as f64,
            "count_special_chars" => self.count_special_chars as f64,
            "count_slashes" => self.count_slashes as f64,
            "is_https" => f64::from(self.is_https),
            "subdomain_count" => self.subdomain_count as f64,
            "tld_length" => self.tld_length as f64,
            "is_suspicious_tld" => f64::from(self.is_suspicious_tld),
            "is_ip" => f64::from(self.is_ip),
            "first_subdomain_length" => self.first_subdomain_length as f64,
            "has_multiple_subdomains" => f64::from(self.has_multiple_subdomains),
            "starts_with_number" => f64::from(self.starts_with_number),
            "contains_repeated_chars" => f64::from(self.contains_repeated_chars),
            "contains_login_keyword" => f64::from(self.contains_login_keyword),
            "contains_finance_keyword" => f64::from(self.contains_finance_keyword),
            "contains_encoded_chars" => f64::from(self.contains_encoded_chars),
            "contains_email_pattern" => f64::from(self.contains_email_pattern),
            "contains_hex_pattern" => f64::from(self.contains_hex_pattern),
            "contains_uuid_pattern" => f64::from(self.contains_uuid_pattern),
            "digit_ratio" => self.digit_ratio,
            "special_char_ratio" => self.special_char_ratio,
            "entropy_hostname" => self.entropy_hostname,
            "entropy_path" => self.entropy_path,
            _ => return None,
        };
        Some(value)
    }

    /// All features in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES
            .into_iter()
            .map(move |name| (name, self.get(name).unwrap_or(0.0)))
    }

    pub fn to_map(&self) -> HashMap<String, f64> {
        self.iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

impl FeatureLookup for FeatureSet {
    fn value(&self, name: &str) -> Option<f64> {
        self.get(name)
    }
}

pub(crate) fn flag(condition: bool) -> u8 {
    u8::from(condition)
}
