use crate::features::FeatureSet;
use crate::verdict::{DANGEROUS_THRESHOLD, SUSPICIOUS_THRESHOLD};
use serde::Serialize;
use std::fmt;

/// Names commonly borrowed by impersonation pages
pub const IMPERSONATED_KEYWORDS: [&str; 12] = [
    "paypal",
    "amazon",
    "google",
    "apple",
    "netflix",
    "facebook",
    "instagram",
    "bank",
    "login",
    "secure",
    "account",
    "verify",
];

const MANY_SUBDOMAINS: usize = 3;
const MANY_DIGITS: usize = 6;
const DEEP_PATH_SLASHES: usize = 6;

/// Human readable signal behind a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "keyword", rename_all = "snake_case")]
pub enum Reason {
    RawIp,
    EmailPattern,
    NoHttps,
    ExcessiveSubdomains,
    ManyDigits,
    EncodedChars,
    AtSign,
    Impersonation(&'static str),
    DeepPath,
}

impl Reason {
    /// Short form used in bulleted reports
    pub fn title(&self) -> String {
        match self {
            Reason::RawIp => "URL uses IP address".to_string(),
            Reason::EmailPattern => "Email pattern found".to_string(),
            Reason::NoHttps => "No HTTPS present".to_string(),
            Reason::ExcessiveSubdomains => "Excessive subdomains".to_string(),
            Reason::ManyDigits => "High number of digits".to_string(),
            Reason::EncodedChars => "Encoded characters present".to_string(),
            Reason::AtSign => "Contains '@'".to_string(),
            Reason::Impersonation(keyword) => format!("Mentions \"{}\" off its official domain", keyword),
            Reason::DeepPath => "Deep path structure".to_string(),
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::RawIp => f.write_str("URL uses a raw IP address (common in phishing)."),
            Reason::EmailPattern => {
                f.write_str("Email-like string inside URL (possible data exfiltration).")
            }
            Reason::NoHttps => f.write_str("URL does not use HTTPS (unsafe connection)."),
            Reason::ExcessiveSubdomains => {
                f.write_str("Too many subdomains, suspicious domain structure.")
            }
            Reason::ManyDigits => f.write_str("Large number of digits, uncommon in real services."),
            Reason::EncodedChars => f.write_str("Contains encoded characters used to hide payloads."),
            Reason::AtSign => f.write_str("Contains '@' which can hide host redirection."),
            Reason::Impersonation(keyword) => write!(
                f,
                "Contains \"{}\" but not the official domain, possible impersonation.",
                keyword
            ),
            Reason::DeepPath => f.write_str("Deep path structure."),
        }
    }
}

/// Coarse risk band of a probability, same cut points as the label mapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn from_probability(probability: f64) -> Self {
        if probability < SUSPICIOUS_THRESHOLD {
            RiskTier::Low
        } else if probability < DANGEROUS_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low risk, appears legitimate based on lexical features.",
            RiskTier::Medium => "Medium risk, some suspicious signals detected.",
            RiskTier::High => "High risk, avoid entering credentials.",
        }
    }

    fn overall(&self) -> &'static str {
        match self {
            RiskTier::Low => "No strong phishing signals.",
            RiskTier::Medium => "Some suspicious lexical signals.",
            RiskTier::High => "Strong phishing indicators detected.",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        })
    }
}

/// Signals for the one-line explanation, strongest first.
///
/// At most one impersonation keyword is reported.
pub fn reasons(features: &FeatureSet) -> Vec<Reason> {
    let mut reasons = Vec::new();

    if features.is_ip == 1 {
        reasons.push(Reason::RawIp);
    }
    if features.contains_email_pattern == 1 {
        reasons.push(Reason::EmailPattern);
    }
    if features.is_https == 0 {
        reasons.push(Reason::NoHttps);
    }
    if features.subdomain_count > MANY_SUBDOMAINS {
        reasons.push(Reason::ExcessiveSubdomains);
    }
    if features.count_digits > MANY_DIGITS {
        reasons.push(Reason::ManyDigits);
    }
    if features.contains_encoded_chars == 1 {
        reasons.push(Reason::EncodedChars);
    }
    if features.url.contains('@') {
        reasons.push(Reason::AtSign);
    }
    if let Some(keyword) = impersonated_keyword(&features.url) {
        reasons.push(Reason::Impersonation(keyword));
    }

    reasons
}

/// Structural signals listed in the detailed report
pub fn primary_reasons(features: &FeatureSet) -> Vec<Reason> {
    let checks = [
        (features.is_ip == 1, Reason::RawIp),
        (features.contains_email_pattern == 1, Reason::EmailPattern),
        (features.is_https == 0, Reason::NoHttps),
        (features.subdomain_count > MANY_SUBDOMAINS, Reason::ExcessiveSubdomains),
        (features.count_digits > MANY_DIGITS, Reason::ManyDigits),
        (features.contains_encoded_chars == 1, Reason::EncodedChars),
        (features.count_slashes > DEEP_PATH_SLASHES, Reason::DeepPath),
    ];

    checks
        .into_iter()
        .filter_map(|(hit, reason)| hit.then_some(reason))
        .collect()
}

fn impersonated_keyword(url: &str) -> Option<&'static str> {
    let lower = url.to_lowercase();
    IMPERSONATED_KEYWORDS.into_iter().find(|keyword| {
        lower.contains(keyword)
            && !lower.contains(&format!("{}.com", keyword))
            && !lower.contains(&format!("www.{}", keyword))
    })
}

/// e.g. `URL uses a raw IP address (common in phishing). (Phishing probability: 91.0%, Risk: HIGH).`
pub fn explain_short(features: &FeatureSet, probability: f64) -> String {
    let percent = probability * 100.0;
    let tier = RiskTier::from_probability(probability);

    match reasons(features).first() {
        Some(reason) => format!(
            "{} (Phishing probability: {:.1}%, Risk: {}).",
            reason, percent, tier
        ),
        None => format!(
            "{} (Probability: {:.1}%, Risk: {}).",
            tier.overall(),
            percent,
            tier
        ),
    }
}
