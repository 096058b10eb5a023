use crate::domain_utils::DomainUtils;
use crate::verdict::{RiskColor, RiskLabel};
use serde::Serialize;

/// Free static hosting platforms where anyone can publish a page
pub const DEV_HOST_SUFFIXES: [&str; 8] = [
    "vercel.app",
    "netlify.app",
    "github.io",
    "pages.dev",
    "web.app",
    "herokuapp.com",
    "glitch.me",
    "firebaseapp.com",
];

/// Projects on developer hosting that are known to be ours
pub const TRUSTED_PROJECT_DOMAINS: [&str; 2] =
    ["abhinikfrontend.vercel.app", "catchthephish.vercel.app"];

/// Major platforms; includes the allow-listed projects
pub const TRUSTED_DOMAINS: [&str; 26] = [
    "google.com",
    "gmail.com",
    "youtube.com",
    "openai.com",
    "microsoft.com",
    "office.com",
    "windows.com",
    "apple.com",
    "icloud.com",
    "support.apple.com",
    "instagram.com",
    "facebook.com",
    "twitter.com",
    "x.com",
    "linkedin.com",
    "amazon.com",
    "amazon.in",
    "paypal.com",
    "stripe.com",
    "github.com",
    "gitlab.com",
    "stackoverflow.com",
    "gov.in",
    "india.gov.in",
    "abhinikfrontend.vercel.app",
    "catchthephish.vercel.app",
];

const DEV_HOSTING_FLOOR: f64 = 0.40;
const TRUSTED_CAP: f64 = 0.15;
const RAW_IP_FLOOR: f64 = 0.85;

const DEV_HOSTING_MESSAGE: &str = "Hosted on a developer platform. This may be a legitimate project or a phishing page. Treat with caution.";
const RAW_IP_MESSAGE: &str = "IP-based URLs are commonly used in phishing attacks.";

/// Adjusted probability plus whatever the matching rule forces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverrideOutcome {
    pub probability: f64,
    pub label: Option<RiskLabel>,
    pub color: Option<RiskColor>,
    pub message: Option<String>,
    pub rule: Option<&'static str>,
}

impl OverrideOutcome {
    fn pass_through(probability: f64) -> Self {
        Self {
            probability,
            label: None,
            color: None,
            message: None,
            rule: None,
        }
    }
}

/// What a matching rule does to the raw probability
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEffect {
    pub probability: f64,
    pub label: Option<RiskLabel>,
    pub color: Option<RiskColor>,
    pub message: Option<String>,
}

/// A hostname predicate and the adjustment it triggers
pub struct OverrideRule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub effect: fn(&str, f64) -> RuleEffect,
}

/// Evaluated top to bottom, first match wins
pub static DEFAULT_RULES: [OverrideRule; 3] = [
    OverrideRule {
        name: "developer-hosting",
        matches: is_untrusted_dev_host,
        effect: |_, probability| RuleEffect {
            probability: probability.max(DEV_HOSTING_FLOOR),
            label: Some(RiskLabel::Unverified),
            color: Some(RiskColor::Orange),
            message: Some(DEV_HOSTING_MESSAGE.to_string()),
        },
    },
    OverrideRule {
        name: "trusted-domain",
        matches: is_trusted_host,
        effect: |hostname, probability| RuleEffect {
            probability: probability.min(TRUSTED_CAP),
            label: Some(RiskLabel::ForcedSafe),
            color: Some(RiskColor::Green),
            message: Some(format!("Trusted domain detected: {}.", hostname)),
        },
    },
    OverrideRule {
        name: "raw-ipv4-host",
        matches: DomainUtils::is_dotted_quad,
        effect: |_, probability| RuleEffect {
            probability: probability.max(RAW_IP_FLOOR),
            label: None,
            color: Some(RiskColor::Red),
            message: Some(RAW_IP_MESSAGE.to_string()),
        },
    },
];

fn is_untrusted_dev_host(hostname: &str) -> bool {
    DomainUtils::matches_domain_list(hostname, &DEV_HOST_SUFFIXES)
        && !DomainUtils::matches_domain_list(hostname, &TRUSTED_PROJECT_DOMAINS)
}

fn is_trusted_host(hostname: &str) -> bool {
    DomainUtils::matches_domain_list(hostname, &TRUSTED_DOMAINS)
}

/// Hostname based exceptions layered over the model probability
pub struct OverrideEngine {
    rules: &'static [OverrideRule],
}

impl Default for OverrideEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OverrideEngine {
    pub fn new() -> Self {
        Self {
            rules: &DEFAULT_RULES,
        }
    }

    pub fn with_rules(rules: &'static [OverrideRule]) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    /// Never fails; unparsable URLs fall back to a string-split hostname
    pub fn apply(&self, url: &str, raw_probability: f64) -> OverrideOutcome {
        let hostname = DomainUtils::extract_hostname(url);
        self.apply_to_host(&hostname, raw_probability)
    }

    pub fn apply_to_host(&self, hostname: &str, raw_probability: f64) -> OverrideOutcome {
        match self.rules.iter().find(|rule| (rule.matches)(hostname)) {
            Some(rule) => {
                log::debug!("Override rule {} matched host {}", rule.name, hostname);
                let effect = (rule.effect)(hostname, raw_probability);
                OverrideOutcome {
                    probability: effect.probability,
                    label: effect.label,
                    color: effect.color,
                    message: effect.message,
                    rule: Some(rule.name),
                }
            }
            None => OverrideOutcome::pass_through(raw_probability),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(url: &str, probability: f64) -> OverrideOutcome {
        OverrideEngine::new().apply(url, probability)
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            OverrideEngine::new().rule_names(),
            vec!["developer-hosting", "trusted-domain", "raw-ipv4-host"]
        );
    }

    #[test]
    fn test_dev_hosting_raises_floor() {
        let outcome = apply("https://free-gift-card.vercel.app/claim", 0.10);
        assert_eq!(outcome.probability, 0.40);
        assert_eq!(outcome.label, Some(RiskLabel::Unverified));
        assert_eq!(outcome.color, Some(RiskColor::Orange));
        assert_eq!(outcome.rule, Some("developer-hosting"));
        assert!(outcome.message.unwrap().starts_with("Hosted on a developer platform"));

        // never lowered
        assert_eq!(apply("someone.github.io", 0.93).probability, 0.93);
        assert_eq!(apply("https://netlify.app", 0.2).rule, Some("developer-hosting"));
    }

    #[test]
    fn test_dev_suffix_needs_label_boundary() {
        assert_eq!(apply("https://notvercel.app/", 0.3).rule, None);
    }

    #[test]
    fn test_allow_listed_project_is_trusted() {
        let outcome = apply("https://catchthephish.vercel.app/", 0.80);
        assert_eq!(outcome.rule, Some("trusted-domain"));
        assert_eq!(outcome.label, Some(RiskLabel::ForcedSafe));
        assert_eq!(outcome.color, Some(RiskColor::Green));
        assert_eq!(outcome.probability, 0.15);

        let outcome = apply("abhinikfrontend.vercel.app", 0.05);
        assert_eq!(outcome.label, Some(RiskLabel::ForcedSafe));
        assert_eq!(outcome.probability, 0.05);
    }

    #[test]
    fn test_trusted_domain_caps_probability() {
        let outcome = apply("http://paypal.com/login", 0.9);
        assert_eq!(outcome.probability, 0.15);
        assert_eq!(outcome.label, Some(RiskLabel::ForcedSafe));
        assert_eq!(outcome.message.as_deref(), Some("Trusted domain detected: paypal.com."));

        assert_eq!(apply("https://accounts.google.com/signin", 0.7).rule, Some("trusted-domain"));
        assert_eq!(apply("https://WWW.GitHub.com", 0.7).rule, Some("trusted-domain"));
    }

    #[test]
    fn test_lookalike_is_not_trusted() {
        assert_eq!(apply("http://paypal.com.secure-login.xyz/", 0.9).rule, None);
        assert_eq!(apply("http://mypaypal.com/", 0.9).rule, None);
    }

    #[test]
    fn test_raw_ip_host() {
        let outcome = apply("http://192.168.1.1/admin/login.php", 0.05);
        assert_eq!(outcome.probability, 0.85);
        assert_eq!(outcome.color, Some(RiskColor::Red));
        assert_eq!(outcome.label, None);
        assert_eq!(outcome.message.as_deref(), Some(RAW_IP_MESSAGE));

        assert_eq!(apply("192.168.1.1:8080", 0.99).probability, 0.99);
    }

    #[test]
    fn test_invalid_ip_falls_back_to_string_split() {
        // not a parsable IPv4 address, still a dotted quad
        let outcome = apply("http://999.999.999.999/x", 0.2);
        assert_eq!(outcome.rule, Some("raw-ipv4-host"));
    }

    #[test]
    fn test_no_match_passes_through() {
        let outcome = apply("https://example.org/article", 0.42);
        assert_eq!(outcome, OverrideOutcome::pass_through(0.42));
    }

    #[test]
    fn test_reapplying_is_stable() {
        for (url, raw) in [
            ("https://evil.netlify.app", 0.1),
            ("https://evil.netlify.app", 0.6),
            ("https://paypal.com", 0.9),
            ("http://203.0.113.5", 0.2),
            ("https://example.org", 0.5),
        ] {
            let first = apply(url, raw);
            let second = apply(url, first.probability);
            assert_eq!(first, second, "{url}");
        }
    }

    #[test]
    fn test_unparsable_input_never_panics() {
        for url in ["", "   ", "http://", "://", "http://[::1", "%%%"] {
            let outcome = apply(url, 0.5);
            assert!((0.0..=1.0).contains(&outcome.probability));
        }
    }

    static LOCALHOST_ONLY: [OverrideRule; 1] = [OverrideRule {
        name: "localhost",
        matches: |hostname| hostname == "localhost",
        effect: |_, _| RuleEffect {
            probability: 0.0,
            label: None,
            color: None,
            message: None,
        },
    }];

    #[test]
    fn test_custom_rule_table() {
        let engine = OverrideEngine::with_rules(&LOCALHOST_ONLY);

        let outcome = engine.apply("http://localhost:3000/", 0.6);
        assert_eq!(outcome.probability, 0.0);
        assert_eq!(outcome.rule, Some("localhost"));
        assert_eq!(outcome.label, None);
        assert_eq!(engine.apply("http://192.168.1.1/", 0.6).rule, None);
    }
}
