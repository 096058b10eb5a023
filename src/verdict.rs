use crate::explanation::{self, Reason, RiskTier};
use crate::features::FeatureSet;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SUSPICIOUS_THRESHOLD: f64 = 0.40;
pub const DANGEROUS_THRESHOLD: f64 = 0.70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLabel {
    Safe,
    Suspicious,
    Dangerous,
    Unverified,
    ForcedSafe,
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLabel::Safe => "SAFE",
            RiskLabel::Suspicious => "SUSPICIOUS",
            RiskLabel::Dangerous => "DANGEROUS",
            RiskLabel::Unverified => "UNVERIFIED",
            RiskLabel::ForcedSafe => "FORCED_SAFE",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskColor {
    Green,
    Orange,
    Red,
}

impl fmt::Display for RiskColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = match self {
            RiskColor::Green => "green",
            RiskColor::Orange => "orange",
            RiskColor::Red => "red",
        };
        f.write_str(color)
    }
}

/// Three-tier mapping used when no override supplied a label
pub fn map_to_label(probability: f64) -> (RiskLabel, RiskColor) {
    if probability < SUSPICIOUS_THRESHOLD {
        (RiskLabel::Safe, RiskColor::Green)
    } else if probability < DANGEROUS_THRESHOLD {
        (RiskLabel::Suspicious, RiskColor::Orange)
    } else {
        (RiskLabel::Dangerous, RiskColor::Red)
    }
}

/// Final result of scoring one URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub url: String,
    pub probability: f64,
    /// Model output before any override was applied
    pub raw_probability: f64,
    pub label: RiskLabel,
    pub color: RiskColor,
    pub features: FeatureSet,
    pub rule: Option<String>,
    pub message: Option<String>,
    /// Strongest lexical signal with the final probability, one line
    pub explanation: String,
}

impl Verdict {
    pub fn is_overridden(&self) -> bool {
        self.rule.is_some()
    }

    pub fn risk_tier(&self) -> RiskTier {
        RiskTier::from_probability(self.probability)
    }

    pub fn reasons(&self) -> Vec<Reason> {
        explanation::reasons(&self.features)
    }

    pub fn primary_reasons(&self) -> Vec<Reason> {
        explanation::primary_reasons(&self.features)
    }

    /// One-line summary, e.g. `DANGEROUS (0.91) http://203.0.113.5/login`
    pub fn summary(&self) -> String {
        let mut line = format!("{} ({:.2}) {}", self.label, self.probability, self.url);
        if let Some(message) = &self.message {
            line.push_str(" - ");
            line.push_str(message);
        }
        line
    }
}
