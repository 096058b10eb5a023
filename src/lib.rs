pub mod config;
pub mod config_loader;
pub mod detection;
pub mod domain_utils;
pub mod engine;
pub mod explanation;
pub mod features;
pub mod machine_learning;
pub mod verdict;

pub use config::Config;
pub use detection::{OverrideEngine, OverrideOutcome};
pub use engine::ScoringEngine;
pub use explanation::{Reason, RiskTier};
pub use features::{FeatureSet, UrlFeatureExtractor};
pub use machine_learning::{
    LinearPredictor, ModelLoadError, ModelParameters, ModelSource, ModelStore,
};
pub use verdict::{map_to_label, RiskColor, RiskLabel, Verdict};
