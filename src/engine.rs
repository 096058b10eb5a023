use crate::detection::OverrideEngine;
use crate::explanation::explain_short;
use crate::features::UrlFeatureExtractor;
use crate::machine_learning::{
    FeatureContribution, LinearPredictor, ModelLoadError, ModelParameters, ModelSource, ModelStore,
};
use crate::verdict::{map_to_label, Verdict};
use std::sync::Arc;

/// Entry point: extract features, run the model, apply overrides, label.
///
/// Everything after the one-time model load is pure, so a single engine can
/// be shared across tasks behind an `Arc`.
pub struct ScoringEngine {
    store: Arc<ModelStore>,
    extractor: UrlFeatureExtractor,
    overrides: OverrideEngine,
}

impl ScoringEngine {
    pub fn new(store: Arc<ModelStore>) -> Self {
        Self {
            store,
            extractor: UrlFeatureExtractor::new(),
            overrides: OverrideEngine::new(),
        }
    }

    pub fn from_source(source: ModelSource) -> Self {
        Self::new(Arc::new(ModelStore::new(source)))
    }

    pub fn with_overrides(mut self, overrides: OverrideEngine) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Load the model ahead of the first request
    pub async fn preload(&self) -> Result<Arc<ModelParameters>, ModelLoadError> {
        self.store.get().await
    }

    /// Waits for the model on first use; fails only if the model cannot be loaded
    pub async fn score(&self, url: &str) -> Result<Verdict, ModelLoadError> {
        let params = self.store.get().await?;
        Ok(self.score_with(&params, url))
    }

    pub fn score_with(&self, params: &ModelParameters, url: &str) -> Verdict {
        let features = self.extractor.extract(url);
        let raw_probability = LinearPredictor::predict(params, &features);
        let outcome = self.overrides.apply(&features.url, raw_probability);

        let (mapped_label, mapped_color) = map_to_label(outcome.probability);
        let label = outcome.label.unwrap_or(mapped_label);
        let color = outcome.color.unwrap_or(mapped_color);

        log::debug!(
            "Scored {}: raw {:.4} -> {:.4} {}",
            features.url,
            raw_probability,
            outcome.probability,
            label
        );

        let explanation = explain_short(&features, outcome.probability);

        Verdict {
            url: features.url.clone(),
            probability: outcome.probability,
            raw_probability,
            label,
            color,
            features,
            rule: outcome.rule.map(str::to_string),
            message: outcome.message,
            explanation,
        }
    }

    /// Largest contributions to the raw score first
    pub fn explain(params: &ModelParameters, verdict: &Verdict) -> Vec<FeatureContribution> {
        let mut contributions = LinearPredictor::contributions(params, &verdict.features);
        contributions.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));
        contributions
    }
}
