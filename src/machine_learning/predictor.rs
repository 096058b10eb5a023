use super::ModelParameters;
use crate::features::FeatureLookup;
use serde::Serialize;

/// One term of the linear score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContribution {
    pub name: String,
    pub value: f64,
    pub coefficient: f64,
    pub contribution: f64,
}

/// Logistic regression over named features
pub struct LinearPredictor;

impl LinearPredictor {
    /// Feature values in model order; names the feature set lacks count as 0
    pub fn feature_vector<F: FeatureLookup + ?Sized>(
        params: &ModelParameters,
        features: &F,
    ) -> Vec<f64> {
        params
            .feature_names()
            .iter()
            .map(|name| features.value(name).unwrap_or(0.0))
            .collect()
    }

    /// intercept + Σ coefficient_i * value_i
    pub fn score<F: FeatureLookup + ?Sized>(params: &ModelParameters, features: &F) -> f64 {
        Self::feature_vector(params, features)
            .iter()
            .zip(params.coefficients())
            .fold(params.intercept(), |acc, (value, coefficient)| acc + coefficient * value)
    }

    /// Probability in [0, 1]
    pub fn predict<F: FeatureLookup + ?Sized>(params: &ModelParameters, features: &F) -> f64 {
        sigmoid(Self::score(params, features))
    }

    pub fn contributions<F: FeatureLookup + ?Sized>(
        params: &ModelParameters,
        features: &F,
    ) -> Vec<FeatureContribution> {
        params
            .weights()
            .map(|(name, coefficient)| {
                let value = features.value(name).unwrap_or(0.0);
                FeatureContribution {
                    name: name.to_string(),
                    value,
                    coefficient,
                    contribution: coefficient * value,
                }
            })
            .collect()
    }
}

/// `1 / (1 + e^-score)`, evaluated exactly in that form so probabilities are
/// bit-identical with the training pipeline. Saturates to 0 or 1 at the
/// infinities since `exp` overflows to `inf` rather than failing.
pub fn sigmoid(score: f64) -> f64 {
    if score.is_nan() {
        log::warn!("Model score is NaN, reporting an uninformative probability");
        return 0.5;
    }

    1.0 / (1.0 + (-score).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::UrlFeatureExtractor;
    use std::collections::HashMap;

    fn params() -> ModelParameters {
        ModelParameters::new(
            vec!["is_ip".to_string(), "url_length".to_string(), "not_a_feature".to_string()],
            vec![2.0, 0.5, 100.0],
            -1.0,
        )
        .unwrap()
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!((sigmoid(2.0) - 0.8807970779778823).abs() < 1e-12);
        assert!((sigmoid(-2.0) - 0.11920292202211755).abs() < 1e-12);
    }

    #[test]
    fn test_sigmoid_saturates() {
        assert_eq!(sigmoid(1e6), 1.0);
        assert_eq!(sigmoid(-1e6), 0.0);
        assert_eq!(sigmoid(f64::INFINITY), 1.0);
        assert_eq!(sigmoid(f64::NEG_INFINITY), 0.0);
        assert_eq!(sigmoid(f64::NAN), 0.5);
    }

    #[test]
    fn test_sigmoid_matches_reference_formula_bit_for_bit() {
        let mut score: f64 = -0.001;
        while score > -20.0 {
            let expected = 1.0 / (1.0 + (-score).exp());
            assert_eq!(sigmoid(score).to_bits(), expected.to_bits(), "score {score}");
            assert_eq!(sigmoid(-score).to_bits(), (1.0 / (1.0 + score.exp())).to_bits());
            score -= 0.0137;
        }
        assert_eq!(sigmoid(-0.001), 0.4997500000208333);
    }

    #[test]
    fn test_missing_features_are_zero() {
        let mut features = HashMap::new();
        features.insert("is_ip".to_string(), 1.0);

        assert_eq!(LinearPredictor::feature_vector(&params(), &features), vec![1.0, 0.0, 0.0]);
        assert_eq!(LinearPredictor::score(&params(), &features), 1.0);
    }

    #[test]
    fn test_predict_from_extracted_features() {
        let features = UrlFeatureExtractor::new().extract("http://10.0.0.1");
        // url_length 15, is_ip 1 -> -1 + 2 + 7.5
        assert_eq!(LinearPredictor::score(&params(), &features), 8.5);

        let probability = LinearPredictor::predict(&params(), &features);
        assert!((probability - sigmoid(8.5)).abs() < 1e-15);
    }

    #[test]
    fn test_probability_bounds() {
        let extractor = UrlFeatureExtractor::new();
        let extreme = ModelParameters::new(vec!["url_length".to_string()], vec![1e308], 1e308).unwrap();
        let negative = ModelParameters::new(vec!["url_length".to_string()], vec![-1e308], -1e308).unwrap();

        for url in ["a", "http://example.com", "https://x.y.z.example.xyz/login?id=1"] {
            let features = extractor.extract(url);
            for p in [&params(), &extreme, &negative] {
                let probability = LinearPredictor::predict(p, &features);
                assert!((0.0..=1.0).contains(&probability), "{probability} out of range");
            }
        }
    }

    #[test]
    fn test_contributions() {
        let mut features = HashMap::new();
        features.insert("url_length".to_string(), 10.0);

        let contributions = LinearPredictor::contributions(&params(), &features);
        assert_eq!(contributions.len(), 3);
        assert_eq!(contributions[1].contribution, 5.0);
        assert_eq!(contributions[2].value, 0.0);
    }
}
