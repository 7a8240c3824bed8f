use crate::config::{RiskThresholds, ScoreWeights};
use crate::features::{FeatureSet, RiskLevel};

/// Pure, total, order-independent fusion of the feature flags into a capped
/// score and a discrete level.
pub struct ScoreAggregator {
    weights: ScoreWeights,
    thresholds: RiskThresholds,
}

impl ScoreAggregator {
    pub fn new(weights: ScoreWeights, thresholds: RiskThresholds) -> Self {
        Self {
            weights,
            thresholds,
        }
    }

    /// Weights can sum above 1.0 when many features co-occur, so the total
    /// is capped.
    pub fn score(&self, features: &FeatureSet) -> (f64, RiskLevel) {
        let raw: f64 = features
            .iter()
            .filter(|(_, present)| *present)
            .map(|(feature, _)| self.weights.for_feature(feature))
            .sum();

        let score = raw.min(1.0);
        (score, self.level_for(score))
    }

    pub fn level_for(&self, score: f64) -> RiskLevel {
        if score >= self.thresholds.high {
            RiskLevel::High
        } else if score >= self.thresholds.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}
