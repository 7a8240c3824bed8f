use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifiers for every phishing indicator the analyzer can raise.
/// The score aggregator indexes by these names, so they are an enum rather
/// than free text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    HasUrgency,
    HasSuspiciousLinks,
    HasCredentialRequest,
    HasSenderSpoofing,
    HasTyposquatting,
    HasPoorFormatting,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::HasUrgency,
        Feature::HasSuspiciousLinks,
        Feature::HasCredentialRequest,
        Feature::HasSenderSpoofing,
        Feature::HasTyposquatting,
        Feature::HasPoorFormatting,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::HasUrgency => "has_urgency",
            Feature::HasSuspiciousLinks => "has_suspicious_links",
            Feature::HasCredentialRequest => "has_credential_request",
            Feature::HasSenderSpoofing => "has_sender_spoofing",
            Feature::HasTyposquatting => "has_typosquatting",
            Feature::HasPoorFormatting => "has_poor_formatting",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One boolean flag per known feature. Every extraction run populates every
/// key exactly once; absent keys never occur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet {
    flags: BTreeMap<Feature, bool>,
}

impl FeatureSet {
    /// All-false set with every known feature key present.
    pub fn new() -> Self {
        let mut flags = BTreeMap::new();
        for feature in Feature::ALL {
            flags.insert(feature, false);
        }
        Self { flags }
    }

    pub fn set(&mut self, feature: Feature, present: bool) {
        self.flags.insert(feature, present);
    }

    pub fn get(&self, feature: Feature) -> bool {
        self.flags.get(&feature).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, bool)> + '_ {
        self.flags.iter().map(|(f, v)| (*f, *v))
    }

    /// Number of features currently flagged true.
    pub fn count_present(&self) -> usize {
        self.flags.values().filter(|v| **v).count()
    }

    pub fn any_present(&self) -> bool {
        self.flags.values().any(|v| *v)
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-URL verdict with every reason that applied (checks do not
/// short-circuit, so all of them can be reported).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlReport {
    pub url: String,
    pub suspicious: bool,
    pub reasons: Vec<String>,
}

/// Terminal output of one analysis: the feature flags, the capped weighted
/// score, the discrete level, and the per-URL reports backing the link flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub features: FeatureSet,
    pub score: f64,
    pub level: RiskLevel,
    pub url_reports: Vec<UrlReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_set_has_every_key_exactly_once() {
        let set = FeatureSet::new();
        let keys: Vec<Feature> = set.iter().map(|(f, _)| f).collect();
        assert_eq!(keys.len(), Feature::ALL.len());
        for feature in Feature::ALL {
            assert!(keys.contains(&feature));
            assert!(!set.get(feature));
        }
    }

    #[test]
    fn test_set_and_count() {
        let mut set = FeatureSet::new();
        assert!(!set.any_present());

        set.set(Feature::HasUrgency, true);
        set.set(Feature::HasCredentialRequest, true);
        assert_eq!(set.count_present(), 2);
        assert!(set.get(Feature::HasUrgency));
        assert!(!set.get(Feature::HasPoorFormatting));

        // Re-setting a key must not duplicate it
        set.set(Feature::HasUrgency, true);
        assert_eq!(set.iter().count(), Feature::ALL.len());
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }

    #[test]
    fn test_feature_serializes_as_snake_case() {
        let json = serde_json::to_string(&Feature::HasSuspiciousLinks).unwrap();
        assert_eq!(json, "\"has_suspicious_links\"");
    }
}
