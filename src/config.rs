use crate::features::Feature;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-feature score weights. Weights may sum above 1.0 when many features
/// co-occur; the aggregator caps the total.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub urgency: f64,
    pub suspicious_links: f64,
    pub credential_request: f64,
    pub sender_spoofing: f64,
    pub typosquatting: f64,
    pub poor_formatting: f64,
}

impl ScoreWeights {
    pub fn for_feature(&self, feature: Feature) -> f64 {
        match feature {
            Feature::HasUrgency => self.urgency,
            Feature::HasSuspiciousLinks => self.suspicious_links,
            Feature::HasCredentialRequest => self.credential_request,
            Feature::HasSenderSpoofing => self.sender_spoofing,
            Feature::HasTyposquatting => self.typosquatting,
            Feature::HasPoorFormatting => self.poor_formatting,
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            urgency: 0.20,
            suspicious_links: 0.30,
            credential_request: 0.25,
            sender_spoofing: 0.15,
            typosquatting: 0.25,
            poor_formatting: 0.10,
        }
    }
}

/// Score breakpoints for the discrete risk levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high: 0.7,
            medium: 0.4,
        }
    }
}

/// Structural limits for the poor-formatting signal. Each limit is
/// exclusive: the signal fires when a count exceeds it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FormattingLimits {
    pub exclamation_limit: usize,
    pub dollar_sign_limit: usize,
    pub caps_run_limit: usize,
    pub caps_run_min_len: usize,
}

impl Default for FormattingLimits {
    fn default() -> Self {
        Self {
            exclamation_limit: 3,
            dollar_sign_limit: 2,
            caps_run_limit: 2,
            caps_run_min_len: 4,
        }
    }
}

/// Immutable analyzer configuration: constructed once at process start,
/// read-only thereafter. Reloading requires a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub urgency_phrases: Vec<String>,
    pub credential_phrases: Vec<String>,
    pub suspicious_tlds: Vec<String>,
    pub shortener_domains: Vec<String>,
    pub brand_domains: Vec<String>,
    pub homoglyphs: BTreeMap<char, char>,
    pub max_edit_distance: usize,
    pub weights: ScoreWeights,
    pub thresholds: RiskThresholds,
    pub formatting: FormattingLimits,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            urgency_phrases: to_strings(&[
                "urgent",
                "immediate",
                "action required",
                "account suspended",
                "security alert",
                "unauthorized",
                "verify your account",
                "expire",
                "limited time",
                "click now",
            ]),
            credential_phrases: to_strings(&[
                "password",
                "login",
                "credential",
                "verify",
                "bank account",
                "credit card",
                "social security",
                "ssn",
                "account details",
                "update payment",
                "confirm identity",
                "reset password",
                "security code",
            ]),
            suspicious_tlds: to_strings(&[
                ".tk", ".ml", ".ga", ".cf", ".gq", ".xyz", ".online", ".site", ".top",
                ".bid",
            ]),
            shortener_domains: to_strings(&[
                "bit.ly",
                "tinyurl.com",
                "goo.gl",
                "t.co",
                "ow.ly",
                "is.gd",
                "buff.ly",
                "rebrand.ly",
            ]),
            brand_domains: to_strings(&[
                "paypal.com",
                "amazon.com",
                "google.com",
                "microsoft.com",
                "apple.com",
                "facebook.com",
                "netflix.com",
                "ebay.com",
                "instagram.com",
                "linkedin.com",
                "twitter.com",
                "chase.com",
                "wellsfargo.com",
                "bankofamerica.com",
                "citibank.com",
                "dropbox.com",
                "adobe.com",
                "yahoo.com",
                "outlook.com",
                "dhl.com",
                "fedex.com",
            ]),
            homoglyphs: default_homoglyphs(),
            max_edit_distance: 2,
            weights: ScoreWeights::default(),
            thresholds: RiskThresholds::default(),
            formatting: FormattingLimits::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path))?;
        let config: AnalyzerConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path))?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_yaml::to_string(self).context("failed to serialize config")
    }

    /// Startup validation. Empty detection lists are a degraded-detection
    /// condition, not a fault: the corresponding signal simply never fires.
    /// Returns the warnings so `--test-config` can print them.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.urgency_phrases.is_empty() {
            warnings.push("urgency phrase list is empty; has_urgency will never fire".to_string());
        }
        if self.credential_phrases.is_empty() {
            warnings.push(
                "credential phrase list is empty; has_credential_request will never fire"
                    .to_string(),
            );
        }
        if self.suspicious_tlds.is_empty() {
            warnings.push("suspicious TLD list is empty".to_string());
        }
        if self.shortener_domains.is_empty() {
            warnings.push("shortener domain list is empty".to_string());
        }
        if self.brand_domains.is_empty() {
            warnings.push(
                "brand domain list is empty; typosquatting and sender spoofing will never fire"
                    .to_string(),
            );
        }
        if self.homoglyphs.is_empty() {
            warnings.push("homoglyph map is empty; homoglyph detection will never fire".to_string());
        }

        let mut seen = std::collections::BTreeSet::new();
        for domain in &self.brand_domains {
            if !seen.insert(domain.to_lowercase()) {
                warnings.push(format!("duplicate brand domain: {}", domain));
            }
        }

        for warning in &warnings {
            log::warn!("config: {}", warning);
        }

        warnings
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Visually-confusable characters mapped to their canonical Latin
/// equivalents. Membership in this map is what the domain analyzer tests;
/// the canonical value documents what the character imitates.
fn default_homoglyphs() -> BTreeMap<char, char> {
    let pairs: &[(char, char)] = &[
        // Cyrillic lookalikes
        ('а', 'a'),
        ('е', 'e'),
        ('о', 'o'),
        ('р', 'p'),
        ('с', 'c'),
        ('х', 'x'),
        ('у', 'y'),
        ('і', 'i'),
        ('ѕ', 's'),
        ('ԁ', 'd'),
        ('ј', 'j'),
        ('һ', 'h'),
        // Greek lookalikes
        ('ο', 'o'),
        ('α', 'a'),
        ('ι', 'i'),
        ('ν', 'v'),
        ('τ', 't'),
        // Latin-adjacent confusables
        ('ℓ', 'l'),
        ('ɡ', 'g'),
        ('ı', 'i'),
    ];
    pairs.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_empty());
        assert!(!config.brand_domains.is_empty());
        assert!(!config.homoglyphs.is_empty());
        assert_eq!(config.max_edit_distance, 2);
    }

    #[test]
    fn test_empty_lists_warn_but_do_not_fail() {
        let config = AnalyzerConfig {
            brand_domains: Vec::new(),
            homoglyphs: BTreeMap::new(),
            ..Default::default()
        };
        let warnings = config.validate();
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_duplicate_brand_domains_warn() {
        let mut config = AnalyzerConfig::default();
        config.brand_domains.push("PayPal.com".to_string());
        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("duplicate")));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = AnalyzerConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed: AnalyzerConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.suspicious_tlds, config.suspicious_tlds);
        assert_eq!(parsed.homoglyphs, config.homoglyphs);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let parsed: AnalyzerConfig = serde_yaml::from_str("max_edit_distance: 1\n").unwrap();
        assert_eq!(parsed.max_edit_distance, 1);
        assert_eq!(parsed.brand_domains, AnalyzerConfig::default().brand_domains);
    }
}
