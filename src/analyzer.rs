use crate::config::AnalyzerConfig;
use crate::domain::DomainAnalyzer;
use crate::features::{Feature, FeatureSet, RiskAssessment, UrlReport};
use crate::lexical::LexicalMatcher;
use crate::score::ScoreAggregator;
use crate::sender::SenderSpoofChecker;
use crate::typosquat::{TyposquatDetector, TyposquatMatch};
use crate::urls::{DiscoveredUrl, UrlExtractor};

/// Stateless rule-based analysis engine. Owns the immutable configuration
/// and the detectors built from it; every call only reads shared state and
/// allocates its own working data, so concurrent use needs no coordination.
pub struct PhishingAnalyzer {
    config: AnalyzerConfig,
    lexical: LexicalMatcher,
    extractor: UrlExtractor,
    domains: DomainAnalyzer,
    typosquat: TyposquatDetector,
    sender: SenderSpoofChecker,
    aggregator: ScoreAggregator,
}

impl PhishingAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        config.validate();
        Self {
            lexical: LexicalMatcher::new(&config),
            extractor: UrlExtractor::new(&config.shortener_domains),
            domains: DomainAnalyzer::new(&config),
            typosquat: TyposquatDetector::new(&config),
            sender: SenderSpoofChecker::new(&config),
            aggregator: ScoreAggregator::new(config.weights, config.thresholds),
            config,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Populates every known feature key exactly once. Pure and
    /// deterministic: identical text yields an identical set.
    pub fn extract_features(&self, text: &str) -> FeatureSet {
        let text_lower = text.to_lowercase();
        let discovered = self.extractor.extract(text);

        let mut features = FeatureSet::new();
        features.set(Feature::HasUrgency, self.lexical.has_urgency(&text_lower));
        features.set(
            Feature::HasCredentialRequest,
            self.lexical.has_credential_request(&text_lower),
        );
        features.set(
            Feature::HasPoorFormatting,
            self.lexical
                .has_poor_formatting(text, &text_lower, discovered.len()),
        );

        let mut suspicious_links = false;
        let mut typosquatting = false;
        for url in &discovered {
            let (report, typo) = self.inspect_url(url);
            if report.suspicious {
                suspicious_links = true;
                log::debug!("suspicious URL {}: {}", report.url, report.reasons.join(", "));
            }
            if typo.is_some() {
                typosquatting = true;
            }
        }
        features.set(Feature::HasSuspiciousLinks, suspicious_links);
        features.set(Feature::HasTyposquatting, typosquatting);

        let spoof = self.sender.check(text);
        if let Some(m) = &spoof {
            log::debug!(
                "sender spoofing: \"{}\" <{}> references {}",
                m.display_name,
                m.address,
                m.brand
            );
        }
        features.set(Feature::HasSenderSpoofing, spoof.is_some());

        features
    }

    /// Per-URL reports in discovery order; empty when the text has no
    /// URL-like substrings.
    pub fn analyze_urls(&self, text: &str) -> Vec<UrlReport> {
        self.extractor
            .iter(text)
            .map(|url| self.inspect_url(&url).0)
            .collect()
    }

    /// Score a feature set with the configured weights and breakpoints.
    pub fn score_features(&self, features: &FeatureSet) -> (f64, crate::features::RiskLevel) {
        self.aggregator.score(features)
    }

    /// Full rule-based assessment of one text.
    pub fn assess(&self, text: &str) -> RiskAssessment {
        let features = self.extract_features(text);
        let url_reports = self.analyze_urls(text);
        let (score, level) = self.aggregator.score(&features);

        log::info!(
            "assessment: score={:.2} level={} features={}",
            score,
            level,
            features.count_present()
        );

        RiskAssessment {
            features,
            score,
            level,
            url_reports,
        }
    }

    /// Domain checks plus the typosquatting comparison for one URL. A
    /// typosquat hit also marks the URL itself suspicious.
    fn inspect_url(&self, url: &DiscoveredUrl) -> (UrlReport, Option<TyposquatMatch>) {
        let mut report = self.domains.check_url(url);

        let typo = url
            .parts
            .as_ref()
            .and_then(|parts| self.typosquat.check(&parts.normalized_host));
        if let Some(m) = &typo {
            report.suspicious = true;
            report.reasons.push(format!(
                "resembles {} (edit distance {})",
                m.reference, m.distance
            ));
        }

        (report, typo)
    }
}
