pub mod ai;
pub mod analyzer;
pub mod config;
pub mod domain;
pub mod features;
pub mod lexical;
pub mod report;
pub mod score;
pub mod sender;
pub mod typosquat;
pub mod urls;

pub use analyzer::PhishingAnalyzer;
pub use config::AnalyzerConfig;
pub use features::{Feature, FeatureSet, RiskAssessment, RiskLevel, UrlReport};
pub use urls::{DiscoveredUrl, UrlExtractor};
