use crate::config::{AnalyzerConfig, FormattingLimits};
use regex::Regex;

/// Keyword and structural checks over the raw text. Matching is
/// case-insensitive raw substring containment, not word-boundary matching:
/// a hit anywhere in the text counts. That is deliberately coarse; word
/// tokenization would silently reduce recall.
pub struct LexicalMatcher {
    urgency_phrases: Vec<String>,
    credential_phrases: Vec<String>,
    limits: FormattingLimits,
    caps_run: Regex,
}

impl LexicalMatcher {
    pub fn new(config: &AnalyzerConfig) -> Self {
        let limits = config.formatting;
        Self {
            urgency_phrases: lowercased(&config.urgency_phrases),
            credential_phrases: lowercased(&config.credential_phrases),
            limits,
            caps_run: Regex::new(&format!("[A-Z]{{{},}}", limits.caps_run_min_len)).unwrap(),
        }
    }

    /// `text_lower` is the full input already lower-cased by the caller.
    pub fn has_urgency(&self, text_lower: &str) -> bool {
        self.urgency_phrases
            .iter()
            .any(|phrase| text_lower.contains(phrase.as_str()))
    }

    pub fn has_credential_request(&self, text_lower: &str) -> bool {
        self.credential_phrases
            .iter()
            .any(|phrase| text_lower.contains(phrase.as_str()))
    }

    /// Structural sloppiness indicators. `url_count` is the number of URLs
    /// discovered elsewhere in the text; "click here" with no link at all is
    /// its own tell.
    pub fn has_poor_formatting(&self, text: &str, text_lower: &str, url_count: usize) -> bool {
        let exclamations = text.matches('!').count();
        let dollar_signs = text.matches('$').count();
        let caps_runs = self.caps_run.find_iter(text).count();

        exclamations > self.limits.exclamation_limit
            || dollar_signs > self.limits.dollar_sign_limit
            || caps_runs > self.limits.caps_run_limit
            || (text_lower.contains("click here") && url_count == 0)
            || text_lower.matches("kindly").count() > 1
    }
}

fn lowercased(phrases: &[String]) -> Vec<String> {
    phrases.iter().map(|p| p.to_lowercase()).collect()
}
