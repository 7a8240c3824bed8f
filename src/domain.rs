use crate::config::AnalyzerConfig;
use crate::features::UrlReport;
use crate::urls::DiscoveredUrl;
use std::collections::BTreeMap;

/// Syntactic per-URL risk checks. Every check runs independently and no
/// check short-circuits the others, so a single URL can accumulate several
/// reasons. No network I/O: the analysis is on the literal URL string only.
pub struct DomainAnalyzer {
    suspicious_tlds: Vec<String>,
    shortener_domains: Vec<String>,
    homoglyphs: BTreeMap<char, char>,
}

impl DomainAnalyzer {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            suspicious_tlds: config
                .suspicious_tlds
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
            shortener_domains: config
                .shortener_domains
                .iter()
                .map(|s| s.to_lowercase())
                .collect(),
            homoglyphs: config.homoglyphs.clone(),
        }
    }

    pub fn check_url(&self, url: &DiscoveredUrl) -> UrlReport {
        let mut reasons = Vec::new();

        match &url.parts {
            // Unparsable URL-like text is suspicious by policy, never an error.
            None => reasons.push("unparsable URL (fail-closed)".to_string()),
            Some(parts) => {
                let host = parts.normalized_host.as_str();

                for tld in &self.suspicious_tlds {
                    if host.ends_with(tld.as_str()) {
                        reasons.push(format!("suspicious TLD: {}", tld));
                        break;
                    }
                }

                if is_ipv4_literal(host) {
                    reasons.push("literal IPv4 host".to_string());
                }

                if parts.explicit_port && parts.port != 80 && parts.port != 443 {
                    reasons.push(format!("non-standard port: {}", parts.port));
                }

                for shortener in &self.shortener_domains {
                    if host.contains(shortener.as_str()) {
                        reasons.push(format!("URL shortener: {}", shortener));
                        break;
                    }
                }

                let confusables: Vec<char> = parts
                    .literal_host
                    .chars()
                    .filter(|c| self.homoglyphs.contains_key(c))
                    .collect();
                if !confusables.is_empty() {
                    reasons.push(format!(
                        "homoglyph characters in host: {}",
                        confusables.iter().collect::<String>()
                    ));
                }
            }
        }

        UrlReport {
            url: url.raw.clone(),
            suspicious: !reasons.is_empty(),
            reasons,
        }
    }
}

/// Dotted-quad textual pattern: four dot-separated runs of 1-3 digits.
/// Deliberately textual rather than a real address parse; phishing URLs use
/// the shape, not necessarily a valid address.
fn is_ipv4_literal(host: &str) -> bool {
    let octets: Vec<&str> = host.split('.').collect();
    octets.len() == 4
        && octets
            .iter()
            .all(|o| !o.is_empty() && o.len() <= 3 && o.chars().all(|c| c.is_ascii_digit()))
}
