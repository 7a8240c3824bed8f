use crate::config::AnalyzerConfig;
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoofMatch {
    pub display_name: String,
    pub address: String,
    pub brand: String,
}

/// Detects `"Display Name" <user@domain>` pairs where the display name
/// claims a known brand but the address domain does not carry it. Purely
/// syntactic; no header parsing or DKIM/SPF validation.
pub struct SenderSpoofChecker {
    pattern: Regex,
    brand_tokens: Vec<String>,
}

impl SenderSpoofChecker {
    pub fn new(config: &AnalyzerConfig) -> Self {
        // Brand token is the reference domain up to its first dot:
        // "paypal.com" -> "paypal".
        let brand_tokens = config
            .brand_domains
            .iter()
            .filter_map(|d| d.split('.').next())
            .map(|t| t.to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        Self {
            pattern: Regex::new(r#""([^"]+)"\s*<([^<>\s@]+@[^<>\s]+)>"#).unwrap(),
            brand_tokens,
        }
    }

    /// First display-name/address pair whose name references a brand the
    /// address domain lacks, in text order.
    pub fn check(&self, text: &str) -> Option<SpoofMatch> {
        for cap in self.pattern.captures_iter(text) {
            let display_name = cap[1].to_lowercase();
            let address = cap[2].to_lowercase();
            let domain = address.split('@').nth(1).unwrap_or("");

            for brand in &self.brand_tokens {
                if display_name.contains(brand.as_str()) && !domain.contains(brand.as_str()) {
                    return Some(SpoofMatch {
                        display_name: cap[1].to_string(),
                        address: cap[2].to_string(),
                        brand: brand.clone(),
                    });
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> SenderSpoofChecker {
        SenderSpoofChecker::new(&AnalyzerConfig::default())
    }

    #[test]
    fn test_brand_name_with_foreign_domain_flags() {
        let m = checker()
            .check(r#"From: "PayPal Support" <support@secure-pay.tk>"#)
            .expect("should flag");
        assert_eq!(m.brand, "paypal");
        assert_eq!(m.address, "support@secure-pay.tk");
    }

    #[test]
    fn test_brand_name_with_matching_domain_is_clean() {
        assert!(checker()
            .check(r#""PayPal" <service@paypal.com>"#)
            .is_none());
        // Subdomains of the brand still carry the token
        assert!(checker()
            .check(r#""Amazon Orders" <orders@mail.amazon.com>"#)
            .is_none());
    }

    #[test]
    fn test_no_brand_reference_is_clean() {
        assert!(checker()
            .check(r#""Alice Smith" <alice@example.org>"#)
            .is_none());
    }

    #[test]
    fn test_plain_text_without_sender_pattern_is_clean() {
        assert!(checker().check("paypal mentioned with no sender").is_none());
    }

    #[test]
    fn test_case_insensitive_brand_match() {
        assert!(checker()
            .check(r#""APPLE ID Locked" <help@account-fix.xyz>"#)
            .is_some());
    }

    #[test]
    fn test_empty_brand_list_never_flags() {
        let config = AnalyzerConfig {
            brand_domains: Vec::new(),
            ..Default::default()
        };
        let checker = SenderSpoofChecker::new(&config);
        assert!(checker
            .check(r#""PayPal" <support@evil.tk>"#)
            .is_none());
    }
}
