use crate::config::AnalyzerConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TyposquatMatch {
    pub candidate: String,
    pub reference: String,
    pub distance: usize,
}

/// Flags candidate hosts within a small edit distance of a known brand
/// domain. Enumeration follows the configured list order, so results are
/// deterministic: the first reference inside the threshold wins.
pub struct TyposquatDetector {
    references: Vec<String>,
    max_distance: usize,
}

impl TyposquatDetector {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            references: config
                .brand_domains
                .iter()
                .map(|d| canonicalize(d))
                .collect(),
            max_distance: config.max_edit_distance,
        }
    }

    /// `host` is compared in canonical form (lower-cased, "www." stripped)
    /// against every reference. Distance 0 is a legitimate exact match and
    /// is never flagged.
    pub fn check(&self, host: &str) -> Option<TyposquatMatch> {
        let candidate = canonicalize(host);

        for reference in &self.references {
            let distance = edit_distance(&candidate, reference);
            if distance == 0 {
                return None;
            }
            if distance <= self.max_distance {
                return Some(TyposquatMatch {
                    candidate,
                    reference: reference.clone(),
                    distance,
                });
            }
        }

        None
    }
}

fn canonicalize(domain: &str) -> String {
    let lower = domain.to_lowercase();
    lower
        .strip_prefix("www.")
        .unwrap_or(lower.as_str())
        .to_string()
}

/// Classic single-character-edit distance (insert, delete, substitute each
/// cost 1), iterative with two rolling rows sized by the shorter string.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (short, long) = if a_chars.len() <= b_chars.len() {
        (&a_chars, &b_chars)
    } else {
        (&b_chars, &a_chars)
    };

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0usize; short.len() + 1];

    for (i, long_ch) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, short_ch) in short.iter().enumerate() {
            let substitution = prev[j] + usize::from(long_ch != short_ch);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> TyposquatDetector {
        TyposquatDetector::new(&AnalyzerConfig::default())
    }

    #[test]
    fn test_edit_distance_basics() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", "abc"), 0);
        assert_eq!(edit_distance("paypa1.com", "paypal.com"), 1);
        assert_eq!(edit_distance("amaz0n.com", "amazon.com"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_edit_distance_is_symmetric() {
        assert_eq!(
            edit_distance("paypal.com", "paypa1.com"),
            edit_distance("paypa1.com", "paypal.com")
        );
    }

    #[test]
    fn test_near_miss_flags() {
        let m = detector().check("paypa1.com").expect("should flag");
        assert_eq!(m.reference, "paypal.com");
        assert_eq!(m.distance, 1);
    }

    #[test]
    fn test_exact_match_is_exempt() {
        assert!(detector().check("paypal.com").is_none());
        assert!(detector().check("www.paypal.com").is_none());
        assert!(detector().check("PayPal.com").is_none());
    }

    #[test]
    fn test_distant_domains_do_not_flag() {
        assert!(detector().check("example.com").is_none());
        assert!(detector().check("completely-unrelated.org").is_none());
    }

    #[test]
    fn test_www_prefix_stripped_before_comparison() {
        let m = detector().check("www.paypa1.com").expect("should flag");
        assert_eq!(m.candidate, "paypa1.com");
        assert_eq!(m.distance, 1);
    }

    #[test]
    fn test_distance_two_flags() {
        let m = detector().check("payypal.co").expect("should flag");
        assert_eq!(m.reference, "paypal.com");
        assert_eq!(m.distance, 2);
    }

    #[test]
    fn test_empty_reference_list_never_flags() {
        let config = AnalyzerConfig {
            brand_domains: Vec::new(),
            ..Default::default()
        };
        let detector = TyposquatDetector::new(&config);
        assert!(detector.check("paypa1.com").is_none());
    }
}
