use regex::Regex;
use url::Url;

/// Host and port details parsed out of a discovered URL-like substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    pub scheme: String,
    pub host: String,
    /// Explicit port, or the scheme default when none was written.
    pub port: u16,
    pub explicit_port: bool,
    /// Lower-cased host with any leading "www." stripped.
    pub normalized_host: String,
    /// Host exactly as written in the text. The parsed `host` is IDNA
    /// punycode for non-ASCII names; homoglyph detection needs the literal
    /// characters.
    pub literal_host: String,
}

/// Immutable value created per regex match during extraction. `parts` is
/// `None` when the substring looked like a URL but would not parse; the
/// domain analyzer treats that as suspicious rather than skipping it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredUrl {
    pub raw: String,
    pub parts: Option<UrlParts>,
}

impl DiscoveredUrl {
    pub fn parse(raw: &str) -> Self {
        // Shortener matches carry no scheme; assume http for parsing.
        let candidate = if raw.contains("://") {
            raw.to_string()
        } else {
            format!("http://{}", raw)
        };

        let parts = match Url::parse(&candidate) {
            Ok(parsed) => parsed.host_str().map(|host| {
                let scheme = parsed.scheme().to_string();
                let explicit_port = parsed.port().is_some();
                let default_port = if scheme == "https" { 443 } else { 80 };
                let host = host.to_lowercase();
                let normalized_host = host
                    .strip_prefix("www.")
                    .unwrap_or(host.as_str())
                    .to_string();
                UrlParts {
                    port: parsed.port().unwrap_or(default_port),
                    scheme,
                    host,
                    explicit_port,
                    normalized_host,
                    literal_host: literal_host(&candidate),
                }
            }),
            Err(_) => None,
        };

        Self {
            raw: raw.to_string(),
            parts,
        }
    }
}

/// Regex-based discovery of URL-like substrings in free text. The pattern is
/// permissive on purpose: phishing content often carries obfuscated or
/// broken links, and over-matching feeds the fail-closed path downstream.
pub struct UrlExtractor {
    pattern: Regex,
}

impl UrlExtractor {
    /// `shorteners` are known shortener hosts matched without requiring a
    /// scheme (e.g. a bare "bit.ly/x" in the text still counts).
    pub fn new(shorteners: &[String]) -> Self {
        // The tail is `*`, not `+`: a bare scheme with nothing after it is
        // still a match, and feeds the fail-closed path downstream.
        let mut pattern = String::from(r#"https?://[^\s<>"']*"#);
        if !shorteners.is_empty() {
            let hosts: Vec<String> = shorteners.iter().map(|s| regex::escape(s)).collect();
            pattern.push_str(&format!(r#"|(?:{})/[^\s<>"']*"#, hosts.join("|")));
        }
        Self {
            pattern: Regex::new(&pattern).unwrap(),
        }
    }

    /// Lazy, finite, restartable sequence: the same text always yields the
    /// same matches in the same order.
    pub fn iter<'a>(&'a self, text: &'a str) -> impl Iterator<Item = DiscoveredUrl> + 'a {
        self.pattern
            .find_iter(text)
            .map(|m| DiscoveredUrl::parse(trim_trailing_punctuation(m.as_str())))
    }

    pub fn extract(&self, text: &str) -> Vec<DiscoveredUrl> {
        self.iter(text).collect()
    }
}

/// The permissive pattern swallows sentence punctuation glued to the link.
fn trim_trailing_punctuation(raw: &str) -> &str {
    raw.trim_end_matches(['.', ',', ';', ':', '!', '?', ')'])
}

/// Host portion of the URL as literally written, lower-cased but without
/// IDNA conversion.
fn literal_host(candidate: &str) -> String {
    let after_scheme = candidate.split("://").nth(1).unwrap_or(candidate);
    let end = after_scheme
        .find(['/', '?', '#'])
        .unwrap_or(after_scheme.len());
    let authority = &after_scheme[..end];
    let host = authority.rsplit('@').next().unwrap_or(authority);
    host.split(':').next().unwrap_or(host).to_lowercase()
}
