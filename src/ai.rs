use crate::config::RiskThresholds;
use crate::features::{RiskAssessment, RiskLevel};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Structured opinion returned by the external AI collaborator. Entirely
/// optional: the rule-based result never depends on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiOpinion {
    pub risk_level: RiskLevel,
    pub confidence_score: f64,
    #[serde(default)]
    pub detailed_analysis: String,
    #[serde(default)]
    pub suspicious_elements: SuspiciousElements,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuspiciousElements {
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub urgent_phrases: Vec<String>,
    #[serde(default)]
    pub ai_flags: Vec<String>,
}

/// Client for a Gemini-style generateContent endpoint. The model is asked
/// for a JSON document matching [`AiOpinion`]; anything malformed, late, or
/// missing surfaces as an error the caller degrades from.
pub struct AiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl AiClient {
    pub fn new(endpoint: String, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, endpoint })
    }

    pub async fn analyze(&self, text: &str) -> anyhow::Result<AiOpinion> {
        let body = serde_json::json!({
            "contents": [{
                "parts": [{ "text": build_prompt(text) }]
            }]
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context("AI request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("AI endpoint returned {}", status));
        }

        let payload: serde_json::Value =
            response.json().await.context("AI response was not JSON")?;
        parse_response(&payload)
    }
}

fn build_prompt(text: &str) -> String {
    format!(
        "You are a phishing detection assistant. Analyze the following message \
         and respond with a single JSON object with fields: risk_level (one of \
         \"low\", \"medium\", \"high\"), confidence_score (0.0 to 1.0), \
         detailed_analysis (string), and suspicious_elements (object with \
         string arrays urls, urgent_phrases, ai_flags). Respond with JSON \
         only, no prose.\n\nMessage:\n{}",
        text
    )
}

/// Pulls the model text out of the generateContent envelope and parses the
/// JSON it should contain. Models like wrapping answers in code fences, so
/// those are stripped first.
fn parse_response(payload: &serde_json::Value) -> anyhow::Result<AiOpinion> {
    let text = payload
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow!("AI response missing candidate text"))?;

    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let opinion: AiOpinion =
        serde_json::from_str(trimmed).context("AI candidate text was not valid opinion JSON")?;

    if !(0.0..=1.0).contains(&opinion.confidence_score) {
        return Err(anyhow!(
            "AI confidence_score out of range: {}",
            opinion.confidence_score
        ));
    }

    Ok(opinion)
}

/// Service-layer fusion policy: take the maximum of the rule-based score and
/// the AI opinion's effective score, so the deterministic signal is never
/// suppressed. The AI contributes its full confidence only when it calls the
/// message high risk.
pub fn fuse(
    rule: &RiskAssessment,
    opinion: Option<&AiOpinion>,
    thresholds: &RiskThresholds,
) -> (f64, RiskLevel) {
    let ai_score = match opinion {
        Some(op) => match op.risk_level {
            RiskLevel::High => op.confidence_score,
            RiskLevel::Medium => op.confidence_score * 0.5,
            RiskLevel::Low => 0.0,
        },
        None => 0.0,
    };

    let score = rule.score.max(ai_score).min(1.0);
    let level = if score >= thresholds.high {
        RiskLevel::High
    } else if score >= thresholds.medium {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };
    (score, level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureSet;

    fn rule_assessment(score: f64, level: RiskLevel) -> RiskAssessment {
        RiskAssessment {
            features: FeatureSet::new(),
            score,
            level,
            url_reports: Vec::new(),
        }
    }

    fn envelope(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }] }
            }]
        })
    }

    #[test]
    fn test_parse_plain_json_opinion() {
        let payload = envelope(
            r#"{"risk_level":"high","confidence_score":0.9,"detailed_analysis":"credential lure"}"#,
        );
        let opinion = parse_response(&payload).unwrap();
        assert_eq!(opinion.risk_level, RiskLevel::High);
        assert!((opinion.confidence_score - 0.9).abs() < 1e-9);
        assert!(opinion.suspicious_elements.urls.is_empty());
    }

    #[test]
    fn test_parse_fenced_json_opinion() {
        let payload = envelope(
            "```json\n{\"risk_level\":\"medium\",\"confidence_score\":0.6}\n```",
        );
        let opinion = parse_response(&payload).unwrap();
        assert_eq!(opinion.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_response(&envelope("I think it is phishing.")).is_err());
        assert!(parse_response(&serde_json::json!({"candidates": []})).is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range_confidence() {
        let payload = envelope(r#"{"risk_level":"high","confidence_score":7.5}"#);
        assert!(parse_response(&payload).is_err());
    }

    #[test]
    fn test_fuse_without_opinion_keeps_rule_result() {
        let rule = rule_assessment(0.45, RiskLevel::Medium);
        let (score, level) = fuse(&rule, None, &RiskThresholds::default());
        assert_eq!(score, 0.45);
        assert_eq!(level, RiskLevel::Medium);
    }

    #[test]
    fn test_fuse_takes_maximum() {
        let rule = rule_assessment(0.3, RiskLevel::Low);
        let opinion = AiOpinion {
            risk_level: RiskLevel::High,
            confidence_score: 0.85,
            detailed_analysis: String::new(),
            suspicious_elements: SuspiciousElements::default(),
        };
        let (score, level) = fuse(&rule, Some(&opinion), &RiskThresholds::default());
        assert_eq!(score, 0.85);
        assert_eq!(level, RiskLevel::High);
    }

    #[test]
    fn test_fuse_never_lowers_rule_score() {
        let rule = rule_assessment(0.75, RiskLevel::High);
        let opinion = AiOpinion {
            risk_level: RiskLevel::Low,
            confidence_score: 0.95,
            detailed_analysis: String::new(),
            suspicious_elements: SuspiciousElements::default(),
        };
        let (score, level) = fuse(&rule, Some(&opinion), &RiskThresholds::default());
        assert_eq!(score, 0.75);
        assert_eq!(level, RiskLevel::High);
    }
}
