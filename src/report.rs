use crate::features::{RiskAssessment, RiskLevel, UrlReport};
use std::fmt::Write;

/// Presentation layer: renders human-readable text from the structured
/// result. Nothing here feeds back into scoring.

pub fn risk_summary(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => {
            "HIGH RISK - This message shows strong indicators of being a phishing attempt."
        }
        RiskLevel::Medium => "MEDIUM RISK - This message shows some suspicious characteristics.",
        RiskLevel::Low => "LOW RISK - This message shows few or no suspicious characteristics.",
    }
}

pub fn render_report(assessment: &RiskAssessment) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Phishing Analysis Report");
    let _ = writeln!(out, "Overall Risk Score: {:.2}/1.00", assessment.score);
    let _ = writeln!(out);
    let _ = writeln!(out, "--- Detected Features ---");

    for (feature, present) in assessment.features.iter() {
        let _ = writeln!(
            out,
            "[{}] {}: {}",
            if present { "!" } else { " " },
            feature,
            if present { "yes" } else { "no" }
        );
    }

    if !assessment.url_reports.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "--- Links ---");
        for report in &assessment.url_reports {
            append_link_line(&mut out, report);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "--- Risk Level ---");
    let _ = writeln!(out, "{}", risk_summary(assessment.level));
    out
}

/// Brief verdict keyed off how many features fired, not the weighted score.
pub fn render_quick_check(assessment: &RiskAssessment) -> String {
    match assessment.features.count_present() {
        n if n >= 3 => {
            "High likelihood of phishing. Exercise extreme caution and do not interact."
                .to_string()
        }
        n if n >= 1 => {
            "Some suspicious elements detected. Review carefully before proceeding.".to_string()
        }
        _ => "Low risk - few or no suspicious elements detected.".to_string(),
    }
}

pub fn render_link_report(reports: &[UrlReport]) -> String {
    if reports.is_empty() {
        return "No links found in the provided text.\n".to_string();
    }

    let mut out = String::from("Link Analysis Report\n");
    for report in reports {
        append_link_line(&mut out, report);
    }
    out
}

fn append_link_line(out: &mut String, report: &UrlReport) {
    if report.suspicious {
        let _ = writeln!(
            out,
            "suspicious: {} ({})",
            report.url,
            report.reasons.join(", ")
        );
    } else {
        let _ = writeln!(out, "clean:      {}", report.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::PhishingAnalyzer;
    use crate::config::AnalyzerConfig;

    fn assessment_for(text: &str) -> RiskAssessment {
        PhishingAnalyzer::new(AnalyzerConfig::default()).assess(text)
    }

    #[test]
    fn test_report_lists_every_feature() {
        let report = render_report(&assessment_for("nothing suspicious here"));
        assert!(report.contains("has_urgency"));
        assert!(report.contains("has_suspicious_links"));
        assert!(report.contains("has_credential_request"));
        assert!(report.contains("has_sender_spoofing"));
        assert!(report.contains("has_typosquatting"));
        assert!(report.contains("has_poor_formatting"));
        assert!(report.contains("LOW RISK"));
    }

    #[test]
    fn test_report_shows_high_risk() {
        let report = render_report(&assessment_for(
            "urgent action required http://secure-login.xyz enter your password",
        ));
        assert!(report.contains("HIGH RISK"));
        assert!(report.contains("suspicious: http://secure-login.xyz"));
    }

    #[test]
    fn test_quick_check_tiers() {
        let high = assessment_for("urgent: verify your password at http://evil.tk/x");
        assert!(render_quick_check(&high).contains("High likelihood"));

        let some = assessment_for("please update payment records");
        assert!(render_quick_check(&some).contains("Some suspicious"));

        let clean = assessment_for("lunch at noon?");
        assert!(render_quick_check(&clean).contains("Low risk"));
    }

    #[test]
    fn test_link_report_empty() {
        assert!(render_link_report(&[]).contains("No links found"));
    }
}
