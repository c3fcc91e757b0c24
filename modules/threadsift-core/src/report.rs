//! Structured summarization: send the mode prompt plus corpus, then apply
//! the two-step extract-then-parse contract to the free-form response.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use ai_client::util::extract_json_object;
use ai_client::Completion;
use threadsift_common::TaskError;

use crate::mode::ModeProfile;

// --- Response schema ---

/// One-sentence verdict plus supporting findings. Models occasionally
/// ignore the object requirement and return a bare string; that shape is
/// tolerated rather than treated as malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecutiveSummary {
    Structured {
        #[serde(rename = "overallSentiment", default)]
        overall_sentiment: String,
        #[serde(rename = "keyFindings", default)]
        key_findings: Vec<String>,
    },
    Plain(String),
}

impl Default for ExecutiveSummary {
    fn default() -> Self {
        ExecutiveSummary::Plain(String::new())
    }
}

/// One ranked finding: a pain point or a discussion topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "usageScenario", default)]
    pub usage_scenario: Option<String>,
    #[serde(default)]
    pub count: u32,
}

/// Chart-ready aggregate the renderer feeds straight into Chart.js.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub data: Vec<f64>,
    #[serde(default)]
    pub colors: Vec<String>,
}

/// A representative comment cross-referenced to its finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentExemplar {
    #[serde(rename = "painPointTitle", alias = "associatedTopic", default)]
    pub finding_title: Option<String>,
    #[serde(rename = "commentTranslation", default)]
    pub quote: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub replies: i64,
    #[serde(default)]
    pub permalink: Option<String>,
}

/// The structured result of one summarization call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(rename = "executiveSummary", default)]
    pub executive_summary: ExecutiveSummary,
    #[serde(
        rename = "identifiedPainPoints",
        alias = "keyDiscussionTopics",
        default
    )]
    pub findings: Vec<Finding>,
    #[serde(rename = "chartData", default)]
    pub chart_data: ChartData,
    #[serde(rename = "commentExamples", default)]
    pub comment_examples: Vec<CommentExemplar>,
}

// --- Summarization call ---

/// Extract the first balanced `{...}` region from the response and parse it
/// as the mode schema. Either step failing is the fatal malformed-response
/// error: no retry, no partial report.
pub async fn summarize(
    ai: &dyn Completion,
    profile: &ModeProfile,
    keyword: &str,
    corpus: &str,
) -> Result<AnalysisReport, TaskError> {
    let prompt = profile.analysis_prompt(keyword, corpus);
    let response = ai
        .complete(&prompt)
        .await
        .map_err(|e| TaskError::Ai(e.to_string()))?;

    let region = match extract_json_object(&response) {
        Some(region) => region,
        None => {
            error!(response_len = response.len(), "AI response contained no JSON region");
            return Err(TaskError::MalformedResponse);
        }
    };

    match serde_json::from_str::<AnalysisReport>(region) {
        Ok(report) => {
            info!(
                findings = report.findings.len(),
                exemplars = report.comment_examples.len(),
                "Analysis parsed"
            );
            Ok(report)
        }
        Err(e) => {
            error!(error = %e, "AI JSON region did not match the analysis schema");
            Err(TaskError::MalformedResponse)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pain_point_schema() {
        let json = r##"{
            "executiveSummary": { "overallSentiment": "Units are noisy.", "keyFindings": ["noise", "price"] },
            "identifiedPainPoints": [
                { "title": "Noise", "usageScenario": "night use", "description": "too loud", "count": 12 }
            ],
            "chartData": { "labels": ["Noise"], "data": [12], "colors": ["#D2B48C"] },
            "commentExamples": [
                { "painPointTitle": "Noise", "commentTranslation": "It hums all night.", "score": 40, "replies": 3, "permalink": "https://x" }
            ]
        }"##;
        let report: AnalysisReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].count, 12);
        assert_eq!(
            report.comment_examples[0].finding_title.as_deref(),
            Some("Noise")
        );
        match report.executive_summary {
            ExecutiveSummary::Structured { ref key_findings, .. } => {
                assert_eq!(key_findings.len(), 2)
            }
            _ => panic!("expected structured summary"),
        }
    }

    #[test]
    fn parses_hot_topic_schema_via_aliases() {
        let json = r##"{
            "executiveSummary": "Plain string summary.",
            "keyDiscussionTopics": [ { "title": "Pricing", "description": "split views", "count": 8 } ],
            "commentExamples": [ { "associatedTopic": "Pricing", "commentTranslation": "Worth it.", "score": 2, "replies": 0 } ]
        }"##;
        let report: AnalysisReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].title, "Pricing");
        assert_eq!(
            report.comment_examples[0].finding_title.as_deref(),
            Some("Pricing")
        );
        assert!(matches!(
            report.executive_summary,
            ExecutiveSummary::Plain(_)
        ));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let report: AnalysisReport = serde_json::from_str("{}").unwrap();
        assert!(report.findings.is_empty());
        assert!(report.chart_data.labels.is_empty());
        assert!(report.comment_examples.is_empty());
    }
}
