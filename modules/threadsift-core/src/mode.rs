//! Everything that varies with the analysis mode, in one place.
//!
//! The mode is chosen once at task start; the profile carries the search
//! query strategy, the response schema the model is held to, and the
//! report headings together, so the rest of the pipeline never branches
//! on the mode itself.

use threadsift_common::{AnalysisMode, SortOrder};

/// Marker phrases appended to the keyword when digging for complaints.
const PAIN_POINT_MARKERS: &[&str] = &[
    "problem",
    "issue",
    "recommendation",
    "help",
    "question",
    "advice",
    "frustrated",
    "annoying",
    "wish",
    "sucks",
    "broken",
    "how to",
    "alternative",
    "fix",
    "solution",
    "nightmare",
    "disappointed",
];

#[derive(Debug, Clone, Copy)]
pub struct ModeProfile {
    pub mode: AnalysisMode,
    /// JSON key the model puts its ranked findings under.
    pub findings_key: &'static str,
    /// JSON key inside each comment exemplar that names its finding.
    pub exemplar_key: &'static str,
    pub report_title: &'static str,
    pub findings_heading: &'static str,
    pub chart_heading: &'static str,
    pub exemplar_prefix: &'static str,
}

const PAIN_POINTS: ModeProfile = ModeProfile {
    mode: AnalysisMode::PainPoints,
    findings_key: "identifiedPainPoints",
    exemplar_key: "painPointTitle",
    report_title: "user pain point analysis",
    findings_heading: "Core user pain points",
    chart_heading: "Pain point frequency",
    exemplar_prefix: "Pain point: ",
};

const HOT_TOPICS: ModeProfile = ModeProfile {
    mode: AnalysisMode::HotTopics,
    findings_key: "keyDiscussionTopics",
    exemplar_key: "associatedTopic",
    report_title: "discussion hot-topic analysis",
    findings_heading: "Key discussion topics",
    chart_heading: "Topic heat",
    exemplar_prefix: "Topic: ",
};

impl ModeProfile {
    pub fn for_mode(mode: AnalysisMode) -> &'static ModeProfile {
        match mode {
            AnalysisMode::PainPoints => &PAIN_POINTS,
            AnalysisMode::HotTopics => &HOT_TOPICS,
        }
    }

    /// The search query sent to every forum.
    ///
    /// Pain-point mode fans the keyword out into a disjunction of
    /// complaint-flavored phrases; hot-topic mode searches the keyword
    /// verbatim, quoted.
    pub fn search_query(&self, keyword: &str) -> String {
        match self.mode {
            AnalysisMode::PainPoints => {
                let phrases: Vec<String> = PAIN_POINT_MARKERS
                    .iter()
                    .map(|marker| format!("{keyword} {marker}"))
                    .collect();
                format!("({})", phrases.join(" OR "))
            }
            AnalysisMode::HotTopics => format!("\"{keyword}\""),
        }
    }

    /// Pain-point queries only make sense under relevance ranking; the
    /// hot-topic query respects whatever the caller asked for.
    pub fn effective_sort(&self, requested: SortOrder) -> SortOrder {
        match self.mode {
            AnalysisMode::PainPoints => SortOrder::Relevance,
            AnalysisMode::HotTopics => requested,
        }
    }

    /// The full summarization instruction: role, task rules, the exact JSON
    /// schema the response is parsed against, and the corpus.
    pub fn analysis_prompt(&self, keyword: &str, corpus: &str) -> String {
        match self.mode {
            AnalysisMode::PainPoints => format!(
                r##"You are a senior product manager focused on user experience. Your task is to mine the following Reddit comments about "{keyword}" for the real pain points users hit in concrete usage scenarios.

Requirements:
1. Focus on negative experiences.
2. Ignore irrelevant chatter.
3. Distill 3-5 core pain points.
4. Respond with strict JSON matching this shape exactly; executiveSummary must be an object with overallSentiment and keyFindings:
{{
    "executiveSummary": {{ "overallSentiment": "One sentence stating the most important finding.", "keyFindings": ["finding one", "finding two", "finding three"] }},
    "identifiedPainPoints": [{{"title": "Pain point title", "usageScenario": "Where the pain occurs", "description": "Detailed description", "count": 0}}],
    "chartData": {{"labels": ["pain point one"], "data": [0], "colors": ["#D2B48C", "#E9DDC7", "#856404"]}},
    "commentExamples": [{{"painPointTitle": "Owning pain point title", "commentTranslation": "The representative comment, rendered in clear English", "score": 0, "replies": 0, "permalink": "comment URL"}}]
}}

--- Raw comment data ---
{corpus}"##
            ),
            AnalysisMode::HotTopics => format!(
                r##"You are a sharp market researcher. Your task is to distill the hot discussion topics and prevailing opinions from the following Reddit comments about "{keyword}".

Requirements:
1. Identify 5-8 core topics.
2. Summarize the prevailing opinion for each.
3. Respond with strict JSON matching this shape exactly; executiveSummary must be an object with overallSentiment and keyFindings:
{{
    "executiveSummary": {{ "overallSentiment": "One sentence stating the most important finding.", "keyFindings": ["finding one", "finding two", "finding three"] }},
    "keyDiscussionTopics": [{{"title": "Topic title", "description": "Prevailing opinion", "count": 0}}],
    "chartData": {{"labels": ["topic one"], "data": [0], "colors": ["#D2B48C", "#E9DDC7", "#856404"]}},
    "commentExamples": [{{"associatedTopic": "Owning topic title", "commentTranslation": "The representative comment, rendered in clear English", "score": 0, "replies": 0, "permalink": "comment URL"}}]
}}

--- Raw comment data ---
{corpus}"##
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pain_point_query_is_a_marker_disjunction() {
        let profile = ModeProfile::for_mode(AnalysisMode::PainPoints);
        let query = profile.search_query("standing desk");
        assert!(query.starts_with('('));
        assert!(query.ends_with(')'));
        assert!(query.contains("standing desk problem OR"));
        assert!(query.contains("standing desk nightmare"));
    }

    #[test]
    fn hot_topic_query_quotes_the_keyword() {
        let profile = ModeProfile::for_mode(AnalysisMode::HotTopics);
        assert_eq!(profile.search_query("standing desk"), "\"standing desk\"");
    }

    #[test]
    fn pain_point_mode_forces_relevance_sort() {
        let profile = ModeProfile::for_mode(AnalysisMode::PainPoints);
        assert_eq!(profile.effective_sort(SortOrder::Top), SortOrder::Relevance);
        let hot = ModeProfile::for_mode(AnalysisMode::HotTopics);
        assert_eq!(hot.effective_sort(SortOrder::Top), SortOrder::Top);
    }

    #[test]
    fn prompts_demand_the_mode_specific_schema() {
        let pain = ModeProfile::for_mode(AnalysisMode::PainPoints).analysis_prompt("x", "corpus");
        assert!(pain.contains("identifiedPainPoints"));
        assert!(pain.contains("painPointTitle"));
        let hot = ModeProfile::for_mode(AnalysisMode::HotTopics).analysis_prompt("x", "corpus");
        assert!(hot.contains("keyDiscussionTopics"));
        assert!(hot.contains("associatedTopic"));
    }

    #[test]
    fn prompts_carry_the_chart_color_palette_verbatim() {
        for mode in [AnalysisMode::PainPoints, AnalysisMode::HotTopics] {
            let prompt = ModeProfile::for_mode(mode).analysis_prompt("x", "corpus");
            assert!(prompt.contains(r##""colors": ["#D2B48C", "#E9DDC7", "#856404"]"##));
            assert!(prompt.ends_with("corpus"));
        }
    }
}
