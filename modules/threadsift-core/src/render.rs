//! Presentation transform: structured report -> self-contained HTML page.
//!
//! Pure string assembly, no I/O. The runner decides where the artifact
//! lands and under what name.

use chrono::{DateTime, Utc};

use crate::mode::ModeProfile;
use crate::report::{AnalysisReport, ExecutiveSummary};

/// Deterministic artifact name: keyword (spaces underscored) plus a
/// second-resolution timestamp. Never reused, never overwritten.
pub fn artifact_name(keyword: &str, now: DateTime<Utc>) -> String {
    format!(
        "report_{}_{}.html",
        keyword.replace(' ', "_"),
        now.format("%Y%m%d_%H%M%S")
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn render_report(
    report: &AnalysisReport,
    keyword: &str,
    forums: &[String],
    profile: &ModeProfile,
) -> String {
    let title = format!(
        "Reddit '{}' {}",
        escape(keyword),
        escape(profile.report_title)
    );

    let summary_html = match &report.executive_summary {
        ExecutiveSummary::Structured {
            overall_sentiment,
            key_findings,
        } => {
            let cards: String = key_findings
                .iter()
                .map(|finding| format!("<div class=\"summary-card\">{}</div>", escape(finding)))
                .collect();
            format!(
                "<div class=\"summary-main-point\">{}</div><div class=\"summary-cards\">{}</div>",
                escape(overall_sentiment),
                cards
            )
        }
        ExecutiveSummary::Plain(text) => format!("<p>{}</p>", escape(text)),
    };

    let forums_html: String = forums
        .iter()
        .map(|forum| format!("<li>r/{}</li>", escape(forum)))
        .collect();

    let findings_html: String = report
        .findings
        .iter()
        .map(|finding| {
            let scenario = finding
                .usage_scenario
                .as_deref()
                .map(|s| format!("<em>{}</em><br>", escape(s)))
                .unwrap_or_default();
            format!(
                "<li><strong>{}</strong><br>{}{} <span class=\"count\">{} mentions</span></li>",
                escape(&finding.title),
                scenario,
                escape(&finding.description),
                finding.count
            )
        })
        .collect();

    let exemplars_html: String = report
        .comment_examples
        .iter()
        .map(|exemplar| {
            let heading = exemplar.finding_title.as_deref().unwrap_or("N/A");
            let link = exemplar
                .permalink
                .as_deref()
                .map(|url| {
                    format!(
                        " | <a href=\"{}\" target=\"_blank\">view source</a>",
                        escape(url)
                    )
                })
                .unwrap_or_default();
            format!(
                "<div class=\"content-box comment-box\"><h3>{}{}</h3><blockquote><p>{}</p>\
                 <footer>- Reddit user ({} points, {} replies){}</footer></blockquote></div>",
                escape(profile.exemplar_prefix),
                escape(heading),
                escape(&exemplar.quote),
                exemplar.score,
                exemplar.replies,
                link
            )
        })
        .collect();

    let chart_json =
        serde_json::to_string(&report.chart_data).unwrap_or_else(|_| "{}".to_string());

    format!(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="UTF-8"><title>{title}</title>
<style>
    :root{{--bg-color:#fdf5e6;--text-color:#5d4037;--primary-color:#d2b48c;--secondary-color:#e9ddc7;--container-bg:#fffaf0;}}
    body{{font-family:sans-serif;margin:0;background-color:var(--bg-color);color:var(--text-color);}}
    .container{{max-width:900px;margin:40px auto;background-color:var(--container-bg);box-shadow:0 10px 30px rgba(0,0,0,0.07);border-radius:12px;}}
    header{{text-align:center;padding:40px;border-bottom:2px solid var(--secondary-color);}}
    main{{padding:20px 40px 40px 40px;}}
    h1{{font-size:2.2em;margin:0;}}
    h2{{font-size:1.6em;margin-top:40px;padding-bottom:10px;border-bottom:2px solid var(--secondary-color);}}
    .content-box{{background-color:#fff;border:1px solid var(--secondary-color);border-radius:8px;padding:20px;margin-bottom:20px;}}
    #findings ul li{{position:relative;padding:15px;background-color:#fdfcf9;border-left:4px solid var(--primary-color);margin-bottom:10px;border-radius:4px;list-style:none;}}
    .count{{float:right;background-color:var(--primary-color);color:white;font-size:0.9em;font-weight:bold;padding:2px 10px;border-radius:12px;}}
    .comment-box blockquote{{border-left:4px solid var(--primary-color);margin:0;padding:10px 20px;background-color:var(--bg-color);font-style:italic;}}
    .comment-box footer{{text-align:right;margin-top:10px;font-style:normal;font-size:0.9em;color:#777;}}
    .forum-list{{list-style:none;padding:0;display:flex;flex-wrap:wrap;gap:10px;}}
    .forum-list li{{background-color:var(--secondary-color);font-size:0.9em;padding:5px 12px;border-radius:15px;}}
    .summary-main-point{{font-size:1.1em;font-weight:500;margin-bottom:20px;padding-bottom:15px;border-bottom:2px solid var(--secondary-color);text-align:center;}}
    .summary-cards{{display:flex;justify-content:space-around;gap:15px;flex-wrap:wrap;}}
    .summary-card{{background-color:var(--secondary-color);padding:15px;border-radius:8px;flex:1;min-width:200px;text-align:center;font-weight:500;}}
    .chart-container{{padding:20px;background-color:#fff;border-radius:8px;border:1px solid var(--secondary-color);}}
</style>
</head><body>
<div class="container">
    <header><h1>{title}</h1></header>
    <main>
        <section id="summary"><h2>Summary</h2><div class="content-box">{summary_html}</div></section>
        <section id="scope"><h2>Forums analyzed</h2><div class="content-box"><ul class="forum-list">{forums_html}</ul></div></section>
        <section id="chart-section"><h2>{chart_heading}</h2><div class="chart-container"><canvas id="analysisChart"></canvas></div></section>
        <section id="findings"><h2>{findings_heading}</h2><div class="content-box"><ul>{findings_html}</ul></div></section>
        <section id="exemplars"><h2>Representative comments</h2>{exemplars_html}</section>
    </main>
</div>
<script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
<script>
    document.addEventListener('DOMContentLoaded', function() {{
        const chartData = {chart_json};
        if (chartData && chartData.labels && chartData.labels.length > 0) {{
            new Chart(document.getElementById('analysisChart').getContext('2d'), {{
                type: 'bar',
                data: {{
                    labels: chartData.labels,
                    datasets: [{{ label: 'Mentions', data: chartData.data, backgroundColor: chartData.colors, borderWidth: 0 }}]
                }},
                options: {{
                    indexAxis: 'y',
                    responsive: true,
                    plugins: {{ legend: {{ display: false }}, title: {{ display: true, text: '{findings_heading}' }} }}
                }}
            }});
        }}
    }});
</script>
</body></html>"#,
        title = title,
        summary_html = summary_html,
        forums_html = forums_html,
        chart_heading = escape(profile.chart_heading),
        findings_heading = escape(profile.findings_heading),
        findings_html = findings_html,
        exemplars_html = exemplars_html,
        chart_json = chart_json,
    )
}
