//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

use quizforge_core::report::SessionHistory;
use quizforge_core::statistics::BreakdownStats;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from a session history.
pub fn generate_html(history: &SessionHistory, title: &str) -> String {
    let stats = history.stats();
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>quizforge report — {}</title>\n",
        html_escape(title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>quizforge report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\"><strong>{}</strong> | {} sessions | {} questions answered | generated {}</p>\n",
        html_escape(title),
        stats.sessions,
        stats.total_rounds,
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary dashboard
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Sessions</th><th>Accuracy</th><th>Avg Score</th><th>Best Score</th><th>Avg Session</th><th>Avg per Question</th><th>Avg Final Level</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{}</td><td>{:.1}%</td><td>{:.2}</td><td>{}</td><td>{:.1}s</td><td>{:.1}s</td><td>{:.2}</td></tr></tbody></table>\n",
        stats.sessions,
        stats.accuracy * 100.0,
        stats.avg_score,
        stats.best_score,
        stats.avg_session_ms as f64 / 1000.0,
        stats.avg_question_ms as f64 / 1000.0,
        stats.avg_final_level,
    ));

    if !stats.per_topic.is_empty() {
        html.push_str("<h3>Accuracy by topic</h3>\n");
        html.push_str(&generate_bar_chart(&stats.per_topic));
    }
    if !stats.per_difficulty.is_empty() {
        html.push_str("<h3>Accuracy by difficulty</h3>\n");
        let by_level: BTreeMap<String, BreakdownStats> = stats
            .per_difficulty
            .iter()
            .map(|(level, s)| (format!("level {level}"), *s))
            .collect();
        html.push_str(&generate_bar_chart(&by_level));
    }

    html.push_str("</section>\n");

    // Per-session results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Sessions</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Started</th><th onclick=\"sortTable(1)\">Bank</th><th onclick=\"sortTable(2)\">Score</th><th onclick=\"sortTable(3)\">Time</th><th onclick=\"sortTable(4)\">Final Level</th><th onclick=\"sortTable(5)\">Outcome</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for s in &history.sessions {
        let row_class = if s.accuracy() >= 0.5 { "pass" } else { "fail" };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}/{}</td><td>{:.1}s</td><td>{}</td><td>{:?}</td></tr>\n",
            row_class,
            s.started_at.format("%Y-%m-%d %H:%M"),
            html_escape(s.bank_id.as_deref().unwrap_or("-")),
            s.correct_count(),
            s.len(),
            s.total_elapsed().as_secs_f64(),
            s.final_level,
            s.outcome,
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(history)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(history: &SessionHistory, title: &str, path: &Path) -> Result<()> {
    let html = generate_html(history, title);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn generate_bar_chart(breakdown: &BTreeMap<String, BreakdownStats>) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let total_height = breakdown.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 120,
        total_height
    );

    for (i, (label, stats)) in breakdown.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (stats.accuracy * max_width as f64) as usize;

        let color = if stats.accuracy >= 0.8 {
            "#22c55e"
        } else if stats.accuracy >= 0.5 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(label)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}% ({}/{})</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            stats.accuracy * 100.0,
            stats.correct,
            stats.asked
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb) : vb.localeCompare(va);
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
