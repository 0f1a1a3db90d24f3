//! Monthly visibility report rendering.

use chrono::{DateTime, TimeZone};
use serde::Deserialize;

use crate::html::escape_html;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeywordRank {
    pub phrase: String,
    #[serde(default)]
    pub rank: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct ReportData<'a> {
    pub business_name: &'a str,
    pub month_label: &'a str,
    pub highlights: &'a [String],
    pub keywords: &'a [KeywordRank],
}

/// "October 2026" style label for the month containing `now`.
pub fn month_label<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%B %Y").to_string()
}

/// Subject line; line breaks in either part collapse to single spaces.
pub fn subject(business_name: &str, month_label: &str) -> String {
    let line = format!("{business_name} — Local Visibility Report ({month_label})");
    line.split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_monthly_report(data: &ReportData<'_>) -> String {
    let business = escape_html(data.business_name);
    let month = escape_html(data.month_label);

    let highlights: String = data
        .highlights
        .iter()
        .map(|h| format!("<li>{}</li>", escape_html(h)))
        .collect();

    let rows: String = data
        .keywords
        .iter()
        .map(|k| {
            let rank = k.rank.map_or_else(|| "-".to_string(), |r| r.to_string());
            format!("<tr><td>{}</td><td>{rank}</td></tr>", escape_html(&k.phrase))
        })
        .collect();

    format!(
        r#"<div style="font-family:Inter,Arial,sans-serif;max-width:720px;margin:auto;padding:24px">
  <h1>{business} — Local Visibility Report</h1>
  <div style="color:#666">{month}</div>
  <hr/>
  <h2>Highlights</h2>
  <ul>{highlights}</ul>
  <h2>Keyword Snapshot</h2>
  <table border="1" cellpadding="6" style="border-collapse:collapse;width:100%">
    <thead><tr><th align="left">Keyword</th><th>Rank</th></tr></thead>
    <tbody>{rows}</tbody>
  </table>
</div>"#
    )
}
