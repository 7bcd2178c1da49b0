//! HTML report rendering
//!
//! Output is a pure function of the aggregate: types and categories are
//! ordered by count with name as tie-break, so identical input always
//! renders byte-identical HTML.

use crate::aggregate::{Aggregate, ExceptionSummary};
use crate::layout::url_file_name;

/// Render the summary table followed by one detail table per type
pub fn render_html(aggregate: &Aggregate, exceptions_per_method: usize) -> String {
    let ranked = aggregate.ranked();
    let mut html: Vec<String> = Vec::new();

    html.push("<html>".to_string());

    // Summary: one row per exception type
    html.push("<a name='top'/>".to_string());
    html.push("<table border='1' width='100%'>".to_string());
    html.push("<tr><th>Exception</th><th>Dir</th><th>Count</th></tr>".to_string());
    for (name, summary) in &ranked {
        let name = escape_html(name);
        html.push(format!(
            "<tr><td><a href='#{name}'>{name}</a></td><td><a href='{}/'>link</a></td><td>{}</td></tr>",
            escape_html(summary.directory_url()),
            summary.count()
        ));
    }
    html.push("</table>".to_string());

    // Detail: records grouped by category
    for (name, summary) in &ranked {
        render_detail(&mut html, name, summary, exceptions_per_method);
    }

    html.push("</html>".to_string());
    html.join("\n")
}

fn render_detail(
    html: &mut Vec<String>,
    name: &str,
    summary: &ExceptionSummary,
    exceptions_per_method: usize,
) {
    let name = escape_html(name);
    html.push("<hr/>".to_string());
    html.push(format!("<a name='{name}'>{name}</a> (<a href='#top'>top</a>)"));
    html.push("<table border='1' width='100%'>".to_string());
    for (category, urls) in summary.ranked_categories() {
        html.push("<tr>".to_string());
        html.push(format!("<td nowrap>{}&nbsp;</td>", escape_html(category)));
        html.push(format!("<td>{}</td>", urls.len()));
        html.push("<td>".to_string());
        html.push(sample_links(urls, exceptions_per_method));
        html.push("</td>".to_string());
        html.push("</tr>".to_string());
    }
    html.push("</table>".to_string());
}

/// Up to `limit` links, each labelled with the record's file name
fn sample_links(urls: &[String], limit: usize) -> String {
    urls.iter()
        .take(limit)
        .map(|url| {
            format!(
                "<a href='{}'>{}</a>",
                escape_html(url),
                escape_html(url_file_name(url))
            )
        })
        .collect::<Vec<_>>()
        .join("<br/>")
}

/// Escape text for element content and single-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
