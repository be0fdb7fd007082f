//! HTML and Markdown renderings of a validated pulse.

use std::fmt::Write as _;

use pulse_core::PulseReport;

/// The model-authored parts of a pulse, already validated and capped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulseSections {
    pub title: String,
    pub overview: String,
    pub top_themes: Vec<String>,
    pub user_quotes: Vec<String>,
    pub action_ideas: Vec<String>,
}

impl PulseSections {
    /// Render both views and assemble the final report.
    #[must_use]
    pub fn into_report(self) -> PulseReport {
        let html_report = html_report(&self);
        let markdown_report = markdown_report(&self);
        PulseReport {
            title: self.title,
            overview: self.overview,
            top_themes: self.top_themes,
            user_quotes: self.user_quotes,
            action_ideas: self.action_ideas,
            html_report,
            markdown_report,
        }
    }
}

const STYLE_BODY: &str = "font-family: sans-serif; line-height: 1.6; color: #333; max-width: 720px; margin: 0 auto;";
const STYLE_H1: &str = "color: #2c3e50;";
const STYLE_H2: &str =
    "color: #34495e; border-bottom: 2px solid #ecf0f1; padding-bottom: 10px; margin-top: 30px;";
const STYLE_OVERVIEW: &str =
    "background: #f8f9fa; padding: 15px; border-left: 4px solid #3498db; margin-bottom: 20px;";
const STYLE_QUOTE: &str =
    "font-style: italic; color: #555; border-left: 3px solid #27ae60; padding-left: 10px; margin: 10px 0;";
const STYLE_ACTION: &str = "background: #fff3cd; padding: 10px; margin: 5px 0; border-radius: 4px;";

/// Escape the five HTML-significant characters.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Self-contained HTML document with inline styles, suitable as an email body.
#[must_use]
pub fn html_report(sections: &PulseSections) -> String {
    let mut html = String::with_capacity(2048);
    let title = escape_html(&sections.title);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{title}</title>");
    let _ = writeln!(html, "</head>\n<body style=\"{STYLE_BODY}\">");
    let _ = writeln!(html, "<h1 style=\"{STYLE_H1}\">{title}</h1>");

    let _ = writeln!(
        html,
        "<div style=\"{STYLE_OVERVIEW}\">\n<h3>Overview</h3>\n<p>{}</p>\n</div>",
        escape_html(&sections.overview)
    );

    let _ = writeln!(html, "<h2 style=\"{STYLE_H2}\">Top Themes</h2>\n<ul>");
    for theme in &sections.top_themes {
        let _ = writeln!(html, "<li><strong>{}</strong></li>", escape_html(theme));
    }
    html.push_str("</ul>\n");

    let _ = writeln!(html, "<h2 style=\"{STYLE_H2}\">User Quotes</h2>");
    for quote in &sections.user_quotes {
        let _ = writeln!(
            html,
            "<div style=\"{STYLE_QUOTE}\">&quot;{}&quot;</div>",
            escape_html(quote)
        );
    }

    let _ = writeln!(html, "<h2 style=\"{STYLE_H2}\">Action Ideas</h2>");
    for action in &sections.action_ideas {
        let _ = writeln!(
            html,
            "<div style=\"{STYLE_ACTION}\">&#128161; {}</div>",
            escape_html(action)
        );
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Markdown rendering written to `pulse.md` and printed by the CLI.
#[must_use]
pub fn markdown_report(sections: &PulseSections) -> String {
    let mut md = String::with_capacity(1024);
    let _ = writeln!(md, "# {}\n", single_line(&sections.title));
    let _ = writeln!(md, "## Overview\n{}\n", sections.overview);

    md.push_str("## Top Themes\n");
    for theme in &sections.top_themes {
        let _ = writeln!(md, "- **{}**", single_line(theme));
    }

    md.push_str("\n## User Quotes\n");
    for quote in &sections.user_quotes {
        let _ = writeln!(md, "> \"{}\"", single_line(quote));
    }

    md.push_str("\n## Action Ideas\n");
    for action in &sections.action_ideas {
        let _ = writeln!(md, "- \u{1f4a1} {}", single_line(action));
    }

    md.trim_end().to_owned()
}

/// Headings, list items and blockquote lines end at the first newline.
fn single_line(value: &str) -> String {
    value
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
