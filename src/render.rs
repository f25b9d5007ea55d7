//! Line-by-line rendering of an analysis result.

use once_cell::sync::Lazy;
use regex::Regex;

static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.").expect("Valid regex pattern"));

const SECTION_HEADINGS: [&str; 3] = ["Symptoms:", "Causes:", "Solutions:"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading,
    ListItem,
    Paragraph,
    Blank,
}

pub fn classify_line(line: &str) -> LineKind {
    if SECTION_HEADINGS.iter().any(|h| line.starts_with(h)) {
        LineKind::Heading
    } else if NUMBERED.is_match(line) || line.starts_with('-') {
        LineKind::ListItem
    } else if !line.trim().is_empty() {
        LineKind::Paragraph
    } else {
        LineKind::Blank
    }
}

/// Split on `\n` and classify each line, keeping blanks so callers can see them.
pub fn classify(text: &str) -> Vec<(LineKind, &str)> {
    text.split('\n').map(|line| (classify_line(line), line)).collect()
}

/// Consecutive list items share one `<ul>`; blank lines do not break a list.
pub fn render_result_html(text: &str) -> String {
    let mut html = String::with_capacity(text.len() * 2);
    let mut in_list = false;
    for (kind, line) in classify(text) {
        if kind == LineKind::Blank {
            continue;
        }
        let is_item = kind == LineKind::ListItem;
        if is_item && !in_list {
            html.push_str("<ul class=\"result-list\">\n");
        } else if !is_item && in_list {
            html.push_str("</ul>\n");
        }
        in_list = is_item;

        let line = escape_html(line);
        match kind {
            LineKind::Heading => {
                html.push_str(&format!("<h4 class=\"result-heading\">{}</h4>\n", line))
            }
            LineKind::ListItem => html.push_str(&format!("<li class=\"result-item\">{}</li>\n", line)),
            LineKind::Paragraph => html.push_str(&format!("<p class=\"result-text\">{}</p>\n", line)),
            LineKind::Blank => {}
        }
    }
    if in_list {
        html.push_str("</ul>\n");
    }
    html
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
