//! Separates new content from quoted history in a rendered body.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Earliest of: a dash-delimited `Forwarded message` banner (or
/// `Begin forwarded message:`), an `On <date>, <name> wrote:`
/// attribution, a `<blockquote>` open tag, or a tag carrying a quote border
/// in its inline style. Leftmost match wins.
static QUOTE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i:-{2,}\s*forwarded message\s*-{2,}|\bbegin forwarded message:)",
        r"|\bOn\s[^<\n]{1,120}?,\s[^\n]{1,200}?\swrote:",
        r"|(?i:<blockquote\b)",
        r#"|(?i:<[a-z][a-z0-9]*\b[^>]*\bstyle\s*=\s*["'][^"']*border-left\s*:[^>]*>)"#,
    ))
    .expect("static regex")
});

const SUMMARY_LABEL: &str = "Show quoted text";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuoteSplit {
    pub main: String,
    pub quoted: String,
}

impl QuoteSplit {
    pub fn has_quoted(&self) -> bool {
        !self.quoted.is_empty()
    }
}

fn quote_start(html: &str) -> Option<usize> {
    QUOTE_MARKER.find(html).map(|found| found.start())
}

/// Splits `html` at the first quote marker. `quoted` is empty when no
/// marker is present.
pub fn split_quoted(html: &str) -> QuoteSplit {
    match quote_start(html) {
        Some(start) => QuoteSplit {
            main: html[..start].to_string(),
            quoted: html[start..].to_string(),
        },
        None => QuoteSplit {
            main: html.to_string(),
            quoted: String::new(),
        },
    }
}

/// Wraps everything from the first quote marker onward in a collapsed
/// `<details>` container. Input without a marker is returned unchanged.
pub fn collapse_quoted(html: &str) -> String {
    let Some(start) = quote_start(html) else {
        return html.to_string();
    };

    let (visible, hidden) = html.split_at(start);
    format!(
        "{visible}<details class=\"quoted-history\"><summary>{SUMMARY_LABEL}</summary>{hidden}</details>"
    )
}
