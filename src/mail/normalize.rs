//! Body normalisation and HTML rendering.
//!
//! `normalize` cleans stored body text, `to_plain_text` flattens HTML into
//! line-oriented text, and `to_display_html` turns either into markup that is
//! safe to embed: the only tags it ever emits are `<br>`.

use std::sync::LazyLock;

use regex::Regex;

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("static regex"));

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("static regex")
});

static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)<\s*/?\s*(?:br|hr|div|p|li|ul|ol|dl|dt|dd|blockquote|pre|table|thead|tbody|tfoot|tr|td|th|caption|h[1-6]|section|article|header|footer|aside|nav|main|figure|figcaption|address)\b[^>]*>",
    )
    .expect("static regex")
});

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:/?[A-Za-z][^>]*|![^>]*|\?[^>]*)>").expect("static regex")
});

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*)+").expect("static regex"));

static HTML_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(?:[a-z][a-z0-9]*\b[^>]*|/[a-z][a-z0-9]*\s*)>").expect("static regex")
});

/// Cleans a stored body for display or quoting.
///
/// Absent, blank and zero-only bodies (`"0"`, `"000"`) normalise to the empty
/// string. Lines are trimmed and lines that are empty or zero-only are
/// dropped. `normalize(Some(&normalize(x))) == normalize(x)` for every input.
pub fn normalize(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    let cleaned = raw.replace('\u{a0}', " ").replace('\r', "");
    let trimmed = cleaned.trim();
    // Some upstream rows store a literal zero in the body column.
    if is_zero_sentinel(trimmed) {
        return String::new();
    }

    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_zero_sentinel(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_zero_sentinel(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch == '0')
}

/// Flattens HTML into text: block-level tags become line breaks, every other
/// tag and comment is removed and entities are decoded. Runs of blank lines
/// collapse into one line feed.
pub fn to_plain_text(html: &str) -> String {
    let text = COMMENT.replace_all(html, "");
    let text = SCRIPT_OR_STYLE.replace_all(&text, "");
    let text = BLOCK_TAG.replace_all(&text, "\n");
    let text = ANY_TAG.replace_all(&text, "");
    let text = html_escape::decode_html_entities(&text)
        .replace('\u{a0}', " ")
        .replace('\r', "");
    let text = BLANK_RUN.replace_all(&text, "\n");
    text.trim().to_string()
}

/// Renders text (or HTML) as escaped markup with `<br>` line breaks.
///
/// Escaping happens after tags are stripped so that escaped entities in the
/// source can never turn back into live markup.
pub fn to_display_html(text: &str) -> String {
    let plain = to_plain_text(text);
    html_escape::encode_text(&plain).replace('\n', "<br>")
}

/// Rough check for whether a stored body is HTML rather than plain text.
pub fn looks_like_html(body: &str) -> bool {
    HTML_HINT.is_match(body)
}
