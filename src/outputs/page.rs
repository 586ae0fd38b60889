//! Companion landing page and icon.
//!
//! Both are fixed templates compiled into the binary. The page binds a
//! single variable, `{{ version }}`, to the newest release label.
//!
//! Feed links in the page are the default canonical file names (`atom.xml`,
//! `feed.json`, `rss.xml`). Renaming those through `outputs` in the config
//! leaves the page pointing at the old names; the pipeline logs a warning
//! when that happens.

use once_cell::sync::Lazy;
use regex::Regex;

const PAGE_TEMPLATE: &str = include_str!("../../templates/index.html");
const ICON_TEMPLATE: &str = include_str!("../../templates/favicon.svg");

static VERSION_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*version\s*\}\}").expect("valid placeholder regex"));
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));
static BETWEEN_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r">\s+<").expect("valid tag regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// `index.html` showing `latest_version`.
pub fn render_page(latest_version: &str) -> String {
    let escaped = html_escape::encode_text(latest_version);
    let rendered = VERSION_PLACEHOLDER.replace_all(PAGE_TEMPLATE, regex::NoExpand(&escaped));
    minify(&rendered)
}

/// `favicon.svg`.
pub fn render_icon() -> String {
    minify(ICON_TEMPLATE)
}

/// Drop comments and collapse whitespace. Attribute quoting is left alone.
pub fn minify(markup: &str) -> String {
    let without_comments = COMMENT.replace_all(markup, "");
    let tight = BETWEEN_TAGS.replace_all(&without_comments, "><");
    WHITESPACE.replace_all(tight.trim(), " ").into_owned()
}
