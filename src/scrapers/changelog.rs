//! Playdate SDK changelog scraper.
//!
//! The changelog is a single page with one `<section>` per release, newest
//! first. Each section carries a version heading, a date line directly below
//! it, and a body container with the release notes:
//!
//! ```html
//! <section>
//!   <h2>2.1.0</h2>
//!   <p>July 21st, 2023</p>
//!   <div>…release notes…</div>
//! </section>
//! ```

use crate::config::SourceConfig;
use crate::error::FeedError;
use crate::models::{NormalizedFields, RawSection};
use crate::scrapers::query::{Pattern, Query};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Day-of-month ordinal: one or two digits followed by st/nd/rd/th.
static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)\b").expect("valid ordinal regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Compiled patterns used to pick a changelog apart.
#[derive(Debug, Clone)]
pub struct SectionPatterns {
    pub section: Pattern,
    pub heading: Pattern,
    pub date: Pattern,
    pub body: Pattern,
}

impl SectionPatterns {
    pub fn from_config(source: &SourceConfig) -> Result<Self, FeedError> {
        Ok(Self {
            section: Pattern::parse(&source.section_pattern)?,
            heading: Pattern::parse(&source.heading_pattern)?,
            date: Pattern::parse(&source.date_pattern)?,
            body: Pattern::parse(&source.body_pattern)?,
        })
    }
}

/// Download the changelog page.
///
/// # Arguments
///
/// * `url` - Address of the changelog page
///
/// # Returns
///
/// The page body as text. A transport failure or a non-success status both
/// become [`FeedError::SourceUnavailable`]; there are no retries.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_changelog(url: &str) -> Result<String, FeedError> {
    let started = Instant::now();
    let unavailable = |reason: String| FeedError::SourceUnavailable {
        url: url.to_string(),
        reason,
    };

    let response = reqwest::get(url).await.map_err(|e| unavailable(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(unavailable(format!("HTTP {}", status)));
    }
    let html = response.text().await.map_err(|e| unavailable(e.to_string()))?;

    info!(
        bytes = html.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Downloaded changelog"
    );
    Ok(html)
}

/// All changelog sections in document order (newest first on the live page).
///
/// Returns an empty Vec when nothing matches; deciding what that means is
/// left to the caller.
pub fn extract_sections<'a>(document: &'a Html, pattern: &Pattern) -> Vec<RawSection<'a>> {
    let sections: Vec<RawSection<'a>> = document
        .root_element()
        .query_all(pattern)
        .into_iter()
        .map(RawSection::new)
        .collect();
    debug!(count = sections.len(), pattern = pattern.as_str(), "Extracted sections");
    sections
}

/// Pull version, date and body out of one section. Missing nodes yield
/// empty fields.
pub fn normalize_section(section: RawSection<'_>, patterns: &SectionPatterns) -> NormalizedFields {
    let element = section.element();

    let version = element
        .query_first(&patterns.heading)
        .map(element_text)
        .unwrap_or_default();

    let date_text = element
        .query_first(&patterns.date)
        .map(|p| strip_ordinal_suffixes(&element_text(p)))
        .unwrap_or_default();

    let content_html = element.query_first(&patterns.body).map(|body| body.html());

    NormalizedFields {
        version,
        date_text,
        content_html,
    }
}

/// Remove ordinal suffixes from day numbers: `"July 21st, 2023"` becomes
/// `"July 21, 2023"`. Letters not preceded by a day number are kept, so
/// `"August"` survives intact.
pub fn strip_ordinal_suffixes(text: &str) -> String {
    ORDINAL_SUFFIX.replace_all(text, "$1").into_owned()
}

/// Text content with whitespace runs collapsed and ends trimmed.
fn element_text(element: ElementRef<'_>) -> String {
    let text: String = element.text().collect();
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
