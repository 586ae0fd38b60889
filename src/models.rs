//! Data models flowing through the feed pipeline.
//!
//! - [`RawSection`]: borrowed view over one release entry in the parsed page
//! - [`NormalizedFields`]: text pulled out of a section, not yet validated
//! - [`FeedItem`]: a validated release, ready to serialize
//! - [`Channel`]: static metadata shared by every feed document
//! - [`FeedDocuments`]: the three serialized syndication documents

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use scraper::ElementRef;

/// One changelog section as it appears in the parsed document.
///
/// Wraps the matched element without copying it. Sections are produced once
/// per run by the extractor and dropped after normalization.
#[derive(Debug, Clone, Copy)]
pub struct RawSection<'a> {
    element: ElementRef<'a>,
}

impl<'a> RawSection<'a> {
    /// Wrap a matched section element.
    pub fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// The underlying element.
    pub fn element(&self) -> ElementRef<'a> {
        self.element
    }
}

/// Fields extracted from one section before any validation.
///
/// `version` and `date_text` are empty strings when the section lacks a
/// heading or a date line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedFields {
    /// Free-form version label, e.g. `"2.1.0"`.
    pub version: String,
    /// Human-readable date with ordinal suffixes removed, e.g. `"July 21, 2023"`.
    pub date_text: String,
    /// Serialized HTML of the section body.
    pub content_html: Option<String>,
}

/// A release that passed validation and will appear in every feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub version: String,
    pub release_date: NaiveDate,
    pub link: String,
    pub id: String,
    pub content_html: Option<String>,
}

impl FeedItem {
    /// Release date as a UTC timestamp at midnight.
    pub fn published(&self) -> DateTime<Utc> {
        midnight_utc(self.release_date)
    }
}

/// Midnight UTC on the given calendar day.
pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::default()).and_utc()
}

/// Links to each serialized format of a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLinks {
    pub atom: String,
    pub json: String,
    pub rss: String,
}

/// Feed author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub link: String,
}

/// Static channel metadata shared by the Atom, JSON and RSS documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub title: String,
    pub description: String,
    pub id: String,
    pub link: String,
    pub language: String,
    pub generator: String,
    pub copyright: String,
    pub author: Author,
    pub feed_links: FeedLinks,
}

/// The three serialized syndication documents for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDocuments {
    pub atom: String,
    pub json: String,
    pub rss: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_is_midnight_utc() {
        let item = FeedItem {
            version: "2.1.0".into(),
            release_date: NaiveDate::from_ymd_opt(2023, 7, 21).unwrap(),
            link: "https://example.com/#_2_1_0".into(),
            id: "https://example.com/#_2_1_0".into(),
            content_html: None,
        };
        assert_eq!(item.published().to_rfc3339(), "2023-07-21T00:00:00+00:00");
    }
}
