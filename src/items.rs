//! Turning normalized changelog fields into feed items.
//!
//! A record that cannot become a valid item is excluded rather than failing
//! the run. Exclusions are counted in [`ExclusionStats`] and logged.

use crate::config::LinkScheme;
use crate::error::FeedError;
use crate::models::{FeedItem, NormalizedFields};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fmt;
use tracing::{info, instrument, warn};
use url::Url;

/// Date layouts seen on the changelog, after ordinal suffixes are stripped.
const DATE_FORMATS: &[&str] = &["%B %d, %Y", "%b %d, %Y", "%B %d %Y", "%d %B %Y", "%Y-%m-%d"];

/// Why a record was left out of the feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    MissingVersion,
    MissingDate { version: String },
    UnparseableDate { version: String, date_text: String },
    DuplicateId { version: String, id: String },
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::MissingVersion => write!(f, "section has no version heading"),
            Exclusion::MissingDate { version } => write!(f, "{} has no release date", version),
            Exclusion::UnparseableDate { version, date_text } => {
                write!(f, "{} has unparseable date {:?}", version, date_text)
            }
            Exclusion::DuplicateId { version, id } => {
                write!(f, "{} repeats item id {}", version, id)
            }
        }
    }
}

/// Per-reason exclusion counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExclusionStats {
    pub missing_version: usize,
    pub missing_date: usize,
    pub unparseable_date: usize,
    pub duplicate_id: usize,
}

impl ExclusionStats {
    fn record(&mut self, exclusion: &Exclusion) {
        match exclusion {
            Exclusion::MissingVersion => self.missing_version += 1,
            Exclusion::MissingDate { .. } => self.missing_date += 1,
            Exclusion::UnparseableDate { .. } => self.unparseable_date += 1,
            Exclusion::DuplicateId { .. } => self.duplicate_id += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.missing_version + self.missing_date + self.unparseable_date + self.duplicate_id
    }
}

/// Builds [`FeedItem`]s with one fixed id/link scheme.
#[derive(Debug, Clone)]
pub struct ItemBuilder {
    scheme: LinkScheme,
    page_url: Url,
    archive_template: String,
}

impl ItemBuilder {
    /// Fails only when `page_url` is not an absolute URL.
    pub fn new(scheme: LinkScheme, page_url: &str, archive_template: &str) -> Result<Self, FeedError> {
        Ok(Self {
            scheme,
            page_url: Url::parse(page_url)?,
            archive_template: archive_template.to_string(),
        })
    }

    /// Item id for a version label. Also used as the item link.
    ///
    /// Depends on nothing but `version`, so ids are stable across runs.
    pub fn id_for(&self, version: &str) -> String {
        match self.scheme {
            LinkScheme::Anchor => {
                let mut url = self.page_url.clone();
                url.set_fragment(Some(&anchor_for_version(version)));
                url.to_string()
            }
            LinkScheme::Archive => self
                .archive_template
                .replace("{version}", &urlencoding::encode(version)),
        }
    }

    /// Validate one record and build its item.
    pub fn build(&self, fields: NormalizedFields) -> Result<FeedItem, Exclusion> {
        let NormalizedFields {
            version,
            date_text,
            content_html,
        } = fields;

        if version.is_empty() {
            return Err(Exclusion::MissingVersion);
        }
        if date_text.is_empty() {
            return Err(Exclusion::MissingDate { version });
        }
        let Some(release_date) = parse_release_date(&date_text) else {
            return Err(Exclusion::UnparseableDate { version, date_text });
        };

        let id = self.id_for(&version);
        Ok(FeedItem {
            link: id.clone(),
            id,
            version,
            release_date,
            content_html,
        })
    }
}

/// The changelog's own anchor convention: `2.1.0` becomes `_2_1_0`.
pub fn anchor_for_version(version: &str) -> String {
    format!("_{}", version.replace('.', "_"))
}

/// Parse a date line such as `"July 21, 2023"`.
pub fn parse_release_date(date_text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_text.trim(), format).ok())
}

/// Build items from records in source order, keeping the first `limit` valid
/// ones.
///
/// # Arguments
///
/// * `builder` - Id and link scheme for this deployment
/// * `records` - Normalized sections, newest first
/// * `limit` - Maximum number of items kept
///
/// # Returns
///
/// The kept items in input order, and counts of the records left out.
/// Excluded records never count toward `limit`.
#[instrument(level = "info", skip_all, fields(limit = limit))]
pub fn build_items<I>(builder: &ItemBuilder, records: I, limit: usize) -> (Vec<FeedItem>, ExclusionStats)
where
    I: IntoIterator<Item = NormalizedFields>,
{
    let mut items: Vec<FeedItem> = Vec::with_capacity(limit);
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut stats = ExclusionStats::default();

    for fields in records {
        if items.len() == limit {
            break;
        }
        let built = builder.build(fields).and_then(|item| {
            if seen_ids.insert(item.id.clone()) {
                Ok(item)
            } else {
                Err(Exclusion::DuplicateId {
                    version: item.version,
                    id: item.id,
                })
            }
        });
        match built {
            Ok(item) => items.push(item),
            Err(exclusion) => {
                warn!(reason = %exclusion, "Excluding changelog section");
                stats.record(&exclusion);
            }
        }
    }

    info!(
        items = items.len(),
        excluded = stats.total(),
        "Built feed items"
    );
    (items, stats)
}
