//! Transitional feeds at the old, extensionless locations.
//!
//! Subscribers of `/atom`, `/json` and `/rss` keep receiving updates, led by
//! a notice pointing them at the new URLs. Everything in this module goes
//! away once the sunset date in [`LegacyConfig`] has passed; nothing else in
//! the crate depends on it besides the pipeline's single call site.
//!
//! The notice is dated with the run day at midnight UTC, the same granularity
//! as release dates, so a rebuild on the same day yields the same legacy
//! documents.

use super::synthesize;
use crate::config::{Config, LegacyConfig};
use crate::error::FeedError;
use crate::models::{FeedDocuments, FeedItem, FeedLinks};
use chrono::NaiveDate;
use tracing::{debug, info};

pub const NOTICE_TITLE: &str = "This feed has moved";
const NOTICE_ANCHOR: &str = "feed-moved";

/// The synthetic first item of every legacy feed.
///
/// # Arguments
///
/// * `site_url` - Base of the notice's id and link
/// * `canonical` - New feed locations listed in the notice body
/// * `today` - Run day; becomes the notice's date
pub fn migration_notice(site_url: &str, canonical: &FeedLinks, today: NaiveDate) -> FeedItem {
    let id = format!("{}#{}", site_url.trim_end_matches('/'), NOTICE_ANCHOR);
    let content = format!(
        "<p>This feed location is deprecated and will stop updating. \
         Please subscribe to one of the new locations:</p>\
         <ul>{}{}{}</ul>",
        notice_link("Atom", &canonical.atom),
        notice_link("JSON Feed", &canonical.json),
        notice_link("RSS", &canonical.rss),
    );

    FeedItem {
        version: NOTICE_TITLE.to_string(),
        release_date: today,
        link: id.clone(),
        id,
        content_html: Some(content),
    }
}

fn notice_link(label: &str, url: &str) -> String {
    format!(
        "<li>{}: <a href=\"{}\">{}</a></li>",
        label,
        html_escape::encode_double_quoted_attribute(url),
        html_escape::encode_text(url),
    )
}

/// Legacy documents for `today`, or `None` when the shim is disabled or past
/// its sunset.
pub fn synthesize_legacy(
    config: &Config,
    items: &[FeedItem],
    today: NaiveDate,
) -> Result<Option<FeedDocuments>, FeedError> {
    let legacy: &LegacyConfig = &config.legacy;
    if !legacy.active_on(today) {
        debug!(enabled = legacy.enabled, sunset = %legacy.sunset, "Skipping legacy feeds");
        return Ok(None);
    }

    let site_url = &config.channel.site_url;
    let channel = config.channel_with_links(legacy.files.links(site_url));
    let canonical = config.outputs.links(site_url);

    let mut legacy_items = Vec::with_capacity(items.len() + 1);
    legacy_items.push(migration_notice(site_url, &canonical, today));
    legacy_items.extend_from_slice(items);

    let documents = synthesize(&channel, &legacy_items)?;
    info!(items = legacy_items.len(), sunset = %legacy.sunset, "Synthesized legacy feeds");
    Ok(Some(documents))
}
