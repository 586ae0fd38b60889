//! Run configuration.
//!
//! Every value has a built-in default matching the published feed, so the
//! binary runs with no arguments. An optional YAML file can override any
//! subset of fields:
//!
//! ```yaml
//! source:
//!   section_pattern: "section"
//! link_scheme: archive
//! legacy:
//!   enabled: false
//! ```

use crate::error::FeedError;
use crate::models::{Author, Channel, FeedLinks};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument};

/// Changelog page the feeds are built from.
pub const CHANGELOG_URL: &str = "https://sdk.play.date/changelog/";

/// Sections below the page's main content container.
pub const SECTION_PATTERN: &str = "main section";

/// Download archive used by the `archive` link scheme.
pub const ARCHIVE_URL_TEMPLATE: &str =
    "https://download-keycdn.panic.com/playdate_sdk/PlaydateSDK-{version}.zip";

/// Last day the legacy feed locations are still written.
pub static LEGACY_SUNSET: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2027, 1, 1).expect("valid sunset date"));

/// Number of releases kept in the feeds.
pub const MAX_ITEMS: usize = 10;

const SITE_URL: &str = "https://idleberg.github.io/playdate-sdk-feed";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub channel: ChannelConfig,
    pub link_scheme: LinkScheme,
    pub archive_url_template: String,
    pub max_items: usize,
    /// Canonical feed file names. The landing page always links the
    /// default names.
    pub outputs: OutputFiles,
    pub legacy: LegacyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            channel: ChannelConfig::default(),
            link_scheme: LinkScheme::Anchor,
            archive_url_template: ARCHIVE_URL_TEMPLATE.to_string(),
            max_items: MAX_ITEMS,
            outputs: OutputFiles::default(),
            legacy: LegacyConfig::default(),
        }
    }
}

/// Where the changelog lives and how its sections are recognised.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub section_pattern: String,
    pub heading_pattern: String,
    pub date_pattern: String,
    pub body_pattern: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: CHANGELOG_URL.to_string(),
            section_pattern: SECTION_PATTERN.to_string(),
            heading_pattern: "h2".to_string(),
            date_pattern: "h2 + p".to_string(),
            body_pattern: "div".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChannelConfig {
    pub title: String,
    pub description: String,
    pub site_url: String,
    pub language: String,
    pub copyright: String,
    pub author_name: String,
    pub author_link: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            title: "Playdate SDK Changelog".to_string(),
            description: "A missing RSS feed for Playdate SDK updates".to_string(),
            site_url: SITE_URL.to_string(),
            language: "en".to_string(),
            copyright: "Public Domain".to_string(),
            author_name: "idleberg".to_string(),
            author_link: "https://github.com/idleberg".to_string(),
        }
    }
}

/// How item ids and links are derived from a version label.
///
/// Feed readers deduplicate by id, so a deployment must stick to one scheme.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkScheme {
    /// In-page anchor on the changelog, e.g. `#_2_1_0`.
    #[default]
    Anchor,
    /// Direct link to the SDK download archive.
    Archive,
}

/// File names for one set of feed documents, relative to the output directory.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputFiles {
    pub atom: String,
    pub json: String,
    pub rss: String,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            atom: "atom.xml".to_string(),
            json: "feed.json".to_string(),
            rss: "rss.xml".to_string(),
        }
    }
}

impl OutputFiles {
    /// Public URLs of these files under `site_url`.
    pub fn links(&self, site_url: &str) -> FeedLinks {
        let base = site_url.trim_end_matches('/');
        FeedLinks {
            atom: format!("{}/{}", base, self.atom),
            json: format!("{}/{}", base, self.json),
            rss: format!("{}/{}", base, self.rss),
        }
    }
}

/// Transitional copy of the feeds at their old, extensionless locations.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LegacyConfig {
    pub enabled: bool,
    pub sunset: NaiveDate,
    pub files: OutputFiles,
}

impl Default for LegacyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sunset: *LEGACY_SUNSET,
            files: OutputFiles {
                atom: "atom".to_string(),
                json: "json".to_string(),
                rss: "rss".to_string(),
            },
        }
    }
}

impl LegacyConfig {
    /// Whether legacy documents are written on `today`.
    pub fn active_on(&self, today: NaiveDate) -> bool {
        self.enabled && today <= self.sunset
    }
}

impl Config {
    /// Load a YAML config file, falling back to defaults for missing fields.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await?;
        let config = Self::from_yaml(&raw)?;
        info!("Loaded configuration");
        Ok(config)
    }

    /// Parse YAML text; absent fields keep their defaults.
    pub fn from_yaml(raw: &str) -> Result<Self, FeedError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Channel metadata for the canonical feed locations.
    pub fn channel(&self) -> Channel {
        self.channel_with_links(self.outputs.links(&self.channel.site_url))
    }

    /// Channel metadata with the given feed links; everything else is shared.
    pub fn channel_with_links(&self, feed_links: FeedLinks) -> Channel {
        let c = &self.channel;
        Channel {
            title: c.title.clone(),
            description: c.description.clone(),
            id: c.site_url.clone(),
            link: c.site_url.clone(),
            language: c.language.clone(),
            generator: generator(),
            copyright: c.copyright.clone(),
            author: Author {
                name: c.author_name.clone(),
                link: c.author_link.clone(),
            },
            feed_links,
        }
    }
}

/// Generator tag. Tied to the build, not the host, so output stays reproducible.
pub fn generator() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_published_feed() {
        let config = Config::default();
        assert_eq!(config.source.url, CHANGELOG_URL);
        assert_eq!(config.source.section_pattern, "main section");
        assert_eq!(config.link_scheme, LinkScheme::Anchor);
        assert_eq!(config.max_items, 10);
        assert_eq!(
            config.legacy.sunset,
            NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()
        );
        assert_eq!(config.legacy.sunset, *LEGACY_SUNSET);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            "source:\n  section_pattern: section\nlink_scheme: archive\nlegacy:\n  enabled: false\n",
        )
        .unwrap();

        assert_eq!(config.source.section_pattern, "section");
        assert_eq!(config.source.heading_pattern, "h2");
        assert_eq!(config.link_scheme, LinkScheme::Archive);
        assert!(!config.legacy.enabled);
        assert_eq!(config.legacy.files.atom, "atom");
        assert_eq!(config.channel.title, "Playdate SDK Changelog");
    }

    #[test]
    fn test_unknown_link_scheme_is_rejected() {
        assert!(Config::from_yaml("link_scheme: permalink\n").is_err());
    }

    #[test]
    fn test_channel_links_point_at_output_files() {
        let channel = Config::default().channel();
        assert_eq!(channel.id, SITE_URL);
        assert_eq!(channel.feed_links.atom, format!("{}/atom.xml", SITE_URL));
        assert_eq!(channel.feed_links.json, format!("{}/feed.json", SITE_URL));
        assert_eq!(channel.feed_links.rss, format!("{}/rss.xml", SITE_URL));
    }

    #[test]
    fn test_legacy_active_until_sunset() {
        let legacy = LegacyConfig::default();
        let sunset = legacy.sunset;
        assert!(legacy.active_on(sunset));
        assert!(!legacy.active_on(sunset.succ_opt().unwrap()));

        let disabled = LegacyConfig {
            enabled: false,
            ..LegacyConfig::default()
        };
        assert!(!disabled.active_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
    }
}
