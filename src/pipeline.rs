//! One feed build, start to finish.
//!
//! [`build_outputs`] is the pure part: page HTML in, every output document
//! out, nothing touched on disk. [`run`] adds the fetch before it and the
//! writes after it. All documents exist in memory before the first write, so
//! a failure anywhere leaves the previous output untouched.

use crate::config::{Config, OutputFiles};
use crate::error::FeedError;
use crate::items::{ExclusionStats, ItemBuilder, build_items};
use crate::models::{FeedDocuments, FeedItem};
use crate::outputs::{self, OutputFile, legacy, page, write_files};
use crate::scrapers::changelog::{
    SectionPatterns, extract_sections, fetch_changelog, normalize_section,
};
use chrono::{NaiveDate, Utc};
use scraper::Html;
use std::path::Path;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Everything one run publishes.
#[derive(Debug, Clone)]
pub struct RunOutputs {
    pub items: Vec<FeedItem>,
    pub stats: ExclusionStats,
    pub canonical: FeedDocuments,
    pub legacy: Option<FeedDocuments>,
    pub page: String,
    pub icon: String,
}

impl RunOutputs {
    /// Files to write, named per `config`.
    pub fn files(&self, config: &Config) -> Vec<OutputFile> {
        let mut files = documents_to_files(&self.canonical, &config.outputs);
        if let Some(legacy) = &self.legacy {
            files.extend(documents_to_files(legacy, &config.legacy.files));
        }
        files.push(OutputFile::new("index.html", self.page.as_str()));
        files.push(OutputFile::new("favicon.svg", self.icon.as_str()));
        files
    }
}

fn documents_to_files(docs: &FeedDocuments, names: &OutputFiles) -> Vec<OutputFile> {
    vec![
        OutputFile::new(names.atom.as_str(), docs.atom.as_str()),
        OutputFile::new(names.json.as_str(), docs.json.as_str()),
        OutputFile::new(names.rss.as_str(), docs.rss.as_str()),
    ]
}

/// Build every output document from the changelog page.
///
/// `today` only affects the legacy feeds (sunset check and the migration
/// notice date); canonical output depends on `html` and `config` alone.
#[instrument(level = "info", skip_all, fields(bytes = html.len(), %today))]
pub fn build_outputs(html: &str, config: &Config, today: NaiveDate) -> Result<RunOutputs, FeedError> {
    let started = Instant::now();
    let patterns = SectionPatterns::from_config(&config.source)?;
    let builder = ItemBuilder::new(
        config.link_scheme,
        &config.source.url,
        &config.archive_url_template,
    )?;

    let document = Html::parse_document(html);
    let sections = extract_sections(&document, &patterns.section);
    if sections.is_empty() {
        return Err(FeedError::ExtractionEmpty {
            pattern: patterns.section.as_str().to_string(),
        });
    }
    let section_count = sections.len();

    let records = sections
        .into_iter()
        .map(|section| normalize_section(section, &patterns));
    let (items, stats) = build_items(&builder, records, config.max_items);
    if stats.total() > 0 {
        warn!(
            missing_version = stats.missing_version,
            missing_date = stats.missing_date,
            unparseable_date = stats.unparseable_date,
            duplicate_id = stats.duplicate_id,
            "Some changelog sections were excluded"
        );
    }

    let Some(newest) = items.first() else {
        return Err(FeedError::NothingToPublish {
            sections: section_count,
        });
    };
    let latest_version = newest.version.clone();

    let canonical = outputs::synthesize(&config.channel(), &items)?;
    let legacy = legacy::synthesize_legacy(config, &items, today)?;
    if config.outputs != OutputFiles::default() {
        warn!("Canonical feed files are renamed; index.html still links the default names");
    }
    let page = page::render_page(&latest_version);
    let icon = page::render_icon();

    info!(
        sections = section_count,
        items = items.len(),
        latest = %latest_version,
        legacy = legacy.is_some(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Built feeds"
    );

    Ok(RunOutputs {
        items,
        stats,
        canonical,
        legacy,
        page,
        icon,
    })
}

/// Fetch, build and write, using today's UTC date for the legacy feeds.
///
/// # Arguments
///
/// * `config` - Source, channel and output settings
/// * `output_dir` - Directory receiving every output file; created if missing
///
/// # Returns
///
/// The published [`RunOutputs`]. Nothing is written unless the fetch and the
/// build both succeeded.
pub async fn run(config: &Config, output_dir: &Path) -> Result<RunOutputs, FeedError> {
    run_on(config, output_dir, Utc::now().date_naive()).await
}

#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), %today))]
async fn run_on(config: &Config, output_dir: &Path, today: NaiveDate) -> Result<RunOutputs, FeedError> {
    let html = fetch_changelog(&config.source.url).await?;
    let outputs = build_outputs(&html, config, today)?;
    write_files(output_dir, &outputs.files(config)).await?;
    Ok(outputs)
}
