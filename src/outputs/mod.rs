//! Feed synthesis and output files.
//!
//! # Submodules
//!
//! - [`atom`], [`rss`], [`json`]: one serializer per syndication format
//! - [`legacy`]: transitional copy of the feeds at their old locations
//! - [`page`]: companion `index.html` and `favicon.svg`
//!
//! # Output Structure
//!
//! ```text
//! public/
//! ├── atom.xml      # canonical feeds
//! ├── feed.json
//! ├── rss.xml
//! ├── atom          # legacy feeds, until the sunset date
//! ├── json
//! ├── rss
//! ├── index.html
//! └── favicon.svg
//! ```

pub mod atom;
pub mod json;
pub mod legacy;
pub mod page;
pub mod rss;

use crate::error::{BoxError, FeedError};
use crate::models::{Channel, FeedDocuments, FeedItem};
use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::try_join_all;
use quick_xml::Writer;
use quick_xml::events::BytesText;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Build all three documents from the complete item list.
///
/// # Arguments
///
/// * `channel` - Metadata shared by the three documents
/// * `items` - Every item to publish, newest first
///
/// # Returns
///
/// Atom, JSON Feed and RSS text. Items are serialized in the order given.
/// The channel's update time is the newest item's release date; with no
/// items it is left out rather than invented.
pub fn synthesize(channel: &Channel, items: &[FeedItem]) -> Result<FeedDocuments, FeedError> {
    let serialize = |format: &'static str, result: Result<String, BoxError>| {
        result.map_err(|source| FeedError::Serialize { format, source })
    };

    Ok(FeedDocuments {
        atom: serialize("atom", atom::atom1(channel, items))?,
        json: serialize("json", json::json1(channel, items))?,
        rss: serialize("rss", rss::rss2(channel, items))?,
    })
}

/// One file to write, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    pub contents: String,
}

impl OutputFile {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Write every file into `output_dir`, creating it if needed.
///
/// # Arguments
///
/// * `output_dir` - Target directory; an existing one is reused
/// * `files` - Names relative to `output_dir` and their contents
///
/// # Returns
///
/// `Ok(())` once every file is written. Existing files are overwritten.
/// Writes run concurrently and the first failure is returned.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), files = files.len()))]
pub async fn write_files(output_dir: &Path, files: &[OutputFile]) -> Result<(), FeedError> {
    fs::create_dir_all(output_dir).await?;

    try_join_all(files.iter().map(|file| async move {
        let path = output_dir.join(&file.name);
        fs::write(&path, &file.contents).await?;
        info!(path = %path.display(), bytes = file.contents.len(), "Wrote output file");
        Ok::<(), FeedError>(())
    }))
    .await?;

    Ok(())
}

/// `2023-07-21T00:00:00.000Z`
pub(crate) fn rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `Fri, 21 Jul 2023 00:00:00 GMT`
pub(crate) fn rfc822(date: DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// `<name>text</name>` with `text` escaped.
pub(crate) fn text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), BoxError> {
    writer
        .create_element(name)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Author, FeedLinks};
    use chrono::NaiveDate;

    pub(crate) fn channel() -> Channel {
        Channel {
            title: "Test Changelog".into(),
            description: "Releases".into(),
            id: "https://example.com/feeds".into(),
            link: "https://example.com/feeds".into(),
            language: "en".into(),
            generator: "test".into(),
            copyright: "Public Domain".into(),
            author: Author {
                name: "tester".into(),
                link: "https://example.com/tester".into(),
            },
            feed_links: FeedLinks {
                atom: "https://example.com/feeds/atom.xml".into(),
                json: "https://example.com/feeds/feed.json".into(),
                rss: "https://example.com/feeds/rss.xml".into(),
            },
        }
    }

    pub(crate) fn item(version: &str, y: i32, m: u32, d: u32) -> FeedItem {
        let id = format!("https://example.com/changelog/#_{}", version.replace('.', "_"));
        FeedItem {
            version: version.into(),
            release_date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            link: id.clone(),
            id,
            content_html: Some(format!("<div>notes for {}</div>", version)),
        }
    }

    #[test]
    fn test_synthesize_is_deterministic() {
        let items = vec![item("2.1.0", 2023, 7, 21), item("2.0.0", 2023, 6, 1)];
        let first = synthesize(&channel(), &items).unwrap();
        let second = synthesize(&channel(), &items).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_synthesize_same_items_in_every_format() {
        let items = vec![item("2.1.0", 2023, 7, 21), item("2.0.0", 2023, 6, 1)];
        let docs = synthesize(&channel(), &items).unwrap();

        for doc in [&docs.atom, &docs.json, &docs.rss] {
            let newer = doc.find("#_2_1_0").unwrap();
            let older = doc.find("#_2_0_0").unwrap();
            assert!(newer < older);
        }
    }

    #[test]
    fn test_synthesize_empty_does_not_fail() {
        let docs = synthesize(&channel(), &[]).unwrap();
        assert!(!docs.atom.contains("<updated>"));
        assert!(!docs.rss.contains("<lastBuildDate>"));
        assert!(docs.json.contains("\"items\": []"));
    }

    #[test]
    fn test_date_formats() {
        let date = NaiveDate::from_ymd_opt(2023, 7, 21)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();
        assert_eq!(rfc3339(date), "2023-07-21T00:00:00.000Z");
        assert_eq!(rfc822(date), "Fri, 21 Jul 2023 00:00:00 GMT");
    }

    #[tokio::test]
    async fn test_write_files_creates_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("public");
        let files = vec![
            OutputFile::new("atom.xml", "<feed/>"),
            OutputFile::new("feed.json", "{}"),
        ];

        write_files(&out, &files).await.unwrap();
        // Second run into an existing directory must succeed too.
        write_files(&out, &[OutputFile::new("atom.xml", "<feed></feed>")])
            .await
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(out.join("atom.xml")).unwrap(),
            "<feed></feed>"
        );
        assert_eq!(std::fs::read_to_string(out.join("feed.json")).unwrap(), "{}");
    }
}
