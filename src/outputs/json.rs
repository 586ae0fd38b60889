//! JSON Feed serialization.
//!
//! Follows JSON Feed version 1 (<https://jsonfeed.org/version/1>). Items
//! always carry `content_html`, empty when the section had no body, since the
//! format requires either HTML or text content.

use super::rfc3339;
use crate::error::BoxError;
use crate::models::{Channel, FeedItem};
use serde::Serialize;

const JSON_FEED_VERSION: &str = "https://jsonfeed.org/version/1";

#[derive(Debug, Serialize)]
struct JsonFeed<'a> {
    version: &'static str,
    title: &'a str,
    home_page_url: &'a str,
    feed_url: &'a str,
    description: &'a str,
    author: JsonAuthor<'a>,
    items: Vec<JsonItem<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonAuthor<'a> {
    name: &'a str,
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonItem<'a> {
    id: &'a str,
    url: &'a str,
    title: &'a str,
    content_html: &'a str,
    date_modified: String,
    date_published: String,
}

impl<'a> From<&'a FeedItem> for JsonItem<'a> {
    fn from(item: &'a FeedItem) -> Self {
        let date = rfc3339(item.published());
        Self {
            id: &item.id,
            url: &item.link,
            title: &item.version,
            content_html: item.content_html.as_deref().unwrap_or_default(),
            date_modified: date.clone(),
            date_published: date,
        }
    }
}

/// Serialize `items` as a pretty-printed JSON Feed.
pub fn json1(channel: &Channel, items: &[FeedItem]) -> Result<String, BoxError> {
    let feed = JsonFeed {
        version: JSON_FEED_VERSION,
        title: &channel.title,
        home_page_url: &channel.link,
        feed_url: &channel.feed_links.json,
        description: &channel.description,
        author: JsonAuthor {
            name: &channel.author.name,
            url: &channel.author.link,
        },
        items: items.iter().map(JsonItem::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&feed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::tests::{channel, item};
    use serde_json::Value;

    #[test]
    fn test_json_feed_shape() {
        let items = vec![item("2.1.0", 2023, 7, 21), item("2.0.0", 2023, 6, 1)];
        let parsed: Value = serde_json::from_str(&json1(&channel(), &items).unwrap()).unwrap();

        assert_eq!(parsed["version"], JSON_FEED_VERSION);
        assert_eq!(parsed["feed_url"], "https://example.com/feeds/feed.json");
        assert_eq!(parsed["items"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["items"][0]["title"], "2.1.0");
        assert_eq!(parsed["items"][0]["date_published"], "2023-07-21T00:00:00.000Z");
        assert_eq!(parsed["items"][1]["id"], "https://example.com/changelog/#_2_0_0");
    }

    #[test]
    fn test_json_feed_missing_body_is_empty_html() {
        let mut bare = item("1.0.0", 2020, 1, 1);
        bare.content_html = None;
        let parsed: Value = serde_json::from_str(&json1(&channel(), &[bare]).unwrap()).unwrap();
        assert_eq!(parsed["items"][0]["content_html"], "");
    }
}
