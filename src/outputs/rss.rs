//! RSS 2.0 serialization.

use super::{rfc822, text_element};
use crate::error::BoxError;
use crate::models::{Channel, FeedItem};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

const RSS_DOCS: &str = "https://validator.w3.org/feed/docs/rss2.html";

/// Serialize `items` as an RSS 2.0 channel. `<lastBuildDate>` is the newest
/// item's date and is omitted when there are no items.
pub fn rss2(channel: &Channel, items: &[FeedItem]) -> Result<String, BoxError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("rss").with_attributes([
        ("version", "2.0"),
        ("xmlns:atom", "http://www.w3.org/2005/Atom"),
    ])))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    text_element(&mut writer, "title", &channel.title)?;
    text_element(&mut writer, "link", &channel.link)?;
    text_element(&mut writer, "description", &channel.description)?;
    if let Some(newest) = items.first() {
        text_element(&mut writer, "lastBuildDate", &rfc822(newest.published()))?;
    }
    text_element(&mut writer, "docs", RSS_DOCS)?;
    text_element(&mut writer, "generator", &channel.generator)?;
    text_element(&mut writer, "language", &channel.language)?;
    text_element(&mut writer, "copyright", &channel.copyright)?;
    writer
        .create_element("atom:link")
        .with_attributes([
            ("href", channel.feed_links.rss.as_str()),
            ("rel", "self"),
            ("type", "application/rss+xml"),
        ])
        .write_empty()?;

    for item in items {
        writer.write_event(Event::Start(BytesStart::new("item")))?;
        text_element(&mut writer, "title", &item.version)?;
        text_element(&mut writer, "link", &item.link)?;
        writer
            .create_element("guid")
            .with_attribute(("isPermaLink", "false"))
            .write_text_content(BytesText::new(&item.id))?;
        text_element(&mut writer, "pubDate", &rfc822(item.published()))?;
        if let Some(html) = &item.content_html {
            text_element(&mut writer, "description", html)?;
        }
        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::tests::{channel, item};

    #[test]
    fn test_rss_channel_dates() {
        let items = vec![item("2.1.0", 2023, 7, 21), item("2.0.0", 2023, 6, 1)];
        let xml = rss2(&channel(), &items).unwrap();

        assert!(xml.contains("<lastBuildDate>Fri, 21 Jul 2023 00:00:00 GMT</lastBuildDate>"));
        assert!(xml.contains("<pubDate>Thu, 01 Jun 2023 00:00:00 GMT</pubDate>"));
        assert!(xml.contains(
            r#"<guid isPermaLink="false">https://example.com/changelog/#_2_1_0</guid>"#
        ));
        assert!(xml.contains(r#"<atom:link href="https://example.com/feeds/rss.xml" rel="self" type="application/rss+xml"/>"#));
    }

    #[test]
    fn test_rss_items_newest_first() {
        let items = vec![item("2.1.0", 2023, 7, 21), item("2.0.0", 2023, 6, 1)];
        let xml = rss2(&channel(), &items).unwrap();

        let newer = xml.find("<title>2.1.0</title>").unwrap();
        let older = xml.find("<title>2.0.0</title>").unwrap();
        assert!(newer < older);
    }
}
