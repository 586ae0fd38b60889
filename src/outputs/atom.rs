//! Atom 1.0 serialization.

use super::{rfc3339, text_element};
use crate::error::BoxError;
use crate::models::{Channel, FeedItem};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Serialize `items` as an Atom feed. `<updated>` is the newest item's date
/// and is omitted when there are no items.
pub fn atom1(channel: &Channel, items: &[FeedItem]) -> Result<String, BoxError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("feed").with_attributes([("xmlns", ATOM_NS)]),
    ))?;

    text_element(&mut writer, "id", &channel.id)?;
    text_element(&mut writer, "title", &channel.title)?;
    if let Some(newest) = items.first() {
        text_element(&mut writer, "updated", &rfc3339(newest.published()))?;
    }
    text_element(&mut writer, "generator", &channel.generator)?;

    writer.write_event(Event::Start(BytesStart::new("author")))?;
    text_element(&mut writer, "name", &channel.author.name)?;
    text_element(&mut writer, "uri", &channel.author.link)?;
    writer.write_event(Event::End(BytesEnd::new("author")))?;

    writer
        .create_element("link")
        .with_attributes([("rel", "alternate"), ("href", channel.link.as_str())])
        .write_empty()?;
    writer
        .create_element("link")
        .with_attributes([("rel", "self"), ("href", channel.feed_links.atom.as_str())])
        .write_empty()?;
    text_element(&mut writer, "subtitle", &channel.description)?;
    text_element(&mut writer, "rights", &channel.copyright)?;

    for item in items {
        writer.write_event(Event::Start(BytesStart::new("entry")))?;
        text_element(&mut writer, "title", &item.version)?;
        text_element(&mut writer, "id", &item.id)?;
        writer
            .create_element("link")
            .with_attribute(("href", item.link.as_str()))
            .write_empty()?;
        text_element(&mut writer, "updated", &rfc3339(item.published()))?;
        text_element(&mut writer, "published", &rfc3339(item.published()))?;
        if let Some(html) = &item.content_html {
            writer
                .create_element("content")
                .with_attribute(("type", "html"))
                .write_text_content(BytesText::new(html))?;
        }
        writer.write_event(Event::End(BytesEnd::new("entry")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("feed")))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::tests::{channel, item};

    #[test]
    fn test_atom_header_and_updated() {
        let items = vec![item("2.1.0", 2023, 7, 21), item("2.0.0", 2023, 6, 1)];
        let xml = atom1(&channel(), &items).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(xml.contains(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#));
        let header = &xml[..xml.find("<entry>").unwrap()];
        assert!(header.contains("<updated>2023-07-21T00:00:00.000Z</updated>"));
        assert!(!header.contains("2023-06-01"));
        assert!(xml.contains(r#"<link rel="self" href="https://example.com/feeds/atom.xml"/>"#));
        assert_eq!(xml.matches("<entry>").count(), 2);
    }

    #[test]
    fn test_atom_escapes_content() {
        let xml = atom1(&channel(), &[item("2.1.0", 2023, 7, 21)]).unwrap();
        assert!(xml.contains("&lt;div&gt;notes for 2.1.0&lt;/div&gt;"));
        assert!(!xml.contains("<div>"));
    }

    #[test]
    fn test_atom_empty_has_no_updated() {
        let xml = atom1(&channel(), &[]).unwrap();
        assert!(!xml.contains("<updated>"));
        assert!(!xml.contains("<entry>"));
        assert!(xml.trim_end().ends_with("</feed>"));
    }
}
