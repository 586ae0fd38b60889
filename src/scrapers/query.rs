//! Structural queries over a parsed page.
//!
//! Extraction code asks for "the first `h2 + p` under this section" instead
//! of walking nodes by hand. A [`Pattern`] is a compiled CSS selector, so a
//! relationship (descendant, adjacent sibling) is part of the pattern itself.

use crate::error::FeedError;
use scraper::{ElementRef, Selector};

/// A compiled structural pattern together with its source text.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    selector: Selector,
}

impl Pattern {
    /// Compile a CSS selector such as `main section` or `h2 + p`.
    pub fn parse(source: &str) -> Result<Self, FeedError> {
        let selector = Selector::parse(source).map_err(|e| FeedError::InvalidPattern {
            pattern: source.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            selector,
        })
    }

    /// The selector text this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Pattern queries over a node and its descendants.
pub trait Query<'a> {
    /// First descendant matching `pattern`, in document order.
    fn query_first(&self, pattern: &Pattern) -> Option<ElementRef<'a>>;

    /// All descendants matching `pattern`, in document order.
    fn query_all(&self, pattern: &Pattern) -> Vec<ElementRef<'a>>;
}

impl<'a> Query<'a> for ElementRef<'a> {
    fn query_first(&self, pattern: &Pattern) -> Option<ElementRef<'a>> {
        self.select(&pattern.selector).next()
    }

    fn query_all(&self, pattern: &Pattern) -> Vec<ElementRef<'a>> {
        self.select(&pattern.selector).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = Pattern::parse("section >").unwrap_err();
        assert!(matches!(err, FeedError::InvalidPattern { ref pattern, .. } if pattern == "section >"));
    }

    #[test]
    fn test_query_all_keeps_document_order() {
        let doc = Html::parse_document(
            "<main><section><h2>b</h2></section><section><h2>a</h2></section></main>",
        );
        let pattern = Pattern::parse("main section h2").unwrap();
        let texts: Vec<String> = doc
            .root_element()
            .query_all(&pattern)
            .into_iter()
            .map(|e| e.text().collect())
            .collect();
        assert_eq!(texts, vec!["b", "a"]);
    }

    #[test]
    fn test_query_first_adjacent_sibling() {
        let doc = Html::parse_document(
            "<section><p>intro</p><h2>1.0</h2><p>March 3rd, 2021</p><p>notes</p></section>",
        );
        let pattern = Pattern::parse("h2 + p").unwrap();
        let found = doc.root_element().query_first(&pattern).unwrap();
        assert_eq!(found.text().collect::<String>(), "March 3rd, 2021");
    }

    #[test]
    fn test_query_first_none_when_absent() {
        let doc = Html::parse_document("<section><p>no heading</p></section>");
        let pattern = Pattern::parse("h2").unwrap();
        assert!(doc.root_element().query_first(&pattern).is_none());
    }
}
