//! Error types for a feed build run.
//!
//! Only conditions that must stop the whole run live here. Problems with a
//! single changelog section are not errors: they are reported as
//! [`crate::items::Exclusion`] values, counted, and logged.

use thiserror::Error;

/// Boxed error returned by the format serializers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Fatal errors that abort a run before any output file is written.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The changelog page could not be fetched or returned a non-success status.
    #[error("changelog source {url} unavailable: {reason}")]
    SourceUnavailable { url: String, reason: String },

    /// The page parsed but no changelog section matched the section pattern.
    #[error("no changelog sections matched pattern `{pattern}`")]
    ExtractionEmpty { pattern: String },

    /// Sections were found but every one of them was excluded.
    #[error("all {sections} changelog sections were excluded; nothing to publish")]
    NothingToPublish { sections: usize },

    /// A configured structural pattern is not a valid selector.
    #[error("invalid selector `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to read config: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("failed to serialize {format} feed: {source}")]
    Serialize {
        format: &'static str,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FeedError {
    /// Process exit status for this error.
    ///
    /// Source and extraction failures get their own codes so a scheduler can
    /// tell "the site is down" apart from "the site changed its markup".
    pub fn exit_status(&self) -> u8 {
        match self {
            FeedError::SourceUnavailable { .. } => 2,
            FeedError::ExtractionEmpty { .. } => 3,
            FeedError::NothingToPublish { .. } => 4,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let unavailable = FeedError::SourceUnavailable {
            url: "https://example.com".into(),
            reason: "timeout".into(),
        };
        let empty = FeedError::ExtractionEmpty {
            pattern: "main section".into(),
        };
        let nothing = FeedError::NothingToPublish { sections: 3 };

        assert_eq!(unavailable.exit_status(), 2);
        assert_eq!(empty.exit_status(), 3);
        assert_eq!(nothing.exit_status(), 4);
    }

    #[test]
    fn test_display_names_pattern() {
        let err = FeedError::ExtractionEmpty {
            pattern: "main section".into(),
        };
        assert_eq!(
            err.to_string(),
            "no changelog sections matched pattern `main section`"
        );
    }
}
