//! Changelog scraping.
//!
//! - [`changelog`]: downloads the changelog page and turns its sections into
//!   [`NormalizedFields`](crate::models::NormalizedFields)
//! - [`query`]: structural pattern queries used by the extractor

pub mod changelog;
pub mod query;
