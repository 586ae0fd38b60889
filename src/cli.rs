//! Command-line interface definitions for the Playdate SDK feed builder.
//!
//! Every option has a default, so a bare `playdate_sdk_feed` performs a full
//! build into `./public`.

use clap::Parser;

/// Command-line arguments for one feed build.
///
/// # Examples
///
/// ```sh
/// # Build into ./public with built-in settings
/// playdate_sdk_feed
///
/// # Override settings from a YAML file and skip the legacy locations
/// playdate_sdk_feed -c feed.yaml --no-legacy
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for feeds, page and icon
    #[arg(short, long, default_value = "public")]
    pub output_dir: String,

    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Do not write the transitional feeds at the legacy locations
    #[arg(long)]
    pub no_legacy: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["playdate_sdk_feed"]);

        assert_eq!(cli.output_dir, "public");
        assert!(cli.config.is_none());
        assert!(!cli.no_legacy);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "playdate_sdk_feed",
            "-o",
            "/tmp/site",
            "-c",
            "/tmp/feed.yaml",
            "--no-legacy",
        ]);

        assert_eq!(cli.output_dir, "/tmp/site");
        assert_eq!(cli.config.as_deref(), Some("/tmp/feed.yaml"));
        assert!(cli.no_legacy);
    }
}
