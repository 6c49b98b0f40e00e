//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

use gr_core::RelativeDate;

/// Reports who reacted to posts in a GitHub repository.
///
/// Walks the issues and comments feeds, fetches the reactions on each post,
/// and prints ranked summaries of who reacted, with what, and how often.
#[derive(Debug, Parser)]
#[command(name = "gh-reactions", version, about, long_about = None)]
pub struct Cli {
    /// Limit to posts authored by this GitHub login (case-insensitive).
    #[arg(long)]
    pub author: Option<String>,

    /// Maximum number of posts to analyze (0 or less means unlimited).
    #[arg(long, default_value_t = 50)]
    pub limit: i64,

    /// Analyze posts since this date: "2024-01-02", an RFC 3339 timestamp,
    /// or a relative offset like "2h", "15m", "3d", "1y2w3d4h".
    /// Defaults to 90 days ago.
    #[arg(long)]
    pub since: Option<RelativeDate>,

    /// Repository to analyze as "owner/name". Defaults to the current
    /// checkout's origin remote (or the GH_REPO environment variable).
    #[arg(long)]
    pub repo: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["gh-reactions"]);
        assert_eq!(cli.limit, 50);
        assert!(cli.author.is_none());
        assert!(cli.since.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn parses_since_expression() {
        let cli = Cli::parse_from(["gh-reactions", "--since", "3d"]);
        assert!(cli.since.is_some_and(|since| !since.is_unset()));
    }

    #[test]
    fn rejects_malformed_since() {
        let result = Cli::try_parse_from(["gh-reactions", "--since", "3d3w"]);
        assert!(result.is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
