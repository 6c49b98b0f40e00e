//! Posts - the unified issue / pull request / comment value.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rank::DisplayKey;
use crate::timeago;

/// The kind of post a reaction can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostKind {
    Issue,
    PullRequest,
    Comment,
}

impl PostKind {
    /// String representation for display and logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::PullRequest => "pull_request",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user handle with an optional display name.
///
/// GitHub can return records without a user (deleted accounts), so the login
/// itself is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// The account login, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,

    /// The profile display name, when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UserRef {
    /// URL of the user's GitHub profile, empty when the login is unknown.
    #[must_use]
    pub fn profile_url(&self) -> String {
        self.login
            .as_deref()
            .map(|login| format!("https://github.com/{login}"))
            .unwrap_or_default()
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(login) = self.login.as_deref() else {
            return write!(f, "unknown");
        };
        match self.name.as_deref() {
            Some(name) if !name.is_empty() && name != login => write!(f, "{name} ({login})"),
            _ => write!(f, "{login}"),
        }
    }
}

impl DisplayKey for UserRef {
    /// Users rank by their rendered form: `"Name (login)"`, `"login"`, or
    /// `"unknown"`.
    fn display_key(&self) -> String {
        self.to_string()
    }
}

/// A post authored by a user, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// What kind of record the post came from.
    pub kind: PostKind,

    /// When the post was last touched, per the source feed.
    pub posted_at: DateTime<Utc>,

    /// Title (issues, pull requests) or body text (comments).
    pub content: String,

    /// Who wrote the post.
    pub author: UserRef,

    /// Web link to the post.
    pub permalink: String,

    /// The source record's identifier, used for follow-up fetches.
    pub source_id: String,
}

const PREVIEW_MAX_CHARS: usize = 100;

impl Post {
    /// A one-line preview of the post content.
    ///
    /// Skips quoted reply lines and blank lines, then truncates to 100
    /// characters, preferring to cut at a word boundary.
    #[must_use]
    pub fn content_preview(&self) -> String {
        let mut content = self.content.as_str();
        for line in self.content.lines() {
            if line.starts_with('>') {
                // quoted reply
                continue;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            content = line;
            break;
        }
        truncate(content, PREVIEW_MAX_CHARS)
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Post message: {}", self.content_preview())?;
        writeln!(f, "Post type:    {}", self.kind)?;
        writeln!(f, "Post author:  {}", self.author)?;
        writeln!(f, "Post date:    {}", timeago::since(self.posted_at))?;
        writeln!(f, "Post link:    {}", self.permalink)
    }
}

impl DisplayKey for Post {
    /// Posts rank by their permalink, the same key grouping uses.
    fn display_key(&self) -> String {
        self.permalink.clone()
    }
}

/// Strips leading and trailing punctuation and whitespace noise.
fn clean_edges(content: &str) -> &str {
    content.trim_matches(['.', ',', '…', ' ', '\n', '\r', '\t'])
}

fn truncate(content: &str, max_chars: usize) -> String {
    let content = clean_edges(content);
    if content.chars().count() < max_chars {
        return content.to_string();
    }

    let cut: String = content.chars().take(max_chars).collect();
    // Prefer a word boundary; fall back to a hard cut.
    let cut = match cut.rfind(' ') {
        Some(space) => &cut[..space],
        None => cut.as_str(),
    };
    format!("{} …", clean_edges(cut))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_content(content: &str) -> Post {
        Post {
            kind: PostKind::Comment,
            posted_at: Utc::now(),
            content: content.to_string(),
            author: UserRef::default(),
            permalink: "https://github.com/octo/repo/issues/1".to_string(),
            source_id: "1".to_string(),
        }
    }

    #[test]
    fn preview_skips_quoted_and_blank_lines() {
        let post = post_with_content("> quoted reply\n\n  the actual answer\nmore text");
        assert_eq!(post.content_preview(), "the actual answer");
    }

    #[test]
    fn preview_of_short_content_is_unchanged() {
        let post = post_with_content("a short title");
        assert_eq!(post.content_preview(), "a short title");
    }

    #[test]
    fn preview_truncates_at_word_boundary() {
        let long = format!("{} tail-word", "word ".repeat(30));
        let post = post_with_content(&long);
        let preview = post.content_preview();
        assert!(preview.ends_with(" …"), "got {preview}");
        assert!(preview.chars().count() <= 102);
    }

    #[test]
    fn preview_hard_cuts_unbroken_text() {
        let post = post_with_content(&"x".repeat(250));
        let preview = post.content_preview();
        assert_eq!(preview, format!("{} …", "x".repeat(100)));
    }

    #[test]
    fn preview_trims_edge_punctuation() {
        let post = post_with_content("  interesting, isn't it?... ");
        assert_eq!(post.content_preview(), "interesting, isn't it?");
    }

    #[test]
    fn user_display_forms() {
        let unknown = UserRef::default();
        assert_eq!(unknown.to_string(), "unknown");
        assert_eq!(unknown.profile_url(), "");

        let plain = UserRef {
            login: Some("octocat".to_string()),
            name: None,
        };
        assert_eq!(plain.to_string(), "octocat");
        assert_eq!(plain.profile_url(), "https://github.com/octocat");

        let named = UserRef {
            login: Some("octocat".to_string()),
            name: Some("The Octocat".to_string()),
        };
        assert_eq!(named.to_string(), "The Octocat (octocat)");

        let same = UserRef {
            login: Some("octocat".to_string()),
            name: Some("octocat".to_string()),
        };
        assert_eq!(same.to_string(), "octocat");
    }

    #[test]
    fn post_kind_round_trips_through_serde() {
        let json = serde_json::to_string(&PostKind::PullRequest).unwrap();
        assert_eq!(json, "\"pull_request\"");
        let parsed: PostKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, PostKind::PullRequest);
    }
}
