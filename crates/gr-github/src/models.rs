//! Wire shapes for the GitHub REST resources we read.
//!
//! These mirror only the fields the report consumes; everything else in the
//! API payloads is ignored. Normalization into the domain types happens here
//! so the collector deals in [`Post`] values only.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use gr_core::{Post, PostKind, Reaction, ReactionKind, UserRef};

use crate::Repository;

/// A user object as embedded in issues, comments, and reactions.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub login: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<UserRecord> for UserRef {
    fn from(record: UserRecord) -> Self {
        Self {
            login: record.login,
            name: record.name,
        }
    }
}

fn user_ref(record: Option<UserRecord>) -> UserRef {
    record.map(UserRef::from).unwrap_or_default()
}

/// One record from the issues feed.
///
/// Pull requests appear in the same feed, distinguished by the presence of a
/// `pull_request` marker object.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueRecord {
    pub number: u64,
    pub title: String,
    pub updated_at: DateTime<Utc>,
    pub user: Option<UserRecord>,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl IssueRecord {
    /// Normalizes the record into a [`Post`].
    #[must_use]
    pub fn into_post(self, repo: &Repository) -> Post {
        let kind = if self.pull_request.is_some() {
            PostKind::PullRequest
        } else {
            PostKind::Issue
        };
        Post {
            kind,
            posted_at: self.updated_at,
            content: self.title,
            author: user_ref(self.user),
            permalink: format!(
                "https://github.com/{}/{}/issues/{}",
                repo.owner, repo.name, self.number
            ),
            source_id: self.number.to_string(),
        }
    }
}

/// One record from the issue comments feed.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentRecord {
    pub id: u64,
    #[serde(default)]
    pub body: String,
    pub updated_at: DateTime<Utc>,
    pub user: Option<UserRecord>,
    pub html_url: String,
}

impl CommentRecord {
    /// Normalizes the record into a [`Post`].
    #[must_use]
    pub fn into_post(self) -> Post {
        Post {
            kind: PostKind::Comment,
            posted_at: self.updated_at,
            content: self.body,
            author: user_ref(self.user),
            permalink: self.html_url,
            source_id: self.id.to_string(),
        }
    }
}

/// One record from a reactions listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ReactionRecord {
    pub user: Option<UserRecord>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ReactionRecord {
    /// Normalizes the record into a [`Reaction`].
    #[must_use]
    pub fn into_reaction(self) -> Reaction {
        Reaction {
            kind: ReactionKind::from_raw(&self.content),
            user: user_ref(self.user),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_repo() -> Repository {
        Repository {
            owner: "octo".to_string(),
            name: "repo".to_string(),
        }
    }

    #[test]
    fn issue_record_normalizes_to_issue_post() {
        let json = r#"{
            "number": 42,
            "title": "Broken build on main",
            "updated_at": "2025-03-01T10:00:00Z",
            "user": {"login": "alice"}
        }"#;
        let record: IssueRecord = serde_json::from_str(json).unwrap();
        let post = record.into_post(&test_repo());

        assert_eq!(post.kind, PostKind::Issue);
        assert_eq!(post.content, "Broken build on main");
        assert_eq!(post.author.login.as_deref(), Some("alice"));
        assert_eq!(post.permalink, "https://github.com/octo/repo/issues/42");
        assert_eq!(post.source_id, "42");
    }

    #[test]
    fn pull_request_marker_switches_kind() {
        let json = r#"{
            "number": 7,
            "title": "Add retry logic",
            "updated_at": "2025-03-01T10:00:00Z",
            "user": {"login": "bob"},
            "pull_request": {"url": "https://api.github.com/repos/octo/repo/pulls/7"}
        }"#;
        let record: IssueRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.into_post(&test_repo()).kind, PostKind::PullRequest);
    }

    #[test]
    fn issue_record_tolerates_missing_user() {
        let json = r#"{
            "number": 9,
            "title": "Ghost issue",
            "updated_at": "2025-03-01T10:00:00Z",
            "user": null
        }"#;
        let record: IssueRecord = serde_json::from_str(json).unwrap();
        let post = record.into_post(&test_repo());
        assert_eq!(post.author.login, None);
    }

    #[test]
    fn comment_record_normalizes_to_comment_post() {
        let json = r#"{
            "id": 123456,
            "body": "Thanks, merged!",
            "updated_at": "2025-03-02T11:30:00Z",
            "user": {"login": "carol", "name": "Carol"},
            "html_url": "https://github.com/octo/repo/issues/42#issuecomment-123456"
        }"#;
        let record: CommentRecord = serde_json::from_str(json).unwrap();
        let post = record.into_post();

        assert_eq!(post.kind, PostKind::Comment);
        assert_eq!(post.content, "Thanks, merged!");
        assert_eq!(post.source_id, "123456");
        assert_eq!(
            post.permalink,
            "https://github.com/octo/repo/issues/42#issuecomment-123456"
        );
    }

    #[test]
    fn reaction_record_maps_known_and_unknown_kinds() {
        let json = r#"{
            "user": {"login": "dave"},
            "content": "+1",
            "created_at": "2025-03-03T09:00:00Z"
        }"#;
        let record: ReactionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.into_reaction().kind, ReactionKind::ThumbsUp);

        let json = r#"{
            "user": null,
            "content": "sparkles",
            "created_at": "2025-03-03T09:00:00Z"
        }"#;
        let record: ReactionRecord = serde_json::from_str(json).unwrap();
        let reaction = record.into_reaction();
        assert_eq!(
            reaction.kind,
            ReactionKind::Unknown("sparkles".to_string())
        );
        assert_eq!(reaction.user.login, None);
    }
}
