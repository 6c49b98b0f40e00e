//! Paginated collection of posts and their reactions.
//!
//! Both engines walk offset/page-number feeds: pages start at 1 and the walk
//! ends at the first empty page. Fetch errors abort the whole collection; no
//! partial result is surfaced as success.

use std::cmp::Reverse;

use chrono::SecondsFormat;
use tokio::sync::watch;

use gr_core::{Post, PostKind, ReactionOnPost, Reactions, RelativeDate};

use crate::models::{CommentRecord, IssueRecord, ReactionRecord};
use crate::{Client, GithubError, Repository};

/// Records fetched per page, and the cap on reactions read per post.
const PAGE_SIZE: u32 = 100;

/// Advisory progress for long fetch phases.
///
/// Purely informational: consumers render it, nothing reads it back into the
/// pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Progress {
    #[default]
    Idle,
    FetchingPosts {
        fetched: usize,
    },
    FetchingReactions {
        current: usize,
        total: usize,
        found: usize,
    },
}

/// Write-only handle for publishing [`Progress`] updates.
///
/// Updates overwrite the previous value and never block, so a slow or absent
/// reader cannot stall or deadlock the fetch pipeline.
#[derive(Debug, Clone)]
pub struct ProgressSender(watch::Sender<Progress>);

impl ProgressSender {
    /// Creates a progress channel.
    #[must_use]
    pub fn channel() -> (Self, watch::Receiver<Progress>) {
        let (sender, receiver) = watch::channel(Progress::Idle);
        (Self(sender), receiver)
    }

    /// Publishes an update, replacing whatever was there before.
    pub fn update(&self, progress: Progress) {
        self.0.send_replace(progress);
    }
}

/// Walks the issues/PRs and comments feeds and merges them into one
/// recency-sorted post list.
pub struct PostCollector<'a> {
    client: &'a Client,
    repo: &'a Repository,
    progress: ProgressSender,
}

impl<'a> PostCollector<'a> {
    pub const fn new(client: &'a Client, repo: &'a Repository, progress: ProgressSender) -> Self {
        Self {
            client,
            repo,
            progress,
        }
    }

    /// Fetches all posts newer than `since`, sorted by timestamp descending.
    ///
    /// Runs the issues/PRs walk and the comments walk to completion, then
    /// concatenates and sorts. Either walk failing fails the collection.
    pub async fn collect(&self, since: RelativeDate) -> Result<Vec<Post>, GithubError> {
        let mut posts = Vec::new();
        self.walk_issues(since, &mut posts).await?;
        self.walk_comments(since, &mut posts).await?;

        // Stable sort: ties keep their walk order.
        posts.sort_by_key(|post| Reverse(post.posted_at));
        tracing::debug!(count = posts.len(), "collected posts");
        Ok(posts)
    }

    async fn walk_issues(
        &self,
        since: RelativeDate,
        posts: &mut Vec<Post>,
    ) -> Result<(), GithubError> {
        let path = format!("repos/{}/{}/issues", self.repo.owner, self.repo.name);
        for page in 1u32.. {
            let query = feed_query(page, "commented", since);
            let records: Vec<IssueRecord> = self.client.get(&path, &query).await?;
            if records.is_empty() {
                break;
            }
            for record in records {
                posts.push(record.into_post(self.repo));
                self.progress.update(Progress::FetchingPosts {
                    fetched: posts.len(),
                });
            }
        }
        Ok(())
    }

    async fn walk_comments(
        &self,
        since: RelativeDate,
        posts: &mut Vec<Post>,
    ) -> Result<(), GithubError> {
        let path = format!(
            "repos/{}/{}/issues/comments",
            self.repo.owner, self.repo.name
        );
        for page in 1u32.. {
            let query = feed_query(page, "updated", since);
            let records: Vec<CommentRecord> = self.client.get(&path, &query).await?;
            if records.is_empty() {
                break;
            }
            for record in records {
                posts.push(record.into_post());
                self.progress.update(Progress::FetchingPosts {
                    fetched: posts.len(),
                });
            }
        }
        Ok(())
    }
}

fn feed_query(page: u32, sort: &str, since: RelativeDate) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("page", page.to_string()),
        ("per_page", PAGE_SIZE.to_string()),
        ("sort", sort.to_string()),
        ("direction", "desc".to_string()),
    ];
    if let Some(instant) = since.instant() {
        query.push((
            "since",
            instant.to_rfc3339_opts(SecondsFormat::Secs, true),
        ));
    }
    query
}

/// Fetches the reactions on each post, one call per post, into one flat
/// collection.
pub struct ReactionAggregator<'a> {
    client: &'a Client,
    repo: &'a Repository,
    progress: ProgressSender,
}

impl<'a> ReactionAggregator<'a> {
    pub const fn new(client: &'a Client, repo: &'a Repository, progress: ProgressSender) -> Self {
        Self {
            client,
            repo,
            progress,
        }
    }

    /// Accumulates the reactions on every post.
    ///
    /// Fail-fast: the first fetch error aborts the whole aggregation.
    pub async fn aggregate(&self, posts: &[Post]) -> Result<Reactions, GithubError> {
        let mut all = Reactions::new();
        for (index, post) in posts.iter().enumerate() {
            self.progress.update(Progress::FetchingReactions {
                current: index,
                total: posts.len(),
                found: all.len(),
            });
            let fetched = self.fetch_reactions(post).await?;
            all.append(fetched);
        }
        Ok(all)
    }

    /// Issues the single reaction fetch for one post.
    pub async fn fetch_reactions(&self, post: &Post) -> Result<Vec<ReactionOnPost>, GithubError> {
        let path = match post.kind {
            PostKind::Comment => format!(
                "repos/{}/{}/issues/comments/{}/reactions",
                self.repo.owner, self.repo.name, post.source_id
            ),
            PostKind::Issue | PostKind::PullRequest => format!(
                "repos/{}/{}/issues/{}/reactions",
                self.repo.owner, self.repo.name, post.source_id
            ),
        };

        let records: Vec<ReactionRecord> = self
            .client
            .get(&path, &[("per_page", PAGE_SIZE.to_string())])
            .await?;

        Ok(records
            .into_iter()
            .map(|record| ReactionOnPost {
                reaction: record.into_reaction(),
                post: post.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn feed_query_without_bound_has_no_since() {
        let query = feed_query(3, "updated", RelativeDate::UNSET);
        assert!(query.iter().any(|(key, value)| *key == "page" && value == "3"));
        assert!(query.iter().any(|(key, value)| *key == "per_page" && value == "100"));
        assert!(query.iter().all(|(key, _)| *key != "since"));
    }

    #[test]
    fn feed_query_with_bound_formats_rfc3339() {
        let bound = RelativeDate::new(Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
        let query = feed_query(1, "commented", bound);
        let since = query
            .iter()
            .find(|(key, _)| *key == "since")
            .map(|(_, value)| value.as_str());
        assert_eq!(since, Some("2025-03-01T12:00:00Z"));
    }

    #[test]
    fn progress_updates_never_block_without_a_reader() {
        let (sender, receiver) = ProgressSender::channel();
        drop(receiver);
        // A dropped receiver must not make publishing fail or hang.
        for fetched in 0..1000 {
            sender.update(Progress::FetchingPosts { fetched });
        }
    }

    #[test]
    fn progress_reader_sees_last_value_only() {
        let (sender, receiver) = ProgressSender::channel();
        sender.update(Progress::FetchingPosts { fetched: 1 });
        sender.update(Progress::FetchingPosts { fetched: 2 });
        assert_eq!(*receiver.borrow(), Progress::FetchingPosts { fetched: 2 });
    }
}
