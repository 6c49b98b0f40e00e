//! Reactions and the grouping operations over them.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};

use crate::post::{Post, UserRef};
use crate::rank::{DisplayKey, ValueCount, ValueCounts};

/// The fixed set of GitHub reaction kinds, plus a catch-all.
///
/// Unrecognized kinds keep their raw API string so they still count
/// distinctly instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReactionKind {
    ThumbsUp,
    ThumbsDown,
    Eyes,
    Heart,
    Laugh,
    Hooray,
    Confused,
    Rocket,
    Unknown(String),
}

impl ReactionKind {
    /// Maps the API `content` field to a kind.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "+1" => Self::ThumbsUp,
            "-1" => Self::ThumbsDown,
            "eyes" => Self::Eyes,
            "heart" => Self::Heart,
            "laugh" => Self::Laugh,
            "hooray" => Self::Hooray,
            "confused" => Self::Confused,
            "rocket" => Self::Rocket,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThumbsUp => write!(f, "👍"),
            Self::ThumbsDown => write!(f, "👎"),
            Self::Eyes => write!(f, "👀"),
            Self::Heart => write!(f, "❤️"),
            Self::Laugh => write!(f, "😂"),
            Self::Hooray => write!(f, "🙌"),
            Self::Confused => write!(f, "😕"),
            Self::Rocket => write!(f, "🚀"),
            Self::Unknown(raw) => write!(f, "🤷 unknown reaction {raw}"),
        }
    }
}

impl DisplayKey for ReactionKind {
    /// Kinds rank by their display symbol, the same key grouping uses.
    fn display_key(&self) -> String {
        self.to_string()
    }
}

/// A single emoji response left on a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    /// Who reacted.
    pub user: UserRef,

    /// What they reacted with.
    pub kind: ReactionKind,

    /// When the reaction was created.
    pub created_at: DateTime<Utc>,
}

/// A reaction paired with the post it targets.
///
/// The pairing is established at fetch time and never re-pointed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionOnPost {
    pub reaction: Reaction,
    pub post: Post,
}

/// Automation logins excluded from aggregate stats.
///
/// Matching is case-insensitive. The set is injectable configuration, not a
/// hardcoded literal, so deployments can extend it.
#[derive(Debug, Clone)]
pub struct BotLogins(HashSet<String>);

impl BotLogins {
    pub fn new<I, S>(logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            logins
                .into_iter()
                .map(|login| login.into().to_lowercase())
                .collect(),
        )
    }

    /// Reports whether `login` is a known automation account.
    #[must_use]
    pub fn contains(&self, login: &str) -> bool {
        self.0.contains(&login.to_lowercase())
    }

    /// Reports whether the user is a known automation account.
    ///
    /// Users without a login are not considered bots.
    #[must_use]
    pub fn is_bot(&self, user: &UserRef) -> bool {
        user.login
            .as_deref()
            .is_some_and(|login| self.contains(login))
    }
}

impl Default for BotLogins {
    /// The automation accounts commonly seen reacting on GitHub.
    fn default() -> Self {
        Self::new([
            "coderabbitai[bot]",
            "dependabot[bot]",
            "github-actions[bot]",
            "renovate[bot]", // renovate is the old name for mend
            "mend[bot]",     // mend is the new name for renovate
            "codecov-commenter",
        ])
    }
}

/// The flat collection of reactions gathered across posts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reactions(Vec<ReactionOnPost>);

impl Reactions {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn append(&mut self, more: Vec<ReactionOnPost>) {
        self.0.extend(more);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReactionOnPost> {
        self.0.iter()
    }

    /// Drops reactions from automation accounts and orders the remainder by
    /// reaction time ascending.
    ///
    /// Pure and idempotent: applying it twice yields the same collection as
    /// applying it once.
    pub fn clean(&mut self, bots: &BotLogins) {
        let before = self.0.len();
        self.0.retain(|entry| !bots.is_bot(&entry.reaction.user));
        if self.0.len() < before {
            tracing::debug!(dropped = before - self.0.len(), "filtered bot reactions");
        }
        self.0.sort_by_key(|entry| entry.reaction.created_at);
    }

    /// Counts reactions per reacting user.
    ///
    /// Reactions whose user has no login are skipped (data-quality skip, not
    /// an error).
    #[must_use]
    pub fn by_reacting_user(&self) -> ValueCounts<UserRef> {
        self.group_by(|entry| {
            let login = entry.reaction.user.login.clone()?;
            Some((login, entry.reaction.user.clone()))
        })
    }

    /// Counts reactions per post author.
    ///
    /// Reactions on posts whose author has no login are skipped.
    #[must_use]
    pub fn by_post_author(&self) -> ValueCounts<UserRef> {
        self.group_by(|entry| {
            let login = entry.post.author.login.clone()?;
            Some((login, entry.post.author.clone()))
        })
    }

    /// Counts reactions per post, keyed by permalink.
    #[must_use]
    pub fn by_post(&self) -> ValueCounts<Post> {
        self.group_by(|entry| Some((entry.post.permalink.clone(), entry.post.clone())))
    }

    /// Counts reactions per kind, keyed by the rendered display symbol.
    ///
    /// Unrecognized kinds count under their own symbol rather than being
    /// dropped.
    #[must_use]
    pub fn by_reaction_kind(&self) -> ValueCounts<ReactionKind> {
        self.group_by(|entry| {
            Some((
                entry.reaction.kind.display_key(),
                entry.reaction.kind.clone(),
            ))
        })
    }

    fn group_by<T>(
        &self,
        key_value: impl Fn(&ReactionOnPost) -> Option<(String, T)>,
    ) -> ValueCounts<T> {
        let mut grouped: HashMap<String, ValueCount<T>> = HashMap::new();
        for entry in &self.0 {
            let Some((key, value)) = key_value(entry) else {
                continue;
            };
            grouped
                .entry(key)
                .and_modify(|existing| existing.count += 1)
                .or_insert(ValueCount { value, count: 1 });
        }
        grouped.into_values().collect()
    }
}

impl<'a> IntoIterator for &'a Reactions {
    type Item = &'a ReactionOnPost;
    type IntoIter = std::slice::Iter<'a, ReactionOnPost>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ReactionOnPost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Reacted on    {} ({})",
            self.reaction.created_at.format("%Y-%m-%d"),
            crate::timeago::since(self.reaction.created_at)
        )?;
        writeln!(f, "Reacted by:   {}", self.reaction.user)?;
        writeln!(f, "Reacted with: {}", self.reaction.kind)?;
        write!(f, "{}", self.post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::PostKind;
    use chrono::TimeZone;

    fn user(login: &str) -> UserRef {
        UserRef {
            login: Some(login.to_string()),
            name: None,
        }
    }

    fn post(permalink: &str, author: &str) -> Post {
        Post {
            kind: PostKind::Issue,
            posted_at: Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap(),
            content: "a post".to_string(),
            author: user(author),
            permalink: permalink.to_string(),
            source_id: "1".to_string(),
        }
    }

    fn reaction_on(
        post: &Post,
        login: Option<&str>,
        raw_kind: &str,
        minute: u32,
    ) -> ReactionOnPost {
        ReactionOnPost {
            reaction: Reaction {
                user: UserRef {
                    login: login.map(ToString::to_string),
                    name: None,
                },
                kind: ReactionKind::from_raw(raw_kind),
                created_at: Utc.with_ymd_and_hms(2025, 1, 11, 9, minute, 0).unwrap(),
            },
            post: post.clone(),
        }
    }

    fn sample() -> Reactions {
        let first = post("https://github.com/octo/repo/issues/1", "author-a");
        let second = post("https://github.com/octo/repo/issues/2", "author-b");

        let mut reactions = Reactions::new();
        reactions.append(vec![
            reaction_on(&first, Some("alice"), "+1", 5),
            reaction_on(&first, Some("Dependabot[bot]"), "+1", 3),
            reaction_on(&second, Some("alice"), "rocket", 1),
            reaction_on(&second, None, "heart", 2),
        ]);
        reactions
    }

    #[test]
    fn clean_filters_bots_case_insensitively() {
        let mut reactions = sample();
        reactions.clean(&BotLogins::default());

        assert_eq!(reactions.len(), 3);
        assert!(
            reactions
                .iter()
                .all(|entry| entry.reaction.user.login.as_deref() != Some("Dependabot[bot]"))
        );
    }

    #[test]
    fn clean_sorts_by_reaction_time_ascending() {
        let mut reactions = sample();
        reactions.clean(&BotLogins::default());

        let times: Vec<_> = reactions
            .iter()
            .map(|entry| entry.reaction.created_at)
            .collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
    }

    #[test]
    fn clean_is_idempotent() {
        let mut once = sample();
        once.clean(&BotLogins::default());

        let mut twice = once.clone();
        twice.clean(&BotLogins::default());
        assert_eq!(once, twice);
    }

    #[test]
    fn grouping_counts_sum_to_qualifying_records() {
        let mut reactions = sample();
        reactions.clean(&BotLogins::default());

        // One reaction has no reacting login and is skipped there; every
        // other grouping sees all three records.
        let by_user: usize = reactions.by_reacting_user().iter().map(|c| c.count).sum();
        assert_eq!(by_user, 2);

        let by_author: usize = reactions.by_post_author().iter().map(|c| c.count).sum();
        assert_eq!(by_author, 3);

        let by_post: usize = reactions.by_post().iter().map(|c| c.count).sum();
        assert_eq!(by_post, 3);

        let by_kind: usize = reactions.by_reaction_kind().iter().map(|c| c.count).sum();
        assert_eq!(by_kind, 3);
    }

    #[test]
    fn end_to_end_grouping() {
        let mut reactions = sample();
        reactions.clean(&BotLogins::default());

        let by_kind = reactions.by_reaction_kind().top(10);
        let kinds: Vec<_> = by_kind
            .iter()
            .map(|entry| (entry.value.to_string(), entry.count))
            .collect();
        assert!(kinds.contains(&("👍".to_string(), 1)));
        assert!(kinds.contains(&("🚀".to_string(), 1)));
        assert!(kinds.contains(&("❤️".to_string(), 1)));

        let by_user = reactions.by_reacting_user();
        assert_eq!(by_user.len(), 1);
        let alice = by_user.iter().next().unwrap();
        assert_eq!(alice.value.login.as_deref(), Some("alice"));
        assert_eq!(alice.count, 2);

        let by_post = reactions.by_post().top(10);
        assert_eq!(by_post.len(), 2);
        assert!(by_post.iter().all(|entry| entry.count >= 1));
    }

    #[test]
    fn unknown_kinds_are_counted_distinctly() {
        let target = post("https://github.com/octo/repo/issues/3", "author-a");
        let mut reactions = Reactions::new();
        reactions.append(vec![
            reaction_on(&target, Some("bob"), "sparkles", 1),
            reaction_on(&target, Some("carol"), "sparkles", 2),
            reaction_on(&target, Some("dave"), "tada", 3),
        ]);
        reactions.clean(&BotLogins::default());

        let by_kind = reactions.by_reaction_kind().top(10);
        let rendered: Vec<_> = by_kind
            .iter()
            .map(|entry| (entry.value.to_string(), entry.count))
            .collect();
        assert!(rendered.contains(&("🤷 unknown reaction sparkles".to_string(), 2)));
        assert!(rendered.contains(&("🤷 unknown reaction tada".to_string(), 1)));
    }

    #[test]
    fn bot_logins_custom_set() {
        let bots = BotLogins::new(["My-Bot"]);
        assert!(bots.contains("my-bot"));
        assert!(bots.contains("MY-BOT"));
        assert!(!bots.contains("dependabot[bot]"));
    }
}
