//! Human-readable report rendering.
//!
//! Pure formatting over already-cleaned data: the functions here never fetch
//! anything, which keeps them directly testable.

use std::fmt::Write as _;

use gr_core::{Reactions, RelativeDate, UserRef, ValueCounts};

/// How many entries each ranking section shows.
const TOP_N: usize = 5;

/// Inputs for the final report.
#[derive(Debug)]
pub struct Report {
    /// The effective lower time bound of the analysis.
    pub since: RelativeDate,
    /// Posts fetched from the repository.
    pub fetched_posts: usize,
    /// Posts that survived the author filter and limit.
    pub analyzed_posts: usize,
    /// The cleaned reaction collection.
    pub reactions: Reactions,
}

/// Renders the whole report.
pub fn format_report(report: &Report) -> String {
    let mut output = String::new();

    writeln!(output, "Stats since {}", report.since).unwrap();
    writeln!(output, "{} messages on repository", report.fetched_posts).unwrap();
    writeln!(output, "{} analyzed messages", report.analyzed_posts).unwrap();
    let posts_with_reactions = report.reactions.by_post();
    writeln!(
        output,
        "{} messages with reactions",
        posts_with_reactions.len()
    )
    .unwrap();
    writeln!(output).unwrap();

    if posts_with_reactions.is_empty() {
        return output;
    }

    // Per-kind detail, ranked so the line is reproducible.
    let kinds = report.reactions.by_reaction_kind();
    let detail = kinds
        .top(kinds.len())
        .iter()
        .map(|entry| format!("{}: {}", entry.count, entry.value))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(
        output,
        "Total reactions: {} ({detail})",
        report.reactions.len()
    )
    .unwrap();
    writeln!(output).unwrap();

    let top_posts = posts_with_reactions.top(TOP_N);
    if posts_with_reactions.len() > top_posts.len() {
        writeln!(output, "Messages with most reactions:").unwrap();
    } else {
        writeln!(output, "Messages with reactions:").unwrap();
    }
    for entry in &top_posts {
        writeln!(output, "Reactions:    {}", entry.count).unwrap();
        write!(output, "{}", entry.value).unwrap();
        writeln!(output).unwrap();
    }
    writeln!(output).unwrap();

    let authors = report.reactions.by_post_author();
    let top_authors = authors.top(TOP_N);
    if authors.len() > top_authors.len() {
        writeln!(output, "Total users who got reactions: {}", authors.len()).unwrap();
        writeln!(output).unwrap();
        writeln!(output, "Top users who got reactions:").unwrap();
    } else {
        writeln!(output, "Users who got reactions:").unwrap();
    }
    output.push_str(&format_user_table(&top_authors));
    writeln!(output).unwrap();

    let users = report.reactions.by_reacting_user();
    let top_users = users.top(TOP_N);
    if users.len() > top_users.len() {
        writeln!(output, "Total users who reacted: {}", users.len()).unwrap();
        writeln!(output, "Top users who reacted:").unwrap();
    } else {
        writeln!(output, "Users who reacted: {}", users.len()).unwrap();
    }
    output.push_str(&format_user_table(&top_users));
    writeln!(output).unwrap();

    writeln!(output, "Last reactions:").unwrap();
    for entry in &report.reactions {
        write!(output, "{entry}").unwrap();
        writeln!(output).unwrap();
    }

    output
}

/// Renders ranked users as aligned columns: count, user, profile URL.
pub fn format_user_table(users: &ValueCounts<UserRef>) -> String {
    let count_width = users.max_count_width();
    let value_width = users.max_value_width(ToString::to_string);

    let mut output = String::new();
    for entry in users {
        let count = entry.count;
        let rendered = entry.value.to_string();
        let url = entry.value.profile_url();
        writeln!(output, "{count:>count_width$} {rendered:<value_width$} {url}").unwrap();
    }
    output
}
