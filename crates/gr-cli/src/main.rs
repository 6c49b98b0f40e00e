use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser as _;
use chrono::{Duration, Utc};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use gr_cli::progress::Spinner;
use gr_cli::report::{self, Report};
use gr_cli::{Cli, Config};
use gr_core::{BotLogins, RelativeDate};
use gr_github::{Client, GithubError, PostCollector, ReactionAggregator, Repository};

/// Conventional exit status for a SIGINT-style interrupt.
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version render through the error path but are not
            // failures.
            let failure = err.use_stderr();
            let _ = err.print();
            return if failure {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    match run(&cli, cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if is_cancelled(&err) => {
            eprintln!("interrupted");
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, cancel: CancellationToken) -> Result<()> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let repo = match cli.repo.as_deref() {
        Some(value) => value.parse::<Repository>()?,
        None => Repository::current()?,
    };
    let client = Client::from_env(&config.api_url, cancel)?;

    let since = cli
        .since
        .unwrap_or_else(|| default_since(config.default_since_days))
        .truncated_to_hour();

    println!("Looking for posts on github.com/{repo} since {since}");

    let spinner = Spinner::start();
    // The collector is a temporary so its progress handle is gone by the
    // time the spinner is asked to finish.
    let all_posts = PostCollector::new(&client, &repo, spinner.progress())
        .collect(since)
        .await?;
    spinner
        .finish(&format!("✔️ fetched {} posts", all_posts.len()))
        .await;

    if all_posts.is_empty() {
        println!("\nNo posts found since {since}");
        return Ok(());
    }

    let mut posts = all_posts.clone();
    if let Some(author) = cli.author.as_deref() {
        // Posts without a login are retained; only a differing login drops one.
        posts.retain(|post| {
            post.author
                .login
                .as_deref()
                .is_none_or(|login| login.eq_ignore_ascii_case(author))
        });
        println!("Limited analysis to {} {author} posts", posts.len());
    }

    let mut since = since;
    let limit = usize::try_from(cli.limit).unwrap_or(0);
    if limit > 0 && posts.len() > limit {
        posts.truncate(limit);
        if let Some(oldest) = posts.last() {
            since = RelativeDate::new(oldest.posted_at);
        }
        println!(
            "⚠️ Limited analysis to latest {} posts since {since}",
            posts.len()
        );
    }

    let spinner = Spinner::start();
    let mut reactions = ReactionAggregator::new(&client, &repo, spinner.progress())
        .aggregate(&posts)
        .await?;
    spinner
        .finish(&format!(
            "✔️ fetched reactions on {} posts: {} reactions found",
            posts.len(),
            reactions.len()
        ))
        .await;

    reactions.clean(&BotLogins::new(config.bot_logins.clone()));

    let report = Report {
        since,
        fetched_posts: all_posts.len(),
        analyzed_posts: posts.len(),
        reactions,
    };
    print!("{}", report::format_report(&report));

    Ok(())
}

fn default_since(days: u32) -> RelativeDate {
    RelativeDate::new(Utc::now() - Duration::days(i64::from(days)))
}

fn is_cancelled(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| matches!(cause.downcast_ref::<GithubError>(), Some(GithubError::Cancelled)))
}
