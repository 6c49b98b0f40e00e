//! GitHub REST API integration for the reactions report.
//!
//! Provides:
//! - A thin, cancellation-aware client over the REST API
//! - Wire models for the issue, comment, and reaction resources we read
//! - The paginated post collector and per-post reaction aggregator

pub mod collect;
pub mod models;
mod repo;

pub use collect::{PostCollector, Progress, ProgressSender, ReactionAggregator};
pub use repo::Repository;

use std::env;
use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_API_URL: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("gh-reactions/", env!("CARGO_PKG_VERSION"));

/// GitHub client errors.
#[derive(Debug, Error)]
pub enum GithubError {
    /// No token was found in the environment.
    #[error("missing GitHub token: set GH_TOKEN or GITHUB_TOKEN")]
    MissingToken,
    /// The provided token was invalid.
    #[error("invalid GitHub token: {reason}")]
    InvalidToken { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("GitHub API error (status {status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse a response body.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The target repository could not be determined.
    #[error("could not determine repository: {0}")]
    Repository(String),
    /// The operation was interrupted before completion.
    #[error("operation cancelled")]
    Cancelled,
}

/// GitHub REST client.
///
/// Wraps a `reqwest` connection pool with auth headers and a cancellation
/// token. Every request races against the token, so pagination loops observe
/// an interrupt between pages without extra plumbing.
pub struct Client {
    http: reqwest::Client,
    api_url: String,
    token: String,
    cancel: CancellationToken,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_url", &self.api_url)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with the given base URL and token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or whitespace-only, or if the
    /// HTTP client fails to build.
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        cancel: CancellationToken,
    ) -> Result<Self, GithubError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(GithubError::InvalidToken {
                reason: "token cannot be empty",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(GithubError::ClientBuild)?;

        let api_url = api_url.into();
        let api_url = api_url.trim_end_matches('/').to_string();

        Ok(Self {
            http,
            api_url,
            token,
            cancel,
        })
    }

    /// Creates a client with the token taken from `GH_TOKEN` or
    /// `GITHUB_TOKEN`.
    pub fn from_env(
        api_url: impl Into<String>,
        cancel: CancellationToken,
    ) -> Result<Self, GithubError> {
        let token = env::var("GH_TOKEN")
            .or_else(|_| env::var("GITHUB_TOKEN"))
            .map_err(|_| GithubError::MissingToken)?;
        Self::new(api_url, token, cancel)
    }

    /// Fetches a resource and decodes the JSON body.
    ///
    /// Cancellation short-circuits with [`GithubError::Cancelled`]; API
    /// errors carry the decoded `message` field when GitHub provides one.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, GithubError> {
        if self.cancel.is_cancelled() {
            return Err(GithubError::Cancelled);
        }

        let url = format!("{}/{path}", self.api_url);
        tracing::debug!(%url, "GET");

        let request = self
            .http
            .get(&url)
            .query(query)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);

        let response = tokio::select! {
            () = self.cancel.cancelled() => return Err(GithubError::Cancelled),
            sent = request.send() => sent?,
        };

        let status = response.status();
        let body = tokio::select! {
            () = self.cancel.cancelled() => return Err(GithubError::Cancelled),
            read = response.text() => read?,
        };

        if !status.is_success() {
            let message = parse_api_error(&body).unwrap_or(body);
            return Err(GithubError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|err| GithubError::InvalidResponse(err.to_string()))
    }

    /// The default public API base URL.
    #[must_use]
    pub const fn default_api_url() -> &'static str {
        DEFAULT_API_URL
    }
}

/// Extracts the `message` field GitHub puts in error bodies.
fn parse_api_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| payload.message)
}
