//! Wurstmineberg API client.
//!
//! Async HTTP client using `reqwest`. Responses are decoded with `serde_json`
//! so a body of the wrong shape surfaces as [`Error::Decode`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use worldtray_protocol::constants::{DEFAULT_BASE_URL, HTTP_TIMEOUT};
use worldtray_protocol::{PeopleFile, Roster, WorldStatus, WorldStatusSet};

/// Errors from the API client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection, DNS, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {code} {reason}")]
    Status { code: u16, reason: String },

    /// The body is not JSON or does not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Where world statuses come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WorldSource {
    /// `server/worlds.json?list=1`, one entry per world.
    #[default]
    Multi,
    /// `world/{world}/status.json`, reported as a one-entry set under `world`.
    Single { world: String },
}

/// Wurstmineberg API client.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a client for the public API.
    pub fn new() -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION"),
                " (",
                env!("CARGO_PKG_REPOSITORY"),
                ")"
            ))
            .timeout(HTTP_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Sets a custom base URL (for testing or a mirror).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns the base URL requests are made against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs a GET and decodes the JSON body.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        tracing::debug!(url, "GET");
        let resp = self.http.get(url).query(query).send().await?;
        let status = resp.status();

        if !status.is_success() {
            return Err(Error::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetches the people roster.
    pub async fn people(&self) -> Result<Roster, Error> {
        let file: PeopleFile = self
            .fetch(&format!("{}/people.json", self.base_url), &[])
            .await?;
        Ok(file.people)
    }

    /// Fetches the status of every world described by `source`.
    pub async fn world_statuses(&self, source: &WorldSource) -> Result<WorldStatusSet, Error> {
        match source {
            WorldSource::Multi => {
                self.fetch(
                    &format!("{}/server/worlds.json", self.base_url),
                    &[("list", "1")],
                )
                .await
            }
            WorldSource::Single { world } => {
                let status: WorldStatus = self
                    .fetch(
                        &format!("{}/world/{world}/status.json", self.base_url),
                        &[],
                    )
                    .await?;
                Ok(WorldStatusSet::from([(world.clone(), status)]))
            }
        }
    }

    /// Fetches roster and statuses. Fails on the first failing request.
    pub async fn fetch_state(&self, source: &WorldSource) -> Result<(Roster, WorldStatusSet), Error> {
        let people = self.people().await?;
        let statuses = self.world_statuses(source).await?;
        tracing::debug!(
            people = people.len(),
            worlds = statuses.len(),
            "fetched presence data"
        );
        Ok((people, statuses))
    }
}
