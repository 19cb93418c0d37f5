//! Remote roster API client.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

use crate::domain::roster::{Mode, RosterQuery, RosterResult};

/// Failures of one fetch attempt. Setup errors (`InvalidMode`,
/// `InvalidOrganization`) and remote errors alike are fatal to the attempt
/// only; callers degrade to an empty result.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("mode code {0} does not name a supported roster query")]
    InvalidMode(i64),
    #[error("organization roster queries require a non-zero organization id")]
    InvalidOrganization,
    #[error("invalid upstream url: {0}")]
    Url(#[from] url::ParseError),
    #[error("upstream request failed: {0}")]
    RemoteTransport(#[source] reqwest::Error),
    #[error("upstream answered with status {0}")]
    RemoteStatus(StatusCode),
    #[error("upstream payload could not be decoded: {0}")]
    RemoteDecode(#[source] reqwest::Error),
}

/// Client for the remote presence roster service.
///
/// Issues exactly one GET per fetch; there is no retry policy. The transport
/// timeout bounds the latency of a hung upstream.
#[derive(Debug, Clone)]
pub struct RosterClient {
    client: Client,
    base: Url,
}

impl RosterClient {
    pub fn new(mut base: Url, timeout: Duration) -> Result<Self, UpstreamError> {
        // Joins below are relative to the base, so its path must end in a
        // slash or the last segment would be replaced.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()
            .map_err(UpstreamError::RemoteTransport)?;
        Ok(Self { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("presenza/", env!("CARGO_PKG_VERSION"))
    }

    /// Issue the GET for one widget query and decode the JSON row array.
    pub async fn fetch(&self, query: &RosterQuery) -> Result<RosterResult, UpstreamError> {
        let url = self.request_url(query)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(UpstreamError::RemoteTransport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::RemoteStatus(status));
        }

        response
            .json::<RosterResult>()
            .await
            .map_err(UpstreamError::RemoteDecode)
    }

    fn request_url(&self, query: &RosterQuery) -> Result<Url, UpstreamError> {
        let mode = Mode::from_code(query.mode).ok_or(UpstreamError::InvalidMode(query.mode))?;

        let path = match mode {
            Mode::Online => format!("{}/{}", mode.command(), query.dimension.code()),
            Mode::Organization => {
                if query.organization <= 0 {
                    return Err(UpstreamError::InvalidOrganization);
                }
                format!(
                    "{}/{}/{}",
                    mode.command(),
                    query.dimension.code(),
                    query.organization
                )
            }
        };

        self.base.join(&path).map_err(UpstreamError::Url)
    }
}
