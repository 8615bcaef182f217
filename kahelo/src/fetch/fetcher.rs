use anyhow::{Context, Result};
use async_trait::async_trait;
use kahelo_core::Blob;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Why a tile could not be downloaded.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
	/// The server does not have the tile; retrying is pointless.
	#[error("not found")]
	NotFound,
	#[error("HTTP status {0}")]
	Status(u16),
	#[error("connection error: {0}")]
	Transport(String),
}

/// Source of tile bytes for `insert`.
#[async_trait]
pub trait TileFetcher: Send + Sync {
	async fn fetch(&self, url: &str, timeout: Duration) -> Result<Blob, FetchError>;
}

const USER_AGENT: &str = concat!("kahelo/", env!("CARGO_PKG_VERSION"));

#[derive(Debug)]
pub struct HttpFetcher {
	client: Client,
}

impl HttpFetcher {
	pub fn new() -> Result<HttpFetcher> {
		let client = Client::builder()
			.user_agent(USER_AGENT)
			.build()
			.context("unable to create the HTTP client")?;
		Ok(HttpFetcher { client })
	}
}

#[async_trait]
impl TileFetcher for HttpFetcher {
	async fn fetch(&self, url: &str, timeout: Duration) -> Result<Blob, FetchError> {
		let response = self
			.client
			.get(url)
			.timeout(timeout)
			.send()
			.await
			.map_err(|e| FetchError::Transport(e.to_string()))?;

		match response.status() {
			StatusCode::NOT_FOUND => Err(FetchError::NotFound),
			status if !status.is_success() => Err(FetchError::Status(status.as_u16())),
			_ => {
				let bytes = response.bytes().await.map_err(|e| FetchError::Transport(e.to_string()))?;
				Ok(Blob::from(bytes.to_vec()))
			}
		}
	}
}
