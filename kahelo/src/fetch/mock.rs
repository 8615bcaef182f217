//! Scripted fetcher for tests.

use super::{FetchError, TileFetcher};
use async_trait::async_trait;
use kahelo_core::Blob;
use std::{
	collections::{HashMap, VecDeque},
	sync::Mutex,
	time::Duration,
};

/// What the mock server answers for one request.
#[derive(Clone, Debug)]
pub enum MockResponse {
	Tile(Blob),
	NotFound,
	Fail,
}

/// Answers every request with `default`, except for URLs given a scripted queue of
/// responses. Every requested URL is recorded.
#[derive(Debug)]
pub struct MockFetcher {
	default: MockResponse,
	scripted: Mutex<HashMap<String, VecDeque<MockResponse>>>,
	requests: Mutex<Vec<String>>,
}

impl MockFetcher {
	pub fn new(default: MockResponse) -> MockFetcher {
		MockFetcher {
			default,
			scripted: Mutex::new(HashMap::new()),
			requests: Mutex::new(Vec::new()),
		}
	}

	pub fn script(&self, url: &str, responses: Vec<MockResponse>) {
		self.scripted.lock().unwrap().insert(url.to_string(), responses.into());
	}

	pub fn requests(&self) -> Vec<String> {
		self.requests.lock().unwrap().clone()
	}
}

#[async_trait]
impl TileFetcher for MockFetcher {
	async fn fetch(&self, url: &str, _timeout: Duration) -> Result<Blob, FetchError> {
		self.requests.lock().unwrap().push(url.to_string());
		let response = self
			.scripted
			.lock()
			.unwrap()
			.get_mut(url)
			.and_then(VecDeque::pop_front)
			.unwrap_or_else(|| self.default.clone());
		match response {
			MockResponse::Tile(blob) => Ok(blob),
			MockResponse::NotFound => Err(FetchError::NotFound),
			MockResponse::Fail => Err(FetchError::Status(500)),
		}
	}
}
