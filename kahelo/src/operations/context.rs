use crate::{
	config::Config,
	tileset::{TilesetBuilder, TrackCache},
};
use kahelo_container::{Freshness, TileStore};
use kahelo_core::progress::{ProgressBar, get_progress_bar};
use std::sync::{
	Arc,
	atomic::{AtomicBool, Ordering},
};

/// Settings and run-scoped state shared by the operations of one command.
#[derive(Debug)]
pub struct RunContext {
	config: Config,
	freshness: Freshness,
	tracks: TrackCache,
	show_progress: bool,
	cancelled: Arc<AtomicBool>,
}

impl RunContext {
	/// A context without progress bars. Expiry is computed from the current time.
	#[must_use]
	pub fn new(config: Config) -> RunContext {
		let freshness = Freshness::new(config.database.tile_validity_days);
		RunContext {
			config,
			freshness,
			tracks: TrackCache::new(),
			show_progress: false,
			cancelled: Arc::new(AtomicBool::new(false)),
		}
	}

	#[must_use]
	pub fn with_progress(mut self, show_progress: bool) -> RunContext {
		self.show_progress = show_progress;
		self
	}

	#[must_use]
	pub fn with_freshness(mut self, freshness: Freshness) -> RunContext {
		self.freshness = freshness;
		self
	}

	#[must_use]
	pub fn config(&self) -> &Config {
		&self.config
	}

	#[must_use]
	pub fn freshness(&self) -> &Freshness {
		&self.freshness
	}

	/// Tileset builder reading tracks through this context's cache.
	#[must_use]
	pub fn tileset_builder<'a>(&'a self, store: &'a dyn TileStore) -> TilesetBuilder<'a> {
		TilesetBuilder::new(store, &self.tracks, self.config.tracks.interpolate_points)
	}

	#[must_use]
	pub fn progress(&self, message: &str, size: u64) -> ProgressBar {
		get_progress_bar(message, size, !self.show_progress)
	}

	/// Let Ctrl-C stop tile loops before their next tile. Needs a tokio runtime.
	pub fn cancel_on_ctrl_c(&self) {
		let cancelled = Arc::clone(&self.cancelled);
		tokio::spawn(async move {
			if tokio::signal::ctrl_c().await.is_ok() {
				log::warn!("interrupted, stopping after the current tile");
				cancelled.store(true, Ordering::SeqCst);
			}
		});
	}

	pub fn cancel(&self) {
		self.cancelled.store(true, Ordering::SeqCst);
	}

	#[must_use]
	pub fn is_cancelled(&self) -> bool {
		self.cancelled.load(Ordering::SeqCst)
	}
}
