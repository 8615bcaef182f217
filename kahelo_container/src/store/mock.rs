//! In-memory store for tests.

use super::TileStore;
use crate::{DeclaredFormat, StoreFormat, StoreProperties, StoredTile, TileFormat, TilePresence, Timestamp};
use anyhow::{Result, bail};
use async_trait::async_trait;
use kahelo_core::{Blob, TileCoord};
use std::{
	collections::BTreeMap,
	sync::{
		Mutex, MutexGuard, PoisonError,
		atomic::{AtomicBool, Ordering},
	},
};

#[derive(Debug)]
pub struct MockStore {
	properties: StoreProperties,
	tiles: Mutex<BTreeMap<(u8, u32, u32), StoredTile>>,
	commits: Mutex<usize>,
	read_only: AtomicBool,
}

impl MockStore {
	#[must_use]
	pub fn new(tile_format: TileFormat) -> MockStore {
		MockStore::with_properties(StoreProperties {
			db_name: "mock".to_string(),
			db_format: StoreFormat::Primary,
			tile_format: DeclaredFormat::Fixed(tile_format),
			url_template: String::new(),
		})
	}

	#[must_use]
	pub fn with_properties(properties: StoreProperties) -> MockStore {
		MockStore {
			properties,
			tiles: Mutex::new(BTreeMap::new()),
			commits: Mutex::new(0),
			read_only: AtomicBool::new(false),
		}
	}

	fn tiles(&self) -> MutexGuard<'_, BTreeMap<(u8, u32, u32), StoredTile>> {
		self.tiles.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// Make `write` and `delete` fail from now on.
	pub fn set_read_only(&self, read_only: bool) {
		self.read_only.store(read_only, Ordering::SeqCst);
	}

	fn check_writable(&self) -> Result<()> {
		if self.read_only.load(Ordering::SeqCst) {
			bail!("mock store is read-only");
		}
		Ok(())
	}

	/// Number of `commit` calls so far.
	pub fn commit_count(&self) -> usize {
		*self.commits.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

fn key(coord: &TileCoord) -> (u8, u32, u32) {
	(coord.zoom, coord.x, coord.y)
}

#[async_trait]
impl TileStore for MockStore {
	fn properties(&self) -> &StoreProperties {
		&self.properties
	}

	fn tile_format(&self) -> TileFormat {
		self.properties.resolved_format().unwrap_or(TileFormat::PNG)
	}

	async fn exists(&self, coord: &TileCoord) -> Result<TilePresence> {
		Ok(self
			.tiles()
			.get(&key(coord))
			.map_or(TilePresence::Missing, StoredTile::presence))
	}

	async fn retrieve_bytes(&self, coord: &TileCoord) -> Result<Option<StoredTile>> {
		Ok(self.tiles().get(&key(coord)).cloned())
	}

	async fn write(&self, timestamp: Option<Timestamp>, coord: &TileCoord, data: &Blob) -> Result<()> {
		self.check_writable()?;
		self.tiles().insert(
			key(coord),
			StoredTile {
				timestamp,
				data: data.clone(),
			},
		);
		Ok(())
	}

	async fn delete(&self, coord: &TileCoord) -> Result<bool> {
		self.check_writable()?;
		self.tiles().remove(&key(coord));
		Ok(true)
	}

	async fn count_tiles(&self, zooms: &[u8]) -> Result<u64> {
		Ok(self.tiles().keys().filter(|(z, _, _)| zooms.contains(z)).count() as u64)
	}

	async fn list_tiles(&self, zooms: &[u8]) -> Result<Vec<TileCoord>> {
		self
			.tiles()
			.keys()
			.filter(|(z, _, _)| zooms.contains(z))
			.map(|&(z, x, y)| TileCoord::new(z, x, y))
			.collect()
	}

	async fn commit(&self) -> Result<()> {
		*self.commits.lock().unwrap_or_else(PoisonError::into_inner) += 1;
		Ok(())
	}

	async fn compact(&self) -> Result<()> {
		Ok(())
	}
}
