//! Tile stores: one async trait over four physical layouts.
//!
//! A store is opened through [`open_store`], which reads the properties sidecar and
//! picks the matching implementation:
//!
//! | format           | implementation  | timestamps          |
//! |------------------|-----------------|---------------------|
//! | `PRIMARY`        | [`PrimaryStore`]| per tile, nullable  |
//! | `LEGACY`         | [`LegacyStore`] | never               |
//! | `FOLDER`         | [`FolderStore`] | file mtime          |
//! | `FOLDER_VARIANT` | [`FolderStore`] | file mtime          |

mod folder;
mod legacy;
#[cfg(any(test, feature = "test"))]
mod mock;
mod primary;
mod sqlite;

pub use folder::*;
pub use legacy::*;
#[cfg(any(test, feature = "test"))]
pub use mock::*;
pub use primary::*;

use crate::{StoreFormat, StoreProperties, StoredTile, TileFormat, TilePresence, Timestamp, decode};
use anyhow::{Context, Result};
use async_trait::async_trait;
use image::DynamicImage;
use kahelo_core::{Blob, TileCoord};
use std::{fmt::Debug, path::Path};

/// The storage contract shared by every store layout.
#[async_trait]
pub trait TileStore: Debug + Send + Sync {
	/// Properties the store was opened with.
	fn properties(&self) -> &StoreProperties;

	/// The concrete format of the stored tiles.
	fn tile_format(&self) -> TileFormat;

	/// Presence and timestamp of a tile.
	async fn exists(&self, coord: &TileCoord) -> Result<TilePresence>;

	/// Raw bytes of a tile, `None` when absent.
	async fn retrieve_bytes(&self, coord: &TileCoord) -> Result<Option<StoredTile>>;

	/// Decoded image of a tile, `None` when absent.
	async fn retrieve(&self, coord: &TileCoord) -> Result<Option<(Option<Timestamp>, DynamicImage)>> {
		let Some(tile) = self.retrieve_bytes(coord).await? else {
			return Ok(None);
		};
		let image = decode(&tile.data).with_context(|| format!("decoding tile {coord}"))?;
		Ok(Some((tile.timestamp, image)))
	}

	/// Store `data` for `coord`, replacing any previous tile.
	async fn write(&self, timestamp: Option<Timestamp>, coord: &TileCoord, data: &Blob) -> Result<()>;

	/// Remove a tile. Returns `true` when the tile is gone afterwards, including
	/// when it was not there in the first place.
	async fn delete(&self, coord: &TileCoord) -> Result<bool>;

	/// Number of stored tiles at the given zooms.
	async fn count_tiles(&self, zooms: &[u8]) -> Result<u64>;

	/// Coordinates of the stored tiles at the given zooms.
	async fn list_tiles(&self, zooms: &[u8]) -> Result<Vec<TileCoord>>;

	/// Make pending writes durable.
	async fn commit(&self) -> Result<()>;

	/// Reclaim unused space.
	async fn compact(&self) -> Result<()>;

	/// The closest stored ancestor of `coord`, searching zooms `zoom - 1` down to 1.
	async fn upper_tile(&self, coord: &TileCoord) -> Result<Option<TileCoord>> {
		for zoom in (1..coord.zoom).rev() {
			let ancestor = coord.ancestor(zoom)?;
			if self.exists(&ancestor).await?.is_present() {
				return Ok(Some(ancestor));
			}
		}
		Ok(None)
	}
}

/// Open the store at `path` with the layout declared in its properties sidecar.
pub fn open_store(path: &Path) -> Result<Box<dyn TileStore>> {
	let properties = StoreProperties::read(path)?;
	open_store_with(path, properties)
}

/// Open the store at `path` with explicit properties.
pub fn open_store_with(path: &Path, properties: StoreProperties) -> Result<Box<dyn TileStore>> {
	log::debug!("open {} store {path:?}", properties.db_format);
	Ok(match properties.db_format {
		StoreFormat::Primary => Box::new(PrimaryStore::open(path, properties)?),
		StoreFormat::Legacy => Box::new(LegacyStore::open(path, properties)?),
		StoreFormat::Folder => Box::new(FolderStore::open(path, properties, FolderLayout::Plain)?),
		StoreFormat::FolderVariant => Box::new(FolderStore::open(path, properties, FolderLayout::Maverick)?),
	})
}
