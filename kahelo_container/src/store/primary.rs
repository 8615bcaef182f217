//! The native store: an SQLite database keeping a timestamp per tile.
//!
//! ```sql
//! CREATE TABLE server (template text, format text);
//! CREATE TABLE tiles (date timestamp, x integer, y integer, zoom integer, tile blob);
//! CREATE UNIQUE INDEX tile_index ON tiles (x, y, zoom);
//! ```
//!
//! Dates are Unix seconds. A `NULL` date is kept as such and means the age of the
//! tile is unknown.

use super::{TileStore, sqlite::SqliteDatabase};
use crate::{StoreProperties, StoredTile, TileFormat, TilePresence, Timestamp};
use anyhow::{Context, Result};
use async_trait::async_trait;
use kahelo_core::{Blob, TileCoord};
use r2d2_sqlite::rusqlite::{OptionalExtension, params};
use std::path::Path;

const SCHEMA: &str = "
	CREATE TABLE IF NOT EXISTS server (template text, format text);
	CREATE TABLE IF NOT EXISTS tiles (date timestamp, x integer, y integer, zoom integer, tile blob);
	CREATE UNIQUE INDEX IF NOT EXISTS tile_index ON tiles (x, y, zoom);
";

#[derive(Debug)]
pub struct PrimaryStore {
	db: SqliteDatabase,
	properties: StoreProperties,
	tile_format: TileFormat,
}

impl PrimaryStore {
	pub fn open(path: &Path, properties: StoreProperties) -> Result<PrimaryStore> {
		let tile_format = properties.resolved_format()?;
		let db = SqliteDatabase::open(path, SCHEMA).with_context(|| format!("opening tile database {path:?}"))?;
		Ok(PrimaryStore {
			db,
			properties,
			tile_format,
		})
	}
}

#[async_trait]
impl TileStore for PrimaryStore {
	fn properties(&self) -> &StoreProperties {
		&self.properties
	}

	fn tile_format(&self) -> TileFormat {
		self.tile_format
	}

	async fn exists(&self, coord: &TileCoord) -> Result<TilePresence> {
		let conn = self.db.conn()?;
		let date = conn
			.query_row(
				"SELECT date FROM tiles WHERE x = ? AND y = ? AND zoom = ?",
				params![coord.x, coord.y, coord.zoom],
				|row| row.get::<_, Option<Timestamp>>(0),
			)
			.optional()?;
		Ok(date.map_or(TilePresence::Missing, TilePresence::Present))
	}

	async fn retrieve_bytes(&self, coord: &TileCoord) -> Result<Option<StoredTile>> {
		let conn = self.db.conn()?;
		let tile = conn
			.query_row(
				"SELECT date, tile FROM tiles WHERE x = ? AND y = ? AND zoom = ?",
				params![coord.x, coord.y, coord.zoom],
				|row| {
					Ok(StoredTile {
						timestamp: row.get(0)?,
						data: Blob::from(row.get::<_, Vec<u8>>(1)?),
					})
				},
			)
			.optional()?;
		Ok(tile)
	}

	async fn write(&self, timestamp: Option<Timestamp>, coord: &TileCoord, data: &Blob) -> Result<()> {
		log::trace!("write {coord} to {:?}", self.db.path());
		let conn = self.db.write_conn()?;
		conn.execute(
			"DELETE FROM tiles WHERE x = ? AND y = ? AND zoom = ?",
			params![coord.x, coord.y, coord.zoom],
		)?;
		conn.execute(
			"INSERT INTO tiles (date, x, y, zoom, tile) VALUES (?, ?, ?, ?, ?)",
			params![timestamp, coord.x, coord.y, coord.zoom, data.as_slice()],
		)?;
		Ok(())
	}

	async fn delete(&self, coord: &TileCoord) -> Result<bool> {
		let conn = self.db.write_conn()?;
		conn.execute(
			"DELETE FROM tiles WHERE x = ? AND y = ? AND zoom = ?",
			params![coord.x, coord.y, coord.zoom],
		)?;
		Ok(true)
	}

	async fn count_tiles(&self, zooms: &[u8]) -> Result<u64> {
		let conn = self.db.conn()?;
		let mut stmt = conn.prepare("SELECT COUNT(*) FROM tiles WHERE zoom = ?")?;
		let mut count = 0;
		for zoom in zooms {
			count += stmt.query_row([zoom], |row| row.get::<_, i64>(0))?.unsigned_abs();
		}
		Ok(count)
	}

	async fn list_tiles(&self, zooms: &[u8]) -> Result<Vec<TileCoord>> {
		let conn = self.db.conn()?;
		let mut stmt = conn.prepare("SELECT x, y FROM tiles WHERE zoom = ?")?;
		let mut tiles = Vec::new();
		for &zoom in zooms {
			let rows = stmt.query_map([zoom], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, u32>(1)?)))?;
			for row in rows {
				let (x, y) = row?;
				tiles.push(TileCoord::new(zoom, x, y)?);
			}
		}
		Ok(tiles)
	}

	async fn commit(&self) -> Result<()> {
		self.db.commit()
	}

	async fn compact(&self) -> Result<()> {
		self.db.vacuum()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{StoreFormat, store::tests::properties};

	#[tokio::test]
	async fn null_date_is_persisted() -> Result<()> {
		let dir = tempfile::tempdir()?;
		let path = dir.path().join("cache.db");
		let store = PrimaryStore::open(&path, properties(StoreFormat::Primary))?;
		let coord = TileCoord::new(10, 1, 2)?;
		store.write(None, &coord, &Blob::from("x")).await?;
		store.commit().await?;
		drop(store);

		let store = PrimaryStore::open(&path, properties(StoreFormat::Primary))?;
		assert_eq!(store.exists(&coord).await?, TilePresence::Present(None));
		Ok(())
	}

	#[tokio::test]
	async fn uncommitted_writes_are_visible_to_the_same_store() -> Result<()> {
		let dir = tempfile::tempdir()?;
		let store = PrimaryStore::open(&dir.path().join("cache.db"), properties(StoreFormat::Primary))?;
		let coord = TileCoord::new(3, 1, 1)?;
		store.write(Some(7), &coord, &Blob::from("x")).await?;
		assert_eq!(store.exists(&coord).await?, TilePresence::Present(Some(7)));
		store.commit().await?;
		store.commit().await?;
		Ok(())
	}

	#[tokio::test]
	async fn tiles_are_unique_per_coordinate() -> Result<()> {
		let dir = tempfile::tempdir()?;
		let store = PrimaryStore::open(&dir.path().join("cache.db"), properties(StoreFormat::Primary))?;
		let coord = TileCoord::new(4, 2, 3)?;
		store.write(Some(1), &coord, &Blob::from("a")).await?;
		store.write(Some(2), &coord, &Blob::from("b")).await?;
		assert_eq!(store.count_tiles(&[4]).await?, 1);

		let conn = store.db.conn()?;
		let duplicate = conn.execute(
			"INSERT INTO tiles (date, x, y, zoom, tile) VALUES (3, 2, 3, 4, x'00')",
			[],
		);
		assert!(duplicate.is_err());
		Ok(())
	}
}
