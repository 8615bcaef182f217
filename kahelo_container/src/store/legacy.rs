//! Store in the RMaps SQLite layout, readable by RMaps and compatible apps.
//!
//! Zoom levels are stored inverted as `z = 17 - zoom` and the column `s` is always 0.
//! The layout has no dates, so every stored tile has an unknown age.

use super::{TileStore, sqlite::SqliteDatabase};
use crate::{StoreProperties, StoredTile, TileFormat, TilePresence, Timestamp};
use anyhow::{Context, Result};
use async_trait::async_trait;
use kahelo_core::{Blob, TileCoord};
use r2d2_sqlite::rusqlite::{OptionalExtension, params};
use std::path::Path;

const SCHEMA: &str = "
	CREATE TABLE IF NOT EXISTS android_metadata (locale text);
	CREATE TABLE IF NOT EXISTS tiles (x integer, y integer, z integer, s integer, image blob);
	CREATE INDEX IF NOT EXISTS IND ON tiles (x, y, z, s);
	CREATE TABLE IF NOT EXISTS info (minzoom integer, maxzoom integer);
";

fn inverted(zoom: u8) -> i32 {
	17 - i32::from(zoom)
}

#[derive(Debug)]
pub struct LegacyStore {
	db: SqliteDatabase,
	properties: StoreProperties,
	tile_format: TileFormat,
}

impl LegacyStore {
	pub fn open(path: &Path, properties: StoreProperties) -> Result<LegacyStore> {
		let tile_format = properties.resolved_format()?;
		let db = SqliteDatabase::open(path, SCHEMA).with_context(|| format!("opening RMaps database {path:?}"))?;

		{
			let conn = db.conn()?;
			let rows: i64 = conn.query_row("SELECT COUNT(*) FROM android_metadata", [], |row| row.get(0))?;
			if rows == 0 {
				conn.execute_batch(
					"INSERT INTO android_metadata VALUES ('');
					INSERT INTO info VALUES (1, 17);",
				)?;
			}
		}

		Ok(LegacyStore {
			db,
			properties,
			tile_format,
		})
	}
}

#[async_trait]
impl TileStore for LegacyStore {
	fn properties(&self) -> &StoreProperties {
		&self.properties
	}

	fn tile_format(&self) -> TileFormat {
		self.tile_format
	}

	async fn exists(&self, coord: &TileCoord) -> Result<TilePresence> {
		let conn = self.db.conn()?;
		let found = conn
			.query_row(
				"SELECT 1 FROM tiles WHERE x = ? AND y = ? AND z = ? AND s = 0",
				params![coord.x, coord.y, inverted(coord.zoom)],
				|_| Ok(()),
			)
			.optional()?;
		Ok(match found {
			Some(()) => TilePresence::Present(None),
			None => TilePresence::Missing,
		})
	}

	async fn retrieve_bytes(&self, coord: &TileCoord) -> Result<Option<StoredTile>> {
		let conn = self.db.conn()?;
		let tile = conn
			.query_row(
				"SELECT image FROM tiles WHERE x = ? AND y = ? AND z = ? AND s = 0",
				params![coord.x, coord.y, inverted(coord.zoom)],
				|row| row.get::<_, Vec<u8>>(0),
			)
			.optional()?;
		Ok(tile.map(|data| StoredTile {
			timestamp: None,
			data: Blob::from(data),
		}))
	}

	async fn write(&self, _timestamp: Option<Timestamp>, coord: &TileCoord, data: &Blob) -> Result<()> {
		log::trace!("write {coord} to {:?}", self.db.path());
		let conn = self.db.write_conn()?;
		let z = inverted(coord.zoom);
		conn.execute(
			"DELETE FROM tiles WHERE x = ? AND y = ? AND z = ? AND s = 0",
			params![coord.x, coord.y, z],
		)?;
		conn.execute(
			"INSERT INTO tiles (x, y, z, s, image) VALUES (?, ?, ?, 0, ?)",
			params![coord.x, coord.y, z, data.as_slice()],
		)?;
		Ok(())
	}

	async fn delete(&self, coord: &TileCoord) -> Result<bool> {
		let conn = self.db.write_conn()?;
		conn.execute(
			"DELETE FROM tiles WHERE x = ? AND y = ? AND z = ? AND s = 0",
			params![coord.x, coord.y, inverted(coord.zoom)],
		)?;
		Ok(true)
	}

	async fn count_tiles(&self, zooms: &[u8]) -> Result<u64> {
		let conn = self.db.conn()?;
		let mut stmt = conn.prepare("SELECT COUNT(*) FROM tiles WHERE z = ?")?;
		let mut count = 0;
		for &zoom in zooms {
			count += stmt.query_row([inverted(zoom)], |row| row.get::<_, i64>(0))?.unsigned_abs();
		}
		Ok(count)
	}

	async fn list_tiles(&self, zooms: &[u8]) -> Result<Vec<TileCoord>> {
		let conn = self.db.conn()?;
		let mut stmt = conn.prepare("SELECT x, y FROM tiles WHERE z = ?")?;
		let mut tiles = Vec::new();
		for &zoom in zooms {
			let rows = stmt.query_map([inverted(zoom)], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, u32>(1)?)))?;
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
