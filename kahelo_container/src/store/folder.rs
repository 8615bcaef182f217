//! Stores keeping one file per tile in a `zoom/x/y` directory tree.
//!
//! The tile date is the modification time of its file, set from the record
//! timestamp when a dated tile is written.

use super::TileStore;
use crate::{StoreProperties, StoredTile, TileFormat, TilePresence, Timestamp};
use anyhow::{Context, Result};
use async_trait::async_trait;
use filetime::FileTime;
use kahelo_core::{Blob, TileCoord};
use std::{
	fs, io,
	path::{Path, PathBuf},
};

/// File naming inside a folder store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FolderLayout {
	/// `zoom/x/y.ext`
	Plain,
	/// `zoom/x/y.ext.tile`, as used by Maverick.
	Maverick,
}

#[derive(Debug)]
pub struct FolderStore {
	root: PathBuf,
	properties: StoreProperties,
	tile_format: TileFormat,
	suffix: String,
}

impl FolderStore {
	pub fn open(path: &Path, properties: StoreProperties, layout: FolderLayout) -> Result<FolderStore> {
		let tile_format = properties.resolved_format()?;
		let suffix = match layout {
			FolderLayout::Plain => format!(".{}", tile_format.extension()),
			FolderLayout::Maverick => format!(".{}.tile", tile_format.extension()),
		};
		Ok(FolderStore {
			root: path.to_path_buf(),
			properties,
			tile_format,
			suffix,
		})
	}

	fn filename(&self, coord: &TileCoord) -> PathBuf {
		self
			.root
			.join(coord.zoom.to_string())
			.join(coord.x.to_string())
			.join(format!("{}{}", coord.y, self.suffix))
	}

	fn modified(path: &Path) -> Result<Timestamp> {
		let meta = fs::metadata(path)?;
		Ok(FileTime::from_last_modification_time(&meta).unix_seconds())
	}

	/// Visit every tile file of one zoom level.
	fn scan_zoom(&self, zoom: u8, mut callback: impl FnMut(u32, u32) -> Result<()>) -> Result<()> {
		let dir = self.root.join(zoom.to_string());
		if !dir.is_dir() {
			return Ok(());
		}
		for entry1 in fs::read_dir(&dir)? {
			let entry1 = entry1?;
			let Some(x) = entry1.file_name().to_str().and_then(|n| n.parse::<u32>().ok()) else {
				continue;
			};
			if !entry1.file_type()?.is_dir() {
				continue;
			}
			for entry2 in fs::read_dir(entry1.path())? {
				let entry2 = entry2?;
				let name = entry2.file_name();
				let Some(y) = name
					.to_str()
					.and_then(|n| n.strip_suffix(&self.suffix))
					.and_then(|n| n.parse::<u32>().ok())
				else {
					continue;
				};
				if entry2.file_type()?.is_file() {
					callback(x, y)?;
				}
			}
		}
		Ok(())
	}
}

// Remove empty directories below `dir`; returns whether `dir` itself ended up empty.
fn prune_empty_dirs(dir: &Path) -> Result<bool> {
	let mut empty = true;
	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		if entry.file_type()?.is_dir() && prune_empty_dirs(&entry.path())? {
			log::trace!("remove empty directory {:?}", entry.path());
			fs::remove_dir(entry.path())?;
		} else {
			empty = false;
		}
	}
	Ok(empty)
}

#[async_trait]
impl TileStore for FolderStore {
	fn properties(&self) -> &StoreProperties {
		&self.properties
	}

	fn tile_format(&self) -> TileFormat {
		self.tile_format
	}

	async fn exists(&self, coord: &TileCoord) -> Result<TilePresence> {
		let path = self.filename(coord);
		if path.is_file() {
			Ok(TilePresence::Present(Some(Self::modified(&path)?)))
		} else {
			Ok(TilePresence::Missing)
		}
	}

	async fn retrieve_bytes(&self, coord: &TileCoord) -> Result<Option<StoredTile>> {
		let path = self.filename(coord);
		match fs::read(&path) {
			Ok(data) => Ok(Some(StoredTile {
				timestamp: Some(Self::modified(&path)?),
				data: Blob::from(data),
			})),
			Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
			Err(e) => Err(e).with_context(|| format!("reading {path:?}")),
		}
	}

	async fn write(&self, timestamp: Option<Timestamp>, coord: &TileCoord, data: &Blob) -> Result<()> {
		let path = self.filename(coord);
		log::trace!("write {coord} to {path:?}");
		if let Some(dir) = path.parent() {
			fs::create_dir_all(dir).with_context(|| format!("unable to create {dir:?}"))?;
		}
		fs::write(&path, data.as_slice()).with_context(|| format!("unable to save {path:?}"))?;
		if let Some(ts) = timestamp {
			let time = FileTime::from_unix_time(ts, 0);
			if let Err(e) = filetime::set_file_times(&path, time, time) {
				log::warn!("unable to set the date of {path:?}: {e}");
			}
		}
		Ok(())
	}

	async fn delete(&self, coord: &TileCoord) -> Result<bool> {
		let path = self.filename(coord);
		match fs::remove_file(&path) {
			Ok(()) => Ok(true),
			Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
			Err(e) => {
				log::debug!("unable to delete {path:?}: {e}");
				Ok(false)
			}
		}
	}

	async fn count_tiles(&self, zooms: &[u8]) -> Result<u64> {
		let mut count = 0;
		for &zoom in zooms {
			self.scan_zoom(zoom, |_, _| {
				count += 1;
				Ok(())
			})?;
		}
		Ok(count)
	}

	async fn list_tiles(&self, zooms: &[u8]) -> Result<Vec<TileCoord>> {
		let mut tiles = Vec::new();
		for &zoom in zooms {
			self.scan_zoom(zoom, |x, y| {
				tiles.push(TileCoord::new(zoom, x, y)?);
				Ok(())
			})?;
		}
		Ok(tiles)
	}

	async fn commit(&self) -> Result<()> {
		Ok(())
	}

	async fn compact(&self) -> Result<()> {
		if self.root.is_dir() {
			prune_empty_dirs(&self.root)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{StoreFormat, store::tests::properties};
	use assert_fs::TempDir;

	fn coord(zoom: u8, x: u32, y: u32) -> TileCoord {
		TileCoord::new(zoom, x, y).unwrap()
	}

	#[tokio::test]
	async fn file_names() -> Result<()> {
		let dir = TempDir::new()?;
		let plain = FolderStore::open(dir.path(), properties(StoreFormat::Folder), FolderLayout::Plain)?;
		let maverick = FolderStore::open(dir.path(), properties(StoreFormat::FolderVariant), FolderLayout::Maverick)?;
		assert_eq!(plain.filename(&coord(3, 2, 1)), dir.path().join("3/2/1.png"));
		assert_eq!(maverick.filename(&coord(3, 2, 1)), dir.path().join("3/2/1.png.tile"));

		// each layout only sees its own files
		plain.write(None, &coord(3, 2, 1), &Blob::from("a")).await?;
		assert_eq!(plain.count_tiles(&[3]).await?, 1);
		assert_eq!(maverick.count_tiles(&[3]).await?, 0);
		maverick.write(None, &coord(3, 2, 2), &Blob::from("b")).await?;
		assert_eq!(plain.list_tiles(&[3]).await?, vec![coord(3, 2, 1)]);
		assert_eq!(maverick.list_tiles(&[3]).await?, vec![coord(3, 2, 2)]);
		Ok(())
	}

	#[tokio::test]
	async fn ignores_foreign_files() -> Result<()> {
		let dir = TempDir::new()?;
		fs::create_dir_all(dir.path().join("4/3"))?;
		fs::write(dir.path().join("4/3/2.png"), "tile")?;
		fs::write(dir.path().join("4/3/readme.txt"), "x")?;
		fs::write(dir.path().join("4/3/5.jpg"), "x")?;
		fs::create_dir_all(dir.path().join("4/notes"))?;
		let store = FolderStore::open(dir.path(), properties(StoreFormat::Folder), FolderLayout::Plain)?;
		assert_eq!(store.list_tiles(&[4]).await?, vec![coord(4, 3, 2)]);
		assert_eq!(store.count_tiles(&[4, 5]).await?, 1);
		Ok(())
	}

	#[tokio::test]
	async fn compact_removes_empty_directories() -> Result<()> {
		let dir = TempDir::new()?;
		let store = FolderStore::open(dir.path(), properties(StoreFormat::Folder), FolderLayout::Plain)?;
		store.write(None, &coord(5, 1, 1), &Blob::from("a")).await?;
		store.write(None, &coord(6, 2, 2), &Blob::from("b")).await?;
		store.delete(&coord(6, 2, 2)).await?;
		store.compact().await?;
		assert!(dir.path().join("5/1/1.png").is_file());
		assert!(!dir.path().join("6").exists());
		assert!(dir.path().is_dir());
		Ok(())
	}

	#[tokio::test]
	async fn missing_root_is_empty() -> Result<()> {
		let dir = TempDir::new()?;
		let store = FolderStore::open(&dir.path().join("absent"), properties(StoreFormat::Folder), FolderLayout::Plain)?;
		assert_eq!(store.count_tiles(&[1, 2, 3]).await?, 0);
		store.compact().await?;
		Ok(())
	}
}
