//! The `<store>.properties` sidecar describing a tile store.
//!
//! The sidecar is a small INI file written next to the store:
//!
//! ```ini
//! ; This file has been created by kahelo.
//! [tile_database_properties]
//! db_name=cache.db
//! db_format=PRIMARY
//! url_template=https://tile.example.org/{z}/{x}/{y}.png
//! tile_format=SERVER
//! ```
//!
//! It is created by `describe` and must exist before any other operation opens the store.

use crate::{DeclaredFormat, StoreFormat, TileFormat};
use anyhow::{Context, Result, bail};
use ini::Ini;
use std::{
	ffi::OsString,
	fs,
	io::Write,
	path::{Path, PathBuf},
};

const SECTION: &str = "tile_database_properties";
const HEADER: &str = "; This file has been created by kahelo.\n";

/// Declared layout, tile format and server of a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreProperties {
	pub db_name: String,
	pub db_format: StoreFormat,
	pub tile_format: DeclaredFormat,
	pub url_template: String,
}

impl StoreProperties {
	/// Path of the sidecar belonging to the store at `store`.
	#[must_use]
	pub fn sidecar_path(store: &Path) -> PathBuf {
		let normalized: PathBuf = store.components().collect();
		let mut name = OsString::from(normalized.as_os_str());
		name.push(".properties");
		PathBuf::from(name)
	}

	/// Read the sidecar of `store`, `None` when it does not exist.
	pub fn load(store: &Path) -> Result<Option<StoreProperties>> {
		let path = Self::sidecar_path(store);
		if !path.is_file() {
			return Ok(None);
		}
		log::debug!("read properties {path:?}");

		let conf = Ini::load_from_file(&path).with_context(|| format!("reading {path:?}"))?;
		let Some(section) = conf.section(Some(SECTION)) else {
			bail!("section [{SECTION}] missing in {path:?}");
		};
		let get = |key: &str| -> Result<String> {
			section
				.get(key)
				.map(str::to_string)
				.with_context(|| format!("key '{key}' missing in {path:?}"))
		};

		Ok(Some(StoreProperties {
			db_name: section.get("db_name").map_or_else(|| db_name(store), str::to_string),
			db_format: get("db_format")?.parse()?,
			tile_format: get("tile_format")?.parse()?,
			url_template: section.get("url_template").unwrap_or_default().to_string(),
		}))
	}

	/// Read the sidecar of `store`, failing when the store has not been described.
	pub fn read(store: &Path) -> Result<StoreProperties> {
		match Self::load(store)? {
			Some(properties) => Ok(properties),
			None => bail!(
				"tile database format of {store:?} is not declared. Use describe to describe database."
			),
		}
	}

	/// Write the sidecar of `store`, creating its directory when needed.
	pub fn write(&self, store: &Path) -> Result<()> {
		let path = Self::sidecar_path(store);
		if let Some(dir) = path.parent()
			&& !dir.as_os_str().is_empty()
		{
			fs::create_dir_all(dir).with_context(|| format!("creating directory {dir:?}"))?;
		}
		log::debug!("write properties {path:?}");

		let mut conf = Ini::new();
		conf
			.with_section(Some(SECTION))
			.set("db_name", self.db_name.as_str())
			.set("db_format", self.db_format.as_str())
			.set("url_template", self.url_template.as_str())
			.set("tile_format", self.tile_format.to_string());

		let mut file = fs::File::create(&path).with_context(|| format!("unable to write {path:?}"))?;
		file.write_all(HEADER.as_bytes())?;
		conf.write_to(&mut file)?;
		Ok(())
	}

	/// Merge new settings into existing ones, keeping every field not given.
	pub fn merged(
		existing: Option<StoreProperties>,
		store: &Path,
		db_format: Option<StoreFormat>,
		tile_format: Option<DeclaredFormat>,
		url_template: Option<String>,
	) -> Result<StoreProperties> {
		let (old_format, old_tile_format, old_url) = match existing {
			Some(p) => (Some(p.db_format), Some(p.tile_format), p.url_template),
			None => (None, None, String::new()),
		};
		Ok(StoreProperties {
			db_name: db_name(store),
			db_format: db_format
				.or(old_format)
				.context("database format missing, use --db-format")?,
			tile_format: tile_format
				.or(old_tile_format)
				.context("tile format missing, use --tile-format")?,
			url_template: url_template.unwrap_or(old_url),
		})
	}

	/// The concrete format tiles are stored in.
	pub fn resolved_format(&self) -> Result<TileFormat> {
		self.tile_format.resolve(&self.url_template)
	}
}

fn db_name(store: &Path) -> String {
	store
		.components()
		.collect::<PathBuf>()
		.file_name()
		.map(|n| n.to_string_lossy().into_owned())
		.unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn sample() -> StoreProperties {
		StoreProperties {
			db_name: "cache.db".to_string(),
			db_format: StoreFormat::Primary,
			tile_format: DeclaredFormat::Server,
			url_template: "https://tile.example.org/{z}/{x}/{y}.png".to_string(),
		}
	}

	#[test]
	fn sidecar_path_is_normalized() {
		assert_eq!(
			StoreProperties::sidecar_path(Path::new("tiles/folder/")),
			PathBuf::from("tiles/folder.properties")
		);
		assert_eq!(
			StoreProperties::sidecar_path(Path::new("cache.db")),
			PathBuf::from("cache.db.properties")
		);
	}

	#[test]
	fn write_then_read() -> Result<()> {
		let dir = tempfile::tempdir()?;
		let store = dir.path().join("cache.db");
		sample().write(&store)?;

		let text = fs::read_to_string(StoreProperties::sidecar_path(&store))?;
		assert!(text.starts_with("; This file has been created by kahelo."));
		assert!(text.contains("[tile_database_properties]"));

		let read = StoreProperties::read(&store)?;
		assert_eq!(read, sample());
		assert_eq!(read.resolved_format()?, TileFormat::PNG);
		Ok(())
	}

	#[test]
	fn missing_sidecar() -> Result<()> {
		let dir = tempfile::tempdir()?;
		let store = dir.path().join("nothing.db");
		assert!(StoreProperties::load(&store)?.is_none());
		let err = StoreProperties::read(&store).unwrap_err();
		assert!(err.to_string().contains("is not declared"));
		Ok(())
	}

	#[test]
	fn aliases_are_read() -> Result<()> {
		let dir = tempfile::tempdir()?;
		let store = dir.path().join("legacy.sqlitedb");
		fs::write(
			StoreProperties::sidecar_path(&store),
			"[tile_database_properties]\ndb_format = rmaps\ntile_format = JPG\nurl_template = \n",
		)?;
		let read = StoreProperties::read(&store)?;
		assert_eq!(read.db_format, StoreFormat::Legacy);
		assert_eq!(read.db_name, "legacy.sqlitedb");
		assert_eq!(read.tile_format, DeclaredFormat::Fixed(TileFormat::JPG));
		Ok(())
	}

	#[test]
	fn merge_keeps_unchanged_fields() -> Result<()> {
		let store = Path::new("cache.db");
		let merged = StoreProperties::merged(Some(sample()), store, None, Some("JPG".parse()?), None)?;
		assert_eq!(merged.db_format, StoreFormat::Primary);
		assert_eq!(merged.tile_format, DeclaredFormat::Fixed(TileFormat::JPG));
		assert_eq!(merged.url_template, sample().url_template);

		assert!(StoreProperties::merged(None, store, None, Some(DeclaredFormat::Server), None).is_err());
		Ok(())
	}
}
