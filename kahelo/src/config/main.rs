use super::{DatabaseConfig, ImportConfig, InsertConfig, ServerConfig, TilesConfig, TracksConfig, ViewConfig};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "kahelo.yml";

#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Tile validity and commit frequency
	#[serde(default)]
	pub database: DatabaseConfig,

	/// Downloads
	#[serde(default)]
	pub insert: InsertConfig,

	/// Copies between stores
	#[serde(default)]
	pub import: ImportConfig,

	/// Mosaic images
	#[serde(default)]
	pub view: ViewConfig,

	/// Tile encoding and drawing colours
	#[serde(default)]
	pub tiles: TilesConfig,

	/// Track processing
	#[serde(default)]
	pub tracks: TracksConfig,

	/// HTTP tile server
	#[serde(default)]
	pub server: ServerConfig,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		let config: Config = serde_yaml_ng::from_reader(reader)?;
		config.check()?;
		Ok(config)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		let config: Config = serde_yaml_ng::from_str(text)?;
		config.check()?;
		Ok(config)
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("error reading configuration file {path:?}"))?;
		Config::from_reader(BufReader::new(file)).with_context(|| format!("error reading configuration file {path:?}"))
	}

	/// Load `path` when given, else `kahelo.yml` from the working directory when
	/// present, else the defaults.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		if let Some(path) = path {
			return Config::from_path(path);
		}
		let local = Path::new(DEFAULT_CONFIG_FILE);
		if local.is_file() {
			log::debug!("using configuration {local:?}");
			Config::from_path(local)
		} else {
			Ok(Config::default())
		}
	}

	fn check(&self) -> Result<()> {
		ensure!(self.database.commit_period > 0, "database.commit_period must be at least 1");
		ensure!(self.insert.attempts > 0, "insert.attempts must be at least 1");
		ensure!(
			(1..=100).contains(&self.tiles.jpeg_quality),
			"tiles.jpeg_quality must be between 1 and 100"
		);
		ensure!(self.tiles.track_width > 0, "tiles.track_width must be at least 1");
		Ok(())
	}
}
