//! Physical layouts a tile store can use.

use anyhow::{Result, bail};
use std::{fmt, str::FromStr};

/// The persistence layout of a store, as declared in its properties sidecar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreFormat {
	/// SQLite database with per-tile timestamps.
	Primary,
	/// SQLite database in the RMaps layout, without timestamps.
	Legacy,
	/// Directory tree `zoom/x/y.ext`.
	Folder,
	/// Directory tree `zoom/x/y.ext.tile` (Maverick).
	FolderVariant,
}

impl StoreFormat {
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			StoreFormat::Primary => "PRIMARY",
			StoreFormat::Legacy => "LEGACY",
			StoreFormat::Folder => "FOLDER",
			StoreFormat::FolderVariant => "FOLDER_VARIANT",
		}
	}

	/// Whether tiles live in a directory tree rather than a database file.
	#[must_use]
	pub fn is_folder(&self) -> bool {
		matches!(self, StoreFormat::Folder | StoreFormat::FolderVariant)
	}
}

impl fmt::Display for StoreFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for StoreFormat {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self> {
		Ok(match s.trim().to_ascii_uppercase().as_str() {
			"PRIMARY" | "KAHELO" => StoreFormat::Primary,
			"LEGACY" | "RMAPS" => StoreFormat::Legacy,
			"FOLDER" => StoreFormat::Folder,
			"FOLDER_VARIANT" | "MAVERICK" => StoreFormat::FolderVariant,
			_ => bail!("unknown tile database format '{s}'"),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("PRIMARY", StoreFormat::Primary)]
	#[case("kahelo", StoreFormat::Primary)]
	#[case("rmaps", StoreFormat::Legacy)]
	#[case("LEGACY", StoreFormat::Legacy)]
	#[case("folder", StoreFormat::Folder)]
	#[case("maverick", StoreFormat::FolderVariant)]
	#[case("FOLDER_VARIANT", StoreFormat::FolderVariant)]
	fn parse(#[case] name: &str, #[case] format: StoreFormat) {
		assert_eq!(name.parse::<StoreFormat>().unwrap(), format);
	}

	#[test]
	fn canonical_names_round_trip() {
		for format in [
			StoreFormat::Primary,
			StoreFormat::Legacy,
			StoreFormat::Folder,
			StoreFormat::FolderVariant,
		] {
			assert_eq!(format.to_string().parse::<StoreFormat>().unwrap(), format);
		}
		assert!("mbtiles".parse::<StoreFormat>().is_err());
	}
}
