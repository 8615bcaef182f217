//! Image formats of stored tiles.

use anyhow::{Result, bail};
use std::{fmt, path::Path, str::FromStr};

/// Concrete byte format of a stored tile.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileFormat {
	JPG,
	PNG,
}

impl TileFormat {
	/// File extension without the dot.
	#[must_use]
	pub fn extension(&self) -> &'static str {
		match self {
			TileFormat::JPG => "jpg",
			TileFormat::PNG => "png",
		}
	}

	/// Format matching the extension of a URL or file name.
	pub fn from_url(url: &str) -> Result<TileFormat> {
		let ext = Path::new(url)
			.extension()
			.and_then(|e| e.to_str())
			.map(str::to_ascii_lowercase);
		Ok(match ext.as_deref() {
			Some("jpg") => TileFormat::JPG,
			Some("png") => TileFormat::PNG,
			_ => bail!("unable to determine tile format from url template '{url}'"),
		})
	}
}

impl fmt::Display for TileFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			TileFormat::JPG => "JPG",
			TileFormat::PNG => "PNG",
		})
	}
}

/// Tile format as declared in the properties sidecar.
///
/// `Server` keeps the bytes as served; the concrete format then follows the
/// extension of the URL template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclaredFormat {
	Fixed(TileFormat),
	Server,
}

impl DeclaredFormat {
	/// The concrete format, resolving `Server` against `url_template`.
	pub fn resolve(&self, url_template: &str) -> Result<TileFormat> {
		match self {
			DeclaredFormat::Fixed(format) => Ok(*format),
			DeclaredFormat::Server => TileFormat::from_url(url_template),
		}
	}

	#[must_use]
	pub fn is_server(&self) -> bool {
		matches!(self, DeclaredFormat::Server)
	}
}

impl fmt::Display for DeclaredFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DeclaredFormat::Fixed(format) => format.fmt(f),
			DeclaredFormat::Server => f.write_str("SERVER"),
		}
	}
}

impl FromStr for DeclaredFormat {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self> {
		Ok(match s.trim().to_ascii_uppercase().as_str() {
			"JPG" | "JPEG" => DeclaredFormat::Fixed(TileFormat::JPG),
			"PNG" => DeclaredFormat::Fixed(TileFormat::PNG),
			"SERVER" => DeclaredFormat::Server,
			"" => bail!("tile format missing, use describe with --tile-format"),
			_ => bail!("tile format '{s}' is not handled"),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("https://a.tile.example.org/{zoom}/{x}/{y}.png", TileFormat::PNG)]
	#[case("http://example.org/{z}/{x}/{y}.JPG", TileFormat::JPG)]
	fn resolve_server(#[case] url: &str, #[case] format: TileFormat) {
		assert_eq!(DeclaredFormat::Server.resolve(url).unwrap(), format);
	}

	#[test]
	fn server_without_extension_fails() {
		assert!(DeclaredFormat::Server.resolve("http://example.org/{z}/{x}/{y}").is_err());
		assert!(DeclaredFormat::Server.resolve("http://example.org/{z}/{x}/{y}.webp").is_err());
	}

	#[test]
	fn fixed_ignores_template() {
		let declared: DeclaredFormat = "png".parse().unwrap();
		assert_eq!(declared.resolve("").unwrap(), TileFormat::PNG);
		assert_eq!(declared.to_string(), "PNG");
		assert_eq!("SERVER".parse::<DeclaredFormat>().unwrap(), DeclaredFormat::Server);
		assert!("gif".parse::<DeclaredFormat>().is_err());
		assert!("".parse::<DeclaredFormat>().is_err());
	}
}
