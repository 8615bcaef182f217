use image::Rgb;
use kahelo_container::parse_color;
use serde::{Deserialize, Deserializer, de};

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct DatabaseConfig {
	/// Days after which a dated tile is expired; 0 disables expiry.
	pub tile_validity_days: u32,

	/// Number of written tiles between two commits.
	pub commit_period: u64,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		DatabaseConfig {
			tile_validity_days: 3650,
			commit_period: 100,
		}
	}
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct InsertConfig {
	/// Pause before each request.
	pub request_delay_ms: u64,

	/// Timeout of a single request.
	pub timeout_ms: u64,

	/// Requests per tile before giving up.
	pub attempts: u32,

	/// Maximum number of downloads in one run.
	pub session_max: u64,
}

impl Default for InsertConfig {
	fn default() -> Self {
		InsertConfig {
			request_delay_ms: 50,
			timeout_ms: 3000,
			attempts: 3,
			session_max: 1_000_000,
		}
	}
}

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ImportConfig {
	/// Draw a border coloured by freshness on copied tiles.
	pub draw_tile_limits: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ViewConfig {
	/// Maximum width and height of a mosaic in pixels.
	pub max_dim: u32,
	/// Smooth scaling instead of nearest neighbour.
	pub antialias: bool,
	/// Fill missing tiles from the closest stored ancestor.
	pub draw_upper_tiles: bool,
	pub draw_tile_limits: bool,
	pub draw_tracks: bool,
	/// Paste tile images; otherwise present tiles are painted in the ghost colour.
	pub true_tiles: bool,
}

impl Default for ViewConfig {
	fn default() -> Self {
		ViewConfig {
			max_dim: 10_000,
			antialias: false,
			draw_upper_tiles: false,
			draw_tile_limits: true,
			draw_tracks: true,
			true_tiles: true,
		}
	}
}

/// Colours are written `#rrggbb` or `r,g,b`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct TilesConfig {
	pub jpeg_quality: u8,
	#[serde(deserialize_with = "color")]
	pub background_color: Rgb<u8>,
	#[serde(deserialize_with = "color")]
	pub missing_tile_color: Rgb<u8>,
	#[serde(deserialize_with = "color")]
	pub ghost_tile_color: Rgb<u8>,
	#[serde(deserialize_with = "color")]
	pub border_valid_color: Rgb<u8>,
	#[serde(deserialize_with = "color")]
	pub border_expired_color: Rgb<u8>,
	#[serde(deserialize_with = "color")]
	pub track_color: Rgb<u8>,
	pub track_width: u32,
}

impl Default for TilesConfig {
	fn default() -> Self {
		TilesConfig {
			jpeg_quality: 85,
			background_color: Rgb([32, 32, 32]),
			missing_tile_color: Rgb([128, 128, 128]),
			ghost_tile_color: Rgb([64, 64, 64]),
			border_valid_color: Rgb([255, 255, 255]),
			border_expired_color: Rgb([255, 0, 0]),
			track_color: Rgb([255, 0, 0]),
			track_width: 2,
		}
	}
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct TracksConfig {
	/// Add a point at every tile grid line crossed between two track points.
	pub interpolate_points: bool,
}

impl Default for TracksConfig {
	fn default() -> Self {
		TracksConfig {
			interpolate_points: true,
		}
	}
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
	/// TCP port on 127.0.0.1.
	pub port: u16,
}

impl Default for ServerConfig {
	fn default() -> Self {
		ServerConfig { port: 80 }
	}
}

impl ServerConfig {
	pub fn override_optional_port(&mut self, port: &Option<u16>) {
		if let Some(port) = port {
			self.port = *port;
		}
	}
}

fn color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgb<u8>, D::Error> {
	let text = String::deserialize(deserializer)?;
	parse_color(&text).map_err(de::Error::custom)
}
