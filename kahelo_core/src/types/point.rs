//! Point types: geographic positions and their projection in tile units.

/// A geographic position in degrees (WGS84).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
	pub lat: f64,
	pub lon: f64,
}

impl GeoPoint {
	#[must_use]
	pub fn new(lat: f64, lon: f64) -> GeoPoint {
		GeoPoint { lat, lon }
	}
}

/// A continuous position in tile index space at some zoom, before snapping to a tile.
///
/// The integer part of each component is the tile index, the fractional part the
/// position inside that tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileUnitPoint {
	pub x: f64,
	pub y: f64,
}

impl TileUnitPoint {
	#[must_use]
	pub fn new(x: f64, y: f64) -> TileUnitPoint {
		TileUnitPoint { x, y }
	}

	/// Tile indices containing this point, truncated toward zero.
	#[must_use]
	pub fn truncated(&self) -> (i64, i64) {
		(self.x as i64, self.y as i64)
	}
}
