//! Integer tile coordinates in the Web Mercator quad tree.
//!
//! A [`TileCoord`] addresses one raster tile by zoom level and column/row index.
//! Besides construction and validation, it knows how to move through the pyramid:
//! subdividing into descendants at a deeper zoom and climbing to ancestors.
//!
//! # Examples
//!
//! ```
//! use kahelo_core::TileCoord;
//!
//! let coord = TileCoord::new(10, 6, 7).unwrap();
//! assert_eq!(coord.ancestor(9).unwrap(), TileCoord::new(9, 3, 3).unwrap());
//! assert_eq!(coord.subdivide(11).count(), 4);
//! ```

use anyhow::{Result, ensure};
use std::fmt::{self, Debug};

/// Highest zoom level handled by tile sets and stores.
pub const MAX_ZOOM: u8 = 18;

/// A tile coordinate with zoom level, column `x` and row `y`.
#[derive(Eq, PartialEq, Clone, Hash, Copy)]
pub struct TileCoord {
	/// The zoom level of the tile.
	pub zoom: u8,
	/// The column index, growing eastwards.
	pub x: u32,
	/// The row index, growing southwards.
	pub y: u32,
}

impl TileCoord {
	/// Create a new `TileCoord`, checking that `x` and `y` lie in `[0, 2^zoom - 1]`.
	pub fn new(zoom: u8, x: u32, y: u32) -> Result<TileCoord> {
		ensure!(zoom <= 31, "zoom ({zoom}) must be <= 31");
		let max = Self::max_index(zoom);
		ensure!(x <= max, "x ({x}) out of bounds for zoom {zoom}");
		ensure!(y <= max, "y ({y}) out of bounds for zoom {zoom}");
		Ok(TileCoord { zoom, x, y })
	}

	/// Create a `TileCoord` from signed indices, returning `None` outside the valid range.
	pub fn checked(zoom: u8, x: i64, y: i64) -> Option<TileCoord> {
		let max = i64::from(Self::max_index(zoom));
		if (0..=max).contains(&x) && (0..=max).contains(&y) {
			Some(TileCoord {
				zoom,
				x: x as u32,
				y: y as u32,
			})
		} else {
			None
		}
	}

	/// Largest valid column or row index at `zoom`, i.e. `2^zoom - 1`.
	#[must_use]
	pub fn max_index(zoom: u8) -> u32 {
		if zoom >= 32 {
			u32::MAX
		} else {
			((1u64 << zoom) - 1) as u32
		}
	}

	/// Iterate over the `4^(zoom - self.zoom)` descendants of this tile at `zoom`.
	///
	/// Descendants are ordered by column first, then by row. Requesting the tile's own
	/// zoom yields the tile itself; requesting a lower zoom yields nothing.
	pub fn subdivide(&self, zoom: u8) -> impl Iterator<Item = TileCoord> + Send + 'static + use<> {
		let ratio: u32 = if zoom >= self.zoom { 1 << (zoom - self.zoom) } else { 0 };
		let (x0, y0) = (self.x * ratio, self.y * ratio);
		(0..ratio).flat_map(move |dx| (0..ratio).map(move |dy| TileCoord { zoom, x: x0 + dx, y: y0 + dy }))
	}

	/// Number of descendants a tile at `from_zoom` has at `to_zoom`, `4^(to_zoom - from_zoom)`.
	#[must_use]
	pub fn subdivision_size(from_zoom: u8, to_zoom: u8) -> u64 {
		if to_zoom < from_zoom {
			0
		} else {
			1u64 << (2 * u32::from(to_zoom - from_zoom))
		}
	}

	/// Return the ancestor of this tile at the lower (or equal) `zoom`.
	pub fn ancestor(&self, zoom: u8) -> Result<TileCoord> {
		ensure!(
			zoom <= self.zoom,
			"ancestor zoom ({zoom}) must not exceed tile zoom ({})",
			self.zoom
		);
		let shift = self.zoom - zoom;
		Ok(TileCoord {
			zoom,
			x: self.x >> shift,
			y: self.y >> shift,
		})
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_fmt(format_args!("TileCoord({}, [{}, {}])", &self.zoom, &self.x, &self.y))
	}
}

impl fmt::Display for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashSet;

	#[test]
	fn new_checks_bounds() {
		assert!(TileCoord::new(0, 0, 0).is_ok());
		assert!(TileCoord::new(2, 3, 3).is_ok());
		assert!(TileCoord::new(2, 4, 0).is_err());
		assert!(TileCoord::new(2, 0, 4).is_err());
		assert!(TileCoord::new(32, 0, 0).is_err());
	}

	#[rstest]
	#[case::inside(3, 7, 0, true)]
	#[case::negative_x(3, -1, 0, false)]
	#[case::negative_y(3, 0, -1, false)]
	#[case::too_large(3, 8, 2, false)]
	fn checked(#[case] zoom: u8, #[case] x: i64, #[case] y: i64, #[case] valid: bool) {
		assert_eq!(TileCoord::checked(zoom, x, y).is_some(), valid);
	}

	#[rstest]
	#[case(10, 10)]
	#[case(10, 11)]
	#[case(10, 12)]
	#[case(5, 9)]
	#[case(0, 3)]
	fn subdivide_size_and_parent(#[case] limit: u8, #[case] zoom: u8) {
		let coord = TileCoord::new(limit, 37 % (1 << limit), 21 % (1 << limit)).unwrap();
		let tiles: Vec<TileCoord> = coord.subdivide(zoom).collect();
		assert_eq!(tiles.len() as u64, TileCoord::subdivision_size(limit, zoom));
		assert_eq!(tiles.iter().collect::<HashSet<_>>().len(), tiles.len());
		let ratio = 1u32 << (zoom - limit);
		for tile in tiles {
			assert_eq!(tile.zoom, zoom);
			assert_eq!((tile.x / ratio, tile.y / ratio), (coord.x, coord.y));
			assert_eq!(tile.ancestor(limit).unwrap(), coord);
		}
	}

	#[test]
	fn subdivide_order_is_column_first() {
		let tiles: Vec<TileCoord> = TileCoord::new(1, 1, 0).unwrap().subdivide(2).collect();
		let expected: Vec<TileCoord> = [(2, 0), (2, 1), (3, 0), (3, 1)]
			.iter()
			.map(|&(x, y)| TileCoord::new(2, x, y).unwrap())
			.collect();
		assert_eq!(tiles, expected);
	}

	#[test]
	fn subdivide_to_lower_zoom_is_empty() {
		assert_eq!(TileCoord::new(4, 1, 1).unwrap().subdivide(3).count(), 0);
	}

	#[test]
	fn ancestor_rejects_deeper_zoom() {
		assert!(TileCoord::new(4, 1, 1).unwrap().ancestor(5).is_err());
	}

	#[test]
	fn formatting() {
		let coord = TileCoord::new(4, 7, 8).unwrap();
		assert_eq!(format!("{coord:?}"), "TileCoord(4, [7, 8])");
		assert_eq!(coord.to_string(), "4/7/8");
	}
}
