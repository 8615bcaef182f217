//! Rectangular ranges of tiles at a single zoom level.

use crate::{GeoPoint, TileCoord, geo::tile_to_deg};
use anyhow::{Result, ensure};
use std::fmt;

/// An inclusive rectangle of tile indices at one zoom level, possibly empty.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TileBBox {
	pub zoom: u8,
	pub x_min: u32,
	pub y_min: u32,
	pub x_max: u32,
	pub y_max: u32,
}

impl TileBBox {
	/// Create a bounding box from inclusive minimum and maximum indices.
	pub fn new(zoom: u8, x_min: u32, y_min: u32, x_max: u32, y_max: u32) -> Result<TileBBox> {
		ensure!(x_min <= x_max, "x_min ({x_min}) must be <= x_max ({x_max})");
		ensure!(y_min <= y_max, "y_min ({y_min}) must be <= y_max ({y_max})");
		let max = TileCoord::max_index(zoom);
		ensure!(x_max <= max, "x_max ({x_max}) must be <= {max}");
		ensure!(y_max <= max, "y_max ({y_max}) must be <= {max}");
		Ok(TileBBox {
			zoom,
			x_min,
			y_min,
			x_max,
			y_max,
		})
	}

	/// Create an empty bounding box that grows with [`include_coord`](Self::include_coord).
	#[must_use]
	pub fn new_empty(zoom: u8) -> TileBBox {
		TileBBox {
			zoom,
			x_min: u32::MAX,
			y_min: u32::MAX,
			x_max: 0,
			y_max: 0,
		}
	}

	/// Bounding box of a sequence of tiles; empty when the sequence is.
	pub fn from_coords<'a>(zoom: u8, coords: impl IntoIterator<Item = &'a TileCoord>) -> TileBBox {
		let mut bbox = TileBBox::new_empty(zoom);
		for coord in coords {
			bbox.include_coord(coord.x, coord.y);
		}
		bbox
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.x_min > self.x_max || self.y_min > self.y_max
	}

	#[must_use]
	pub fn width(&self) -> u32 {
		if self.is_empty() { 0 } else { self.x_max - self.x_min + 1 }
	}

	#[must_use]
	pub fn height(&self) -> u32 {
		if self.is_empty() { 0 } else { self.y_max - self.y_min + 1 }
	}

	/// Number of tiles covered by the rectangle.
	#[must_use]
	pub fn count_tiles(&self) -> u64 {
		u64::from(self.width()) * u64::from(self.height())
	}

	pub fn include_coord(&mut self, x: u32, y: u32) {
		self.x_min = self.x_min.min(x);
		self.y_min = self.y_min.min(y);
		self.x_max = self.x_max.max(x);
		self.y_max = self.y_max.max(y);
	}

	#[must_use]
	pub fn contains(&self, coord: &TileCoord) -> bool {
		coord.zoom == self.zoom
			&& (self.x_min..=self.x_max).contains(&coord.x)
			&& (self.y_min..=self.y_max).contains(&coord.y)
	}

	/// Iterate over all tiles, column by column.
	pub fn into_iter_coords(self) -> impl Iterator<Item = TileCoord> + Send + 'static {
		let zoom = self.zoom;
		let (y_min, y_max) = (self.y_min, self.y_max);
		let columns = if self.is_empty() { 1..=0 } else { self.x_min..=self.x_max };
		columns.flat_map(move |x| (y_min..=y_max).map(move |y| TileCoord { zoom, x, y }))
	}

	/// Geographic extent as `(north west, south east)` corners.
	#[must_use]
	pub fn to_geo(&self) -> (GeoPoint, GeoPoint) {
		let nw = tile_to_deg(f64::from(self.x_min), f64::from(self.y_min), self.zoom);
		let se = tile_to_deg(f64::from(self.x_max) + 1.0, f64::from(self.y_max) + 1.0, self.zoom);
		(nw, se)
	}
}

impl fmt::Debug for TileBBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_empty() {
			write!(f, "{}: empty", self.zoom)
		} else {
			write!(
				f,
				"{}: [{},{},{},{}] ({})",
				self.zoom,
				self.x_min,
				self.y_min,
				self.x_max,
				self.y_max,
				self.count_tiles()
			)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	#[test]
	fn new_validates() {
		assert!(TileBBox::new(2, 0, 0, 3, 3).is_ok());
		assert!(TileBBox::new(2, 2, 0, 1, 3).is_err());
		assert!(TileBBox::new(2, 0, 0, 4, 3).is_err());
	}

	#[test]
	fn grows_from_coords() {
		let coords = [
			TileCoord::new(5, 3, 7).unwrap(),
			TileCoord::new(5, 6, 2).unwrap(),
			TileCoord::new(5, 4, 4).unwrap(),
		];
		let bbox = TileBBox::from_coords(5, &coords);
		assert_eq!(bbox, TileBBox::new(5, 3, 2, 6, 7).unwrap());
		assert_eq!(bbox.width(), 4);
		assert_eq!(bbox.height(), 6);
		assert_eq!(bbox.count_tiles(), 24);
		assert!(bbox.contains(&coords[2]));
		assert_eq!(format!("{bbox:?}"), "5: [3,2,6,7] (24)");
	}

	#[test]
	fn empty_bbox() {
		let bbox = TileBBox::new_empty(3);
		assert!(bbox.is_empty());
		assert_eq!(bbox.count_tiles(), 0);
		assert_eq!(bbox.into_iter_coords().count(), 0);
	}

	#[test]
	fn iterates_column_first() {
		let coords: Vec<(u32, u32)> = TileBBox::new(4, 1, 5, 2, 6)
			.unwrap()
			.into_iter_coords()
			.map(|c| (c.x, c.y))
			.collect();
		assert_eq!(coords, vec![(1, 5), (1, 6), (2, 5), (2, 6)]);
	}

	#[test]
	fn geo_extent_of_world() {
		let (nw, se) = TileBBox::new(0, 0, 0, 0, 0).unwrap().to_geo();
		assert_relative_eq!(nw.lon, -180.0);
		assert_relative_eq!(se.lon, 180.0);
		assert_relative_eq!(nw.lat, 85.051_128_779_806_59, epsilon = 1e-9);
		assert_relative_eq!(se.lat, -85.051_128_779_806_59, epsilon = 1e-9);
	}
}
