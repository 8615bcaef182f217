//! Turning tile-unit segments into integer tiles.
//!
//! Every point of a segment is replaced by the tiles of a disk around it. Between
//! two points, interpolation adds one point per grid line the segment crosses, so
//! shallow diagonals cannot skip a tile. Float to integer conversions truncate
//! toward zero throughout; tiles outside the world are dropped at the end.

use crate::{TileCoord, TileUnitPoint, default_radius_km, tile_hdistance_tu};
use anyhow::{Result, ensure};
use std::collections::BTreeSet;

/// Integer tile indices before clipping to the world.
pub type TileIndexSet = BTreeSet<(i64, i64)>;

#[inline]
fn trunc(v: f64) -> i64 {
	v as i64
}

/// Insert a point at every integer grid line crossed between consecutive points.
///
/// The dominant axis decides which grid lines are stepped through; the other
/// coordinate comes from the line equation. A pair inside one tile contributes only
/// its first point. A single point is returned unchanged.
#[must_use]
pub fn interpolate(points: &[TileUnitPoint]) -> Vec<TileUnitPoint> {
	if points.len() < 2 {
		return points.to_vec();
	}

	let mut result = Vec::with_capacity(points.len() * 2);
	for pair in points.windows(2) {
		let (p1, p2) = (pair[0], pair[1]);
		result.push(p1);

		if p1.truncated() == p2.truncated() {
			continue;
		}

		if p1.x == p2.x {
			let (y_lo, y_hi) = sorted(p1.y, p2.y);
			for y in (trunc(y_lo) + 1)..trunc(y_hi) {
				result.push(TileUnitPoint::new(p1.x, y as f64));
			}
		} else {
			let a = (p2.y - p1.y) / (p2.x - p1.x);
			let b = p1.y - a * p1.x;
			if (p2.x - p1.x).abs() > (p2.y - p1.y).abs() {
				let (x_lo, x_hi) = sorted(p1.x, p2.x);
				for x in (trunc(x_lo) + 1)..=trunc(x_hi) {
					let x = x as f64;
					result.push(TileUnitPoint::new(x, a * x + b));
				}
			} else {
				let (y_lo, y_hi) = sorted(p1.y, p2.y);
				for y in (trunc(y_lo) + 1)..=trunc(y_hi) {
					let y = y as f64;
					result.push(TileUnitPoint::new((y - b) / a, y));
				}
			}
		}
		result.push(p2);
	}
	result
}

fn sorted(a: f64, b: f64) -> (f64, f64) {
	if a <= b { (a, b) } else { (b, a) }
}

/// Add the tiles touched by a disk of `radius_km` around `point`.
///
/// The tile-unit radius is measured at the point. Each column crossing the disk
/// receives the rows within the half height at that column, for both the column
/// and its left neighbour, which avoids seams between columns.
pub fn circle_tiles(point: TileUnitPoint, zoom: u8, radius_km: f64, tiles: &mut TileIndexSet) -> Result<()> {
	let r = tile_hdistance_tu(point, zoom, radius_km)?;
	let (x, y) = (point.x, point.y);

	tiles.insert((trunc(x - r), trunc(y)));
	tiles.insert((trunc(x), trunc(y + r)));
	tiles.insert((trunc(x), trunc(y - r)));

	for xt in (trunc(x - r) + 1)..=trunc(x + r) {
		let dx = xt as f64 - x;
		let h = (r * r - dx * dx).max(0.0).sqrt();
		for yt in trunc(y - h)..=trunc(y + h) {
			tiles.insert((xt, yt));
			tiles.insert((xt - 1, yt));
		}
	}
	Ok(())
}

/// Expand tile-unit segments into the deduplicated tiles they cover at `zoom`.
///
/// Without a radius, half a tile width measured at the first point of the first
/// segment is used. A radius of zero keeps the tile containing each point.
/// The result is ordered by column, then row.
pub fn expand(segments: &[Vec<TileUnitPoint>], zoom: u8, radius_km: Option<f64>, interpolate_points: bool) -> Result<Vec<TileCoord>> {
	let Some(first) = segments.iter().find_map(|s| s.first()) else {
		return Ok(Vec::new());
	};
	let radius_km = match radius_km {
		Some(radius) => {
			ensure!(radius.is_finite() && radius >= 0.0, "radius must be a positive number");
			radius
		}
		None => default_radius_km(*first, zoom),
	};

	let mut tiles = TileIndexSet::new();
	for segment in segments {
		let points = if interpolate_points {
			interpolate(segment)
		} else {
			segment.clone()
		};
		for point in points {
			if radius_km == 0.0 {
				tiles.insert(point.truncated());
			} else {
				circle_tiles(point, zoom, radius_km, &mut tiles)?;
			}
		}
	}

	Ok(clip(&tiles, zoom))
}

/// Keep the tiles inside `[0, 2^zoom - 1]` on both axes.
#[must_use]
pub fn clip(tiles: &TileIndexSet, zoom: u8) -> Vec<TileCoord> {
	tiles.iter().filter_map(|&(x, y)| TileCoord::checked(zoom, x, y)).collect()
}
