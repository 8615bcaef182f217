//! Conversions between degrees and tile units, and distances on the sphere.
//!
//! Tile units are continuous Web Mercator tile indices: at zoom `z` the world spans
//! `[0, 2^z)` on both axes, x growing eastwards and y southwards. Distances use the
//! haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].

use crate::{GeoPoint, TileUnitPoint};
use anyhow::{Result, ensure};
use std::f64::consts::PI;

/// Mean earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Project a position in degrees to tile units at `zoom`.
///
/// Fails for latitudes at or beyond the poles and for non-finite input.
pub fn deg_to_tile(lat: f64, lon: f64, zoom: u8) -> Result<TileUnitPoint> {
	ensure!(
		lat.is_finite() && lon.is_finite() && lat.abs() < 90.0,
		"error converting ({lat:.4}, {lon:.4}, {zoom}) to tile"
	);
	let lat_rad = lat.to_radians();
	let n = 2.0f64.powi(i32::from(zoom));
	let x = (lon + 180.0) / 360.0 * n;
	let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;
	ensure!(
		x.is_finite() && y.is_finite(),
		"error converting ({lat:.4}, {lon:.4}, {zoom}) to tile"
	);
	Ok(TileUnitPoint { x, y })
}

/// Inverse of [`deg_to_tile`]: the position in degrees of a point in tile units.
#[must_use]
pub fn tile_to_deg(x: f64, y: f64, zoom: u8) -> GeoPoint {
	let n = 2.0f64.powi(i32::from(zoom));
	let lon = x / n * 360.0 - 180.0;
	let lat = (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees();
	GeoPoint { lat, lon }
}

/// Great circle distance in kilometres.
#[must_use]
pub fn haversine_km(p1: GeoPoint, p2: GeoPoint) -> f64 {
	let lat1 = p1.lat.to_radians();
	let lat2 = p2.lat.to_radians();
	let dlat = lat1 - lat2;
	let dlon = p1.lon.to_radians() - p2.lon.to_radians();
	let (s_lat, s_lon) = ((dlat / 2.0).sin(), (dlon / 2.0).sin());
	let a = s_lat * s_lat + s_lon * s_lon * lat1.cos() * lat2.cos();
	let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
	EARTH_RADIUS_KM * c
}

// rounding may push the argument slightly outside [-1, 1]
fn asin_clamped(x: f64) -> f64 {
	x.clamp(-1.0, 1.0).asin()
}

/// Move `point` westwards by `km` along its parallel.
#[must_use]
pub fn shift_longitude_km(point: GeoPoint, km: f64) -> GeoPoint {
	let lat = point.lat.to_radians();
	let lon = point.lon.to_radians();
	let lon = lon - 2.0 * asin_clamped((km / 2.0 / EARTH_RADIUS_KM).sin() / lat.cos());
	GeoPoint {
		lat: point.lat,
		lon: lon.to_degrees(),
	}
}

/// Move `point` southwards by `km` along its meridian.
#[must_use]
pub fn shift_latitude_km(point: GeoPoint, km: f64) -> GeoPoint {
	let lat = point.lat.to_radians() - km / EARTH_RADIUS_KM;
	GeoPoint {
		lat: lat.to_degrees(),
		lon: point.lon,
	}
}

/// Distance in kilometres between two points given in tile units.
#[must_use]
pub fn tile_distance_km(p1: TileUnitPoint, p2: TileUnitPoint, zoom: u8) -> f64 {
	haversine_km(tile_to_deg(p1.x, p1.y, zoom), tile_to_deg(p2.x, p2.y, zoom))
}

/// Horizontal extent in tile units of `km` kilometres around `point`.
///
/// The result grows towards the poles, where a tile covers less ground.
pub fn tile_hdistance_tu(point: TileUnitPoint, zoom: u8, km: f64) -> Result<f64> {
	let shifted = shift_longitude_km(tile_to_deg(point.x, point.y, zoom), km);
	let shifted = deg_to_tile(shifted.lat, shifted.lon, zoom)?;
	Ok((point.x - shifted.x).abs())
}

/// Radius in kilometres of half a tile width at `point`.
#[must_use]
pub fn default_radius_km(point: TileUnitPoint, zoom: u8) -> f64 {
	tile_distance_km(point, TileUnitPoint::new(point.x + 0.5, point.y), zoom)
}
