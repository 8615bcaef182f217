//! GPS tracks as nested point sequences.

use crate::GeoPoint;
use anyhow::{Result, ensure};

/// An ordered list of segments, each an ordered, non-empty list of points.
///
/// All tracks of a file are flattened into one `Track`, keeping file order.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
	segments: Vec<Vec<GeoPoint>>,
}

impl Track {
	/// Build a track, dropping empty segments.
	///
	/// Fails when no point is left.
	pub fn new(segments: Vec<Vec<GeoPoint>>) -> Result<Track> {
		let segments: Vec<Vec<GeoPoint>> = segments.into_iter().filter(|s| !s.is_empty()).collect();
		ensure!(!segments.is_empty(), "track contains no points");
		for point in segments.iter().flatten() {
			ensure!(
				point.lat.is_finite() && point.lon.is_finite(),
				"invalid track point ({}, {})",
				point.lat,
				point.lon
			);
		}
		Ok(Track { segments })
	}

	/// Convenience constructor from `(lat, lon)` tuples.
	pub fn from_tuples(segments: &[&[(f64, f64)]]) -> Result<Track> {
		Track::new(
			segments
				.iter()
				.map(|s| s.iter().map(|&(lat, lon)| GeoPoint::new(lat, lon)).collect())
				.collect(),
		)
	}

	#[must_use]
	pub fn segments(&self) -> &[Vec<GeoPoint>] {
		&self.segments
	}

	pub fn points(&self) -> impl Iterator<Item = &GeoPoint> {
		self.segments.iter().flatten()
	}
}
