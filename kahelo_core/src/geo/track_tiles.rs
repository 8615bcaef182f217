//! From a track to the tiles needed at one zoom level.

use super::{close_segment, expand, interior, link_consecutive, link_cyclic, project};
use crate::{TileCoord, Track};
use anyhow::Result;
use std::{collections::BTreeSet, fmt, str::FromStr};

/// How the segments of a track are linked and whether the enclosed area is included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackMode {
	/// Segments joined into one line.
	Track,
	/// Segments as independent lines.
	Tracks,
	/// Segments joined into one closed loop, filled.
	Contour,
	/// Each segment closed on itself and filled separately.
	Contours,
}

impl TrackMode {
	#[must_use]
	pub fn is_contour(&self) -> bool {
		matches!(self, TrackMode::Contour | TrackMode::Contours)
	}

	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			TrackMode::Track => "track",
			TrackMode::Tracks => "tracks",
			TrackMode::Contour => "contour",
			TrackMode::Contours => "contours",
		}
	}
}

impl fmt::Display for TrackMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for TrackMode {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self> {
		Ok(match s {
			"track" => TrackMode::Track,
			"tracks" => TrackMode::Tracks,
			"contour" => TrackMode::Contour,
			"contours" => TrackMode::Contours,
			_ => anyhow::bail!("unknown track mode '{s}'"),
		})
	}
}

/// Tiles covered by `track` at `zoom` in the given mode, ordered by column then row.
///
/// `radius_km` widens the line; without it, half a tile width is used.
pub fn track_tiles(track: &Track, mode: TrackMode, zoom: u8, radius_km: Option<f64>, interpolate: bool) -> Result<Vec<TileCoord>> {
	let mut segments = project(track, zoom)?;
	log::trace!("{mode} at zoom {zoom}: {} segments", segments.len());

	Ok(match mode {
		TrackMode::Track => {
			link_consecutive(&mut segments);
			expand(&segments, zoom, radius_km, interpolate)?
		}
		TrackMode::Tracks => expand(&segments, zoom, radius_km, interpolate)?,
		TrackMode::Contour => {
			link_cyclic(&mut segments);
			interior(&expand(&segments, zoom, radius_km, interpolate)?)
		}
		TrackMode::Contours => {
			let mut tiles = BTreeSet::new();
			for mut segment in segments {
				close_segment(&mut segment);
				let boundary = expand(&[segment], zoom, radius_km, interpolate)?;
				tiles.extend(interior(&boundary).into_iter().map(|t| (t.x, t.y)));
			}
			tiles.into_iter().map(|(x, y)| TileCoord { zoom, x, y }).collect()
		}
	})
}
