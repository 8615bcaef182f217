//! Projection of tracks into tile units, and the ways segments are linked afterwards.

use crate::{TileUnitPoint, Track, deg_to_tile};
use anyhow::{Context, Result};

/// Segments of a track in tile units.
pub type TileUnitSegments = Vec<Vec<TileUnitPoint>>;

/// Project every segment of `track` at `zoom`, keeping file order.
pub fn project(track: &Track, zoom: u8) -> Result<TileUnitSegments> {
	track
		.segments()
		.iter()
		.map(|segment| {
			segment
				.iter()
				.map(|p| deg_to_tile(p.lat, p.lon, zoom))
				.collect::<Result<Vec<_>>>()
		})
		.collect::<Result<Vec<_>>>()
		.with_context(|| format!("projecting track at zoom {zoom}"))
}

/// Join consecutive segments into one line: each segment gets the first point of the next one.
pub fn link_consecutive(segments: &mut TileUnitSegments) {
	for index in 1..segments.len() {
		let first = segments[index][0];
		segments[index - 1].push(first);
	}
}

/// Join segments into a loop: like [`link_consecutive`], and the last one gets the first point of the first one.
pub fn link_cyclic(segments: &mut TileUnitSegments) {
	link_consecutive(segments);
	if let Some(first) = segments.first().and_then(|s| s.first().copied())
		&& let Some(last) = segments.last_mut()
	{
		last.push(first);
	}
}

/// Close one segment on itself.
pub fn close_segment(segment: &mut Vec<TileUnitPoint>) {
	if let Some(&first) = segment.first() {
		segment.push(first);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn segments() -> TileUnitSegments {
		vec![
			vec![TileUnitPoint::new(1.0, 1.0), TileUnitPoint::new(2.0, 1.0)],
			vec![TileUnitPoint::new(5.0, 5.0)],
			vec![TileUnitPoint::new(9.0, 9.0), TileUnitPoint::new(9.0, 8.0)],
		]
	}

	#[test]
	fn projects_all_segments() {
		let track = Track::from_tuples(&[&[(0.0, 0.0), (10.0, 10.0)], &[(-10.0, -10.0)]]).unwrap();
		let projected = project(&track, 1).unwrap();
		assert_eq!(projected.len(), 2);
		assert_eq!(projected[0].len(), 2);
		assert_eq!(projected[0][0], TileUnitPoint::new(1.0, 1.0));
		assert_eq!(projected[1].len(), 1);
	}

	#[test]
	fn projection_fails_at_the_pole() {
		let track = Track::from_tuples(&[&[(0.0, 0.0), (90.0, 10.0)]]).unwrap();
		assert!(project(&track, 5).is_err());
	}

	#[test]
	fn consecutive_linking() {
		let mut s = segments();
		link_consecutive(&mut s);
		assert_eq!(s[0].last(), Some(&TileUnitPoint::new(5.0, 5.0)));
		assert_eq!(s[1].last(), Some(&TileUnitPoint::new(9.0, 9.0)));
		assert_eq!(s[2].len(), 2);
	}

	#[test]
	fn cyclic_linking() {
		let mut s = segments();
		link_cyclic(&mut s);
		assert_eq!(s[2].last(), Some(&TileUnitPoint::new(1.0, 1.0)));
		assert_eq!(s[0].len(), 3);

		let mut single = vec![vec![TileUnitPoint::new(3.0, 4.0)]];
		link_cyclic(&mut single);
		assert_eq!(single[0].len(), 2);
	}

	#[test]
	fn closing() {
		let mut s = segments().remove(2);
		close_segment(&mut s);
		assert_eq!(s.len(), 3);
		assert_eq!(s[2], s[0]);
	}
}
