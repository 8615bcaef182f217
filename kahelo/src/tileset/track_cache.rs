use anyhow::{Context, Result};
use kahelo_core::{GeoPoint, Track};
use std::{
	collections::HashMap,
	fs::File,
	io::BufReader,
	path::{Path, PathBuf},
	sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// GPX files read during one run, each parsed once.
#[derive(Debug, Default)]
pub struct TrackCache {
	tracks: Mutex<HashMap<PathBuf, Arc<Track>>>,
}

impl TrackCache {
	#[must_use]
	pub fn new() -> TrackCache {
		TrackCache::default()
	}

	fn tracks(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<Track>>> {
		self.tracks.lock().unwrap_or_else(PoisonError::into_inner)
	}

	/// The track in `path`, read on first use.
	pub fn get(&self, path: &Path) -> Result<Arc<Track>> {
		if let Some(track) = self.tracks().get(path) {
			return Ok(Arc::clone(track));
		}
		let track = Arc::new(read_gpx(path)?);
		self.tracks().insert(path.to_path_buf(), Arc::clone(&track));
		Ok(track)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.tracks().len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Read every track segment of a GPX file.
pub fn read_gpx(path: &Path) -> Result<Track> {
	log::debug!("read track {path:?}");
	let file = File::open(path).with_context(|| format!("error reading {path:?}"))?;
	let gpx = gpx::read(BufReader::new(file)).with_context(|| format!("error parsing gpx file {path:?}"))?;

	let segments = gpx
		.tracks
		.iter()
		.flat_map(|track| track.segments.iter())
		.map(|segment| {
			segment
				.points
				.iter()
				.map(|waypoint| {
					let point = waypoint.point();
					GeoPoint::new(point.y(), point.x())
				})
				.collect::<Vec<_>>()
		})
		.filter(|points| !points.is_empty())
		.collect();

	Track::new(segments).with_context(|| format!("no points found in gpx file {path:?}"))
}
