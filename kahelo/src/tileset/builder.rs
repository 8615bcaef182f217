use super::{MAX_PROJECT_DEPTH, Selector, TileRect, TilesetSpec, TrackCache, read_project};
use anyhow::{Context, Result, bail, ensure};
use futures::future::{BoxFuture, FutureExt};
use kahelo_container::TileStore;
use kahelo_core::{
	TileSet, TileUnitSegments, TrackMode, close_segment, link_consecutive, link_cyclic, project, track_tiles,
};
use std::{
	collections::HashSet,
	fs,
	path::{Path, PathBuf},
};

/// Evaluates tileset specifications against the store an operation is bound to.
///
/// The store is only read for `records` and for the `inside` filter.
pub struct TilesetBuilder<'a> {
	store: &'a dyn TileStore,
	tracks: &'a TrackCache,
	interpolate: bool,
}

impl<'a> TilesetBuilder<'a> {
	pub fn new(store: &'a dyn TileStore, tracks: &'a TrackCache, interpolate: bool) -> TilesetBuilder<'a> {
		TilesetBuilder {
			store,
			tracks,
			interpolate,
		}
	}

	/// The tiles described by `spec`, zoom level after zoom level.
	pub async fn build(&self, spec: &TilesetSpec) -> Result<TileSet> {
		let mut projects = Vec::new();
		let tiles = self.build_nested(spec.clone(), &mut projects).await?;
		log::debug!("tileset of {} tiles", tiles.size());
		Ok(tiles)
	}

	fn build_nested<'b>(&'b self, spec: TilesetSpec, projects: &'b mut Vec<PathBuf>) -> BoxFuture<'b, Result<TileSet>> {
		async move {
			match &spec.selector {
				Selector::Track { path, mode } => self.track_set(path, *mode, &spec).await,
				Selector::Records => self.records_set(&spec).await,
				Selector::Tiles(rect) => self.rectangle_set(*rect, &spec).await,
				Selector::Project(path) => self.project_set(path, &spec, projects).await,
			}
		}
		.boxed()
	}

	async fn track_set(&self, path: &Path, mode: TrackMode, spec: &TilesetSpec) -> Result<TileSet> {
		let zoom = spec.zoom.as_ref().context("zoom must be given")?;
		let track = self.tracks.get(path)?;

		let mut result = TileSet::new_empty();
		for &level in zoom.levels() {
			let geometry_zoom = zoom.geometry_zoom(level);
			let tiles = track_tiles(&track, mode, geometry_zoom, spec.radius, self.interpolate)?;
			let tiles = if geometry_zoom == level {
				TileSet::from_vec(tiles)
			} else {
				TileSet::subdivided(tiles, geometry_zoom, level)
			};
			result.extend(self.inside_filter(tiles, level, spec.inside).await?);
		}
		Ok(result)
	}

	async fn records_set(&self, spec: &TilesetSpec) -> Result<TileSet> {
		let tiles = self.store.list_tiles(&spec.zoom_levels()).await?;
		Ok(TileSet::from_vec(tiles))
	}

	async fn rectangle_set(&self, rect: TileRect, spec: &TilesetSpec) -> Result<TileSet> {
		match spec.zoom_levels()[..] {
			[] => Ok(TileSet::new_empty()),
			[zoom] => {
				let tiles = TileSet::from_bbox(rect.bbox(zoom)?);
				self.inside_filter(tiles, zoom, spec.inside).await
			}
			_ => bail!("only one zoom level required"),
		}
	}

	async fn project_set(&self, path: &Path, spec: &TilesetSpec, projects: &mut Vec<PathBuf>) -> Result<TileSet> {
		let canonical = enter_project(path, projects)?;
		let children = read_project(path)?;
		projects.push(canonical);

		let mut result = TileSet::new_empty();
		for zoom in spec.zoom_levels() {
			let mut sets = Vec::with_capacity(children.len());
			for child in &children {
				sets.push(self.build_nested(child.nested_at(zoom, spec), projects).await?);
			}
			result.extend(TileSet::union(sets));
		}

		projects.pop();
		Ok(result)
	}

	async fn inside_filter(&self, tiles: TileSet, zoom: u8, inside: bool) -> Result<TileSet> {
		if !inside {
			return Ok(tiles);
		}
		let inventory: HashSet<_> = self.store.list_tiles(&[zoom]).await?.into_iter().collect();
		Ok(tiles.intersect(&inventory))
	}

	/// Track lines of `spec` in tile units at `zoom`, for drawing.
	///
	/// A track is linked the way its mode links it; tracks listed in a project are
	/// drawn segment by segment. Records and rectangles have no lines.
	pub fn view_segments(&self, spec: &TilesetSpec, zoom: u8) -> Result<TileUnitSegments> {
		let mut projects = Vec::new();
		self.segments_nested(spec, zoom, true, &mut projects)
	}

	fn segments_nested(
		&self,
		spec: &TilesetSpec,
		zoom: u8,
		linked: bool,
		projects: &mut Vec<PathBuf>,
	) -> Result<TileUnitSegments> {
		match &spec.selector {
			Selector::Track { path, mode } => {
				let mut segments = project(&*self.tracks.get(path)?, zoom)?;
				if linked {
					match mode {
						TrackMode::Track => link_consecutive(&mut segments),
						TrackMode::Contour => link_cyclic(&mut segments),
						TrackMode::Contours => segments.iter_mut().for_each(close_segment),
						TrackMode::Tracks => {}
					}
				}
				Ok(segments)
			}
			Selector::Project(path) => {
				let canonical = enter_project(path, projects)?;
				let children = read_project(path)?;
				projects.push(canonical);
				let mut segments = Vec::new();
				for child in &children {
					segments.extend(self.segments_nested(child, zoom, false, projects)?);
				}
				projects.pop();
				Ok(segments)
			}
			Selector::Records | Selector::Tiles(_) => Ok(Vec::new()),
		}
	}
}

// Canonical path of a project about to be evaluated, refusing cycles and deep nesting.
fn enter_project(path: &Path, projects: &[PathBuf]) -> Result<PathBuf> {
	let canonical = fs::canonicalize(path).with_context(|| format!("error reading project {path:?}"))?;
	ensure!(!projects.contains(&canonical), "project {path:?} includes itself");
	ensure!(
		projects.len() < MAX_PROJECT_DEPTH,
		"projects are nested deeper than {MAX_PROJECT_DEPTH} levels"
	);
	Ok(canonical)
}
