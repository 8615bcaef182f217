use super::parse_line;
use anyhow::{Context, Result, bail, ensure};
use kahelo_core::{MAX_ZOOM, TileBBox, TrackMode, ZoomSpec};
use std::{
	path::{Path, PathBuf},
	str::FromStr,
};

/// Where the tiles of a tileset come from.
#[derive(Clone, Debug, PartialEq)]
pub enum Selector {
	/// A GPX file, read as a line or a filled contour.
	Track { path: PathBuf, mode: TrackMode },
	/// A project file listing other specifications.
	Project(PathBuf),
	/// Every tile stored in the bound store.
	Records,
	/// A rectangle of tile coordinates.
	Tiles(TileRect),
}

/// Inclusive rectangle of tile indices, `x_min,y_min,x_max,y_max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRect {
	pub x_min: u32,
	pub y_min: u32,
	pub x_max: u32,
	pub y_max: u32,
}

impl TileRect {
	pub fn bbox(&self, zoom: u8) -> Result<TileBBox> {
		TileBBox::new(zoom, self.x_min, self.y_min, self.x_max, self.y_max)
			.with_context(|| format!("tile rectangle outside of zoom level {zoom}"))
	}
}

impl FromStr for TileRect {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self> {
		let values = s
			.split(',')
			.map(|v| v.trim().parse::<u32>())
			.collect::<Result<Vec<u32>, _>>()
			.ok()
			.filter(|v| v.len() == 4)
			.context("incorrect tile rectangle coordinates (xmin,ymin,xmax,ymax)")?;
		let rect = TileRect {
			x_min: values[0],
			y_min: values[1],
			x_max: values[2],
			y_max: values[3],
		};
		ensure!(
			rect.x_min <= rect.x_max && rect.y_min <= rect.y_max,
			"incorrect tile rectangle coordinates (xmin,ymin,xmax,ymax)"
		);
		Ok(rect)
	}
}

/// A validated tileset specification.
#[derive(Clone, Debug, PartialEq)]
pub struct TilesetSpec {
	pub selector: Selector,
	pub zoom: Option<ZoomSpec>,
	/// Radius in kilometres around track points.
	pub radius: Option<f64>,
	/// Keep only tiles already present in the bound store.
	pub inside: bool,
}

impl TilesetSpec {
	pub fn new(selector: Selector, zoom: Option<ZoomSpec>, radius: Option<f64>, inside: bool) -> Result<TilesetSpec> {
		if let Some(radius) = radius {
			ensure!(radius.is_finite() && radius >= 0.0, "radius must be a positive number");
		}
		match &selector {
			Selector::Track { .. } => ensure!(zoom.is_some(), "zoom must be given"),
			Selector::Records => ensure!(radius.is_none(), "radius is not used for records tile set"),
			Selector::Tiles(_) => {
				ensure!(radius.is_none(), "radius is not used for tiles tile set");
				if let Some(zoom) = &zoom {
					ensure!(zoom.levels().len() <= 1, "only one zoom level required");
				}
			}
			Selector::Project(_) => {}
		}
		Ok(TilesetSpec {
			selector,
			zoom,
			radius,
			inside,
		})
	}

	/// The zoom levels this specification produces.
	///
	/// Records and projects default to every level, a rectangle without zoom is empty.
	#[must_use]
	pub fn zoom_levels(&self) -> Vec<u8> {
		match (&self.zoom, &self.selector) {
			(Some(zoom), _) => zoom.levels().to_vec(),
			(None, Selector::Records | Selector::Project(_)) => (0..=MAX_ZOOM).collect(),
			(None, _) => Vec::new(),
		}
	}

	/// Whether the tiles follow a GPS track.
	#[must_use]
	pub fn is_track_family(&self) -> bool {
		matches!(self.selector, Selector::Track { .. })
	}

	/// Resolve relative file names against `dir`.
	#[must_use]
	pub fn relative_to(mut self, dir: &Path) -> TilesetSpec {
		match &mut self.selector {
			Selector::Track { path, .. } | Selector::Project(path) if path.is_relative() => *path = dir.join(&*path),
			_ => {}
		}
		self
	}

	/// This specification as a member of the project `parent`, evaluated at `zoom` only.
	#[must_use]
	pub fn nested_at(&self, zoom: u8, parent: &TilesetSpec) -> TilesetSpec {
		let nested_zoom = match (&self.zoom, &self.selector) {
			(Some(spec), _) => Some(spec.restricted_to(zoom)),
			(None, Selector::Records | Selector::Project(_)) => Some(ZoomSpec::single(zoom)),
			(None, _) => None,
		};
		let radius = match (&self.selector, self.radius, parent.radius) {
			(Selector::Records | Selector::Tiles(_), radius, _) => radius,
			(_, Some(own), Some(inherited)) => Some(own.min(inherited)),
			(_, own, inherited) => own.or(inherited),
		};
		TilesetSpec {
			selector: self.selector.clone(),
			zoom: nested_zoom,
			radius,
			inside: self.inside || parent.inside,
		}
	}
}

impl FromStr for TilesetSpec {
	type Err = anyhow::Error;

	/// Parse a command line fragment such as `--track walk.gpx --zoom 10-12`.
	fn from_str(s: &str) -> Result<Self> {
		match parse_line(s)? {
			Some(spec) => Ok(spec),
			None => bail!("empty tileset specification"),
		}
	}
}
