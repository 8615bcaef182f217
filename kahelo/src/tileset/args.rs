use super::{Selector, TileRect, TilesetSpec};
use anyhow::{Result, anyhow, bail};
use clap::{Args, Parser};
use kahelo_core::{TrackMode, ZoomSpec};
use std::path::PathBuf;

// Tileset selection shared by every operation working on tiles; also parses project lines.
#[derive(Args, Clone, Debug, Default, PartialEq)]
pub struct TilesetArgs {
	/// tiles along a GPX track, all segments joined into one line
	#[arg(long, value_name = "GPX", group = "selector", display_order = 10)]
	pub track: Option<PathBuf>,

	/// tiles along each segment of a GPX track
	#[arg(long, value_name = "GPX", group = "selector", display_order = 10)]
	pub tracks: Option<PathBuf>,

	/// tiles inside a GPX track closed into one contour
	#[arg(long, value_name = "GPX", group = "selector", display_order = 10)]
	pub contour: Option<PathBuf>,

	/// tiles inside each segment of a GPX track, closed separately
	#[arg(long, value_name = "GPX", group = "selector", display_order = 10)]
	pub contours: Option<PathBuf>,

	/// union of the tilesets listed in a project file
	#[arg(long, value_name = "FILE", group = "selector", display_order = 10)]
	pub project: Option<PathBuf>,

	/// every tile stored in the database
	#[arg(long, group = "selector", display_order = 10)]
	pub records: bool,

	/// rectangle of tile coordinates
	#[arg(long, value_name = "XMIN,YMIN,XMAX,YMAX", group = "selector", display_order = 10)]
	pub tiles: Option<TileRect>,

	/// zoom levels, e.g. "10-12,14" or "10-16/12" to subdivide beyond 12
	#[arg(long, value_name = "ZOOMS", display_order = 11)]
	pub zoom: Option<ZoomSpec>,

	/// radius in kilometres around track points
	#[arg(long, value_name = "KM", allow_hyphen_values = true, display_order = 11)]
	pub radius: Option<f64>,

	/// keep only tiles already present in the database
	#[arg(long, display_order = 11)]
	pub inside: bool,
}

impl TilesetArgs {
	pub fn selector(&self) -> Result<Selector> {
		let tracks = [
			(&self.track, TrackMode::Track),
			(&self.tracks, TrackMode::Tracks),
			(&self.contour, TrackMode::Contour),
			(&self.contours, TrackMode::Contours),
		];
		for (path, mode) in tracks {
			if let Some(path) = path {
				return Ok(Selector::Track {
					path: path.clone(),
					mode,
				});
			}
		}
		if let Some(path) = &self.project {
			return Ok(Selector::Project(path.clone()));
		}
		if self.records {
			return Ok(Selector::Records);
		}
		if let Some(rect) = self.tiles {
			return Ok(Selector::Tiles(rect));
		}
		bail!("source is missing")
	}

	pub fn to_spec(&self) -> Result<TilesetSpec> {
		TilesetSpec::new(self.selector()?, self.zoom.clone(), self.radius, self.inside)
	}
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
struct TilesetLine {
	#[command(flatten)]
	tileset: TilesetArgs,
}

/// Parse a tileset written on one line, as in project files.
///
/// Options may be written with one dash (`-track walk.gpx -zoom 12`). Returns `None`
/// for a line without tokens.
pub fn parse_line(line: &str) -> Result<Option<TilesetSpec>> {
	let tokens: Vec<String> = line.split_whitespace().map(long_option).collect();
	if tokens.is_empty() {
		return Ok(None);
	}
	let parsed = TilesetLine::try_parse_from(&tokens).map_err(|e| {
		let rendered = e.render().to_string();
		let message = rendered.lines().next().unwrap_or_default();
		anyhow!("{}", message.trim_start_matches("error: "))
	})?;
	parsed.tileset.to_spec().map(Some)
}

// `-name` becomes `--name`; negative numbers and short flags stay as they are.
fn long_option(token: &str) -> String {
	let bytes = token.as_bytes();
	if bytes.len() > 2 && bytes[0] == b'-' && bytes[1].is_ascii_alphabetic() {
		format!("-{token}")
	} else {
		token.to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	#[test]
	fn single_dash_options() -> Result<()> {
		let spec = parse_line("-track walk.gpx -zoom 10-12/11 -radius 1.5 -inside")?.unwrap();
		assert_eq!(
			spec.selector,
			Selector::Track {
				path: PathBuf::from("walk.gpx"),
				mode: TrackMode::Track
			}
		);
		assert_eq!(spec.zoom.as_ref().unwrap().levels(), &[10, 11, 12]);
		assert_eq!(spec.zoom.as_ref().unwrap().limit(), Some(11));
		assert_eq!(spec.radius, Some(1.5));
		assert!(spec.inside);
		Ok(())
	}

	#[rstest]
	#[case("--contours area.gpx --zoom 8", Selector::Track { path: "area.gpx".into(), mode: TrackMode::Contours })]
	#[case("-project trip.project", Selector::Project("trip.project".into()))]
	#[case("-records", Selector::Records)]
	#[case("-tiles 1,2,3,4 -zoom 5", Selector::Tiles(TileRect { x_min: 1, y_min: 2, x_max: 3, y_max: 4 }))]
	fn selectors(#[case] line: &str, #[case] selector: Selector) -> Result<()> {
		assert_eq!(parse_line(line)?.unwrap().selector, selector);
		Ok(())
	}

	#[rstest]
	#[case::no_source("-zoom 12", "source is missing")]
	#[case::two_sources("-track a.gpx -contour b.gpx -zoom 12", "cannot be used with")]
	#[case::no_zoom("-tracks a.gpx", "zoom must be given")]
	#[case::bad_zoom("-track a.gpx -zoom 12-40", "zoom values must be integers")]
	#[case::negative_radius("-track a.gpx -zoom 3 -radius -2", "radius must be a positive number")]
	#[case::records_radius("-records -radius 2", "radius is not used for records")]
	#[case::bad_rectangle("-tiles 1,2,3 -zoom 4", "incorrect tile rectangle coordinates")]
	#[case::rectangle_zooms("-tiles 1,2,3,4 -zoom 4-5", "only one zoom level required")]
	#[case::unknown_option("-track a.gpx -zoom 3 -color red", "unexpected argument")]
	fn invalid_lines(#[case] line: &str, #[case] message: &str) {
		let err = parse_line(line).unwrap_err();
		assert!(err.to_string().contains(message), "{err}");
	}

	#[test]
	fn blank_line() -> Result<()> {
		assert!(parse_line("   \t")?.is_none());
		Ok(())
	}

	#[test]
	fn spec_from_str() -> Result<()> {
		let spec: TilesetSpec = "--records --zoom 3".parse()?;
		assert_eq!(spec.zoom_levels(), vec![3]);
		assert!("".parse::<TilesetSpec>().is_err());
		Ok(())
	}
}
