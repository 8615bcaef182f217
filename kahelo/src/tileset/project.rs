use super::{TilesetSpec, parse_line};
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Projects including projects stop here.
pub const MAX_PROJECT_DEPTH: usize = 32;

/// Read the tilesets listed in a project file.
///
/// One tileset per line, in command line syntax. Text after `;` is a comment and
/// blank lines are skipped. Relative file names resolve against the project's
/// directory.
pub fn read_project(path: &Path) -> Result<Vec<TilesetSpec>> {
	let text = fs::read_to_string(path).with_context(|| format!("error reading project {path:?}"))?;
	let dir = path.parent().unwrap_or_else(|| Path::new(""));

	let mut specs = Vec::new();
	for (index, line) in text.lines().enumerate() {
		let line = line.split(';').next().unwrap_or_default();
		let spec = parse_line(line)
			.with_context(|| format!("incorrect project syntax: {path:?}, line {}", index + 1))?;
		if let Some(spec) = spec {
			specs.push(spec.relative_to(dir));
		}
	}
	log::debug!("project {path:?} lists {} tilesets", specs.len());
	Ok(specs)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tileset::Selector;
	use assert_fs::{TempDir, prelude::*};
	use kahelo_core::TrackMode;

	#[test]
	fn comments_and_relative_paths() -> Result<()> {
		let dir = TempDir::new()?;
		let file = dir.child("trip.project");
		file.write_str("; my trip\n-track walk.gpx -zoom 10 ; first day\n\n   \n-project /abs/other.project\n")?;

		let specs = read_project(file.path())?;
		assert_eq!(specs.len(), 2);
		assert_eq!(
			specs[0].selector,
			Selector::Track {
				path: dir.path().join("walk.gpx"),
				mode: TrackMode::Track
			}
		);
		assert_eq!(specs[1].selector, Selector::Project("/abs/other.project".into()));
		Ok(())
	}

	#[test]
	fn syntax_errors_name_the_line() -> Result<()> {
		let dir = TempDir::new()?;
		let file = dir.child("bad.project");
		file.write_str("-records\n-track walk.gpx\n")?;

		let err = read_project(file.path()).unwrap_err();
		let message = format!("{err:#}");
		assert!(message.contains("incorrect project syntax"), "{message}");
		assert!(message.contains("line 2"), "{message}");
		assert!(message.contains("zoom must be given"), "{message}");
		Ok(())
	}

	#[test]
	fn missing_file() {
		let err = read_project(Path::new("/nonexistent/trip.project")).unwrap_err();
		assert!(err.to_string().contains("error reading project"));
	}
}
