//! Zoom level expressions such as `10-12,14` or `10-16/12`.
//!
//! The part before the slash lists the requested zoom levels as comma separated
//! single values or inclusive ranges. The optional part after the slash is the
//! subdivision limit: geometry is computed at most at that zoom, and deeper levels
//! are derived by subdividing the tiles found there.

use crate::MAX_ZOOM;
use anyhow::{Context, Result, bail, ensure};
use std::{fmt, str::FromStr};

/// Requested zoom levels plus an optional subdivision limit.
#[derive(Clone, PartialEq, Eq)]
pub struct ZoomSpec {
	levels: Vec<u8>,
	limit: Option<u8>,
}

impl ZoomSpec {
	/// Create a zoom specification from explicit levels, keeping their order and dropping repeats.
	pub fn new(levels: &[u8], limit: Option<u8>) -> Result<ZoomSpec> {
		let mut unique: Vec<u8> = Vec::with_capacity(levels.len());
		for &zoom in levels {
			ensure!(zoom <= MAX_ZOOM, "zoom values must be integers between 0 and {MAX_ZOOM}");
			if !unique.contains(&zoom) {
				unique.push(zoom);
			}
		}
		if let Some(limit) = limit {
			ensure!(limit <= MAX_ZOOM, "zoom limit must be an integer between 0 and {MAX_ZOOM}");
		}
		Ok(ZoomSpec { levels: unique, limit })
	}

	/// Every zoom level from 0 to [`MAX_ZOOM`], without limit.
	#[must_use]
	pub fn all() -> ZoomSpec {
		ZoomSpec {
			levels: (0..=MAX_ZOOM).collect(),
			limit: None,
		}
	}

	/// A single zoom level, without limit.
	#[must_use]
	pub fn single(zoom: u8) -> ZoomSpec {
		ZoomSpec {
			levels: vec![zoom],
			limit: None,
		}
	}

	/// No zoom level at all.
	#[must_use]
	pub fn empty() -> ZoomSpec {
		ZoomSpec {
			levels: Vec::new(),
			limit: None,
		}
	}

	/// Parse `a-b,c,d` or `a-b,c,d/limit`.
	pub fn parse(text: &str) -> Result<ZoomSpec> {
		let text = text.trim();
		let (range, limit) = match text.split_once('/') {
			Some((range, limit)) => (range, Some(limit)),
			None => (text, None),
		};

		let mut levels = Vec::new();
		for part in range.split(',') {
			let part = part.trim();
			if let Some((from, to)) = part.split_once('-') {
				let from = parse_zoom(from)?;
				let to = parse_zoom(to)?;
				ensure!(from <= to, "invalid zoom range '{part}'");
				levels.extend(from..=to);
			} else {
				levels.push(parse_zoom(part)?);
			}
		}

		let limit = match limit {
			Some(limit) => Some(
				limit
					.trim()
					.parse::<u8>()
					.ok()
					.filter(|l| *l <= MAX_ZOOM)
					.with_context(|| format!("zoom limit must be an integer between 0 and {MAX_ZOOM}, got '{limit}'"))?,
			),
			None => None,
		};

		ZoomSpec::new(&levels, limit)
	}

	#[must_use]
	pub fn levels(&self) -> &[u8] {
		&self.levels
	}

	#[must_use]
	pub fn limit(&self) -> Option<u8> {
		self.limit
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.levels.is_empty()
	}

	#[must_use]
	pub fn contains(&self, zoom: u8) -> bool {
		self.levels.contains(&zoom)
	}

	/// Zoom at which geometry is computed for the requested `zoom`.
	#[must_use]
	pub fn geometry_zoom(&self, zoom: u8) -> u8 {
		match self.limit {
			Some(limit) if zoom > limit => limit,
			_ => zoom,
		}
	}

	/// Same specification restricted to `zoom`: that single level when requested, else none.
	#[must_use]
	pub fn restricted_to(&self, zoom: u8) -> ZoomSpec {
		ZoomSpec {
			levels: if self.contains(zoom) { vec![zoom] } else { Vec::new() },
			limit: self.limit,
		}
	}
}

fn parse_zoom(text: &str) -> Result<u8> {
	let text = text.trim();
	if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
		bail!("zoom values must be integers between 0 and {MAX_ZOOM}, got '{text}'");
	}
	match text.parse::<u8>() {
		Ok(zoom) if zoom <= MAX_ZOOM => Ok(zoom),
		_ => bail!("zoom values must be integers between 0 and {MAX_ZOOM}, got '{text}'"),
	}
}

impl FromStr for ZoomSpec {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self> {
		ZoomSpec::parse(s)
	}
}

impl fmt::Debug for ZoomSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let levels = self.levels.iter().map(u8::to_string).collect::<Vec<_>>().join(",");
		match self.limit {
			Some(limit) => write!(f, "ZoomSpec({levels}/{limit})"),
			None => write!(f, "ZoomSpec({levels})"),
		}
	}
}
