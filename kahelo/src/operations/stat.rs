use super::{Report, RunContext, format_integer};
use anyhow::Result;
use kahelo_container::TileStore;
use kahelo_core::{TileBBox, TileSet, tile_to_deg};
use std::collections::BTreeMap;

/// Size statistics and extent of the stored tiles of one zoom level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoomStat {
	pub count: u64,
	pub min: u64,
	pub max: u64,
	pub total: u64,
	pub bbox: TileBBox,
}

impl ZoomStat {
	fn new(zoom: u8) -> ZoomStat {
		ZoomStat {
			count: 0,
			min: u64::MAX,
			max: 0,
			total: 0,
			bbox: TileBBox::new_empty(zoom),
		}
	}

	fn add(&mut self, size: u64) {
		self.count += 1;
		self.min = self.min.min(size);
		self.max = self.max.max(size);
		self.total += size;
	}

	fn merge(&mut self, other: &ZoomStat) {
		self.count += other.count;
		self.min = self.min.min(other.min);
		self.max = self.max.max(other.max);
		self.total += other.total;
	}

	fn average(&self) -> u64 {
		self.total.checked_div(self.count).unwrap_or(0)
	}
}

/// Result of `stat`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatSummary {
	pub size: u64,
	pub zooms: BTreeMap<u8, ZoomStat>,
}

impl Report for StatSummary {
	fn entries(&self) -> Vec<(&'static str, u64)> {
		let counted = self.zooms.values().map(|s| s.count).sum();
		vec![("Tiles in set", self.size), ("Counted", counted)]
	}
}

impl StatSummary {
	/// Sizes over all zoom levels.
	fn all(&self) -> ZoomStat {
		let mut all = ZoomStat::new(0);
		for stat in self.zooms.values() {
			all.merge(stat);
		}
		all
	}

	/// The size table, then the extent in tile units and in degrees.
	pub fn tables(&self) -> String {
		let rule = "-".repeat(29);
		let mut lines = vec![
			rule.clone(),
			format!(
				"{:>4} {:>6} {:>6} {:>6} {:>8} {:>12} (sizes in byte)",
				"zoom", "count", "min", "max", "average", "total"
			),
		];
		let size_line = |label: String, stat: &ZoomStat| {
			let min = if stat.count == 0 { 0 } else { stat.min };
			format!(
				"{label:>4} {:>6} {:>6} {:>6} {:>8} {:>12}",
				format_integer(stat.count),
				format_integer(min),
				format_integer(stat.max),
				format_integer(stat.average()),
				format_integer(stat.total)
			)
		};
		for (zoom, stat) in &self.zooms {
			lines.push(size_line(zoom.to_string(), stat));
		}
		lines.push(size_line("all".to_string(), &self.all()));

		lines.push(rule.clone());
		lines.push(format!(
			"{:>4} {:>6} {:>6} {:>6} {:>6} (boxing area in tile units)",
			"zoom", "x min", "y min", "x max", "y max"
		));
		for (zoom, stat) in &self.zooms {
			let b = &stat.bbox;
			lines.push(format!("{zoom:>4} {:>6} {:>6} {:>6} {:>6}", b.x_min, b.y_min, b.x_max, b.y_max));
		}

		lines.push(rule);
		lines.push(format!(
			"{:>4} {:>11} {:>11} {:>11} {:>11} (boxing area in degrees)",
			"zoom", "lat min", "long min", "lat max", "long max"
		));
		for (zoom, stat) in &self.zooms {
			let b = &stat.bbox;
			let min = tile_to_deg(f64::from(b.x_min), f64::from(b.y_min), *zoom);
			let max = tile_to_deg(f64::from(b.x_max), f64::from(b.y_max), *zoom);
			lines.push(format!(
				"{zoom:>4} {:>11.6} {:>11.6} {:>11.6} {:>11.6}",
				min.lat, min.lon, max.lat, max.lon
			));
		}
		lines.join("\n")
	}
}

/// Collect size statistics of the stored tiles of `tiles`.
pub async fn stat(context: &RunContext, store: &dyn TileStore, tiles: TileSet) -> Result<StatSummary> {
	let mut summary = StatSummary {
		size: tiles.size(),
		..StatSummary::default()
	};
	let progress = context.progress("reading tiles", summary.size);

	for coord in tiles {
		if let Some(tile) = store.retrieve_bytes(&coord).await? {
			let stat = summary.zooms.entry(coord.zoom).or_insert_with(|| ZoomStat::new(coord.zoom));
			stat.add(tile.data.len());
			stat.bbox.include_coord(coord.x, coord.y);
			log::debug!("tile {coord}: counted");
		}
		progress.inc(1);
	}
	progress.finish();
	Ok(summary)
}
