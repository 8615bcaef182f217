//! Lazy tile sequences with a declared size.
//!
//! A [`TileSet`] pairs a single-pass stream of tiles with a count known in advance,
//! so that operations can report progress without walking the stream twice. The
//! count comes from analysis (subdivision ratio, rectangle area, list length) rather
//! than from consuming the stream.
//!
//! Two operations need the tiles themselves before iteration: the bounding box and
//! the intersection with a store inventory. Both call [`TileSet::materialize`], which
//! turns the stream into a vector once and keeps it.

use crate::{TileBBox, TileCoord};
use std::{collections::HashSet, fmt, mem};

type TileStream = Box<dyn Iterator<Item = TileCoord> + Send>;

enum Tiles {
	Lazy(TileStream),
	Materialized(Vec<TileCoord>),
}

/// A single-pass tile stream plus its analytically known size.
pub struct TileSet {
	size: u64,
	tiles: Tiles,
}

impl TileSet {
	/// An empty set.
	#[must_use]
	pub fn new_empty() -> TileSet {
		TileSet {
			size: 0,
			tiles: Tiles::Materialized(Vec::new()),
		}
	}

	/// A lazy set from a stream whose length is known to be `size`.
	pub fn from_stream(stream: impl Iterator<Item = TileCoord> + Send + 'static, size: u64) -> TileSet {
		TileSet {
			size,
			tiles: Tiles::Lazy(Box::new(stream)),
		}
	}

	/// A set backed by a vector; the size is its length.
	#[must_use]
	pub fn from_vec(tiles: Vec<TileCoord>) -> TileSet {
		TileSet {
			size: tiles.len() as u64,
			tiles: Tiles::Materialized(tiles),
		}
	}

	/// Every tile of `bbox`, column by column.
	#[must_use]
	pub fn from_bbox(bbox: TileBBox) -> TileSet {
		let size = bbox.count_tiles();
		TileSet::from_stream(bbox.into_iter_coords(), size)
	}

	/// Each tile of `tiles` replaced by its descendants at `zoom`.
	///
	/// All tiles must share the zoom `from_zoom`; the declared size is
	/// `len(tiles) * 4^(zoom - from_zoom)` and nothing is expanded before iteration.
	#[must_use]
	pub fn subdivided(tiles: Vec<TileCoord>, from_zoom: u8, zoom: u8) -> TileSet {
		let size = tiles.len() as u64 * TileCoord::subdivision_size(from_zoom, zoom);
		TileSet::from_stream(tiles.into_iter().flat_map(move |t| t.subdivide(zoom)), size)
	}

	/// Declared number of tiles.
	#[must_use]
	pub fn size(&self) -> u64 {
		self.size
	}

	#[must_use]
	pub fn is_materialized(&self) -> bool {
		matches!(self.tiles, Tiles::Materialized(_))
	}

	/// Append `other`; sizes add.
	pub fn extend(&mut self, other: TileSet) {
		self.size += other.size;
		let first = mem::replace(&mut self.tiles, Tiles::Materialized(Vec::new()));
		self.tiles = match (first, other.tiles) {
			(Tiles::Materialized(mut a), Tiles::Materialized(b)) => {
				a.extend(b);
				Tiles::Materialized(a)
			}
			(a, b) => Tiles::Lazy(Box::new(a.into_stream().chain(b.into_stream()))),
		};
	}

	/// Collect the stream into memory, keeping it available for iteration.
	pub fn materialize(&mut self) -> &[TileCoord] {
		let tiles = match mem::replace(&mut self.tiles, Tiles::Materialized(Vec::new())) {
			Tiles::Lazy(stream) => stream.collect(),
			Tiles::Materialized(tiles) => tiles,
		};
		self.tiles = Tiles::Materialized(tiles);
		match &self.tiles {
			Tiles::Materialized(tiles) => tiles,
			Tiles::Lazy(_) => &[],
		}
	}

	/// Bounding box of the tiles at `zoom`; materializes the set.
	pub fn bounding_box(&mut self, zoom: u8) -> TileBBox {
		TileBBox::from_coords(zoom, self.materialize().iter().filter(|t| t.zoom == zoom))
	}

	/// Keep only the tiles contained in `inventory`; the size becomes the number kept.
	///
	/// Materializes the set. Duplicates in the stream are kept once.
	#[must_use]
	pub fn intersect(self, inventory: &HashSet<TileCoord>) -> TileSet {
		let mut seen = HashSet::new();
		let tiles: Vec<TileCoord> = self
			.into_iter()
			.filter(|t| inventory.contains(t) && seen.insert(*t))
			.collect();
		TileSet::from_vec(tiles)
	}

	/// Union of the sets; the size is the number of distinct tiles.
	///
	/// Order follows first appearance.
	#[must_use]
	pub fn union(sets: Vec<TileSet>) -> TileSet {
		let mut seen = HashSet::new();
		let mut tiles = Vec::new();
		for set in sets {
			for tile in set {
				if seen.insert(tile) {
					tiles.push(tile);
				}
			}
		}
		TileSet::from_vec(tiles)
	}
}

impl Tiles {
	fn into_stream(self) -> TileStream {
		match self {
			Tiles::Lazy(stream) => stream,
			Tiles::Materialized(tiles) => Box::new(tiles.into_iter()),
		}
	}
}

impl IntoIterator for TileSet {
	type Item = TileCoord;
	type IntoIter = TileStream;

	fn into_iter(self) -> Self::IntoIter {
		self.tiles.into_stream()
	}
}

impl Default for TileSet {
	fn default() -> Self {
		TileSet::new_empty()
	}
}

impl FromIterator<TileCoord> for TileSet {
	fn from_iter<T: IntoIterator<Item = TileCoord>>(iter: T) -> Self {
		TileSet::from_vec(iter.into_iter().collect())
	}
}

impl fmt::Debug for TileSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = if self.is_materialized() { "materialized" } else { "lazy" };
		write!(f, "TileSet({} tiles, {state})", self.size)
	}
}

/// Tiles of one zoom from `(x, y)` pairs.
pub fn tiles_at_zoom(zoom: u8, xy: impl IntoIterator<Item = (u32, u32)>) -> Vec<TileCoord> {
	xy.into_iter().map(|(x, y)| TileCoord { zoom, x, y }).collect()
}
