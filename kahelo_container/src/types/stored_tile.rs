use kahelo_core::Blob;

/// Unix time in seconds.
pub type Timestamp = i64;

/// Whether a tile is present in a store, and since when if known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TilePresence {
	Missing,
	/// Present; `None` when the store does not know the tile's date.
	Present(Option<Timestamp>),
}

impl TilePresence {
	#[must_use]
	pub fn is_present(&self) -> bool {
		matches!(self, TilePresence::Present(_))
	}

	#[must_use]
	pub fn timestamp(&self) -> Option<Timestamp> {
		match self {
			TilePresence::Present(ts) => *ts,
			TilePresence::Missing => None,
		}
	}
}

/// Raw bytes of a stored tile with its timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredTile {
	pub timestamp: Option<Timestamp>,
	pub data: Blob,
}

impl StoredTile {
	#[must_use]
	pub fn presence(&self) -> TilePresence {
		TilePresence::Present(self.timestamp)
	}
}
