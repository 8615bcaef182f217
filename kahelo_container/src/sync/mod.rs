//! Per-tile decisions when copying a tile from a source into a destination.
//!
//! The source and the destination are classified into a few presence classes, and
//! two fixed tables give the action for every combination: one for forced copies
//! and one for updates, which only replace missing, expired or older tiles.

use crate::{TilePresence, Timestamp};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncMode {
	Force,
	Update,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceClass {
	Absent,
	Undated,
	Dated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DestClass {
	Absent,
	Undated,
	Expired,
	Fresh,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncAction {
	Skip,
	Write,
	/// Write only if the source is strictly newer than the destination.
	WriteIfNewer,
}

use SyncAction::{Skip, Write, WriteIfNewer};

// rows: source class, columns: destination absent / undated / expired / fresh
const FORCE: [[SyncAction; 4]; 3] = [
	/* src absent  */ [Skip, Skip, Skip, Skip],
	/* src undated */ [Write, Write, Write, Write],
	/* src dated   */ [Write, Write, Write, Write],
];

const UPDATE: [[SyncAction; 4]; 3] = [
	/* src absent  */ [Skip, Skip, Skip, Skip],
	/* src undated */ [Write, Skip, Write, Skip],
	/* src dated   */ [Write, Skip, WriteIfNewer, WriteIfNewer],
];

/// Decides whether stored tiles have outlived their validity period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Freshness {
	now: Timestamp,
	validity_secs: Option<i64>,
}

impl Freshness {
	/// Tiles older than `validity_days` are expired; 0 disables expiry.
	#[must_use]
	pub fn new(validity_days: u32) -> Freshness {
		let now = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX));
		Freshness::at(now, validity_days)
	}

	#[must_use]
	pub fn at(now: Timestamp, validity_days: u32) -> Freshness {
		Freshness {
			now,
			validity_secs: (validity_days > 0).then(|| i64::from(validity_days) * 86_400),
		}
	}

	#[must_use]
	pub fn now(&self) -> Timestamp {
		self.now
	}

	/// A dated tile is expired when its date is not after `now - validity`.
	/// Undated tiles never expire.
	#[must_use]
	pub fn is_expired(&self, timestamp: Option<Timestamp>) -> bool {
		match (timestamp, self.validity_secs) {
			(Some(ts), Some(validity)) => ts <= self.now - validity,
			_ => false,
		}
	}

	#[must_use]
	pub fn classify_dest(&self, presence: TilePresence) -> DestClass {
		match presence {
			TilePresence::Missing => DestClass::Absent,
			TilePresence::Present(None) => DestClass::Undated,
			TilePresence::Present(ts) if self.is_expired(ts) => DestClass::Expired,
			TilePresence::Present(Some(_)) => DestClass::Fresh,
		}
	}
}

#[must_use]
pub fn classify_source(presence: TilePresence) -> SourceClass {
	match presence {
		TilePresence::Missing => SourceClass::Absent,
		TilePresence::Present(None) => SourceClass::Undated,
		TilePresence::Present(Some(_)) => SourceClass::Dated,
	}
}

#[must_use]
pub fn sync_action(mode: SyncMode, src: SourceClass, dst: DestClass) -> SyncAction {
	let table = match mode {
		SyncMode::Force => &FORCE,
		SyncMode::Update => &UPDATE,
	};
	table[src as usize][dst as usize]
}

/// Whether the source tile should be written over the destination.
#[must_use]
pub fn should_write(mode: SyncMode, freshness: &Freshness, src: TilePresence, dst: TilePresence) -> bool {
	match sync_action(mode, classify_source(src), freshness.classify_dest(dst)) {
		Skip => false,
		Write => true,
		WriteIfNewer => match (src.timestamp(), dst.timestamp()) {
			(Some(ts_src), Some(ts_dst)) => ts_src > ts_dst,
			_ => false,
		},
	}
}
