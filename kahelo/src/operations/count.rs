use super::{CountSummary, RunContext};
use anyhow::Result;
use kahelo_container::{TilePresence, TileStore};
use kahelo_core::TileSet;

/// Classify every tile of `tiles` as up to date, expired or missing in `store`.
pub async fn count(context: &RunContext, store: &dyn TileStore, tiles: TileSet) -> Result<CountSummary> {
	let mut summary = CountSummary {
		size: tiles.size(),
		..CountSummary::default()
	};
	let progress = context.progress("counting tiles", summary.size);

	for coord in tiles {
		match store.exists(&coord).await? {
			TilePresence::Present(ts) if context.freshness().is_expired(ts) => {
				log::debug!("tile {coord}: expired");
				summary.expired += 1;
			}
			TilePresence::Present(_) => {
				log::debug!("tile {coord}: available");
				summary.up_to_date += 1;
			}
			TilePresence::Missing => log::debug!("tile {coord}: missing"),
		}
		progress.inc(1);
	}
	progress.finish();

	summary.missing = summary.size.saturating_sub(summary.up_to_date + summary.expired);
	Ok(summary)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::Config;
	use kahelo_container::{Freshness, MockStore, TileFormat};
	use kahelo_core::{Blob, TileBBox, TileCoord};

	const NOW: i64 = 1_700_000_000;

	#[tokio::test]
	async fn classifies_tiles() -> Result<()> {
		let store = MockStore::new(TileFormat::PNG);
		let blob = Blob::from("t");
		store.write(None, &TileCoord::new(4, 0, 0)?, &blob).await?;
		store.write(Some(NOW), &TileCoord::new(4, 1, 0)?, &blob).await?;
		store.write(Some(NOW - 40 * 86_400), &TileCoord::new(4, 0, 1)?, &blob).await?;

		let context = RunContext::new(Config::default()).with_freshness(Freshness::at(NOW, 30));
		let tiles = TileSet::from_bbox(TileBBox::new(4, 0, 0, 2, 2)?);
		let summary = count(&context, &store, tiles).await?;
		assert_eq!(
			summary,
			CountSummary {
				size: 9,
				up_to_date: 2,
				expired: 1,
				missing: 6
			}
		);
		Ok(())
	}
}
