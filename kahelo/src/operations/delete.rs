use super::{DeleteSummary, RunContext};
use anyhow::Result;
use kahelo_container::TileStore;
use kahelo_core::TileSet;

/// Remove the tiles of `tiles` from `store`, then compact it.
pub async fn delete(context: &RunContext, store: &dyn TileStore, tiles: TileSet) -> Result<DeleteSummary> {
	let commit_period = context.config().database.commit_period;
	let mut summary = DeleteSummary {
		size: tiles.size(),
		..DeleteSummary::default()
	};
	let progress = context.progress("deleting tiles", summary.size);

	let mut processed = 0;
	for coord in tiles {
		if context.is_cancelled() {
			break;
		}
		processed += 1;
		match store.exists(&coord).await {
			Ok(presence) if !presence.is_present() => {
				log::debug!("tile {coord}: missing");
				summary.missing += 1;
			}
			Ok(_) => match store.delete(&coord).await {
				Ok(true) => {
					log::debug!("tile {coord}: deleted");
					summary.deleted += 1;
				}
				Ok(false) => {
					log::debug!("tile {coord}: failed to remove");
					summary.failure += 1;
				}
				Err(e) => {
					log::warn!("tile {coord}: {e:#}");
					summary.failure += 1;
				}
			},
			Err(e) => {
				log::warn!("tile {coord}: {e:#}");
				summary.failure += 1;
			}
		}
		if processed % commit_period == 0 {
			store.commit().await?;
		}
		progress.inc(1);
	}
	progress.finish();

	store.commit().await?;
	store.compact().await?;

	if processed < summary.size {
		log::warn!("stopped with {} tiles left", summary.size - processed);
		summary.missing += summary.size - processed;
	}
	Ok(summary)
}
