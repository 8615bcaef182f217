use super::{RunContext, TransferSummary};
use crate::fetch::{FetchError, TileFetcher, UrlTemplate};
use anyhow::Result;
use kahelo_container::{SyncMode, TileFormat, TilePresence, TileStore, decode, encode, should_write};
use kahelo_core::{Blob, TileCoord, TileSet};
use std::time::Duration;

/// Download the tiles of `tiles` missing from `store`, or all of them with [`SyncMode::Force`].
///
/// Tiles are fetched one at a time from the store's URL template. A tile the server
/// does not have is missing without retry; other failures are retried. Downloaded
/// tiles are re-encoded to the store's format unless it keeps them as served, and
/// written with the current date.
pub async fn insert(
	context: &RunContext,
	store: &dyn TileStore,
	tiles: TileSet,
	fetcher: &dyn TileFetcher,
	mode: SyncMode,
) -> Result<TransferSummary> {
	let properties = store.properties();
	let template = UrlTemplate::new(&properties.url_template)?;
	let reencode = (!properties.tile_format.is_server()).then(|| store.tile_format());
	let settings = &context.config().insert;
	let commit_period = context.config().database.commit_period;
	let freshness = context.freshness();

	let mut summary = TransferSummary {
		size: tiles.size(),
		..TransferSummary::default()
	};
	let progress = context.progress("inserting tiles", summary.size);
	let mut processed = 0;

	for coord in tiles {
		if context.is_cancelled() {
			break;
		}
		processed += 1;
		progress.inc(1);

		let dst = match store.exists(&coord).await {
			Ok(dst) => dst,
			Err(e) => {
				log::warn!("tile {coord}: {e:#}");
				summary.missing += 1;
				continue;
			}
		};
		if !should_write(mode, freshness, TilePresence::Present(None), dst) {
			log::debug!("tile {coord}: already in database");
			summary.already_present += 1;
			continue;
		}
		if summary.inserted >= settings.session_max {
			summary.missing += 1;
			continue;
		}

		tokio::time::sleep(Duration::from_millis(settings.request_delay_ms)).await;
		let Some(blob) = download(context, fetcher, &template, &coord).await else {
			summary.missing += 1;
			continue;
		};
		let blob = match reencode {
			Some(format) => match convert(&blob, format, context.config().tiles.jpeg_quality) {
				Ok(blob) => blob,
				Err(e) => {
					log::debug!("tile {coord}: image conversion error, {e:#}");
					summary.missing += 1;
					continue;
				}
			},
			None => blob,
		};

		if let Err(e) = store.write(Some(freshness.now()), &coord, &blob).await {
			log::warn!("tile {coord}: {e:#}");
			summary.missing += 1;
			continue;
		}
		summary.inserted += 1;
		log::debug!("tile {coord}: {}", if dst.is_present() { "updated" } else { "inserted" });
		if summary.inserted % commit_period == 0 {
			store.commit().await?;
		}
	}
	progress.finish();
	store.commit().await?;

	if processed < summary.size {
		log::warn!("stopped with {} tiles left", summary.size - processed);
		summary.missing += summary.size - processed;
	}
	Ok(summary)
}

async fn download(context: &RunContext, fetcher: &dyn TileFetcher, template: &UrlTemplate, coord: &TileCoord) -> Option<Blob> {
	let settings = &context.config().insert;
	let timeout = Duration::from_millis(settings.timeout_ms);
	for attempt in 1..=settings.attempts {
		let url = template.url(coord);
		match fetcher.fetch(&url, timeout).await {
			Ok(blob) => return Some(blob),
			Err(FetchError::NotFound) => {
				log::debug!("tile {coord}: {url} not found");
				return None;
			}
			Err(e) => log::debug!("tile {coord}: {url} attempt {attempt} failed, {e}"),
		}
	}
	None
}

fn convert(blob: &Blob, format: TileFormat, jpeg_quality: u8) -> Result<Blob> {
	encode(&decode(blob)?, format, jpeg_quality)
}
