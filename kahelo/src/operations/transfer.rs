use super::{RunContext, TransferSummary};
use anyhow::Result;
use kahelo_container::{StoredTile, SyncMode, TilePresence, TileStore, decode, draw_border, encode, should_write};
use kahelo_core::{Blob, TileSet};
use image::DynamicImage;

/// Copy the tiles of `tiles` from `source` into `dest`; used by import and export.
///
/// Bytes are copied as they are when both stores share a tile format and no border
/// is drawn, otherwise the tile is decoded, optionally framed with the colour of its
/// freshness and encoded for `dest`. The source date is kept.
pub async fn transfer(
	context: &RunContext,
	source: &dyn TileStore,
	dest: &dyn TileStore,
	tiles: TileSet,
	mode: SyncMode,
) -> Result<TransferSummary> {
	let commit_period = context.config().database.commit_period;
	let freshness = context.freshness();

	let mut summary = TransferSummary {
		size: tiles.size(),
		..TransferSummary::default()
	};
	let progress = context.progress("copying tiles", summary.size);
	let mut processed = 0;

	for coord in tiles {
		if context.is_cancelled() {
			break;
		}
		processed += 1;
		progress.inc(1);

		let src = source.exists(&coord).await?;
		let dst = dest.exists(&coord).await?;
		if src == TilePresence::Missing {
			log::debug!("tile {coord}: missing in source");
			summary.missing += 1;
			continue;
		}
		if !should_write(mode, freshness, src, dst) {
			log::debug!("tile {coord}: source ignored");
			summary.already_present += 1;
			continue;
		}

		let tile = match source.retrieve_bytes(&coord).await {
			Ok(Some(tile)) => tile,
			Ok(None) => {
				summary.missing += 1;
				continue;
			}
			Err(e) => {
				log::debug!("tile {coord}: source unreadable, {e:#}");
				summary.missing += 1;
				continue;
			}
		};
		let data = match convert(context, source, dest, &tile) {
			Ok(data) => data,
			Err(e) => {
				log::debug!("tile {coord}: image conversion error, {e:#}");
				summary.missing += 1;
				continue;
			}
		};
		if let Err(e) = dest.write(tile.timestamp, &coord, &data).await {
			log::warn!("tile {coord}: unable to write, {e:#}");
			summary.missing += 1;
			continue;
		}

		summary.inserted += 1;
		log::debug!("tile {coord}: {}", if dst.is_present() { "updated" } else { "inserted" });
		if summary.inserted % commit_period == 0 {
			dest.commit().await?;
		}
	}
	progress.finish();
	dest.commit().await?;

	if processed < summary.size {
		log::warn!("stopped with {} tiles left", summary.size - processed);
		summary.missing += summary.size - processed;
	}
	Ok(summary)
}

fn convert(context: &RunContext, source: &dyn TileStore, dest: &dyn TileStore, tile: &StoredTile) -> Result<Blob> {
	let draw_limits = context.config().import.draw_tile_limits;
	if source.tile_format() == dest.tile_format() && !draw_limits {
		return Ok(tile.data.clone());
	}

	let mut image = decode(&tile.data)?.to_rgb8();
	if draw_limits {
		let colors = &context.config().tiles;
		let valid = tile.timestamp.is_some() && !context.freshness().is_expired(tile.timestamp);
		let color = if valid {
			colors.border_valid_color
		} else {
			colors.border_expired_color
		};
		draw_border(&mut image, color);
	}
	encode(
		&DynamicImage::ImageRgb8(image),
		dest.tile_format(),
		context.config().tiles.jpeg_quality,
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::Config;
	use image::{ImageFormat, Rgb, RgbImage};
	use kahelo_container::{Freshness, MockStore, TileFormat};
	use kahelo_core::{TileBBox, TileCoord};
	use pretty_assertions::assert_eq;

	const NOW: i64 = 1_700_000_000;

	fn context(draw_tile_limits: bool) -> RunContext {
		let mut config = Config::default();
		config.import.draw_tile_limits = draw_tile_limits;
		config.database.commit_period = 2;
		RunContext::new(config).with_freshness(Freshness::at(NOW, 30))
	}

	fn png(color: [u8; 3]) -> Blob {
		encode(
			&DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb(color))),
			TileFormat::PNG,
			85,
		)
		.unwrap()
	}

	fn coord(x: u32, y: u32) -> TileCoord {
		TileCoord::new(6, x, y).unwrap()
	}

	fn tiles() -> TileSet {
		TileSet::from_bbox(TileBBox::new(6, 0, 0, 1, 1).unwrap())
	}

	#[tokio::test]
	async fn copies_verbatim_with_dates() -> Result<()> {
		let source = MockStore::new(TileFormat::PNG);
		let dest = MockStore::new(TileFormat::PNG);
		source.write(Some(NOW - 10), &coord(0, 0), &png([1, 2, 3])).await?;
		source.write(None, &coord(1, 1), &png([4, 5, 6])).await?;

		let summary = transfer(&context(false), &source, &dest, tiles(), SyncMode::Update).await?;
		assert_eq!(
			summary,
			TransferSummary {
				size: 4,
				already_present: 0,
				inserted: 2,
				missing: 2
			}
		);
		let copied = dest.retrieve_bytes(&coord(0, 0)).await?.unwrap();
		assert_eq!(copied, source.retrieve_bytes(&coord(0, 0)).await?.unwrap());
		assert_eq!(dest.exists(&coord(1, 1)).await?, TilePresence::Present(None));
		assert_eq!(dest.commit_count(), 2);
		Ok(())
	}

	#[tokio::test]
	async fn update_keeps_newer_destination() -> Result<()> {
		let source = MockStore::new(TileFormat::PNG);
		let dest = MockStore::new(TileFormat::PNG);
		source.write(Some(NOW - 100), &coord(0, 0), &png([1, 1, 1])).await?;
		dest.write(Some(NOW - 10), &coord(0, 0), &png([2, 2, 2])).await?;
		source.write(Some(NOW - 10), &coord(1, 0), &png([1, 1, 1])).await?;
		dest.write(Some(NOW - 100), &coord(1, 0), &png([2, 2, 2])).await?;

		let summary = transfer(&context(false), &source, &dest, tiles(), SyncMode::Update).await?;
		assert_eq!((summary.already_present, summary.inserted), (1, 1));
		assert_eq!(dest.exists(&coord(0, 0)).await?, TilePresence::Present(Some(NOW - 10)));
		assert_eq!(dest.exists(&coord(1, 0)).await?, TilePresence::Present(Some(NOW - 10)));

		let summary = transfer(&context(false), &source, &dest, tiles(), SyncMode::Force).await?;
		assert_eq!(summary.inserted, 2);
		Ok(())
	}

	#[tokio::test]
	async fn converts_and_draws_borders() -> Result<()> {
		let source = MockStore::new(TileFormat::PNG);
		let dest = MockStore::new(TileFormat::JPG);
		source.write(Some(NOW), &coord(0, 0), &png([0, 0, 0])).await?;
		source.write(Some(NOW - 60 * 86_400), &coord(1, 0), &png([0, 0, 0])).await?;

		transfer(&context(true), &source, &dest, tiles(), SyncMode::Update).await?;

		let fresh = dest.retrieve_bytes(&coord(0, 0)).await?.unwrap();
		assert_eq!(image::guess_format(fresh.data.as_slice())?, ImageFormat::Jpeg);
		let fresh = decode(&fresh.data)?.to_rgb8();
		let expired = decode(&dest.retrieve_bytes(&coord(1, 0)).await?.unwrap().data)?.to_rgb8();

		// jpeg blurs the frame, compare dominant channels only
		let corner = fresh.get_pixel(0, 8);
		assert!(corner.0.iter().all(|&c| c > 128), "{corner:?}");
		let corner = expired.get_pixel(0, 8);
		assert!(corner[0] > 128 && corner[1] < 128, "{corner:?}");
		assert!(fresh.get_pixel(8, 8)[1] < 64);
		Ok(())
	}

	#[tokio::test]
	async fn undecodable_tiles_are_missing() -> Result<()> {
		let source = MockStore::new(TileFormat::PNG);
		let dest = MockStore::new(TileFormat::JPG);
		source.write(None, &coord(0, 0), &Blob::from("garbage")).await?;
		let summary = transfer(&context(false), &source, &dest, tiles(), SyncMode::Update).await?;
		assert_eq!((summary.inserted, summary.missing), (0, 4));
		Ok(())
	}
}
