//! Mosaic images of a tileset at one zoom level.
//!
//! The mosaic covers the bounding box of the tileset. Tiles are drawn `256` pixels
//! wide unless the image would exceed `view.max_dim`, in which case they shrink to
//! fit. Each stored tile is pasted, optionally framed with the colour of its
//! freshness; missing tiles are painted with the missing colour or, on request,
//! with the enlarged part of their closest stored ancestor. The track lines of the
//! tileset can be drawn over the tiles.

use super::{RunContext, ViewSummary};
use crate::tileset::TilesetSpec;
use anyhow::{Result, bail, ensure};
use image::{DynamicImage, Rgb, RgbImage, imageops};
use imageproc::{
	drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut},
	rect::Rect,
};
use kahelo_container::{TileStore, draw_border};
use kahelo_core::{TileBBox, TileCoord, TileUnitSegments};

const TILE_SIZE: u32 = 256;

/// Default file name of the mosaic.
pub const DEFAULT_VIEW_IMAGE: &str = "kahelo-view-image.png";

/// Draw the tiles of `spec` found in `store` into one image.
pub async fn view(context: &RunContext, store: &dyn TileStore, spec: &TilesetSpec) -> Result<(RgbImage, ViewSummary)> {
	let zoom = match spec.zoom_levels()[..] {
		[zoom] => zoom,
		[] => bail!("no tiles to display"),
		_ => bail!("view does not apply to multiple zoom levels"),
	};
	let builder = context.tileset_builder(store);
	let mut tiles = builder.build(spec).await?;
	ensure!(tiles.size() > 0, "no tiles to display");

	let bbox = tiles.bounding_box(zoom);
	ensure!(!bbox.is_empty(), "no tiles to display");
	let tile_width = tile_width(bbox.width().max(bbox.height()), context.config().view.max_dim)?;
	log::debug!("mosaic of {bbox:?} with tiles {tile_width} pixels wide");

	let colors = &context.config().tiles;
	let mut mosaic = RgbImage::from_pixel(
		bbox.width() * tile_width,
		bbox.height() * tile_width,
		colors.background_color,
	);
	let mut summary = ViewSummary {
		size: tiles.size(),
		..ViewSummary::default()
	};
	let progress = context.progress("drawing tiles", summary.size);

	for coord in tiles {
		paint_tile(context, store, &mut mosaic, &bbox, tile_width, &coord, &mut summary).await?;
		progress.inc(1);
	}
	progress.finish();

	if context.config().view.draw_tracks {
		let segments = builder.view_segments(spec, zoom)?;
		draw_segments(
			&mut mosaic,
			&segments,
			&bbox,
			tile_width,
			colors.track_color,
			colors.track_width,
		);
	}
	Ok((mosaic, summary))
}

/// Width of one tile in the mosaic for `count` tiles along its longest side.
fn tile_width(count: u32, max_dim: u32) -> Result<u32> {
	let full = u64::from(count) * u64::from(TILE_SIZE);
	let width = if full <= u64::from(max_dim) {
		TILE_SIZE
	} else {
		(u64::from(TILE_SIZE) * u64::from(max_dim) / full) as u32
	};
	ensure!(width > 0, "too many tiles for image size");
	Ok(width)
}

async fn paint_tile(
	context: &RunContext,
	store: &dyn TileStore,
	mosaic: &mut RgbImage,
	bbox: &TileBBox,
	tile_width: u32,
	coord: &TileCoord,
	summary: &mut ViewSummary,
) -> Result<()> {
	let settings = &context.config().view;
	let colors = &context.config().tiles;
	let left = (coord.x - bbox.x_min) * tile_width;
	let top = (coord.y - bbox.y_min) * tile_width;

	let retrieved = match store.retrieve(coord).await {
		Ok(retrieved) => retrieved,
		Err(e) => {
			log::debug!("tile {coord}: unreadable, {e:#}");
			None
		}
	};

	let (image, border) = match retrieved {
		Some((timestamp, image)) => {
			let expired = context.freshness().is_expired(timestamp);
			let border = if expired {
				log::debug!("tile {coord}: pasted, expired");
				summary.expired += 1;
				colors.border_expired_color
			} else {
				log::debug!("tile {coord}: pasted");
				summary.displayed += 1;
				colors.border_valid_color
			};
			let image = if settings.true_tiles {
				resize(context, &image, tile_width)
			} else {
				RgbImage::from_pixel(tile_width, tile_width, colors.ghost_tile_color)
			};
			(Some(image), border)
		}
		None => {
			log::debug!("tile {coord}: missing");
			summary.missing += 1;
			let image = if settings.draw_upper_tiles {
				upper_tile_image(store, coord)
					.await?
					.map(|image| resize(context, &image, tile_width))
			} else {
				None
			};
			(image, colors.border_valid_color)
		}
	};

	let rect = Rect::at(left as i32, top as i32).of_size(tile_width, tile_width);
	match image {
		Some(mut image) => {
			if settings.draw_tile_limits {
				draw_border(&mut image, border);
			}
			imageops::replace(mosaic, &image, i64::from(left), i64::from(top));
		}
		None => {
			draw_filled_rect_mut(mosaic, rect, colors.missing_tile_color);
			if settings.draw_tile_limits {
				draw_hollow_rect_mut(mosaic, rect, border);
			}
		}
	}
	Ok(())
}

fn resize(context: &RunContext, image: &DynamicImage, width: u32) -> RgbImage {
	let filter = if context.config().view.antialias {
		imageops::FilterType::Lanczos3
	} else {
		imageops::FilterType::Nearest
	};
	imageops::resize(&image.to_rgb8(), width, width, filter)
}

/// The part of the closest stored ancestor covering `coord`.
async fn upper_tile_image(store: &dyn TileStore, coord: &TileCoord) -> Result<Option<DynamicImage>> {
	let Some(upper) = store.upper_tile(coord).await? else {
		return Ok(None);
	};
	let Ok(Some((_, image))) = store.retrieve(&upper).await else {
		return Ok(None);
	};

	let scale = 1_u32 << (coord.zoom - upper.zoom);
	let width = (image.width() / scale).max(1);
	let x = (coord.x % scale) * width;
	let y = (coord.y % scale) * width;
	Ok(Some(image.crop_imm(x, y, width, width)))
}

fn draw_segments(
	mosaic: &mut RgbImage,
	segments: &TileUnitSegments,
	bbox: &TileBBox,
	tile_width: u32,
	color: Rgb<u8>,
	line_width: u32,
) {
	let scale = f64::from(tile_width);
	let to_pixel = |x: f64, y: f64| {
		(
			((x - f64::from(bbox.x_min)) * scale).trunc() as f32,
			((y - f64::from(bbox.y_min)) * scale).trunc() as f32,
		)
	};
	let low = -((line_width as i32 - 1) / 2);
	let high = line_width as i32 / 2;

	for segment in segments {
		for pair in segment.windows(2) {
			let start = to_pixel(pair[0].x, pair[0].y);
			let end = to_pixel(pair[1].x, pair[1].y);
			for dx in low..=high {
				for dy in low..=high {
					let (dx, dy) = (dx as f32, dy as f32);
					draw_line_segment_mut(mosaic, (start.0 + dx, start.1 + dy), (end.0 + dx, end.1 + dy), color);
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::Config;
	use kahelo_container::{Freshness, MockStore, TileFormat, encode};
	use kahelo_core::{Blob, TileUnitPoint};
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use std::{env, path::PathBuf};

	const NOW: i64 = 1_700_000_000;

	fn solid(color: [u8; 3]) -> Blob {
		encode(
			&DynamicImage::ImageRgb8(RgbImage::from_pixel(256, 256, Rgb(color))),
			TileFormat::PNG,
			85,
		)
		.unwrap()
	}

	fn context(configure: impl FnOnce(&mut Config)) -> RunContext {
		let mut config = Config::default();
		config.view.draw_tracks = false;
		config.view.draw_tile_limits = false;
		configure(&mut config);
		RunContext::new(config).with_freshness(Freshness::at(NOW, 30))
	}

	fn spec(line: &str) -> TilesetSpec {
		let testdata = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../testdata");
		line.parse::<TilesetSpec>().unwrap().relative_to(&testdata)
	}

	#[rstest]
	#[case(1, 10_000, 256)]
	#[case(39, 10_000, 256)]
	#[case(40, 10_000, 250)]
	#[case(100, 1_000, 10)]
	fn widths(#[case] count: u32, #[case] max_dim: u32, #[case] expected: u32) {
		assert_eq!(tile_width(count, max_dim).unwrap(), expected);
	}

	#[test]
	fn too_many_tiles() {
		assert!(tile_width(1_000, 100).is_err());
	}

	#[tokio::test]
	async fn mosaic_of_a_rectangle() -> Result<()> {
		let store = MockStore::new(TileFormat::PNG);
		store.write(Some(NOW), &TileCoord::new(5, 10, 10)?, &solid([0, 0, 255])).await?;
		store.write(Some(0), &TileCoord::new(5, 11, 10)?, &solid([0, 255, 0])).await?;

		let context = context(|_| {});
		let (image, summary) = view(&context, &store, &spec("-tiles 10,10,11,11 -zoom 5")).await?;
		assert_eq!(image.dimensions(), (512, 512));
		assert_eq!(
			summary,
			ViewSummary {
				size: 4,
				displayed: 1,
				expired: 1,
				missing: 2
			}
		);
		assert_eq!(image.get_pixel(100, 100), &Rgb([0, 0, 255]));
		assert_eq!(image.get_pixel(300, 100), &Rgb([0, 255, 0]));
		assert_eq!(image.get_pixel(100, 300), &context.config().tiles.missing_tile_color);
		Ok(())
	}

	#[tokio::test]
	async fn borders_ghosts_and_ancestors() -> Result<()> {
		let store = MockStore::new(TileFormat::PNG);
		store.write(Some(0), &TileCoord::new(5, 10, 10)?, &solid([0, 0, 255])).await?;
		store.write(None, &TileCoord::new(4, 5, 5)?, &solid([9, 9, 9])).await?;

		let context = context(|config| {
			config.view.draw_tile_limits = true;
			config.view.draw_upper_tiles = true;
			config.view.true_tiles = false;
		});
		let (image, _) = view(&context, &store, &spec("-tiles 10,10,11,11 -zoom 5")).await?;
		let colors = &context.config().tiles;
		assert_eq!(image.get_pixel(0, 50), &colors.border_expired_color);
		assert_eq!(image.get_pixel(100, 100), &colors.ghost_tile_color);
		assert_eq!(image.get_pixel(300, 100), &Rgb([9, 9, 9]));
		assert_eq!(image.get_pixel(256, 100), &colors.border_valid_color);
		Ok(())
	}

	#[tokio::test]
	async fn zoom_checks() {
		let store = MockStore::new(TileFormat::PNG);
		let context = context(|_| {});
		let err = view(&context, &store, &spec("-records")).await.unwrap_err();
		assert!(err.to_string().contains("multiple zoom levels"));
		let err = view(&context, &store, &spec("-records -zoom 3")).await.unwrap_err();
		assert!(err.to_string().contains("no tiles to display"));
	}

	#[tokio::test]
	async fn track_is_drawn() -> Result<()> {
		let store = MockStore::new(TileFormat::PNG);
		let plain = view(&context(|_| {}), &store, &spec("-contour test2.gpx -zoom 12")).await?.0;
		let with_track = view(
			&context(|config| config.view.draw_tracks = true),
			&store,
			&spec("-contour test2.gpx -zoom 12"),
		)
		.await?
		.0;
		let track_color = Config::default().tiles.track_color;
		assert!(!plain.pixels().any(|p| *p == track_color));
		assert!(with_track.pixels().any(|p| *p == track_color));
		Ok(())
	}

	#[test]
	fn thick_lines() {
		let mut image = RgbImage::new(20, 20);
		let bbox = TileBBox::new(1, 0, 0, 1, 1).unwrap();
		let segments = vec![vec![TileUnitPoint::new(0.0, 0.5), TileUnitPoint::new(1.0, 0.5)]];
		draw_segments(&mut image, &segments, &bbox, 10, Rgb([255, 0, 0]), 3);
		assert_eq!(image.get_pixel(5, 4), &Rgb([255, 0, 0]));
		assert_eq!(image.get_pixel(5, 6), &Rgb([255, 0, 0]));
		assert_eq!(image.get_pixel(5, 8), &Rgb([0, 0, 0]));
	}
}
