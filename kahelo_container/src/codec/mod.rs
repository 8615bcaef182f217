//! Decoding and encoding of tile images.

use crate::TileFormat;
use anyhow::{Context, Result, bail};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, codecs::jpeg::JpegEncoder};
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};
use kahelo_core::Blob;
use std::io::Cursor;

/// Decode tile bytes in any supported format.
pub fn decode(blob: &Blob) -> Result<DynamicImage> {
	image::load_from_memory(blob.as_slice()).context("unable to decode tile image")
}

/// Encode an image as RGB in `format`. `jpeg_quality` is used for JPG only.
pub fn encode(image: &DynamicImage, format: TileFormat, jpeg_quality: u8) -> Result<Blob> {
	let rgb = image.to_rgb8();
	let mut buffer = Vec::new();
	match format {
		TileFormat::JPG => {
			JpegEncoder::new_with_quality(&mut buffer, jpeg_quality.clamp(1, 100))
				.encode_image(&rgb)
				.context("unable to encode JPG")?;
		}
		TileFormat::PNG => {
			rgb
				.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
				.context("unable to encode PNG")?;
		}
	}
	Ok(Blob::from(buffer))
}

/// Draw a one pixel frame along the edges of `image`.
pub fn draw_border(image: &mut RgbImage, color: Rgb<u8>) {
	let (width, height) = image.dimensions();
	if width == 0 || height == 0 {
		return;
	}
	draw_hollow_rect_mut(image, Rect::at(0, 0).of_size(width, height), color);
}

/// Parse a colour given as `#rrggbb` or `r,g,b`.
pub fn parse_color(text: &str) -> Result<Rgb<u8>> {
	let text = text.trim();
	if let Some(hex) = text.strip_prefix('#') {
		if hex.len() != 6 || !hex.is_ascii() {
			bail!("invalid colour '{text}'");
		}
		let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).with_context(|| format!("invalid colour '{text}'"));
		return Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]));
	}
	let parts = text
		.split(',')
		.map(|p| p.trim().parse::<u8>())
		.collect::<Result<Vec<u8>, _>>()
		.with_context(|| format!("invalid colour '{text}'"))?;
	match parts[..] {
		[r, g, b] => Ok(Rgb([r, g, b])),
		_ => bail!("invalid colour '{text}'"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn sample() -> DynamicImage {
		DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 8, Rgb([200, 100, 50])))
	}

	#[rstest]
	#[case::jpg(TileFormat::JPG, ImageFormat::Jpeg)]
	#[case::png(TileFormat::PNG, ImageFormat::Png)]
	fn encode_produces_format(#[case] format: TileFormat, #[case] expected: ImageFormat) -> Result<()> {
		let blob = encode(&sample(), format, 85)?;
		assert_eq!(image::guess_format(blob.as_slice())?, expected);
		let image = decode(&blob)?;
		assert_eq!((image.width(), image.height()), (16, 8));
		Ok(())
	}

	#[test]
	fn png_is_lossless() -> Result<()> {
		let blob = encode(&sample(), TileFormat::PNG, 0)?;
		assert_eq!(decode(&blob)?.to_rgb8().get_pixel(3, 3), &Rgb([200, 100, 50]));
		Ok(())
	}

	#[test]
	fn decode_rejects_garbage() {
		assert!(decode(&Blob::from("definitely not an image")).is_err());
	}

	#[test]
	fn border_is_drawn_on_edges() {
		let mut image = RgbImage::new(8, 8);
		draw_border(&mut image, Rgb([255, 0, 0]));
		assert_eq!(image.get_pixel(0, 0), &Rgb([255, 0, 0]));
		assert_eq!(image.get_pixel(7, 3), &Rgb([255, 0, 0]));
		assert_eq!(image.get_pixel(4, 7), &Rgb([255, 0, 0]));
		assert_eq!(image.get_pixel(3, 3), &Rgb([0, 0, 0]));
	}

	#[rstest]
	#[case("#ff8000", [255, 128, 0])]
	#[case("0, 64, 255", [0, 64, 255])]
	fn colors(#[case] text: &str, #[case] rgb: [u8; 3]) {
		assert_eq!(parse_color(text).unwrap(), Rgb(rgb));
	}

	#[rstest]
	#[case("#ff80")]
	#[case("#gg0000")]
	#[case("1,2")]
	#[case("1,2,300")]
	fn bad_colors(#[case] text: &str) {
		assert!(parse_color(text).is_err());
	}
}
