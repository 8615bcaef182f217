//! Filling the inside of a closed tile boundary.
//!
//! The boundary tiles are drawn on a grid covering their bounding box. A flood fill
//! seeded from every cell on the edge of the box marks the outside; whatever the fill
//! cannot reach is inside. A boundary with gaps lets the fill leak in, so the result
//! then degrades to the boundary plus any pockets it still closes off.

use crate::{TileBBox, TileCoord};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Cell {
	Unknown,
	Boundary,
	Outside,
}

/// Boundary tiles plus every tile they enclose, ordered by column then row.
///
/// All tiles must share the same zoom. Runs in time and memory proportional to the
/// area of the bounding box.
#[must_use]
pub fn interior(boundary: &[TileCoord]) -> Vec<TileCoord> {
	let Some(zoom) = boundary.first().map(|t| t.zoom) else {
		return Vec::new();
	};
	let bbox = TileBBox::from_coords(zoom, boundary);
	let width = bbox.width() as usize;
	let height = bbox.height() as usize;
	let index = |x: usize, y: usize| x * height + y;

	let mut grid = vec![Cell::Unknown; width * height];
	for tile in boundary {
		grid[index((tile.x - bbox.x_min) as usize, (tile.y - bbox.y_min) as usize)] = Cell::Boundary;
	}

	let mut stack: Vec<(usize, usize)> = Vec::with_capacity(2 * (width + height));
	for x in 0..width {
		stack.push((x, 0));
		stack.push((x, height - 1));
	}
	for y in 0..height {
		stack.push((0, y));
		stack.push((width - 1, y));
	}

	while let Some((x, y)) = stack.pop() {
		let cell = &mut grid[index(x, y)];
		if *cell != Cell::Unknown {
			continue;
		}
		*cell = Cell::Outside;
		if x + 1 < width {
			stack.push((x + 1, y));
		}
		if x > 0 {
			stack.push((x - 1, y));
		}
		if y + 1 < height {
			stack.push((x, y + 1));
		}
		if y > 0 {
			stack.push((x, y - 1));
		}
	}

	let mut result = Vec::new();
	for x in 0..width {
		for y in 0..height {
			if grid[index(x, y)] != Cell::Outside {
				result.push(TileCoord {
					zoom,
					x: bbox.x_min + x as u32,
					y: bbox.y_min + y as u32,
				});
			}
		}
	}
	result
}
