//! Contains types like tile coordinates, bounding boxes, zoom specifications, tile sets and tracks.

mod blob;
pub use blob::*;

mod point;
pub use point::*;

mod tile_bbox;
pub use tile_bbox::*;

mod tile_coord;
pub use tile_coord::*;

mod tile_set;
pub use tile_set::*;

mod track;
pub use track::*;

mod zoom_spec;
pub use zoom_spec::*;
