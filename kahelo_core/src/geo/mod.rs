//! Tile geometry: from GPS tracks to the tiles they cross or enclose.
//!
//! The pipeline runs leaves first: [`coord_math`] converts between degrees and tile
//! units, [`projection`] maps whole tracks, [`expansion`] snaps points to tiles with
//! a radius and grid-line interpolation, and [`interior`] fills closed boundaries.
//! [`track_tiles`] ties them together per [`TrackMode`].

pub mod coord_math;
pub use coord_math::*;

pub mod expansion;
pub use expansion::*;

pub mod interior;
pub use interior::*;

pub mod projection;
pub use projection::*;

mod track_tiles;
pub use track_tiles::*;
