//! Core types and tile geometry of kahelo: coordinates, zoom specifications, lazy tile sets,
//! and the conversion of GPS tracks into the tiles they cross or enclose.

pub mod geo;
pub mod progress;
pub mod types;

pub use geo::*;
pub use types::*;
