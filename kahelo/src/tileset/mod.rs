//! Tileset specifications and the generators turning them into tile sets.
//!
//! A specification names a source of tiles (a GPS track read four ways, a project
//! file, the records of a store or a rectangle of coordinates) together with zoom
//! levels, a radius and the `inside` filter. [`TilesetBuilder`] evaluates it against
//! the store an operation is bound to.

mod args;
pub use args::*;

mod builder;
pub use builder::*;

mod project;
pub use project::*;

mod spec;
pub use spec::*;

mod track_cache;
pub use track_cache::*;
