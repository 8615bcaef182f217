//! # kahelo
//!
//! An offline tile cache manager for GPS-oriented map tiles.
//!
//! Given a GPS track or contour and a tile server, kahelo computes which tiles are
//! needed at which zoom levels, downloads them into a local store and keeps stores
//! synchronized.
//!
//! - [`tileset`]: tileset specifications (`--track`, `--contour`, `--project`, ...) and the
//!   generators turning them into lazy [`TileSet`](kahelo_core::TileSet)s,
//! - [`operations`]: count, insert, import/export, delete, view and stat,
//! - [`fetch`]: URL templates and tile downloads,
//! - [`config`]: the YAML configuration file,
//! - [`server`]: a minimal HTTP tile server (feature `server`).
//!
//! ## Usage Example
//!
//! ```no_run
//! use kahelo::{config::Config, operations::*, tileset::*};
//! use kahelo_container::open_store;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let context = RunContext::new(Config::default());
//!     let store = open_store(Path::new("cache.db"))?;
//!     let spec: TilesetSpec = "--track walk.gpx --zoom 10-14".parse()?;
//!     let tiles = context.tileset_builder(store.as_ref()).build(&spec).await?;
//!     let summary = count(&context, store.as_ref(), tiles).await?;
//!     println!("{summary:?}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod fetch;
pub mod operations;
#[cfg(feature = "server")]
pub mod server;
pub mod tileset;

pub use kahelo_container as container;
pub use kahelo_core as core;
