//! A minimal HTTP server publishing the tiles of one store as JPEG.

mod tile_server;
pub use tile_server::*;
