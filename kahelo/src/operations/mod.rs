//! The operations run on a store and a tileset.
//!
//! Every operation walks its tileset once, tile after tile, and returns counters
//! that the command line prints with [`display_report`].

mod context;
pub use context::*;

mod count;
pub use count::*;

mod delete;
pub use delete::*;

mod describe;
pub use describe::*;

mod insert;
pub use insert::*;

mod report;
pub use report::*;

mod stat;
pub use stat::*;

mod transfer;
pub use transfer::*;

mod view;
pub use view::*;
