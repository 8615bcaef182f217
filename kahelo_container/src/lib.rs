//! Kahelo Container: tile stores and the rules for copying tiles between them.
//!
//! - [`TileStore`]: the async storage contract, with SQLite, RMaps and folder
//!   implementations opened through [`open_store`],
//! - [`StoreProperties`]: the `.properties` sidecar declaring a store's layout,
//! - [`decode`] / [`encode`]: tile image codec,
//! - [`should_write`]: the decision tables used by insert, import and export.

mod codec;
pub use codec::*;

mod store;
pub use store::*;

mod sync;
pub use sync::*;

mod types;
pub use types::*;
