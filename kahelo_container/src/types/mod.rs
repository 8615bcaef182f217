mod properties;
pub use properties::*;

mod store_format;
pub use store_format::*;

mod stored_tile;
pub use stored_tile::*;

mod tile_format;
pub use tile_format::*;
