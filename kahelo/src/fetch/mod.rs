//! Downloading tiles from a tile server.

mod fetcher;
pub use fetcher::*;

#[cfg(test)]
mod mock;
#[cfg(test)]
pub use mock::*;

mod url_template;
pub use url_template::*;
