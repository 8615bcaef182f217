//! Progress indicators for long tile loops.
//!
//! # Examples
//!
//! ```rust
//! use kahelo_core::progress::*;
//!
//! let progress = get_progress_bar("Inserting", 100, false);
//! progress.inc(10);
//! progress.finish();
//! ```

mod progress_bar;

pub use progress_bar::ProgressBar;

/// Create a progress bar, drawn on stderr unless `hidden`.
#[must_use]
pub fn get_progress_bar(message: &str, max_value: u64, hidden: bool) -> ProgressBar {
	if hidden || cfg!(feature = "test") {
		ProgressBar::hidden(message, max_value)
	} else {
		ProgressBar::new(message, max_value)
	}
}
