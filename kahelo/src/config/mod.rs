//! The YAML configuration file.
//!
//! Every section and every key is optional; missing values fall back to the
//! built-in defaults. Unknown keys are rejected.

mod main;
pub use main::*;

mod sections;
pub use sections::*;
