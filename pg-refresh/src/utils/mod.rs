//! Utility modules shared by the library and the binary.

pub mod errors;
pub mod logger;

pub use errors::{RefreshError, Result};
