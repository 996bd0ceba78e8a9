//! Logging setup shared by the catch-up binaries.

pub mod logger;

pub use logger::init_logger;
