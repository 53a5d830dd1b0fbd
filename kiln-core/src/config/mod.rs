//! Configuration types
//!
//! Firing programs as handed over by the loader, optionally stored as
//! postcard binary data.

pub mod program;

pub use program::*;
