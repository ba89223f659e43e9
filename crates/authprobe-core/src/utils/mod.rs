//! Utility functions for string formatting.

pub mod format;

pub use format::{mask, truncate, welcome_age};
