//! Platform helpers.
//!
//! - [`path`] - Tilde expansion and path resolution

pub mod path;
