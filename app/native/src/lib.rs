//! Wallthumb - a wallpaper thumbnail cache.
//!
//! Turns full-size wallpaper images into small JPEG previews, stores them under a
//! content-addressed cache directory and keeps that directory bounded with a TTL sweep.
//! The [`thumbnail::ThumbnailService`] facade is the entry point for library users; the
//! `wallthumb` binary wraps it in a CLI.

pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod platform;
pub mod schema;
pub mod thumbnail;

pub use error::{ThumbnailError, WallthumbError};
pub use thumbnail::{CacheStats, ThumbnailConfig, ThumbnailService};
