//! Input file discovery

pub mod discover;

pub use discover::{supported_files, SUPPORTED_EXTS};
