//! Version-aware registry of product packaging metadata.
//!
//! - [`matrix`]: property resolution engine and the built-in product catalog
//! - [`config`]: constants, overlay catalog files and default paths
//! - [`render`]: Markdown rendering of a registry
//! - [`logging`]: tracing subscriber setup for the binary

pub mod config;
pub mod logging;
pub mod matrix;
pub mod render;
