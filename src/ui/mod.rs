//! TUI components
//!
//! Rendering lives in `main.rs`; this module holds what the renderers
//! share.

pub mod theme;

pub use theme::Theme;
