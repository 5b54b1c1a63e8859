//! UI layer for the desktop GUI: app shell, sections, and theme.

pub mod app;
pub mod theme;

pub use app::{StartupConfig, SupportHubApp};
