//! webpad - a mini web-IDE kernel with an optional TUI shell.
//!
//! Module structure:
//! - models: data models (FileTree, OpenFilesRegistry, templates)
//! - kernel: headless core (Store, Action/Command/Effect, preview, services)
//! - logging: tracing setup (rolling file + in-app tee)
//! - app: TUI workbench (behind the `tui` feature)

#[cfg(feature = "tui")]
pub mod app;
pub mod kernel;
pub mod logging;
pub mod models;
