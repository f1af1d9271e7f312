//! Application layer (TUI workbench).

pub mod workbench;

pub use workbench::Workbench;
