//! Headless application core (state/action/effect).

pub mod action;
pub mod autosave;
pub mod command;
pub mod effect;
pub mod preview;
pub mod services;
pub mod state;
pub mod store;
pub mod terminal;

pub use action::Action;
pub use command::Command;
pub use effect::Effect;
pub use preview::{PreviewBuild, PreviewError, PreviewSources, PreviewState};
pub use state::{AppState, ConfirmDialogState, ExplorerState, PendingClose, UiState};
pub use store::{DispatchResult, Store};
pub use terminal::TerminalState;
