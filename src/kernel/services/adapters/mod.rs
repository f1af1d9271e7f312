//! Service adapters: OS/runtime specific implementations.

pub mod archive;
pub mod storage;
pub mod surface;

pub use archive::{write_archive, ARCHIVE_NAME};
pub use storage::{ensure_log_dir, JsonFileStore, PREFERENCES_KEY, PROJECT_KEY};
pub use surface::ChannelSurface;
