//! Todo Demos - small browser UI demos with a Rust core
//!
//! Core modules:
//! - `todo`: Todo list persisted to a key-value slot
//! - `bridge`: Normalizes async bridge responses into one result shape
//! - `demo`: Counter and guest form scaffold
//! - `platform`: Browser/native storage abstraction
//! - `settings`: Persisted preferences

pub mod bridge;
pub mod demo;
pub mod platform;
pub mod settings;
pub mod todo;

pub use bridge::{BridgeResponse, BridgeResult, DataFail, DataOk, ErrorData, wrap_future};
pub use platform::{KeyValueStore, MemoryStorage, StorageError};
pub use settings::Settings;
pub use todo::{Filter, TODO_LIST_KEY, TodoItem, TodoStore};

/// App constants
pub mod consts {
    /// Directory name for native data
    pub const APP_DIR_NAME: &str = "todo-demos";
    /// Fallback data directory when the platform has none
    pub const FALLBACK_DATA_DIR: &str = ".todo-demos";
}
