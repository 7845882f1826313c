//! App settings and preferences
//!
//! Persisted separately from the todo list, in the same key-value storage.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;
use crate::todo::{Filter, TODO_LIST_KEY};

/// Fastest allowed demo counter tick
pub const MIN_TICK_INTERVAL_MS: u32 = 100;

/// App settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Slot the todo list is stored under
    pub storage_key: String,
    /// View shown at startup
    pub initial_filter: Filter,
    /// Demo counter interval
    pub tick_interval_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: TODO_LIST_KEY.to_string(),
            initial_filter: Filter::All,
            tick_interval_ms: 1000,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "todo_demos_settings";

    /// Set the counter interval, clamped to [`MIN_TICK_INTERVAL_MS`]
    pub fn set_tick_interval(&mut self, ms: u32) {
        self.tick_interval_ms = ms.max(MIN_TICK_INTERVAL_MS);
    }

    /// Effective counter interval (hand-edited storage can hold anything)
    pub fn tick_interval_ms(&self) -> u32 {
        self.tick_interval_ms.max(MIN_TICK_INTERVAL_MS)
    }

    /// Load settings, falling back to defaults on a missing or bad slot
    pub fn load(storage: &impl KeyValueStore) -> Self {
        match storage.read(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Failed to read settings: {e}"),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings
    pub fn save(&self, storage: &impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match storage.write(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Failed to save settings: {e}"),
            },
            Err(e) => log::error!("Failed to serialize settings: {e}"),
        }
    }

    /// Forget saved settings; the next load yields defaults
    pub fn reset(storage: &impl KeyValueStore) {
        match storage.remove(Self::STORAGE_KEY) {
            Ok(()) => log::info!("Settings reset"),
            Err(e) => log::warn!("Failed to reset settings: {e}"),
        }
    }
}
