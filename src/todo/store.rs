//! Persisted todo list store
//!
//! Holds the list in insertion order and rewrites the full list to its slot
//! after every mutation. Invalid input (blank descriptions, unknown ids) is a
//! silent no-op: nothing here returns an error.

use crate::platform::KeyValueStore;

use super::item::{Filter, TodoItem};

/// Slot key used by the todo app
pub const TODO_LIST_KEY: &str = "TODO_LIST";

/// Todo list backed by a durable key-value slot
#[derive(Debug)]
pub struct TodoStore<S: KeyValueStore> {
    storage: S,
    key: String,
    items: Vec<TodoItem>,
    /// Highest id seen this session (loaded or assigned)
    last_id: u32,
    /// Current view, not persisted
    filter: Filter,
}

impl<S: KeyValueStore> TodoStore<S> {
    /// Open the list stored under `key`. An empty slot, a read failure or
    /// anything that isn't a JSON list of items all start an empty list.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let items = Self::load(&storage, &key);
        let last_id = items.iter().map(|item| item.id).max().unwrap_or(0);
        Self {
            storage,
            key,
            items,
            last_id,
            filter: Filter::default(),
        }
    }

    /// Open the list under [`TODO_LIST_KEY`]
    pub fn with_default_key(storage: S) -> Self {
        Self::open(storage, TODO_LIST_KEY)
    }

    fn load(storage: &S, key: &str) -> Vec<TodoItem> {
        let raw = match storage.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("No todo list under {key}, starting fresh");
                return Vec::new();
            }
            Err(e) => {
                log::warn!("Failed to read {key}: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<TodoItem>>(&raw) {
            Ok(items) => {
                log::info!("Loaded {} todo items", items.len());
                items
            }
            Err(e) => {
                log::warn!("Ignoring unreadable todo list under {key}: {e}");
                Vec::new()
            }
        }
    }

    /// Write the whole list to the slot
    fn persist(&self) {
        let json = match serde_json::to_string(&self.items) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize todo list: {e}");
                return;
            }
        };
        match self.storage.write(&self.key, &json) {
            Ok(()) => log::debug!("Todo list saved ({} items)", self.items.len()),
            Err(e) => log::warn!("Failed to save todo list: {e}"),
        }
    }

    fn position(&self, id: u32) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    // === Mutations ===

    /// Append a new incomplete item. Returns its id, or `None` when the
    /// trimmed description is empty.
    pub fn add(&mut self, description: &str) -> Option<u32> {
        let description = description.trim();
        if description.is_empty() {
            return None;
        }
        let Some(id) = self.last_id.checked_add(1) else {
            log::warn!("Todo id space exhausted");
            return None;
        };

        self.last_id = id;
        self.items.push(TodoItem::new(id, description));
        self.persist();
        Some(id)
    }

    /// Replace the description of `id`, keeping its completion state.
    /// Unknown ids and blank descriptions are ignored.
    pub fn edit(&mut self, id: u32, description: &str) {
        let description = description.trim();
        if description.is_empty() {
            return;
        }
        let Some(pos) = self.position(id) else {
            return;
        };

        self.items[pos] = TodoItem {
            description: description.to_string(),
            ..self.items[pos].clone()
        };
        self.persist();
    }

    /// Flip `completed` on `id`
    pub fn toggle_one(&mut self, id: u32) {
        let Some(pos) = self.position(id) else {
            return;
        };

        self.items[pos] = self.items[pos].toggled();
        self.persist();
    }

    /// Mark everything incomplete if everything is complete, otherwise mark
    /// everything complete. An empty list is left alone and not written.
    pub fn toggle_all(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let completed = !self.all_completed();
        for item in &mut self.items {
            item.completed = completed;
        }
        self.persist();
    }

    /// Remove `id`
    pub fn delete(&mut self, id: u32) {
        let Some(pos) = self.position(id) else {
            return;
        };

        self.items.remove(pos);
        self.persist();
    }

    /// Drop every completed item, keeping the order of the rest. Nothing is
    /// written when no item was completed.
    pub fn clear_completed(&mut self) {
        let before = self.items.len();
        self.items.retain(|item| !item.completed);
        if self.items.len() == before {
            return;
        }
        self.persist();
    }

    // === Views ===

    /// Items matching `filter`, in list order
    pub fn view(&self, filter: Filter) -> Vec<&TodoItem> {
        self.items.iter().filter(|item| filter.matches(item)).collect()
    }

    /// Items matching the current filter
    pub fn visible(&self) -> Vec<&TodoItem> {
        self.view(self.filter)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn get(&self, id: u32) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of incomplete items ("items left")
    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|item| !item.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.items.len() - self.active_count()
    }

    /// True when no item is incomplete (vacuously true for an empty list)
    pub fn all_completed(&self) -> bool {
        self.items.iter().all(|item| item.completed)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
