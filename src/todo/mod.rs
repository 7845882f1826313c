//! Todo list model
//!
//! An ordered list of items mirrored to a durable key-value slot. The store is
//! the only owner of the list; every mutation rewrites the whole slot.

pub mod item;
pub mod store;

pub use item::{Filter, TodoItem};
pub use store::{TODO_LIST_KEY, TodoStore};
