//! End-to-end todo flows over shared storage

use todo_demos::{Filter, KeyValueStore, MemoryStorage, TODO_LIST_KEY, TodoItem, TodoStore};

fn stored_json(storage: &impl KeyValueStore) -> serde_json::Value {
    let raw = storage.read(TODO_LIST_KEY).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn add_toggle_clear() {
    let storage = MemoryStorage::new();
    let mut store = TodoStore::with_default_key(storage.clone());

    store.add("buy milk");
    assert_eq!(
        stored_json(&storage),
        serde_json::json!([{ "id": 1, "completed": false, "description": "buy milk" }])
    );

    store.toggle_one(1);
    assert_eq!(
        stored_json(&storage),
        serde_json::json!([{ "id": 1, "completed": true, "description": "buy milk" }])
    );

    store.clear_completed();
    assert_eq!(stored_json(&storage), serde_json::json!([]));
}

#[test]
fn reopen_from_same_slot() {
    let storage = MemoryStorage::new();
    {
        let mut store = TodoStore::with_default_key(storage.clone());
        store.add("first");
        store.add("second");
        store.add("third");
        store.toggle_one(2);
        store.delete(1);
        store.set_filter(Filter::Completed);
    }

    let mut store = TodoStore::with_default_key(storage);
    assert_eq!(
        store.items(),
        &[
            TodoItem {
                id: 2,
                completed: true,
                description: "second".into()
            },
            TodoItem::new(3, "third"),
        ]
    );
    // Filter is not persisted
    assert_eq!(store.filter(), Filter::All);
    assert_eq!(store.add("fourth"), Some(4));
}

#[test]
fn separate_keys_do_not_collide() {
    let storage = MemoryStorage::new();
    let mut work = TodoStore::open(storage.clone(), "WORK");
    let mut home = TodoStore::open(storage.clone(), "HOME");

    work.add("ship it");
    home.add("water plants");
    home.add("cook");

    assert_eq!(TodoStore::open(storage.clone(), "WORK").len(), 1);
    assert_eq!(TodoStore::open(storage.clone(), "HOME").len(), 2);
    assert!(TodoStore::with_default_key(storage).is_empty());
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn file_storage_roundtrip() {
    use todo_demos::platform::FileStorage;

    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path()).unwrap();

    {
        let mut store = TodoStore::with_default_key(&storage);
        store.add("persist me");
        store.add("and me");
        store.toggle_all();
    }

    let store = TodoStore::with_default_key(FileStorage::open(dir.path()).unwrap());
    assert_eq!(store.len(), 2);
    assert!(store.all_completed());
    assert_eq!(store.view(Filter::Active).len(), 0);
}
