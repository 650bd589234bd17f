use capsule_scheduler_domain::{Entity, ID};
use std::sync::Mutex;

/// Useful functions for creating inmemory repositories

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    collection.push(val.clone());
}

pub fn find<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let collection = collection.lock().unwrap();
    collection.iter().find(|item| item.id() == val_id).cloned()
}

/// Returns at most `limit` matching items in insertion order
pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(
    collection: &Mutex<Vec<T>>,
    mut compare: F,
    limit: usize,
) -> Vec<T> {
    let collection = collection.lock().unwrap();
    collection
        .iter()
        .filter(|item| compare(item))
        .take(limit)
        .cloned()
        .collect()
}

pub fn count_by<T, F: Fn(&T) -> bool>(collection: &Mutex<Vec<T>>, compare: F) -> usize {
    let collection = collection.lock().unwrap();
    collection.iter().filter(|item| compare(item)).count()
}

/// Applies `update` to the item with the given id.
/// Returns `false` if there is no such item.
pub fn update<T: Entity, U: FnOnce(&mut T)>(
    val_id: &ID,
    collection: &Mutex<Vec<T>>,
    update: U,
) -> bool {
    let mut collection = collection.lock().unwrap();
    match collection.iter_mut().find(|item| item.id() == val_id) {
        Some(item) => {
            update(item);
            true
        }
        None => false,
    }
}
