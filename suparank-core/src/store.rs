/// Storage collaborators the ranking service talks to.
///
/// Implementations own ID allocation and must hand back fully typed values:
/// any loosely-shaped backend record is validated before it leaves the store.
use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::types::{Item, ItemId, Session, SessionId};

/// Persistence for ranking sessions.
pub trait SessionStore {
    /// Persist a new session and allocate its ID.
    fn create(&mut self, state: &Session) -> Result<SessionId>;

    /// Fails with `NotFound` if the session is absent or its record is unreadable.
    fn load(&self, id: &str) -> Result<Session>;

    /// Overwrite an existing session. Fails with `StoreUnavailable` on backend failure.
    fn save(&mut self, id: &str, state: &Session) -> Result<()>;

    fn delete(&mut self, id: &str) -> Result<()>;
}

/// Persistence for the items being ranked.
pub trait ItemStore {
    /// Every item, in creation order.
    fn list_all(&self) -> Result<Vec<Item>>;

    fn get(&self, id: &str) -> Result<Item>;

    fn create(&mut self, title: &str, description: &str) -> Result<Item>;

    fn delete(&mut self, id: &str) -> Result<()>;
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: HashMap<SessionId, Session>,
    next_id: u64,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&mut self, state: &Session) -> Result<SessionId> {
        self.next_id += 1;
        let id = format!("ses-{}", self.next_id);
        self.sessions.insert(id.clone(), state.clone());
        Ok(id)
    }

    fn load(&self, id: &str) -> Result<Session> {
        self.sessions
            .get(id)
            .cloned()
            .ok_or_else(|| Error::session_not_found(id))
    }

    fn save(&mut self, id: &str, state: &Session) -> Result<()> {
        match self.sessions.get_mut(id) {
            Some(slot) => {
                *slot = state.clone();
                Ok(())
            }
            None => Err(Error::session_not_found(id)),
        }
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.sessions
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::session_not_found(id))
    }
}

/// In-process item store. IDs are allocated sequentially, so listing
/// order matches creation order.
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    items: BTreeMap<u64, Item>,
    next_id: u64,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(id: &str) -> Option<u64> {
        id.strip_prefix("item-")?.parse().ok()
    }
}

impl ItemStore for MemoryItemStore {
    fn list_all(&self) -> Result<Vec<Item>> {
        Ok(self.items.values().cloned().collect())
    }

    fn get(&self, id: &str) -> Result<Item> {
        Self::key(id)
            .and_then(|key| self.items.get(&key))
            .cloned()
            .ok_or_else(|| Error::item_not_found(id))
    }

    fn create(&mut self, title: &str, description: &str) -> Result<Item> {
        self.next_id += 1;
        let item = Item {
            id: format!("item-{}", self.next_id),
            title: title.to_string(),
            description: description.to_string(),
        };
        self.items.insert(self.next_id, item.clone());
        Ok(item)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        Self::key(id)
            .and_then(|key| self.items.remove(&key))
            .map(|_| ())
            .ok_or_else(|| Error::item_not_found(id))
    }
}

/// Resolve IDs to items in the given order.
pub fn resolve_items(items: &impl ItemStore, ids: &[ItemId]) -> Result<Vec<Item>> {
    let by_id: HashMap<ItemId, Item> = items
        .list_all()?
        .into_iter()
        .map(|item| (item.id.clone(), item))
        .collect();
    ids.iter()
        .map(|id| by_id.get(id).cloned().ok_or_else(|| Error::item_not_found(id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_session_round_trip() {
        let mut store = MemorySessionStore::new();
        let session = Session::new(&["a".to_string(), "b".to_string()]).unwrap();
        let id = store.create(&session).unwrap();
        assert_eq!(store.load(&id).unwrap(), session);

        let mut advanced = session.clone();
        advanced.advance();
        store.save(&id, &advanced).unwrap();
        assert_eq!(store.load(&id).unwrap(), advanced);
    }

    #[test]
    fn test_memory_session_ids_are_unique() {
        let mut store = MemorySessionStore::new();
        let session = Session::new(&["a".to_string()]).unwrap();
        let first = store.create(&session).unwrap();
        let second = store.create(&session).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_memory_session_missing() {
        let mut store = MemorySessionStore::new();
        let session = Session::new(&["a".to_string()]).unwrap();
        assert_eq!(store.load("nope"), Err(Error::session_not_found("nope")));
        assert_eq!(store.save("nope", &session), Err(Error::session_not_found("nope")));
        assert_eq!(store.delete("nope"), Err(Error::session_not_found("nope")));
    }

    #[test]
    fn test_memory_items_keep_creation_order() {
        let mut store = MemoryItemStore::new();
        let titles = [
            "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
            "tenth",
        ];
        for title in titles {
            store.create(title, "").unwrap();
        }
        let titles: Vec<String> = store.list_all().unwrap().into_iter().map(|i| i.title).collect();
        assert_eq!(titles.first().map(String::as_str), Some("first"));
        assert_eq!(titles.last().map(String::as_str), Some("tenth"));
    }

    #[test]
    fn test_memory_item_delete() {
        let mut store = MemoryItemStore::new();
        let item = store.create("Write report", "Due Friday").unwrap();
        assert_eq!(store.get(&item.id).unwrap(), item);
        store.delete(&item.id).unwrap();
        assert_eq!(store.get(&item.id), Err(Error::item_not_found(&item.id)));
        assert_eq!(store.delete(&item.id), Err(Error::item_not_found(&item.id)));
    }

    #[test]
    fn test_resolve_items_reports_missing() {
        let mut store = MemoryItemStore::new();
        let item = store.create("A", "").unwrap();
        let resolved = resolve_items(&store, &[item.id.clone()]).unwrap();
        assert_eq!(resolved, vec![item.clone()]);
        assert_eq!(
            resolve_items(&store, &[item.id.clone(), "item-99".to_string()]),
            Err(Error::item_not_found("item-99"))
        );
    }
}
