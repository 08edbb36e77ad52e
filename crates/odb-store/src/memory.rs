use std::collections::HashMap;
use std::sync::RwLock;

use odb_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// In-memory, HashMap-based object store.
///
/// Intended for tests and embedding. Frames are held uncompressed behind a
/// `RwLock` for safe concurrent access.
pub struct InMemoryObjectStore {
    frames: RwLock<HashMap<ObjectId, Vec<u8>>>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            frames: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.frames.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.frames.read().expect("lock poisoned").is_empty()
    }

    /// Total frame bytes across all stored objects.
    pub fn total_bytes(&self) -> u64 {
        self.frames
            .read()
            .expect("lock poisoned")
            .values()
            .map(|frame| frame.len() as u64)
            .sum()
    }

    /// Return a sorted list of all object IDs in the store.
    pub fn all_ids(&self) -> Vec<ObjectId> {
        let map = self.frames.read().expect("lock poisoned");
        let mut ids: Vec<ObjectId> = map.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn read_frame(&self, id: &ObjectId) -> StoreResult<Vec<u8>> {
        let map = self.frames.read().expect("lock poisoned");
        map.get(id).cloned().ok_or(StoreError::NotFound(*id))
    }

    fn write_frame(&self, id: &ObjectId, frame: &[u8]) -> StoreResult<bool> {
        let mut map = self.frames.write().expect("lock poisoned");
        if map.contains_key(id) {
            return Ok(false);
        }
        map.insert(*id, frame.to_vec());
        Ok(true)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        let map = self.frames.read().expect("lock poisoned");
        Ok(map.contains_key(id))
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::*;
    use odb_types::ObjectType;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn make_commit(parents: &[ObjectId]) -> Commit {
        let tree = Tree::new(b"".to_vec()).id();
        Commit::new(
            &tree,
            parents,
            "A U Thor <author@example.com> 1 +0000",
            "A U Thor <author@example.com> 1 +0000",
            "message\n\nbody line\n",
        )
    }

    #[test]
    fn write_and_read_blob() {
        let store = InMemoryObjectStore::new();
        let id = store.write_object(&Blob::new("hello world\n")).unwrap();
        assert_eq!(id.to_hex(), "3b18e512dba79e4c8300dd08aeb37f8e728b8dad");
        assert_eq!(
            store.read_frame(&id).unwrap(),
            b"blob 12\x00hello world\n".to_vec()
        );
    }

    #[test]
    fn commit_chain_roundtrip() {
        let store = InMemoryObjectStore::new();
        let root = store.write_object(&make_commit(&[])).unwrap();
        let child = store.write_object(&make_commit(&[root])).unwrap();
        let merge = store.write_object(&make_commit(&[root, child])).unwrap();

        let read: Commit = store.read_as(&merge).unwrap();
        assert_eq!(read.parents().unwrap(), vec![root, child]);
        assert_eq!(read.message(), b"message\n\nbody line\n");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn idempotent_write_keeps_one_copy() {
        let store = InMemoryObjectStore::new();
        let blob = Blob::new("dup");
        let id1 = store.write_object(&blob).unwrap();
        let bytes = store.total_bytes();
        let id2 = store.write_object(&blob).unwrap();
        assert_eq!(id1, id2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_bytes(), bytes);
    }

    #[test]
    fn missing_object_is_not_found() {
        let store = InMemoryObjectStore::default();
        let id = Blob::new("absent").id();
        assert!(matches!(store.read(&id), Err(StoreError::NotFound(missing)) if missing == id));
        assert!(!store.exists(&id).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn all_ids_sorted() {
        let store = InMemoryObjectStore::new();
        for content in ["c", "a", "b"] {
            store.write_object(&Blob::new(content)).unwrap();
        }
        let ids = store.all_ids();
        assert_eq!(ids.len(), 3);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn concurrent_writers_of_same_content_agree() {
        let store = Arc::new(InMemoryObjectStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.write_object(&Blob::new("race")).unwrap())
            })
            .collect();
        let ids: Vec<ObjectId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn debug_shows_count() {
        let store = InMemoryObjectStore::new();
        store.write_object(&Blob::new("x")).unwrap();
        assert_eq!(
            format!("{store:?}"),
            "InMemoryObjectStore { object_count: 1 }"
        );
    }

    proptest! {
        #[test]
        fn any_payload_roundtrips(payload in proptest::collection::vec(any::<u8>(), 0..512), idx in 0usize..2) {
            let store = InMemoryObjectStore::new();
            let kind = [ObjectType::Blob, ObjectType::Tree][idx];
            let id = store.write_payload(kind, &payload).unwrap();
            let object = store.read(&id).unwrap();
            prop_assert_eq!(object.object_type(), kind);
            prop_assert_eq!(object.encode(), payload);
        }
    }
}
