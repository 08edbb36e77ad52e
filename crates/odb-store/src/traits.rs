use odb_digest::{frame, unframe, ObjectHasher};
use odb_types::{ObjectId, ObjectType};

use crate::error::StoreResult;
use crate::object::{Object, ObjectCodec};

/// Content-addressed object store.
///
/// Backends only move whole frames in and out ([`read_frame`] and
/// [`write_frame`]); framing, hashing and decoding live in the provided
/// methods so every backend behaves the same way.
///
/// Invariants:
/// - Objects are immutable once written. The same frame always produces the
///   same ID, so an existing ID means the content is already stored.
/// - Writing is idempotent and returns the ID whether or not anything was
///   written.
/// - Every read re-decodes; there is no cache.
/// - All I/O errors are propagated, never silently ignored.
///
/// [`read_frame`]: ObjectStore::read_frame
/// [`write_frame`]: ObjectStore::write_frame
pub trait ObjectStore: Send + Sync {
    /// Load the uncompressed frame stored under `id`.
    ///
    /// Fails with `NotFound` if there is none.
    fn read_frame(&self, id: &ObjectId) -> StoreResult<Vec<u8>>;

    /// Persist `frame` under `id` unless something is already stored there.
    ///
    /// Returns `true` if this call created the object.
    fn write_frame(&self, id: &ObjectId, frame: &[u8]) -> StoreResult<bool>;

    /// Check whether an object exists in the store.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Read and decode an object.
    ///
    /// Fails with `NotFound`, `MalformedObject` (bad length or payload
    /// grammar) or `UnknownObjectType`.
    fn read(&self, id: &ObjectId) -> StoreResult<Object> {
        let raw = self.read_frame(id)?;
        let parsed = unframe(&raw)?;
        let object = Object::decode(parsed.kind, parsed.payload)?;
        tracing::debug!(%id, kind = %parsed.kind, size = parsed.declared_len, "read object");
        Ok(object)
    }

    /// Encode, frame and store an object; returns its address.
    fn write(&self, object: &Object) -> StoreResult<ObjectId> {
        self.write_payload(object.object_type(), &object.encode())
    }

    /// Frame and store an already-encoded payload; returns its address.
    fn write_payload(&self, kind: ObjectType, payload: &[u8]) -> StoreResult<ObjectId> {
        let frame = frame(kind, payload);
        let id = ObjectHasher::address_of(&frame);
        if self.write_frame(&id, &frame)? {
            tracing::debug!(%id, %kind, size = payload.len(), "wrote object");
        } else {
            tracing::debug!(%id, %kind, "object already present");
        }
        Ok(id)
    }

    /// Read an object and check that it is a `T`.
    fn read_as<T: ObjectCodec>(&self, id: &ObjectId) -> StoreResult<T>
    where
        Self: Sized,
    {
        let object = self.read(id)?.expect_type(id, T::TYPE)?;
        // `expect_type` already checked the kind.
        T::from_object(object).map_err(|other| crate::error::StoreError::TypeMismatch {
            id: *id,
            expected: T::TYPE,
            actual: other.object_type(),
        })
    }

    /// Store a typed object; returns its address.
    fn write_object<T: ObjectCodec>(&self, object: &T) -> StoreResult<ObjectId>
    where
        Self: Sized,
    {
        self.write_payload(T::TYPE, &object.encode())
    }
}
