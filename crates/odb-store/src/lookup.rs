//! Name resolution: turning a user-supplied name into an object address.
//!
//! Only full addresses are understood here. Symbolic refs, `HEAD`, and
//! abbreviated prefixes belong to a higher layer, which plugs in by
//! implementing [`ObjectResolver`].

use odb_types::ObjectId;

use crate::error::{StoreError, StoreResult};

/// Resolves a name to a concrete object address.
pub trait ObjectResolver {
    fn resolve(&self, name: &str) -> StoreResult<ObjectId>;
}

/// Accepts exactly a 40-character lowercase hex address.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityResolver;

impl ObjectResolver for IdentityResolver {
    fn resolve(&self, name: &str) -> StoreResult<ObjectId> {
        ObjectId::from_hex(name).map_err(|e| StoreError::invalid_address(name, e))
    }
}
