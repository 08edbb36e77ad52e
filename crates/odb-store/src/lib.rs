//! Content-addressed object storage.
//!
//! Objects (blobs, trees, commits, tags) are framed as
//! `<type> SP <len> NUL <payload>`, addressed by the SHA-1 of that frame, and
//! stored zlib-compressed under `<root>/<2 hex>/<38 hex>`, the same loose
//! layout git uses under `.git/objects/`.
//!
//! # Object Types
//!
//! - [`Blob`] -- opaque content
//! - [`Tree`] -- directory listing, stored opaquely
//! - [`Commit`] -- KVLM headers plus message
//! - [`Tag`] -- KVLM headers plus message
//!
//! All four implement [`ObjectCodec`]; [`Object`] dispatches over them.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`LooseObjectStore`] -- one compressed file per object
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Writes are idempotent: an existing address is never rewritten.
//! 3. No locking. Concurrent writers of the same address write identical bytes.
//! 4. The only integrity check on read is the frame's declared length.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod config;
pub mod error;
pub mod lookup;
pub mod loose;
pub mod memory;
pub mod object;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use lookup::{IdentityResolver, ObjectResolver};
pub use loose::LooseObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{hash_only, Blob, Commit, Object, ObjectCodec, Tag, Tree};
pub use traits::ObjectStore;
