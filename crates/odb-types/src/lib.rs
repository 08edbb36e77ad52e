//! Foundation types for the object database.
//!
//! Every other `odb-*` crate depends on `odb-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Content address (SHA-1 of an object's frame)
//! - [`ObjectType`] -- The four stored record kinds and their ASCII tags

pub mod error;
pub mod kind;
pub mod object;

pub use error::TypeError;
pub use kind::ObjectType;
pub use object::ObjectId;
