//! Object framing and content addressing.
//!
//! Every stored object is wrapped in a frame, `<type> SP <len> NUL <payload>`,
//! and addressed by the SHA-1 digest of that frame. This crate owns both
//! halves: [`frame`]/[`unframe`] build and split frames, and
//! [`ObjectHasher`] turns frames into [`ObjectId`](odb_types::ObjectId)s.
//!
//! All hashing wraps the `sha1` crate. No custom cryptography.

pub mod frame;
pub mod hasher;

pub use frame::{frame, unframe, FrameError, RawFrame};
pub use hasher::ObjectHasher;
