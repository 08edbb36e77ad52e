//! KVLM: ordered key/value headers followed by a free-form message.
//!
//! This is the text encoding of commit and tag payloads:
//!
//! ```text
//! tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147
//! parent 206941306e8a8af65b66eaaaea388a7ae24d49a0
//! author A U Thor <author@example.com> 1 +0000
//!
//! Initial commit
//! ```
//!
//! A header value containing newlines is written with one-space-indented
//! continuation lines. Keys may repeat; repeated values keep their order.
//!
//! # Modules
//!
//! - [`document`] -- [`KvlmDocument`], the insertion-ordered multimap
//! - [`parser`] -- [`parse`], an iterative cursor-based parser
//! - [`writer`] -- [`serialize`], the exact inverse of [`parse`]
//! - [`error`] -- [`KvlmError`]
//!
//! The defining property: for any document `d` produced by [`parse`],
//! `parse(&serialize(&d)) == Ok(d)`, and `serialize(&parse(raw)?) == raw`.

pub mod document;
pub mod error;
pub mod parser;
pub mod writer;

pub use document::{KvlmDocument, KvlmValue};
pub use error::{KvlmError, Result};
pub use parser::parse;
pub use writer::serialize;
