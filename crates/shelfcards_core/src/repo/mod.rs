//! Persistence boundary for the library store.
//!
//! # Responsibility
//! - Define the key-value adapter contract the store saves through.
//! - Encode/decode the two persisted record sets.
//! - Provide in-memory and SQLite adapter implementations.
//!
//! # Invariants
//! - Adapters store text verbatim; encoding concerns live in `records`.
//! - Read failures degrade to "absent"; only writes report errors.

pub mod memory_storage;
pub mod records;
pub mod sqlite_storage;
pub mod storage;
