//! Entity store for biblio: document-style collections with async access.
//!
//! The store contract is deliberately small: find-by-id, find-many, find-one,
//! insert (id-assigning), update-by-id, delete-by-id. Every operation can fail
//! with a [`StoreError`], and no multi-document transaction is offered. The
//! default backend keeps documents in memory; a networked document database
//! would slot in behind the same surface.

pub mod error;
pub mod id;
pub mod memory;

pub use error::StoreError;
pub use id::RecordId;
pub use memory::{MemoryCollection, Record};
