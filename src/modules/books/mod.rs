//! Book collaborator model.
//!
//! The catalog's other modules reference books read-only: the bookinstance
//! form picks one, and genre deletion is blocked by books that carry the
//! genre. Book CRUD itself lives outside this application.

pub mod models;
