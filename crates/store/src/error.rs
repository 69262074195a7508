use thiserror::Error;

/// Failures surfaced by store operations.
///
/// The memory backend only ever reports `Unavailable` (and in practice never
/// does), but the contract keeps every operation fallible so callers are
/// already written for a backend that can actually lose a connection.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
