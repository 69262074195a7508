//! biblio application library
//!
//! Server-rendered library catalog: form workflow modules over the biblio
//! framework crates (kernel, http, store, telemetry).

pub mod bootstrap;
pub mod modules;
pub mod state;
pub mod utils;
