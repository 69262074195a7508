//! Core traits, settings, and module registry for biblio.

pub mod module;
pub mod registry;
pub mod settings;
pub mod views;

pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
pub use views::ViewRenderer;
