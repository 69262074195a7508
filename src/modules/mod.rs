pub mod bookinstances;
pub mod books;
pub mod genres;

use biblio_kernel::ModuleRegistry;

use crate::state::Ctx;

/// Register all catalog modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, ctx: &Ctx) {
    registry.register_custom(genres::create_module(ctx.clone()));
    registry.register_custom(bookinstances::create_module(ctx.clone()));
}
