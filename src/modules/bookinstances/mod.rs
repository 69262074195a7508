pub mod models;
pub mod routes;

use async_trait::async_trait;
use axum::Router;

use biblio_kernel::{InitCtx, Module};

use crate::state::Ctx;

/// BookInstance CRUD module: workflows for the physical copies of books.
pub struct BookInstancesModule {
    ctx: Ctx,
}

impl BookInstancesModule {
    pub fn new(ctx: Ctx) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Module for BookInstancesModule {
    fn name(&self) -> &'static str {
        "bookinstances"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "bookinstances module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.ctx.clone())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "bookinstances module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "bookinstances module stopped");
        Ok(())
    }
}

/// Create a new instance of the bookinstances module
pub fn create_module(ctx: Ctx) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BookInstancesModule::new(ctx))
}
