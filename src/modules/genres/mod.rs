pub mod models;
pub mod routes;

use async_trait::async_trait;
use axum::Router;

use biblio_kernel::{InitCtx, Module};

use crate::state::Ctx;

/// Genre CRUD module: list, detail, create, update, delete workflows.
pub struct GenresModule {
    ctx: Ctx,
}

impl GenresModule {
    pub fn new(ctx: Ctx) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Module for GenresModule {
    fn name(&self) -> &'static str {
        "genres"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "genres module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.ctx.clone())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "genres module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "genres module stopped");
        Ok(())
    }
}

/// Create a new instance of the genres module
pub fn create_module(ctx: Ctx) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(GenresModule::new(ctx))
}
