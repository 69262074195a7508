//! Application bootstrap: telemetry, store, modules, HTTP server.

use std::sync::Arc;

use biblio_http::render::BasicRenderer;
use biblio_kernel::settings::Settings;
use biblio_kernel::{InitCtx, ModuleRegistry};

use crate::modules;
use crate::state::{Catalog, Ctx};

/// Run the catalog application until the HTTP server exits.
///
/// Shared by the app binary and the CLI `serve` command.
pub async fn run(settings: &Settings) -> anyhow::Result<()> {
    biblio_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.endpoint,
        "biblio-app bootstrap starting"
    );

    let catalog = Arc::new(Catalog::open(&settings.database)?);
    let ctx = Ctx {
        catalog: Arc::clone(&catalog),
        views: Arc::new(BasicRenderer),
    };

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &ctx);

    let init_ctx = InitCtx { settings };
    registry.init_custom_modules(&init_ctx).await?;
    registry.start_custom_modules(&init_ctx).await?;

    tracing::info!("biblio-app bootstrap complete");

    biblio_http::start_server(&registry, settings).await?;

    registry.stop_all().await?;
    catalog.shutdown().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn registered_modules_serve_catalog_routes() {
        let settings = Settings::default();
        let catalog = Arc::new(Catalog::open(&settings.database).unwrap());
        let ctx = Ctx {
            catalog,
            views: Arc::new(BasicRenderer),
        };

        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, &ctx);
        let app = biblio_http::build_router(&registry, &settings);

        let health = app.clone().oneshot(get("/healthz")).await.unwrap();
        assert_eq!(health.status(), StatusCode::OK);

        let genres = app.clone().oneshot(get("/catalog/genres")).await.unwrap();
        assert_eq!(genres.status(), StatusCode::OK);

        let instances = app.oneshot(get("/catalog/bookinstances")).await.unwrap();
        assert_eq!(instances.status(), StatusCode::OK);
    }
}
