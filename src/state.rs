//! Application state: the catalog store handle and the handler context.

use std::sync::Arc;

use axum::response::{Html, IntoResponse, Response};
use serde_json::Value;

use biblio_http::error::AppError;
use biblio_kernel::settings::DatabaseSettings;
use biblio_kernel::ViewRenderer;
use biblio_store::MemoryCollection;

use crate::modules::bookinstances::models::BookInstance;
use crate::modules::books::models::Book;
use crate::modules::genres::models::Genre;

/// The entity store handle: one collection per document type.
///
/// Constructed once at bootstrap and passed down into the modules; workflow
/// code never reaches for a global connection.
pub struct Catalog {
    pub genres: MemoryCollection<Genre>,
    pub books: MemoryCollection<Book>,
    pub book_instances: MemoryCollection<BookInstance>,
}

impl Catalog {
    /// Open the store described by the database settings.
    pub fn open(settings: &DatabaseSettings) -> anyhow::Result<Self> {
        tracing::info!(
            endpoint = %settings.endpoint,
            database = %settings.database,
            "opening catalog store"
        );

        Ok(Self {
            genres: MemoryCollection::new(),
            books: MemoryCollection::new(),
            book_instances: MemoryCollection::new(),
        })
    }

    /// Close the store. The memory backend has nothing to flush; this keeps
    /// the explicit-shutdown seam a persistent backend will need.
    pub async fn shutdown(&self) -> anyhow::Result<()> {
        let genres = self.genres.count().await?;
        let books = self.books.count().await?;
        let instances = self.book_instances.count().await?;
        tracing::info!(genres, books, instances, "catalog store closed");
        Ok(())
    }
}

/// Per-request handler context: store handle plus view renderer.
#[derive(Clone)]
pub struct Ctx {
    pub catalog: Arc<Catalog>,
    pub views: Arc<dyn ViewRenderer>,
}

impl Ctx {
    /// Render a template into an HTML response.
    pub fn render(&self, template: &str, bag: Value) -> Result<Response, AppError> {
        let html = self
            .views
            .render(template, &bag)
            .map_err(AppError::Internal)?;
        Ok(Html(html).into_response())
    }
}
