//! Genre form workflows: list, detail, create, update, delete.
//!
//! Each POST workflow validates and sanitizes its form input first; on
//! failure the originating form is re-rendered with the accumulated errors
//! and the sanitized values, on success the store is written and the client
//! is redirected. Deletion is guarded: a genre carrying dependent books is
//! never deleted, and the dependent check is repeated at commit time.

use axum::extract::{Form, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use serde_json::json;

use biblio_http::error::AppError;
use biblio_http::forms::{self, FormErrors};
use biblio_kernel::views::templates;
use biblio_store::RecordId;

use super::models::Genre;
use crate::state::Ctx;
use crate::utils::parse_record_id;

const NOT_FOUND: &str = "Genre not found";

pub fn router(ctx: Ctx) -> Router {
    Router::new()
        .route("/genres", get(genre_list))
        .route("/genre/create", get(genre_create_get).post(genre_create_post))
        .route("/genre/{id}", get(genre_detail))
        .route(
            "/genre/{id}/update",
            get(genre_update_get).post(genre_update_post),
        )
        .route(
            "/genre/{id}/delete",
            get(genre_delete_get).post(genre_delete_post),
        )
        .with_state(ctx)
}

/// Raw create/update form input; a typed value is built only after validation.
#[derive(Debug, Deserialize)]
pub struct GenreFormInput {
    #[serde(default)]
    pub name: String,
}

/// Display list of all genres, sorted ascending by name.
async fn genre_list(State(ctx): State<Ctx>) -> Result<Response, AppError> {
    let mut genres = ctx.catalog.genres.find_all().await?;
    genres.sort_by(|a, b| a.name.cmp(&b.name));

    let bag = json!({
        "title": "Genre List",
        "genre_list": genres.iter().map(Genre::to_bag).collect::<Vec<_>>(),
    });
    ctx.render(templates::GENRE_LIST, bag)
}

/// Display detail page for a specific genre, with the books filed under it.
async fn genre_detail(
    State(ctx): State<Ctx>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_record_id(&raw_id, NOT_FOUND)?;

    // Unordered fan-out: the genre and its books are disjoint reads.
    let (genre, genre_books) = tokio::try_join!(
        ctx.catalog.genres.find_by_id(&id),
        ctx.catalog.books.find_many(|b| b.has_genre(&id)),
    )?;
    let Some(genre) = genre else {
        return Err(AppError::not_found(NOT_FOUND));
    };

    let bag = json!({
        "title": "Genre Detail",
        "genre": genre.to_bag(),
        "genre_books": genre_books.iter().map(|b| b.to_bag()).collect::<Vec<_>>(),
    });
    ctx.render(templates::GENRE_DETAIL, bag)
}

/// Display genre create form on GET.
async fn genre_create_get(State(ctx): State<Ctx>) -> Result<Response, AppError> {
    ctx.render(templates::GENRE_FORM, json!({ "title": "Create Genre" }))
}

/// Handle genre create on POST.
///
/// Idempotent on the name: if a genre with the same sanitized name already
/// exists, no record is inserted and the client is redirected to the existing
/// genre's page.
async fn genre_create_post(
    State(ctx): State<Ctx>,
    Form(input): Form<GenreFormInput>,
) -> Result<Response, AppError> {
    let mut errors = FormErrors::new();
    let name = forms::required_trimmed(&mut errors, "name", &input.name, "Genre name required");
    let name = forms::escape(&name);

    if !errors.is_empty() {
        let bag = json!({
            "title": "Create Genre",
            "genre": { "name": name },
            "errors": errors.to_bag(),
        });
        return ctx.render(templates::GENRE_FORM, bag);
    }

    if let Some(existing) = ctx.catalog.genres.find_one(|g| g.name == name).await? {
        return Ok(Redirect::to(&existing.url()).into_response());
    }

    let genre = ctx.catalog.genres.insert(Genre::new(name)).await?;
    tracing::info!(module = "genres", id = %genre.id, "genre created");
    Ok(Redirect::to(&genre.url()).into_response())
}

/// Display genre update form on GET, pre-filled from the stored record.
async fn genre_update_get(
    State(ctx): State<Ctx>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_record_id(&raw_id, NOT_FOUND)?;
    let Some(genre) = ctx.catalog.genres.find_by_id(&id).await? else {
        return Err(AppError::not_found(NOT_FOUND));
    };

    let bag = json!({
        "title": "Update Genre",
        "genre": genre.to_bag(),
    });
    ctx.render(templates::GENRE_FORM, bag)
}

/// Handle genre update on POST.
///
/// On top of the create rules, the name with internal spaces removed must be
/// purely alphabetic: multi-word names pass, digits and punctuation do not.
async fn genre_update_post(
    State(ctx): State<Ctx>,
    Path(raw_id): Path<String>,
    Form(input): Form<GenreFormInput>,
) -> Result<Response, AppError> {
    let id = parse_record_id(&raw_id, NOT_FOUND)?;

    let mut errors = FormErrors::new();
    let name = forms::required_trimmed(&mut errors, "name", &input.name, "Genre must have a name");
    forms::alpha_when_despaced(&mut errors, "name", &name, "Genre must be letters only");
    let name = forms::escape(&name);

    if !errors.is_empty() {
        let Some(genre) = ctx.catalog.genres.find_by_id(&id).await? else {
            return Err(AppError::not_found(NOT_FOUND));
        };
        let bag = json!({
            "title": "Update Genre",
            "genre": genre.to_bag(),
            "errors": errors.to_bag(),
        });
        return ctx.render(templates::GENRE_FORM, bag);
    }

    let updated = ctx
        .catalog
        .genres
        .update_by_id(&id, |g| g.name = name.clone())
        .await?;
    if updated.is_none() {
        return Err(AppError::not_found(NOT_FOUND));
    }

    tracing::info!(module = "genres", %id, "genre updated");
    Ok(Redirect::to("/catalog/genres").into_response())
}

/// Display genre delete confirmation on GET.
///
/// When books still reference the genre the confirmation lists them instead
/// of offering deletion.
async fn genre_delete_get(
    State(ctx): State<Ctx>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_record_id(&raw_id, NOT_FOUND)?;
    let (genre, dependent_books) = fetch_genre_with_dependents(&ctx, &id).await?;

    ctx.render(
        templates::GENRE_DELETE,
        delete_confirmation_bag(&genre, &dependent_books),
    )
}

/// Handle genre delete on POST, keyed by the URL path id.
///
/// The dependent check runs again here: a book filed under the genre between
/// confirmation and submission still blocks the delete.
async fn genre_delete_post(
    State(ctx): State<Ctx>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_record_id(&raw_id, NOT_FOUND)?;
    let (genre, dependent_books) = fetch_genre_with_dependents(&ctx, &id).await?;

    if !dependent_books.is_empty() {
        tracing::warn!(
            module = "genres",
            %id,
            dependents = dependent_books.len(),
            "delete blocked by dependent books"
        );
        return ctx.render(
            templates::GENRE_DELETE,
            delete_confirmation_bag(&genre, &dependent_books),
        );
    }

    ctx.catalog.genres.delete_by_id(&id).await?;
    tracing::info!(module = "genres", %id, "genre deleted");
    Ok(Redirect::to("/catalog/genres").into_response())
}

/// Fan-out fetch of a genre and the books referencing it; fails fast and
/// surfaces not-found when the genre is absent.
async fn fetch_genre_with_dependents(
    ctx: &Ctx,
    id: &RecordId,
) -> Result<(Genre, Vec<crate::modules::books::models::Book>), AppError> {
    let (genre, dependent_books) = tokio::try_join!(
        ctx.catalog.genres.find_by_id(id),
        ctx.catalog.books.find_many(|b| b.has_genre(id)),
    )?;
    match genre {
        Some(genre) => Ok((genre, dependent_books)),
        None => Err(AppError::not_found(NOT_FOUND)),
    }
}

fn delete_confirmation_bag(
    genre: &Genre,
    dependent_books: &[crate::modules::books::models::Book],
) -> serde_json::Value {
    if dependent_books.is_empty() {
        json!({
            "title": "Delete Genre",
            "genre": genre.to_bag(),
        })
    } else {
        json!({
            "title": "Delete Genre: error",
            "genre": genre.to_bag(),
            "genre_books": dependent_books.iter().map(|b| b.to_bag()).collect::<Vec<_>>(),
        })
    }
}
