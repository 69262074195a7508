//! BookInstance form workflows: list, detail, create, update, delete.
//!
//! Create and update share one validation pass (book required, imprint
//! required, due_back optional ISO date) and one sanitized payload type.
//! Deletion is keyed by a `bookinstance_id` field in the POST body, a
//! contract deliberately distinct from the genre module, which keys deletion
//! off the URL path.

use std::collections::HashMap;

use axum::extract::{Form, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};

use biblio_http::error::AppError;
use biblio_http::forms::{self, FormErrors};
use biblio_kernel::views::templates;
use biblio_store::RecordId;
use time::Date;

use super::models::{BookInstance, BookInstancePayload, Status};
use crate::modules::books::models::Book;
use crate::state::Ctx;
use crate::utils::parse_record_id;

const NOT_FOUND: &str = "Book copy not found";

pub fn router(ctx: Ctx) -> Router {
    Router::new()
        .route("/bookinstances", get(bookinstance_list))
        .route(
            "/bookinstance/create",
            get(bookinstance_create_get).post(bookinstance_create_post),
        )
        .route("/bookinstance/{id}", get(bookinstance_detail))
        .route(
            "/bookinstance/{id}/update",
            get(bookinstance_update_get).post(bookinstance_update_post),
        )
        .route(
            "/bookinstance/{id}/delete",
            get(bookinstance_delete_get).post(bookinstance_delete_post),
        )
        .with_state(ctx)
}

/// Raw create/update form input; a typed payload is built only after the
/// validation pass succeeds.
#[derive(Debug, Deserialize)]
pub struct BookInstanceFormInput {
    #[serde(default)]
    pub book: String,
    #[serde(default)]
    pub imprint: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub due_back: String,
}

/// Raw delete form input, keyed by the target id in the body.
#[derive(Debug, Deserialize)]
pub struct BookInstanceDeleteInput {
    #[serde(default)]
    pub bookinstance_id: String,
}

/// Outcome of the shared create/update validation pass.
struct CheckedForm {
    errors: FormErrors,
    /// Escaped book field as submitted, echoed back into the form select.
    book_field: String,
    imprint: String,
    status: Status,
    due_back: Option<Date>,
    due_back_raw: String,
    book_id: Option<RecordId>,
}

fn check(input: &BookInstanceFormInput) -> CheckedForm {
    let mut errors = FormErrors::new();
    let book_field =
        forms::required_trimmed(&mut errors, "book", &input.book, "Book must be specified");
    let imprint = forms::required_trimmed(
        &mut errors,
        "imprint",
        &input.imprint,
        "Imprint must be specified",
    );
    let due_back = forms::optional_iso_date(&mut errors, "due_back", &input.due_back);

    // The picker submits a record id; anything else cannot name a book.
    let book_id = if book_field.is_empty() {
        None
    } else {
        match book_field.parse::<RecordId>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.push("book", "Book must be specified");
                None
            }
        }
    };

    CheckedForm {
        book_field: forms::escape(&book_field),
        imprint: forms::escape(&imprint),
        status: Status::from_form(&input.status),
        due_back,
        due_back_raw: forms::escape(input.due_back.trim()),
        errors,
        book_id,
    }
}

impl CheckedForm {
    /// The sanitized payload, available only when validation passed.
    fn payload(&self) -> Option<BookInstancePayload> {
        if !self.errors.is_empty() {
            return None;
        }
        Some(BookInstancePayload {
            book: self.book_id.clone()?,
            imprint: self.imprint.clone(),
            status: self.status,
            due_back: self.due_back,
        })
    }

    /// Form re-render bag carrying the sanitized values and errors.
    fn form_bag(&self, title: &str, book_list: &[Book]) -> Value {
        json!({
            "title": title,
            "book_list": book_list.iter().map(Book::to_bag).collect::<Vec<_>>(),
            "status_list": status_list(),
            "selected_book": self.book_field,
            "bookinstance": {
                "book": self.book_field,
                "imprint": self.imprint,
                "status": self.status.as_str(),
                "due_back_for_form": self.due_back_raw,
            },
            "errors": self.errors.to_bag(),
        })
    }
}

fn status_list() -> Vec<&'static str> {
    Status::ALL.iter().map(Status::as_str).collect()
}

/// Display list of all book copies with their resolved book titles.
async fn bookinstance_list(State(ctx): State<Ctx>) -> Result<Response, AppError> {
    let (instances, books) = tokio::try_join!(
        ctx.catalog.book_instances.find_all(),
        ctx.catalog.books.find_all(),
    )?;

    let titles: HashMap<&RecordId, &str> = books
        .iter()
        .map(|b| (&b.id, b.title.as_str()))
        .collect();

    let list: Vec<Value> = instances
        .iter()
        .map(|instance| {
            let mut bag = instance.to_bag();
            bag["book_title"] = titles
                .get(&instance.book)
                .copied()
                .unwrap_or("Unknown")
                .into();
            bag
        })
        .collect();

    let bag = json!({
        "title": "Book Instance List",
        "bookinstance_list": list,
    });
    ctx.render(templates::BOOKINSTANCE_LIST, bag)
}

/// Display detail page for a specific copy.
async fn bookinstance_detail(
    State(ctx): State<Ctx>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_record_id(&raw_id, NOT_FOUND)?;
    let Some(instance) = ctx.catalog.book_instances.find_by_id(&id).await? else {
        return Err(AppError::not_found(NOT_FOUND));
    };

    let book = ctx.catalog.books.find_by_id(&instance.book).await?;
    let book_title = book.as_ref().map(|b| b.title.as_str()).unwrap_or("Unknown");

    let bag = json!({
        "title": format!("Copy: {book_title}"),
        "bookinstance": instance.to_bag(),
        "book": book.as_ref().map(Book::to_bag),
    });
    ctx.render(templates::BOOKINSTANCE_DETAIL, bag)
}

/// Display copy create form on GET, with the full book picker.
async fn bookinstance_create_get(State(ctx): State<Ctx>) -> Result<Response, AppError> {
    let books = ctx.catalog.books.find_all().await?;
    let bag = json!({
        "title": "Create BookInstance",
        "book_list": books.iter().map(Book::to_bag).collect::<Vec<_>>(),
        "status_list": status_list(),
    });
    ctx.render(templates::BOOKINSTANCE_FORM, bag)
}

/// Handle copy create on POST.
async fn bookinstance_create_post(
    State(ctx): State<Ctx>,
    Form(input): Form<BookInstanceFormInput>,
) -> Result<Response, AppError> {
    let checked = check(&input);

    let Some(payload) = checked.payload() else {
        let books = ctx.catalog.books.find_all().await?;
        return ctx.render(
            templates::BOOKINSTANCE_FORM,
            checked.form_bag("Create BookInstance", &books),
        );
    };

    let instance = ctx
        .catalog
        .book_instances
        .insert(BookInstance::new(payload))
        .await?;
    tracing::info!(module = "bookinstances", id = %instance.id, "book instance created");
    Ok(Redirect::to(&instance.url()).into_response())
}

/// Display copy update form on GET, pre-filled from the stored record.
async fn bookinstance_update_get(
    State(ctx): State<Ctx>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_record_id(&raw_id, NOT_FOUND)?;

    // Unordered fan-out: the book picker and the copy are disjoint reads.
    let (books, instance) = tokio::try_join!(
        ctx.catalog.books.find_all(),
        ctx.catalog.book_instances.find_by_id(&id),
    )?;
    let Some(instance) = instance else {
        return Err(AppError::not_found(NOT_FOUND));
    };

    let bag = json!({
        "title": "Update BookInstance",
        "book_list": books.iter().map(Book::to_bag).collect::<Vec<_>>(),
        "status_list": status_list(),
        "selected_book": instance.book.to_string(),
        "bookinstance": instance.to_bag(),
    });
    ctx.render(templates::BOOKINSTANCE_FORM, bag)
}

/// Handle copy update on POST: full replace of the four mutable fields.
async fn bookinstance_update_post(
    State(ctx): State<Ctx>,
    Path(raw_id): Path<String>,
    Form(input): Form<BookInstanceFormInput>,
) -> Result<Response, AppError> {
    let id = parse_record_id(&raw_id, NOT_FOUND)?;
    let checked = check(&input);

    let Some(payload) = checked.payload() else {
        let (books, instance) = tokio::try_join!(
            ctx.catalog.books.find_all(),
            ctx.catalog.book_instances.find_by_id(&id),
        )?;
        if instance.is_none() {
            return Err(AppError::not_found(NOT_FOUND));
        }
        return ctx.render(
            templates::BOOKINSTANCE_FORM,
            checked.form_bag("Update BookInstance", &books),
        );
    };

    let updated = ctx
        .catalog
        .book_instances
        .update_by_id(&id, |instance| instance.apply(payload))
        .await?;
    if updated.is_none() {
        return Err(AppError::not_found(NOT_FOUND));
    }

    tracing::info!(module = "bookinstances", %id, "book instance updated");
    Ok(Redirect::to("/catalog/bookinstances").into_response())
}

/// Display copy delete confirmation on GET.
async fn bookinstance_delete_get(
    State(ctx): State<Ctx>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_record_id(&raw_id, NOT_FOUND)?;
    let Some(instance) = ctx.catalog.book_instances.find_by_id(&id).await? else {
        return Err(AppError::not_found(NOT_FOUND));
    };

    let book = ctx.catalog.books.find_by_id(&instance.book).await?;
    let book_title = book.as_ref().map(|b| b.title.as_str()).unwrap_or("Unknown");

    let bag = json!({
        "title": "Delete BookInstance",
        "book_title": book_title,
        "id": instance.id.to_string(),
        "imprint": instance.imprint,
    });
    ctx.render(templates::BOOKINSTANCE_DELETE, bag)
}

/// Handle copy delete on POST, keyed by the `bookinstance_id` body field.
///
/// A missing or malformed token is not an error: the workflow bails out to
/// the catalog landing page without touching the store.
async fn bookinstance_delete_post(
    State(ctx): State<Ctx>,
    Path(_raw_id): Path<String>,
    Form(input): Form<BookInstanceDeleteInput>,
) -> Result<Response, AppError> {
    let mut errors = FormErrors::new();
    let token = forms::required_trimmed(
        &mut errors,
        "bookinstance_id",
        &input.bookinstance_id,
        "No book instance given",
    );

    let id = match token.parse::<RecordId>() {
        Ok(id) if errors.is_empty() => id,
        _ => {
            tracing::warn!(
                module = "bookinstances",
                "delete rejected: missing or malformed bookinstance_id"
            );
            return Ok(Redirect::to("/catalog").into_response());
        }
    };

    ctx.catalog.book_instances.delete_by_id(&id).await?;
    tracing::info!(module = "bookinstances", %id, "book instance deleted");
    Ok(Redirect::to("/catalog/bookinstances").into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use biblio_http::render::BasicRenderer;
    use biblio_kernel::settings::DatabaseSettings;

    use super::*;
    use crate::state::Catalog;

    fn test_ctx() -> Ctx {
        let catalog = Catalog::open(&DatabaseSettings::default()).unwrap();
        Ctx {
            catalog: Arc::new(catalog),
            views: Arc::new(BasicRenderer),
        }
    }

    async fn seed_book(ctx: &Ctx, title: &str) -> Book {
        ctx.catalog.books.insert(Book::new(title)).await.unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> String {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn create_with_missing_book_reports_only_the_book_field() {
        let ctx = test_ctx();
        let app = router(ctx.clone());

        let response = app
            .oneshot(form_post(
                "/bookinstance/create",
                "book=&imprint=Penguin&status=Available&due_back=",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Book must be specified"));
        assert!(!html.contains("Imprint must be specified"));
        assert!(!html.contains("Invalid date"));
        // Sanitized input is preserved in the re-rendered form.
        assert!(html.contains("Penguin"));

        assert_eq!(ctx.catalog.book_instances.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn create_round_trips_status_and_formatted_due_date() {
        let ctx = test_ctx();
        let book = seed_book(&ctx, "Dune").await;
        let app = router(ctx.clone());

        let response = app
            .oneshot(form_post(
                "/bookinstance/create",
                &format!(
                    "book={}&imprint=Penguin&status=Loaned&due_back=2024-03-01",
                    book.id
                ),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let stored = ctx.catalog.book_instances.find_all().await.unwrap();
        assert_eq!(stored.len(), 1);
        let instance = &stored[0];
        assert_eq!(instance.status, Status::Loaned);
        assert_eq!(instance.due_back_formatted(), "March 1st, 2024");
        assert_eq!(location(&response), instance.url());
    }

    #[tokio::test]
    async fn create_with_bad_date_names_due_back() {
        let ctx = test_ctx();
        let book = seed_book(&ctx, "Dune").await;
        let app = router(ctx.clone());

        let response = app
            .oneshot(form_post(
                "/bookinstance/create",
                &format!("book={}&imprint=Penguin&due_back=03%2F01%2F2024", book.id),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Invalid date"));
        assert_eq!(ctx.catalog.book_instances.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn create_with_empty_due_back_defaults_and_succeeds() {
        let ctx = test_ctx();
        let book = seed_book(&ctx, "Dune").await;
        let app = router(ctx.clone());

        let response = app
            .oneshot(form_post(
                "/bookinstance/create",
                &format!("book={}&imprint=Penguin&due_back=", book.id),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let stored = ctx.catalog.book_instances.find_all().await.unwrap();
        assert_eq!(stored.len(), 1);
        // Unspecified status falls back to the Maintenance default.
        assert_eq!(stored[0].status, Status::Maintenance);
    }

    #[tokio::test]
    async fn detail_of_missing_copy_is_404() {
        let ctx = test_ctx();
        let app = router(ctx);

        let missing = RecordId::generate();
        let response = app
            .oneshot(get(&format!("/bookinstance/{missing}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Book copy not found"));
    }

    #[tokio::test]
    async fn detail_titles_the_page_with_the_book() {
        let ctx = test_ctx();
        let book = seed_book(&ctx, "Dune").await;
        let instance = ctx
            .catalog
            .book_instances
            .insert(BookInstance::new(BookInstancePayload {
                book: book.id.clone(),
                imprint: "Penguin".to_string(),
                status: Status::Available,
                due_back: None,
            }))
            .await
            .unwrap();

        let app = router(ctx);
        let response = app
            .oneshot(get(&format!("/bookinstance/{}", instance.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Copy: Dune"));
    }

    #[tokio::test]
    async fn list_resolves_book_titles() {
        let ctx = test_ctx();
        let book = seed_book(&ctx, "Dune").await;
        ctx.catalog
            .book_instances
            .insert(BookInstance::new(BookInstancePayload {
                book: book.id.clone(),
                imprint: "Penguin".to_string(),
                status: Status::Available,
                due_back: None,
            }))
            .await
            .unwrap();

        let app = router(ctx);
        let response = app.oneshot(get("/bookinstances")).await.unwrap();
        let html = body_text(response).await;
        assert!(html.contains("Dune"));
        assert!(html.contains("Penguin"));
    }

    #[tokio::test]
    async fn update_replaces_the_four_mutable_fields() {
        let ctx = test_ctx();
        let book = seed_book(&ctx, "Dune").await;
        let other = seed_book(&ctx, "Hyperion").await;
        let instance = ctx
            .catalog
            .book_instances
            .insert(BookInstance::new(BookInstancePayload {
                book: book.id.clone(),
                imprint: "Penguin".to_string(),
                status: Status::Available,
                due_back: None,
            }))
            .await
            .unwrap();

        let app = router(ctx.clone());
        let response = app
            .oneshot(form_post(
                &format!("/bookinstance/{}/update", instance.id),
                &format!(
                    "book={}&imprint=Gollancz&status=Reserved&due_back=2025-01-04",
                    other.id
                ),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/catalog/bookinstances");

        let updated = ctx
            .catalog
            .book_instances
            .find_by_id(&instance.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.book, other.id);
        assert_eq!(updated.imprint, "Gollancz");
        assert_eq!(updated.status, Status::Reserved);
        assert_eq!(updated.due_back_for_form(), "2025-01-04");
    }

    #[tokio::test]
    async fn update_with_errors_re_renders_the_populated_form() {
        let ctx = test_ctx();
        let book = seed_book(&ctx, "Dune").await;
        let instance = ctx
            .catalog
            .book_instances
            .insert(BookInstance::new(BookInstancePayload {
                book: book.id.clone(),
                imprint: "Penguin".to_string(),
                status: Status::Available,
                due_back: None,
            }))
            .await
            .unwrap();

        let app = router(ctx.clone());
        let response = app
            .oneshot(form_post(
                &format!("/bookinstance/{}/update", instance.id),
                "book=&imprint=&status=Available&due_back=",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Book must be specified"));
        assert!(html.contains("Imprint must be specified"));

        let unchanged = ctx
            .catalog
            .book_instances
            .find_by_id(&instance.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.imprint, "Penguin");
    }

    #[tokio::test]
    async fn update_get_of_missing_copy_is_404() {
        let ctx = test_ctx();
        let app = router(ctx);

        let missing = RecordId::generate();
        let response = app
            .oneshot(get(&format!("/bookinstance/{missing}/update")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_post_without_token_redirects_without_deleting() {
        let ctx = test_ctx();
        let book = seed_book(&ctx, "Dune").await;
        let instance = ctx
            .catalog
            .book_instances
            .insert(BookInstance::new(BookInstancePayload {
                book: book.id.clone(),
                imprint: "Penguin".to_string(),
                status: Status::Available,
                due_back: None,
            }))
            .await
            .unwrap();

        let app = router(ctx.clone());
        let response = app
            .oneshot(form_post(
                &format!("/bookinstance/{}/delete", instance.id),
                "bookinstance_id=",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/catalog");
        assert_eq!(ctx.catalog.book_instances.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_post_is_keyed_by_the_body_token() {
        let ctx = test_ctx();
        let book = seed_book(&ctx, "Dune").await;
        let instance = ctx
            .catalog
            .book_instances
            .insert(BookInstance::new(BookInstancePayload {
                book: book.id.clone(),
                imprint: "Penguin".to_string(),
                status: Status::Available,
                due_back: None,
            }))
            .await
            .unwrap();

        let app = router(ctx.clone());
        // Path id is ignored; the body token selects the document.
        let response = app
            .oneshot(form_post(
                &format!("/bookinstance/{}/delete", RecordId::generate()),
                &format!("bookinstance_id={}", instance.id),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/catalog/bookinstances");
        assert_eq!(ctx.catalog.book_instances.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_get_shows_book_title_and_imprint() {
        let ctx = test_ctx();
        let book = seed_book(&ctx, "Dune").await;
        let instance = ctx
            .catalog
            .book_instances
            .insert(BookInstance::new(BookInstancePayload {
                book: book.id.clone(),
                imprint: "Penguin".to_string(),
                status: Status::Available,
                due_back: None,
            }))
            .await
            .unwrap();

        let app = router(ctx);
        let response = app
            .oneshot(get(&format!("/bookinstance/{}/delete", instance.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Dune"));
        assert!(html.contains("Penguin"));
    }
}
