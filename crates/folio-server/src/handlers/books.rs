//! Book endpoint handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use folio_core::BookDraft;
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::path::{BookKeyPath, TitleAuthorPath};
use crate::handlers::response::{BookListResponse, BookResponse, BookUpsertRequest};
use crate::state::AppState;

/// GET /api/v1/book/{category}
#[instrument(skip_all, fields(category = %path.key))]
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(path): Path<BookKeyPath>,
) -> Result<Json<BookListResponse>, AppError> {
    let category = path.category()?;

    let books = state.catalog().list_by_category(&category).await?;

    Ok(Json(books.into()))
}

/// GET /api/v1/book/{title}/{author}
#[instrument(skip_all, fields(title = %path.title, author = %path.author))]
pub async fn find_by_title_author(
    State(state): State<AppState>,
    Path(path): Path<TitleAuthorPath>,
) -> Result<Json<BookResponse>, AppError> {
    path.validate()?;

    let book = state
        .catalog()
        .find_by_title_author(&path.title, &path.author)
        .await?;

    Ok(Json(book.into()))
}

/// POST /api/v1/book
#[instrument(skip_all)]
pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<BookUpsertRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookResponse>), AppError> {
    let Json(request) = payload?;
    let draft = BookDraft::new(request.title, request.author, request.category_name)?;

    let book = state.catalog().create(&draft).await?;

    Ok((StatusCode::CREATED, Json(book.into())))
}

/// PUT /api/v1/book/{id}
#[instrument(skip_all, fields(id = %path.key))]
pub async fn update_book(
    State(state): State<AppState>,
    Path(path): Path<BookKeyPath>,
    payload: Result<Json<BookUpsertRequest>, JsonRejection>,
) -> Result<Json<BookResponse>, AppError> {
    let id = path.id()?;
    let Json(request) = payload?;
    let draft = BookDraft::new(request.title, request.author, request.category_name)?;

    let book = state.catalog().update(id, &draft).await?;

    Ok(Json(book.into()))
}

/// DELETE /api/v1/book/{id}
#[instrument(skip_all, fields(id = %path.key))]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(path): Path<BookKeyPath>,
) -> Result<StatusCode, AppError> {
    let id = path.id()?;

    state.catalog().delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
