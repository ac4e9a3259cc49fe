//! Book catalog endpoints
//!
//! Every response carries the `{status, message?, data?}` envelope:
//! `status` is `"success"` here, `"fail"` or `"error"` on the error
//! path (see [`crate::error::AppError`]).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::book::{Book, BookPayload, BookQuery, BookSummary},
};

const STATUS_SUCCESS: &str = "success";

/// Response for a successful book creation
#[derive(Serialize, ToSchema)]
pub struct AddBookResponse {
    pub status: String,
    pub message: String,
    pub data: BookIdData,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookIdData {
    pub book_id: String,
}

/// Response for the book list
#[derive(Serialize, ToSchema)]
pub struct ListBooksResponse {
    pub status: String,
    pub data: BooksData,
}

#[derive(Serialize, ToSchema)]
pub struct BooksData {
    pub books: Vec<BookSummary>,
}

/// Response for a single book lookup
#[derive(Serialize, ToSchema)]
pub struct GetBookResponse {
    pub status: String,
    pub data: BookData,
}

#[derive(Serialize, ToSchema)]
pub struct BookData {
    pub book: Book,
}

/// Response for update and delete confirmations
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

/// Add a new book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book added", body = AddBookResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 500, description = "Append could not be confirmed", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    Json(payload): Json<BookPayload>,
) -> AppResult<(StatusCode, Json<AddBookResponse>)> {
    let book_id = state.services.catalog.create_book(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(AddBookResponse {
            status: STATUS_SUCCESS.to_string(),
            message: "Book added successfully".to_string(),
            data: BookIdData { book_id },
        }),
    ))
}

/// List books with optional filters
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "List of book projections", body = ListBooksResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> Json<ListBooksResponse> {
    let books = state.services.catalog.list_books(&query).await;

    Json(ListBooksResponse {
        status: STATUS_SUCCESS.to_string(),
        data: BooksData { books },
    })
}

/// Get full book details by id
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = GetBookResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<GetBookResponse>> {
    let book = state.services.catalog.get_book(&id).await?;

    Ok(Json(GetBookResponse {
        status: STATUS_SUCCESS.to_string(),
        data: BookData { book },
    }))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(payload): Json<BookPayload>,
) -> AppResult<Json<MessageResponse>> {
    state.services.catalog.update_book(&id, payload).await?;

    Ok(Json(MessageResponse {
        status: STATUS_SUCCESS.to_string(),
        message: "Book updated successfully".to_string(),
    }))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.catalog.delete_book(&id).await?;

    Ok(Json(MessageResponse {
        status: STATUS_SUCCESS.to_string(),
        message: "Book deleted successfully".to_string(),
    }))
}
