//! Books repository: the in-memory backing store.
//!
//! All five catalog operations go through the single `RwLock` below, so
//! mutations are linearizable relative to each other and to reads; no
//! caller ever observes a partially applied mutation. Nothing persists
//! across restarts.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookDraft, BookQuery, BookSummary},
};

#[derive(Clone, Default)]
pub struct BooksRepository {
    books: Arc<RwLock<Vec<Book>>>,
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new record. The post-append lookup confirms the record is
    /// retrievable before success is reported; an unconfirmed append
    /// surfaces as a 500 "error" (unreachable in practice).
    pub async fn insert(&self, book: Book) -> AppResult<()> {
        let mut books = self.books.write().await;
        let id = book.id.clone();
        books.push(book);

        if !books.iter().any(|b| b.id == id) {
            return Err(AppError::Internal("Failed to add book".to_string()));
        }
        Ok(())
    }

    /// List projections of all books matching the query, insertion order
    /// preserved. Filters combine with logical AND; an unrecognized
    /// boolean encoding leaves that filter unapplied.
    pub async fn search(&self, query: &BookQuery) -> Vec<BookSummary> {
        let name = query.name.as_deref().map(str::to_lowercase);
        let reading = query.reading_flag();
        let finished = query.finished_flag();

        let books = self.books.read().await;
        books
            .iter()
            .filter(|b| {
                name.as_ref()
                    .map_or(true, |n| b.name.to_lowercase().contains(n.as_str()))
            })
            .filter(|b| reading.map_or(true, |r| b.reading == r))
            .filter(|b| finished.map_or(true, |f| b.finished == f))
            .map(BookSummary::from)
            .collect()
    }

    /// Linear lookup by exact id match.
    pub async fn get_by_id(&self, id: &str) -> AppResult<Book> {
        let books = self.books.read().await;
        books
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Replace the mutable attributes of the record with the given id.
    /// `id` and `insertedAt` are preserved; `finished` and `updatedAt`
    /// are recomputed under the same write guard as the existence check.
    pub async fn update(&self, id: &str, draft: BookDraft) -> AppResult<()> {
        let mut books = self.books.write().await;
        let book = books.iter_mut().find(|b| b.id == id).ok_or_else(|| {
            AppError::NotFound("Failed to update book. Id not found".to_string())
        })?;

        book.apply(draft, Utc::now());
        Ok(())
    }

    /// Remove the record with the given id, keeping the order of the
    /// remaining records.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let mut books = self.books.write().await;
        let idx = books.iter().position(|b| b.id == id).ok_or_else(|| {
            AppError::NotFound("Failed to delete book. Id not found".to_string())
        })?;

        books.remove(idx);
        Ok(())
    }
}
