//! Catalog management service
//!
//! Owns the validation-and-mutation contract shared by all book
//! handlers: payload checks run in a fixed order (name presence, then
//! page-count consistency) and always precede the existence check, so
//! callers receive the most specific applicable error first.

use rand::{distributions::Alphanumeric, Rng};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookDraft, BookPayload, BookQuery, BookSummary},
    repository::Repository,
};

/// Length of generated book identifiers. 62^16 candidates keep the
/// practical collision probability negligible.
const BOOK_ID_LEN: usize = 16;

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a new book and return its generated id.
    pub async fn create_book(&self, payload: BookPayload) -> AppResult<String> {
        let draft = validate_payload(payload, "add")?;
        let id = generate_book_id();

        let book = Book::from_draft(id.clone(), draft, chrono::Utc::now());
        self.repository.books.insert(book).await?;

        tracing::debug!("Catalog: added book id={}", id);
        Ok(id)
    }

    /// List book projections matching the query filters.
    pub async fn list_books(&self, query: &BookQuery) -> Vec<BookSummary> {
        self.repository.books.search(query).await
    }

    /// Get the full record for a book by id.
    pub async fn get_book(&self, id: &str) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Update an existing book in place. Payload validation runs before
    /// the existence check, so a malformed payload is rejected even for
    /// an id that matches no record.
    pub async fn update_book(&self, id: &str, payload: BookPayload) -> AppResult<()> {
        let draft = validate_payload(payload, "update")?;
        self.repository.books.update(id, draft).await?;

        tracing::debug!("Catalog: updated book id={}", id);
        Ok(())
    }

    /// Delete a book by id.
    pub async fn delete_book(&self, id: &str) -> AppResult<()> {
        self.repository.books.delete(id).await?;

        tracing::debug!("Catalog: deleted book id={}", id);
        Ok(())
    }
}

/// Check the shared payload contract and turn it into a draft.
/// `action` names the operation for the failure message ("add"/"update").
fn validate_payload(payload: BookPayload, action: &str) -> AppResult<BookDraft> {
    let name = match payload.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => {
            return Err(AppError::Validation(format!(
                "Failed to {} book. Please provide a book name",
                action
            )))
        }
    };

    if payload.read_page > payload.page_count {
        return Err(AppError::Validation(format!(
            "Failed to {} book. readPage must not be greater than pageCount",
            action
        )));
    }

    Ok(BookDraft {
        name,
        year: payload.year,
        author: payload.author,
        summary: payload.summary,
        publisher: payload.publisher,
        page_count: payload.page_count,
        read_page: payload.read_page,
        reading: payload.reading,
    })
}

/// Generate a fresh opaque book identifier.
fn generate_book_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOOK_ID_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CatalogService {
        CatalogService::new(Repository::new())
    }

    fn payload(name: &str, page_count: u32, read_page: u32) -> BookPayload {
        BookPayload {
            name: Some(name.to_string()),
            page_count,
            read_page,
            ..Default::default()
        }
    }

    #[test]
    fn generated_ids_are_opaque_and_distinct() {
        let a = generate_book_id();
        let b = generate_book_id();
        assert_eq!(a.len(), BOOK_ID_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn create_then_get_returns_record_with_derived_finished() {
        let catalog = service();

        let id = catalog.create_book(payload("Book A", 100, 100)).await.unwrap();
        let book = catalog.get_book(&id).await.unwrap();
        assert_eq!(book.id, id);
        assert_eq!(book.name, "Book A");
        assert!(book.finished);
        assert_eq!(book.inserted_at, book.updated_at);

        let id = catalog.create_book(payload("Book B", 100, 50)).await.unwrap();
        let book = catalog.get_book(&id).await.unwrap();
        assert!(!book.finished);
    }

    #[tokio::test]
    async fn create_without_name_fails_validation() {
        let catalog = service();

        let input = BookPayload {
            page_count: 10,
            read_page: 5,
            ..Default::default()
        };
        let err = catalog.create_book(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Empty and whitespace-only names count as absent.
        let err = catalog.create_book(payload("   ", 10, 5)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_with_read_page_beyond_page_count_fails_validation() {
        let catalog = service();

        let err = catalog.create_book(payload("Book", 100, 101)).await.unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("readPage")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn update_replaces_fields_and_recomputes_derived_state() {
        let catalog = service();
        let id = catalog.create_book(payload("Before", 200, 10)).await.unwrap();
        let created = catalog.get_book(&id).await.unwrap();

        let mut input = payload("After", 200, 200);
        input.publisher = Some("Gagas".to_string());
        catalog.update_book(&id, input).await.unwrap();

        let updated = catalog.get_book(&id).await.unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.name, "After");
        assert_eq!(updated.publisher.as_deref(), Some("Gagas"));
        assert!(updated.finished);
        assert_eq!(updated.inserted_at, created.inserted_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_on_missing_id_with_valid_payload_is_not_found() {
        let catalog = service();

        let err = catalog
            .update_book("no-such-id", payload("Book", 10, 5))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn validation_precedes_existence_check_on_update() {
        let catalog = service();

        // Invalid payload against a nonexistent id: the validation error wins.
        let err = catalog
            .update_book("no-such-id", payload("Book", 10, 20))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let input = BookPayload::default();
        let err = catalog.update_book("no-such-id", input).await.unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("name")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn name_check_runs_before_page_count_check() {
        let catalog = service();

        let input = BookPayload {
            page_count: 10,
            read_page: 20,
            ..Default::default()
        };
        let err = catalog.create_book(input).await.unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("name")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn delete_removes_record_and_second_delete_fails() {
        let catalog = service();
        let id = catalog.create_book(payload("Book", 10, 5)).await.unwrap();

        catalog.delete_book(&id).await.unwrap();
        assert!(matches!(
            catalog.get_book(&id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            catalog.delete_book(&id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn delete_preserves_order_of_remaining_books() {
        let catalog = service();
        let a = catalog.create_book(payload("A", 1, 0)).await.unwrap();
        let b = catalog.create_book(payload("B", 1, 0)).await.unwrap();
        let c = catalog.create_book(payload("C", 1, 0)).await.unwrap();

        catalog.delete_book(&b).await.unwrap();

        let books = catalog.list_books(&BookQuery::default()).await;
        let ids: Vec<&str> = books.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str(), c.as_str()]);
    }

    #[tokio::test]
    async fn list_without_filters_returns_all_projections_in_order() {
        let catalog = service();
        let mut input = payload("First", 10, 5);
        input.publisher = Some("Pub".to_string());
        catalog.create_book(input).await.unwrap();
        catalog.create_book(payload("Second", 10, 5)).await.unwrap();

        let books = catalog.list_books(&BookQuery::default()).await;
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].name, "First");
        assert_eq!(books[0].publisher.as_deref(), Some("Pub"));
        assert_eq!(books[1].name, "Second");
        assert_eq!(books[1].publisher, None);
    }

    #[tokio::test]
    async fn list_filters_by_name_substring_case_insensitively() {
        let catalog = service();
        catalog.create_book(payload("Dunia-Wars", 10, 5)).await.unwrap();
        catalog.create_book(payload("Peace", 10, 5)).await.unwrap();

        let query = BookQuery {
            name: Some("war".to_string()),
            ..Default::default()
        };
        let books = catalog.list_books(&query).await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "Dunia-Wars");
    }

    #[tokio::test]
    async fn list_filters_by_reading_flag_and_ignores_unrecognized_values() {
        let catalog = service();
        let mut input = payload("Reading now", 10, 5);
        input.reading = true;
        catalog.create_book(input).await.unwrap();
        catalog.create_book(payload("On the shelf", 10, 5)).await.unwrap();

        let query = BookQuery {
            reading: Some("1".to_string()),
            ..Default::default()
        };
        let books = catalog.list_books(&query).await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "Reading now");

        let query = BookQuery {
            reading: Some("maybe".to_string()),
            ..Default::default()
        };
        assert_eq!(catalog.list_books(&query).await.len(), 2);
    }

    #[tokio::test]
    async fn list_filters_by_finished_flag() {
        let catalog = service();
        catalog.create_book(payload("Book A", 100, 100)).await.unwrap();
        catalog.create_book(payload("Book B", 100, 50)).await.unwrap();

        let query = BookQuery {
            finished: Some("1".to_string()),
            ..Default::default()
        };
        let books = catalog.list_books(&query).await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "Book A");

        let query = BookQuery {
            finished: Some("0".to_string()),
            ..Default::default()
        };
        let books = catalog.list_books(&query).await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "Book B");
    }

    #[tokio::test]
    async fn list_combines_filters_with_logical_and() {
        let catalog = service();
        catalog.create_book(payload("War and Peace", 100, 100)).await.unwrap();
        catalog.create_book(payload("Wartime", 100, 50)).await.unwrap();
        catalog.create_book(payload("Quiet", 100, 100)).await.unwrap();

        let query = BookQuery {
            name: Some("war".to_string()),
            finished: Some("1".to_string()),
            ..Default::default()
        };
        let books = catalog.list_books(&query).await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "War and Peace");
    }

    #[tokio::test]
    async fn list_on_empty_catalog_is_empty_not_an_error() {
        let catalog = service();
        assert!(catalog.list_books(&BookQuery::default()).await.is_empty());
    }
}
