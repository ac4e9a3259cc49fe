//! Book (catalog entry) model and related wire types.
//!
//! All wire shapes serialize with camelCase field names (`pageCount`,
//! `insertedAt`, ...). The stored [`Book`] is owned exclusively by the
//! repository; handlers only ever see clones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Full book record as stored in the catalog and returned by detail lookups.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Opaque 16-character identifier, generated by the catalog.
    pub id: String,
    pub name: String,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
    /// Derived: `read_page == page_count`. Never supplied by callers.
    pub finished: bool,
    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied book attributes, shared by create and update.
///
/// `id`, `finished` and the timestamps are never accepted from the wire;
/// unknown JSON fields are dropped rather than stored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub read_page: u32,
    #[serde(default)]
    pub reading: bool,
}

/// Validated book attributes, produced by the catalog service once the
/// payload checks have passed. `name` is guaranteed non-empty and
/// `read_page <= page_count`.
#[derive(Debug, Clone)]
pub struct BookDraft {
    pub name: String,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

impl Book {
    /// Build a fresh record from a validated draft. Both timestamps are
    /// stamped to `now`; `finished` is derived from the page counts.
    pub fn from_draft(id: String, draft: BookDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            finished: draft.read_page == draft.page_count,
            name: draft.name,
            year: draft.year,
            author: draft.author,
            summary: draft.summary,
            publisher: draft.publisher,
            page_count: draft.page_count,
            read_page: draft.read_page,
            reading: draft.reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Replace every mutable attribute with the draft's values. `id` and
    /// `inserted_at` are preserved; `finished` is recomputed and
    /// `updated_at` refreshed.
    pub fn apply(&mut self, draft: BookDraft, now: DateTime<Utc>) {
        self.name = draft.name;
        self.year = draft.year;
        self.author = draft.author;
        self.summary = draft.summary;
        self.publisher = draft.publisher;
        self.page_count = draft.page_count;
        self.read_page = draft.read_page;
        self.reading = draft.reading;
        self.finished = self.read_page == self.page_count;
        self.updated_at = now;
    }
}

/// Short book representation for list responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: Option<String>,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Book list query parameters (API).
///
/// `reading` and `finished` arrive as raw strings; anything other than a
/// recognized boolean encoding disables the filter instead of erroring.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive substring match against the book name.
    pub name: Option<String>,
    /// `"0"`/`"1"` (or `"false"`/`"true"`); other values ignored.
    pub reading: Option<String>,
    /// Same encoding as `reading`, matched against the derived flag.
    pub finished: Option<String>,
}

impl BookQuery {
    /// Decode a query flag. `None` means the filter is not applied.
    pub(crate) fn parse_flag(raw: Option<&str>) -> Option<bool> {
        match raw? {
            "0" | "false" => Some(false),
            "1" | "true" => Some(true),
            _ => None,
        }
    }

    pub fn reading_flag(&self) -> Option<bool> {
        Self::parse_flag(self.reading.as_deref())
    }

    pub fn finished_flag(&self) -> Option<bool> {
        Self::parse_flag(self.finished.as_deref())
    }
}
