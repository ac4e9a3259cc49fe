//! Repository layer for in-memory storage

pub mod books;

/// Main repository struct holding the backing collections
#[derive(Clone, Default)]
pub struct Repository {
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create a new repository with an empty backing store
    pub fn new() -> Self {
        Self {
            books: books::BooksRepository::new(),
        }
    }
}
