use serde_json::{json, Value};

use biblio_store::{Record, RecordId};

/// A catalogued work, referenced by book instances and genres.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: RecordId,
    pub title: String,
    /// Genres this book is filed under.
    pub genres: Vec<RecordId>,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: RecordId::unassigned(),
            title: title.into(),
            genres: Vec::new(),
        }
    }

    pub fn with_genres(title: impl Into<String>, genres: Vec<RecordId>) -> Self {
        Self {
            id: RecordId::unassigned(),
            title: title.into(),
            genres,
        }
    }

    pub fn has_genre(&self, genre: &RecordId) -> bool {
        self.genres.contains(genre)
    }

    /// View-bag projection used by pickers and dependent listings.
    pub fn to_bag(&self) -> Value {
        json!({
            "id": self.id.to_string(),
            "title": self.title,
        })
    }
}

impl Record for Book {
    const COLLECTION: &'static str = "books";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}
