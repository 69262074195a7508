use serde_json::{json, Value};

use biblio_store::{Record, RecordId};

/// A book classification ("Fantasy", "Science Fiction").
///
/// Names are stored trimmed and HTML-escaped; uniqueness is enforced at the
/// application level by a pre-insert lookup, not by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Genre {
    pub id: RecordId,
    pub name: String,
}

impl Genre {
    /// A new, not-yet-stored genre. The store assigns the id on insert.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RecordId::unassigned(),
            name: name.into(),
        }
    }

    /// Canonical URL path for this genre's detail page.
    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }

    pub fn to_bag(&self) -> Value {
        json!({
            "id": self.id.to_string(),
            "url": self.url(),
            "name": self.name,
        })
    }
}

impl Record for Genre {
    const COLLECTION: &'static str = "genres";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}
