use std::fmt;

use serde_json::{json, Value};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use biblio_store::{Record, RecordId};

use crate::utils::ordinal_day;

/// Loan status of a physical copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Available => "Available",
            Status::Maintenance => "Maintenance",
            Status::Loaned => "Loaned",
            Status::Reserved => "Reserved",
        }
    }

    /// Lenient parse of form input: anything outside the enumeration falls
    /// back to the Maintenance default rather than failing the form.
    pub fn from_form(raw: &str) -> Self {
        match raw.trim() {
            "Available" => Status::Available,
            "Maintenance" => Status::Maintenance,
            "Loaned" => Status::Loaned,
            "Reserved" => Status::Reserved,
            _ => Status::default(),
        }
    }

    pub const ALL: [Status; 4] = [
        Status::Available,
        Status::Maintenance,
        Status::Loaned,
        Status::Reserved,
    ];
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A physical copy of a book.
#[derive(Debug, Clone, PartialEq)]
pub struct BookInstance {
    pub id: RecordId,
    /// The work this copy belongs to.
    pub book: RecordId,
    pub imprint: String,
    pub status: Status,
    pub due_back: Date,
}

/// Validated, sanitized form payload: the four mutable fields of a copy.
///
/// Built only after the validation pipeline succeeds; `due_back: None` means
/// the form left the date out, which resolves to today's date.
#[derive(Debug, Clone)]
pub struct BookInstancePayload {
    pub book: RecordId,
    pub imprint: String,
    pub status: Status,
    pub due_back: Option<Date>,
}

impl BookInstance {
    pub fn new(payload: BookInstancePayload) -> Self {
        Self {
            id: RecordId::unassigned(),
            book: payload.book,
            imprint: payload.imprint,
            status: payload.status,
            due_back: payload.due_back.unwrap_or_else(today),
        }
    }

    /// Full replace of the mutable fields, as the update workflow does.
    pub fn apply(&mut self, payload: BookInstancePayload) {
        self.book = payload.book;
        self.imprint = payload.imprint;
        self.status = payload.status;
        self.due_back = payload.due_back.unwrap_or_else(today);
    }

    /// Canonical URL path for this copy's detail page.
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }

    /// Human-readable due date, e.g. "March 1st, 2024".
    pub fn due_back_formatted(&self) -> String {
        format!(
            "{} {}, {}",
            self.due_back.month(),
            ordinal_day(self.due_back.day()),
            self.due_back.year()
        )
    }

    /// Due date in the shape an `<input type="date">` expects.
    pub fn due_back_for_form(&self) -> String {
        let format = format_description!("[year]-[month]-[day]");
        self.due_back.format(&format).unwrap_or_default()
    }

    pub fn to_bag(&self) -> Value {
        json!({
            "id": self.id.to_string(),
            "url": self.url(),
            "book": self.book.to_string(),
            "imprint": self.imprint,
            "status": self.status.as_str(),
            "due_back_formatted": self.due_back_formatted(),
            "due_back_for_form": self.due_back_for_form(),
        })
    }
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

impl Record for BookInstance {
    const COLLECTION: &'static str = "bookinstances";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}
