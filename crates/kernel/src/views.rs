use serde_json::Value;

/// Rendering seam between the workflow controllers and whatever produces HTML.
///
/// Controllers only ever name a template and hand over a data bag; the engine
/// behind this trait is an external collaborator. Bags always carry a `title`,
/// the entity or list being shown, and optionally `errors` (an array of
/// `{field, message}` objects) and reference lists for form selects.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, template: &str, bag: &Value) -> anyhow::Result<String>;
}

/// Template names used by the catalog modules.
pub mod templates {
    pub const GENRE_LIST: &str = "genre_list";
    pub const GENRE_DETAIL: &str = "genre_detail";
    pub const GENRE_FORM: &str = "genre_form";
    pub const GENRE_DELETE: &str = "genre_delete";

    pub const BOOKINSTANCE_LIST: &str = "bookinstance_list";
    pub const BOOKINSTANCE_DETAIL: &str = "bookinstance_detail";
    pub const BOOKINSTANCE_FORM: &str = "bookinstance_form";
    pub const BOOKINSTANCE_DELETE: &str = "bookinstance_delete";
}
