//! Development placeholder renderer.

use serde_json::Value;

use biblio_kernel::ViewRenderer;

/// Bare-bones [`ViewRenderer`] used until a real template engine is wired in.
///
/// Emits the bag's title as a heading and the rest of the bag pretty-printed,
/// which is enough to exercise every workflow end to end. Bag string values
/// are already HTML-escaped by the form pipeline before they get here.
pub struct BasicRenderer;

impl ViewRenderer for BasicRenderer {
    fn render(&self, template: &str, bag: &Value) -> anyhow::Result<String> {
        let title = bag
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(template);
        let body = serde_json::to_string_pretty(bag)?;

        Ok(format!(
            "<!DOCTYPE html>\n<html><head><title>{title}</title></head><body>\
             <h1>{title}</h1>\n<!-- template: {template} -->\n<pre>{body}</pre>\
             </body></html>"
        ))
    }
}
