//! Fields that belong to no table are emitted as plain assignments.

use crate::model::{AttributeKind, Doc};
use crate::render::lua::format_field;

/// Render the `@field`s of every doc without a `@table` as one snippet of
/// assignments, removing them from the doc.
pub fn render_standalone_fields(docs: Vec<Doc>) -> Vec<Doc> {
    docs.into_iter()
        .map(|mut doc| {
            if doc.has(AttributeKind::Table) {
                return doc;
            }
            let fields = doc.take_fields();
            if !fields.is_empty() {
                let rendered: Vec<String> = fields.iter().map(|f| format_field(f, "")).collect();
                doc.lua.push(rendered.join("\n\n"));
            }
            doc
        })
        .collect()
}
