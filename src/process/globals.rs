//! `@global` is sugar for a standalone `@field`.

use crate::model::{Attribute, Doc};

/// Rewrite every `@global` as an `@field`, keeping its place in the list.
pub fn promote_globals(docs: Vec<Doc>) -> Vec<Doc> {
    docs.into_iter()
        .map(|mut doc| {
            doc.attributes = std::mem::take(&mut doc.attributes)
                .into_iter()
                .map(|attribute| match attribute {
                    Attribute::Global(field) => Attribute::Field(field),
                    other => other,
                })
                .collect();
            doc
        })
        .collect()
}
