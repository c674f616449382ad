//! Semantic processing over the docs of every input file.
//!
//! The passes run in a fixed order and each takes ownership of the whole
//! collection, so a doc merged away is gone from every later pass.

pub mod enums;
pub mod fields;
pub mod globals;
pub mod tables;

use crate::diagnostics::Diagnostics;
use crate::model::Doc;
use crate::render::source_link;
use crate::rules::apply_rules;

pub use enums::{fold_enum_fields, merge_enum_attributes};
pub use fields::render_standalone_fields;
pub use globals::promote_globals;
pub use tables::{merge_tables, synthesize_tables};

/// Run every pass, generate declarations and attach source links.
///
/// Docs left with nothing to print are dropped.
pub fn process_docs(
    docs: Vec<Doc>,
    repo_url: Option<&str>,
    diagnostics: &mut Diagnostics,
) -> Vec<Doc> {
    let count = docs.len();
    let docs = promote_globals(docs);
    let docs = synthesize_tables(docs);
    let docs = fold_enum_fields(docs);
    let docs = merge_tables(docs);
    let docs = merge_enum_attributes(docs);
    let docs = render_standalone_fields(docs);
    let mut docs = apply_rules(docs, diagnostics);

    docs.retain(|doc| !doc.is_empty());
    if let Some(repo_url) = repo_url {
        for doc in &mut docs {
            if let Some(path) = &doc.path {
                doc.source_link = Some(source_link(repo_url, path, doc.start, doc.end));
            }
        }
    }

    tracing::debug!(input = count, output = docs.len(), "processed docs");
    docs
}
