//! Extract Lua annotations from `/***` doc comments in C/C++ sources and
//! generate Lua declaration stubs for a Lua language server.
//!
//! The pipeline runs in three calls:
//!
//! 1. [`get_docs`] per source file: scan comments and parse each into a [`Doc`].
//! 2. [`process_docs`] over the docs of every file: merge, fold and generate
//!    declarations.
//! 3. [`format_docs`] to render the result as Lua.

pub mod diagnostics;
pub mod error;
pub mod lua_type;
pub mod model;
pub mod parser;
pub mod process;
pub mod render;
pub mod rules;

pub use diagnostics::{Diagnostics, Warning};
pub use error::{ExtractError, ParseError};
pub use model::{Attribute, Comment, Doc, Position};
pub use process::process_docs;
pub use render::{add_header, format_docs};

/// Docs parsed from one source file, plus the comments that failed to parse.
#[derive(Debug, Default)]
pub struct FileDocs {
    pub docs: Vec<Doc>,
    pub errors: Vec<ParseError>,
}

/// Scan `source` for doc comments and parse each one.
///
/// A comment that fails to parse is reported in [`FileDocs::errors`] and the
/// rest of the file is still returned. Only a scanner failure fails the file.
pub fn get_docs(
    source: &str,
    path: &str,
    diagnostics: &mut Diagnostics,
) -> Result<FileDocs, ExtractError> {
    let comments = parser::comment::get_comments(source, diagnostics)?;
    tracing::debug!(path, comments = comments.len(), "extracted comments");

    let mut result = FileDocs::default();
    for comment in &comments {
        match parser::parse_doc(comment, diagnostics) {
            Ok(mut doc) => {
                doc.path = Some(path.to_string());
                result.docs.push(doc);
            }
            Err(e) => result.errors.push(e),
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_do_not_fail_the_file() {
        let source = "/***\n * ```lua\n * unclosed\n */\n\n/***\n * @table Ok\n */\n";
        let mut diagnostics = Diagnostics::new();
        let file = get_docs(source, "a.cpp", &mut diagnostics).unwrap();
        assert_eq!(file.errors.len(), 1);
        assert_eq!(file.docs.len(), 1);
        assert_eq!(file.docs[0].path.as_deref(), Some("a.cpp"));
    }
}
