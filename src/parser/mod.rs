//! Parser module: comment scanning, doc lexing and the doc grammar.

pub mod attribute;
pub mod comment;
pub mod lexer;
pub mod lua_type;

use crate::diagnostics::{Diagnostics, Warning};
use crate::error::ParseError;
use crate::model::{Comment, Doc};
use lexer::{tokenize, Token, TokenKind};

/// Parse one extracted comment into a [`Doc`].
///
/// `doc := description attribute*`, where the description runs up to the
/// first `@tag` and each attribute's body runs up to the next one.
pub fn parse_doc(comment: &Comment, diagnostics: &mut Diagnostics) -> Result<Doc, ParseError> {
    // Every line, the last included, is newline terminated.
    let text = format!("{}\n", comment.text);
    let tokens = tokenize(&text);

    if tokens.last().is_some_and(|t| t.kind == TokenKind::Unclosed) {
        return Err(ParseError::UnclosedCode {
            fence: unclosed_fence(&tokens).to_string(),
            at: comment.start,
        });
    }

    let markers: Vec<&Token> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Attribute)
        .collect();

    let description_end = markers.first().map_or(text.len(), |t| t.offset);
    let mut doc = Doc {
        description: text[..description_end].to_string(),
        start: comment.start,
        end: comment.end,
        ..Default::default()
    };

    let mut ambiguous = 0;
    for (i, marker) in markers.iter().enumerate() {
        let body_start = marker.offset + marker.text.len();
        let body_end = markers.get(i + 1).map_or(text.len(), |next| next.offset);
        let parsed = attribute::parse_attribute(
            marker.value(),
            &text[body_start..body_end],
            comment.start,
            diagnostics,
        )?;
        if parsed.ambiguous {
            ambiguous += 1;
        }
        doc.attributes.push(parsed.attribute);
    }

    if ambiguous > 0 {
        diagnostics.warn(Warning::AmbiguousParse {
            at: comment.start,
            candidates: ambiguous + 1,
        });
    }

    tracing::debug!(
        at = %comment.start,
        attributes = doc.attributes.len(),
        "parsed doc"
    );
    Ok(doc)
}

/// The opener of the innermost code span left open.
fn unclosed_fence<'a>(tokens: &[Token<'a>]) -> &'a str {
    let opener = tokens
        .iter()
        .rev()
        .find(|t| matches!(t.kind, TokenKind::CodeBlockStart | TokenKind::InlineCodeStart));
    match opener {
        Some(t) if t.kind == TokenKind::CodeBlockStart => "```",
        _ => "`",
    }
}
