//! Property-based tests for the doc lexer and grammar.
//!
//! Lexing and parsing must never panic, whatever the comment body holds.

use lua_doc_extractor::parser::lexer::tokenize;
use lua_doc_extractor::parser::parse_doc;
use lua_doc_extractor::{format_docs, get_docs, process_docs, Comment, Diagnostics, Position};
use proptest::prelude::*;

/// Fragments that steer generated text towards doc comment syntax.
fn fragment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("@class ".to_string()),
        Just("@table ".to_string()),
        Just("@enum ".to_string()),
        Just("@field ".to_string()),
        Just("@global ".to_string()),
        Just("@function ".to_string()),
        Just("@param ".to_string()),
        Just("@return ".to_string()),
        Just("```lua\n".to_string()),
        Just("```".to_string()),
        Just("`".to_string()),
        Just("\n".to_string()),
        Just(" | ".to_string()),
        Just("/***".to_string()),
        Just("*/".to_string()),
        Just("///".to_string()),
        "[A-Za-z_.:<>(){}\\[\\],?|\"'0-9 -]{1,12}",
        "\\PC{1,4}",
    ]
}

fn doc_like_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment_strategy(), 0..40).prop_map(|parts| parts.concat())
}

fn comment(text: &str) -> Comment {
    Comment {
        start: Position::new(1, 1),
        end: Position::new(1, 1),
        text: text.to_string(),
    }
}

proptest! {
    #[test]
    fn tokenize_covers_arbitrary_input(input in any::<String>()) {
        let tokens = tokenize(&input);
        let joined: String = tokens.iter().map(|t| t.text).collect();
        prop_assert_eq!(joined, input);
    }

    #[test]
    fn tokenize_covers_doc_like_input(input in doc_like_strategy()) {
        let tokens = tokenize(&input);
        let mut offset = 0;
        for token in &tokens {
            prop_assert_eq!(token.offset, offset);
            offset += token.text.len();
        }
        prop_assert_eq!(offset, input.len());
    }

    #[test]
    fn parse_doc_never_panics(input in any::<String>()) {
        let mut diagnostics = Diagnostics::new();
        let _ = parse_doc(&comment(&input), &mut diagnostics);
    }

    #[test]
    fn parse_doc_never_panics_on_doc_like_input(input in doc_like_strategy()) {
        let mut diagnostics = Diagnostics::new();
        let _ = parse_doc(&comment(&input), &mut diagnostics);
    }

    #[test]
    fn pipeline_never_panics(input in doc_like_strategy()) {
        let mut diagnostics = Diagnostics::new();
        if let Ok(file) = get_docs(&input, "a.cpp", &mut diagnostics) {
            let docs = process_docs(file.docs, None, &mut diagnostics);
            let _ = format_docs(&docs);
        }
    }
}
