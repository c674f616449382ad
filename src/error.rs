//! Error types for comment extraction and doc parsing.

use crate::model::Position;
use thiserror::Error;

/// A file-level failure of the comment scanner.
///
/// The file contributes no docs when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The scanner tried to leave a state it was never in.
    #[error("comment scanner state underflow at {at}")]
    StateUnderflow { at: Position },
}

/// A single comment that could not be parsed into a doc.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A ```` ``` ```` fence or `` ` `` span that never closes.
    #[error("{at}: unclosed code span opened by `{fence}`")]
    UnclosedCode { fence: String, at: Position },

    /// A declaration tag whose name is not a Lua identifier path.
    #[error("{at}: invalid name `{name}` for @{tag}")]
    InvalidName {
        tag: String,
        name: String,
        at: Position,
    },
}
