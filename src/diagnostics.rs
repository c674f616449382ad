//! Non-fatal warnings collected while extracting and processing docs.

use crate::model::Position;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("{at}: comment close marker outside of a comment")]
    CloseWithoutOpen { at: Position },

    #[error("{at}: doc comment opened inside another doc comment")]
    OpenWhileOpen { at: Position },

    #[error("{start}: doc comment is never closed")]
    UnclosedComment { start: Position },

    #[error("{at}: ambiguous parse ({candidates} candidates), using the first")]
    AmbiguousParse { at: Position, candidates: usize },

    #[error("{at}: @{tag} is missing its name")]
    MissingName { tag: String, at: Position },

    #[error("{at}: @{tag} {name} is missing its type")]
    MissingType {
        tag: String,
        name: String,
        at: Position,
    },

    #[error("{}: multiple declarations generated:\n - {}\n{}", location(.path, .at), .attributes.join("\n - "), .lua.join("\n==========\n"))]
    ConflictingDeclarations {
        path: Option<String>,
        at: Position,
        attributes: Vec<String>,
        lua: Vec<String>,
    },
}

fn location(path: &Option<String>, at: &Position) -> String {
    match path {
        Some(path) => format!("{}:{}", path, at),
        None => at.to_string(),
    }
}

/// Collector threaded through the pipeline in place of a global log.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, warning: Warning) {
        tracing::debug!(%warning, "diagnostic");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Hand the collected warnings to the caller, leaving the collector empty.
    pub fn drain(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_and_drains() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn(Warning::UnclosedComment {
            start: Position::new(3, 1),
        });
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.warnings()[0].to_string(),
            "3:1: doc comment is never closed"
        );
        let drained = diagnostics.drain();
        assert_eq!(drained.len(), 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn conflict_message_lists_attributes() {
        let warning = Warning::ConflictingDeclarations {
            path: Some("a.cpp".to_string()),
            at: Position::new(1, 1),
            attributes: vec!["@table Foo".to_string(), "@function Bar".to_string()],
            lua: vec!["Foo = {}".to_string(), "function Bar() end".to_string()],
        };
        let message = warning.to_string();
        assert!(message.starts_with("a.cpp:1:1: multiple declarations generated"));
        assert!(message.contains(" - @table Foo\n - @function Bar"));
    }
}
