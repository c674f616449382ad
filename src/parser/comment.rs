//! Doc comment extractor: a line-by-line scanner with an explicit state stack.
//!
//! Recognises `/***` block comments (three or more stars) and runs of `///`
//! line comments. Plain `/* */` and `//` comments and quoted literals are
//! stepped over so their contents never open or close a doc comment.

use crate::diagnostics::{Diagnostics, Warning};
use crate::error::ExtractError;
use crate::model::{Comment, Position};
use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

/// Exactly three slashes at the start of a line.
static RE_LINE_DOC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([[:blank:]]*///)(?:[^/]|$)").unwrap());

/// Continuation decoration: leading blanks and one `*` that does not close.
static RE_CONTINUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([[:blank:]]*\*)(?:[^/]|$)").unwrap());

static RE_TRAILING_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)[[:blank:]]+$").unwrap());

// -- Scanner state ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    DocBlock,
    DocLine,
    PlainBlock,
}

struct Scanner<'d> {
    stack: Vec<State>,
    body: String,
    start: Position,
    last_line_end: Position,
    comments: Vec<Comment>,
    diagnostics: &'d mut Diagnostics,
}

// -- Public API ---------------------------------------------------------------

/// Extract every doc comment from `source`, in order.
pub fn get_comments(
    source: &str,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Comment>, ExtractError> {
    let mut scanner = Scanner {
        stack: vec![State::Code],
        body: String::new(),
        start: Position::default(),
        last_line_end: Position::default(),
        comments: Vec::new(),
        diagnostics,
    };

    for (index, raw) in source.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        scanner.scan_line(index + 1, line)?;
    }

    scanner.finish()
}

// -- Line processing ----------------------------------------------------------

impl Scanner<'_> {
    fn top(&self) -> State {
        self.stack.last().copied().unwrap_or(State::Code)
    }

    fn push(&mut self, state: State) {
        self.stack.push(state);
    }

    fn pop(&mut self, at: Position) -> Result<State, ExtractError> {
        // The bottom `Code` state is never popped.
        if self.stack.len() < 2 {
            return Err(ExtractError::StateUnderflow { at });
        }
        self.stack.pop().ok_or(ExtractError::StateUnderflow { at })
    }

    fn open(&mut self, state: State, start: Position) {
        self.push(state);
        self.body.clear();
        self.start = start;
    }

    fn close(&mut self, end: Position) -> Result<(), ExtractError> {
        self.pop(end)?;
        let text = normalize(&std::mem::take(&mut self.body));
        self.comments.push(Comment {
            start: self.start,
            end,
            text,
        });
        Ok(())
    }

    fn scan_line(&mut self, number: usize, line: &str) -> Result<(), ExtractError> {
        if self.top() == State::DocLine {
            if let Some(caps) = RE_LINE_DOC.captures(line) {
                let after = caps.get(1).map_or(0, |m| m.end());
                self.body.push_str(&line[after..]);
                self.body.push('\n');
                self.last_line_end = Position::new(number, column(line, line.len()));
                return Ok(());
            }
            let end = self.last_line_end;
            self.close(end)?;
        }

        let mut i = 0;
        if self.top() == State::DocBlock {
            if let Some(caps) = RE_CONTINUATION.captures(line) {
                i = caps.get(1).map_or(0, |m| m.end());
            }
        }

        while i < line.len() {
            i = match self.top() {
                State::Code => self.scan_code(number, line, i),
                State::DocBlock => self.scan_doc_block(number, line, i)?,
                State::PlainBlock => self.scan_plain_block(number, line, i)?,
                State::DocLine => line.len(),
            };
        }

        if self.top() == State::DocBlock {
            self.body.push('\n');
        }
        Ok(())
    }

    fn scan_code(&mut self, number: usize, line: &str, i: usize) -> usize {
        if i == 0 {
            if let Some(caps) = RE_LINE_DOC.captures(line) {
                let after = caps.get(1).map_or(0, |m| m.end());
                self.open(State::DocLine, Position::new(number, column(line, after - 3)));
                self.body.push_str(&line[after..]);
                self.body.push('\n');
                self.last_line_end = Position::new(number, column(line, line.len()));
                return line.len();
            }
        }

        let rest = &line[i..];
        if rest.starts_with("/*") {
            let stars = rest[1..].bytes().take_while(|&b| b == b'*').count();
            let after = i + 1 + stars;
            if stars >= 3 {
                // `/***/` and longer star runs closed on the spot are not docs.
                if line[after..].starts_with('/') {
                    return after + 1;
                }
                self.open(State::DocBlock, Position::new(number, column(line, i)));
                return after;
            }
            self.push(State::PlainBlock);
            return i + 2;
        }
        if rest.starts_with("//") {
            return line.len();
        }
        if rest.starts_with("*/") {
            self.diagnostics.warn(Warning::CloseWithoutOpen {
                at: Position::new(number, column(line, i)),
            });
            return i + 2;
        }
        if rest.starts_with('"') || rest.starts_with('\'') {
            return skip_literal(line, i);
        }
        i + rest.chars().next().map_or(1, char::len_utf8)
    }

    fn scan_doc_block(
        &mut self,
        number: usize,
        line: &str,
        i: usize,
    ) -> Result<usize, ExtractError> {
        let rest = &line[i..];
        let close = rest.find("*/");

        let searched = &rest[..close.unwrap_or(rest.len())];
        for (offset, _) in searched.match_indices("/***") {
            self.diagnostics.warn(Warning::OpenWhileOpen {
                at: Position::new(number, column(line, i + offset)),
            });
        }

        match close {
            Some(k) => {
                // Drop the whole star run in front of the `/`.
                let run_start = rest[..k].trim_end_matches('*').len();
                self.body.push_str(&rest[..run_start]);
                let after = i + k + 2;
                self.close(Position::new(number, column(line, after)))?;
                Ok(after)
            }
            None => {
                self.body.push_str(rest);
                Ok(line.len())
            }
        }
    }

    fn scan_plain_block(
        &mut self,
        number: usize,
        line: &str,
        i: usize,
    ) -> Result<usize, ExtractError> {
        match line[i..].find("*/") {
            Some(k) => {
                let after = i + k + 2;
                self.pop(Position::new(number, column(line, after)))?;
                Ok(after)
            }
            None => Ok(line.len()),
        }
    }

    fn finish(mut self) -> Result<Vec<Comment>, ExtractError> {
        match self.top() {
            State::DocLine => {
                let end = self.last_line_end;
                self.close(end)?;
            }
            State::DocBlock => {
                self.diagnostics.warn(Warning::UnclosedComment { start: self.start });
                self.body.clear();
            }
            State::PlainBlock | State::Code => {}
        }
        tracing::debug!(count = self.comments.len(), "extracted doc comments");
        Ok(self.comments)
    }
}

// -- Helpers ------------------------------------------------------------------

/// 1-based character column of byte offset `byte` in `line`.
fn column(line: &str, byte: usize) -> usize {
    line[..byte].chars().count() + 1
}

/// Skip a quoted literal starting at `start`, honouring backslash escapes.
/// Unterminated literals run to the end of the line.
fn skip_literal(line: &str, start: usize) -> usize {
    let quote = line[start..].chars().next().unwrap_or('"');
    let mut escaped = false;
    for (offset, c) in line[start + 1..].char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return start + 1 + offset + 1;
        }
    }
    line.len()
}

/// Dedent a raw comment body, trim every line's trailing whitespace and drop
/// leading blank lines.
fn normalize(body: &str) -> String {
    // The synthetic first line never contributes to the common indentation.
    let text = format!("\n{}", body);
    let dedented = dedent(&text);
    let trimmed = RE_TRAILING_WS.replace_all(&dedented, "");
    let content_start = trimmed
        .find(|c: char| !c.is_whitespace())
        .map_or(trimmed.len(), |first| {
            trimmed[..first].rfind('\n').map_or(0, |nl| nl + 1)
        });
    trimmed[content_start..].trim_end().to_string()
}

/// Remove the longest whitespace prefix shared by every non-blank line.
pub fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| &l[..l.len() - l.trim_start().len()])
        .reduce(common_prefix)
        .unwrap_or("");

    text.lines()
        .map(|l| l.strip_prefix(indent).unwrap_or(l.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map_or_else(|| a.len().min(b.len()), |((i, _), _)| i);
    &a[..end]
}
