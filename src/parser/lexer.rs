//! Doc lexer: splits one comment body into classified tokens.
//!
//! Lexing never fails: anything unrecognised is a `Word`, and a code span
//! still open at end of input yields a trailing `Unclosed` token for the
//! grammar to reject.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `@tag`; the value is the tag without the `@`.
    Attribute,
    Word,
    Space,
    Newline,
    CodeBlockStart,
    CodeBlockEnd,
    InlineCodeStart,
    InlineCodeEnd,
    /// Verbatim contents of a fenced block or inline span.
    Code,
    /// End of input reached inside a code span.
    Unclosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of `text` in the lexed input.
    pub offset: usize,
}

impl<'a> Token<'a> {
    pub fn value(&self) -> &'a str {
        match self.kind {
            TokenKind::Attribute => &self.text[1..],
            _ => self.text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Main,
    CodeBlock,
    InlineCode,
}

const FENCE: &str = "```";

/// Tokenize a comment body.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut stack = vec![State::Main];
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        let state = stack.last().copied().unwrap_or(State::Main);
        let (kind, len) = match state {
            State::Main => {
                let (kind, len) = lex_main(rest);
                match kind {
                    TokenKind::CodeBlockStart => stack.push(State::CodeBlock),
                    TokenKind::InlineCodeStart => stack.push(State::InlineCode),
                    _ => {}
                }
                (kind, len)
            }
            State::CodeBlock => {
                if rest.starts_with(FENCE) {
                    stack.pop();
                    (TokenKind::CodeBlockEnd, FENCE.len())
                } else {
                    (TokenKind::Code, rest.find(FENCE).unwrap_or(rest.len()))
                }
            }
            State::InlineCode => {
                if rest.starts_with('`') {
                    stack.pop();
                    (TokenKind::InlineCodeEnd, 1)
                } else {
                    (TokenKind::Code, inline_code_len(rest))
                }
            }
        };
        tokens.push(Token {
            kind,
            text: &rest[..len],
            offset: pos,
        });
        pos += len;
    }

    if stack.len() > 1 {
        tokens.push(Token {
            kind: TokenKind::Unclosed,
            text: "",
            offset: input.len(),
        });
    }
    tokens
}

fn lex_main(rest: &str) -> (TokenKind, usize) {
    if rest.starts_with(FENCE) {
        let lang = rest[FENCE.len()..]
            .bytes()
            .take_while(u8::is_ascii_alphabetic)
            .count();
        return (TokenKind::CodeBlockStart, FENCE.len() + lang);
    }
    if rest.starts_with('`') {
        return (TokenKind::InlineCodeStart, 1);
    }
    if rest.starts_with('\n') {
        return (TokenKind::Newline, 1);
    }

    let space = rest
        .char_indices()
        .find(|&(_, c)| !c.is_whitespace() || c == '\n')
        .map_or(rest.len(), |(i, _)| i);
    if space > 0 {
        return (TokenKind::Space, space);
    }

    if rest.starts_with('@') && rest.len() > 1 {
        let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if len > 1 {
            return (TokenKind::Attribute, len);
        }
    }

    (TokenKind::Word, word_len(rest))
}

/// A word runs to whitespace or an unescaped backtick.
fn word_len(rest: &str) -> usize {
    let mut prev = '\0';
    for (i, c) in rest.char_indices() {
        if i > 0 && (c.is_whitespace() || (c == '`' && prev != '\\')) {
            return i;
        }
        prev = c;
    }
    rest.len()
}

/// Inline code runs to the next single backtick; a doubled backtick is a
/// literal one.
fn inline_code_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            if bytes.get(i + 1) == Some(&b'`') {
                i += 2;
                continue;
            }
            return i;
        }
        i += 1;
    }
    rest.len()
}
