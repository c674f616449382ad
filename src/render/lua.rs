//! Lua surface syntax: names, field assignments and `---` doc comments.

use crate::model::{FieldAttribute, FieldKey, FieldPath};

/// Reserved words of Lua 5.1.
const KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

pub const NIL: &str = "nil";

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// `a.b.c`, with reserved words as `["end"]` keys.
pub fn format_path<S: AsRef<str>>(names: &[S]) -> String {
    let mut out = String::new();
    for (i, name) in names.iter().enumerate() {
        let name = name.as_ref();
        if is_keyword(name) {
            out.push_str(&format!("[\"{}\"]", name));
        } else {
            if i > 0 {
                out.push('.');
            }
            out.push_str(name);
        }
    }
    out
}

/// `a.b:c` for a method `c` on table `a.b`.
pub fn format_method_name<S: AsRef<str>>(names: &[S]) -> String {
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.as_ref().to_string(),
        Some((last, tables)) => format!("{}:{}", format_path(tables), last.as_ref()),
    }
}

/// Assignable form of a field path: `foo`, `Table.field`, `[1]`, `["end"]`.
pub fn format_field_path(path: &FieldPath) -> String {
    let mut out = String::new();
    for (i, key) in path.keys.iter().enumerate() {
        match key {
            FieldKey::Name(name) if is_keyword(name) => {
                out.push_str(&format!("[\"{}\"]", name));
            }
            FieldKey::Name(name) => {
                if i > 0 {
                    out.push('.');
                }
                out.push_str(name);
            }
            FieldKey::Index(raw) => out.push_str(&format!("[{}]", raw)),
        }
    }
    out
}

/// A field as `key = value`, preceded by its doc comment.
///
/// Literal types become the value itself. Anything else is `nil` with an
/// `@type` line carrying the type and the field's description.
pub fn format_field(field: &FieldAttribute, indent: &str) -> String {
    let literal = field.ty.as_ref().and_then(|t| t.literal_value());
    let (value, comment) = match (literal, &field.ty) {
        (Some(value), _) => (value, field.description.trim().to_string()),
        (None, Some(ty)) => {
            let comment = format!("@type {}{}", ty, spaced(&field.description));
            (NIL, comment.trim().to_string())
        }
        (None, None) => (NIL, field.description.trim().to_string()),
    };

    let lua = format!("{}{} = {}", indent, format_field_path(&field.name), value);
    if comment.is_empty() {
        lua
    } else {
        format!("{}\n{}", to_lua_comment(&comment, indent), lua)
    }
}

/// Make sure free text following a tag or type is separated from it.
pub fn spaced(text: &str) -> String {
    if text.is_empty() || text.starts_with(char::is_whitespace) {
        text.to_string()
    } else {
        format!(" {}", text)
    }
}

/// Append a paragraph, leaving one blank line between non-empty sides.
pub fn join_lines(dest: &str, src: &str) -> String {
    let dest = dest.trim_end();
    let src = src.trim_start();
    match (dest.is_empty(), src.is_empty()) {
        (true, _) => src.to_string(),
        (_, true) => dest.to_string(),
        _ => format!("{}\n\n{}", dest, src),
    }
}

/// Prefix every line with `indent` and `---`.
pub fn to_lua_comment(text: &str, indent: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.split('\n')
        .map(|line| format!("{}---{}", indent, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Join the parts whose trimmed-end text is non-empty.
pub fn join_non_empty(parts: &[&str], separator: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim_end())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
