//! Per-tag grammar for the text that follows an `@tag` marker.

use super::lua_type::parse_type;
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::ParseError;
use crate::lua_type::LuaType;
use crate::model::*;
use regex::Regex;
use std::sync::LazyLock;

static RE_NAME_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap()
});

static RE_FUNCTION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)(?::([A-Za-z_][A-Za-z0-9_]*))?$")
        .unwrap()
});

/// An attribute plus whether its grammar admitted more than one reading.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAttribute {
    pub attribute: Attribute,
    pub ambiguous: bool,
}

impl From<Attribute> for ParsedAttribute {
    fn from(attribute: Attribute) -> Self {
        Self {
            attribute,
            ambiguous: false,
        }
    }
}

/// Parse the `body` that follows `@tag`.
///
/// Unknown tags and tags missing their name are kept verbatim as
/// [`Attribute::Other`]. Declaration names that are not Lua identifier paths
/// are errors.
pub fn parse_attribute(
    tag: &str,
    body: &str,
    at: Position,
    diagnostics: &mut Diagnostics,
) -> Result<ParsedAttribute, ParseError> {
    let other = || {
        Attribute::Other(OtherAttribute {
            tag: tag.to_string(),
            description: body.to_string(),
        })
    };

    let word = match tag {
        "class" => class_word(body),
        "table" | "enum" | "function" | "param" | "field" | "global" => leading_word(body),
        _ => return Ok(other().into()),
    };
    let Some((name, rest)) = word else {
        diagnostics.warn(Warning::MissingName {
            tag: tag.to_string(),
            at,
        });
        return Ok(other().into());
    };
    let description = rest.to_string();

    let invalid = || ParseError::InvalidName {
        tag: tag.to_string(),
        name: name.to_string(),
        at,
    };

    let attribute = match tag {
        "class" => {
            let class = ClassAttribute {
                name: name.to_string(),
                description,
            };
            if !RE_NAME_PATH.is_match(&class.table_name().join(".")) {
                return Err(invalid());
            }
            Attribute::Class(class)
        }
        "table" | "enum" => {
            if !RE_NAME_PATH.is_match(name) {
                return Err(invalid());
            }
            let path = split_path(name);
            if tag == "table" {
                Attribute::Table(TableAttribute {
                    name: path,
                    is_local: false,
                    description,
                })
            } else {
                Attribute::Enum(EnumAttribute {
                    name: path,
                    description,
                })
            }
        }
        "function" => {
            let caps = RE_FUNCTION_NAME.captures(name).ok_or_else(invalid)?;
            let mut path = split_path(&caps[1]);
            let is_method = match caps.get(2) {
                Some(method) => {
                    path.push(method.as_str().to_string());
                    true
                }
                None => false,
            };
            Attribute::Function(FunctionAttribute {
                name: path,
                is_method,
                description,
            })
        }
        "param" => Attribute::Param(ParamAttribute {
            name: name.to_string(),
            description,
        }),
        _ => {
            let (field, ambiguous) = typed_field(tag, name, rest, at, diagnostics);
            let attribute = if tag == "global" {
                Attribute::Global(field)
            } else {
                Attribute::Field(field)
            };
            return Ok(ParsedAttribute {
                attribute,
                ambiguous,
            });
        }
    };
    Ok(attribute.into())
}

/// `<name> <type> <description>` for `@field` and `@global`.
fn typed_field(
    tag: &str,
    name: &str,
    rest: &str,
    at: Position,
    diagnostics: &mut Diagnostics,
) -> (FieldAttribute, bool) {
    let name_path = parse_field_path(name);
    let type_text = rest.trim_start_matches([' ', '\t']);

    if type_text.is_empty() || type_text.starts_with('\n') {
        diagnostics.warn(Warning::MissingType {
            tag: tag.to_string(),
            name: name.to_string(),
            at,
        });
        let field = FieldAttribute {
            name: name_path,
            ty: None,
            description: rest.to_string(),
        };
        return (field, false);
    }

    if let Some(parsed) = parse_type(type_text) {
        let after = &type_text[parsed.len..];
        if after.is_empty() || after.starts_with(char::is_whitespace) {
            let field = FieldAttribute {
                name: name_path,
                ty: Some(parsed.ty),
                description: after.to_string(),
            };
            return (field, parsed.ambiguous);
        }
    }

    // Exotic type syntax: keep the next word as written.
    let end = type_text.find(char::is_whitespace).unwrap_or(type_text.len());
    tracing::debug!(ty = &type_text[..end], "keeping unparsed type verbatim");
    let field = FieldAttribute {
        name: name_path,
        ty: Some(LuaType::named(&type_text[..end])),
        description: type_text[end..].to_string(),
    };
    (field, false)
}

/// First word on the tag's line, and everything after it.
fn leading_word(body: &str) -> Option<(&str, &str)> {
    let text = body.trim_start_matches([' ', '\t']);
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    (end > 0).then(|| (&text[..end], &text[end..]))
}

/// Like [`leading_word`], but whitespace inside `<...>` belongs to the name.
fn class_word(body: &str) -> Option<(&str, &str)> {
    let text = body.trim_start_matches([' ', '\t']);
    let mut depth = 0usize;
    let mut end = text.len();
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            '\n' => {
                end = i;
                break;
            }
            c if c.is_whitespace() && depth == 0 => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    (end > 0).then(|| (&text[..end], &text[end..]))
}

fn split_path(name: &str) -> Vec<String> {
    name.split('.').map(str::to_string).collect()
}

/// `a.b`, `[1]`, `["key"]`, `a[2].c`. Anything else is kept as a single name.
pub fn parse_field_path(word: &str) -> FieldPath {
    let mut keys = Vec::new();
    let mut rest = word;
    while !rest.is_empty() {
        if let Some(inner) = rest.strip_prefix('[') {
            let Some(close) = inner.find(']') else {
                return verbatim(word);
            };
            if close == 0 {
                return verbatim(word);
            }
            keys.push(FieldKey::Index(inner[..close].to_string()));
            rest = &inner[close + 1..];
            continue;
        }
        if !keys.is_empty() {
            match rest.strip_prefix('.') {
                Some(after) => rest = after,
                None => return verbatim(word),
            }
        }
        let end = rest.find(['.', '[']).unwrap_or(rest.len());
        if end == 0 {
            return verbatim(word);
        }
        keys.push(FieldKey::Name(rest[..end].to_string()));
        rest = &rest[end..];
    }
    FieldPath { keys }
}

fn verbatim(word: &str) -> FieldPath {
    FieldPath {
        keys: vec![FieldKey::Name(word.to_string())],
    }
}
