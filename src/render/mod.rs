//! Formatter: processed docs to Lua declaration stubs.

pub mod lua;

use crate::model::*;
use lua::{join_non_empty, spaced, to_lua_comment};
use regex::Regex;
use std::sync::LazyLock;

static RE_TRAILING_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)[[:blank:]]+$").unwrap());

/// Render every non-empty doc, separated by a blank line.
pub fn format_docs(docs: &[Doc]) -> String {
    let rendered: Vec<String> = docs
        .iter()
        .filter(|doc| !doc.is_empty())
        .map(format_doc)
        .collect();
    trim_trailing_whitespace(&rendered.join("\n\n"))
}

/// The `---` comment block for a doc, followed by its declaration.
pub fn format_doc(doc: &Doc) -> String {
    let attributes: Vec<String> = doc.attributes.iter().map(format_attribute).collect();
    let attributes = attributes.join("\n");
    let comment = join_non_empty(
        &[
            doc.description.trim_start(),
            doc.source_link.as_deref().unwrap_or_default(),
            attributes.as_str(),
        ],
        "\n\n",
    );
    let comment = to_lua_comment(&comment, "");
    let lua = doc.lua.first().map_or("", String::as_str);
    join_non_empty(&[comment.as_str(), lua], "\n")
}

/// An attribute as it would be written in a doc comment, without the `---`.
pub fn format_attribute(attribute: &Attribute) -> String {
    let head = match attribute {
        Attribute::Class(a) => format!("@class {}", a.name),
        Attribute::Table(a) => format!("@table {}", a.name.join(".")),
        Attribute::Enum(a) => format!("@enum {}", a.name.join(".")),
        Attribute::Field(a) => format!("@field {}", typed_name(a)),
        Attribute::Global(a) => format!("@global {}", typed_name(a)),
        Attribute::Function(a) => {
            let separator = if a.is_method { ":" } else { "." };
            match a.name.split_last() {
                Some((last, tables)) if !tables.is_empty() => {
                    format!("@function {}{}{}", tables.join("."), separator, last)
                }
                _ => format!("@function {}", a.name.join(".")),
            }
        }
        Attribute::Param(a) => format!("@param {}", a.name),
        Attribute::Other(a) => format!("@{}", a.tag),
    };
    let text = format!("{}{}", head, spaced(attribute.description()));
    text.trim_end().to_string()
}

fn typed_name(field: &FieldAttribute) -> String {
    match &field.ty {
        Some(ty) => format!("{} {}", field.name, ty),
        None => field.name.to_string(),
    }
}

/// `[<a href="..." target="_blank">source</a>]` pointing at the doc's lines.
pub fn source_link(repo_url: &str, path: &str, start: Position, end: Position) -> String {
    format!(
        "[<a href=\"{}\" target=\"_blank\">source</a>]",
        source_url(repo_url, path, start, end)
    )
}

pub fn source_url(repo_url: &str, path: &str, start: Position, end: Position) -> String {
    let path = path.replace('\\', "/");
    format!(
        "{}/{}#L{}-L{}",
        repo_url.trim_end_matches('/'),
        path.trim_start_matches('/'),
        start.line,
        end.line
    )
}

/// Prepend the generated-file header to a formatted body.
pub fn add_header(body: &str, sources: &[String]) -> String {
    let mut lines = vec![
        "---!!! DO NOT MANUALLY EDIT THIS FILE !!!".to_string(),
        format!(
            "---Generated by {} {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ),
        "---".to_string(),
    ];
    match sources {
        [] => {}
        [source] => {
            lines.push(format!("---Source: {}", source));
            lines.push("---".to_string());
        }
        _ => {
            lines.push("---Sources:".to_string());
            lines.extend(sources.iter().map(|s| format!("--- - {}", s)));
            lines.push("---".to_string());
        }
    }
    lines.push("---@meta".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    if !body.is_empty() {
        out.push('\n');
        out.push_str(body);
        out.push('\n');
    }
    trim_trailing_whitespace(&out)
}

pub fn trim_trailing_whitespace(text: &str) -> String {
    RE_TRAILING_WS.replace_all(text, "").into_owned()
}
