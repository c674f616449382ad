//! Enum handling: folding stray enum fields and collapsing merged `@enum`s.

use crate::model::*;
use crate::render::lua::join_lines;
use std::collections::HashSet;

/// Move fields written as `Enum.KEY` on a table-less doc into `Enum`'s table.
///
/// Each enum's fields are split off into a doc of their own, with the prefix
/// stripped and a `@table Enum` attached, so
/// [`merge_tables`](super::tables::merge_tables) folds them into the enum.
/// The doc's own description moves onto the first folded field. Fields that
/// name no enum stay behind as standalone assignments.
pub fn fold_enum_fields(docs: Vec<Doc>) -> Vec<Doc> {
    let enums: HashSet<String> = docs
        .iter()
        .flat_map(|doc| doc.attributes.iter())
        .filter_map(|a| match a {
            Attribute::Enum(e) => Some(e.name.join(".")),
            _ => None,
        })
        .collect();
    if enums.is_empty() {
        return docs;
    }

    docs.into_iter()
        .flat_map(|doc| {
            if doc.has(AttributeKind::Table) {
                vec![doc]
            } else {
                split_doc(doc, &enums)
            }
        })
        .collect()
}

fn split_doc(mut doc: Doc, enums: &HashSet<String>) -> Vec<Doc> {
    let mut groups: Vec<(Vec<String>, Vec<Attribute>)> = Vec::new();
    let mut kept = Vec::with_capacity(doc.attributes.len());

    for attribute in std::mem::take(&mut doc.attributes) {
        let Attribute::Field(mut field) = attribute else {
            kept.push(attribute);
            continue;
        };
        let Some(prefix) = enum_prefix(&field.name, enums) else {
            kept.push(Attribute::Field(field));
            continue;
        };
        if groups.is_empty() {
            field.description = join_lines(&doc.description, &field.description);
            doc.description.clear();
        }
        field.name.keys.drain(..prefix.len());
        match groups.iter_mut().find(|(name, _)| *name == prefix) {
            Some((_, fields)) => fields.push(Attribute::Field(field)),
            None => groups.push((prefix, vec![Attribute::Field(field)])),
        }
    }
    doc.attributes = kept;

    if groups.is_empty() {
        return vec![doc];
    }

    let donors: Vec<Doc> = groups
        .into_iter()
        .map(|(name, mut attributes)| {
            tracing::debug!(table = %name.join("."), at = %doc.start, "folded fields into enum");
            attributes.push(Attribute::Table(TableAttribute {
                name,
                is_local: false,
                description: String::new(),
            }));
            Doc {
                attributes,
                path: doc.path.clone(),
                start: doc.start,
                end: doc.end,
                ..Default::default()
            }
        })
        .collect();

    let mut result = Vec::with_capacity(donors.len() + 1);
    if !doc.is_empty() {
        result.push(doc);
    }
    result.extend(donors);
    result
}

/// Longest run of leading names that is a known enum, leaving at least one key.
fn enum_prefix(path: &FieldPath, enums: &HashSet<String>) -> Option<Vec<String>> {
    let names = path.leading_names();
    let longest = names.len().min(path.keys.len().saturating_sub(1));
    (1..=longest).rev().find_map(|len| {
        let prefix = &names[..len];
        enums
            .contains(&prefix.join("."))
            .then(|| prefix.iter().map(|n| n.to_string()).collect())
    })
}

/// Collapse several `@enum` attributes on one doc into the first.
pub fn merge_enum_attributes(docs: Vec<Doc>) -> Vec<Doc> {
    docs.into_iter()
        .map(|mut doc| {
            let Some(first) = doc.attributes.iter().position(|a| a.kind() == AttributeKind::Enum)
            else {
                return doc;
            };
            let enums = doc.take(AttributeKind::Enum);
            let mut enums = enums.into_iter().filter_map(|a| match a {
                Attribute::Enum(e) => Some(e),
                _ => None,
            });
            let Some(mut merged) = enums.next() else {
                return doc;
            };
            for rest in enums {
                merged.description = join_lines(&merged.description, &rest.description);
            }
            doc.attributes.insert(first, Attribute::Enum(merged));
            doc
        })
        .collect()
}
