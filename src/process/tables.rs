//! Implicit tables for classes and enums, and merging docs by table name.

use crate::model::*;
use crate::render::lua::join_lines;
use std::collections::HashMap;

/// Give every class or enum without a `@table` one named after it.
///
/// A class's table is local, an enum's is not.
pub fn synthesize_tables(docs: Vec<Doc>) -> Vec<Doc> {
    docs.into_iter()
        .map(|mut doc| {
            if doc.has(AttributeKind::Table) {
                return doc;
            }
            let table = doc.attributes.iter().find_map(|a| match a {
                Attribute::Class(class) => Some(TableAttribute {
                    name: class.table_name(),
                    is_local: true,
                    description: String::new(),
                }),
                Attribute::Enum(enumeration) => Some(TableAttribute {
                    name: enumeration.name.clone(),
                    is_local: false,
                    description: String::new(),
                }),
                _ => None,
            });
            if let Some(table) = table {
                doc.attributes.push(Attribute::Table(table));
            }
            doc
        })
        .collect()
}

/// Fold every doc declaring an already-seen table into the first one.
///
/// The donor's attributes, minus its `@table`, are appended to the survivor.
/// Descriptions are joined in order: survivor, donor, donor's `@table` text.
pub fn merge_tables(docs: Vec<Doc>) -> Vec<Doc> {
    let mut result: Vec<Doc> = Vec::with_capacity(docs.len());
    let mut by_table: HashMap<String, usize> = HashMap::new();

    for mut doc in docs {
        let Some(key) = doc.table().map(|t| t.name.join(".")) else {
            result.push(doc);
            continue;
        };
        let Some(index) = by_table.get(&key).copied() else {
            by_table.insert(key, result.len());
            result.push(doc);
            continue;
        };

        let table = doc
            .attributes
            .iter()
            .position(|a| a.kind() == AttributeKind::Table)
            .map(|i| doc.attributes.remove(i));

        let survivor = &mut result[index];
        survivor.description = join_lines(&survivor.description, &doc.description);
        if let Some(table) = table {
            survivor.description = join_lines(&survivor.description, table.description());
        }
        survivor.attributes.append(&mut doc.attributes);
        tracing::debug!(table = %key, at = %doc.start, "merged doc into table");
    }

    result
}
