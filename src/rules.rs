//! Declaration generators keyed by attribute kind.
//!
//! Each rule may consume its attribute, fold text into the doc description
//! and push one Lua declaration onto `Doc::lua`.

use crate::diagnostics::{Diagnostics, Warning};
use crate::model::*;
use crate::render::format_attribute;
use crate::render::lua::{format_field, format_method_name, format_path, join_lines};

/// What a rule knows about the doc before any rule ran.
struct RuleContext {
    had_table: bool,
}

type Rule = fn(&Attribute, &mut Doc, &RuleContext);

fn rule_for(kind: AttributeKind) -> Option<Rule> {
    match kind {
        AttributeKind::Class => Some(class_rule),
        AttributeKind::Table => Some(table_rule),
        AttributeKind::Enum => Some(enum_rule),
        AttributeKind::Function => Some(function_rule),
        AttributeKind::Global => Some(global_rule),
        _ => None,
    }
}

/// Run the rules over every doc, warning about docs that generate more than
/// one declaration. The first declaration is the one that gets printed.
pub fn apply_rules(docs: Vec<Doc>, diagnostics: &mut Diagnostics) -> Vec<Doc> {
    docs.into_iter()
        .map(|mut doc| {
            apply(&mut doc, diagnostics);
            doc
        })
        .collect()
}

fn apply(doc: &mut Doc, diagnostics: &mut Diagnostics) {
    let attributes = doc.attributes.clone();
    let context = RuleContext {
        had_table: doc.has(AttributeKind::Table),
    };
    for attribute in &attributes {
        if let Some(rule) = rule_for(attribute.kind()) {
            rule(attribute, doc, &context);
        }
    }

    if doc.lua.len() > 1 {
        diagnostics.warn(Warning::ConflictingDeclarations {
            path: doc.path.clone(),
            at: doc.start,
            attributes: attributes.iter().map(format_attribute).collect(),
            lua: doc.lua.clone(),
        });
    }
}

/// `name = { fields }`, or `local name = { ... }` for a single-segment local.
///
/// A class's fields stay as `@field` annotations instead of being inlined.
fn table_rule(attribute: &Attribute, doc: &mut Doc, _: &RuleContext) {
    let Attribute::Table(table) = attribute else {
        return;
    };
    doc.remove(attribute);
    doc.description = join_lines(&doc.description, &table.description);

    let fields = if doc.has(AttributeKind::Class) {
        Vec::new()
    } else {
        doc.take_fields()
    };
    let body = if fields.is_empty() {
        String::new()
    } else {
        let rendered: Vec<String> = fields.iter().map(|f| format_field(f, "\t")).collect();
        format!("\n{}\n", rendered.join(",\n\n"))
    };

    let name = format_path(&table.name);
    let local = if table.is_local && table.name.len() == 1 {
        "local "
    } else {
        ""
    };
    doc.lua.push(format!("{}{} = {{{}}}", local, name, body));
}

/// `function Table.name(a, b) end`, parameters taken from `@param` in order.
fn function_rule(attribute: &Attribute, doc: &mut Doc, _: &RuleContext) {
    let Attribute::Function(function) = attribute else {
        return;
    };
    doc.remove(attribute);

    let params: Vec<&str> = doc
        .attributes
        .iter()
        .filter_map(|a| match a {
            Attribute::Param(p) => Some(p.name.as_str()),
            _ => None,
        })
        .collect();
    let params = params.join(", ");

    doc.description = join_lines(&doc.description, &function.description);

    let name = if function.is_method {
        format_method_name(&function.name)
    } else {
        format_path(&function.name)
    };
    doc.lua.push(format!("function {}({}) end", name, params));
}

/// Declares the class table when no `@table` survived processing.
fn class_rule(attribute: &Attribute, doc: &mut Doc, context: &RuleContext) {
    let Attribute::Class(class) = attribute else {
        return;
    };
    if context.had_table {
        return;
    }
    let name = class.table_name();
    let local = if name.len() == 1 { "local " } else { "" };
    doc.lua.push(format!("{}{} = {{}}", local, format_path(&name)));
}

/// Declares the enum table when no `@table` survived processing.
fn enum_rule(attribute: &Attribute, doc: &mut Doc, context: &RuleContext) {
    let Attribute::Enum(enumeration) = attribute else {
        return;
    };
    if context.had_table {
        return;
    }
    doc.lua.push(format!("{} = {{}}", format_path(&enumeration.name)));
}

/// A `@global` that was never promoted renders like a standalone field.
fn global_rule(attribute: &Attribute, doc: &mut Doc, _: &RuleContext) {
    let Attribute::Global(field) = attribute else {
        return;
    };
    doc.remove(attribute);
    doc.lua.push(format_field(field, ""));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lua_type::LuaType;

    fn run(doc: Doc) -> (Doc, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let mut docs = apply_rules(vec![doc], &mut diagnostics);
        (docs.remove(0), diagnostics)
    }

    fn table(name: &[&str], is_local: bool) -> Attribute {
        Attribute::Table(TableAttribute {
            name: name.iter().map(|s| s.to_string()).collect(),
            is_local,
            description: String::new(),
        })
    }

    fn field(name: &str, ty: LuaType, description: &str) -> Attribute {
        Attribute::Field(FieldAttribute {
            name: FieldPath::named(name),
            ty: Some(ty),
            description: description.to_string(),
        })
    }

    fn param(name: &str) -> Attribute {
        Attribute::Param(ParamAttribute {
            name: name.to_string(),
            description: " number\n".to_string(),
        })
    }

    #[test]
    fn table_inlines_fields() {
        let (doc, diagnostics) = run(Doc {
            description: "My table.\n".to_string(),
            attributes: vec![
                field("foo", LuaType::named("integer"), " This is foo.\n"),
                field("bar", LuaType::named("string"), " This is bar.\n"),
                table(&["TheTable"], false),
            ],
            ..Default::default()
        });
        assert!(diagnostics.is_empty());
        assert!(doc.attributes.is_empty());
        assert_eq!(
            doc.lua,
            vec![
                "TheTable = {\n\t---@type integer This is foo.\n\tfoo = nil,\n\n\
                 \t---@type string This is bar.\n\tbar = nil\n}"
                    .to_string()
            ]
        );
    }

    #[test]
    fn local_only_for_single_segment() {
        let (doc, _) = run(Doc {
            attributes: vec![table(&["Foo", "Bar"], true)],
            ..Default::default()
        });
        assert_eq!(doc.lua, vec!["Foo.Bar = {}".to_string()]);

        let (doc, _) = run(Doc {
            attributes: vec![table(&["Foo"], true)],
            ..Default::default()
        });
        assert_eq!(doc.lua, vec!["local Foo = {}".to_string()]);
    }

    #[test]
    fn keyword_keys_are_escaped() {
        let (doc, _) = run(Doc {
            attributes: vec![
                field("repeat", LuaType::literal("1"), ""),
                table(&["Loop"], false),
            ],
            ..Default::default()
        });
        assert_eq!(doc.lua, vec!["Loop = {\n\t[\"repeat\"] = 1\n}".to_string()]);
    }

    #[test]
    fn class_keeps_fields_as_annotations() {
        let (doc, _) = run(Doc {
            attributes: vec![
                Attribute::Class(ClassAttribute {
                    name: "Car".to_string(),
                    description: "\n".to_string(),
                }),
                field("doorCount", LuaType::named("integer"), "\n"),
                table(&["Car"], true),
            ],
            ..Default::default()
        });
        assert_eq!(doc.lua, vec!["local Car = {}".to_string()]);
        assert_eq!(doc.attributes.len(), 2);
    }

    #[test]
    fn function_collects_params() {
        let (doc, _) = run(Doc {
            description: "Called on ping.\n".to_string(),
            attributes: vec![
                Attribute::Function(FunctionAttribute {
                    name: vec!["Widget".to_string(), "Ping".to_string()],
                    is_method: true,
                    description: "\n\nSee `seismicSignature`.\n\n".to_string(),
                }),
                param("x"),
                param("y"),
            ],
            ..Default::default()
        });
        assert_eq!(doc.lua, vec!["function Widget:Ping(x, y) end".to_string()]);
        assert_eq!(doc.description, "Called on ping.\n\nSee `seismicSignature`.\n\n");
        assert_eq!(doc.attributes.len(), 2);
    }

    #[test]
    fn class_and_enum_fallbacks() {
        let (doc, _) = run(Doc {
            attributes: vec![Attribute::Class(ClassAttribute {
                name: "Pair<K, V>".to_string(),
                description: String::new(),
            })],
            ..Default::default()
        });
        assert_eq!(doc.lua, vec!["local Pair = {}".to_string()]);

        let (doc, _) = run(Doc {
            attributes: vec![Attribute::Enum(EnumAttribute {
                name: vec!["Numbers".to_string()],
                description: String::new(),
            })],
            ..Default::default()
        });
        assert_eq!(doc.lua, vec!["Numbers = {}".to_string()]);
    }

    #[test]
    fn unpromoted_global_renders_as_field() {
        let (doc, _) = run(Doc {
            attributes: vec![Attribute::Global(FieldAttribute {
                name: FieldPath::named("foo"),
                ty: Some(LuaType::named("Foo")),
                description: " Cool.\n".to_string(),
            })],
            ..Default::default()
        });
        assert_eq!(doc.lua, vec!["---@type Foo Cool.\nfoo = nil".to_string()]);
        assert!(doc.attributes.is_empty());
    }

    #[test]
    fn conflicting_generators_warn_and_keep_first() {
        let (doc, diagnostics) = run(Doc {
            path: Some("a.cpp".to_string()),
            attributes: vec![
                table(&["Foo"], false),
                Attribute::Function(FunctionAttribute {
                    name: vec!["Bar".to_string()],
                    is_method: false,
                    description: String::new(),
                }),
            ],
            ..Default::default()
        });
        assert_eq!(doc.lua.len(), 2);
        assert_eq!(doc.lua[0], "Foo = {}");
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            &diagnostics.warnings()[0],
            Warning::ConflictingDeclarations { attributes, .. } if attributes.len() == 2
        ));
    }
}
