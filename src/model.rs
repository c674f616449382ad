//! Data model shared by every pipeline stage.

use crate::lua_type::LuaType;
use std::fmt;

/// 1-based location in a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One extracted doc comment, decoration stripped and dedented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub start: Position,
    /// Position immediately after the closing marker.
    pub end: Position,
    pub text: String,
}

/// A parsed doc comment, mutated in place by the processors and rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Doc {
    /// Free text before the first attribute.
    pub description: String,
    pub attributes: Vec<Attribute>,
    pub path: Option<String>,
    pub start: Position,
    pub end: Position,
    /// Generated Lua declarations. More than one means conflicting generators.
    pub lua: Vec<String>,
    /// Rendered link to the originating source, set when a repository URL is known.
    pub source_link: Option<String>,
}

impl Doc {
    pub fn has(&self, kind: AttributeKind) -> bool {
        self.attributes.iter().any(|a| a.kind() == kind)
    }

    pub fn table(&self) -> Option<&TableAttribute> {
        self.attributes.iter().find_map(|a| match a {
            Attribute::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Remove every attribute of `kind`, returning them in order.
    pub fn take(&mut self, kind: AttributeKind) -> Vec<Attribute> {
        let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.attributes)
            .into_iter()
            .partition(|a| a.kind() == kind);
        self.attributes = kept;
        taken
    }

    pub fn take_fields(&mut self) -> Vec<FieldAttribute> {
        self.take(AttributeKind::Field)
            .into_iter()
            .filter_map(|a| match a {
                Attribute::Field(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    /// Remove the first attribute equal to `attr`.
    pub fn remove(&mut self, attr: &Attribute) -> Option<Attribute> {
        let index = self.attributes.iter().position(|a| a == attr)?;
        Some(self.attributes.remove(index))
    }

    /// A doc with nothing to print is dropped before formatting.
    pub fn is_empty(&self) -> bool {
        self.lua.is_empty() && self.description.trim().is_empty() && self.attributes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Class,
    Table,
    Enum,
    Field,
    Function,
    Global,
    Param,
    Other,
}

/// A typed `@tag` from a doc comment.
///
/// Every variant keeps the free text following its structured arguments,
/// leading whitespace included, so the tag can be printed back as written.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Class(ClassAttribute),
    Table(TableAttribute),
    Enum(EnumAttribute),
    Field(FieldAttribute),
    Function(FunctionAttribute),
    /// Surface sugar for a field; promoted to `Field` before anything else runs.
    Global(FieldAttribute),
    Param(ParamAttribute),
    /// Unrecognised tag, passed through verbatim.
    Other(OtherAttribute),
}

impl Attribute {
    pub fn kind(&self) -> AttributeKind {
        match self {
            Attribute::Class(_) => AttributeKind::Class,
            Attribute::Table(_) => AttributeKind::Table,
            Attribute::Enum(_) => AttributeKind::Enum,
            Attribute::Field(_) => AttributeKind::Field,
            Attribute::Function(_) => AttributeKind::Function,
            Attribute::Global(_) => AttributeKind::Global,
            Attribute::Param(_) => AttributeKind::Param,
            Attribute::Other(_) => AttributeKind::Other,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Attribute::Class(_) => "class",
            Attribute::Table(_) => "table",
            Attribute::Enum(_) => "enum",
            Attribute::Field(_) => "field",
            Attribute::Function(_) => "function",
            Attribute::Global(_) => "global",
            Attribute::Param(_) => "param",
            Attribute::Other(o) => &o.tag,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Attribute::Class(a) => &a.description,
            Attribute::Table(a) => &a.description,
            Attribute::Enum(a) => &a.description,
            Attribute::Field(a) | Attribute::Global(a) => &a.description,
            Attribute::Function(a) => &a.description,
            Attribute::Param(a) => &a.description,
            Attribute::Other(a) => &a.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassAttribute {
    /// As written, generics included (`UniformParam<T>`).
    pub name: String,
    pub description: String,
}

impl ClassAttribute {
    /// Table path of the class, without generic parameters or an unspaced
    /// base list (`Foo<T>`, `Foo:Bar`).
    pub fn table_name(&self) -> Vec<String> {
        let bare = match self.name.find(['<', ':']) {
            Some(index) => &self.name[..index],
            None => &self.name,
        };
        bare.split('.').map(str::to_string).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAttribute {
    pub name: Vec<String>,
    pub is_local: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumAttribute {
    pub name: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldAttribute {
    pub name: FieldPath,
    /// `None` when the tag carried no type at all.
    pub ty: Option<LuaType>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionAttribute {
    pub name: Vec<String>,
    /// Declared with `:` before the last segment.
    pub is_method: bool,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamAttribute {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherAttribute {
    pub tag: String,
    pub description: String,
}

/// A field slot such as `foo`, `Table.field`, `[1]` or `["hello"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    pub keys: Vec<FieldKey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKey {
    Name(String),
    /// Bracketed key, stored without the brackets (`1`, `"hello"`).
    Index(String),
}

impl FieldPath {
    pub fn named(name: &str) -> Self {
        Self {
            keys: name.split('.').map(|n| FieldKey::Name(n.to_string())).collect(),
        }
    }

    /// Leading plain names, up to the first bracketed key.
    pub fn leading_names(&self) -> Vec<&str> {
        self.keys
            .iter()
            .map_while(|k| match k {
                FieldKey::Name(n) => Some(n.as_str()),
                FieldKey::Index(_) => None,
            })
            .collect()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            match key {
                FieldKey::Name(n) if i == 0 => write!(f, "{}", n)?,
                FieldKey::Name(n) => write!(f, ".{}", n)?,
                FieldKey::Index(raw) => write!(f, "[{}]", raw)?,
            }
        }
        Ok(())
    }
}
