//! Lua type expressions, parsed only far enough to print them back out.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct LuaType {
    pub kind: LuaTypeKind,
    /// Rendered as a trailing `?`.
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LuaTypeKind {
    /// Number, quoted string, `true`, `false` or `nil`.
    Literal(String),
    /// `string`, `Foo.Bar`, `table<K, V>`.
    Named { name: String, generics: Vec<LuaType> },
    Array(Box<LuaType>),
    Union {
        types: Vec<LuaType>,
        parenthesized: bool,
    },
    Tuple(Vec<LuaType>),
    /// `{ [K]: V }`
    Dictionary { key: Box<LuaType>, value: Box<LuaType> },
    /// `{ a: A, b: B }`
    Table(Vec<(String, LuaType)>),
    /// `fun(a: A, b): R`
    Function {
        params: Vec<(String, Option<LuaType>)>,
        returns: Option<Box<LuaType>>,
    },
}

impl LuaType {
    pub fn new(kind: LuaTypeKind) -> Self {
        Self {
            kind,
            optional: false,
        }
    }

    pub fn named(name: &str) -> Self {
        Self::new(LuaTypeKind::Named {
            name: name.to_string(),
            generics: Vec::new(),
        })
    }

    pub fn literal(value: &str) -> Self {
        Self::new(LuaTypeKind::Literal(value.to_string()))
    }

    /// The literal value when this is a non-optional literal type.
    pub fn literal_value(&self) -> Option<&str> {
        match &self.kind {
            LuaTypeKind::Literal(value) if !self.optional => Some(value),
            _ => None,
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, types: &[LuaType], sep: &str) -> fmt::Result {
    for (i, t) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", t)?;
    }
    Ok(())
}

impl fmt::Display for LuaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LuaTypeKind::Literal(value) => f.write_str(value)?,
            LuaTypeKind::Named { name, generics } => {
                f.write_str(name)?;
                if !generics.is_empty() {
                    f.write_str("<")?;
                    join(f, generics, ", ")?;
                    f.write_str(">")?;
                }
            }
            LuaTypeKind::Array(inner) => write!(f, "{}[]", inner)?,
            LuaTypeKind::Union {
                types,
                parenthesized,
            } => {
                if *parenthesized {
                    f.write_str("(")?;
                }
                join(f, types, "|")?;
                if *parenthesized {
                    f.write_str(")")?;
                }
            }
            LuaTypeKind::Tuple(types) => {
                f.write_str("[")?;
                join(f, types, ", ")?;
                f.write_str("]")?;
            }
            LuaTypeKind::Dictionary { key, value } => write!(f, "{{ [{}]: {} }}", key, value)?,
            LuaTypeKind::Table(fields) if fields.is_empty() => f.write_str("{}")?,
            LuaTypeKind::Table(fields) => {
                f.write_str("{ ")?;
                for (i, (name, t)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", name, t)?;
                }
                f.write_str(" }")?;
            }
            LuaTypeKind::Function { params, returns } => {
                f.write_str("fun(")?;
                for (i, (name, t)) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match t {
                        Some(t) => write!(f, "{}: {}", name, t)?,
                        None => f.write_str(name)?,
                    }
                }
                f.write_str(")")?;
                if let Some(returns) = returns {
                    write!(f, ": {}", returns)?;
                }
            }
        }
        if self.optional {
            f.write_str("?")?;
        }
        Ok(())
    }
}
