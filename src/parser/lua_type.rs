//! Recursive-descent parser for Lua type expressions.
//!
//! Inside brackets whitespace is free. At the top level whitespace is only
//! accepted around `|`, and doing so is reported as ambiguous, because the
//! text after the space could equally be the start of the description.

use crate::lua_type::{LuaType, LuaTypeKind};
use regex::Regex;
use std::sync::LazyLock;

static RE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*").unwrap()
});

static RE_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[A-Za-z_][A-Za-z0-9_]*|\.\.\.)").unwrap());

static RE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(?:0[xX][0-9a-fA-F]+|[0-9]+(?:\.[0-9]+)?(?:[eE][-+]?[0-9]+)?)").unwrap()
});

/// A type parsed from the front of some text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedType {
    pub ty: LuaType,
    /// Bytes consumed.
    pub len: usize,
    /// Another split between type and description was also valid.
    pub ambiguous: bool,
}

/// Parse the longest type expression at the start of `input`.
pub fn parse_type(input: &str) -> Option<ParsedType> {
    let mut parser = TypeParser {
        src: input,
        pos: 0,
        ambiguous: false,
    };
    let ty = parser.union(0)?;
    Some(ParsedType {
        ty,
        len: parser.pos,
        ambiguous: parser.ambiguous,
    })
}

struct TypeParser<'a> {
    src: &'a str,
    pos: usize,
    ambiguous: bool,
}

impl<'a> TypeParser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, s: &str) -> Option<()> {
        self.eat(s).then_some(())
    }

    /// Blanks only at the top level, any whitespace inside brackets.
    fn space(&mut self, depth: usize) {
        let rest = self.rest();
        let trimmed = if depth == 0 {
            rest.trim_start_matches([' ', '\t'])
        } else {
            rest.trim_start()
        };
        self.pos += rest.len() - trimmed.len();
    }

    fn regex(&mut self, re: &Regex) -> Option<&'a str> {
        let rest = self.rest();
        let m = re.find(rest)?;
        self.pos += m.end();
        Some(&rest[..m.end()])
    }

    fn union(&mut self, depth: usize) -> Option<LuaType> {
        let first = self.postfix(depth)?;
        let mut types = vec![first];
        loop {
            let before = self.pos;
            self.space(depth);
            let mut spaced = self.pos > before;
            if !self.eat("|") {
                self.pos = before;
                break;
            }
            let after_bar = self.pos;
            self.space(depth);
            spaced |= self.pos > after_bar;
            match self.postfix(depth) {
                Some(t) => {
                    if spaced && depth == 0 {
                        self.ambiguous = true;
                    }
                    types.push(t);
                }
                None => {
                    self.pos = before;
                    break;
                }
            }
        }
        if types.len() == 1 {
            types.pop()
        } else {
            Some(LuaType::new(LuaTypeKind::Union {
                types,
                parenthesized: false,
            }))
        }
    }

    fn postfix(&mut self, depth: usize) -> Option<LuaType> {
        let mut ty = self.primary(depth)?;
        loop {
            if self.eat("[]") {
                ty = LuaType::new(LuaTypeKind::Array(Box::new(ty)));
            } else if self.eat("?") {
                ty.optional = true;
            } else {
                return Some(ty);
            }
        }
    }

    fn primary(&mut self, depth: usize) -> Option<LuaType> {
        match self.peek()? {
            b'(' => self.parenthesized(depth),
            b'[' => {
                self.pos += 1;
                let types = self.list(depth, "]")?;
                Some(LuaType::new(LuaTypeKind::Tuple(types)))
            }
            b'{' => self.braced(depth),
            b'"' | b'\'' => self.string_literal(),
            b'-' | b'0'..=b'9' => {
                let number = self.regex(&RE_NUMBER)?;
                Some(LuaType::literal(number))
            }
            _ => self.named(depth),
        }
    }

    fn parenthesized(&mut self, depth: usize) -> Option<LuaType> {
        self.expect("(")?;
        self.space(depth + 1);
        let inner = self.union(depth + 1)?;
        self.space(depth + 1);
        self.expect(")")?;
        let kind = match inner.kind {
            LuaTypeKind::Union {
                types,
                parenthesized: false,
            } if !inner.optional => LuaTypeKind::Union {
                types,
                parenthesized: true,
            },
            kind => LuaTypeKind::Union {
                types: vec![LuaType {
                    kind,
                    optional: inner.optional,
                }],
                parenthesized: true,
            },
        };
        Some(LuaType::new(kind))
    }

    /// Comma separated types up to `close`; the opener is already consumed.
    fn list(&mut self, depth: usize, close: &str) -> Option<Vec<LuaType>> {
        let mut types = Vec::new();
        self.space(depth + 1);
        if self.eat(close) {
            return Some(types);
        }
        loop {
            types.push(self.union(depth + 1)?);
            self.space(depth + 1);
            if self.eat(",") {
                self.space(depth + 1);
                continue;
            }
            self.expect(close)?;
            return Some(types);
        }
    }

    fn braced(&mut self, depth: usize) -> Option<LuaType> {
        let inner = depth + 1;
        self.expect("{")?;
        self.space(inner);

        if self.eat("[") {
            self.space(inner);
            let key = self.union(inner)?;
            self.space(inner);
            self.expect("]")?;
            self.space(inner);
            self.expect(":")?;
            self.space(inner);
            let value = self.union(inner)?;
            self.space(inner);
            self.expect("}")?;
            return Some(LuaType::new(LuaTypeKind::Dictionary {
                key: Box::new(key),
                value: Box::new(value),
            }));
        }

        let mut fields = Vec::new();
        if self.eat("}") {
            return Some(LuaType::new(LuaTypeKind::Table(fields)));
        }
        loop {
            let name = self.regex(&RE_IDENT)?.to_string();
            self.space(inner);
            self.expect(":")?;
            self.space(inner);
            fields.push((name, self.union(inner)?));
            self.space(inner);
            if self.eat(",") {
                self.space(inner);
                continue;
            }
            self.expect("}")?;
            return Some(LuaType::new(LuaTypeKind::Table(fields)));
        }
    }

    fn string_literal(&mut self) -> Option<LuaType> {
        let rest = self.rest();
        let quote = rest.chars().next()?;
        let mut escaped = false;
        for (offset, c) in rest.char_indices().skip(1) {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                let end = offset + c.len_utf8();
                self.pos += end;
                return Some(LuaType::literal(&rest[..end]));
            }
        }
        None
    }

    fn named(&mut self, depth: usize) -> Option<LuaType> {
        let name = self.regex(&RE_NAME)?;
        match name {
            "true" | "false" | "nil" => return Some(LuaType::literal(name)),
            "fun" if self.peek() == Some(b'(') => return self.function(depth),
            _ => {}
        }
        let generics = if self.eat("<") {
            self.list(depth, ">")?
        } else {
            Vec::new()
        };
        Some(LuaType::new(LuaTypeKind::Named {
            name: name.to_string(),
            generics,
        }))
    }

    fn function(&mut self, depth: usize) -> Option<LuaType> {
        let inner = depth + 1;
        self.expect("(")?;
        self.space(inner);
        let mut params = Vec::new();
        if !self.eat(")") {
            loop {
                let name = self.regex(&RE_IDENT)?.to_string();
                self.space(inner);
                let ty = if self.eat(":") {
                    self.space(inner);
                    Some(self.union(inner)?)
                } else {
                    None
                };
                params.push((name, ty));
                self.space(inner);
                if self.eat(",") {
                    self.space(inner);
                    continue;
                }
                self.expect(")")?;
                break;
            }
        }

        let before = self.pos;
        let returns = if self.eat(":") {
            self.space(depth);
            match self.postfix(depth) {
                Some(t) => Some(Box::new(t)),
                None => {
                    self.pos = before;
                    None
                }
            }
        } else {
            None
        };
        Some(LuaType::new(LuaTypeKind::Function { params, returns }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reformat(input: &str) -> (String, usize, bool) {
        let parsed = parse_type(input).unwrap();
        (parsed.ty.to_string(), parsed.len, parsed.ambiguous)
    }

    #[test]
    fn simple_names_and_literals() {
        assert_eq!(reformat("integer This is foo."), ("integer".into(), 7, false));
        assert_eq!(reformat("Foo.Bar rest").0, "Foo.Bar");
        assert_eq!(parse_type("5").unwrap().ty, LuaType::literal("5"));
        assert_eq!(parse_type("-1.5e3").unwrap().ty, LuaType::literal("-1.5e3"));
        assert_eq!(parse_type("\"world\" World.").unwrap().ty, LuaType::literal("\"world\""));
        assert_eq!(parse_type("true").unwrap().ty, LuaType::literal("true"));
    }

    #[test]
    fn spaced_union_is_ambiguous() {
        assert_eq!(reformat("Bar | Baz Bar or baz?"), ("Bar|Baz".into(), 9, true));
        assert_eq!(reformat("Bar|Baz"), ("Bar|Baz".into(), 7, false));
    }

    #[test]
    fn generics_allow_spaces_without_ambiguity() {
        assert_eq!(reformat("Foo<Bar | Baz> A generic."), ("Foo<Bar|Baz>".into(), 14, false));
        assert_eq!(reformat("table<string, number>").0, "table<string, number>");
    }

    #[test]
    fn parenthesized_optional_union() {
        let (text, len, ambiguous) = reformat("(integer | table<string, boolean> | Foo)?");
        assert_eq!(text, "(integer|table<string, boolean>|Foo)?");
        assert_eq!(len, 41);
        assert!(!ambiguous);
    }

    #[test]
    fn arrays_tuples_dictionaries_tables() {
        assert_eq!(reformat("string[]?").0, "string[]?");
        assert_eq!(reformat("(A|B)[]").0, "(A|B)[]");
        assert_eq!(reformat("[integer, string]").0, "[integer, string]");
        assert_eq!(reformat("{ [string]: T|T[] }").0, "{ [string]: T|T[] }");
        assert_eq!(reformat("{x:number,y:number}").0, "{ x: number, y: number }");
        assert_eq!(reformat("{}").0, "{}");
    }

    #[test]
    fn function_types() {
        assert_eq!(
            reformat("fun(a: integer, ...): boolean rest").0,
            "fun(a: integer, ...): boolean"
        );
        assert_eq!(reformat("fun()").0, "fun()");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_type("{ broken").is_none());
        assert!(parse_type("<>").is_none());
        assert!(parse_type("").is_none());
    }

    #[test]
    fn dangling_bar_is_not_consumed() {
        assert_eq!(reformat("Foo | "), ("Foo".into(), 3, false));
    }
}
