//! Minimal S-expression reader for KiCad text formats.
//!
//! KiCad files are a single parenthesised expression made of bare symbols
//! (`pin`, `input`, `1.27`), double-quoted strings with backslash escapes,
//! and nested lists.

use std::iter::Peekable;
use std::str::CharIndices;

use super::error::{KicadError, KicadResult};

/// Deepest list nesting accepted. Symbol libraries stay well below this.
pub const MAX_DEPTH: usize = 512;

/// A parsed S-expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sexpr {
    /// Bare token.
    Symbol(String),
    /// Quoted string, with escapes resolved.
    String(String),
    /// Parenthesised list.
    List(Vec<Sexpr>),
}

impl Sexpr {
    /// Returns the text of a symbol or string node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Symbol(s) | Self::String(s) => Some(s),
            Self::List(_) => None,
        }
    }

    /// Returns the children of a list node.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the leading bare symbol of a list, e.g. `pin` for `(pin ...)`.
    #[must_use]
    pub fn head(&self) -> Option<&str> {
        match self.as_list()?.first()? {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the text of the list element at `index`.
    #[must_use]
    pub fn text_at(&self, index: usize) -> Option<&str> {
        self.as_list()?.get(index)?.as_text()
    }

    /// Iterates over child lists whose head is `key`.
    pub fn children<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.as_list()
            .unwrap_or_default()
            .iter()
            .filter(move |item| item.head() == Some(key))
    }

    /// Returns the first child list whose head is `key`.
    #[must_use]
    pub fn child(&self, key: &str) -> Option<&Self> {
        self.as_list()?.iter().find(|item| item.head() == Some(key))
    }
}

/// Parses one complete S-expression document.
///
/// # Errors
///
/// Returns an error on unbalanced parentheses, unterminated strings, an empty
/// document, lists nested deeper than [`MAX_DEPTH`], or trailing content
/// after the root expression.
pub fn parse(input: &str) -> KicadResult<Sexpr> {
    let mut parser = Parser {
        chars: input.char_indices().peekable(),
        len: input.len(),
    };

    parser.skip_whitespace();
    let root = parser.parse_expr(0)?;
    parser.skip_whitespace();

    if let Some(&(offset, _)) = parser.chars.peek() {
        return Err(KicadError::parse_error(
            offset,
            "unexpected content after root expression",
        ));
    }

    Ok(root)
}

struct Parser<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: usize,
}

impl Parser<'_> {
    fn parse_expr(&mut self, depth: usize) -> KicadResult<Sexpr> {
        match self.chars.peek().copied() {
            None => Err(KicadError::parse_error(self.len, "unexpected end of input")),
            Some((offset, '(')) if depth >= MAX_DEPTH => {
                Err(KicadError::parse_error(offset, "nesting too deep"))
            }
            Some((_, '(')) => self.parse_list(depth + 1),
            Some((offset, ')')) => Err(KicadError::parse_error(offset, "unexpected ')'")),
            Some((_, '"')) => self.parse_string(),
            Some(_) => Ok(self.parse_symbol()),
        }
    }

    fn parse_list(&mut self, depth: usize) -> KicadResult<Sexpr> {
        // Consume '('
        let (open, _) = self.chars.next().unwrap_or((self.len, '('));
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            match self.chars.peek().map(|&(_, c)| c) {
                None => {
                    return Err(KicadError::parse_error(
                        open,
                        "unclosed '(' at end of input",
                    ))
                }
                Some(')') => {
                    self.chars.next();
                    return Ok(Sexpr::List(items));
                }
                Some(_) => items.push(self.parse_expr(depth)?),
            }
        }
    }

    fn parse_string(&mut self) -> KicadResult<Sexpr> {
        // Consume opening quote
        let (start, _) = self.chars.next().unwrap_or((self.len, '"'));
        let mut s = String::new();

        while let Some((_, c)) = self.chars.next() {
            match c {
                '"' => return Ok(Sexpr::String(s)),
                '\\' => match self.chars.next() {
                    Some((_, 'n')) => s.push('\n'),
                    Some((_, 't')) => s.push('\t'),
                    Some((_, 'r')) => s.push('\r'),
                    Some((_, other)) => s.push(other),
                    None => break,
                },
                _ => s.push(c),
            }
        }

        Err(KicadError::parse_error(start, "unterminated string"))
    }

    fn parse_symbol(&mut self) -> Sexpr {
        let mut s = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_whitespace() || c == '(' || c == ')' || c == '"' {
                break;
            }
            s.push(c);
            self.chars.next();
        }
        Sexpr::Symbol(s)
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nested() {
        let sexpr = parse(r#"(pin input line (at 0 0 0) (name "A" (effects)))"#).unwrap();
        assert_eq!(sexpr.head(), Some("pin"));
        assert_eq!(sexpr.text_at(1), Some("input"));
        assert_eq!(sexpr.child("name").and_then(|n| n.text_at(1)), Some("A"));
        assert_eq!(sexpr.children("at").count(), 1);
    }

    #[test]
    fn string_escapes() {
        let sexpr = parse(r#"(property "Description" "say \"hi\"\nthere \\ ok")"#).unwrap();
        assert_eq!(sexpr.text_at(2), Some("say \"hi\"\nthere \\ ok"));
    }

    #[test]
    fn quoted_and_bare_text_both_readable() {
        let sexpr = parse(r#"(extends "Parent") "#).unwrap();
        assert_eq!(sexpr.text_at(1), Some("Parent"));
        let sexpr = parse("(extends Parent)").unwrap();
        assert_eq!(sexpr.text_at(1), Some("Parent"));
    }

    #[test]
    fn empty_string_is_a_value() {
        let sexpr = parse(r#"(name "")"#).unwrap();
        assert_eq!(sexpr.text_at(1), Some(""));
    }

    #[test]
    fn unbalanced_rejected() {
        assert!(matches!(
            parse("(a (b c)"),
            Err(KicadError::ParseError { offset: 0, .. })
        ));
        assert!(matches!(
            parse("(a))"),
            Err(KicadError::ParseError { offset: 3, .. })
        ));
        assert!(parse("").is_err());
        assert!(parse(r#"(a "open)"#).is_err());
    }

    #[test]
    fn nesting_limit() {
        let at_limit = format!("{}{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(parse(&at_limit).is_ok());

        let too_deep = format!(
            "(kicad_symbol_lib {}{})",
            "(".repeat(200_000),
            ")".repeat(200_000)
        );
        assert!(matches!(
            parse(&too_deep),
            Err(KicadError::ParseError { offset, .. }) if offset == 18 + MAX_DEPTH - 1
        ));
    }
}
