//! Textual syntax for tuples and patterns.
//!
//! # Grammar
//!
//! ```text
//! list     := '(' items? ')' | items?
//! items    := item (',' item)* ','?
//! value    := int | float | string | char | atom | bool | unit | byte
//! slot     := value | type | '_' | '..'
//!
//! int      := '-'? digits                           e.g. 3, -12
//! byte     := digits 'u8'                           e.g. 7u8
//! float    := '-'? digits ('.' digits)? exponent?   e.g. 2.5, 1e20, -1.5e-7
//!           | '-'? 'inf' | 'NaN'
//! exponent := ('e' | 'E') ('+' | '-')? digits       (required without '.')
//! string   := '"' ( escape | char )* '"'
//! char     := '\'' ( escape | char ) '\''
//! escape   := '\\' ( '"' | '\'' | '\\' | 'n' | 'r' | 't' | '0' ) | '\\u{' hex{1,6} '}'
//! atom     := ':' ident                             e.g. :get
//! bool     := 'true' | 'false'
//! unit     := '(' ')'
//! type     := 'int' | 'float' | 'bool' | 'str' | 'char' | 'byte' | 'atom' | 'unit'
//! ```
//!
//! A tuple is a `list` of values; a pattern is a `list` of slots. A bare `()`
//! is the empty list; write `(())` for a one-element tuple holding unit.
//!
//! Literals use the `Debug` spelling of their Rust type, so `Pattern::display`
//! and `AnyTuple::display` output over the built-in types parses back to an
//! equal pattern or tuple. Bytes are the exception: `Debug` prints `7u8` as
//! `7`, which reads back as an `int`. (`NaN` reads back, but never compares
//! equal.)

use std::fmt;

use mbx_pattern::{ExactSlot, Literal, Pattern, PatternSlot};
use mbx_tuple::{AnyTuple, TupleBuilder};
use mbx_types::{Atom, TypeDesc, TypeRegistry};

/// Error produced when parsing tuple or pattern text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    /// Byte offset into the source.
    pub offset: usize,
}

/// What went wrong while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// Expected one thing, found another character (or the end).
    Expected {
        expected: &'static str,
        found: Option<char>,
    },
    /// A string literal was never closed.
    UnterminatedString,
    /// A char literal was not exactly one character between quotes.
    InvalidChar,
    /// An escape sequence other than `\" \\ \n \t`.
    InvalidEscape(char),
    /// A number that does not fit its type.
    InvalidNumber(String),
    /// A bare word that is not a type name or keyword.
    UnknownName(String),
    /// `_`, `..` or a type name where only values are allowed.
    NotAValue(String),
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SyntaxErrorKind::Expected {
                expected,
                found: Some(c),
            } => write!(f, "expected {expected}, found `{c}`")?,
            SyntaxErrorKind::Expected {
                expected,
                found: None,
            } => write!(f, "expected {expected}, found end of input")?,
            SyntaxErrorKind::UnterminatedString => f.write_str("unterminated string literal")?,
            SyntaxErrorKind::InvalidChar => {
                f.write_str("char literal must hold exactly one character")?;
            }
            SyntaxErrorKind::InvalidEscape(c) => write!(f, "unknown escape `\\{c}`")?,
            SyntaxErrorKind::InvalidNumber(text) => write!(f, "invalid number `{text}`")?,
            SyntaxErrorKind::UnknownName(name) => write!(f, "unknown name `{name}`")?,
            SyntaxErrorKind::NotAValue(text) => {
                write!(f, "`{text}` is a pattern slot, not a value")?;
            }
        }
        write!(f, " at offset {}", self.offset)
    }
}

impl std::error::Error for SyntaxError {}

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Int(i64),
    Byte(u8),
    Float(f64),
    Str(String),
    Char(char),
    Atom(Atom),
    Bool(bool),
    Unit,
}

impl Lit {
    fn push_onto(self, builder: TupleBuilder<'_>) -> TupleBuilder<'_> {
        match self {
            Lit::Int(n) => builder.push(n),
            Lit::Byte(b) => builder.push(b),
            Lit::Float(x) => builder.push(x),
            Lit::Str(s) => builder.push(s),
            Lit::Char(c) => builder.push(c),
            Lit::Atom(a) => builder.push(a),
            Lit::Bool(b) => builder.push(b),
            Lit::Unit => builder.push(()),
        }
    }

    fn into_literal(self, registry: &TypeRegistry) -> Literal {
        match self {
            Lit::Int(n) => Literal::new(registry, n),
            Lit::Byte(b) => Literal::new(registry, b),
            Lit::Float(x) => Literal::new(registry, x),
            Lit::Str(s) => Literal::new(registry, s),
            Lit::Char(c) => Literal::new(registry, c),
            Lit::Atom(a) => Literal::new(registry, a),
            Lit::Bool(b) => Literal::new(registry, b),
            Lit::Unit => Literal::new(registry, ()),
        }
    }
}

/// A parsed pattern slot, before registry resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotExpr {
    Literal(Lit),
    Type(TypeDesc),
    Wildcard,
    Stretch,
}

impl SlotExpr {
    fn into_slot(self, registry: &TypeRegistry) -> PatternSlot {
        match self {
            SlotExpr::Literal(lit) => ExactSlot::literal(lit.into_literal(registry)).into(),
            SlotExpr::Type(ty) => ExactSlot::of_type(ty).into(),
            SlotExpr::Wildcard => PatternSlot::Wildcard,
            SlotExpr::Stretch => PatternSlot::Stretch,
        }
    }
}

/// Parse a tuple such as `:get, 1, "x"`.
pub fn parse_tuple(source: &str, registry: &TypeRegistry) -> Result<AnyTuple, SyntaxError> {
    let values = parse_list(source, |parser| {
        let start = parser.pos;
        match parser.slot()? {
            SlotExpr::Literal(lit) => Ok(lit),
            _ => Err(parser.error_at(
                start,
                SyntaxErrorKind::NotAValue(source[start..parser.pos].to_string()),
            )),
        }
    })?;
    Ok(values
        .into_iter()
        .fold(AnyTuple::builder(registry), |b, lit| lit.push_onto(b))
        .build())
}

/// Parse a pattern such as `:get, int, _, ..`.
pub fn parse_pattern(source: &str, registry: &TypeRegistry) -> Result<Pattern, SyntaxError> {
    let slots = parse_list(source, |parser| parser.slot())?;
    Ok(slots
        .into_iter()
        .map(|slot| slot.into_slot(registry))
        .collect())
}

/// Parse a list, trying the parenthesised form first and falling back to the bare one.
///
/// When both forms fail the parenthesised error is reported.
fn parse_list<T>(
    source: &str,
    mut item: impl FnMut(&mut Parser<'_>) -> Result<T, SyntaxError>,
) -> Result<Vec<T>, SyntaxError> {
    let mut parser = Parser::new(source);
    parser.skip_ws();
    if parser.peek() != Some('(') {
        return parser.items(&mut item, None);
    }

    let mut wrapped = parser.clone();
    wrapped.bump();
    let result = wrapped.items(&mut item, Some(')')).and_then(|items| {
        wrapped.skip_ws();
        match wrapped.peek() {
            None => Ok(items),
            Some(_) => Err(wrapped.expected("end of input")),
        }
    });
    match result {
        Ok(items) => Ok(items),
        Err(wrapped_error) => parser.items(&mut item, None).map_err(|_| wrapped_error),
    }
}

#[derive(Clone)]
struct Parser<'s> {
    source: &'s str,
    pos: usize,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str) -> Self {
        Parser { source, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'s str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.source[start..self.pos]
    }

    fn error_at(&self, offset: usize, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError { kind, offset }
    }

    fn expected(&self, expected: &'static str) -> SyntaxError {
        self.error_at(
            self.pos,
            SyntaxErrorKind::Expected {
                expected,
                found: self.peek(),
            },
        )
    }

    /// Parse comma-separated items up to `close` (or the end of input).
    fn items<T>(
        &mut self,
        item: &mut impl FnMut(&mut Parser<'s>) -> Result<T, SyntaxError>,
        close: Option<char>,
    ) -> Result<Vec<T>, SyntaxError> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            let at_close = match close {
                Some(c) => self.eat(c),
                None => self.peek().is_none(),
            };
            if at_close {
                return Ok(items);
            }

            items.push(item(self)?);

            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            return match close {
                Some(c) if self.eat(c) => Ok(items),
                Some(_) => Err(self.expected("`,` or `)`")),
                None if self.peek().is_none() => Ok(items),
                None => Err(self.expected("`,`")),
            };
        }
    }

    fn slot(&mut self) -> Result<SlotExpr, SyntaxError> {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            Some('"') => self.string().map(|s| SlotExpr::Literal(Lit::Str(s))),
            Some('\'') => self.char_lit().map(|c| SlotExpr::Literal(Lit::Char(c))),
            Some(':') => {
                self.bump();
                let name = self.take_while(is_ident_char);
                if name.is_empty() {
                    return Err(self.expected("atom name"));
                }
                Ok(SlotExpr::Literal(Lit::Atom(Atom::new(name))))
            }
            Some('(') => {
                self.bump();
                self.skip_ws();
                if self.eat(')') {
                    Ok(SlotExpr::Literal(Lit::Unit))
                } else {
                    Err(self.expected("`)`"))
                }
            }
            Some('.') if self.peek_nth(1) == Some('.') => {
                self.pos += 2;
                Ok(SlotExpr::Stretch)
            }
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(start),
            Some(c) if is_ident_char(c) => {
                let word = self.take_while(is_ident_char);
                keyword(word).ok_or_else(|| {
                    self.error_at(start, SyntaxErrorKind::UnknownName(word.to_string()))
                })
            }
            _ => Err(self.expected("a value, type, `_` or `..`")),
        }
    }

    fn number(&mut self, start: usize) -> Result<SlotExpr, SyntaxError> {
        let source = self.source;
        let negative = self.eat('-');
        if source[self.pos..].starts_with("inf") {
            self.pos += 3;
            let x = if negative { f64::NEG_INFINITY } else { f64::INFINITY };
            return Ok(SlotExpr::Literal(Lit::Float(x)));
        }

        self.take_while(|c| c.is_ascii_digit());
        let mut is_float = false;
        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.take_while(|c| c.is_ascii_digit());
            is_float = true;
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let digit_at = if matches!(self.peek_nth(1), Some('+' | '-')) { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.pos += digit_at;
                self.take_while(|c| c.is_ascii_digit());
                is_float = true;
            }
        }
        let text = &source[start..self.pos];

        let lit = if is_float {
            text.parse::<f64>().ok().map(Lit::Float)
        } else if source[self.pos..].starts_with("u8") {
            self.pos += 2;
            text.parse::<u8>().ok().map(Lit::Byte)
        } else {
            text.parse::<i64>().ok().map(Lit::Int)
        };
        lit.map(SlotExpr::Literal).ok_or_else(|| {
            self.error_at(
                start,
                SyntaxErrorKind::InvalidNumber(source[start..self.pos].to_string()),
            )
        })
    }

    fn string(&mut self) -> Result<String, SyntaxError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error_at(start, SyntaxErrorKind::UnterminatedString)),
                Some('"') => return Ok(out),
                Some('\\') => out.push(self.escape(start, SyntaxErrorKind::UnterminatedString)?),
                Some(c) => out.push(c),
            }
        }
    }

    fn char_lit(&mut self) -> Result<char, SyntaxError> {
        let start = self.pos;
        self.bump();
        let c = match self.bump() {
            Some('\\') => self.escape(start, SyntaxErrorKind::InvalidChar)?,
            Some(c) if c != '\'' => c,
            _ => return Err(self.error_at(start, SyntaxErrorKind::InvalidChar)),
        };
        if self.eat('\'') {
            Ok(c)
        } else {
            Err(self.error_at(start, SyntaxErrorKind::InvalidChar))
        }
    }

    /// Decode the escape after a backslash: `\" \' \\ \n \r \t \0 \u{..}`.
    ///
    /// `eof` is reported at `literal_start` if the input ends mid-escape.
    fn escape(&mut self, literal_start: usize, eof: SyntaxErrorKind) -> Result<char, SyntaxError> {
        let escape_at = self.pos;
        let decoded = match self.bump() {
            None => return Err(self.error_at(literal_start, eof)),
            Some('"') => '"',
            Some('\'') => '\'',
            Some('\\') => '\\',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('0') => '\0',
            Some('u') => self
                .unicode_escape()
                .ok_or_else(|| self.error_at(escape_at, SyntaxErrorKind::InvalidEscape('u')))?,
            Some(c) => return Err(self.error_at(escape_at, SyntaxErrorKind::InvalidEscape(c))),
        };
        Ok(decoded)
    }

    /// The `{XXXX}` part of a `\u{XXXX}` escape.
    fn unicode_escape(&mut self) -> Option<char> {
        if !self.eat('{') {
            return None;
        }
        let hex = self.take_while(|c| c.is_ascii_hexdigit());
        if !self.eat('}') || !(1..=6).contains(&hex.len()) {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn keyword(word: &str) -> Option<SlotExpr> {
    let slot = match word {
        "_" => SlotExpr::Wildcard,
        "true" => SlotExpr::Literal(Lit::Bool(true)),
        "false" => SlotExpr::Literal(Lit::Bool(false)),
        "inf" => SlotExpr::Literal(Lit::Float(f64::INFINITY)),
        "NaN" => SlotExpr::Literal(Lit::Float(f64::NAN)),
        "int" => SlotExpr::Type(TypeDesc::INT),
        "float" => SlotExpr::Type(TypeDesc::FLOAT),
        "bool" => SlotExpr::Type(TypeDesc::BOOL),
        "str" => SlotExpr::Type(TypeDesc::STR),
        "char" => SlotExpr::Type(TypeDesc::CHAR),
        "byte" => SlotExpr::Type(TypeDesc::BYTE),
        "atom" => SlotExpr::Type(TypeDesc::ATOM),
        "unit" => SlotExpr::Type(TypeDesc::UNIT),
        _ => return None,
    };
    Some(slot)
}
