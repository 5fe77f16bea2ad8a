//! Bracketed-list extraction from raw model output.
//!
//! The model returns prose-wrapped pseudo-list text, sometimes with a
//! preamble or trailing remarks. This module locates the first bracketed
//! span and decodes it with a restricted literal parser that accepts only
//! literal strings, numbers, booleans, `None`, and nested literal
//! containers. Anything with executable syntax is rejected; model-controlled
//! text is never evaluated.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Failure to extract a usable list from a completion.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("No bracketed list found in the response. Response: {raw}")]
    NoList { raw: String },

    #[error("Could not extract a valid list from the response. Response: {raw}")]
    MalformedList { raw: String },
}

static LIST_RE: OnceLock<Regex> = OnceLock::new();

/// Extract the first bracketed list from `raw` and parse it as a list of
/// strings.
///
/// The span is matched non-greedily: the first `]` after the first `[` wins,
/// mirroring how the primer examples are written (flat, single-line lists).
/// An empty list is accepted.
pub fn extract_items(raw: &str) -> Result<Vec<String>, ExtractError> {
    let re = LIST_RE.get_or_init(|| Regex::new(r"\[(.*?)\]").expect("valid regex"));

    let captures = re.captures(raw).ok_or_else(|| ExtractError::NoList {
        raw: raw.to_string(),
    })?;
    let inner = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

    let malformed = |raw: &str| ExtractError::MalformedList {
        raw: raw.to_string(),
    };

    let literals = parse_literal_elements(inner).map_err(|_| malformed(raw))?;
    literals
        .into_iter()
        .map(|lit| match lit {
            Literal::Str(s) => Ok(s),
            _ => Err(malformed(raw)),
        })
        .collect()
}

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Str(String),
    Num(f64),
    Bool(bool),
    None,
    Seq(Vec<Literal>),
    Map(Vec<(Literal, Literal)>),
}

/// Marker error for the literal parser; the caller only needs pass/fail.
#[derive(Debug)]
struct LiteralError;

/// Parse a comma-separated sequence of literal values (the text between the
/// outer brackets). Trailing commas are tolerated, as Python's literal
/// syntax allows them.
fn parse_literal_elements(inner: &str) -> Result<Vec<Literal>, LiteralError> {
    let mut parser = Parser::new(inner);
    let items = parser.parse_elements(None)?;
    parser.skip_ws();
    if parser.peek().is_some() {
        return Err(LiteralError);
    }
    Ok(items)
}

/// Recursive-descent parser over literal syntax.
///
/// Deliberately NOT a general expression evaluator: identifiers, calls,
/// attribute access, and operators are all parse errors.
struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    /// Parse comma-separated values until `close` (or end of input when
    /// parsing the top level).
    fn parse_elements(&mut self, close: Option<char>) -> Result<Vec<Literal>, LiteralError> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match (self.peek(), close) {
                (None, None) => return Ok(items),
                (None, Some(_)) => return Err(LiteralError),
                (Some(c), Some(end)) if c == end => {
                    self.bump();
                    return Ok(items);
                }
                _ => {}
            }

            items.push(self.parse_value()?);
            self.skip_ws();

            match (self.peek(), close) {
                (Some(','), _) => {
                    self.bump();
                }
                (None, None) => return Ok(items),
                (Some(c), Some(end)) if c == end => {
                    self.bump();
                    return Ok(items);
                }
                _ => return Err(LiteralError),
            }
        }
    }

    fn parse_value(&mut self) -> Result<Literal, LiteralError> {
        self.skip_ws();
        match self.peek() {
            Some('\'') | Some('"') => {
                let quote = self.bump().unwrap_or('\'');
                self.parse_string(quote)
            }
            Some('[') => {
                self.bump();
                Ok(Literal::Seq(self.parse_elements(Some(']'))?))
            }
            Some('(') => {
                self.bump();
                Ok(Literal::Seq(self.parse_elements(Some(')'))?))
            }
            Some('{') => {
                self.bump();
                self.parse_braced()
            }
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                self.parse_number()
            }
            Some('T') => self.parse_keyword("True", Literal::Bool(true)),
            Some('F') => self.parse_keyword("False", Literal::Bool(false)),
            Some('N') => self.parse_keyword("None", Literal::None),
            _ => Err(LiteralError),
        }
    }

    /// Parse a quoted string body; the opening quote is already consumed.
    fn parse_string(&mut self, quote: char) -> Result<Literal, LiteralError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(LiteralError),
                Some(c) if c == quote => return Ok(Literal::Str(out)),
                Some('\\') => {
                    let escaped = self.bump().ok_or(LiteralError)?;
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '0' => out.push('\0'),
                        '\\' => out.push('\\'),
                        '\'' => out.push('\''),
                        '"' => out.push('"'),
                        'x' => out.push(self.parse_hex_escape(2)?),
                        'u' => out.push(self.parse_hex_escape(4)?),
                        // Python keeps unrecognized escapes verbatim
                        other => {
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_hex_escape(&mut self, digits: usize) -> Result<char, LiteralError> {
        let mut value = 0u32;
        for _ in 0..digits {
            let c = self.bump().ok_or(LiteralError)?;
            let digit = c.to_digit(16).ok_or(LiteralError)?;
            value = value * 16 + digit;
        }
        char::from_u32(value).ok_or(LiteralError)
    }

    fn parse_number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-' | '_'))
        {
            self.pos += 1;
        }
        let lexeme: String = self.chars[start..self.pos]
            .iter()
            .filter(|&&c| c != '_')
            .collect();
        lexeme
            .parse::<f64>()
            .map(Literal::Num)
            .map_err(|_| LiteralError)
    }

    /// Parse `True` / `False` / `None`. The keyword must not be followed by
    /// an identifier character, so e.g. `Nonexistent` is rejected.
    fn parse_keyword(&mut self, word: &str, value: Literal) -> Result<Literal, LiteralError> {
        for expected in word.chars() {
            if self.bump() != Some(expected) {
                return Err(LiteralError);
            }
        }
        if self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            return Err(LiteralError);
        }
        Ok(value)
    }

    /// Parse the remainder of a `{...}` literal: a dict if the first element
    /// is followed by `:`, otherwise a set.
    fn parse_braced(&mut self) -> Result<Literal, LiteralError> {
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(Literal::Map(Vec::new()));
        }

        let first = self.parse_value()?;
        self.skip_ws();
        if self.peek() == Some(':') {
            self.bump();
            let value = self.parse_value()?;
            let mut pairs = vec![(first, value)];
            loop {
                self.skip_ws();
                match self.peek() {
                    Some('}') => {
                        self.bump();
                        return Ok(Literal::Map(pairs));
                    }
                    Some(',') => {
                        self.bump();
                        self.skip_ws();
                        if self.peek() == Some('}') {
                            self.bump();
                            return Ok(Literal::Map(pairs));
                        }
                        let key = self.parse_value()?;
                        self.skip_ws();
                        if self.bump() != Some(':') {
                            return Err(LiteralError);
                        }
                        let value = self.parse_value()?;
                        pairs.push((key, value));
                    }
                    _ => return Err(LiteralError),
                }
            }
        }

        // Set literal
        let mut items = vec![first];
        loop {
            self.skip_ws();
            match self.peek() {
                Some('}') => {
                    self.bump();
                    return Ok(Literal::Seq(items));
                }
                Some(',') => {
                    self.bump();
                    self.skip_ws();
                    if self.peek() == Some('}') {
                        self.bump();
                        return Ok(Literal::Seq(items));
                    }
                    items.push(self.parse_value()?);
                }
                _ => return Err(LiteralError),
            }
        }
    }
}
