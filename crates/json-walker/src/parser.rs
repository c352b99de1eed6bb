//! Path segment parser.
//!
//! A segment is `key` optionally followed by a pseudo-selector suffix
//! `::name(argument)`, where `name` is one of `parent`, `nthChild`, `first`,
//! `last` or `closest` (matched case-insensitively). The argument is taken
//! verbatim. A `::` that is not followed by `name(` is part of the key.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown pseudo-selector: {0}")]
    UnknownSelector(String),
    #[error("Unclosed argument list for pseudo-selector: {0}")]
    UnclosedArguments(String),
    #[error("Missing pseudo-selector name")]
    MissingSelectorName,
    #[error("Invalid nthChild position: {0:?}")]
    InvalidNumber(String),
}

/// Structural query attached to a path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoSelector {
    /// `::parent()`
    Parent,
    /// `::nthChild(n)`, 1-based.
    NthChild(i64),
    /// `::first()`
    First,
    /// `::last()`
    Last,
    /// `::closest(key)`
    Closest(String),
}

/// A parsed path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Literal key, possibly empty.
    pub key: &'a str,
    pub selector: Option<PseudoSelector>,
}

/// Path segment parser.
pub struct SegmentParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SegmentParser<'a> {
    /// Parse a single path segment.
    ///
    /// # Example
    ///
    /// ```
    /// use json_walker::{PseudoSelector, SegmentParser};
    ///
    /// let segment = SegmentParser::parse("items::nthChild(2)").unwrap();
    /// assert_eq!(segment.key, "items");
    /// assert_eq!(segment.selector, Some(PseudoSelector::NthChild(2)));
    ///
    /// let segment = SegmentParser::parse("std::vec").unwrap();
    /// assert_eq!(segment.key, "std::vec");
    /// assert_eq!(segment.selector, None);
    /// ```
    pub fn parse(input: &'a str) -> Result<Segment<'a>, ParseError> {
        let mut parser = Self { input, pos: 0 };
        parser.parse_segment()
    }

    fn parse_segment(&mut self) -> Result<Segment<'a>, ParseError> {
        while let Some(offset) = self.rest().find("::") {
            let start = self.pos + offset;
            self.pos = start + 2;
            if let Some(selector) = self.parse_selector()? {
                return Ok(Segment {
                    key: &self.input[..start],
                    selector: Some(selector),
                });
            }
            // Plain `::` inside the key; keep scanning one byte further so a
            // run like `:::first()` still finds its selector.
            self.pos = start + 1;
        }

        Ok(Segment {
            key: self.input,
            selector: None,
        })
    }

    fn parse_selector(&mut self) -> Result<Option<PseudoSelector>, ParseError> {
        let name_start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        let name = &self.input[name_start..self.pos];

        if self.peek() != Some('(') {
            return Ok(None);
        }
        if name.is_empty() {
            return Err(ParseError::MissingSelectorName);
        }
        self.advance();

        let argument = self
            .rest()
            .strip_suffix(')')
            .ok_or_else(|| ParseError::UnclosedArguments(name.to_string()))?;

        let selector = match name.to_ascii_lowercase().as_str() {
            "parent" => PseudoSelector::Parent,
            "first" => PseudoSelector::First,
            "last" => PseudoSelector::Last,
            "nthchild" => PseudoSelector::NthChild(parse_position(argument)?),
            "closest" => PseudoSelector::Closest(argument.to_string()),
            _ => return Err(ParseError::UnknownSelector(name.to_string())),
        };

        self.pos = self.input.len();
        Ok(Some(selector))
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }
}

fn parse_position(argument: &str) -> Result<i64, ParseError> {
    argument
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidNumber(argument.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Segment<'_> {
        SegmentParser::parse(input).unwrap_or_else(|e| panic!("parse failed for '{input}': {e}"))
    }

    #[test]
    fn test_plain_key() {
        assert_eq!(parse("name"), Segment { key: "name", selector: None });
        assert_eq!(parse(""), Segment { key: "", selector: None });
    }

    #[test]
    fn test_selectors() {
        assert_eq!(parse("a::parent()").selector, Some(PseudoSelector::Parent));
        assert_eq!(parse("a::first()").selector, Some(PseudoSelector::First));
        assert_eq!(parse("a::last()").selector, Some(PseudoSelector::Last));
        assert_eq!(parse("a::nthChild(3)").selector, Some(PseudoSelector::NthChild(3)));
        assert_eq!(
            parse("a::closest(root)").selector,
            Some(PseudoSelector::Closest("root".to_string()))
        );
    }

    #[test]
    fn test_selector_without_key() {
        let segment = parse("::first()");
        assert_eq!(segment.key, "");
        assert_eq!(segment.selector, Some(PseudoSelector::First));
    }

    #[test]
    fn test_selector_name_is_case_insensitive() {
        assert_eq!(parse("::NTHCHILD(1)").selector, Some(PseudoSelector::NthChild(1)));
        assert_eq!(parse("::nthchild(1)").selector, Some(PseudoSelector::NthChild(1)));
    }

    #[test]
    fn test_closest_argument_is_verbatim() {
        assert_eq!(
            parse("::closest( a b )").selector,
            Some(PseudoSelector::Closest(" a b ".to_string()))
        );
    }

    #[test]
    fn test_double_colon_in_key() {
        assert_eq!(parse("a::b").key, "a::b");
        let segment = parse("ns::type::first()");
        assert_eq!(segment.key, "ns::type");
        assert_eq!(segment.selector, Some(PseudoSelector::First));
        let segment = parse("a:::last()");
        assert_eq!(segment.key, "a:");
        assert_eq!(segment.selector, Some(PseudoSelector::Last));
    }

    #[test]
    fn test_rejects_malformed_selectors() {
        assert_eq!(
            SegmentParser::parse("a::nope()"),
            Err(ParseError::UnknownSelector("nope".to_string()))
        );
        assert_eq!(
            SegmentParser::parse("a::first("),
            Err(ParseError::UnclosedArguments("first".to_string()))
        );
        assert_eq!(SegmentParser::parse("a::()"), Err(ParseError::MissingSelectorName));
        assert_eq!(
            SegmentParser::parse("a::nthChild(x)"),
            Err(ParseError::InvalidNumber("x".to_string()))
        );
    }
}
