//! Array slot keys.

use std::fmt;

/// Key of a slot inside a keyed array.
///
/// Arrays are ordered sequences of `(key, value)` slots. A key is either an
/// integer index or an arbitrary name, so associative arrays (and arrays with
/// holes left by a removal) are representable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Index(i64),
    Name(String),
}

impl Key {
    /// Parse a path segment into a key.
    ///
    /// Canonical decimal integers become [`Key::Index`]; everything else,
    /// including `"01"`, `"-0"` and `"+1"`, stays a [`Key::Name`].
    ///
    /// # Example
    ///
    /// ```
    /// use json_walker_raw::Key;
    ///
    /// assert_eq!(Key::parse("3"), Key::Index(3));
    /// assert_eq!(Key::parse("-3"), Key::Index(-3));
    /// assert_eq!(Key::parse("03"), Key::Name("03".to_string()));
    /// assert_eq!(Key::parse("name"), Key::Name("name".to_string()));
    /// ```
    pub fn parse(segment: &str) -> Self {
        if is_canonical_integer(segment) {
            if let Ok(index) = segment.parse::<i64>() {
                return Key::Index(index);
            }
        }
        Key::Name(segment.to_string())
    }

    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(_) => None,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Key::Index(_))
    }
}

fn is_canonical_integer(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let bytes = digits.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }
    if bytes[0] == b'0' {
        // "0" is canonical, "-0" and "007" are not.
        return bytes.len() == 1 && digits.len() == s.len();
    }
    true
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for Key {
    fn from(index: i64) -> Self {
        Key::Index(index)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index as i64)
    }
}

impl From<&str> for Key {
    fn from(segment: &str) -> Self {
        Key::parse(segment)
    }
}

impl From<String> for Key {
    fn from(segment: String) -> Self {
        Key::parse(&segment)
    }
}
