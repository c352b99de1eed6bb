//! Path configuration.

/// Separator and wildcard used when splitting and expanding paths.
///
/// A tree takes its configuration from the root it was wrapped with; every
/// node navigated from that root shares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathConfig {
    /// Splits a path into segments. Defaults to `/`.
    pub separator: String,
    /// Marks a wildcard path segment and a wildcard in search patterns.
    /// Defaults to `*`.
    pub wildcard: char,
}

impl PathConfig {
    pub fn new(separator: impl Into<String>, wildcard: char) -> Self {
        Self {
            separator: separator.into(),
            wildcard,
        }
    }

    /// `true` when `segment` is exactly the wildcard character.
    pub fn is_wildcard(&self, segment: &str) -> bool {
        let mut chars = segment.chars();
        chars.next() == Some(self.wildcard) && chars.next().is_none()
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self::new("/", '*')
    }
}
