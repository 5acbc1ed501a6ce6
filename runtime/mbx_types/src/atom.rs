//! Constant-string message tags.

use std::fmt;

/// A message tag such as `:get` or `:put`.
///
/// Atoms compare by content. They render with a leading colon in both
/// `Debug` and `Display`, which is also how the textual pattern syntax
/// spells them.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atom(Box<str>);

impl Atom {
    /// Create an atom from its name (without the leading colon).
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Atom(name.into())
    }

    /// The atom's name, without the leading colon.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Atom {
    fn from(name: &str) -> Self {
        Atom::new(name)
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}
