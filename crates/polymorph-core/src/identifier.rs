//! Validated identifiers for schema entities.
//!
//! Entity names are embedded verbatim into synthesized TypeScript source
//! (`$PostPayload`, `'Post'`), so every name that reaches the rewriter goes
//! through [`Ident::new`] first.

use std::{borrow::Borrow, fmt, str::FromStr};

use thiserror::Error;

/// Errors produced when validating an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentError {
    #[error("identifier is empty")]
    Empty,

    #[error("identifier `{0}` must not start with a digit")]
    LeadingDigit(String),

    #[error("identifier `{name}` contains invalid character `{ch}`")]
    InvalidChar { name: String, ch: char },
}

/// An entity identifier restricted to `[A-Za-z_][A-Za-z0-9_]*`.
///
/// # Examples
///
/// ```
/// use polymorph_core::identifier::Ident;
///
/// let post = Ident::new("Post").unwrap();
/// assert_eq!(post.as_str(), "Post");
///
/// assert!(Ident::new("Post'; drop").is_err());
/// assert!(Ident::new("9Lives").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ident(String);

impl Ident {
    /// Validates `name` and wraps it as an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdentError`] when the name is empty, starts with a digit,
    /// or contains a character outside `[A-Za-z0-9_]`.
    pub fn new(name: &str) -> Result<Self, IdentError> {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return Err(IdentError::Empty);
        };

        if first.is_ascii_digit() {
            return Err(IdentError::LeadingDigit(name.to_string()));
        }

        if let Some(ch) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(IdentError::InvalidChar {
                name: name.to_string(),
                ch,
            });
        }

        Ok(Self(name.to_string()))
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ident {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Ident {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ident {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Ident {
    type Error = IdentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl PartialEq<str> for Ident {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Ident {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
