//! Quoted and unquoted relational names.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::config::IdentifierCase;
use crate::error::BindingError;

/// A table or column name.
///
/// Equality and hashing use the normalized key only: a quoted name keeps its
/// text verbatim, an unquoted one is folded by the [`IdentifierCase`] it was
/// created with. Backticks and double quotes are interchangeable markers.
#[derive(Debug, Clone)]
pub struct Identifier {
    text: String,
    quoted: bool,
    key: String,
}

impl Identifier {
    /// Parse a raw name with the default (lowercase) policy.
    ///
    /// Malformed quoting is kept as literal unquoted text; use
    /// [`Identifier::parse`] to reject it instead. The key is always folded
    /// to lowercase, but lookups through a [`SchemaRegistry`] or a [`Table`]
    /// re-fold unquoted names with the registry's own policy.
    ///
    /// [`SchemaRegistry`]: crate::relational::SchemaRegistry
    /// [`Table`]: crate::relational::Table
    pub fn to_identifier(raw: &str) -> Self {
        let case = IdentifierCase::default();
        Self::parse(raw, case).unwrap_or_else(|_| Self::unquoted(raw.trim(), case))
    }

    fn unquoted(text: &str, case: IdentifierCase) -> Self {
        Self {
            text: text.to_string(),
            quoted: false,
            key: case.fold(text),
        }
    }

    /// Parse a raw name, detecting a quoting marker.
    pub fn parse(raw: &str, case: IdentifierCase) -> Result<Self, BindingError> {
        let invalid = || BindingError::InvalidIdentifier {
            raw: raw.to_string(),
        };
        let trimmed = raw.trim();
        match strip_quotes(trimmed) {
            Some(Ok(inner)) if !inner.is_empty() => Ok(Self {
                text: inner.to_string(),
                quoted: true,
                key: inner.to_string(),
            }),
            Some(_) => Err(invalid()),
            None if trimmed.is_empty() || is_quote(trimmed) => Err(invalid()),
            None => Ok(Self::unquoted(trimmed, case)),
        }
    }

    /// The name as written, without quoting markers.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the name was explicitly quoted.
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// The normalized comparison key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The comparison key under `case`, regardless of the policy this name
    /// was parsed with. Quoted names are unaffected.
    pub fn key_under(&self, case: IdentifierCase) -> String {
        if self.quoted {
            self.text.clone()
        } else {
            case.fold(&self.text)
        }
    }

    /// Render with backticks when quoted.
    pub fn render(&self) -> String {
        if self.quoted {
            format!("`{}`", self.text)
        } else {
            self.text.clone()
        }
    }
}

fn is_quote(text: &str) -> bool {
    text.starts_with('`') || text.starts_with('"') || text.ends_with('`') || text.ends_with('"')
}

/// Returns `None` when unquoted, `Some(Err)` when the markers are unbalanced.
fn strip_quotes(text: &str) -> Option<Result<&str, ()>> {
    for marker in ['`', '"'] {
        if let Some(rest) = text.strip_prefix(marker) {
            return Some(rest.strip_suffix(marker).ok_or(()));
        }
    }
    None
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquoted_is_folded() {
        let id = Identifier::parse("Owner_items", IdentifierCase::Lower).unwrap();
        assert!(!id.is_quoted());
        assert_eq!(id.text(), "Owner_items");
        assert_eq!(id.key(), "owner_items");
        assert_eq!(id, Identifier::to_identifier("OWNER_ITEMS"));
    }

    #[test]
    fn test_quoted_preserves_case() {
        let id = Identifier::parse("`Owner_items`", IdentifierCase::Lower).unwrap();
        assert!(id.is_quoted());
        assert_eq!(id.key(), "Owner_items");
        assert_ne!(id, Identifier::to_identifier("Owner_items"));
        assert_eq!(id.render(), "`Owner_items`");
    }

    #[test]
    fn test_quote_markers_are_interchangeable() {
        assert_eq!(
            Identifier::to_identifier("`pid`"),
            Identifier::to_identifier("\"pid\"")
        );
    }

    #[test]
    fn test_quoted_matches_folded_unquoted() {
        // a quoted lowercase name lines up with an unquoted one folded to lowercase
        assert_eq!(
            Identifier::to_identifier("`owner_id`"),
            Identifier::to_identifier("OWNER_ID")
        );
    }

    #[test]
    fn test_preserve_policy() {
        let a = Identifier::parse("Tag", IdentifierCase::Preserve).unwrap();
        let b = Identifier::parse("tag", IdentifierCase::Preserve).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_under_other_policy() {
        let id = Identifier::to_identifier("Owner");
        assert_eq!(id.key_under(IdentifierCase::Upper), "OWNER");
        assert_eq!(id.key_under(IdentifierCase::Preserve), "Owner");
        let quoted = Identifier::to_identifier("`Owner`");
        assert_eq!(quoted.key_under(IdentifierCase::Upper), "Owner");
    }

    #[test]
    fn test_malformed_input() {
        assert!(Identifier::parse("", IdentifierCase::Lower).is_err());
        assert!(Identifier::parse("``", IdentifierCase::Lower).is_err());
        assert!(Identifier::parse("`open", IdentifierCase::Lower).is_err());
        assert!(Identifier::parse("close\"", IdentifierCase::Lower).is_err());
    }
}
