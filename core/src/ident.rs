//! SQL identifier validation and quoting.
//!
//! Table and column names cannot be bound as parameters, so they are
//! checked here and then double-quoted before being interpolated into SQL.
//! Whether a name actually exists is decided by the storage backend against
//! live schema metadata.

use thiserror::Error;

/// Errors for identifiers that can never be valid SQL names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Name is empty or whitespace-only.
    #[error("identifier cannot be empty")]
    Empty,
    /// Name contains a NUL byte, which SQLite truncates at.
    #[error("identifier contains a NUL byte: {0:?}")]
    ContainsNul(String),
}

/// Checks that a name can be quoted into a SQL statement.
///
/// # Examples
///
/// ```
/// use table_json_core::validate_identifier;
///
/// assert!(validate_identifier("users").is_ok());
/// assert!(validate_identifier("odd \"name\"").is_ok());
/// assert!(validate_identifier("  ").is_err());
/// ```
pub fn validate_identifier(name: &str) -> Result<(), IdentifierError> {
    if name.trim().is_empty() {
        return Err(IdentifierError::Empty);
    }
    if name.contains('\0') {
        return Err(IdentifierError::ContainsNul(name.to_string()));
    }
    Ok(())
}

/// Wraps a name in double quotes, doubling any embedded quote.
///
/// # Examples
///
/// ```
/// use table_json_core::quote_identifier;
///
/// assert_eq!(quote_identifier("users"), r#""users""#);
/// assert_eq!(quote_identifier(r#"a"b"#), r#""a""b""#);
/// ```
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_identifier(""), Err(IdentifierError::Empty));
    }

    #[test]
    fn test_rejects_nul() {
        assert!(matches!(
            validate_identifier("users\0; DROP TABLE x"),
            Err(IdentifierError::ContainsNul(_))
        ));
    }

    #[test]
    fn test_quoting_neutralizes_injection() {
        let quoted = quote_identifier("users\"; DROP TABLE users; --");
        assert_eq!(quoted, "\"users\"\"; DROP TABLE users; --\"");
    }
}
