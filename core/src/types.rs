//! Cell, column and row type definitions.
//!
//! A dumped row is a mapping from column name to [`CellValue`]. Column
//! declarations are reduced to a [`ColumnType`], which decides the default
//! substituted for SQL `NULL` on the dump path.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Declared storage type of a table column.
///
/// Only the four SQLite storage class names are recognized. Anything else
/// (including `INT`, `VARCHAR(10)` or a missing declaration) is kept,
/// upper-cased, as [`ColumnType::Unrecognized`].
///
/// # Examples
///
/// ```
/// use table_json_core::ColumnType;
///
/// assert_eq!(ColumnType::from_declared(Some("integer")), ColumnType::Integer);
/// assert_eq!(ColumnType::from_declared(Some(" BLOB ")), ColumnType::Blob);
/// assert_eq!(
///     ColumnType::from_declared(Some("VARCHAR(10)")),
///     ColumnType::Unrecognized("VARCHAR(10)".into())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
    Real,
    Blob,
    /// Any other declaration, upper-cased. Empty when the column has none.
    Unrecognized(String),
}

impl ColumnType {
    /// Parses a declared column type, as reported by SQLite.
    pub fn from_declared(declared: Option<&str>) -> Self {
        let declared = declared.unwrap_or_default().trim().to_ascii_uppercase();
        match declared.as_str() {
            "INTEGER" => Self::Integer,
            "TEXT" => Self::Text,
            "REAL" => Self::Real,
            "BLOB" => Self::Blob,
            _ => Self::Unrecognized(declared),
        }
    }

    /// Value substituted for a SQL `NULL` cell of this type.
    ///
    /// Returns `None` for unrecognized types, in which case the key is left
    /// unset in the row.
    ///
    /// # Examples
    ///
    /// ```
    /// use table_json_core::{CellValue, ColumnType};
    ///
    /// assert_eq!(ColumnType::Integer.null_default(), Some(CellValue::Integer(0)));
    /// assert_eq!(ColumnType::Blob.null_default(), Some(CellValue::Text(String::new())));
    /// assert_eq!(ColumnType::Unrecognized("NUMERIC".into()).null_default(), None);
    /// ```
    pub fn null_default(&self) -> Option<CellValue> {
        match self {
            Self::Integer => Some(CellValue::Integer(0)),
            Self::Real => Some(CellValue::Real(0.0)),
            Self::Text | Self::Blob => Some(CellValue::Text(String::new())),
            Self::Unrecognized(_) => None,
        }
    }

    /// Returns the canonical declaration string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Real => "REAL",
            Self::Blob => "BLOB",
            Self::Unrecognized(declared) => declared.as_str(),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column name paired with its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDescriptor {
    /// Creates a descriptor from a column name and its raw declaration.
    pub fn new(name: impl Into<String>, declared: Option<&str>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::from_declared(declared),
        }
    }
}

/// A single dumped cell.
///
/// Serializes untagged, so a row of cells becomes a plain JSON object:
/// integers and reals as numbers, text as strings, parsed BLOB documents as
/// their JSON structure, and `Null` as `null`. Non-finite reals serialize
/// as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Real(f64),
    Text(String),
    /// A BLOB whose bytes parsed as a JSON document.
    Json(serde_json::Value),
    Null,
}

/// One table row keyed by column name.
///
/// Keys missing from the map are unset cells (e.g. an unparsable BLOB).
pub type Row = BTreeMap<String, CellValue>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_declared_is_case_insensitive() {
        assert_eq!(ColumnType::from_declared(Some("Text")), ColumnType::Text);
        assert_eq!(ColumnType::from_declared(Some("real")), ColumnType::Real);
    }

    #[test]
    fn test_missing_declaration_is_unrecognized() {
        assert_eq!(
            ColumnType::from_declared(None),
            ColumnType::Unrecognized(String::new())
        );
    }

    #[test]
    fn test_affinity_aliases_are_not_recognized() {
        // Only exact storage class names get NULL defaults.
        for decl in ["INT", "BIGINT", "VARCHAR(255)", "DOUBLE", "NUMERIC"] {
            let ty = ColumnType::from_declared(Some(decl));
            assert!(matches!(ty, ColumnType::Unrecognized(_)), "{decl}");
            assert_eq!(ty.null_default(), None);
        }
    }

    #[test]
    fn test_null_defaults() {
        assert_eq!(ColumnType::Real.null_default(), Some(CellValue::Real(0.0)));
        assert_eq!(
            ColumnType::Text.null_default(),
            Some(CellValue::Text(String::new()))
        );
    }

    #[test]
    fn test_row_serializes_as_plain_object() {
        let mut row = Row::new();
        row.insert("id".into(), CellValue::Integer(1));
        row.insert("name".into(), CellValue::Text("ann".into()));
        row.insert("meta".into(), CellValue::Json(json!({"age": 30})));
        row.insert("score".into(), CellValue::Real(1.5));
        row.insert("gone".into(), CellValue::Null);

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(
            value,
            json!({"id": 1, "name": "ann", "meta": {"age": 30}, "score": 1.5, "gone": null})
        );
    }

    #[test]
    fn test_non_finite_real_serializes_as_null() {
        let out = serde_json::to_string(&CellValue::Real(f64::INFINITY)).unwrap();
        assert_eq!(out, "null");
    }
}
