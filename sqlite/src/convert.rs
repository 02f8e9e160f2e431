//! Conversion between SQLite values and table-json cell types.
//!
//! The dump side reflects each [`ValueRef`] into a [`CellValue`] using the
//! column's declared type for `NULL` defaults. The load side turns a
//! [`BindValue`] into an owned [`Value`] for positional binding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rusqlite::types::{Value, ValueRef};
use table_json_core::{BindValue, CellValue, ColumnDescriptor};
use tracing::warn;

/// What to store for a BLOB cell whose bytes are not a JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlobFallback {
    /// Leave the key unset for that row.
    #[default]
    Omit,
    /// Store the raw bytes as a standard base64 string.
    Base64,
}

/// Result of reflecting one cell.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Reflected {
    /// Store this value under the column name.
    Value(CellValue),
    /// `NULL` in a column without a default; leave the key unset.
    Unset,
    /// BLOB that failed to parse as JSON, with the fallback value if any.
    Unparsed(Option<CellValue>),
}

/// Reflects a single SQLite value into a cell.
///
/// `NULL` takes the column type's default. Text is decoded lossily. BLOBs
/// are parsed as JSON; a parse failure is logged and handled by `fallback`.
pub(crate) fn reflect_cell(
    value: ValueRef<'_>,
    column: &ColumnDescriptor,
    table: &str,
    fallback: BlobFallback,
) -> Reflected {
    match value {
        ValueRef::Null => match column.column_type.null_default() {
            Some(default) => Reflected::Value(default),
            None => Reflected::Unset,
        },
        ValueRef::Integer(i) => Reflected::Value(CellValue::Integer(i)),
        ValueRef::Real(f) => Reflected::Value(CellValue::Real(f)),
        ValueRef::Text(bytes) => {
            Reflected::Value(CellValue::Text(String::from_utf8_lossy(bytes).into_owned()))
        }
        ValueRef::Blob(bytes) => match serde_json::from_slice(bytes) {
            Ok(doc) => Reflected::Value(CellValue::Json(doc)),
            Err(err) => {
                warn!(
                    table,
                    column = %column.name,
                    len = bytes.len(),
                    error = %err,
                    "blob is not valid JSON"
                );
                Reflected::Unparsed(match fallback {
                    BlobFallback::Omit => None,
                    BlobFallback::Base64 => Some(CellValue::Text(STANDARD.encode(bytes))),
                })
            }
        },
    }
}

/// Converts a bind parameter into an owned SQLite value.
pub(crate) fn bind_to_sql(value: BindValue) -> Value {
    match value {
        BindValue::Null => Value::Null,
        BindValue::Integer(i) => Value::Integer(i),
        BindValue::Real(f) => Value::Real(f),
        BindValue::Text(s) => Value::Text(s),
        BindValue::Blob(b) => Value::Blob(b),
    }
}
