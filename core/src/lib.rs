//! Core types for converting SQL table rows to and from JSON.
//!
//! This crate is storage-independent. It defines:
//!
//! - [`CellValue`]: one dumped cell (integer, real, text, parsed JSON
//!   document, or null), serializing to plain JSON.
//! - [`ColumnType`] / [`ColumnDescriptor`]: declared column types and the
//!   defaults substituted for SQL `NULL`.
//! - [`Row`]: a row keyed by column name.
//! - [`BindValue`]: a bind parameter built from one JSON input cell.
//! - Identifier checks ([`validate_identifier`], [`quote_identifier`]) for
//!   names that have to be interpolated into SQL.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use table_json_core::*;
//!
//! let id = ColumnDescriptor::new("id", Some("INTEGER"));
//! let mut row = Row::new();
//! row.insert(id.name.clone(), id.column_type.null_default().unwrap());
//! assert_eq!(serde_json::to_value(&row).unwrap(), json!({"id": 0}));
//!
//! let bound = BindValue::from_json(&json!({"age": 40})).unwrap();
//! assert!(matches!(bound, BindValue::Blob(_)));
//! ```

mod bind;
mod ident;
mod types;

pub use bind::BindValue;
pub use ident::{IdentifierError, quote_identifier, validate_identifier};
pub use types::*;
