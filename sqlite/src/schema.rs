//! Schema introspection against live SQLite metadata.
//!
//! Table and column names cannot be bound as parameters, so every name
//! that ends up interpolated into SQL is first checked here against
//! `sqlite_master` and `pragma_table_info`, both queried with bound
//! parameters.
//!
//! Also provides two auxiliary helpers that are not used by dump or edit:
//! [`table_schema`] returns the literal `CREATE TABLE` statement, and
//! [`generate_struct`] emits a Rust struct skeleton for a table's columns.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};
use table_json_core::{ColumnDescriptor, ColumnType, validate_identifier};

use crate::error::{Result, TableJsonError};

/// Returns an error unless `table` names an existing table or view.
///
/// Matching ignores ASCII case, as SQLite does for identifiers.
pub(crate) fn ensure_table(conn: &Connection, table: &str) -> Result<()> {
    validate_identifier(table)?;
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1 COLLATE NOCASE",
            params![table],
            |row| row.get(0),
        )
        .optional()?;
    match found {
        Some(_) => Ok(()),
        None => Err(TableJsonError::UnknownTable(table.to_string())),
    }
}

/// Lists the declared columns of a table in definition order.
///
/// # Errors
///
/// Returns [`TableJsonError::UnknownTable`] if the table does not exist.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<ColumnDescriptor>> {
    ensure_table(conn, table)?;
    let mut stmt =
        conn.prepare("SELECT name, type FROM pragma_table_info(?1) ORDER BY cid")?;
    let columns = stmt
        .query_map(params![table], |row| {
            let name: String = row.get(0)?;
            let declared: Option<String> = row.get(1)?;
            Ok(ColumnDescriptor::new(name, declared.as_deref()))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Fetches the `CREATE TABLE` statement for a table.
///
/// Returns `None` if no table with that name exists.
pub fn table_schema(conn: &Connection, table: &str) -> Result<Option<String>> {
    let sql = conn
        .query_row(
            "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE",
            params![table],
            |row| row.get::<_, Option<String>>(0),
        )
        .optional()?;
    Ok(sql.flatten())
}

/// Generates a Rust struct skeleton mirroring a table's columns.
///
/// Every field is optional since any cell may be `NULL`. BLOB and
/// unrecognized columns map to `serde_json::Value`. Column names that are
/// not valid Rust identifiers are sanitized and keep their original name
/// through `#[serde(rename)]`.
pub fn generate_struct(conn: &Connection, table: &str) -> Result<String> {
    let columns = table_columns(conn, table)?;

    let mut out = String::new();
    out.push_str("use serde::{Deserialize, Serialize};\n\n");
    out.push_str(&format!("/// Row of the `{table}` table.\n"));
    out.push_str("#[derive(Debug, Clone, Default, Serialize, Deserialize)]\n");
    out.push_str(&format!("pub struct {}Entity {{\n", pascal_case(table)));
    for column in &columns {
        let field = field_name(&column.name);
        if !column.column_type.as_str().is_empty() {
            out.push_str(&format!("    /// `{}` column.\n", column.column_type));
        }
        if field != column.name {
            out.push_str(&format!(
                "    #[serde(rename = \"{}\")]\n",
                column.name.replace('\\', "\\\\").replace('"', "\\\"")
            ));
        }
        out.push_str(&format!(
            "    pub {field}: Option<{}>,\n",
            rust_type(&column.column_type)
        ));
    }
    out.push_str("}\n");
    Ok(out)
}

/// Writes [`generate_struct`] output to `<table>_entity.rs` in `dir`.
pub fn write_struct_file(conn: &Connection, table: &str, dir: &Path) -> Result<PathBuf> {
    let source = generate_struct(conn, table)?;
    let path = dir.join(format!("{}_entity.rs", field_name(table)));
    fs::write(&path, source).map_err(|err| TableJsonError::io(&path, err))?;
    Ok(path)
}

fn rust_type(column_type: &ColumnType) -> &'static str {
    match column_type {
        ColumnType::Integer => "i64",
        ColumnType::Real => "f64",
        ColumnType::Text => "String",
        ColumnType::Blob | ColumnType::Unrecognized(_) => "serde_json::Value",
    }
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait",
    "true", "type", "unsafe", "use", "where", "while", "yield",
];

/// Turns an arbitrary column name into a snake_case Rust field name.
fn field_name(name: &str) -> String {
    let mut field: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if field.is_empty() || field.starts_with(|c: char| c.is_ascii_digit()) {
        field.insert(0, '_');
    }
    if RUST_KEYWORDS.contains(&field.as_str()) {
        field.push('_');
    }
    field
}

fn pascal_case(name: &str) -> String {
    let mut out = String::new();
    for word in name.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars);
        }
    }
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, 'T');
    }
    out
}
