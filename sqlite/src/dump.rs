//! Table to JSON export.
//!
//! Reads every row of one table, reflects each cell into a [`CellValue`]
//! and writes the rows as a tab-indented JSON array to `<table>.json`.
//!
//! # Example
//!
//! ```no_run
//! use table_json_sqlite::{DumpOptions, dump_table};
//!
//! let report = dump_table("app.db", "users", &DumpOptions::default()).unwrap();
//! println!("wrote {} rows to {}", report.rows, report.output_path.display());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use table_json_core::{ColumnDescriptor, Row, quote_identifier};
use tracing::{debug, info};

use crate::convert::{self, BlobFallback, Reflected};
use crate::error::{Result, TableJsonError};
use crate::schema::ensure_table;

/// Settings for [`dump_table`].
#[derive(Debug, Clone)]
pub struct DumpOptions {
    /// Directory receiving `<table>.json`.
    pub output_dir: PathBuf,
    /// Handling of BLOB cells that are not JSON.
    pub blob_fallback: BlobFallback,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            blob_fallback: BlobFallback::default(),
        }
    }
}

/// Rows read from one table, in cursor order.
#[derive(Debug, Clone, Default)]
pub struct TableSnapshot {
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<Row>,
    /// BLOB cells that failed to parse as JSON.
    pub unparsed_blobs: usize,
}

/// Outcome of a successful [`dump_table`].
#[derive(Debug, Clone)]
pub struct DumpReport {
    pub output_path: PathBuf,
    pub rows: usize,
    pub unparsed_blobs: usize,
}

/// Dumps `table` from the database at `db_path` to `<table>.json`.
///
/// The database is opened read-only. Any existing output file is
/// overwritten; nothing is written if reading any row fails.
///
/// # Errors
///
/// Returns [`TableJsonError::UnknownTable`] for a missing table,
/// [`TableJsonError::Database`] for open/query failures and
/// [`TableJsonError::Io`] if the output cannot be written.
pub fn dump_table(
    db_path: impl AsRef<Path>,
    table: &str,
    options: &DumpOptions,
) -> Result<DumpReport> {
    let db_path = db_path.as_ref();
    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    let snapshot = extract_rows(&conn, table, options.blob_fallback)?;
    let output_path = options.output_dir.join(format!("{table}.json"));
    write_rows(&output_path, &snapshot.rows)?;

    info!(
        table,
        database = %db_path.display(),
        output = %output_path.display(),
        rows = snapshot.rows.len(),
        unparsed_blobs = snapshot.unparsed_blobs,
        "dumped table"
    );

    Ok(DumpReport {
        output_path,
        rows: snapshot.rows.len(),
        unparsed_blobs: snapshot.unparsed_blobs,
    })
}

/// Reads every row of `table` into a [`TableSnapshot`].
///
/// # Errors
///
/// Fails on the first row that cannot be read; no partial snapshot is
/// returned.
pub fn extract_rows(
    conn: &Connection,
    table: &str,
    blob_fallback: BlobFallback,
) -> Result<TableSnapshot> {
    ensure_table(conn, table)?;

    let sql = format!("SELECT * FROM {}", quote_identifier(table));
    debug!(%sql, "reading table");
    let mut stmt = conn.prepare(&sql)?;
    let columns: Vec<ColumnDescriptor> = stmt
        .columns()
        .iter()
        .map(|column| ColumnDescriptor::new(column.name(), column.decl_type()))
        .collect();

    let mut snapshot = TableSnapshot {
        columns,
        ..TableSnapshot::default()
    };
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let mut mapped = Row::new();
        for (idx, column) in snapshot.columns.iter().enumerate() {
            let value = row.get_ref(idx)?;
            match convert::reflect_cell(value, column, table, blob_fallback) {
                Reflected::Value(cell) => {
                    mapped.insert(column.name.clone(), cell);
                }
                Reflected::Unset => {}
                Reflected::Unparsed(fallback) => {
                    snapshot.unparsed_blobs += 1;
                    if let Some(cell) = fallback {
                        mapped.insert(column.name.clone(), cell);
                    }
                }
            }
        }
        snapshot.rows.push(mapped);
    }

    debug!(table, rows = snapshot.rows.len(), "read table");
    Ok(snapshot)
}

/// Serializes rows as a tab-indented JSON array.
pub fn rows_to_json(rows: &[Row]) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    rows.serialize(&mut ser)?;
    Ok(buf)
}

fn write_rows(path: &Path, rows: &[Row]) -> Result<()> {
    let json = rows_to_json(rows).map_err(|err| TableJsonError::json(path, err))?;
    fs::write(path, json).map_err(|err| TableJsonError::io(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use table_json_core::CellValue;

    #[test]
    fn test_rows_to_json_uses_tabs() {
        let mut row = Row::new();
        row.insert("id".into(), CellValue::Integer(1));
        let json = String::from_utf8(rows_to_json(&[row]).unwrap()).unwrap();
        assert_eq!(json, "[\n\t{\n\t\t\"id\": 1\n\t}\n]");
    }

    #[test]
    fn test_empty_table_is_empty_array() {
        let json = rows_to_json(&[]).unwrap();
        assert_eq!(json, b"[]");
    }

    #[test]
    fn test_extract_rows_in_memory() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (n INTEGER, label TEXT, extra NUMERIC);
             INSERT INTO t VALUES (NULL, NULL, NULL);",
        )
        .unwrap();

        let snapshot = extract_rows(&conn, "t", BlobFallback::Omit).unwrap();
        assert_eq!(snapshot.columns.len(), 3);
        assert_eq!(snapshot.rows.len(), 1);
        let row = &snapshot.rows[0];
        assert_eq!(row.get("n"), Some(&CellValue::Integer(0)));
        assert_eq!(row.get("label"), Some(&CellValue::Text(String::new())));
        assert!(!row.contains_key("extra"));
    }
}
