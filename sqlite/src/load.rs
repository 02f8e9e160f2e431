//! JSON to table import.
//!
//! An edit replaces every row of one table with the row-objects of a JSON
//! array. The work happens on a staged copy of the database (see
//! [`StagedDatabase`]): the delete-all and every `INSERT` run in a single
//! transaction, and the copy is only kept once that transaction commits.
//!
//! # Example
//!
//! ```no_run
//! use table_json_sqlite::{EditOptions, edit_table};
//!
//! let report = edit_table("app.db", "users", "users.json", &EditOptions::default()).unwrap();
//! println!("{} rows written to {}", report.inserted, report.staged_path.display());
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, params_from_iter};
use serde_json::{Map, Value};
use table_json_core::{BindValue, quote_identifier, validate_identifier};
use tracing::{debug, info};

use crate::convert;
use crate::error::{Result, TableJsonError};
use crate::schema::table_columns;
use crate::staging::{DEFAULT_STAGING_DIR, StagedDatabase};

/// One input row: column name to JSON value.
pub type RowObject = Map<String, Value>;

/// Settings for [`edit_table`].
#[derive(Debug, Clone)]
pub struct EditOptions {
    /// Directory that receives the staged database copy.
    pub staging_dir: PathBuf,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
        }
    }
}

/// Row counts from [`load_rows`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadCounts {
    pub deleted: usize,
    pub inserted: usize,
}

/// Outcome of a successful [`edit_table`].
#[derive(Debug, Clone)]
pub struct EditReport {
    /// The committed staging copy holding the edited table.
    pub staged_path: PathBuf,
    pub deleted: usize,
    pub inserted: usize,
}

/// Replaces the rows of `table` with the row-objects in `json_path`.
///
/// The JSON file is parsed before any database is touched. The database at
/// `db_path` is copied into `options.staging_dir` and only the copy is
/// modified, so the original file is unchanged whether or not the edit
/// succeeds.
///
/// # Errors
///
/// Returns [`TableJsonError::Json`] or [`TableJsonError::InvalidDocument`]
/// for bad input, [`TableJsonError::UnknownTable`] /
/// [`TableJsonError::UnknownColumn`] for names missing from the schema,
/// and [`TableJsonError::Database`] if any statement fails. On error the
/// staged copy is removed.
pub fn edit_table(
    db_path: impl AsRef<Path>,
    table: &str,
    json_path: impl AsRef<Path>,
    options: &EditOptions,
) -> Result<EditReport> {
    let db_path = db_path.as_ref();
    let rows = read_rows(json_path.as_ref())?;

    let staged = StagedDatabase::acquire(db_path, &options.staging_dir)?;
    let mut conn = Connection::open(staged.path())?;
    let counts = load_rows(&mut conn, table, &rows)?;
    conn.close().map_err(|(_, err)| err)?;
    let staged_path = staged.commit();

    info!(
        table,
        database = %db_path.display(),
        staged = %staged_path.display(),
        deleted = counts.deleted,
        inserted = counts.inserted,
        "edited table"
    );

    Ok(EditReport {
        staged_path,
        deleted: counts.deleted,
        inserted: counts.inserted,
    })
}

/// Reads a JSON file holding an array of row-objects.
pub fn read_rows(json_path: &Path) -> Result<Vec<RowObject>> {
    let data = fs::read(json_path).map_err(|err| TableJsonError::io(json_path, err))?;
    let doc: Value =
        serde_json::from_slice(&data).map_err(|err| TableJsonError::json(json_path, err))?;
    parse_rows(doc)
}

/// Splits a JSON document into row-objects.
///
/// # Errors
///
/// Returns [`TableJsonError::InvalidDocument`] unless `doc` is an array
/// whose elements are all objects.
pub fn parse_rows(doc: Value) -> Result<Vec<RowObject>> {
    let Value::Array(items) = doc else {
        return Err(TableJsonError::InvalidDocument(format!(
            "expected an array of row objects, found {}",
            json_kind(&doc)
        )));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(TableJsonError::InvalidDocument(format!(
                "row {index} is {}, expected an object",
                json_kind(&other)
            ))),
        })
        .collect()
}

/// Deletes every row of `table`, then inserts one row per object.
///
/// Runs in a single transaction; on error nothing is applied.
pub fn load_rows(conn: &mut Connection, table: &str, rows: &[RowObject]) -> Result<LoadCounts> {
    let known: HashSet<String> = table_columns(conn, table)?
        .into_iter()
        .map(|column| column.name.to_ascii_lowercase())
        .collect();
    let quoted_table = quote_identifier(table);

    let tx = conn.transaction()?;
    let deleted = tx.execute(&format!("DELETE FROM {quoted_table}"), [])?;
    debug!(table, deleted, "cleared table");

    let mut inserted = 0;
    for (index, row) in rows.iter().enumerate() {
        let (sql, params) = build_insert(table, &quoted_table, &known, index, row)?;
        debug!(%sql, params = params.len(), "inserting row");
        tx.execute(&sql, params_from_iter(params.iter()))?;
        inserted += 1;
    }
    tx.commit()?;

    Ok(LoadCounts { deleted, inserted })
}

/// Builds the `INSERT` statement and bind parameters for one row-object.
fn build_insert(
    table: &str,
    quoted_table: &str,
    known: &HashSet<String>,
    index: usize,
    row: &RowObject,
) -> Result<(String, Vec<rusqlite::types::Value>)> {
    if row.is_empty() {
        return Ok((format!("INSERT INTO {quoted_table} DEFAULT VALUES"), Vec::new()));
    }

    let mut columns = Vec::with_capacity(row.len());
    let mut placeholders = Vec::with_capacity(row.len());
    let mut params = Vec::with_capacity(row.len());
    let mut seen = HashSet::with_capacity(row.len());
    for (position, (column, value)) in row.iter().enumerate() {
        validate_identifier(column)?;
        let folded = column.to_ascii_lowercase();
        if !known.contains(&folded) {
            return Err(TableJsonError::UnknownColumn {
                table: table.to_string(),
                column: column.clone(),
            });
        }
        if !seen.insert(folded) {
            return Err(TableJsonError::InvalidDocument(format!(
                "row {index} names column '{column}' more than once"
            )));
        }
        let bound = BindValue::from_json(value).map_err(|err| {
            TableJsonError::InvalidDocument(format!("row {index}, column '{column}': {err}"))
        })?;
        columns.push(quote_identifier(column));
        placeholders.push(format!("?{}", position + 1));
        params.push(convert::bind_to_sql(bound));
    }

    let sql = format!(
        "INSERT INTO {quoted_table} ({}) VALUES ({})",
        columns.join(", "),
        placeholders.join(", ")
    );
    Ok((sql, params))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
