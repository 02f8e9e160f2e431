//! SQLite backend for dumping tables to JSON and loading them back.
//!
//! Two operations, each a straight pipeline:
//!
//! - **dump**: `SELECT *` → per-cell type reflection → row objects →
//!   tab-indented JSON array in `<table>.json`.
//! - **edit**: JSON array of row-objects → staged database copy →
//!   delete-all + one parameterized `INSERT` per object, in one transaction.
//!
//! # Architecture
//!
//! - **`convert`**: SQLite value ↔ cell/bind-value conversion
//! - **`dump`**: table export ([`dump_table`], [`extract_rows`])
//! - **`load`**: table import ([`edit_table`], [`load_rows`])
//! - **`staging`**: scoped database copies ([`StagedDatabase`])
//! - **`schema`**: identifier allow-listing against live metadata, plus
//!   the `CREATE TABLE` reader and struct generator
//!
//! # Quick start
//!
//! ```no_run
//! use table_json_sqlite::{DumpOptions, EditOptions, dump_table, edit_table};
//!
//! let dumped = dump_table("app.db", "users", &DumpOptions::default()).unwrap();
//! let edited = edit_table("app.db", "users", &dumped.output_path, &EditOptions::default()).unwrap();
//! assert_eq!(dumped.rows, edited.inserted);
//! ```
//!
//! # Identifiers
//!
//! Values are always bound as parameters. Table and column names are
//! checked against `sqlite_master` / `pragma_table_info` and double-quoted
//! before they are interpolated into SQL.

mod convert;
mod dump;
mod error;
mod load;
mod schema;
mod staging;

pub use convert::BlobFallback;
pub use dump::{DumpOptions, DumpReport, TableSnapshot, dump_table, extract_rows, rows_to_json};
pub use error::{Result, TableJsonError};
pub use load::{
    EditOptions, EditReport, LoadCounts, RowObject, edit_table, load_rows, parse_rows, read_rows,
};
pub use schema::{generate_struct, table_columns, table_schema, write_struct_file};
pub use staging::{DEFAULT_STAGING_DIR, StagedDatabase};
