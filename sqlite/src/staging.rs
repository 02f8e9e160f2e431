//! Staging copies of database files.
//!
//! An edit never opens the original database for writing. Instead the file
//! is copied into a clean staging directory and the copy is mutated. A
//! [`StagedDatabase`] that is dropped without [`commit`](StagedDatabase::commit)
//! removes its copy, so only fully successful edits leave a staged file
//! behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, TableJsonError};

/// Default staging directory, relative to the working directory.
pub const DEFAULT_STAGING_DIR: &str = "generated";

/// A writable copy of a database file inside the staging directory.
///
/// # Examples
///
/// ```no_run
/// use table_json_sqlite::StagedDatabase;
///
/// let staged = StagedDatabase::acquire("app.db", "generated").unwrap();
/// let conn = rusqlite::Connection::open(staged.path()).unwrap();
/// conn.execute("DELETE FROM users", []).unwrap();
/// drop(conn);
/// let path = staged.commit();
/// assert!(path.ends_with("app.db"));
/// ```
#[derive(Debug)]
pub struct StagedDatabase {
    path: PathBuf,
    committed: bool,
}

impl StagedDatabase {
    /// Copies `source` into `staging_dir`, discarding anything already there.
    ///
    /// # Errors
    ///
    /// Returns [`TableJsonError::StagingConflict`] if `source` lives inside
    /// `staging_dir`, and [`TableJsonError::Io`] if the directory cannot be
    /// created or the file cannot be copied. A failure to remove the old
    /// directory is only logged.
    pub fn acquire(source: impl AsRef<Path>, staging_dir: impl AsRef<Path>) -> Result<Self> {
        let source = source.as_ref();
        let staging_dir = staging_dir.as_ref();

        let file_name = source.file_name().ok_or_else(|| {
            TableJsonError::io(
                source,
                io::Error::new(io::ErrorKind::InvalidInput, "database path has no file name"),
            )
        })?;
        let canonical_source =
            fs::canonicalize(source).map_err(|err| TableJsonError::io(source, err))?;
        if let Ok(canonical_dir) = fs::canonicalize(staging_dir) {
            if canonical_source.starts_with(&canonical_dir) {
                return Err(TableJsonError::StagingConflict {
                    database: source.to_path_buf(),
                    staging_dir: staging_dir.to_path_buf(),
                });
            }
        }

        match fs::remove_dir_all(staging_dir) {
            Ok(()) => debug!(dir = %staging_dir.display(), "cleared staging directory"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(
                dir = %staging_dir.display(),
                error = %err,
                "failed to clear staging directory"
            ),
        }
        fs::create_dir_all(staging_dir).map_err(|err| TableJsonError::io(staging_dir, err))?;

        let path = staging_dir.join(file_name);
        let bytes = fs::copy(source, &path).map_err(|err| TableJsonError::io(source, err))?;
        debug!(
            source = %source.display(),
            staged = %path.display(),
            bytes,
            "staged database copy"
        );

        Ok(Self {
            path,
            committed: false,
        })
    }

    /// Path of the staged copy.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keeps the staged copy and returns its path.
    pub fn commit(mut self) -> PathBuf {
        self.committed = true;
        std::mem::take(&mut self.path)
    }
}

impl Drop for StagedDatabase {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => warn!(staged = %self.path.display(), "discarded uncommitted staging copy"),
            Err(err) => warn!(
                staged = %self.path.display(),
                error = %err,
                "failed to discard uncommitted staging copy"
            ),
        }
    }
}
