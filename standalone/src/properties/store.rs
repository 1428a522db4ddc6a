//! Loading and rewriting the runtime properties file.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tempfile::NamedTempFile;

use super::record::escape;
use super::ConfigRecord;
use crate::error::{Error, Result};

/// First comment line of every rewritten file.
pub const HEADER_BANNER: &str = "#Last updated by the OpenMRS Standalone application.";

/// Handle on one runtime properties file.
///
/// The store holds no state besides the path. Each [`load`](Self::load)
/// reads the file afresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the managed file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigLoad`] if the file is missing, unreadable, or
    /// not UTF-8.
    pub fn load(&self) -> Result<ConfigRecord> {
        let text = fs::read_to_string(&self.path).map_err(|source| Error::ConfigLoad {
            path: self.path.clone(),
            source,
        })?;
        let record = ConfigRecord::parse(&text);
        log::debug!(
            "loaded {} properties from {}",
            record.len(),
            self.path.display()
        );
        Ok(record)
    }

    /// Replace the file with `record`.
    ///
    /// The new content goes to a temporary file next to the target, is
    /// flushed and synced, and is then renamed over the target. Readers see
    /// either the old file or the complete new one. On failure the temporary
    /// file is removed and the old file is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigWrite`] if any step fails.
    pub fn save(&self, record: &ConfigRecord) -> Result<()> {
        self.write_atomically(&render(record, Local::now()))
            .map_err(|source| Error::ConfigWrite {
                path: self.path.clone(),
                source,
            })?;
        log::debug!(
            "wrote {} properties to {}",
            record.len(),
            self.path.display()
        );
        Ok(())
    }

    fn write_atomically(&self, contents: &str) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir)?;
        {
            let mut out = BufWriter::new(temp.as_file_mut());
            out.write_all(contents.as_bytes())?;
            out.flush()?;
        }
        temp.as_file().sync_all()?;

        if let Ok(meta) = fs::metadata(&self.path) {
            temp.as_file().set_permissions(meta.permissions())?;
        }

        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Render the file body: header block, one `key=value` line per entry in
/// record order, trailing blank line. Keys and values are escaped only where
/// the parser would otherwise misread them.
pub(crate) fn render(record: &ConfigRecord, now: DateTime<Local>) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(HEADER_BANNER);
    out.push('\n');
    out.push('#');
    out.push_str(&now.format("%a %b %d %H:%M:%S %Z %Y").to_string());
    out.push('\n');
    for (key, value) in record.iter() {
        out.push_str(&escape(key, true));
        out.push('=');
        out.push_str(&escape(value, false));
        out.push('\n');
    }
    out.push('\n');
    out
}
