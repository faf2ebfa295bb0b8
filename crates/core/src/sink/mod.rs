//! Report sinks.
//!
//! A sink receives finished rows in order and persists them on `save`.
//! `CsvReportSink` writes next to a copied template; `MemorySink` keeps rows
//! in memory for tests and dry runs.

mod csv_sink;
mod error;
mod memory;

pub use csv_sink::CsvReportSink;
pub use error::SinkError;
pub use memory::MemorySink;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::report::ReportRow;

/// Destination of finished report rows.
pub trait ReportSink {
    /// Buffers a row; rows are persisted in the order appended.
    fn append(&mut self, row: ReportRow);

    /// Persists every row appended since the last save.
    fn save(&mut self) -> Result<(), SinkError>;
}

impl<T: ReportSink + ?Sized> ReportSink for &mut T {
    fn append(&mut self, row: ReportRow) {
        (**self).append(row);
    }

    fn save(&mut self) -> Result<(), SinkError> {
        (**self).save()
    }
}

/// Where a report goes: a file, optionally with a sheet name (`file@sheet`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTarget {
    file: PathBuf,
    sheet: Option<String>,
}

impl ReportTarget {
    /// Target file as given.
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Sheet name, if any.
    #[must_use]
    pub fn sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    /// File the rows are written to.
    ///
    /// Without a sheet this is the target file. With one, the sheet name is
    /// inserted before the extension: `out/result.csv@Sheet1` writes to
    /// `out/result.Sheet1.csv`.
    #[must_use]
    pub fn destination(&self) -> PathBuf {
        let Some(sheet) = &self.sheet else {
            return self.file.clone();
        };
        let stem = self
            .file
            .file_stem()
            .map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());
        let extension = self
            .file
            .extension()
            .map_or_else(|| "csv".to_string(), |ext| ext.to_string_lossy().into_owned());
        self.file.with_file_name(format!("{stem}.{sheet}.{extension}"))
    }
}

impl FromStr for ReportTarget {
    type Err = SinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SinkError::InvalidTarget(s.to_string());
        let (file, sheet) = match s.trim().rsplit_once('@') {
            Some((file, sheet)) => {
                let sheet = sheet.trim();
                if sheet.is_empty() {
                    return Err(invalid());
                }
                (file.trim(), Some(sheet.to_string()))
            }
            None => (s.trim(), None),
        };
        if file.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            file: PathBuf::from(file),
            sheet,
        })
    }
}

impl std::fmt::Display for ReportTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file.display())?;
        if let Some(sheet) = &self.sheet {
            write!(f, "@{sheet}")?;
        }
        Ok(())
    }
}
