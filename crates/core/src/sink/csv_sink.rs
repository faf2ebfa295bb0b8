//! CSV report sink initialized from a template file.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tracing::{debug, info};

use super::{ReportSink, ReportTarget, SinkError};
use crate::report::ReportRow;

/// Writes report rows as CSV records after the template's own content.
///
/// On creation the template is copied to the destination; rows are buffered
/// and appended, without a header, on each save.
#[derive(Debug)]
pub struct CsvReportSink {
    destination: PathBuf,
    pending: Vec<ReportRow>,
    written: usize,
}

impl CsvReportSink {
    /// Copies `template` to the target's destination and opens it for appending.
    pub fn create(template: &Path, target: &ReportTarget) -> Result<Self, SinkError> {
        if !template.is_file() {
            return Err(SinkError::TemplateMissing(template.to_path_buf()));
        }
        let destination = target.destination();
        if let Some(dir) = destination.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|err| SinkError::io(dir, err))?;
        }
        fs::copy(template, &destination).map_err(|err| SinkError::io(&destination, err))?;

        let content = fs::read(&destination).map_err(|err| SinkError::io(&destination, err))?;
        let mut file = open_for_append(&destination)?;
        if content.last().is_some_and(|byte| *byte != b'\n') {
            file.write_all(b"\n")
                .map_err(|err| SinkError::io(&destination, err))?;
        }

        info!(
            template = %template.display(),
            destination = %destination.display(),
            "Report initialized from template"
        );
        Ok(Self {
            destination,
            pending: Vec::new(),
            written: 0,
        })
    }

    /// File the rows are written to.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Rows written by previous saves.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Rows waiting for the next save.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

fn open_for_append(path: &Path) -> Result<File, SinkError> {
    OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|err| SinkError::io(path, err))
}

impl ReportSink for CsvReportSink {
    fn append(&mut self, row: ReportRow) {
        self.pending.push(row);
    }

    fn save(&mut self) -> Result<(), SinkError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let file = open_for_append(&self.destination)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        for row in &self.pending {
            writer.write_record(row.to_record())?;
        }
        writer
            .flush()
            .map_err(|err| SinkError::io(&self.destination, err))?;

        let saved = self.pending.len();
        self.written += saved;
        self.pending.clear();
        debug!(
            destination = %self.destination.display(),
            saved,
            total = self.written,
            "Report rows saved"
        );
        Ok(())
    }
}
