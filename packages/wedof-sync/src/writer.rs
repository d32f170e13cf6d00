//! Sheet writers and the aggregate-to-sheets mirroring step.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::aggregate::Aggregate;
use crate::error::Result;
use crate::sheet::{sheet_name, Sheet};

/// Destination of mirrored sheets.
///
/// Writing a sheet replaces whatever the destination held under that title.
pub trait SheetWriter {
    fn write_sheet(&self, sheet: &Sheet) -> Result<()>;

    /// Human-readable location of the written sheets.
    fn location(&self) -> String;

    /// Check that sheets can be written to the destination.
    fn check(&self) -> Result<()> {
        Ok(())
    }
}

/// Writes each sheet as `<title>.json` in a directory.
#[derive(Debug, Clone)]
pub struct DirectorySheetWriter {
    dir: PathBuf,
}

impl DirectorySheetWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding the sheet with the given title.
    #[must_use]
    pub fn sheet_path(&self, title: &str) -> PathBuf {
        self.dir.join(format!("{title}.json"))
    }
}

impl SheetWriter for DirectorySheetWriter {
    fn write_sheet(&self, sheet: &Sheet) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.sheet_path(&sheet.title);
        let mut out = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut out, sheet)?;
        out.write_all(b"\n")?;
        out.flush()?;

        tracing::info!(
            sheet = %sheet.title,
            rows = sheet.row_count(),
            path = %path.display(),
            "sheet written"
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }

    fn check(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }
}

/// Outcome of mirroring one aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorReport {
    /// `(title, rows)` of each sheet written.
    pub written: Vec<(String, usize)>,
    /// Titles skipped because their collection was empty.
    pub skipped: Vec<String>,
    /// `(title, error)` of each sheet that could not be written.
    pub failed: Vec<(String, String)>,
}

impl MirrorReport {
    #[must_use]
    pub fn rows_written(&self) -> usize {
        self.written.iter().map(|(_, rows)| rows).sum()
    }
}

/// Write one sheet per collection of `aggregate`, in aggregate order.
///
/// Empty collections are skipped. A sheet that fails to write is logged and
/// reported; the remaining sheets are still written.
pub fn mirror_aggregate<W: SheetWriter + ?Sized>(
    writer: &W,
    aggregate: &Aggregate,
) -> MirrorReport {
    tracing::info!(location = %writer.location(), "mirroring collections to sheets");
    let mut report = MirrorReport::default();

    for collection in aggregate.collections() {
        let title = sheet_name(collection.name());

        if collection.records.is_empty() {
            tracing::warn!(sheet = %title, "no data for sheet");
            report.skipped.push(title);
            continue;
        }

        let sheet = Sheet::from_records(title.clone(), &collection.records);
        tracing::info!(sheet = %title, items = sheet.row_count(), "writing sheet");
        match writer.write_sheet(&sheet) {
            Ok(()) => report.written.push((title, sheet.row_count())),
            Err(e) => {
                tracing::error!(sheet = %title, error = %e, "failed to write sheet");
                report.failed.push((title, e.to_string()));
            }
        }
    }

    tracing::info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "mirroring finished"
    );
    report
}
