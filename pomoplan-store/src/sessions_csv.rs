//! Append-only session log: one `date,category,blocks` row per logged block.

use pomoplan_core::time::format_date;
use pomoplan_core::{LogEntry, SessionLog, StorageError, parse_date};
use serde::Deserialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::warn;

const HEADER: [&str; 3] = ["date", "category", "blocks"];

#[derive(Debug, Deserialize)]
struct SessionRow {
    #[serde(default)]
    date: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    blocks: String,
}

impl SessionRow {
    fn into_entry(self) -> Result<LogEntry, String> {
        let date = parse_date(&self.date).map_err(|e| e.to_string())?;
        let count: u32 = self
            .blocks
            .trim()
            .parse()
            .map_err(|_| format!("bad block count '{}'", self.blocks))?;
        let category = match self.category.trim() {
            "" => "other".to_string(),
            c => c.to_lowercase(),
        };
        Ok(LogEntry {
            date,
            category,
            count,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CsvSessionLog {
    path: PathBuf,
}

impl CsvSessionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn needs_header(&self) -> bool {
        fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true)
    }
}

impl SessionLog for CsvSessionLog {
    fn append(&mut self, entry: &LogEntry) -> Result<(), StorageError> {
        let ctx = || format!("append {}", self.path.display());
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| StorageError::new(ctx(), e))?;
        }

        let header = self.needs_header();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StorageError::new(ctx(), e))?;
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if header {
            wtr.write_record(HEADER).map_err(|e| StorageError::new(ctx(), e))?;
        }
        let count = entry.count.to_string();
        wtr.write_record([format_date(entry.date).as_str(), entry.category.as_str(), count.as_str()])
            .map_err(|e| StorageError::new(ctx(), e))?;
        wtr.flush().map_err(|e| StorageError::new(ctx(), e))
    }

    /// Rows with an unreadable date or count are skipped one by one.
    fn read_all(&self) -> Result<Vec<LogEntry>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| StorageError::new(format!("open {}", self.path.display()), e))?;

        let mut entries = Vec::new();
        for (i, result) in rdr.deserialize::<SessionRow>().enumerate() {
            let line = i + 2;
            let parsed = result
                .map_err(|e| e.to_string())
                .and_then(SessionRow::into_entry);
            match parsed {
                Ok(entry) => entries.push(entry),
                Err(reason) => {
                    warn!(path = %self.path.display(), line, %reason, "skipping session row");
                }
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, category: &str, blocks: &str) -> SessionRow {
        SessionRow {
            date: date.into(),
            category: category.into(),
            blocks: blocks.into(),
        }
    }

    #[test]
    fn row_parsing() {
        let e = row("2026-02-03", "Exam", "2").into_entry().unwrap();
        assert_eq!(e.category, "exam");
        assert_eq!(e.count, 2);

        assert_eq!(row("2026-02-03", "", "1").into_entry().unwrap().category, "other");
        assert!(row("yesterday", "exam", "1").into_entry().is_err());
        assert!(row("2026-02-03", "exam", "two").into_entry().is_err());
        assert!(row("2026-02-03", "exam", "-1").into_entry().is_err());
    }
}
