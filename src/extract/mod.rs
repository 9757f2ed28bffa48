use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::core::{DEFAULT_SCREENSHOT_NAME, EntryOutcome, ExtractionSummary, Report, ScreenshotEntry};

mod error;

pub use error::ExtractError;

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Record per-entry failures and continue instead of aborting.
    pub keep_going: bool,
}

/// Receives progress while entries are processed.
pub trait ExtractObserver {
    fn found(&mut self, _count: usize) {}
    fn entry(&mut self, _outcome: &EntryOutcome) {}
}

/// Observer that ignores everything.
pub struct Silent;

impl ExtractObserver for Silent {}

#[derive(Debug, Clone, Default)]
pub struct Extractor {
    opts: ExtractOptions,
}

impl Extractor {
    pub fn new(opts: ExtractOptions) -> Self {
        Self { opts }
    }

    pub fn extract(&self, input: &Path, output_dir: &Path) -> Result<ExtractionSummary, ExtractError> {
        self.extract_with(input, output_dir, &mut Silent)
    }

    pub fn extract_with(
        &self,
        input: &Path,
        output_dir: &Path,
        observer: &mut dyn ExtractObserver,
    ) -> Result<ExtractionSummary, ExtractError> {
        fs::create_dir_all(output_dir).map_err(|source| ExtractError::CreateOutputDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let report = load_report(input)?;
        observer.found(report.screenshots.len());

        let mut summary = ExtractionSummary {
            input: input.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            found: report.screenshots.len(),
            entries: Vec::with_capacity(report.screenshots.len()),
        };

        for (index, value) in report.screenshots.iter().enumerate() {
            let outcome = match write_entry(index + 1, value, output_dir) {
                Ok(outcome) => outcome,
                Err(err) if self.opts.keep_going => failed_outcome(err, output_dir)?,
                Err(err) => return Err(err),
            };
            observer.entry(&outcome);
            summary.entries.push(outcome);
        }

        Ok(summary)
    }
}

/// `index` is 1-based and only used in messages.
fn write_entry(index: usize, value: &Value, output_dir: &Path) -> Result<EntryOutcome, ExtractError> {
    let entry = ScreenshotEntry::from_value(value).map_err(|source| ExtractError::InvalidEntry {
        index,
        name: DEFAULT_SCREENSHOT_NAME.to_string(),
        source,
    })?;
    let name = entry.name();
    let data = match entry.data() {
        Ok(Some(data)) => data,
        Ok(None) => return Ok(EntryOutcome::NoData { name }),
        Err(source) => return Err(ExtractError::InvalidEntry { index, name, source }),
    };

    let path = entry_path(output_dir, &entry);
    if let Err(source) = fs::write(&path, &data) {
        return Err(ExtractError::WriteFailed {
            entry: name,
            path,
            source,
        });
    }

    Ok(EntryOutcome::Written {
        name,
        path,
        bytes: data.len() as u64,
    })
}

/// Turns a per-entry error into a recorded failure; anything else stays fatal.
fn failed_outcome(err: ExtractError, output_dir: &Path) -> Result<EntryOutcome, ExtractError> {
    match err {
        ExtractError::WriteFailed {
            entry,
            path,
            source,
        } => Ok(EntryOutcome::Failed {
            name: entry,
            path,
            error: source.to_string(),
        }),
        ExtractError::InvalidEntry { name, source, .. } => Ok(EntryOutcome::Failed {
            path: output_dir.join(format!("{name}.png")),
            name,
            error: source.to_string(),
        }),
        other => Err(other),
    }
}

pub fn entry_path(output_dir: &Path, entry: &ScreenshotEntry) -> PathBuf {
    output_dir.join(entry.file_name())
}

/// Only text that is not JSON at all counts as malformed; a valid document
/// with the wrong layout is reported separately.
pub fn load_report(path: &Path) -> Result<Report, ExtractError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ExtractError::InputNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(ExtractError::ReadInput {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let value: Value = serde_json::from_str(&text).map_err(|source| ExtractError::InputMalformed {
        path: path.to_path_buf(),
        source,
    })?;
    Report::from_value(&value).map_err(|source| ExtractError::UnexpectedLayout {
        path: path.to_path_buf(),
        source,
    })
}
