use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryOutcome {
    Written {
        name: String,
        path: PathBuf,
        bytes: u64,
    },
    NoData {
        name: String,
    },
    Failed {
        name: String,
        path: PathBuf,
        error: String,
    },
}

impl EntryOutcome {
    pub fn name(&self) -> &str {
        match self {
            EntryOutcome::Written { name, .. }
            | EntryOutcome::NoData { name }
            | EntryOutcome::Failed { name, .. } => name,
        }
    }
}

/// Result of one extraction run. `found` counts every entry in the report,
/// including those that had no data or failed to write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub found: usize,
    pub entries: Vec<EntryOutcome>,
}

impl ExtractionSummary {
    pub fn written(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, EntryOutcome::Written { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, EntryOutcome::NoData { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, EntryOutcome::Failed { .. }))
            .count()
    }

    pub fn bytes_written(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| match e {
                EntryOutcome::Written { bytes, .. } => *bytes,
                _ => 0,
            })
            .sum()
    }
}
