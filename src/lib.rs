//! Extracts PNG screenshots embedded as byte arrays in integration test
//! response data.

use std::path::Path;

pub mod cli;
pub mod config;
pub mod core;
pub mod exit;
pub mod extract;
pub mod ui;

/// Extracts every screenshot in `json_file` into `output_dir`, printing
/// progress to stdout.
///
/// Returns the number of entries found in the report, whether or not each
/// one had data, or `0` when the report could not be read or a file could
/// not be written.
pub fn extract(json_file: &Path, output_dir: &Path) -> usize {
    let cfg = ui::UiConfig::default();
    let mut observer = ui::ConsoleObserver::new(&cfg);
    let result = extract::Extractor::default().extract_with(json_file, output_dir, &mut observer);
    observer.finish();
    match result {
        Ok(summary) => summary.found,
        Err(err) => {
            ui::print_extract_error(&err, &cfg);
            0
        }
    }
}
