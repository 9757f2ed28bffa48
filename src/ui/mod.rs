use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::Error;
use indicatif::{ProgressBar, ProgressDrawTarget};

use crate::core::{EntryOutcome, ExtractionSummary};
use crate::extract::{ExtractError, ExtractObserver};

const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct UiConfig {
    pub color: bool,
    pub stderr_is_tty: bool,
    pub quiet: bool,
    pub verbose: bool,
    pub json: bool,
}

pub fn eprintln_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "error: {err}");

    let mut causes = err.chain().skip(1).peekable();
    if causes.peek().is_some() {
        let _ = writeln!(stderr, "caused by:");
        for cause in causes {
            let _ = writeln!(stderr, "  - {cause}");
        }
    }

    let _ = writeln!(stderr, "see `shotextract --help` for usage");
}

pub fn print_banner(input: &Path, output_dir: &Path, cfg: &UiConfig) {
    if cfg.quiet {
        return;
    }
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "🎨 Extracting screenshots from integration test data");
    let _ = writeln!(out, "Input file: {}", input.display());
    let _ = writeln!(out, "Output directory: {}", output_dir.display());
    let _ = writeln!(out, "{}", rule());
}

pub fn print_config_source(config_path: Option<&str>, cfg: &UiConfig) {
    if !cfg.verbose || cfg.quiet {
        return;
    }
    if let Some(path) = config_path {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "Config: {path}");
    }
}

/// Prints an extraction failure in the same place progress goes, or on
/// stderr when stdout carries JSON.
pub fn print_extract_error(err: &ExtractError, cfg: &UiConfig) {
    let mut out: Box<dyn Write> = if cfg.json {
        Box::new(io::stderr().lock())
    } else {
        Box::new(io::stdout().lock())
    };
    let _ = writeln!(out, "Error: {err}");
    if cfg.verbose {
        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            let _ = writeln!(out, "  caused by: {cause}");
            source = cause.source();
        }
    }
}

pub fn print_summary(summary: &ExtractionSummary, cfg: &UiConfig) {
    if cfg.quiet {
        return;
    }
    let mut out = io::stdout().lock();
    if summary.found > 0 {
        let _ = writeln!(out, "{}", rule());
        let _ = writeln!(
            out,
            "✅ Successfully extracted {} screenshots!",
            summary.found
        );
        if cfg.verbose || summary.failed() > 0 {
            let _ = writeln!(
                out,
                "   written={} no_data={} failed={} total={}",
                summary.written(),
                summary.skipped(),
                summary.failed(),
                format_bytes(summary.bytes_written())
            );
        }
        let _ = writeln!(
            out,
            "📁 Screenshots saved to: {}",
            summary.output_dir.display()
        );
    } else {
        print_nothing_extracted(cfg);
    }
}

pub fn print_nothing_extracted(cfg: &UiConfig) {
    if cfg.quiet {
        return;
    }
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "❌ No screenshots were extracted.");
}

/// Renders extraction progress as text lines on stdout, with an optional
/// spinner on stderr.
pub struct ConsoleObserver {
    cfg: UiConfig,
    spinner: Option<ProgressBar>,
}

impl ConsoleObserver {
    pub fn new(cfg: &UiConfig) -> Self {
        let spinner = if cfg.stderr_is_tty && !cfg.quiet {
            let pb = ProgressBar::new_spinner();
            pb.set_draw_target(ProgressDrawTarget::stderr());
            pb.set_message("extracting screenshots...");
            pb.enable_steady_tick(Duration::from_millis(120));
            Some(pb)
        } else {
            None
        };
        Self {
            cfg: cfg.clone(),
            spinner,
        }
    }

    pub fn finish(self) {
        if let Some(pb) = self.spinner {
            pb.finish_and_clear();
        }
    }

    fn line(&self, text: &str) {
        if self.cfg.quiet {
            return;
        }
        let print = || {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{text}");
        };
        match &self.spinner {
            Some(pb) => pb.suspend(print),
            None => print(),
        }
    }
}

impl ExtractObserver for ConsoleObserver {
    fn found(&mut self, count: usize) {
        self.line(&format!("Found {count} screenshots"));
        if let Some(pb) = &self.spinner {
            pb.set_length(count as u64);
        }
    }

    fn entry(&mut self, outcome: &EntryOutcome) {
        if let Some(pb) = &self.spinner {
            pb.inc(1);
        }
        self.line(&format_outcome(outcome, self.cfg.color));
        if self.cfg.verbose {
            if let EntryOutcome::Written { path, .. } = outcome {
                self.line(&format!("  -> {}", path.display()));
            }
        }
    }
}

pub fn format_outcome(outcome: &EntryOutcome, color: bool) -> String {
    match outcome {
        EntryOutcome::Written { name, bytes, .. } => format!(
            "{} Extracted: {name}.png ({bytes} bytes)",
            paint("✓", "32", color)
        ),
        EntryOutcome::NoData { name } => {
            format!("{} No data for: {name}", paint("✗", "33", color))
        }
        EntryOutcome::Failed { name, error, .. } => format!(
            "{} Failed: {name}.png ({error})",
            paint("✗", "31", color)
        ),
    }
}

fn paint(s: &str, code: &str, color: bool) -> String {
    if !color {
        return s.to_string();
    }
    format!("\x1b[{code}m{s}\x1b[0m")
}

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b < KB {
        return format!("{bytes} B");
    }
    if b < MB {
        return format!("{:.1} KiB", b / KB);
    }
    if b < GB {
        return format!("{:.1} MiB", b / MB);
    }
    format!("{:.1} GiB", b / GB)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn outcome_lines_match_console_format() {
        let written = EntryOutcome::Written {
            name: "home".to_string(),
            path: PathBuf::from("out/home.png"),
            bytes: 8,
        };
        assert_eq!(
            format_outcome(&written, false),
            "✓ Extracted: home.png (8 bytes)"
        );

        let skipped = EntryOutcome::NoData {
            name: "blank".to_string(),
        };
        assert_eq!(format_outcome(&skipped, false), "✗ No data for: blank");

        let failed = EntryOutcome::Failed {
            name: "x".to_string(),
            path: PathBuf::from("out/x.png"),
            error: "Is a directory".to_string(),
        };
        assert_eq!(
            format_outcome(&failed, false),
            "✗ Failed: x.png (Is a directory)"
        );
    }

    #[test]
    fn color_wraps_marker_only() {
        let skipped = EntryOutcome::NoData {
            name: "blank".to_string(),
        };
        assert_eq!(
            format_outcome(&skipped, true),
            "\x1b[33m✗\x1b[0m No data for: blank"
        );
    }

    #[test]
    fn format_bytes_uses_binary_units() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB");
    }
}
