use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::config::EffectiveConfig;
use crate::core::ExtractionSummary;
use crate::exit::{ExitCode, ExitError};
use crate::extract::{ExtractOptions, Extractor, Silent};
use crate::ui::{ConsoleObserver, UiConfig};

#[derive(Debug, Parser)]
#[command(
    name = "shotextract",
    version,
    about = "Extract PNG screenshots embedded in integration test response data"
)]
pub struct Cli {
    /// JSON report containing a `screenshots` array
    pub json_file: Option<PathBuf>,
    /// Directory the PNG files are written to
    pub output_dir: Option<PathBuf>,

    /// Keep extracting after a screenshot fails to write
    #[arg(long)]
    pub keep_going: bool,
    #[arg(long)]
    pub json: bool,
    #[arg(long = "no-color")]
    pub no_color: bool,
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,
    #[arg(long)]
    pub quiet: bool,
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Print the effective configuration and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Debug, Serialize)]
struct JsonSummary<'a> {
    tool_version: &'static str,
    generated_at: String,
    written: usize,
    no_data: usize,
    failed: usize,
    bytes_written: u64,
    #[serde(flatten)]
    summary: &'a ExtractionSummary,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    run_with(cli)
}

pub fn run_with(cli: Cli) -> Result<()> {
    let stdout_is_tty = io::stdout().is_terminal();
    let stderr_is_tty = io::stderr().is_terminal();

    let home_dir = crate::config::home_dir();
    let env_config_path = std::env::var_os("SHOTEXTRACT_CONFIG")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    let mut cfg = crate::config::load(
        cli.config.as_deref().or(env_config_path.as_deref()),
        home_dir.as_deref(),
    )
    .map_err(crate::exit::invalid_args_err)?;
    apply_cli_overrides(&mut cfg, &cli);

    if cli.show_config {
        return show_config(&cfg, cli.json);
    }

    let ui_cfg = UiConfig {
        color: stdout_is_tty && cfg.ui.color && !cli.no_color,
        stderr_is_tty,
        quiet: cli.quiet || cli.json,
        verbose: cli.verbose,
        json: cli.json,
    };

    let input = cfg.paths.input.clone();
    let output_dir = cfg.paths.output_dir.clone();
    let extractor = Extractor::new(ExtractOptions {
        keep_going: cfg.extract.keep_going,
    });

    crate::ui::print_banner(&input, &output_dir, &ui_cfg);
    crate::ui::print_config_source(cfg.config_path.as_deref(), &ui_cfg);

    let result = if cli.json {
        extractor.extract_with(&input, &output_dir, &mut Silent)
    } else {
        let mut observer = ConsoleObserver::new(&ui_cfg);
        let result = extractor.extract_with(&input, &output_dir, &mut observer);
        observer.finish();
        result
    };

    let summary = match result {
        Ok(summary) => summary,
        Err(err) => {
            crate::ui::print_extract_error(&err, &ui_cfg);
            crate::ui::print_nothing_extracted(&ui_cfg);
            return Err(ExitError::new(ExitCode::NothingExtracted, err.into()).into());
        }
    };

    if cli.json {
        write_json(&summary)?;
    } else {
        crate::ui::print_summary(&summary, &ui_cfg);
    }

    if summary.found == 0 {
        return Err(crate::exit::nothing_extracted());
    }
    Ok(())
}

fn apply_cli_overrides(cfg: &mut EffectiveConfig, cli: &Cli) {
    if let Some(input) = &cli.json_file {
        cfg.paths.input = input.clone();
    }
    if let Some(output_dir) = &cli.output_dir {
        cfg.paths.output_dir = output_dir.clone();
    }
    if cli.keep_going {
        cfg.extract.keep_going = true;
    }
    if cli.no_color {
        cfg.ui.color = false;
    }
}

fn show_config(cfg: &EffectiveConfig, json: bool) -> Result<()> {
    if json {
        let stdout = io::stdout();
        serde_json::to_writer_pretty(stdout.lock(), cfg)?;
        println!();
    } else {
        println!("{}", toml::to_string_pretty(cfg)?);
    }
    Ok(())
}

fn write_json(summary: &ExtractionSummary) -> Result<()> {
    let generated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());
    let doc = JsonSummary {
        tool_version: env!("CARGO_PKG_VERSION"),
        generated_at,
        written: summary.written(),
        no_data: summary.skipped(),
        failed: summary.failed(),
        bytes_written: summary.bytes_written(),
        summary,
    };
    let buf = serde_json::to_vec_pretty(&doc)?;

    let mut stdout = io::stdout().lock();
    match stdout.write_all(&buf) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => return Ok(()),
        Err(err) => return Err(err.into()),
    }
    match stdout.write_all(b"\n") {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(err) => Err(err.into()),
    }
}
