use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const DEFAULT_INPUT: &str = "build/integration_response_data.json";
pub const DEFAULT_OUTPUT_DIR: &str = "assets/screenshots";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveConfig {
    pub paths: PathsConfig,
    pub extract: ExtractConfig,
    pub ui: UiConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathsConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractConfig {
    pub keep_going: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiConfig {
    pub color: bool,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                input: PathBuf::from(DEFAULT_INPUT),
                output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            },
            extract: ExtractConfig { keep_going: false },
            ui: UiConfig { color: true },
            config_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    paths: Option<RawPathsConfig>,
    extract: Option<RawExtractConfig>,
    ui: Option<RawUiConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPathsConfig {
    input: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawExtractConfig {
    keep_going: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawUiConfig {
    color: Option<bool>,
}

pub fn default_config_path(home_dir: &Path) -> PathBuf {
    home_dir.join(".config/shotextract/config.toml")
}

/// Resolves the effective config. An explicit `config_path` must exist; the
/// default location under `home_dir` is optional.
pub fn load(config_path: Option<&Path>, home_dir: Option<&Path>) -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();

    let path = match (config_path, home_dir) {
        (Some(p), _) => {
            if !p.exists() {
                bail!("config file not found: {}", p.display());
            }
            Some(p.to_path_buf())
        }
        (None, Some(home)) => Some(default_config_path(home)).filter(|p| p.exists()),
        (None, None) => None,
    };

    if let Some(path) = path {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let raw: RawConfig = toml::from_str(&s)
            .with_context(|| format!("failed to parse config file (TOML): {}", path.display()))?;
        apply_raw_config(&mut cfg, raw);
        cfg.config_path = Some(path.display().to_string());
    }

    apply_env_overrides(&mut cfg)?;

    Ok(cfg)
}

pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn apply_raw_config(cfg: &mut EffectiveConfig, raw: RawConfig) {
    if let Some(paths) = raw.paths {
        if let Some(input) = paths.input {
            cfg.paths.input = input;
        }
        if let Some(output_dir) = paths.output_dir {
            cfg.paths.output_dir = output_dir;
        }
    }

    if let Some(extract) = raw.extract {
        if let Some(keep_going) = extract.keep_going {
            cfg.extract.keep_going = keep_going;
        }
    }

    if let Some(ui) = raw.ui {
        if let Some(color) = ui.color {
            cfg.ui.color = color;
        }
    }
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) -> Result<()> {
    if let Some(v) = std::env::var_os("SHOTEXTRACT_INPUT") {
        if !v.is_empty() {
            cfg.paths.input = PathBuf::from(v);
        }
    }
    if let Some(v) = std::env::var_os("SHOTEXTRACT_OUTPUT_DIR") {
        if !v.is_empty() {
            cfg.paths.output_dir = PathBuf::from(v);
        }
    }
    if let Ok(v) = std::env::var("SHOTEXTRACT_KEEP_GOING") {
        cfg.extract.keep_going = parse_bool(&v).context("SHOTEXTRACT_KEEP_GOING")?;
    }
    if let Ok(v) = std::env::var("SHOTEXTRACT_UI_COLOR") {
        cfg.ui.color = parse_bool(&v).context("SHOTEXTRACT_UI_COLOR")?;
    }

    Ok(())
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "invalid boolean: {s} (expected true|false|1|0|yes|no|on|off)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        for s in ["1", "true", "YES", " on "] {
            assert!(parse_bool(s).expect("parse"), "{s}");
        }
        for s in ["0", "False", "no", "OFF"] {
            assert!(!parse_bool(s).expect("parse"), "{s}");
        }
        assert!(parse_bool("maybe").is_err());
        assert!(parse_bool("").is_err());
    }

    #[test]
    fn raw_config_overrides_only_present_keys() {
        let raw: RawConfig = toml::from_str(
            r#"
[paths]
output_dir = "shots"

[extract]
keep_going = true
"#,
        )
        .expect("parse toml");
        let mut cfg = EffectiveConfig::default();
        apply_raw_config(&mut cfg, raw);

        assert_eq!(cfg.paths.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(cfg.paths.output_dir, PathBuf::from("shots"));
        assert!(cfg.extract.keep_going);
        assert!(cfg.ui.color);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let raw = toml::from_str::<RawConfig>("[paths]\ninptu = \"x\"\n");
        assert!(raw.is_err());
    }

    #[test]
    fn effective_config_renders_as_toml() {
        let s = toml::to_string_pretty(&EffectiveConfig::default()).expect("toml");
        assert!(s.contains("[paths]"), "{s}");
        assert!(s.contains("output_dir = \"assets/screenshots\""), "{s}");
        assert!(s.contains("keep_going = false"), "{s}");
    }
}
