/*
 *  config.rs
 *
 *  PhaseScope - stereo field monitor
 *  (c) 2025-26 the PhaseScope authors
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Which view the engine renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Goniometer,
    Correlation,
    Balance,
    History,
}

impl DisplayMode {
    /// Parse a mode name as it appears in config files and the UI;
    /// unknown names fall back to the goniometer.
    pub fn from_name(name: &str) -> DisplayMode {
        match name {
            "goniometer" | "gonio" | "vectorscope" => DisplayMode::Goniometer,
            "correlation" | "corr" => DisplayMode::Correlation,
            "balance" | "stereo_balance" => DisplayMode::Balance,
            "history" | "correlation_history" => DisplayMode::History,
            &_ => DisplayMode::Goniometer,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DisplayMode::Goniometer => "goniometer",
            DisplayMode::Correlation => "correlation",
            DisplayMode::Balance => "balance",
            DisplayMode::History => "history",
        }
    }
}

/// Engine-owned render configuration. Mutated only through the
/// controller setters; every renderer reads it fresh each tick, so a
/// change lands on the next frame, never mid-frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub mode: DisplayMode,
    pub show_grid: bool,
    pub show_labels: bool,
    pub show_history: bool,
    pub show_midside: bool,
    pub show_warnings: bool,
    /// Trace retention, in 50ms units.
    pub trace_length: u32,
    /// Amplitude scaling applied to the goniometer figure.
    pub sensitivity: f32,
    pub color_scheme: String,
    /// Hard render-rate ceiling; <= 0 renders on every refresh tick.
    pub target_fps: i32,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Goniometer,
            show_grid: true,
            show_labels: true,
            show_history: true,
            show_midside: false,
            show_warnings: true,
            trace_length: 20,
            sensitivity: 1.0,
            color_scheme: "studio".to_string(),
            target_fps: 60,
        }
    }
}

impl VizConfig {
    /// Put any invariants here (required fields, ranges, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trace_length == 0 {
            return Err(ConfigError::Validation("trace_length must be > 0".into()));
        }
        if !self.sensitivity.is_finite() || self.sensitivity <= 0.0 {
            return Err(ConfigError::Validation(
                "sensitivity must be finite and > 0".into(),
            ));
        }
        if self.target_fps > 240 {
            return Err(ConfigError::Validation("target_fps must be <= 240".into()));
        }
        Ok(())
    }
}

/// Top-level demo-binary configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub viz: Option<VizConfig>,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone)]
#[command(name = "phasescope", about = "PhaseScope stereo field monitor", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub width: Option<u32>,
    #[arg(long)]
    pub height: Option<u32>,
    /// goniometer | correlation | balance | history
    #[arg(long)]
    pub mode: Option<String>,
    #[arg(long)]
    pub color_scheme: Option<String>,
    #[arg(long)]
    pub target_fps: Option<i32>,
    #[arg(long)]
    pub sensitivity: Option<f32>,
    #[arg(long, action = ArgAction::Set)]
    pub show_grid: Option<bool>,
    #[arg(long, action = ArgAction::Set)]
    pub show_labels: Option<bool>,
    #[arg(long, action = ArgAction::Set)]
    pub show_history: Option<bool>,
    #[arg(long, action = ArgAction::Set)]
    pub show_warnings: Option<bool>,
    /// Replay a YAML script of samples instead of the synthetic feed
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub script: Option<PathBuf>,
    /// Write the final frame as a PPM image on exit
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub snapshot: Option<PathBuf>,
    /// How long to run, in seconds
    #[arg(long, default_value_t = 10)]
    pub duration_secs: u64,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point for the demo binary: parse CLI, read YAML, merge,
/// validate.
pub fn load() -> Result<(AppConfig, VizConfig, Cli), ConfigError> {
    let cli = Cli::parse();

    // 1) defaults (from `Default` impls)
    let mut app = AppConfig::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            merge(&mut app, read_yaml(p)?);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        merge(&mut app, read_yaml(&p)?);
    }

    // 3) CLI overrides (highest precedence)
    let mut viz = app.viz.clone().unwrap_or_default();
    apply_cli_overrides(&mut app, &mut viz, &cli);

    // 4) Validate
    viz.validate()?;

    if cli.dump_config {
        let merged = AppConfig { viz: Some(viz.clone()), ..app.clone() };
        let s = serde_yaml::to_string(&merged)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok((app, viz, cli))
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/phasescope/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/phasescope/config.yaml");
        if p.exists() {
            return Some(p);
        }
        let p = home.join(".config/phasescope.yaml");
        if p.exists() {
            return Some(p);
        }
    }
    // project local
    for candidate in &["phasescope.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return Some(p);
        }
    }
    None
}

fn read_yaml(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: AppConfig = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut AppConfig, src: AppConfig) {
    if src.log_level.is_some() {
        dst.log_level = src.log_level;
    }
    if src.width.is_some() {
        dst.width = src.width;
    }
    if src.height.is_some() {
        dst.height = src.height;
    }
    if src.viz.is_some() {
        dst.viz = src.viz;
    }
}

fn apply_cli_overrides(app: &mut AppConfig, viz: &mut VizConfig, cli: &Cli) {
    if cli.log_level.is_some() {
        app.log_level = cli.log_level.clone();
    }
    if cli.width.is_some() {
        app.width = cli.width;
    }
    if cli.height.is_some() {
        app.height = cli.height;
    }
    if let Some(mode) = cli.mode.as_deref() {
        viz.mode = DisplayMode::from_name(mode);
    }
    if let Some(scheme) = cli.color_scheme.as_ref() {
        viz.color_scheme = scheme.clone();
    }
    if let Some(fps) = cli.target_fps {
        viz.target_fps = fps;
    }
    if let Some(s) = cli.sensitivity {
        viz.sensitivity = s;
    }
    if let Some(v) = cli.show_grid {
        viz.show_grid = v;
    }
    if let Some(v) = cli.show_labels {
        viz.show_labels = v;
    }
    if let Some(v) = cli.show_history {
        viz.show_history = v;
    }
    if let Some(v) = cli.show_warnings {
        viz.show_warnings = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names_round_trip() {
        for mode in [
            DisplayMode::Goniometer,
            DisplayMode::Correlation,
            DisplayMode::Balance,
            DisplayMode::History,
        ] {
            assert_eq!(DisplayMode::from_name(mode.name()), mode);
        }
        assert_eq!(DisplayMode::from_name("bogus"), DisplayMode::Goniometer);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(VizConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut cfg = VizConfig::default();
        cfg.trace_length = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = VizConfig::default();
        cfg.sensitivity = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = VizConfig::default();
        cfg.sensitivity = f32::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "viz:\n  mode: balance\n  target_fps: 30\n";
        let app: AppConfig = serde_yaml::from_str(yaml).unwrap();
        let viz = app.viz.unwrap();
        assert_eq!(viz.mode, DisplayMode::Balance);
        assert_eq!(viz.target_fps, 30);
        // untouched fields come from Default
        assert!(viz.show_grid);
        assert_eq!(viz.color_scheme, "studio");
    }
}
