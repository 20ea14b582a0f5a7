// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration for axe-assert

use crate::engine::RunOptions;
use crate::error::{Error, Result};
use crate::report::Palette;
use crate::results::Impact;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Impact levels to judge when a result does not name its own
    pub impact_levels: Vec<Impact>,
    pub color: ColorChoice,
    /// Options handed to the engine on every run
    pub run_options: RunOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn palette(self) -> Palette {
        match self {
            ColorChoice::Never => Palette::Plain,
            ColorChoice::Auto | ColorChoice::Always => Palette::Ansi,
        }
    }

    /// Apply to the process-wide `colored` override
    pub fn apply(self) {
        match self {
            ColorChoice::Auto => colored::control::unset_override(),
            ColorChoice::Always => colored::control::set_override(true),
            ColorChoice::Never => colored::control::set_override(false),
        }
    }
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            other => Err(format!("Unknown color choice: {}", other)),
        }
    }
}

impl Config {
    /// Run options with the configured impact levels folded in
    pub fn effective_run_options(&self) -> RunOptions {
        let mut options = self.run_options.clone();
        if options.impact_levels.is_none() && !self.impact_levels.is_empty() {
            options.impact_levels = Some(self.impact_levels.clone());
        }
        options
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;

    if path.extension().and_then(|s| s.to_str()) == Some("toml") {
        toml::from_str(&content).map_err(|e| Error::Config(format!("TOML parse error: {}", e)))
    } else {
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("YAML parse error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = load_config(Path::new("/nonexistent/axe-assert.yml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.effective_run_options().is_empty());
    }

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("axe-assert.toml");
        std::fs::write(
            &path,
            r#"
impact_levels = ["serious", "critical"]
color = "never"

[run_options.rules.color-contrast]
enabled = false
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.impact_levels, vec![Impact::Serious, Impact::Critical]);
        assert_eq!(config.color.palette(), Palette::Plain);
        assert!(!config.run_options.rules["color-contrast"].enabled);
        assert_eq!(
            config.effective_run_options().impact_levels,
            Some(vec![Impact::Serious, Impact::Critical])
        );
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("axe-assert.yml");
        std::fs::write(&path, "impact_levels: [critical]\ncolor: always\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.impact_levels, vec![Impact::Critical]);
        assert_eq!(config.color, ColorChoice::Always);
    }

    #[test]
    fn test_bad_yaml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("axe-assert.yml");
        std::fs::write(&path, "impact_levels: [blocker]\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_run_options_levels_win() {
        let config = Config {
            impact_levels: vec![Impact::Minor],
            run_options: RunOptions::default().with_impact_levels(&[Impact::Critical]),
            ..Config::default()
        };
        assert_eq!(config.effective_run_options().impact_levels, Some(vec![Impact::Critical]));
    }
}
