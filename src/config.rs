use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::viewport::{default_breakpoints, Breakpoint};
use crate::{DsxError, Result, Viewport};

/// Engine thresholds and caps. Every field has a default so a config file only
/// needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Entries kept in each token scale before the rest become outliers.
    pub top_n: usize,
    pub root_font_size: f64,
    pub neutral_saturation: f64,
    pub min_target_size: f64,
    pub visibility_floor: f64,
    pub contrast_min_bg_alpha: f64,
    pub candidate_cap: usize,
    pub sample_cap: usize,
    pub large_area: f64,
    pub allow_anchor_active: bool,
    /// Viewport discovery candidates were captured in.
    pub viewport: Viewport,
    pub breakpoints: Vec<Breakpoint>,
    pub theme_modes: Vec<String>,
    /// Selector paths to keep; empty keeps every sample.
    pub selected_paths: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top_n: 12,
            root_font_size: 16.0,
            neutral_saturation: 0.18,
            min_target_size: 44.0,
            visibility_floor: 24.0,
            contrast_min_bg_alpha: 0.9,
            candidate_cap: 12,
            sample_cap: 6,
            large_area: 20000.0,
            allow_anchor_active: false,
            viewport: Viewport::default(),
            breakpoints: default_breakpoints(),
            theme_modes: vec!["default".to_string()],
            selected_paths: Vec::new(),
        }
    }
}

impl Config {
    /// Load from `path`, else the central config file, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let candidate = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::central_config_path().filter(|p| p.exists()),
        };
        match candidate {
            Some(p) => {
                let raw = fs::read_to_string(&p)?;
                Self::from_toml(&raw)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// `$XDG_CONFIG_HOME/dsx/config.toml`, falling back to
    /// `~/.config/dsx/config.toml`.
    pub fn central_config_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("dsx").join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(DsxError::Config("top_n must be at least 1".to_string()));
        }
        if !(self.root_font_size.is_finite() && self.root_font_size > 0.0) {
            return Err(DsxError::Config(format!(
                "root_font_size must be positive, got {}",
                self.root_font_size
            )));
        }
        if !(0.0..=1.0).contains(&self.neutral_saturation) {
            return Err(DsxError::Config(format!(
                "neutral_saturation must be within 0..=1, got {}",
                self.neutral_saturation
            )));
        }
        if !(0.0..=1.0).contains(&self.contrast_min_bg_alpha) {
            return Err(DsxError::Config(format!(
                "contrast_min_bg_alpha must be within 0..=1, got {}",
                self.contrast_min_bg_alpha
            )));
        }
        for (name, value) in [
            ("min_target_size", self.min_target_size),
            ("visibility_floor", self.visibility_floor),
            ("large_area", self.large_area),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(DsxError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.candidate_cap == 0 || self.sample_cap == 0 {
            return Err(DsxError::Config(
                "candidate_cap and sample_cap must be at least 1".to_string(),
            ));
        }
        if let Some(bp) = self
            .breakpoints
            .iter()
            .find(|bp| bp.name.trim().is_empty() || bp.viewport.width == 0 || bp.viewport.height == 0)
        {
            return Err(DsxError::Config(format!(
                "breakpoint '{}' needs a name and a non-zero size",
                bp.name
            )));
        }
        Ok(())
    }

    /// Expected `breakpoint x theme` combinations.
    pub fn expected_combinations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.breakpoints.iter().flat_map(move |bp| {
            self.theme_modes
                .iter()
                .map(move |theme| (bp.name.as_str(), theme.as_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_values_match_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.top_n, 12);
        assert_eq!(cfg.root_font_size, 16.0);
        assert_eq!(cfg.sample_cap, 6);
        assert_eq!(cfg.candidate_cap, 12);
        assert_eq!(cfg.viewport.height, 900);
        let names: Vec<&str> = cfg.breakpoints.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["desktop", "tablet", "mobile"]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = Config::from_toml(
            r#"
            top_n = 8
            allow_anchor_active = true
            theme_modes = ["light", "dark"]

            [[breakpoints]]
            name = "wide"
            width = 1920
            height = 1080
            "#,
        )
        .unwrap();
        assert_eq!(cfg.top_n, 8);
        assert!(cfg.allow_anchor_active);
        assert_eq!(cfg.breakpoints, vec![Breakpoint::new("wide", 1920, 1080)]);
        assert_eq!(cfg.min_target_size, 44.0);
        assert_eq!(cfg.expected_combinations().count(), 2);
    }

    #[test]
    fn load_reads_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "root_font_size = 10.0").unwrap();
        let cfg = Config::load(Some(file.path())).unwrap();
        assert_eq!(cfg.root_font_size, 10.0);
    }

    #[test]
    fn load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "top_n = \"many\"").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, DsxError::ConfigParse(_)));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let zero_top = Config {
            top_n: 0,
            ..Config::default()
        };
        assert!(zero_top.validate().unwrap_err().to_string().contains("top_n"));

        let bad_alpha = Config {
            contrast_min_bg_alpha: 1.5,
            ..Config::default()
        };
        assert!(bad_alpha.validate().is_err());

        let bad_breakpoint = Config {
            breakpoints: vec![Breakpoint::new("", 100, 100)],
            ..Config::default()
        };
        assert!(bad_breakpoint
            .validate()
            .unwrap_err()
            .to_string()
            .contains("breakpoint"));
    }
}
