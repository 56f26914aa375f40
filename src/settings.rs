use std::path::Path;

use dsx_lib::viewport::{parse_breakpoints, parse_theme_modes};
use dsx_lib::{Config, DsxError, Viewport};

/// Tracks which CLI flags were explicitly provided vs. defaulted.
#[derive(Debug, Default)]
pub struct SynthesizeFlagSources {
    pub top_n: bool,
    pub root_font_size: bool,
    pub breakpoints: bool,
    pub theme_modes: bool,
}

impl SynthesizeFlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            top_n: flag_present(args, "--top-n"),
            root_font_size: flag_present(args, "--root-font-size"),
            breakpoints: flag_present(args, "--breakpoints"),
            theme_modes: flag_present(args, "--theme-modes"),
        }
    }
}

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Synthesize flags as parsed, before merging with the config file.
#[derive(Debug, Clone, Default)]
pub struct SynthesizeOverrides {
    pub top_n: usize,
    pub root_font_size: f64,
    pub allow_anchor_active: bool,
    pub breakpoints: Option<String>,
    pub theme_modes: Option<String>,
    pub selected_paths: Option<Vec<String>>,
}

/// Merge CLI arguments into the loaded config, preferring CLI when flags are
/// present. A set switch always wins; an unset one defers to the config.
pub fn resolve_synthesize_settings(
    cli: SynthesizeOverrides,
    config: &Config,
    flags: &SynthesizeFlagSources,
) -> Config {
    let mut resolved = config.clone();
    if flags.top_n {
        resolved.top_n = cli.top_n;
    }
    if flags.root_font_size {
        resolved.root_font_size = cli.root_font_size;
    }
    resolved.allow_anchor_active = cli.allow_anchor_active || config.allow_anchor_active;
    if flags.breakpoints {
        resolved.breakpoints = parse_breakpoints(cli.breakpoints.as_deref());
    }
    if flags.theme_modes {
        resolved.theme_modes = parse_theme_modes(cli.theme_modes.as_deref());
    }
    if let Some(paths) = cli.selected_paths {
        resolved.selected_paths = paths;
    }
    resolved
}

/// Candidate viewport: the flag when given, else the configured one.
pub fn resolve_viewport(cli_viewport: Viewport, config: &Config, args: &[String]) -> Viewport {
    if flag_present(args, "--viewport") {
        cli_viewport
    } else {
        config.viewport
    }
}

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/dsx/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, DsxError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        DsxError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    validate_config(&cfg, path)?;
    Ok(cfg)
}

/// Validate a config, naming its source in the error.
pub fn validate_config(cfg: &Config, path: Option<&Path>) -> Result<(), DsxError> {
    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        DsxError::Config(prefix)
    })
}

/// Format effective config as a single-line string.
pub fn format_effective_config(config: &Config, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let breakpoints = config
        .breakpoints
        .iter()
        .map(|bp| format!("{}={}", bp.name, bp.viewport))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "Effective config [{source}]: top_n={}, root_font_size={}, neutral_saturation={:.2}, min_target_size={}, visibility_floor={}, caps: candidates={}, samples={}, allow_anchor_active={}, viewport={}, breakpoints={}, theme_modes={}, selected={}",
        config.top_n,
        config.root_font_size,
        config.neutral_saturation,
        config.min_target_size,
        config.visibility_floor,
        config.candidate_cap,
        config.sample_cap,
        config.allow_anchor_active,
        config.viewport,
        breakpoints,
        config.theme_modes.join(","),
        config.selected_paths.len(),
    )
}
