use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1440,
            height: 900,
        }
    }
}

#[derive(Debug, Error)]
pub enum ViewportParseError {
    #[error("Invalid viewport format: expected WIDTHxHEIGHT (e.g., 1440x900)")]
    InvalidFormat,
    #[error("Invalid width: {0}")]
    InvalidWidth(String),
    #[error("Invalid height: {0}")]
    InvalidHeight(String),
    #[error("Width must be positive")]
    ZeroWidth,
    #[error("Height must be positive")]
    ZeroHeight,
}

impl FromStr for Viewport {
    type Err = ViewportParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let parts: Vec<&str> = lower.split('x').collect();
        if parts.len() != 2 {
            return Err(ViewportParseError::InvalidFormat);
        }

        let width: u32 = parts[0]
            .trim()
            .parse()
            .map_err(|_| ViewportParseError::InvalidWidth(parts[0].to_string()))?;

        let height: u32 = parts[1]
            .trim()
            .parse()
            .map_err(|_| ViewportParseError::InvalidHeight(parts[1].to_string()))?;

        if width == 0 {
            return Err(ViewportParseError::ZeroWidth);
        }
        if height == 0 {
            return Err(ViewportParseError::ZeroHeight);
        }

        Ok(Viewport { width, height })
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A named device breakpoint the collector rendered at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub name: String,
    #[serde(flatten)]
    pub viewport: Viewport,
}

impl Breakpoint {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            viewport: Viewport { width, height },
        }
    }
}

pub fn default_breakpoints() -> Vec<Breakpoint> {
    vec![
        Breakpoint::new("desktop", 1440, 900),
        Breakpoint::new("tablet", 834, 1112),
        Breakpoint::new("mobile", 390, 844),
    ]
}

/// Parse `desktop=1440x900,tablet=834x1112`.
///
/// Malformed entries are skipped; when nothing usable remains the default
/// desktop/tablet/mobile set is returned.
pub fn parse_breakpoints(raw: Option<&str>) -> Vec<Breakpoint> {
    let Some(raw) = raw else {
        return default_breakpoints();
    };

    let parsed: Vec<Breakpoint> = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let (name, size) = part.split_once('=')?;
            let viewport = size.parse::<Viewport>().ok()?;
            Some(Breakpoint {
                name: name.trim().to_string(),
                viewport,
            })
        })
        .collect();

    if parsed.is_empty() {
        default_breakpoints()
    } else {
        parsed
    }
}

/// Parse a comma-separated theme list, falling back to `["default"]`.
pub fn parse_theme_modes(raw: Option<&str>) -> Vec<String> {
    let modes: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();
    if modes.is_empty() {
        vec!["default".to_string()]
    } else {
        modes
    }
}
