//! Font evidence batches: network requests, declared faces, computed probes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::core::{BoundingBox, StyleMap};

/// Any network request observed while a page was loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkEntry {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub initiator: Value,
    #[serde(default)]
    pub page_tag: String,
    #[serde(default)]
    pub breakpoint: String,
    #[serde(default)]
    pub theme: String,
}

/// A network request that fetched a font file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontRequest {
    pub url: String,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub initiator: Value,
    #[serde(default)]
    pub page_tag: String,
    #[serde(default)]
    pub breakpoint: String,
    #[serde(default)]
    pub theme: String,
}

impl From<NetworkEntry> for FontRequest {
    fn from(entry: NetworkEntry) -> Self {
        Self {
            url: entry.url,
            status: entry.status,
            content_type: entry.content_type,
            initiator: entry.initiator,
            page_tag: entry.page_tag,
            breakpoint: entry.breakpoint,
            theme: entry.theme,
        }
    }
}

/// A declared `@font-face` rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontFace {
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub font_style: Option<String>,
    #[serde(default)]
    pub font_weight: Option<String>,
    #[serde(default)]
    pub unicode_range: Option<String>,
    /// Where the rule was found (stylesheet URL, inline block index, ...).
    #[serde(default)]
    pub source: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

/// Typography computed on a representative element (body, hero h1, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontProbe {
    #[serde(default)]
    pub page: String,
    pub probe: String,
    #[serde(default)]
    pub selector_used: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
    #[serde(default)]
    pub styles: StyleMap,
}

impl FontProbe {
    pub fn font_family(&self) -> Option<&str> {
        self.styles
            .get("font-family")
            .map(String::as_str)
            .filter(|f| !f.trim().is_empty())
    }
}
