//! Loading a collector's evidence directory.
//!
//! Layout (relative to the directory root):
//!
//! | file | required | contents |
//! |------|----------|----------|
//! | `samples.json` | yes, unless candidates only | list of samples |
//! | `candidates.json` | no | list of discovery observations |
//! | `fonts/font-requests.json` | no | `{count, items}` or a list |
//! | `network/requests.jsonl` | no | one network entry per line |
//! | `fonts/font-faces.json` | no | declared `@font-face` rules, wrapped or a list |
//! | `fonts/font-probes.json` | no | computed font probes, wrapped or a list |
//! | `css/*.css` | no | stylesheet text |
//! | `pages.json` | no | page key to `{url, error?, stage?}` |
//! | `limits.json` | no | list of limit strings |
//!
//! Every optional list file may also be written as `{count, items}`.
//! Missing optional files contribute nothing and are logged at `warn`.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::synthesis::classify_font_requests;
use crate::types::{CandidateObservation, FontFace, FontProbe, FontRequest, NetworkEntry, Sample};
use crate::{DsxError, Result};

pub const SAMPLES_FILE: &str = "samples.json";
pub const CANDIDATES_FILE: &str = "candidates.json";
pub const FONT_REQUESTS_FILE: &str = "fonts/font-requests.json";
pub const NETWORK_FILE: &str = "network/requests.jsonl";
pub const FONT_FACES_FILE: &str = "fonts/font-faces.json";
pub const FONT_PROBES_FILE: &str = "fonts/font-probes.json";
pub const CSS_DIR: &str = "css";
pub const PAGES_FILE: &str = "pages.json";
pub const LIMITS_FILE: &str = "limits.json";

/// Outcome of collecting one page key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Stylesheet {
    /// Path relative to the evidence root.
    pub file: String,
    pub text: String,
}

/// Everything read from one evidence directory.
#[derive(Debug, Clone, Default)]
pub struct EvidenceBatch {
    pub samples: Vec<Sample>,
    pub candidates: Vec<CandidateObservation>,
    pub font_requests: Vec<FontRequest>,
    pub font_faces: Vec<FontFace>,
    pub font_probes: Vec<FontProbe>,
    pub stylesheets: Vec<Stylesheet>,
    pub pages: BTreeMap<String, PageRecord>,
    pub limits: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub require_samples: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            require_samples: true,
        }
    }
}

/// A list file written either bare or as `{count, items}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListFile<T> {
    List(Vec<T>),
    Wrapped { items: Vec<T> },
}

impl<T> ListFile<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            ListFile::List(items) => items,
            ListFile::Wrapped { items } => items,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EvidenceDir {
    root: PathBuf,
}

impl EvidenceDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn load(&self, options: LoadOptions) -> Result<EvidenceBatch> {
        let meta = tokio::fs::metadata(&self.root).await.map_err(|e| {
            DsxError::input(
                self.root.display().to_string(),
                format!("evidence directory not found: {e}"),
            )
        })?;
        if !meta.is_dir() {
            return Err(DsxError::input(
                self.root.display().to_string(),
                "evidence path is not a directory",
            ));
        }

        let (samples, candidates, font_requests, font_faces, font_probes, stylesheets, pages, limits) = futures::try_join!(
            self.load_samples(options.require_samples),
            self.load_list::<CandidateObservation>(CANDIDATES_FILE),
            self.load_font_requests(),
            self.load_list::<FontFace>(FONT_FACES_FILE),
            self.load_list::<FontProbe>(FONT_PROBES_FILE),
            self.load_stylesheets(),
            self.load_json::<BTreeMap<String, PageRecord>>(PAGES_FILE),
            self.load_list::<String>(LIMITS_FILE),
        )?;

        info!(
            samples = samples.len(),
            candidates = candidates.len(),
            font_requests = font_requests.len(),
            stylesheets = stylesheets.len(),
            "loaded evidence from {}",
            self.root.display()
        );

        Ok(EvidenceBatch {
            samples,
            candidates,
            font_requests,
            font_faces,
            font_probes,
            stylesheets,
            pages: pages.unwrap_or_default(),
            limits,
        })
    }

    async fn read_optional(&self, file: &str) -> Result<Option<String>> {
        let path = self.root.join(file);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(file, "optional evidence file missing");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn load_json<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>> {
        match self.read_optional(file).await? {
            Some(raw) => parse_json(file, &raw).map(Some),
            None => Ok(None),
        }
    }

    async fn load_list<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        Ok(self
            .load_json::<ListFile<T>>(file)
            .await?
            .map(ListFile::into_items)
            .unwrap_or_default())
    }

    async fn load_samples(&self, required: bool) -> Result<Vec<Sample>> {
        let path = self.root.join(SAMPLES_FILE);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => parse_json(SAMPLES_FILE, &raw),
            Err(e) if e.kind() == ErrorKind::NotFound && !required => {
                debug!("no samples.json, continuing with candidates only");
                Ok(Vec::new())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(DsxError::input(
                SAMPLES_FILE,
                format!("required file not found in {}", self.root.display()),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Font requests from the dedicated file, else classified from the raw
    /// network log.
    async fn load_font_requests(&self) -> Result<Vec<FontRequest>> {
        if let Some(file) = self.load_json::<ListFile<FontRequest>>(FONT_REQUESTS_FILE).await? {
            return Ok(file.into_items());
        }
        match self.read_optional(NETWORK_FILE).await? {
            Some(raw) => {
                let entries = parse_jsonl::<NetworkEntry>(NETWORK_FILE, &raw)?;
                let fonts = classify_font_requests(entries);
                debug!(count = fonts.len(), "classified font requests from network log");
                Ok(fonts)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn load_stylesheets(&self) -> Result<Vec<Stylesheet>> {
        let dir = self.root.join(CSS_DIR);
        let mut reader = match tokio::fs::read_dir(&dir).await {
            Ok(reader) => reader,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(dir = CSS_DIR, "no stylesheet directory");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("css")) {
                paths.push(path);
            }
        }
        paths.sort();

        let reads = paths.into_iter().map(|path| async move {
            let text = tokio::fs::read_to_string(&path).await?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            Ok::<_, DsxError>(Stylesheet {
                file: format!("{CSS_DIR}/{name}"),
                text,
            })
        });
        futures::future::try_join_all(reads).await
    }
}

fn parse_json<T: DeserializeOwned>(file: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| DsxError::input(file, e.to_string()))
}

/// One JSON value per non-blank line.
pub fn parse_jsonl<T: DeserializeOwned>(file: &str, raw: &str) -> Result<Vec<T>> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map_err(|e| DsxError::input(file, format!("line {}: {e}", i + 1)))
        })
        .collect()
}

/// Raw discovery observations from a standalone file.
pub async fn load_candidate_observations(path: &Path) -> Result<Vec<CandidateObservation>> {
    let file = path.display().to_string();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DsxError::input(&file, format!("candidate file not found: {e}")))?;
    parse_json(&file, &raw)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SelectedEntry {
    Path(String),
    Element {
        #[serde(default)]
        selector_path: Option<String>,
        #[serde(default)]
        selector: Option<String>,
    },
}

/// Selector paths from a selection file: a JSON list of selector strings, or
/// of objects carrying `selector_path` (preferred) or `selector`.
pub fn parse_selected_paths(file: &str, raw: &str) -> Result<Vec<String>> {
    let entries: Vec<SelectedEntry> = parse_json(file, raw)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            SelectedEntry::Path(path) => Some(path),
            SelectedEntry::Element {
                selector_path,
                selector,
            } => selector_path.filter(|p| !p.is_empty()).or(selector),
        })
        .filter(|p| !p.is_empty())
        .collect())
}

pub async fn load_selected_paths(path: &Path) -> Result<Vec<String>> {
    let file = path.display().to_string();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DsxError::input(&file, format!("selection file not found: {e}")))?;
    parse_selected_paths(&file, &raw)
}
