//! Per-element observations: full component samples and discovery candidates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::core::{BoundingBox, CandidateGroup, ComponentType, StateName, StyleMap};

/// One observed UI element instance, as recorded by the collector.
///
/// `states` and `diffs` arrive empty or partially filled and are completed by
/// the interaction-state diff stage; failed captures stay in place as
/// [`StateCapture::Failed`] so coverage gaps remain visible. A collector
/// `"diffs": {"error": ...}` marker is moved into `capture_error` on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SampleRecord")]
pub struct Sample {
    pub id: String,
    pub component_type: ComponentType,
    #[serde(default)]
    pub page: String,
    #[serde(default)]
    pub breakpoint: String,
    #[serde(default)]
    pub theme: String,
    /// Selector the element was discovered with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default)]
    pub selector_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub bbox: BoundingBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_path: Option<String>,
    #[serde(default)]
    pub computed: StyleMap,
    /// Anchor tag, nested in an anchor, or a real `href`. A `role` of `link`
    /// counts too, see [`Sample::is_navigational`].
    #[serde(default)]
    pub navigational: bool,
    #[serde(default)]
    pub states: BTreeMap<StateName, StateCapture>,
    #[serde(default)]
    pub diffs: BTreeMap<StateName, StateDiff>,
    /// Set when the element could not be re-located for state capture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_error: Option<String>,
    #[serde(default)]
    pub below_visibility_floor: bool,
}

impl Sample {
    pub fn is_navigational(&self) -> bool {
        self.navigational
            || self
                .role
                .as_deref()
                .is_some_and(|role| role.trim().eq_ignore_ascii_case("link"))
    }
}

/// `diffs` as written by the collector: per-state diffs, or a single error
/// when the element could not be re-located.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordedDiffs {
    Failed { error: String },
    Diffs(BTreeMap<StateName, StateDiff>),
}

impl Default for RecordedDiffs {
    fn default() -> Self {
        RecordedDiffs::Diffs(BTreeMap::new())
    }
}

#[derive(Debug, Deserialize)]
struct SampleRecord {
    id: String,
    component_type: ComponentType,
    #[serde(default)]
    page: String,
    #[serde(default)]
    breakpoint: String,
    #[serde(default)]
    theme: String,
    #[serde(default)]
    selector: Option<String>,
    #[serde(default)]
    selector_path: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    aria_label: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    bbox: BoundingBox,
    #[serde(default)]
    crop_path: Option<String>,
    #[serde(default)]
    computed: StyleMap,
    #[serde(default)]
    navigational: bool,
    #[serde(default)]
    states: BTreeMap<StateName, StateCapture>,
    #[serde(default)]
    diffs: RecordedDiffs,
    #[serde(default)]
    capture_error: Option<String>,
    #[serde(default)]
    below_visibility_floor: bool,
}

impl From<SampleRecord> for Sample {
    fn from(record: SampleRecord) -> Self {
        let (diffs, capture_error) = match record.diffs {
            RecordedDiffs::Diffs(diffs) => (diffs, record.capture_error),
            RecordedDiffs::Failed { error } => {
                (BTreeMap::new(), record.capture_error.or(Some(error)))
            }
        };
        Sample {
            id: record.id,
            component_type: record.component_type,
            page: record.page,
            breakpoint: record.breakpoint,
            theme: record.theme,
            selector: record.selector,
            selector_path: record.selector_path,
            role: record.role,
            aria_label: record.aria_label,
            text: record.text,
            bbox: record.bbox,
            crop_path: record.crop_path,
            computed: record.computed,
            navigational: record.navigational,
            states: record.states,
            diffs,
            capture_error,
            below_visibility_floor: record.below_visibility_floor,
        }
    }
}

/// Result of capturing one interaction state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateCapture {
    Failed {
        error: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        reason: String,
    },
    Captured(StyleMap),
}

impl StateCapture {
    pub fn failed(error: impl Into<String>, reason: impl Into<String>) -> Self {
        StateCapture::Failed {
            error: error.into(),
            reason: reason.into(),
        }
    }

    pub fn styles(&self) -> Option<&StyleMap> {
        match self {
            StateCapture::Captured(styles) => Some(styles),
            StateCapture::Failed { .. } => None,
        }
    }

    /// Reason recorded alongside a failed capture (empty when none).
    pub fn reason(&self) -> &str {
        match self {
            StateCapture::Failed { reason, .. } => reason,
            StateCapture::Captured(_) => "",
        }
    }
}

/// Properties that changed between the default state and one alternate state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDiff {
    #[serde(default)]
    pub changed: BTreeMap<String, [String; 2]>,
    #[serde(default)]
    pub reason: String,
}

/// A raw element observation fed to broad discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateObservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub group: CandidateGroup,
    #[serde(default)]
    pub page: String,
    #[serde(default)]
    pub breakpoint: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default)]
    pub selector_path: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub bbox: BoundingBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_path: Option<String>,
    #[serde(default)]
    pub computed: StyleMap,
}

/// A scored discovery candidate. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub group: CandidateGroup,
    pub page: String,
    pub breakpoint: String,
    pub theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    pub selector_path: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    pub bbox: BoundingBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_path: Option<String>,
    pub computed: StyleMap,
    pub score: f64,
    /// Names of the scoring rules that contributed to `score`.
    #[serde(default)]
    pub matched_rules: Vec<String>,
    #[serde(default)]
    pub below_visibility_floor: bool,
}
