//! The results document handed to the reporting step.
//!
//! Field names follow the collector's `results.json` layout so existing
//! report templates keep working.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::core::{ComponentType, StateName};
use super::fonts::{FontFace, FontProbe, FontRequest};
use super::sample::StateDiff;

/// One ranked raw value and how often it was observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEntry {
    pub value: String,
    pub count: usize,
}

/// A frequency-ranked `top` scale plus its long tail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBucket {
    pub top: Vec<TokenEntry>,
    pub outliers: Vec<TokenEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTokens {
    pub neutrals: Vec<TokenEntry>,
    pub accents: Vec<TokenEntry>,
    pub opacity: Vec<TokenEntry>,
    pub outliers: Vec<TokenEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypographyTokens {
    pub scale: Vec<TokenEntry>,
    pub line_heights: Vec<TokenEntry>,
    pub letter_spacing: Vec<TokenEntry>,
    pub weights: Vec<TokenEntry>,
    pub outliers: Vec<TokenEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleTokens {
    pub scale: Vec<TokenEntry>,
    pub outliers: Vec<TokenEntry>,
}

impl From<TokenBucket> for ScaleTokens {
    fn from(bucket: TokenBucket) -> Self {
        Self {
            scale: bucket.top,
            outliers: bucket.outliers,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionTokens {
    pub durations: Vec<TokenEntry>,
    pub easings: Vec<TokenEntry>,
    pub properties: Vec<TokenEntry>,
    pub outliers: Vec<TokenEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveTokens {
    pub color: ColorTokens,
    pub typography: TypographyTokens,
    pub spacing: ScaleTokens,
    pub radius: ScaleTokens,
    pub border_width: ScaleTokens,
    pub shadow: ScaleTokens,
    pub motion: MotionTokens,
    pub z_index: ScaleTokens,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub primitive: PrimitiveTokens,
}

// ============================================================================
// Interaction model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMatrixEntry {
    pub component: ComponentType,
    pub id: String,
    pub states: Vec<StateName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDiffEntry {
    pub component: ComponentType,
    pub id: String,
    pub state: StateName,
    #[serde(flatten)]
    pub diff: StateDiff,
}

/// Properties observed to change per state, across all samples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionPatterns {
    pub hover: Vec<String>,
    pub focus_visible: Vec<String>,
    pub pressed_selected: Vec<String>,
    pub overlays: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionModel {
    pub state_matrix: Vec<StateMatrixEntry>,
    pub state_diffs: Vec<StateDiffEntry>,
    pub patterns: InteractionPatterns,
}

// ============================================================================
// Density rhythm and layout grammar
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub median: f64,
    pub p25: f64,
    pub p75: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueSeries {
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DensityRhythm {
    pub control_heights: BTreeMap<ComponentType, StatsSummary>,
    pub card_padding_gaps: ValueSeries,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerStep {
    pub breakpoint: String,
    pub width: Option<String>,
    pub max_width: Option<String>,
    pub padding_left: Option<String>,
    pub padding_right: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gutter {
    pub left: Option<String>,
    pub right: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRule {
    pub display: Option<String>,
    pub grid_template: Option<String>,
    pub gap: Option<String>,
    pub breakpoint: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutGrammar {
    pub container_steps: Vec<ContainerStep>,
    pub gutters: BTreeMap<String, Vec<Gutter>>,
    pub grid_rules: Vec<GridRule>,
    pub min_card_width: BTreeMap<String, f64>,
}

// ============================================================================
// Accessibility
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusRingSample {
    pub id: String,
    pub component: ComponentType,
    pub outline: Option<String>,
    pub outline_width: Option<String>,
    pub outline_offset: Option<String>,
    pub box_shadow: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusRingReport {
    pub samples: Vec<FocusRingSample>,
    /// Component types with a captured focus state but no ring evidence.
    pub gaps: Vec<ComponentType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSizeFinding {
    pub id: String,
    pub component: ComponentType,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastSample {
    pub id: String,
    pub component: ComponentType,
    pub fg: String,
    pub bg: String,
    pub ratio: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReducedMotion {
    pub detected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityReport {
    pub focus_ring: FocusRingReport,
    pub target_sizes: Vec<TargetSizeFinding>,
    pub contrast_samples: Vec<ContrastSample>,
    pub reduced_motion: ReducedMotion,
}

// ============================================================================
// Font forensics
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationStatus {
    Verified,
    Unverified,
}

/// How a font claim was (or was not) corroborated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontEvidence {
    /// A computed family matched a declared `@font-face`.
    DeclaredFaceMatch,
    /// Font files were fetched and some computed family was observed.
    NetworkAndComputed,
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontConclusion {
    pub primary_families: Vec<String>,
    pub fallbacks: Vec<String>,
    pub variable_axes: Vec<String>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontVerdict {
    pub status: VerificationStatus,
    pub evidence: FontEvidence,
    /// Computed family that produced a declared-face match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_family: Option<String>,
    pub conclusion: FontConclusion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontForensics {
    pub verified_status: VerificationStatus,
    pub evidence: FontEvidence,
    pub network_requests: Vec<FontRequest>,
    pub font_faces: Vec<FontFace>,
    pub computed_probes: Vec<FontProbe>,
    pub conclusion: FontConclusion,
}

// ============================================================================
// Tech stack (stylesheet fingerprint)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordHits {
    pub matches: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylingFingerprint {
    pub name: String,
    pub confidence: String,
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechStack {
    pub styling: StylingFingerprint,
    pub ui_libs: Vec<String>,
    pub keyword_hits: BTreeMap<String, KeywordHits>,
}

// ============================================================================
// Document
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsMeta {
    pub site_name: String,
    pub breakpoints: BTreeMap<String, String>,
    pub theme_modes: Vec<String>,
    pub sample_count: usize,
    pub candidate_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsDocument {
    pub version: String,
    pub meta: ResultsMeta,
    pub tokens: Tokens,
    pub interaction_model: InteractionModel,
    pub density_rhythm: DensityRhythm,
    pub layout_grammar: LayoutGrammar,
    pub accessibility: AccessibilityReport,
    pub font_forensics: FontForensics,
    pub tech_stack: TechStack,
    pub notes: Vec<String>,
}

