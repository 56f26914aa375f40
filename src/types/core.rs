//! Core types shared by every synthesis stage.
//!
//! - [`BoundingBox`] - Element geometry in device-independent pixels
//! - [`ComponentType`] - Closed vocabulary of sampled component kinds
//! - [`CandidateGroup`] - Semantic groups used during broad discovery
//! - [`StateName`] - Interaction states captured per sample
//! - [`StyleMap`] - Raw computed-style values keyed by CSS property

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Computed style values keyed by CSS property name, exactly as the browser
/// reported them.
pub type StyleMap = BTreeMap<String, String>;

/// Rectangle bounds for an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl BoundingBox {
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// True when either dimension is below `floor`.
    pub fn is_below(&self, floor: f64) -> bool {
        self.width < floor || self.height < floor
    }
}

/// Kind of UI component a sample was collected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Typography,
    Navbar,
    NavLink,
    Container,
    Card,
    GridContainer,
    Input,
    Chip,
    Button,
    OverlayPanel,
    #[serde(other)]
    Other,
}

impl ComponentType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Typography => "typography",
            ComponentType::Navbar => "navbar",
            ComponentType::NavLink => "nav_link",
            ComponentType::Container => "container",
            ComponentType::Card => "card",
            ComponentType::GridContainer => "grid_container",
            ComponentType::Input => "input",
            ComponentType::Chip => "chip",
            ComponentType::Button => "button",
            ComponentType::OverlayPanel => "overlay_panel",
            ComponentType::Other => "other",
        }
    }

    /// Component types whose hover/focus/active states are captured.
    pub const fn has_interaction_states(&self) -> bool {
        matches!(
            self,
            ComponentType::Button
                | ComponentType::NavLink
                | ComponentType::Input
                | ComponentType::Chip
                | ComponentType::Card
        )
    }

    /// Component types summarized as control heights in the density rhythm.
    pub const fn is_control(&self) -> bool {
        matches!(
            self,
            ComponentType::Button | ComponentType::Input | ComponentType::Chip
        )
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic group assigned to a discovery candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateGroup {
    Cta,
    Button,
    Nav,
    Headline,
    Text,
    Media,
    Card,
    Tag,
}

impl CandidateGroup {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CandidateGroup::Cta => "cta",
            CandidateGroup::Button => "button",
            CandidateGroup::Nav => "nav",
            CandidateGroup::Headline => "headline",
            CandidateGroup::Text => "text",
            CandidateGroup::Media => "media",
            CandidateGroup::Card => "card",
            CandidateGroup::Tag => "tag",
        }
    }
}

impl fmt::Display for CandidateGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interaction state a computed-style snapshot was taken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateName {
    Default,
    Hover,
    FocusVisible,
    Active,
}

impl StateName {
    /// The states compared against `Default`, in capture order.
    pub const ALTERNATES: [StateName; 3] =
        [StateName::Hover, StateName::FocusVisible, StateName::Active];

    pub const fn as_str(&self) -> &'static str {
        match self {
            StateName::Default => "default",
            StateName::Hover => "hover",
            StateName::FocusVisible => "focus_visible",
            StateName::Active => "active",
        }
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
