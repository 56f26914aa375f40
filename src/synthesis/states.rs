//! Interaction state diffs and the interaction model built from them.

use tracing::{debug, info};

use crate::types::{
    ComponentType, InteractionModel, InteractionPatterns, Sample, StateCapture, StateDiff,
    StateDiffEntry, StateMatrixEntry, StateName, StyleMap,
};

/// Properties compared between the default state and each alternate state.
pub const STATE_DIFF_PROPS: [&str; 9] = [
    "color",
    "background-color",
    "border-color",
    "outline-color",
    "outline-width",
    "outline-offset",
    "box-shadow",
    "opacity",
    "transform",
];

pub const NAVIGATIONAL_ACTIVE_ERROR: &str = "active skipped for navigational element";
pub const NAVIGATIONAL_ACTIVE_REASON: &str = "skipped navigational element";
const STATE_FAILED: &str = "state failed";
const DEFAULT_MISSING: &str = "default state not captured";

/// Diff one alternate state against the default snapshot.
///
/// A failed capture or a non-empty `reason` yields no changes and keeps the
/// reason. Properties missing from the default snapshot are ignored.
pub fn compute_state_diff(default: &StyleMap, state: &StateCapture, reason: &str) -> StateDiff {
    let styles = match state.styles() {
        Some(styles) if reason.is_empty() => styles,
        _ => {
            let reason = if reason.is_empty() {
                STATE_FAILED
            } else {
                reason
            };
            return StateDiff {
                changed: Default::default(),
                reason: reason.to_string(),
            };
        }
    };

    let changed = STATE_DIFF_PROPS
        .iter()
        .filter_map(|&prop| {
            let before = default.get(prop)?;
            let after = styles.get(prop)?;
            (before != after).then(|| (prop.to_string(), [before.clone(), after.clone()]))
        })
        .collect();

    StateDiff {
        changed,
        reason: String::new(),
    }
}

/// Fill in `diffs` for every state-bearing sample.
///
/// Samples whose default snapshot is missing get `capture_error` and no
/// diffs; one sample failing never affects the others.
pub fn apply_state_diffs(samples: &mut [Sample], allow_anchor_active: bool) {
    let mut diffed = 0usize;
    for sample in samples
        .iter_mut()
        .filter(|s| s.component_type.has_interaction_states())
    {
        if sample.capture_error.is_some() {
            sample.diffs.clear();
            debug!(id = %sample.id, "state capture failed at collection, skipping diffs");
            continue;
        }
        if sample.is_navigational() && !allow_anchor_active {
            sample.states.insert(
                StateName::Active,
                StateCapture::failed(NAVIGATIONAL_ACTIVE_ERROR, NAVIGATIONAL_ACTIVE_REASON),
            );
        }

        let default = match sample.states.get(&StateName::Default) {
            Some(StateCapture::Captured(styles)) => styles.clone(),
            Some(StateCapture::Failed { error, .. }) => {
                sample.capture_error.get_or_insert_with(|| error.clone());
                sample.diffs.clear();
                debug!(id = %sample.id, "default state failed, skipping diffs");
                continue;
            }
            None => {
                sample
                    .capture_error
                    .get_or_insert_with(|| DEFAULT_MISSING.to_string());
                sample.diffs.clear();
                debug!(id = %sample.id, "no default state, skipping diffs");
                continue;
            }
        };

        for state in StateName::ALTERNATES {
            if let Some(capture) = sample.states.get(&state) {
                let diff = compute_state_diff(&default, capture, capture.reason());
                sample.diffs.insert(state, diff);
            }
        }
        diffed += 1;
    }
    info!(samples = diffed, "computed interaction state diffs");
}

fn push_distinct(target: &mut Vec<String>, values: impl IntoIterator<Item = String>) {
    for value in values {
        if !target.contains(&value) {
            target.push(value);
        }
    }
}

pub fn build_interaction_model(samples: &[Sample]) -> InteractionModel {
    let mut model = InteractionModel::default();

    for sample in samples {
        if sample.component_type == ComponentType::OverlayPanel {
            model.patterns.overlays.push(sample.id.clone());
        }
        if sample.states.is_empty() {
            continue;
        }
        model.state_matrix.push(StateMatrixEntry {
            component: sample.component_type,
            id: sample.id.clone(),
            states: sample.states.keys().copied().collect(),
        });

        for (&state, diff) in &sample.diffs {
            let bucket = pattern_bucket(&mut model.patterns, state);
            if let Some(bucket) = bucket {
                push_distinct(bucket, diff.changed.keys().cloned());
            }
            model.state_diffs.push(StateDiffEntry {
                component: sample.component_type,
                id: sample.id.clone(),
                state,
                diff: diff.clone(),
            });
        }
    }

    model
}

fn pattern_bucket(patterns: &mut InteractionPatterns, state: StateName) -> Option<&mut Vec<String>> {
    match state {
        StateName::Hover => Some(&mut patterns.hover),
        StateName::FocusVisible => Some(&mut patterns.focus_visible),
        StateName::Active => Some(&mut patterns.pressed_selected),
        StateName::Default => None,
    }
}
