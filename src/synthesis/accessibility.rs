//! Accessibility evidence: undersized targets, focus rings and text contrast.

use std::collections::BTreeSet;

use crate::config::Config;
use crate::types::{
    AccessibilityReport, ComponentType, ContrastSample, FocusRingReport, FocusRingSample,
    ReducedMotion, Sample, StateName, StyleMap, TargetSizeFinding,
};

use super::values::{color_to_string, contrast_ratio, parse_color, parse_length, round_to};

/// Samples with a nonzero box smaller than `min_size` on either axis.
pub fn find_undersized_targets(samples: &[Sample], min_size: f64) -> Vec<TargetSizeFinding> {
    samples
        .iter()
        .filter(|s| s.bbox.width > 0.0 && s.bbox.height > 0.0 && s.bbox.is_below(min_size))
        .map(|s| TargetSizeFinding {
            id: s.id.clone(),
            component: s.component_type,
            width: s.bbox.width,
            height: s.bbox.height,
        })
        .collect()
}

/// Whether a focus-ring property value shows a visible indicator.
fn is_visible_ring_value(prop: &str, value: &str, root_font_size: f64) -> bool {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return false;
    }
    match prop {
        "outline-color" => parse_color(value).map_or(true, |c| c.a > 0.0),
        "outline-width" => parse_length(value, root_font_size).map_or(true, |w| w > 0.0),
        _ => true,
    }
}

fn has_ring_evidence(styles: &StyleMap, root_font_size: f64) -> bool {
    let width_visible = styles
        .get("outline-width")
        .is_some_and(|w| is_visible_ring_value("outline-width", w, root_font_size));
    let color_visible = styles
        .get("outline-color")
        .is_some_and(|c| is_visible_ring_value("outline-color", c, root_font_size));
    let shadow_visible = styles
        .get("box-shadow")
        .is_some_and(|s| is_visible_ring_value("box-shadow", s, root_font_size));
    (width_visible && color_visible) || shadow_visible
}

/// Focus-ring properties from every successful `focus_visible` capture.
///
/// A component type whose focus captures all lack a visible outline and a box
/// shadow is reported as a gap.
pub fn collect_focus_rings(samples: &[Sample], root_font_size: f64) -> FocusRingReport {
    let mut report = FocusRingReport::default();
    let mut focused_types = BTreeSet::new();
    let mut ringed_types = BTreeSet::new();

    for sample in samples {
        let Some(focus) = sample
            .states
            .get(&StateName::FocusVisible)
            .and_then(|capture| capture.styles())
        else {
            continue;
        };
        focused_types.insert(sample.component_type);
        if has_ring_evidence(focus, root_font_size) {
            ringed_types.insert(sample.component_type);
        }
        report.samples.push(FocusRingSample {
            id: sample.id.clone(),
            component: sample.component_type,
            outline: focus.get("outline-color").cloned(),
            outline_width: focus.get("outline-width").cloned(),
            outline_offset: focus.get("outline-offset").cloned(),
            box_shadow: focus.get("box-shadow").cloned(),
        });
    }

    report.gaps = focused_types
        .difference(&ringed_types)
        .copied()
        .collect::<Vec<ComponentType>>();
    report
}

/// Foreground/background contrast for samples with a near-opaque background.
pub fn collect_contrast_samples(samples: &[Sample], min_bg_alpha: f64) -> Vec<ContrastSample> {
    samples
        .iter()
        .filter_map(|sample| {
            let fg = parse_color(sample.computed.get("color")?)?;
            let bg = parse_color(sample.computed.get("background-color")?)?;
            if bg.a <= min_bg_alpha {
                return None;
            }
            Some(ContrastSample {
                id: sample.id.clone(),
                component: sample.component_type,
                fg: color_to_string(&fg),
                bg: color_to_string(&bg),
                ratio: round_to(contrast_ratio(fg.rgb(), bg.rgb()), 2),
            })
        })
        .collect()
}

pub fn build_accessibility(
    samples: &[Sample],
    reduced_motion_detected: bool,
    config: &Config,
) -> AccessibilityReport {
    AccessibilityReport {
        focus_ring: collect_focus_rings(samples, config.root_font_size),
        target_sizes: find_undersized_targets(samples, config.min_target_size),
        contrast_samples: collect_contrast_samples(samples, config.contrast_min_bg_alpha),
        reduced_motion: ReducedMotion {
            detected: reduced_motion_detected,
        },
    }
}
