use std::collections::BTreeMap;

use crate::types::{ComponentType, DensityRhythm, Sample, StatsSummary, ValueSeries};

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Quartile cut points using the exclusive method (data treated as a sample
/// from a larger population). Needs at least two values.
fn exclusive_quartiles(sorted: &[f64]) -> [f64; 3] {
    let m = sorted.len() + 1;
    let mut cuts = [0.0; 3];
    for (slot, i) in cuts.iter_mut().zip(1..=3usize) {
        let j = (i * m / 4).clamp(1, sorted.len() - 1);
        let delta = (i * m - j * 4) as f64;
        *slot = (sorted[j - 1] * (4.0 - delta) + sorted[j] * delta) / 4.0;
    }
    cuts
}

/// Median with p25/p75; below four values the extremes stand in for the
/// quartiles.
pub fn stats_summary(values: &[f64]) -> Option<StatsSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let (p25, p75) = if sorted.len() >= 4 {
        let [q1, _, q3] = exclusive_quartiles(&sorted);
        (q1, q3)
    } else {
        (sorted[0], sorted[sorted.len() - 1])
    };
    Some(StatsSummary {
        median: median(&sorted),
        p25,
        p75,
        count: sorted.len(),
    })
}

pub fn build_density_rhythm(samples: &[Sample]) -> DensityRhythm {
    let mut controls: BTreeMap<ComponentType, Vec<f64>> = BTreeMap::new();
    let mut card_heights = Vec::new();

    for sample in samples {
        let height = sample.bbox.height;
        if height <= 0.0 {
            continue;
        }
        if sample.component_type.is_control() {
            controls.entry(sample.component_type).or_default().push(height);
        }
        if sample.component_type == ComponentType::Card {
            card_heights.push(height);
        }
    }

    DensityRhythm {
        control_heights: controls
            .into_iter()
            .filter_map(|(kind, heights)| stats_summary(&heights).map(|s| (kind, s)))
            .collect(),
        card_padding_gaps: ValueSeries {
            values: card_heights,
        },
    }
}
