//! Frequency clustering of raw computed-style values into primitive tokens.
//!
//! Every category is tallied in first-seen order over the accepted batch and
//! then split into a capped `top` scale plus an `outliers` tail. The whole
//! computation is a pure function of the batch, so identical input order gives
//! identical output.

use std::collections::HashMap;

use tracing::debug;

use crate::config::Config;
use crate::types::{
    ColorTokens, MotionTokens, PrimitiveTokens, Sample, ScaleTokens, StyleMap, TokenBucket,
    TokenEntry, Tokens, TypographyTokens,
};

use super::values::{color_to_string, format_decimal, is_neutral_with, parse_color, parse_duration, parse_length};

const COLOR_PROPS: [&str; 4] = ["color", "background-color", "border-color", "outline-color"];

const SPACING_PROPS: [&str; 9] = [
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "gap",
];

/// Occurrence counts that remember the order values were first seen.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    entries: Vec<TokenEntry>,
    index: HashMap<String, usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: impl Into<String>) {
        let value = value.into();
        match self.index.get(&value) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(value.clone(), self.entries.len());
                self.entries.push(TokenEntry { value, count: 1 });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, value: &str) -> usize {
        self.index
            .get(value)
            .map(|&i| self.entries[i].count)
            .unwrap_or(0)
    }
}

impl<S: Into<String>> FromIterator<S> for Tally {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for value in iter {
            tally.add(value);
        }
        tally
    }
}

/// Rank a tally by descending count and split it at `top_n`.
///
/// The sort is stable, so equal counts keep first-seen order.
pub fn split_counter(tally: Tally, top_n: usize) -> TokenBucket {
    let mut entries = tally.entries;
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    let outliers = entries.split_off(top_n.min(entries.len()));
    TokenBucket {
        top: entries,
        outliers,
    }
}

fn trimmed<'a>(computed: &'a StyleMap, prop: &str) -> Option<&'a str> {
    computed
        .get(prop)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn is_zero_length(value: &str, root_font_size: f64) -> bool {
    parse_length(value, root_font_size) == Some(0.0)
}

#[derive(Debug, Default)]
struct Tallies {
    neutrals: Tally,
    accents: Tally,
    opacity: Tally,
    font_sizes: Tally,
    line_heights: Tally,
    letter_spacing: Tally,
    weights: Tally,
    spacing: Tally,
    radius: Tally,
    border_width: Tally,
    shadow: Tally,
    durations: Tally,
    easings: Tally,
    properties: Tally,
    z_index: Tally,
}

impl Tallies {
    fn observe(&mut self, computed: &StyleMap, config: &Config) {
        let root = config.root_font_size;

        for prop in COLOR_PROPS {
            let Some(raw) = trimmed(computed, prop) else {
                continue;
            };
            let Some(color) = parse_color(raw) else {
                debug!(prop, value = raw, "skipping unparseable color");
                continue;
            };
            // Fully transparent colors mark absence, not a palette entry.
            if color.a <= 0.0 {
                continue;
            }
            let label = color_to_string(&color);
            if is_neutral_with(&color, config.neutral_saturation) {
                self.neutrals.add(label);
            } else {
                self.accents.add(label);
            }
            if color.a < 1.0 {
                self.opacity.add(format_decimal(color.a, 3));
            }
        }

        for (prop, tally) in [
            ("font-size", &mut self.font_sizes),
            ("line-height", &mut self.line_heights),
            ("letter-spacing", &mut self.letter_spacing),
            ("font-weight", &mut self.weights),
        ] {
            if let Some(value) = trimmed(computed, prop) {
                tally.add(value);
            }
        }

        for prop in SPACING_PROPS {
            if let Some(value) = trimmed(computed, prop).filter(|v| !is_zero_length(v, root)) {
                self.spacing.add(value);
            }
        }

        if let Some(value) = trimmed(computed, "border-radius").filter(|v| !is_zero_length(v, root)) {
            self.radius.add(value);
        }
        if let Some(value) = trimmed(computed, "border-width").filter(|v| !is_zero_length(v, root)) {
            self.border_width.add(value);
        }
        if let Some(value) = trimmed(computed, "box-shadow").filter(|v| *v != "none") {
            self.shadow.add(value);
        }

        if let Some(value) =
            trimmed(computed, "transition-duration").filter(|v| parse_duration(v) != Some(0.0))
        {
            self.durations.add(value);
        }
        if let Some(value) = trimmed(computed, "transition-timing-function").filter(|v| *v != "ease") {
            self.easings.add(value);
        }
        if let Some(value) = trimmed(computed, "transition-property").filter(|v| *v != "all") {
            value
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .for_each(|p| self.properties.add(p));
        }

        if let Some(value) = trimmed(computed, "z-index").filter(|v| *v != "auto" && *v != "0") {
            self.z_index.add(value);
        }
    }
}

fn merge_outliers(buckets: [&TokenBucket; 4]) -> Vec<TokenEntry> {
    buckets
        .into_iter()
        .flat_map(|b| b.outliers.iter().cloned())
        .collect()
}

/// Cluster every primitive token category over the accepted batch.
pub fn cluster_tokens(samples: &[Sample], config: &Config) -> Tokens {
    let mut tallies = Tallies::default();
    for sample in samples.iter().filter(|s| !s.computed.is_empty()) {
        tallies.observe(&sample.computed, config);
    }

    let top_n = config.top_n;
    let split = |tally: Tally| split_counter(tally, top_n);

    let neutrals = split(tallies.neutrals);
    let accents = split(tallies.accents);
    let opacity = split(tallies.opacity);
    let color = ColorTokens {
        outliers: merge_outliers([&neutrals, &accents, &opacity, &TokenBucket::default()]),
        neutrals: neutrals.top,
        accents: accents.top,
        opacity: opacity.top,
    };

    let scale = split(tallies.font_sizes);
    let line_heights = split(tallies.line_heights);
    let letter_spacing = split(tallies.letter_spacing);
    let weights = split(tallies.weights);
    let typography = TypographyTokens {
        outliers: merge_outliers([&scale, &line_heights, &letter_spacing, &weights]),
        scale: scale.top,
        line_heights: line_heights.top,
        letter_spacing: letter_spacing.top,
        weights: weights.top,
    };

    let durations = split(tallies.durations);
    let easings = split(tallies.easings);
    let properties = split(tallies.properties);
    let motion = MotionTokens {
        outliers: merge_outliers([&durations, &easings, &properties, &TokenBucket::default()]),
        durations: durations.top,
        easings: easings.top,
        properties: properties.top,
    };

    Tokens {
        primitive: PrimitiveTokens {
            color,
            typography,
            spacing: ScaleTokens::from(split(tallies.spacing)),
            radius: ScaleTokens::from(split(tallies.radius)),
            border_width: ScaleTokens::from(split(tallies.border_width)),
            shadow: ScaleTokens::from(split(tallies.shadow)),
            motion,
            z_index: ScaleTokens::from(split(tallies.z_index)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoundingBox, ComponentType};
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn sample_with(pairs: &[(&str, &str)]) -> Sample {
        Sample {
            id: "s".to_string(),
            component_type: ComponentType::Button,
            page: "home".to_string(),
            breakpoint: "desktop".to_string(),
            theme: "default".to_string(),
            selector: None,
            selector_path: String::new(),
            role: None,
            aria_label: None,
            text: String::new(),
            bbox: BoundingBox::default(),
            crop_path: None,
            computed: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            navigational: false,
            states: BTreeMap::new(),
            diffs: BTreeMap::new(),
            capture_error: None,
            below_visibility_floor: false,
        }
    }

    fn values(entries: &[TokenEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.value.as_str()).collect()
    }

    #[test]
    fn split_twenty_values_into_twelve_and_eight() {
        let mut tally = Tally::new();
        for i in 0..20 {
            for _ in 0..(i % 5 + 1) {
                tally.add(format!("v{i}"));
            }
        }
        let bucket = split_counter(tally, 12);
        assert_eq!(bucket.top.len(), 12);
        assert_eq!(bucket.outliers.len(), 8);
        // counts of 5 first, in the order v4, v9, v14, v19
        assert_eq!(values(&bucket.top[..4]), vec!["v4", "v9", "v14", "v19"]);
        assert!(bucket.top.windows(2).all(|w| w[0].count >= w[1].count));
        assert!(bucket.top.last().map(|e| e.count) >= bucket.outliers.first().map(|e| e.count));
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let tally: Tally = ["b", "a", "c", "a", "b"].into_iter().collect();
        let bucket = split_counter(tally, 12);
        assert_eq!(values(&bucket.top), vec!["b", "a", "c"]);
        assert_eq!(bucket.top[0].count, 2);
        assert!(bucket.outliers.is_empty());
    }

    #[test]
    fn colors_split_by_neutrality_with_opacity_bucket() {
        let samples = vec![
            sample_with(&[
                ("color", "rgb(17, 17, 17)"),
                ("background-color", "rgba(37, 99, 235, 0.5)"),
                ("border-color", "transparent"),
                ("outline-color", "rgba(0, 0, 0, 0)"),
            ]),
            sample_with(&[("color", "#111"), ("background-color", "not-a-color")]),
        ];
        let tokens = cluster_tokens(&samples, &Config::default());
        let color = &tokens.primitive.color;
        assert_eq!(values(&color.neutrals), vec!["rgb(17, 17, 17)"]);
        assert_eq!(color.neutrals[0].count, 2);
        assert_eq!(values(&color.accents), vec!["rgba(37, 99, 235, 0.5)"]);
        assert_eq!(values(&color.opacity), vec!["0.5"]);
    }

    #[test]
    fn sentinel_values_are_excluded() {
        let samples = vec![sample_with(&[
            ("padding-top", "0px"),
            ("padding-left", "0"),
            ("margin-top", "16px"),
            ("gap", "0rem"),
            ("border-radius", "0px"),
            ("border-width", "1px"),
            ("box-shadow", "none"),
            ("transition-duration", "0s"),
            ("transition-timing-function", "ease"),
            ("transition-property", "all"),
            ("z-index", "auto"),
        ])];
        let p = cluster_tokens(&samples, &Config::default()).primitive;
        assert_eq!(values(&p.spacing.scale), vec!["16px"]);
        assert!(p.radius.scale.is_empty());
        assert_eq!(values(&p.border_width.scale), vec!["1px"]);
        assert!(p.shadow.scale.is_empty());
        assert!(p.motion.durations.is_empty());
        assert!(p.motion.easings.is_empty());
        assert!(p.motion.properties.is_empty());
        assert!(p.z_index.scale.is_empty());
    }

    #[test]
    fn transition_properties_split_on_commas() {
        let samples = vec![sample_with(&[
            ("transition-property", "color, background-color,opacity"),
            ("transition-duration", "150ms"),
            ("transition-timing-function", "cubic-bezier(0.4, 0, 0.2, 1)"),
            ("z-index", "10"),
        ])];
        let p = cluster_tokens(&samples, &Config::default()).primitive;
        assert_eq!(
            values(&p.motion.properties),
            vec!["color", "background-color", "opacity"]
        );
        assert_eq!(values(&p.motion.durations), vec!["150ms"]);
        assert_eq!(values(&p.z_index.scale), vec!["10"]);
    }

    #[test]
    fn category_outliers_are_concatenated_in_bucket_order() {
        let config = Config {
            top_n: 1,
            ..Config::default()
        };
        let samples = vec![
            sample_with(&[("font-size", "16px"), ("font-weight", "400")]),
            sample_with(&[("font-size", "16px"), ("font-weight", "400")]),
            sample_with(&[("font-size", "24px"), ("font-weight", "700")]),
        ];
        let typography = cluster_tokens(&samples, &config).primitive.typography;
        assert_eq!(values(&typography.scale), vec!["16px"]);
        assert_eq!(values(&typography.outliers), vec!["24px", "700"]);
    }

    proptest! {
        #[test]
        fn clustering_is_deterministic(sizes in proptest::collection::vec(0u8..30, 0..60)) {
            let samples: Vec<Sample> = sizes
                .iter()
                .map(|s| {
                    let size = format!("{s}px");
                    sample_with(&[("font-size", size.as_str()), ("margin-top", size.as_str())])
                })
                .collect();
            let config = Config::default();
            let first = serde_json::to_string(&cluster_tokens(&samples, &config)).unwrap();
            let second = serde_json::to_string(&cluster_tokens(&samples, &config)).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn split_respects_bound(values in proptest::collection::vec("[a-e]{1,2}", 0..80), top_n in 1usize..15) {
            let tally: Tally = values.iter().map(String::as_str).collect();
            let distinct = tally.len();
            let bucket = split_counter(tally, top_n);
            prop_assert_eq!(bucket.top.len(), distinct.min(top_n));
            prop_assert_eq!(bucket.top.len() + bucket.outliers.len(), distinct);
        }
    }
}
