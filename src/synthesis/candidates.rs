//! Candidate scoring, deduplication and per-group collection caps.
//!
//! Scoring is a fixed additive rule table; each rule is a named predicate
//! with a weight so rules can be reported and tested one at a time.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use tracing::debug;

use crate::config::Config;
use crate::types::{
    BoundingBox, Candidate, CandidateGroup, CandidateObservation, ComponentType, Sample, StyleMap,
};

use super::values::{normalize_text, parse_length, round_to};

/// Maximum characters of element text kept for dedup keys.
pub const TEXT_LIMIT: usize = 140;

const CTA_LEXICON: [&str; 6] = ["get started", "start", "free", "trial", "sign up", "register"];

/// Everything a scoring rule may inspect.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub group: CandidateGroup,
    pub text: &'a str,
    pub bbox: &'a BoundingBox,
    pub computed: &'a StyleMap,
    pub viewport_height: f64,
    /// Area in px² from which an element counts as large.
    pub large_area: f64,
}

/// One additive scoring rule.
#[derive(Debug, Clone, Copy)]
pub struct ScoringRule {
    pub name: &'static str,
    pub weight: f64,
    pub applies: fn(&ScoringContext<'_>) -> bool,
}

pub const SCORING_RULES: &[ScoringRule] = &[
    ScoringRule {
        name: "action_group",
        weight: 2.5,
        applies: |ctx| matches!(ctx.group, CandidateGroup::Cta | CandidateGroup::Button),
    },
    ScoringRule {
        name: "headline_group",
        weight: 2.0,
        applies: |ctx| ctx.group == CandidateGroup::Headline,
    },
    ScoringRule {
        name: "nav_group",
        weight: 1.0,
        applies: |ctx| ctx.group == CandidateGroup::Nav,
    },
    ScoringRule {
        name: "cta_text",
        weight: 3.0,
        applies: |ctx| {
            let lower = ctx.text.to_lowercase();
            CTA_LEXICON.iter().any(|k| lower.contains(k))
        },
    },
    ScoringRule {
        name: "large_area",
        weight: 1.0,
        applies: |ctx| ctx.bbox.area() >= ctx.large_area,
    },
    // Compares absolute y with the viewport height; scroll offset at capture
    // time is not taken into account.
    ScoringRule {
        name: "above_fold",
        weight: 1.0,
        applies: |ctx| ctx.bbox.y < ctx.viewport_height,
    },
    ScoringRule {
        name: "bold_weight",
        weight: 1.0,
        applies: |ctx| {
            ctx.computed
                .get("font-weight")
                .and_then(|w| w.trim().parse::<f64>().ok())
                .filter(|w| w.is_finite())
                .is_some_and(|w| w.trunc() >= 700.0)
        },
    },
    ScoringRule {
        name: "filled_background",
        weight: 0.5,
        applies: |ctx| {
            ctx.computed
                .get("background-color")
                .map(|bg| bg.trim().to_ascii_lowercase())
                .is_some_and(|bg| {
                    !bg.is_empty() && bg != "transparent" && bg != "rgba(0, 0, 0, 0)"
                })
        },
    },
    ScoringRule {
        name: "background_image",
        weight: 1.0,
        applies: |ctx| {
            ctx.computed
                .get("background-image")
                .map(|img| img.trim().to_ascii_lowercase())
                .is_some_and(|img| !img.is_empty() && img != "none")
        },
    },
];

/// Sum of the weights of every rule that applies, with the names that fired.
pub fn score_with_rules(ctx: &ScoringContext<'_>) -> (f64, Vec<&'static str>) {
    SCORING_RULES
        .iter()
        .filter(|rule| (rule.applies)(ctx))
        .fold((0.0, Vec::new()), |(score, mut names), rule| {
            names.push(rule.name);
            (score + rule.weight, names)
        })
}

pub fn score_candidate(ctx: &ScoringContext<'_>) -> f64 {
    score_with_rules(ctx).0
}

/// Key under which two observations count as the same element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey<G> {
    pub group: G,
    pub text: String,
    /// Width and height rounded to one decimal, stored in tenths.
    pub width_tenths: i64,
    pub height_tenths: i64,
}

impl<G> DedupKey<G> {
    pub fn new(group: G, text: &str, bbox: &BoundingBox) -> Self {
        Self {
            group,
            text: normalize_text(text, TEXT_LIMIT),
            width_tenths: (round_to(bbox.width, 1) * 10.0).round() as i64,
            height_tenths: (round_to(bbox.height, 1) * 10.0).round() as i64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    Duplicate,
    CapReached,
}

/// First-occurrence-wins dedup with a per-group cap, in discovery order.
///
/// Duplicates never consume cap slots.
#[derive(Debug)]
pub struct Deduplicator<G> {
    cap: usize,
    seen: HashSet<DedupKey<G>>,
    collected: HashMap<G, usize>,
}

impl<G: Clone + Eq + Hash> Deduplicator<G> {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            seen: HashSet::new(),
            collected: HashMap::new(),
        }
    }

    pub fn admit(&mut self, key: DedupKey<G>) -> Admission {
        let count = self.collected.get(&key.group).copied().unwrap_or(0);
        if count >= self.cap {
            return Admission::CapReached;
        }
        let group = key.group.clone();
        if !self.seen.insert(key) {
            return Admission::Duplicate;
        }
        self.collected.insert(group, count + 1);
        Admission::Accepted
    }

    pub fn collected(&self, group: &G) -> usize {
        self.collected.get(group).copied().unwrap_or(0)
    }
}

/// Page, breakpoint and theme an element was captured under.
type Combination = (String, String, String);

/// One [`Deduplicator`] per capture combination.
///
/// Seen keys and cap counts are never shared between combinations, so a
/// dark-theme capture of a page is admitted alongside the light one.
#[derive(Debug)]
pub struct ScopedDeduplicator<G> {
    cap: usize,
    scopes: HashMap<Combination, Deduplicator<G>>,
}

impl<G: Clone + Eq + Hash> ScopedDeduplicator<G> {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            scopes: HashMap::new(),
        }
    }

    pub fn scope(&mut self, page: &str, breakpoint: &str, theme: &str) -> &mut Deduplicator<G> {
        let cap = self.cap;
        self.scopes
            .entry((page.to_string(), breakpoint.to_string(), theme.to_string()))
            .or_insert_with(|| Deduplicator::new(cap))
    }
}

fn safe_tag(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Score, dedup and cap raw discovery observations.
pub fn discover_candidates(
    observations: Vec<CandidateObservation>,
    viewport_height: f64,
    config: &Config,
) -> Vec<Candidate> {
    let mut scoped = ScopedDeduplicator::new(config.candidate_cap);
    let mut candidates = Vec::new();

    for obs in observations {
        let text = normalize_text(&obs.text, TEXT_LIMIT);
        let dedup = scoped.scope(&obs.page, &obs.breakpoint, &obs.theme);
        match dedup.admit(DedupKey::new(obs.group, &text, &obs.bbox)) {
            Admission::Accepted => {}
            Admission::Duplicate => {
                debug!(group = %obs.group, text = %text, "dropping duplicate candidate");
                continue;
            }
            Admission::CapReached => {
                debug!(group = %obs.group, cap = config.candidate_cap, "candidate cap reached");
                continue;
            }
        }

        let ctx = ScoringContext {
            group: obs.group,
            text: &text,
            bbox: &obs.bbox,
            computed: &obs.computed,
            viewport_height,
            large_area: config.large_area,
        };
        let (score, fired) = score_with_rules(&ctx);
        let index = dedup.collected(&obs.group) - 1;
        let id = obs.id.unwrap_or_else(|| {
            format!(
                "{}_candidate_{}_{}",
                safe_tag(&format!("{}_{}_{}", obs.page, obs.breakpoint, obs.theme)),
                obs.group,
                index
            )
        });
        let below_visibility_floor = obs.bbox.is_below(config.visibility_floor);

        candidates.push(Candidate {
            id,
            group: obs.group,
            page: obs.page,
            breakpoint: obs.breakpoint,
            theme: obs.theme,
            selector: obs.selector,
            selector_path: obs.selector_path,
            text,
            role: obs.role,
            aria_label: obs.aria_label,
            bbox: obs.bbox,
            crop_path: obs.crop_path,
            computed: obs.computed,
            score: round_to(score, 2),
            matched_rules: fired.into_iter().map(str::to_string).collect(),
            below_visibility_floor,
        });
    }

    candidates
}

/// Candidates ordered by descending score; ties keep discovery order.
pub fn rank_candidates(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates
}

/// Pill-shaped inline element: short, fully rounded, inline display.
pub fn is_chip_like(sample: &Sample, root_font_size: f64) -> bool {
    let height = sample
        .computed
        .get("height")
        .and_then(|h| parse_length(h, root_font_size))
        .filter(|h| *h != 0.0)
        .unwrap_or(sample.bbox.height);
    let radius = sample
        .computed
        .get("border-radius")
        .and_then(|r| parse_length(r, root_font_size))
        .unwrap_or(0.0);
    let display = sample
        .computed
        .get("display")
        .map(|d| d.to_ascii_lowercase())
        .unwrap_or_default();
    height <= 40.0 && radius >= height / 2.0 && display.contains("inline")
}

fn matches_selection(sample: &Sample, selected: &[String]) -> bool {
    selected.is_empty()
        || selected.iter().any(|s| {
            *s == sample.selector_path || sample.selector.as_deref() == Some(s.as_str())
        })
}

/// Filter raw samples down to the accepted set, in discovery order.
///
/// Applies the selection list, the chip-likeness test, dedup and the
/// per-component-type cap, each scoped to the sample's page, breakpoint and
/// theme. Admitted samples get their visibility flag set.
pub fn admit_samples(raw: Vec<Sample>, config: &Config) -> Vec<Sample> {
    let mut scoped: ScopedDeduplicator<ComponentType> = ScopedDeduplicator::new(config.sample_cap);
    let mut admitted = Vec::new();

    for mut sample in raw {
        if !matches_selection(&sample, &config.selected_paths) {
            debug!(id = %sample.id, "sample not in selection");
            continue;
        }
        if sample.component_type == ComponentType::Chip
            && !is_chip_like(&sample, config.root_font_size)
        {
            debug!(id = %sample.id, "chip sample is not pill-shaped");
            continue;
        }
        let key = DedupKey::new(sample.component_type, &sample.text, &sample.bbox);
        let dedup = scoped.scope(&sample.page, &sample.breakpoint, &sample.theme);
        match dedup.admit(key) {
            Admission::Accepted => {}
            Admission::Duplicate => {
                debug!(id = %sample.id, "dropping duplicate sample");
                continue;
            }
            Admission::CapReached => {
                debug!(id = %sample.id, component = %sample.component_type, "sample cap reached");
                continue;
            }
        }
        sample.below_visibility_floor = sample.bbox.is_below(config.visibility_floor);
        admitted.push(sample);
    }

    admitted
}
