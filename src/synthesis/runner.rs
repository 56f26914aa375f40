use std::collections::{BTreeMap, BTreeSet};

use serde_json::json;
use tracing::{info, warn};
use url::Url;

use crate::config::Config;
use crate::evidence::{EvidenceBatch, PageRecord};
use crate::output::DSX_OUTPUT_VERSION;
use crate::types::{FontFace, ResultsDocument, ResultsMeta, Sample};

use super::{
    admit_samples, apply_state_diffs, build_accessibility, build_density_rhythm,
    build_font_forensics, build_interaction_model, build_layout_grammar, build_tech_stack,
    cluster_tokens, discover_candidates, parse_font_faces, scan_reduced_motion,
};

/// Short site name from a URL: host without `www.`, first label.
pub fn site_name(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .map(|host| {
            host.replace("www.", "")
                .split('.')
                .next()
                .unwrap_or_default()
                .to_string()
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "site".to_string())
}

fn site_url(pages: &BTreeMap<String, PageRecord>) -> Option<&str> {
    pages
        .get("home")
        .into_iter()
        .chain(pages.values())
        .map(|p| p.url.as_str())
        .find(|u| !u.is_empty())
}

/// Batch-level gaps, in report order: collector limits, failed pages,
/// samples whose state capture failed, then empty breakpoint/theme combos.
pub fn collect_limits(
    collector_limits: &[String],
    pages: &BTreeMap<String, PageRecord>,
    raw_samples: &[Sample],
    accepted: &[Sample],
    config: &Config,
) -> Vec<String> {
    let mut limits: Vec<String> = Vec::new();
    let mut push = |limit: String| {
        if !limits.contains(&limit) {
            limits.push(limit);
        }
    };

    for limit in collector_limits {
        push(limit.clone());
    }

    for (key, record) in pages {
        if let Some(error) = &record.error {
            let stage = record.stage.as_deref().unwrap_or("unknown");
            warn!(page = %key, stage, "page failed during collection");
            push(format!("Failed to collect {key} at {stage}: {error}"));
        }
    }

    for sample in accepted
        .iter()
        .filter(|s| s.component_type.has_interaction_states())
    {
        if let Some(error) = &sample.capture_error {
            push(format!("State capture failed for {}: {error}", sample.id));
        }
    }

    if !raw_samples.is_empty() {
        let seen: BTreeSet<(&str, &str)> = raw_samples
            .iter()
            .map(|s| (s.breakpoint.as_str(), s.theme.as_str()))
            .collect();
        for (breakpoint, theme) in config.expected_combinations() {
            if !seen.contains(&(breakpoint, theme)) {
                warn!(breakpoint, theme, "no samples for combination");
                push(format!("No samples collected for {breakpoint} / {theme}"));
            }
        }
    }

    limits
}

pub fn build_notes(limits: &[String]) -> Vec<String> {
    if limits.is_empty() {
        return vec!["Limits: none detected".to_string()];
    }
    std::iter::once("Limits:".to_string())
        .chain(limits.iter().cloned())
        .collect()
}

/// Run every synthesis stage over one evidence batch.
///
/// Never fails: malformed values degrade the affected field and batch-level
/// gaps end up in `notes`.
pub fn build_results(batch: EvidenceBatch, config: &Config) -> ResultsDocument {
    let EvidenceBatch {
        samples: raw_samples,
        candidates,
        font_requests,
        mut font_faces,
        font_probes,
        stylesheets,
        pages,
        limits: collector_limits,
    } = batch;

    let mut samples = admit_samples(raw_samples.clone(), config);
    info!(raw = raw_samples.len(), accepted = samples.len(), "admitted samples");
    apply_state_diffs(&mut samples, config.allow_anchor_active);

    let candidates = discover_candidates(candidates, f64::from(config.viewport.height), config);

    let tokens = cluster_tokens(&samples, config);
    let interaction_model = build_interaction_model(&samples);
    let density_rhythm = build_density_rhythm(&samples);
    let layout_grammar = build_layout_grammar(&samples);

    let css_texts: Vec<&str> = stylesheets.iter().map(|s| s.text.as_str()).collect();
    let reduced_motion = scan_reduced_motion(&css_texts);
    let tech_stack = build_tech_stack(&css_texts);

    if font_faces.is_empty() {
        font_faces = stylesheets
            .iter()
            .flat_map(|sheet| parse_font_faces(&sheet.text, &json!({"type": "file", "file": sheet.file})))
            .collect::<Vec<FontFace>>();
    }
    let font_forensics = build_font_forensics(font_requests, font_faces, font_probes);
    let accessibility = build_accessibility(&samples, reduced_motion, config);

    let limits = collect_limits(&collector_limits, &pages, &raw_samples, &samples, config);
    info!(limits = limits.len(), "synthesis complete");

    ResultsDocument {
        version: DSX_OUTPUT_VERSION.to_string(),
        meta: ResultsMeta {
            site_name: site_url(&pages).map(site_name).unwrap_or_else(|| "site".to_string()),
            breakpoints: config
                .breakpoints
                .iter()
                .map(|bp| (bp.name.clone(), bp.viewport.to_string()))
                .collect(),
            theme_modes: config.theme_modes.clone(),
            sample_count: samples.len(),
            candidate_count: candidates.len(),
        },
        tokens,
        interaction_model,
        density_rhythm,
        layout_grammar,
        accessibility,
        font_forensics,
        tech_stack,
        notes: build_notes(&limits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_name_strips_www_and_tld() {
        assert_eq!(site_name("https://www.example.com/pricing"), "example");
        assert_eq!(site_name("https://app.linear.app"), "app");
        assert_eq!(site_name("not a url"), "site");
        assert_eq!(site_name("file:///tmp/index.html"), "site");
    }

    #[test]
    fn notes_prefix_limits() {
        assert_eq!(build_notes(&[]), vec!["Limits: none detected"]);
        assert_eq!(
            build_notes(&["Overlay trigger could not be activated".to_string()]),
            vec!["Limits:", "Overlay trigger could not be activated"]
        );
    }

    #[test]
    fn site_url_prefers_home_page() {
        let mut pages = BTreeMap::new();
        pages.insert(
            "about".to_string(),
            PageRecord {
                url: "https://www.acme.io/about".to_string(),
                ..PageRecord::default()
            },
        );
        assert_eq!(site_url(&pages), Some("https://www.acme.io/about"));
        pages.insert(
            "home".to_string(),
            PageRecord {
                url: "https://acme.io/".to_string(),
                ..PageRecord::default()
            },
        );
        assert_eq!(site_url(&pages), Some("https://acme.io/"));
    }
}
