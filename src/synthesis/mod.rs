//! Synthesis engine turning collected evidence into design-system results.
//!
//! Each stage is a pure function over an already-loaded batch:
//! - Value parsing (colors, lengths, durations, contrast)
//! - Candidate scoring, deduplication and sample admission
//! - Frequency clustering into primitive tokens
//! - Interaction state diffs and the interaction model
//! - Density rhythm and layout grammar
//! - Accessibility and font forensics
//! - Stylesheet fingerprints

// Submodules
mod accessibility;
mod candidates;
mod density;
mod fonts;
mod layout;
mod runner;
mod states;
mod stylesheets;
mod tokens;
pub mod values;


// Re-exports
pub use accessibility::{
    build_accessibility, collect_contrast_samples, collect_focus_rings, find_undersized_targets,
};
pub use candidates::{
    admit_samples, discover_candidates, is_chip_like, rank_candidates, score_candidate,
    score_with_rules, Admission, DedupKey, Deduplicator, ScopedDeduplicator, ScoringContext,
    ScoringRule, SCORING_RULES,
};
pub use density::{build_density_rhythm, stats_summary};
pub use fonts::{
    build_font_conclusion, build_font_forensics, classify_font_requests, family_tokens,
    is_font_request, is_system_font, SYSTEM_FONTS,
};
pub use layout::build_layout_grammar;
pub use runner::{build_notes, build_results, collect_limits, site_name};
pub use states::{apply_state_diffs, build_interaction_model, compute_state_diff, STATE_DIFF_PROPS};
pub use stylesheets::{
    build_tech_stack, parse_font_faces, scan_css_keywords, scan_reduced_motion,
    FRAMEWORK_KEYWORDS,
};
pub use tokens::{cluster_tokens, split_counter, Tally};
pub use values::{
    color_to_string, contrast_ratio, is_neutral, normalize_text, parse_color, parse_duration,
    parse_length, rgb_to_hsl, Rgba,
};
