//! Font forensics: which families a site really uses, and how sure we are.
//!
//! Three independent sources are cross-referenced: `@font-face` rules found in
//! stylesheets, font files fetched over the network, and computed
//! `font-family` values probed on representative elements.

use url::Url;

use crate::types::{
    FontConclusion, FontEvidence, FontFace, FontForensics, FontProbe, FontRequest, FontVerdict,
    NetworkEntry, VerificationStatus,
};

/// Generic and platform families that say nothing about a site's own fonts.
pub const SYSTEM_FONTS: [&str; 13] = [
    "-apple-system",
    "blinkmacsystemfont",
    "segoe ui",
    "roboto",
    "helvetica",
    "arial",
    "noto sans",
    "sans-serif",
    "serif",
    "ui-sans-serif",
    "ui-serif",
    "ui-monospace",
    "system-ui",
];

const FONT_EXTENSIONS: [&str; 4] = [".woff", ".woff2", ".ttf", ".otf"];

pub fn is_system_font(family: &str) -> bool {
    let family = family.trim().to_lowercase();
    SYSTEM_FONTS.contains(&family.as_str())
}

fn strip_quotes(family: &str) -> String {
    family.replace(['"', '\''], "").trim().to_string()
}

/// Split a `font-family` stack into unquoted family names.
pub fn family_tokens(stack: &str) -> Vec<String> {
    stack
        .split(',')
        .map(strip_quotes)
        .filter(|f| !f.is_empty())
        .collect()
}

fn request_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_lowercase(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_lowercase(),
    }
}

/// A request fetched a font when its path has a font extension or the
/// response was served with a font content type.
pub fn is_font_request(url: &str, content_type: Option<&str>) -> bool {
    let path = request_path(url);
    FONT_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
        || content_type.is_some_and(|ct| ct.to_lowercase().contains("font"))
}

pub fn classify_font_requests(entries: Vec<NetworkEntry>) -> Vec<FontRequest> {
    entries
        .into_iter()
        .filter(|e| is_font_request(&e.url, e.content_type.as_deref()))
        .map(FontRequest::from)
        .collect()
}

fn push_distinct(target: &mut Vec<String>, value: String) {
    if !target.contains(&value) {
        target.push(value);
    }
}

/// Axis tags from a `font-variation-settings` value such as
/// `"wght" 650, "opsz" 32`.
fn variation_axes(settings: &str) -> Vec<String> {
    if settings.trim().eq_ignore_ascii_case("normal") {
        return Vec::new();
    }
    settings
        .split(',')
        .filter_map(|axis| {
            let tag = axis.trim().split_whitespace().next()?;
            let tag = tag.trim_matches(['"', '\'']);
            (!tag.is_empty()).then(|| tag.to_string())
        })
        .collect()
}

/// Decide whether the computed fonts are corroborated.
///
/// A declared face matching a non-system computed family wins; otherwise any
/// font request together with any computed family is accepted as weaker
/// evidence.
pub fn build_font_conclusion(
    faces: &[FontFace],
    probes: &[FontProbe],
    requests: &[FontRequest],
) -> FontVerdict {
    let mut primary_families: Vec<String> = faces
        .iter()
        .filter_map(|f| f.font_family.as_deref())
        .map(strip_quotes)
        .filter(|f| !f.is_empty())
        .collect();
    primary_families.sort();
    primary_families.dedup();
    let declared_lower: Vec<String> = primary_families.iter().map(|f| f.to_lowercase()).collect();

    let computed: Vec<Vec<String>> = probes
        .iter()
        .filter_map(FontProbe::font_family)
        .map(family_tokens)
        .collect();

    let matched_family = computed
        .iter()
        .filter_map(|tokens| tokens.first())
        .find(|first| {
            let lower = first.to_lowercase();
            !is_system_font(&lower) && declared_lower.iter().any(|d| d.contains(&lower))
        })
        .cloned();

    let (status, evidence) = if matched_family.is_some() {
        (VerificationStatus::Verified, FontEvidence::DeclaredFaceMatch)
    } else if !requests.is_empty() && !computed.is_empty() {
        (VerificationStatus::Verified, FontEvidence::NetworkAndComputed)
    } else {
        (VerificationStatus::Unverified, FontEvidence::None)
    };

    let mut fallbacks = Vec::new();
    for tokens in &computed {
        for token in tokens.iter().skip(1) {
            push_distinct(&mut fallbacks, token.clone());
        }
    }

    let mut variable_axes = Vec::new();
    for probe in probes {
        if let Some(settings) = probe.styles.get("font-variation-settings") {
            for axis in variation_axes(settings) {
                push_distinct(&mut variable_axes, axis);
            }
        }
    }

    let mut notes = Vec::new();
    match evidence {
        FontEvidence::DeclaredFaceMatch => {}
        FontEvidence::NetworkAndComputed => notes.push(
            "No @font-face rule matched a computed family; verified from font requests and computed styles".to_string(),
        ),
        FontEvidence::None => {
            if primary_families.is_empty() {
                notes.push("No @font-face rules found".to_string());
            }
            if requests.is_empty() {
                notes.push("No font requests observed".to_string());
            }
            if computed.is_empty() {
                notes.push("No computed font-family probes".to_string());
            }
        }
    }

    FontVerdict {
        status,
        evidence,
        matched_family,
        conclusion: FontConclusion {
            primary_families,
            fallbacks,
            variable_axes,
            notes,
        },
    }
}

pub fn build_font_forensics(
    network_requests: Vec<FontRequest>,
    font_faces: Vec<FontFace>,
    computed_probes: Vec<FontProbe>,
) -> FontForensics {
    let verdict = build_font_conclusion(&font_faces, &computed_probes, &network_requests);
    FontForensics {
        verified_status: verdict.status,
        evidence: verdict.evidence,
        network_requests,
        font_faces,
        computed_probes,
        conclusion: verdict.conclusion,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StyleMap;
    use serde_json::Value;

    fn face(family: &str) -> FontFace {
        FontFace {
            font_family: Some(family.to_string()),
            ..FontFace::default()
        }
    }

    fn probe(name: &str, pairs: &[(&str, &str)]) -> FontProbe {
        FontProbe {
            page: "home".to_string(),
            probe: name.to_string(),
            selector_used: None,
            text: None,
            bbox: None,
            styles: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<StyleMap>(),
        }
    }

    fn request(url: &str) -> FontRequest {
        FontRequest {
            url: url.to_string(),
            status: Some(200),
            content_type: Some("font/woff2".to_string()),
            initiator: Value::Null,
            page_tag: "home".to_string(),
            breakpoint: "desktop".to_string(),
            theme: "default".to_string(),
        }
    }

    fn entry(url: &str, content_type: Option<&str>) -> NetworkEntry {
        NetworkEntry {
            url: url.to_string(),
            method: Some("GET".to_string()),
            resource_type: None,
            status: Some(200),
            content_type: content_type.map(str::to_string),
            initiator: Value::Null,
            page_tag: "home".to_string(),
            breakpoint: "desktop".to_string(),
            theme: "default".to_string(),
        }
    }

    #[test]
    fn declared_face_match_verifies() {
        let verdict = build_font_conclusion(
            &[face("\"Inter\"")],
            &[probe("body", &[("font-family", "Inter, sans-serif")])],
            &[request("https://cdn.example.com/inter.woff2")],
        );
        assert_eq!(verdict.status, VerificationStatus::Verified);
        assert_eq!(verdict.evidence, FontEvidence::DeclaredFaceMatch);
        assert_eq!(verdict.matched_family.as_deref(), Some("Inter"));
        assert_eq!(verdict.conclusion.primary_families, vec!["Inter"]);
        assert_eq!(verdict.conclusion.fallbacks, vec!["sans-serif"]);
    }

    #[test]
    fn substring_of_declared_family_matches() {
        let verdict = build_font_conclusion(
            &[face("'Inter Variable'")],
            &[probe("hero_h1", &[("font-family", "\"inter\", system-ui")])],
            &[],
        );
        assert_eq!(verdict.evidence, FontEvidence::DeclaredFaceMatch);
    }

    #[test]
    fn system_first_family_falls_back_to_network_evidence() {
        let verdict = build_font_conclusion(
            &[face("Arial Custom")],
            &[probe("body", &[("font-family", "Arial, Helvetica")])],
            &[request("/fonts/brand.woff2")],
        );
        assert_eq!(verdict.status, VerificationStatus::Verified);
        assert_eq!(verdict.evidence, FontEvidence::NetworkAndComputed);
        assert!(verdict.matched_family.is_none());
        assert_eq!(verdict.conclusion.notes.len(), 1);
    }

    #[test]
    fn no_evidence_is_unverified() {
        let verdict = build_font_conclusion(
            &[],
            &[probe("body", &[("font-family", "Brand, sans-serif")])],
            &[],
        );
        assert_eq!(verdict.status, VerificationStatus::Unverified);
        assert_eq!(verdict.evidence, FontEvidence::None);
        assert_eq!(
            verdict.conclusion.notes,
            vec!["No @font-face rules found", "No font requests observed"]
        );
    }

    #[test]
    fn variable_axes_are_collected_from_probes() {
        let verdict = build_font_conclusion(
            &[],
            &[
                probe("body", &[("font-variation-settings", "\"wght\" 400, \"opsz\" 14")]),
                probe("hero_h1", &[("font-variation-settings", "'wght' 700")]),
                probe("nav_link", &[("font-variation-settings", "normal")]),
            ],
            &[],
        );
        assert_eq!(verdict.conclusion.variable_axes, vec!["wght", "opsz"]);
    }

    #[test]
    fn font_requests_are_classified_by_path_or_content_type() {
        let requests = classify_font_requests(vec![
            entry("https://example.com/fonts/Inter.WOFF2?v=3", None),
            entry("https://fonts.gstatic.com/s/abc", Some("font/woff2")),
            entry("https://example.com/app.css?font=inter.woff2", Some("text/css")),
            entry("/static/brand.otf#iefix", None),
            entry("https://example.com/logo.svg", Some("image/svg+xml")),
        ]);
        let urls: Vec<&str> = requests.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/fonts/Inter.WOFF2?v=3",
                "https://fonts.gstatic.com/s/abc",
                "/static/brand.otf#iefix",
            ]
        );
    }

    #[test]
    fn forensics_carries_raw_evidence() {
        let forensics = build_font_forensics(
            vec![request("/a.woff")],
            vec![face("Brand")],
            vec![probe("body", &[("font-family", "Brand")])],
        );
        assert_eq!(forensics.verified_status, VerificationStatus::Verified);
        assert_eq!(forensics.network_requests.len(), 1);
        assert_eq!(forensics.font_faces.len(), 1);
        assert_eq!(forensics.computed_probes.len(), 1);
    }
}
