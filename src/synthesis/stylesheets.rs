//! Evidence read straight from stylesheet text.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::types::{FontFace, KeywordHits, StylingFingerprint, TechStack};

/// Framework fingerprints: framework name and the keywords that betray it.
pub const FRAMEWORK_KEYWORDS: &[(&str, &[&str])] = &[
    ("tailwind", &["--tw-", "@layer", "ring-", "prose-", "preflight"]),
    ("bootstrap", &["--bs-", ".container", ".row", ".col-", ".btn"]),
    ("antd", &[".ant-", "--ant-"]),
    ("mui", &[".mui", "css-", "@emotion"]),
    ("chakra", &["--chakra-"]),
    ("radix", &["data-radix-", "[data-state"]),
];

/// Frameworks that are component libraries rather than styling systems.
const UI_LIBRARIES: [&str; 4] = ["mui", "antd", "chakra", "radix"];

const FONT_FACE_AT_RULE: &str = "@font-face";

/// Parse every `@font-face { ... }` block in `css`.
///
/// Declarations are split on `;` and keyed by lowercased property name.
/// Blocks without a closing brace are ignored.
pub fn parse_font_faces(css: &str, source: &Value) -> Vec<FontFace> {
    let lower = css.to_ascii_lowercase();
    let mut faces = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = lower[cursor..].find(FONT_FACE_AT_RULE) {
        let after_rule = cursor + offset + FONT_FACE_AT_RULE.len();
        let rest = &css[after_rule..];
        let body_start = after_rule + (rest.len() - rest.trim_start().len());
        cursor = after_rule;
        if !css[body_start..].starts_with('{') {
            continue;
        }
        let Some(close) = css[body_start + 1..].find('}') else {
            break;
        };
        let block = &css[body_start + 1..body_start + 1 + close];
        cursor = body_start + 1 + close + 1;
        faces.push(font_face_from_block(block, source));
    }

    faces
}

fn font_face_from_block(block: &str, source: &Value) -> FontFace {
    let mut props: BTreeMap<String, String> = BTreeMap::new();
    for decl in block.split(';') {
        let Some((name, value)) = decl.split_once(':') else {
            continue;
        };
        props.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
    }
    FontFace {
        font_family: props.remove("font-family"),
        src: props.remove("src"),
        font_style: props.remove("font-style"),
        font_weight: props.remove("font-weight"),
        unicode_range: props.remove("unicode-range"),
        source: source.clone(),
        page: None,
    }
}

pub fn scan_reduced_motion<S: AsRef<str>>(css_texts: &[S]) -> bool {
    css_texts
        .iter()
        .any(|css| css.as_ref().contains("prefers-reduced-motion"))
}

/// Framework keyword hits in one stylesheet.
pub fn scan_css_keywords(css: &str) -> BTreeMap<String, KeywordHits> {
    let lower = css.to_lowercase();
    FRAMEWORK_KEYWORDS
        .iter()
        .filter_map(|(framework, patterns)| {
            let matches: Vec<String> = patterns
                .iter()
                .filter(|p| lower.contains(*p))
                .map(|p| p.to_string())
                .collect();
            if matches.is_empty() {
                return None;
            }
            let count = patterns.iter().map(|p| lower.matches(p).count()).sum();
            Some((framework.to_string(), KeywordHits { matches, count }))
        })
        .collect()
}

/// Fold per-stylesheet keyword hits into the tech stack fingerprint.
///
/// The framework with the most hits names the styling system; ties go to the
/// framework listed first in [`FRAMEWORK_KEYWORDS`].
pub fn build_tech_stack<S: AsRef<str>>(css_texts: &[S]) -> TechStack {
    let mut totals: BTreeMap<String, KeywordHits> = BTreeMap::new();
    for css in css_texts {
        for (framework, hits) in scan_css_keywords(css.as_ref()) {
            let entry = totals.entry(framework).or_insert_with(|| KeywordHits {
                matches: Vec::new(),
                count: 0,
            });
            entry.count += hits.count;
            for m in hits.matches {
                if !entry.matches.contains(&m) {
                    entry.matches.push(m);
                }
            }
        }
    }

    let mut top: Option<(&str, usize)> = None;
    for (framework, _) in FRAMEWORK_KEYWORDS {
        if let Some(hits) = totals.get(*framework) {
            if top.map_or(true, |(_, best)| hits.count > best) {
                top = Some((*framework, hits.count));
            }
        }
    }

    let styling = match top {
        Some((framework, _)) => StylingFingerprint {
            name: if framework == "tailwind" {
                "Tailwind".to_string()
            } else {
                framework.to_string()
            },
            confidence: "Likely".to_string(),
            evidence: vec!["CSS keyword hits".to_string()],
        },
        None => StylingFingerprint {
            name: String::new(),
            confidence: "Uncertain".to_string(),
            evidence: Vec::new(),
        },
    };

    let ui_libs = UI_LIBRARIES
        .iter()
        .filter(|lib| totals.get(**lib).is_some_and(|h| h.count > 0))
        .map(|lib| lib.to_string())
        .collect();

    TechStack {
        styling,
        ui_libs,
        keyword_hits: totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_font_face_blocks_case_insensitively() {
        let css = r#"
            body { font-family: Inter, sans-serif; }
            @font-face {
                font-family: "Inter";
                src: url(/fonts/inter.woff2) format("woff2");
                font-weight: 100 900;
                font-style: normal;
            }
            @FONT-FACE{Font-Family:'Mono';Unicode-Range:U+0000-00FF}
        "#;
        let source = json!({"type": "inline", "index": 0});
        let faces = parse_font_faces(css, &source);
        assert_eq!(faces.len(), 2);
        assert_eq!(faces[0].font_family.as_deref(), Some("\"Inter\""));
        assert_eq!(faces[0].font_weight.as_deref(), Some("100 900"));
        assert_eq!(
            faces[0].src.as_deref(),
            Some("url(/fonts/inter.woff2) format(\"woff2\")")
        );
        assert_eq!(faces[1].font_family.as_deref(), Some("'Mono'"));
        assert_eq!(faces[1].unicode_range.as_deref(), Some("U+0000-00FF"));
        assert_eq!(faces[1].source, source);
    }

    #[test]
    fn unterminated_font_face_is_ignored() {
        let faces = parse_font_faces("@font-face { font-family: Broken;", &Value::Null);
        assert!(faces.is_empty());
        let faces = parse_font_faces("@font-face-like {} @font-face {font-family: A}", &Value::Null);
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].font_family.as_deref(), Some("A"));
    }

    #[test]
    fn reduced_motion_detection() {
        assert!(scan_reduced_motion(&[
            "a{}",
            "@media (prefers-reduced-motion: reduce) { * { animation: none } }"
        ]));
        assert!(!scan_reduced_motion(&["a{}"]));
        assert!(!scan_reduced_motion::<&str>(&[]));
    }

    #[test]
    fn keyword_hits_count_every_pattern() {
        let hits = scan_css_keywords(".btn{--tw-ring-color:1} .btn:hover{--tw-shadow:0} @layer base{}");
        assert_eq!(hits["tailwind"].matches, vec!["--tw-", "@layer", "ring-"]);
        assert_eq!(hits["tailwind"].count, 4);
        assert_eq!(hits["bootstrap"].matches, vec![".btn"]);
        assert_eq!(hits["bootstrap"].count, 2);
        assert!(!hits.contains_key("chakra"));
    }

    #[test]
    fn tech_stack_picks_top_framework_and_ui_libs() {
        let stack = build_tech_stack(&[
            ".ant-btn{} .ant-card{}",
            "[data-state=open]{} .ant-modal{}",
        ]);
        assert_eq!(stack.styling.name, "antd");
        assert_eq!(stack.styling.confidence, "Likely");
        assert_eq!(stack.ui_libs, vec!["antd", "radix"]);
        assert_eq!(stack.keyword_hits["antd"].count, 3);

        let tailwind = build_tech_stack(&["--tw-ring-color: red;"]);
        assert_eq!(tailwind.styling.name, "Tailwind");

        let empty = build_tech_stack::<&str>(&[]);
        assert_eq!(empty.styling.confidence, "Uncertain");
        assert!(empty.ui_libs.is_empty());
    }
}
