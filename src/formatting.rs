use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dsx_lib::types::{TokenEntry, VerificationStatus};
use dsx_lib::{DsxError, DsxOutput, ErrorOutput, DSX_OUTPUT_VERSION};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &DsxOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the fatal exit code.
pub fn render_error(err: DsxError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    let error_payload = err.to_payload();
    let payload = DsxOutput::Error(ErrorOutput {
        version: DSX_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    ExitCode::from(2)
}

fn write_json_output(body: &DsxOutput, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

fn write_pretty_output(body: &DsxOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

fn token_line(entries: &[TokenEntry], limit: usize) -> String {
    if entries.is_empty() {
        return "-".to_string();
    }
    entries
        .iter()
        .take(limit)
        .map(|e| format!("{} ({})", e.value, e.count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &DsxOutput, colorize: bool) -> String {
    match body {
        DsxOutput::Synthesize(doc) => {
            let mut buf = String::new();
            let header = color("[SYNTHESIZE]", "36", colorize);
            writeln!(
                buf,
                "{} {} ({} samples, {} candidates)",
                header, doc.meta.site_name, doc.meta.sample_count, doc.meta.candidate_count
            )
            .ok();

            let primitive = &doc.tokens.primitive;
            writeln!(buf, "Tokens:").ok();
            for (label, entries) in [
                ("neutrals", &primitive.color.neutrals),
                ("accents", &primitive.color.accents),
                ("type scale", &primitive.typography.scale),
                ("spacing", &primitive.spacing.scale),
                ("radius", &primitive.radius.scale),
                ("durations", &primitive.motion.durations),
            ] {
                writeln!(buf, "- {:12} {}", label, token_line(entries, 5)).ok();
            }

            let fonts = &doc.font_forensics;
            let status = match fonts.verified_status {
                VerificationStatus::Verified => color("VERIFIED", "32", colorize),
                VerificationStatus::Unverified => color("UNVERIFIED", "33", colorize),
            };
            let families = if fonts.conclusion.primary_families.is_empty() {
                "-".to_string()
            } else {
                fonts.conclusion.primary_families.join(", ")
            };
            writeln!(buf, "Fonts: {} {}", status, families).ok();

            let a11y = &doc.accessibility;
            writeln!(
                buf,
                "Accessibility: {} undersized targets, {} focus-ring gaps, reduced motion {}",
                a11y.target_sizes.len(),
                a11y.focus_ring.gaps.len(),
                if a11y.reduced_motion.detected {
                    "detected"
                } else {
                    "not detected"
                }
            )
            .ok();
            writeln!(
                buf,
                "Styling: {} ({})",
                doc.tech_stack.styling.name, doc.tech_stack.styling.confidence
            )
            .ok();

            for note in &doc.notes {
                writeln!(buf, "{note}").ok();
            }
            buf
        }
        DsxOutput::Discover(out) => {
            let mut buf = String::new();
            let header = color("[DISCOVER]", "34", colorize);
            writeln!(
                buf,
                "{} {} candidates at {}",
                header, out.candidate_count, out.viewport
            )
            .ok();
            for candidate in &out.candidates {
                let score = color(&format!("{:5.2}", candidate.score), score_color_code(candidate.score), colorize);
                writeln!(
                    buf,
                    "- {} {:10} {:?} [{}]",
                    score,
                    candidate.group.to_string(),
                    candidate.text,
                    candidate.matched_rules.join(", ")
                )
                .ok();
            }
            buf
        }
        DsxOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Map a candidate score to an ANSI color code.
fn score_color_code(score: f64) -> &'static str {
    if score >= 6.0 {
        "32" // green
    } else if score >= 3.0 {
        "33" // yellow
    } else {
        "31" // red
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsx_lib::error::{ErrorCategory, ErrorPayload};
    use dsx_lib::types::{BoundingBox, CandidateGroup, CandidateObservation};
    use dsx_lib::{build_results, discover_candidates, Config, DiscoverOutput, EvidenceBatch, Viewport};

    #[test]
    fn render_error_always_returns_fatal_exit_code() {
        let code = render_error(
            DsxError::Config("boom".to_string()),
            OutputFormat::Json,
            None,
        );
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn render_error_writes_payload_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("error.json");
        let code = render_error(
            DsxError::input("samples.json", "required file not found"),
            OutputFormat::Json,
            Some(path.clone()),
        );
        assert_eq!(code, ExitCode::from(2));
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("\"mode\":\"error\""));
        assert!(written.contains("\"category\":\"input\""));
    }

    #[test]
    fn format_pretty_summarizes_results() {
        let doc = build_results(EvidenceBatch::default(), &Config::default());
        let pretty = format_pretty(&DsxOutput::Synthesize(doc), false);
        assert!(pretty.contains("[SYNTHESIZE] site (0 samples, 0 candidates)"));
        assert!(pretty.contains("Tokens:"));
        assert!(pretty.contains("neutrals"));
        assert!(pretty.contains("Fonts: UNVERIFIED -"));
        assert!(pretty.contains("reduced motion not detected"));
        assert!(pretty.contains("Limits: none detected"));
    }

    #[test]
    fn format_pretty_lists_candidates_with_rules() {
        let observation = CandidateObservation {
            id: None,
            group: CandidateGroup::Cta,
            page: "home".to_string(),
            breakpoint: "desktop".to_string(),
            theme: "default".to_string(),
            selector: None,
            selector_path: "main > a".to_string(),
            text: "Start free trial".to_string(),
            role: None,
            aria_label: None,
            bbox: BoundingBox {
                x: 0.0,
                y: 100.0,
                width: 120.0,
                height: 40.0,
            },
            crop_path: None,
            computed: Default::default(),
        };
        let candidates = discover_candidates(vec![observation], 900.0, &Config::default());
        let output = DsxOutput::Discover(DiscoverOutput::new(Viewport::default(), candidates));
        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[DISCOVER] 1 candidates at 1440x900"));
        assert!(pretty.contains("\"Start free trial\""));
        assert!(pretty.contains("action_group, cta_text"));
    }

    #[test]
    fn format_pretty_handles_errors() {
        let output = DsxOutput::Error(ErrorOutput {
            version: DSX_OUTPUT_VERSION.to_string(),
            message: Some("bad input".to_string()),
            error: ErrorPayload {
                category: ErrorCategory::Config,
                message: "bad input".to_string(),
                remediation: Some("check flags".to_string()),
            },
        });

        let pretty = format_pretty(&output, false);
        assert!(pretty.contains("[ERROR] bad input"));
        assert!(pretty.contains("Hint: check flags"));
    }
}
