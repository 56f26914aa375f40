use std::path::PathBuf;
use std::process::ExitCode;

use dsx_lib::evidence::load_selected_paths;
use dsx_lib::{build_results, DsxError, DsxOutput, EvidenceDir, LoadOptions};
use tracing::{debug, info};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::{
    format_effective_config, load_config, resolve_synthesize_settings, validate_config,
    SynthesizeFlagSources, SynthesizeOverrides,
};

/// Run the synthesize command.
#[allow(clippy::too_many_arguments)]
pub async fn run_synthesize(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    input: PathBuf,
    top_n: usize,
    root_font_size: f64,
    allow_anchor_active: bool,
    selected: Option<PathBuf>,
    breakpoints: Option<String>,
    theme_modes: Option<String>,
    candidates_only: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };

    let selected_paths = match &selected {
        Some(path) => match load_selected_paths(path).await {
            Ok(paths) => {
                debug!(count = paths.len(), "loaded selected paths");
                Some(paths)
            }
            Err(err) => return render_error(err, format, output),
        },
        None => None,
    };

    let flags = SynthesizeFlagSources::from_args(raw_args);
    let config = resolve_synthesize_settings(
        SynthesizeOverrides {
            top_n,
            root_font_size,
            allow_anchor_active,
            breakpoints,
            theme_modes,
            selected_paths,
        },
        &config,
        &flags,
    );
    if let Err(err) = validate_config(&config, config_path.as_deref()) {
        return render_error(err, format, output);
    }
    info!("{}", format_effective_config(&config, config_path.as_deref()));

    let evidence = EvidenceDir::new(input);
    let batch = match evidence
        .load(LoadOptions {
            require_samples: !candidates_only,
        })
        .await
    {
        Ok(batch) => batch,
        Err(err) => return render_error(err, format, output),
    };

    let results = build_results(batch, &config);
    info!(
        samples = results.meta.sample_count,
        notes = results.notes.len(),
        "synthesized results for {}",
        evidence.root().display()
    );

    let body = DsxOutput::Synthesize(results);
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(DsxError::Unknown(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
