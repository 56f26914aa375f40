use std::path::PathBuf;
use std::process::ExitCode;

use dsx_lib::evidence::load_candidate_observations;
use dsx_lib::{
    discover_candidates, rank_candidates, Config, DiscoverOutput, DsxError, DsxOutput, Viewport,
};
use tracing::info;

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::{load_config, resolve_viewport, validate_config};

/// Run the discover command.
pub async fn run_discover(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    input: PathBuf,
    viewport: Viewport,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    let viewport = resolve_viewport(viewport, &config, raw_args);
    let config = Config { viewport, ..config };
    if let Err(err) = validate_config(&config, config_path.as_deref()) {
        return render_error(err, format, output);
    }

    let observations = match load_candidate_observations(&input).await {
        Ok(obs) => obs,
        Err(err) => return render_error(err, format, output),
    };
    let raw_count = observations.len();

    let candidates = rank_candidates(discover_candidates(
        observations,
        f64::from(viewport.height),
        &config,
    ));
    info!(
        raw = raw_count,
        kept = candidates.len(),
        viewport = %viewport,
        "ranked discovery candidates"
    );

    let body = DsxOutput::Discover(DiscoverOutput::new(viewport, candidates));
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(DsxError::Unknown(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
