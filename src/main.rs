mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{run_discover, run_synthesize};
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();
    init_logging(args.verbose);

    match args.command {
        Commands::Synthesize {
            input,
            top_n,
            root_font_size,
            allow_anchor_active,
            selected,
            breakpoints,
            theme_modes,
            candidates_only,
            format,
            output,
        } => {
            run_synthesize(
                &raw_args,
                args.config,
                input,
                top_n,
                root_font_size,
                allow_anchor_active,
                selected,
                breakpoints,
                theme_modes,
                candidates_only,
                format,
                output,
            )
            .await
        }
        Commands::Discover {
            input,
            viewport,
            format,
            output,
        } => run_discover(&raw_args, args.config, input, viewport, format, output).await,
    }
}
