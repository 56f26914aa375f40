use clap::{Parser, Subcommand, ValueEnum};
use dsx_lib::Viewport;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dsx")]
#[command(
    version,
    about = "Design System Extractor - Synthesize design tokens from rendered-page evidence",
    long_about = "Design System Extractor (DSX)\n\nModes:\n- synthesize: turn a collector run directory (samples, state captures, fonts, stylesheets) into a results document with tokens, interaction model, accessibility and font forensics.\n- discover: score, deduplicate and rank raw candidate observations from a discovery capture.\n\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) to set thresholds, caps and breakpoints; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize a results document from a collector run directory
    Synthesize {
        #[arg(long, value_name = "DIR", help = "Evidence directory written by the collector")]
        input: PathBuf,

        #[arg(
            long,
            default_value = "12",
            help = "Entries kept in each token scale before the rest become outliers"
        )]
        top_n: usize,

        #[arg(
            long,
            default_value = "16",
            value_name = "PX",
            help = "Root font size used to resolve rem/em lengths"
        )]
        root_font_size: f64,

        #[arg(
            long,
            help = "Keep active-state captures for navigational elements (skipped by default)"
        )]
        allow_anchor_active: bool,

        #[arg(
            long,
            value_name = "FILE",
            help = "JSON list of selector paths (or {selector_path} objects) to keep; others are ignored"
        )]
        selected: Option<PathBuf>,

        #[arg(
            long,
            value_name = "LIST",
            help = "Expected breakpoints as NAME=WIDTHxHEIGHT, comma-separated (e.g., desktop=1440x900,mobile=390x844)"
        )]
        breakpoints: Option<String>,

        #[arg(
            long,
            value_name = "LIST",
            help = "Expected theme modes, comma-separated (e.g., light,dark)"
        )]
        theme_modes: Option<String>,

        #[arg(long, help = "Do not require samples.json in the evidence directory")]
        candidates_only: bool,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Score and rank raw candidate observations
    Discover {
        #[arg(long, value_name = "FILE", help = "JSON list of candidate observations")]
        input: PathBuf,

        #[arg(
            long,
            default_value = "1440x900",
            help = "Viewport the candidates were captured in (WIDTHxHEIGHT)"
        )]
        viewport: Viewport,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, OutputFormat};
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn synthesize_command_uses_defaults() {
        let cli = Cli::parse_from(["dsx", "synthesize", "--input", "runs/acme"]);

        assert!(!cli.verbose);
        assert!(cli.config.is_none());

        match cli.command {
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
                assert_eq!(input, Path::new("runs/acme"));
                assert_eq!(top_n, 12);
                assert_eq!(root_font_size, 16.0);
                assert!(!allow_anchor_active);
                assert!(selected.is_none());
                assert!(breakpoints.is_none());
                assert!(theme_modes.is_none());
                assert!(!candidates_only);
                assert!(matches!(format, OutputFormat::Json));
                assert!(output.is_none());
            }
            _ => panic!("expected synthesize command"),
        }
    }

    #[test]
    fn synthesize_command_respects_overrides() {
        let cli = Cli::parse_from([
            "dsx",
            "--verbose",
            "synthesize",
            "--input",
            "runs/acme",
            "--top-n",
            "8",
            "--root-font-size",
            "10",
            "--allow-anchor-active",
            "--selected",
            "selected.json",
            "--breakpoints",
            "desktop=1280x800",
            "--theme-modes",
            "light,dark",
            "--candidates-only",
            "--format",
            "pretty",
            "-o",
            "results.json",
            "--config",
            "dsx.toml",
        ]);

        assert!(cli.verbose);
        assert_eq!(cli.config.as_deref(), Some(Path::new("dsx.toml")));
        match cli.command {
            Commands::Synthesize {
                top_n,
                root_font_size,
                allow_anchor_active,
                selected,
                breakpoints,
                theme_modes,
                candidates_only,
                format,
                output,
                ..
            } => {
                assert_eq!(top_n, 8);
                assert_eq!(root_font_size, 10.0);
                assert!(allow_anchor_active);
                assert_eq!(selected.as_deref(), Some(Path::new("selected.json")));
                assert_eq!(breakpoints.as_deref(), Some("desktop=1280x800"));
                assert_eq!(theme_modes.as_deref(), Some("light,dark"));
                assert!(candidates_only);
                assert!(matches!(format, OutputFormat::Pretty));
                assert_eq!(output.as_deref(), Some(Path::new("results.json")));
            }
            _ => panic!("expected synthesize command"),
        }
    }

    #[test]
    fn discover_command_parses_viewport() {
        let cli = Cli::parse_from([
            "dsx",
            "discover",
            "--input",
            "candidates.json",
            "--viewport",
            "390x844",
        ]);
        match cli.command {
            Commands::Discover {
                input,
                viewport,
                format,
                output,
            } => {
                assert_eq!(input, Path::new("candidates.json"));
                assert_eq!(viewport.width, 390);
                assert_eq!(viewport.height, 844);
                assert!(matches!(format, OutputFormat::Json));
                assert!(output.is_none());
            }
            _ => panic!("expected discover command"),
        }
    }

    #[test]
    fn discover_rejects_malformed_viewport() {
        let result = Cli::try_parse_from([
            "dsx",
            "discover",
            "--input",
            "candidates.json",
            "--viewport",
            "wide",
        ]);
        assert!(result.is_err());
    }
}
