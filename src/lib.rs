//! Design System Extractor (DSX) Library
//!
//! Turns the evidence a browser collector leaves on disk (component samples
//! with computed styles, interaction state captures, font requests and
//! stylesheets) into a deterministic design-system results document.
//!
//! # Module Overview
//!
//! - [`evidence`] - Loading a collector's artifact directory
//! - [`synthesis`] - Candidate scoring, token clustering, state diffs, accessibility, font forensics
//! - [`config`] - Configuration file support
//! - [`types`] - Evidence and results data types
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use dsx_lib::{build_results, Config, EvidenceDir, LoadOptions};
//!
//! # async fn example() -> dsx_lib::Result<()> {
//! let config = Config::load(None)?;
//! let batch = EvidenceDir::new("runs/acme").load(LoadOptions::default()).await?;
//! let results = build_results(batch, &config);
//! println!("{}", results.notes.join("\n"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod evidence;
pub mod output;
pub mod synthesis;
pub mod types;
pub mod viewport;

pub use config::Config;
pub use error::{DsxError, ErrorCategory, ErrorPayload, Result};
pub use evidence::{EvidenceBatch, EvidenceDir, LoadOptions};
pub use output::{DiscoverOutput, DsxOutput, ErrorOutput, DSX_OUTPUT_VERSION};
pub use synthesis::{build_results, discover_candidates, rank_candidates};
pub use types::{Candidate, ResultsDocument, Sample};
pub use viewport::{Breakpoint, Viewport};
