//! efetch library
//!
//! Prints a system summary beside a distribution logo. The two moving parts
//! are the concurrent package counter in [`packages`] and the pattern-based
//! logo engine in [`logo`]; [`host`] and [`compositor`] gather the remaining
//! facts and lay out the output.

pub mod cli;
pub mod compositor;
pub mod config;
pub mod error;
pub mod host;
pub mod logo;
pub mod packages;

// Re-export main types for convenience
pub use config::Settings;
pub use error::FetchError;
pub use host::SystemSummary;
pub use logo::{ColorPalette, LogoEntry, LogoRegistry};
pub use packages::{
    count_packages, default_sources, parse_exclusions, PackageAggregator, PackageReport,
    PackageSource, SearchPath, SkipReason, SourceOutcome,
};
