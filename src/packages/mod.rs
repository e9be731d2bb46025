//! Package counting
//!
//! Counts installed packages by querying every known source that applies to
//! the current OS, all at once.
//!
//! # Design
//!
//! - **Fork-join**: one scoped thread per eligible source, joined
//!   unconditionally. There is no timeout; a hung package manager stalls the
//!   whole count.
//! - **Explicit outcomes**: every probe returns a `SourceOutcome`. The
//!   reduction to a single total happens after the join, so there is no
//!   shared accumulator.
//! - **Never fails**: missing executables, failing commands, bad globs and
//!   unreadable directories all contribute zero. Callers only ever see a
//!   number.

pub mod command;
pub mod directory;
pub mod source;

use std::collections::HashSet;
use std::fmt;
use std::thread;
use tracing::{debug, info};

use crate::error::FetchError;
pub use source::{default_sources, PackageSource, SearchPath, SourceKind};

/// Why a source was not probed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The identifier is in the exclusion list
    Excluded,
    /// The command's executable is not on the search path
    ExecutableNotFound,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excluded => write!(f, "excluded"),
            Self::ExecutableNotFound => write!(f, "executable not found"),
        }
    }
}

/// Result of probing a single source
#[derive(Debug)]
pub enum SourceOutcome {
    /// The source reported this many packages
    Counted(usize),
    /// The source was deliberately not probed
    Skipped(SkipReason),
    /// The probe ran and failed
    Failed(FetchError),
}

impl SourceOutcome {
    /// What this outcome adds to the total.
    pub fn contribution(&self) -> usize {
        match self {
            Self::Counted(count) => *count,
            Self::Skipped(_) | Self::Failed(_) => 0,
        }
    }
}

impl fmt::Display for SourceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Counted(count) => write!(f, "{} packages", count),
            Self::Skipped(reason) => write!(f, "skipped ({})", reason),
            Self::Failed(e) => write!(f, "failed ({})", e),
        }
    }
}

/// Per-source outcomes of one aggregation run
#[derive(Debug, Default)]
pub struct PackageReport {
    outcomes: Vec<(String, SourceOutcome)>,
}

impl PackageReport {
    /// Sum of every source's contribution.
    pub fn total(&self) -> usize {
        self.outcomes.iter().map(|(_, o)| o.contribution()).sum()
    }

    /// Outcomes in source-table order. Sources whose OS pattern didn't match
    /// are absent.
    pub fn outcomes(&self) -> &[(String, SourceOutcome)] {
        &self.outcomes
    }

    /// Outcome for the first source with this identifier.
    pub fn outcome(&self, id: &str) -> Option<&SourceOutcome> {
        self.outcomes
            .iter()
            .find(|(source_id, _)| source_id == id)
            .map(|(_, outcome)| outcome)
    }
}

// ============================================================================
// Aggregator
// ============================================================================

/// Queries a set of package sources concurrently
#[derive(Debug, Clone)]
pub struct PackageAggregator {
    sources: Vec<PackageSource>,
    search_path: SearchPath,
}

impl Default for PackageAggregator {
    fn default() -> Self {
        Self::new(default_sources())
    }
}

impl PackageAggregator {
    /// Create an aggregator over `sources`, resolving commands via `PATH`.
    pub fn new(sources: Vec<PackageSource>) -> Self {
        Self {
            sources,
            search_path: SearchPath::Env,
        }
    }

    /// Resolve command sources against `search_path` instead of `PATH`.
    pub fn with_search_path(mut self, search_path: SearchPath) -> Self {
        self.search_path = search_path;
        self
    }

    pub fn sources(&self) -> &[PackageSource] {
        &self.sources
    }

    /// Probe every source that applies to `os_identifier` and collect the
    /// outcomes.
    ///
    /// Excluded sources are recorded as skipped without being probed.
    pub fn report(&self, os_identifier: &str, excluded: &HashSet<String>) -> PackageReport {
        let mut outcomes: Vec<(String, Option<SourceOutcome>)> = Vec::new();
        let mut eligible = Vec::new();

        for source in self.sources.iter().filter(|s| s.matches_os(os_identifier)) {
            if source.is_excluded(excluded) {
                debug!("Package source {} excluded", source.id());
                outcomes.push((
                    source.id().to_string(),
                    Some(SourceOutcome::Skipped(SkipReason::Excluded)),
                ));
            } else {
                eligible.push((outcomes.len(), source));
                outcomes.push((source.id().to_string(), None));
            }
        }

        let search_path = &self.search_path;
        let probed: Vec<(usize, SourceOutcome)> = thread::scope(|scope| {
            let handles: Vec<_> = eligible
                .iter()
                .map(|&(slot, source)| {
                    let handle = scope.spawn(move || probe(source, search_path));
                    (slot, source, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(slot, source, handle)| {
                    let outcome = handle.join().unwrap_or_else(|_| {
                        SourceOutcome::Failed(FetchError::Panicked(source.id().to_string()))
                    });
                    (slot, outcome)
                })
                .collect()
        });

        for (slot, outcome) in probed {
            outcomes[slot].1 = Some(outcome);
        }

        let report = PackageReport {
            outcomes: outcomes
                .into_iter()
                .filter_map(|(id, outcome)| outcome.map(|o| (id, o)))
                .collect(),
        };

        for (id, outcome) in report.outcomes() {
            debug!("Package source {}: {}", id, outcome);
        }
        info!(
            "Counted {} packages from {} source(s) for {:?}",
            report.total(),
            report.outcomes().len(),
            os_identifier
        );
        report
    }

    /// Total package count for `os_identifier`. Never fails.
    pub fn count(&self, os_identifier: &str, excluded: &HashSet<String>) -> usize {
        self.report(os_identifier, excluded).total()
    }
}

fn probe(source: &PackageSource, search_path: &SearchPath) -> SourceOutcome {
    match source.kind() {
        SourceKind::Command { program, args } => command::probe(program, args, search_path),
        SourceKind::Directory { globs } => directory::probe(globs),
    }
}

/// Count installed packages using the built-in source table and `PATH`.
pub fn count_packages(os_identifier: &str, excluded: &HashSet<String>) -> usize {
    PackageAggregator::default().count(os_identifier, excluded)
}

/// Parse a comma-separated exclusion list.
///
/// An empty string yields a single empty identifier, which matches no source.
pub fn parse_exclusions(raw: &str) -> HashSet<String> {
    raw.split(',').map(str::to_string).collect()
}
