//! Directory probes
//!
//! Some package managers keep one directory per installed package instead of
//! offering a listing command. For those, every glob is expanded to the
//! matching paths and each match is walked recursively; every non-directory
//! entry found counts as one.
//!
//! Failures are scoped to a single glob: a bad pattern or an unreadable tree
//! zeroes that glob's share and the remaining globs still count.

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

use super::SourceOutcome;
use crate::error::FetchError;

const GLOB_META: &[char] = &['*', '?', '[', '{', '<'];

/// Count entries under every directory matched by `globs`.
///
/// Returns `Counted` with the sum over the globs that succeeded. Only when
/// every glob failed is the first failure reported instead.
pub fn probe(globs: &[String]) -> SourceOutcome {
    let mut total = 0;
    let mut first_failure = None;
    let mut any_counted = false;

    for pattern in globs {
        match count_glob(pattern) {
            Ok(count) => {
                debug!("{} -> {} entries", pattern, count);
                total += count;
                any_counted = true;
            }
            Err(e) => {
                debug!("{} contributes nothing: {}", pattern, e);
                first_failure.get_or_insert(e);
            }
        }
    }

    match first_failure {
        Some(e) if !any_counted => SourceOutcome::Failed(e),
        _ => SourceOutcome::Counted(total),
    }
}

/// Count non-directory entries below every path matched by one glob.
pub fn count_glob(pattern: &str) -> Result<usize, FetchError> {
    expand(pattern)?
        .iter()
        .try_fold(0, |acc, path| Ok::<usize, FetchError>(acc + count_files(path)?))
}

/// Expand a filesystem glob into the sorted list of existing matches.
///
/// The literal leading components are used as the walk root and the rest is
/// matched component by component, so `*` never crosses a separator. A
/// pattern ending in `/` only matches directories. A root that doesn't
/// exist simply yields no matches.
pub fn expand(pattern: &str) -> Result<Vec<PathBuf>, FetchError> {
    let dirs_only = pattern.ends_with('/');
    let trimmed = pattern.trim_end_matches('/');
    let (root, variant) = partition(trimmed);

    let Some(variant) = variant else {
        let exists = if dirs_only { root.is_dir() } else { root.exists() };
        return Ok(if exists { vec![root] } else { Vec::new() });
    };

    let glob = Glob::new(&variant).map_err(|e| FetchError::glob(pattern, e))?;
    let depth = variant.split('/').count();

    // Symlinked directories are traversed like a shell glob would; loops
    // surface as entry errors and are dropped
    let mut matches: Vec<PathBuf> = WalkDir::new(&root)
        .follow_links(true)
        .min_depth(depth)
        .max_depth(depth)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| !dirs_only || entry.path().is_dir())
        .filter(|entry| {
            entry
                .path()
                .strip_prefix(&root)
                .map(|rel| {
                    let rel = rel.to_string_lossy();
                    glob.matched(&CandidatePath::from(rel.as_ref())).is_some()
                })
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    matches.sort();
    Ok(matches)
}

/// Split a glob into its literal root directory and the variant remainder.
///
/// Returns `None` for the remainder when the pattern has no wildcards.
fn partition(pattern: &str) -> (PathBuf, Option<String>) {
    let components: Vec<&str> = pattern.split('/').collect();
    let split = components
        .iter()
        .position(|c| c.contains(GLOB_META))
        .unwrap_or(components.len());

    let literal = components[..split].join("/");
    let root = match literal.as_str() {
        "" if pattern.starts_with('/') => PathBuf::from("/"),
        "" => PathBuf::from("."),
        path => PathBuf::from(path),
    };

    if split == components.len() {
        (root, None)
    } else {
        (root, Some(components[split..].join("/")))
    }
}

/// Recursively count everything under `path` that isn't a directory.
///
/// A path that is itself a file counts as one. Links inside the tree are
/// counted, not followed.
fn count_files(path: &Path) -> Result<usize, FetchError> {
    let mut count = 0;
    for entry in WalkDir::new(path) {
        let entry = entry.map_err(|e| FetchError::Walk {
            path: path.to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_dir() {
            count += 1;
        }
    }
    Ok(count)
}
