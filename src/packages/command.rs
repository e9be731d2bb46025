//! Command probes
//!
//! Runs a package manager listing command and counts its output lines.

use std::process::{Command, Stdio};
use tracing::debug;

use super::source::SearchPath;
use super::{SkipReason, SourceOutcome};
use crate::error::FetchError;

/// Run `program args..` and count the packages it lists.
///
/// A program missing from `search_path` is skipped without being run.
/// Spawn errors and unsuccessful exits become `SourceOutcome::Failed`.
pub fn probe(program: &str, args: &[String], search_path: &SearchPath) -> SourceOutcome {
    let Some(executable) = search_path.resolve(program) else {
        debug!("{} not found on search path, skipping", program);
        return SourceOutcome::Skipped(SkipReason::ExecutableNotFound);
    };

    debug!("Running {} {:?}", executable.display(), args);
    let output = match Command::new(&executable)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            return SourceOutcome::Failed(FetchError::Spawn {
                program: program.to_string(),
                source: e,
            });
        }
    };

    if !output.status.success() {
        return SourceOutcome::Failed(FetchError::CommandFailed {
            program: program.to_string(),
            code: output.status.code(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    SourceOutcome::Counted(count_listed_lines(&stdout))
}

/// Number of package lines in a listing.
///
/// Splitting on `\n` yields one more piece than there are terminated lines,
/// so the trailing piece is discounted. Output lacking a final newline is
/// undercounted by one.
pub fn count_listed_lines(output: &str) -> usize {
    output.split('\n').count() - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_listed_lines() {
        assert_eq!(count_listed_lines("a\nb\nc\n"), 3);
        assert_eq!(count_listed_lines(""), 0);
        assert_eq!(count_listed_lines("\n"), 1);
    }

    #[test]
    fn test_count_listed_lines_without_trailing_newline_undercounts() {
        assert_eq!(count_listed_lines("a\nb\nc"), 2);
        assert_eq!(count_listed_lines("single"), 0);
    }

    #[test]
    fn test_probe_missing_program_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = probe("efetch-absent", &[], &SearchPath::from_dirs([dir.path()]));
        assert!(matches!(
            outcome,
            SourceOutcome::Skipped(SkipReason::ExecutableNotFound)
        ));
        assert_eq!(outcome.contribution(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_counts_stdout_lines() {
        let outcome = probe(
            "sh",
            &["-c".to_string(), "printf 'a\\nb\\nc\\n'".to_string()],
            &SearchPath::Env,
        );
        assert!(matches!(outcome, SourceOutcome::Counted(3)), "{:?}", outcome);
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_nonzero_exit_contributes_zero() {
        let outcome = probe(
            "sh",
            &["-c".to_string(), "echo one; echo two; exit 2".to_string()],
            &SearchPath::Env,
        );
        assert!(matches!(
            outcome,
            SourceOutcome::Failed(FetchError::CommandFailed { code: Some(2), .. })
        ));
        assert_eq!(outcome.contribution(), 0);
    }
}
