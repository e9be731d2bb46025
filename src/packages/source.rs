//! Package source definitions
//!
//! A source is one way of discovering installed packages: either a package
//! manager command whose output has one line per package, or a set of
//! directory globs where each installed package owns a directory.
//!
//! | Identifier   | OS pattern       | Probe                                   |
//! |--------------|------------------|-----------------------------------------|
//! | `dpkg-query` | `^debian`/`^ubuntu` | `dpkg-query -f '${binary:Package}\n' -W` |
//! | `pacman`     | `^arch`          | `pacman -Q`                             |
//! | `rpm`        | `^fedora`        | `rpm -qa`                               |
//! | `apk`        | `^alpine`        | `apk info`                              |
//! | `equery`     | `^gentoo`        | `equery list`                           |
//! | `zypper`     | `^opensuse`      | `zypper se -i`                          |
//! | `kiss`       | `^kiss`          | `/var/db/kiss/installed/*/`             |
//! | `cpt-list`   | `^cpt-list`      | `/var/db/cpt/installed/*/`              |
//! | `homebrew`   | `^homebrew`      | `/usr/local/Cellar/*/`, `/usr/local/Caskroom/*/` |
//! | `portage`    | `^portage`       | `/var/db/pkg/*/*/`                      |
//! | `pkgtool`    | `^pkgtool`       | `/var/log/packages/*`                   |
//! | `eopkg`      | `^eopkg`         | `/var/lib/eopkg/package/*`              |
//!
//! All OS patterns are case-insensitive.

use regex::Regex;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::warn;

use crate::error::FetchError;

/// How a source discovers packages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Run `program args..` and count stdout lines
    Command { program: String, args: Vec<String> },
    /// Count non-directory entries under every directory matched by the globs
    Directory { globs: Vec<String> },
}

/// One package-count discovery unit
#[derive(Debug, Clone)]
pub struct PackageSource {
    id: String,
    os_pattern: Regex,
    kind: SourceKind,
}

impl PackageSource {
    /// Create a command source.
    ///
    /// The identifier is the exclusion key (conventionally the program name).
    pub fn command(
        id: impl Into<String>,
        os_pattern: &str,
        program: impl Into<String>,
        args: &[&str],
    ) -> Result<Self, FetchError> {
        Ok(Self {
            id: id.into(),
            os_pattern: compile(os_pattern)?,
            kind: SourceKind::Command {
                program: program.into(),
                args: args.iter().map(|a| a.to_string()).collect(),
            },
        })
    }

    /// Create a directory source from one or more glob patterns.
    ///
    /// A glob ending in `/` only matches directories.
    pub fn directory(
        id: impl Into<String>,
        os_pattern: &str,
        globs: &[&str],
    ) -> Result<Self, FetchError> {
        Ok(Self {
            id: id.into(),
            os_pattern: compile(os_pattern)?,
            kind: SourceKind::Directory {
                globs: globs.iter().map(|g| g.to_string()).collect(),
            },
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &SourceKind {
        &self.kind
    }

    /// Returns true if the OS pattern is found anywhere in `os_identifier`.
    pub fn matches_os(&self, os_identifier: &str) -> bool {
        self.os_pattern.is_match(os_identifier)
    }

    /// Returns true if this source's identifier is in the exclusion set.
    pub fn is_excluded(&self, excluded: &HashSet<String>) -> bool {
        excluded.contains(&self.id)
    }
}

fn compile(pattern: &str) -> Result<Regex, FetchError> {
    Regex::new(pattern).map_err(|e| FetchError::invalid_pattern(pattern, e))
}

// ============================================================================
// Executable Resolution
// ============================================================================

/// Where command sources look for their executables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchPath {
    /// The process `PATH`
    #[default]
    Env,
    /// An explicit `PATH`-style list of directories
    Custom(OsString),
}

impl SearchPath {
    /// Build a custom search path from a list of directories.
    pub fn from_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let dirs: Vec<PathBuf> = dirs.into_iter().map(Into::into).collect();
        match std::env::join_paths(&dirs) {
            Ok(joined) => Self::Custom(joined),
            Err(e) => {
                warn!("Unusable search path entry, falling back to PATH: {}", e);
                Self::Env
            }
        }
    }

    /// Resolve `program` to an executable path, or `None` if it isn't installed.
    pub fn resolve(&self, program: &str) -> Option<PathBuf> {
        match self {
            Self::Env => which::which(program).ok(),
            Self::Custom(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
                which::which_in(program, Some(paths), cwd).ok()
            }
        }
    }
}

// ============================================================================
// Built-in Sources
// ============================================================================

const DPKG_ARGS: &[&str] = &["-f", "${binary:Package}\n", "-W"];

/// The fixed set of sources efetch knows about.
///
/// Definitions are static; an entry that fails to compile is logged and left
/// out rather than aborting the whole table.
pub fn default_sources() -> Vec<PackageSource> {
    let definitions = [
        PackageSource::command("dpkg-query", "(?i)^debian", "dpkg-query", DPKG_ARGS),
        PackageSource::command("dpkg-query", "(?i)^ubuntu", "dpkg-query", DPKG_ARGS),
        PackageSource::command("pacman", "(?i)^arch", "pacman", &["-Q"]),
        PackageSource::command("rpm", "(?i)^fedora", "rpm", &["-qa"]),
        PackageSource::command("apk", "(?i)^alpine", "apk", &["info"]),
        PackageSource::command("equery", "(?i)^gentoo", "equery", &["list"]),
        PackageSource::command("zypper", "(?i)^opensuse", "zypper", &["se", "-i"]),
        PackageSource::directory("kiss", "(?i)^kiss", &["/var/db/kiss/installed/*/"]),
        PackageSource::directory("cpt-list", "(?i)^cpt-list", &["/var/db/cpt/installed/*/"]),
        PackageSource::directory(
            "homebrew",
            "(?i)^homebrew",
            &["/usr/local/Cellar/*/", "/usr/local/Caskroom/*/"],
        ),
        PackageSource::directory("portage", "(?i)^portage", &["/var/db/pkg/*/*/"]),
        PackageSource::directory("pkgtool", "(?i)^pkgtool", &["/var/log/packages/*"]),
        PackageSource::directory("eopkg", "(?i)^eopkg", &["/var/lib/eopkg/package/*"]),
    ];

    definitions
        .into_iter()
        .filter_map(|def| match def {
            Ok(source) => Some(source),
            Err(e) => {
                warn!("Dropping package source: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources_all_compile() {
        assert_eq!(default_sources().len(), 13);
    }

    #[test]
    fn test_os_pattern_is_case_insensitive_prefix() {
        let sources = default_sources();
        let arch: Vec<_> = sources.iter().filter(|s| s.matches_os("Arch Linux")).collect();
        assert_eq!(arch.len(), 1);
        assert_eq!(arch[0].id(), "pacman");

        // Anchored at the start: "Manjaro Arch" is not an Arch identifier
        assert!(!sources.iter().any(|s| s.id() == "pacman" && s.matches_os("Manjaro Arch")));
    }

    #[test]
    fn test_debian_and_ubuntu_share_identifier() {
        let sources = default_sources();
        for os in ["Debian GNU/Linux 12", "Ubuntu 24.04 LTS"] {
            let ids: Vec<_> = sources
                .iter()
                .filter(|s| s.matches_os(os))
                .map(|s| s.id())
                .collect();
            assert_eq!(ids, vec!["dpkg-query"], "for {}", os);
        }
    }

    #[test]
    fn test_exclusion_uses_identifier() {
        let source = PackageSource::directory("portage", "(?i)^portage", &["/nonexistent/*/"])
            .unwrap();
        let excluded: HashSet<String> = ["portage".to_string()].into_iter().collect();
        assert!(source.is_excluded(&excluded));
        assert!(!source.is_excluded(&HashSet::new()));
    }

    #[test]
    fn test_invalid_os_pattern_is_rejected() {
        let result = PackageSource::command("broken", "(unclosed", "true", &[]);
        assert!(matches!(result, Err(FetchError::InvalidPattern { .. })));
    }

    #[test]
    fn test_search_path_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let search = SearchPath::from_dirs([dir.path()]);
        assert!(search.resolve("efetch-no-such-binary").is_none());
    }
}
