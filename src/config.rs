//! Runtime settings
//!
//! efetch is configured through the environment; command-line flags override
//! the matching variables.
//!
//! | Variable          | Flag          | Meaning                               |
//! |-------------------|---------------|---------------------------------------|
//! | `EF_OSNAME`       | `--os-name`   | OS identifier override (if non-empty) |
//! | `EF_EXCLUDE_PKGM` | `--exclude`   | Comma-separated sources to skip       |
//! | `NO_COLOR`        | `--no-color`  | Disable colors (if non-empty)         |

use serde::Serialize;
use std::collections::BTreeSet;
use std::collections::HashSet;

use crate::cli::Cli;
use crate::packages::parse_exclusions;

pub const OS_NAME_VAR: &str = "EF_OSNAME";
pub const EXCLUDE_VAR: &str = "EF_EXCLUDE_PKGM";
pub const NO_COLOR_VAR: &str = "NO_COLOR";

/// Resolved configuration for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Non-empty OS identifier override
    pub os_name: Option<String>,
    /// Package source identifiers to skip
    #[serde(serialize_with = "sorted")]
    pub excluded: HashSet<String>,
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            os_name: None,
            excluded: HashSet::new(),
            color: true,
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            os_name: lookup(OS_NAME_VAR).filter(|name| !name.is_empty()),
            // An unset variable excludes nothing; a set-but-empty one parses
            // to a single empty identifier
            excluded: lookup(EXCLUDE_VAR)
                .map(|raw| parse_exclusions(&raw))
                .unwrap_or_default(),
            color: lookup(NO_COLOR_VAR).is_none_or(|value| value.is_empty()),
        }
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(name) = cli.os_name.as_ref().filter(|name| !name.is_empty()) {
            self.os_name = Some(name.clone());
        }
        if let Some(raw) = &cli.exclude {
            self.excluded = parse_exclusions(raw);
        }
        if cli.no_color {
            self.color = false;
        }
        self
    }
}

fn sorted<S: serde::Serializer>(set: &HashSet<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(set.iter().collect::<BTreeSet<_>>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(lookup(&[]));
        assert_eq!(settings, Settings::default());
        assert!(settings.color);
    }

    #[test]
    fn test_os_name_override() {
        let settings = Settings::from_lookup(lookup(&[(OS_NAME_VAR, "Alpine")]));
        assert_eq!(settings.os_name.as_deref(), Some("Alpine"));
    }

    #[test]
    fn test_empty_os_name_is_ignored() {
        let settings = Settings::from_lookup(lookup(&[(OS_NAME_VAR, "")]));
        assert!(settings.os_name.is_none());
    }

    #[test]
    fn test_exclusions_from_env() {
        let settings = Settings::from_lookup(lookup(&[(EXCLUDE_VAR, "dpkg-query,portage")]));
        assert_eq!(settings.excluded.len(), 2);
        assert!(settings.excluded.contains("dpkg-query"));
    }

    #[test]
    fn test_empty_exclusion_variable() {
        let settings = Settings::from_lookup(lookup(&[(EXCLUDE_VAR, "")]));
        assert_eq!(settings.excluded, HashSet::from([String::new()]));
    }

    #[test]
    fn test_no_color() {
        assert!(!Settings::from_lookup(lookup(&[(NO_COLOR_VAR, "1")])).color);
        assert!(Settings::from_lookup(lookup(&[(NO_COLOR_VAR, "")])).color);
    }

    #[test]
    fn test_cli_overrides_env() {
        let env = Settings::from_lookup(lookup(&[(OS_NAME_VAR, "Alpine"), (EXCLUDE_VAR, "apk")]));
        let cli = Cli {
            os_name: Some("Void".to_string()),
            exclude: Some("rpm".to_string()),
            no_color: true,
            ..Cli::default()
        };
        let settings = env.with_cli(&cli);
        assert_eq!(settings.os_name.as_deref(), Some("Void"));
        assert_eq!(settings.excluded, HashSet::from(["rpm".to_string()]));
        assert!(!settings.color);
    }

    #[test]
    fn test_cli_without_flags_keeps_env() {
        let env = Settings::from_lookup(lookup(&[(OS_NAME_VAR, "Alpine")]));
        let settings = env.clone().with_cli(&Cli::default());
        assert_eq!(settings, env);
    }

    #[test]
    fn test_serialize_sorts_exclusions() {
        let settings = Settings::from_lookup(lookup(&[(EXCLUDE_VAR, "rpm,apk")]));
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains(r#""excluded":["apk","rpm"]"#), "{}", json);
    }
}
