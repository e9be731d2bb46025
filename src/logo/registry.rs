//! Logo catalog parsing and selection
//!
//! The catalog is a shell `case` statement: blocks are separated by `;;`,
//! each block opens with a `(pattern*)` declaration followed by the art
//! lines, all of which contain at least one `${cN}` color token.
//!
//! ```text
//! ([Aa]lpine*)
//!     read_ascii 4 <<-'EOF'
//! 		${c4}   /\ /\
//! 		  /${c7}/ ${c4}\  \
//! 	EOF
//! ;;
//! ```
//!
//! Selection searches every pattern against the OS identifier and keeps the
//! longest pattern text among those that match. Pattern length stands in for
//! specificity: `([Aa]rco*)` beats a shorter, more generic entry.

use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::palette::ColorPalette;
use crate::error::FetchError;

const BLOCK_SEPARATOR: &str = ";;";
const DECLARATION_MARKER: char = '(';
const COLOR_MARKER: &str = "${c";

const DEFAULT_ART: &[&str] = &[
    "  ${c4}     ___     ",
    "  ${c4}    (${c7}.. ${c4}|",
    "  ${c4}    (${c5}<> ${c4}|",
    "  ${c4}   / ${c7}__  ${c4}\\",
    "  ${c4}  ( ${c7}/  \\ ${c4}/|",
    "  ${c5} _${c4}/\\ ${c7}__)${c4}/${c5}_${c4})",
    "  ${c5} \\/${c4}-____${c5}\\/",
];

/// One pattern and the art it selects
#[derive(Debug, Clone)]
pub struct LogoEntry {
    pattern: String,
    regex: Option<Regex>,
    lines: Vec<String>,
}

impl LogoEntry {
    /// Compile `pattern` and pair it with `lines`.
    pub fn new(pattern: impl Into<String>, lines: Vec<String>) -> Result<Self, FetchError> {
        let pattern = pattern.into();
        let regex = Regex::new(&pattern).map_err(|e| FetchError::invalid_pattern(&pattern, e))?;
        Ok(Self {
            pattern,
            regex: Some(regex),
            lines,
        })
    }

    fn fallback() -> Self {
        Self {
            pattern: String::new(),
            regex: None,
            lines: DEFAULT_ART.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Pattern text as written in the catalog. Empty for the default logo.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Unrendered art lines, tokens intact.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns true if the pattern occurs anywhere in `os_identifier`.
    pub fn matches(&self, os_identifier: &str) -> bool {
        self.regex
            .as_ref()
            .is_some_and(|regex| regex.is_match(os_identifier))
    }

    /// Substitute palette tokens and append the alignment line.
    ///
    /// The final `"\r"` line carries no art; it keeps the info column aligned
    /// when the logo is shorter than the info block.
    pub fn render(&self, palette: &ColorPalette) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| palette.apply(line))
            .chain(std::iter::once("\r".to_string()))
            .collect()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Immutable index of catalog entries, in first-registration order
#[derive(Debug, Clone)]
pub struct LogoRegistry {
    entries: Vec<LogoEntry>,
    default: LogoEntry,
}

impl LogoRegistry {
    /// Parse a catalog.
    ///
    /// Entries whose pattern fails to compile are dropped with a warning.
    /// A later block with the same pattern replaces the earlier art but keeps
    /// its position. Blocks without a declaration line are ignored.
    pub fn build(catalog: &str) -> Self {
        let mut entries: Vec<LogoEntry> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for block in catalog.split(BLOCK_SEPARATOR) {
            let Some((pattern, lines)) = parse_block(block) else {
                continue;
            };

            let entry = match LogoEntry::new(pattern, lines) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping logo: {}", e);
                    continue;
                }
            };

            match positions.get(entry.pattern()) {
                Some(&index) => {
                    debug!("Logo pattern {:?} redefined", entry.pattern());
                    entries[index] = entry;
                }
                None => {
                    positions.insert(entry.pattern().to_string(), entries.len());
                    entries.push(entry);
                }
            }
        }

        debug!("Logo registry built with {} entries", entries.len());
        Self {
            entries,
            default: LogoEntry::fallback(),
        }
    }

    /// Registry over the catalog compiled into the binary.
    pub fn builtin() -> Self {
        Self::build(super::CATALOG)
    }

    pub fn entries(&self) -> &[LogoEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The logo used when nothing matches.
    pub fn default_entry(&self) -> &LogoEntry {
        &self.default
    }

    /// Best entry for `os_identifier`.
    ///
    /// The matching entry with the longest pattern text wins; on equal
    /// lengths the earlier-registered entry is kept.
    pub fn select(&self, os_identifier: &str) -> &LogoEntry {
        let mut best: Option<&LogoEntry> = None;
        for entry in self.entries.iter().filter(|e| e.matches(os_identifier)) {
            if best.is_none_or(|b| entry.pattern.len() > b.pattern.len()) {
                best = Some(entry);
            }
        }

        match best {
            Some(entry) => {
                debug!("Logo {:?} selected for {:?}", entry.pattern, os_identifier);
                entry
            }
            None => {
                debug!("No logo matches {:?}, using default", os_identifier);
                &self.default
            }
        }
    }

    /// Select and render in one step.
    pub fn render_for(&self, os_identifier: &str, palette: &ColorPalette) -> Vec<String> {
        self.select(os_identifier).render(palette)
    }
}

/// Split one catalog block into its pattern and art lines.
fn parse_block(block: &str) -> Option<(String, Vec<String>)> {
    let mut lines = block.lines();
    let declaration = lines
        .by_ref()
        .map(str::trim)
        .find(|line| line.starts_with(DECLARATION_MARKER))?;

    let pattern = declaration.strip_suffix('*').unwrap_or(declaration);
    let pattern = pattern.strip_prefix('[').unwrap_or(pattern);

    let art = lines
        .filter(|line| line.contains(COLOR_MARKER))
        .map(|line| line.trim_start_matches(' ').replace('\t', ""))
        .collect();

    Some((pattern.to_string(), art))
}
