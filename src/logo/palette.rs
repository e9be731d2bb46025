//! Color palette for logo art
//!
//! Art lines carry placeholder tokens (`${c0}` .. `${c7}`) that are swapped
//! for terminal escape sequences when a logo is rendered. Substitution is a
//! plain literal scan; no regex is involved.

/// Ordered (token, replacement) pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPalette {
    pairs: Vec<(String, String)>,
}

const TOKENS: [&str; 8] = [
    "${c0}", "${c1}", "${c2}", "${c3}", "${c4}", "${c5}", "${c6}", "${c7}",
];

impl Default for ColorPalette {
    fn default() -> Self {
        Self::standard()
    }
}

impl ColorPalette {
    /// Build a palette from explicit pairs. Earlier pairs win ties.
    pub fn new<T, R>(pairs: impl IntoIterator<Item = (T, R)>) -> Self
    where
        T: Into<String>,
        R: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(token, replacement)| (token.into(), replacement.into()))
                .filter(|(token, _)| !token.is_empty())
                .collect(),
        }
    }

    /// `${c0}` is a muted grey, `${c1}`..`${c7}` are the bold ANSI colors
    /// red through white. Every replacement resets attributes first.
    pub fn standard() -> Self {
        let grey = ("${c0}", "\x1b[0m\x1b[38;5;248m".to_string());
        let bold = TOKENS[1..]
            .iter()
            .enumerate()
            .map(|(i, token)| (*token, format!("\x1b[0m\x1b[3{};1m", i + 1)));
        Self::new(std::iter::once(grey).chain(bold))
    }

    /// Strips every token, for output without colors.
    pub fn plain() -> Self {
        Self::new(TOKENS.iter().map(|token| (*token, "")))
    }

    /// Replace every token occurrence in a single left-to-right pass.
    ///
    /// At each position the longest matching token is used; replaced text is
    /// never rescanned.
    pub fn apply(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut rest = line;

        while !rest.is_empty() {
            match self.longest_match(rest) {
                Some((token, replacement)) => {
                    out.push_str(replacement);
                    rest = &rest[token.len()..];
                }
                None => {
                    // Advance one whole char to stay on a UTF-8 boundary
                    let Some(c) = rest.chars().next() else { break };
                    out.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
        }
        out
    }

    fn longest_match(&self, text: &str) -> Option<(&str, &str)> {
        let mut best: Option<(&str, &str)> = None;
        for (token, replacement) in &self.pairs {
            if text.starts_with(token.as_str()) && best.is_none_or(|(b, _)| token.len() > b.len()) {
                best = Some((token.as_str(), replacement.as_str()));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_palette_replacements() {
        let palette = ColorPalette::standard();
        assert_eq!(palette.apply("${c0}"), "\x1b[0m\x1b[38;5;248m");
        assert_eq!(palette.apply("${c1}"), "\x1b[0m\x1b[31;1m");
        assert_eq!(palette.apply("${c7}"), "\x1b[0m\x1b[37;1m");
    }

    #[test]
    fn test_apply_mixed_line() {
        let palette = ColorPalette::standard();
        assert_eq!(
            palette.apply("  ${c4}/\\ ${c7}x"),
            "  \x1b[0m\x1b[34;1m/\\ \x1b[0m\x1b[37;1mx"
        );
    }

    #[test]
    fn test_plain_strips_tokens() {
        let palette = ColorPalette::plain();
        assert_eq!(palette.apply("${c1}(${c7}.. ${c1}|"), "(.. |");
    }

    #[test]
    fn test_unknown_token_is_left_alone() {
        let palette = ColorPalette::standard();
        assert_eq!(palette.apply("${c9} ${c"), "${c9} ${c");
    }

    #[test]
    fn test_longest_token_wins() {
        let palette = ColorPalette::new([("ab", "1"), ("abc", "2"), ("c", "3")]);
        assert_eq!(palette.apply("abcab"), "21");
        assert_eq!(palette.apply("abxc"), "1x3");
    }

    #[test]
    fn test_replacement_is_not_rescanned() {
        let palette = ColorPalette::new([("a", "b"), ("b", "c")]);
        assert_eq!(palette.apply("ab"), "bc");
    }

    #[test]
    fn test_multibyte_text_is_preserved() {
        let palette = ColorPalette::standard();
        assert_eq!(palette.apply("ñ${c0}é"), "ñ\x1b[0m\x1b[38;5;248mé");
    }
}
