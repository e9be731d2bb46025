//! Side-by-side layout of logo and info lines

use std::io::{self, Write};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::host::SystemSummary;

/// Width of the logo column. Escape sequences count toward it.
pub const LOGO_COLUMN_WIDTH: usize = 15;

const LABEL_COLOR: &str = "\x1b[34m";
const RESET: &str = "\x1b[0m";

/// Labels of the info column, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum InfoLabel {
    Os,
    Kern,
    Up,
    Wm,
    Term,
    Cpu,
    Mem,
    Host,
    Pkgs,
}

impl InfoLabel {
    fn value(self, summary: &SystemSummary) -> String {
        match self {
            Self::Os => summary.os.clone(),
            Self::Kern => summary.kernel.clone(),
            Self::Up => summary.uptime.clone(),
            Self::Wm => summary.wm.clone(),
            Self::Term => summary.terminal.clone(),
            Self::Cpu => summary.cpu.clone(),
            Self::Mem => summary.memory.clone(),
            Self::Host => summary.model.clone(),
            // Omitted entirely when nothing was counted
            Self::Pkgs if summary.packages == 0 => String::new(),
            Self::Pkgs => summary.packages.to_string(),
        }
    }
}

/// Format one `label ~ value` line. Empty values give an empty line.
pub fn format_info(label: InfoLabel, value: &str, color: bool) -> String {
    if value.is_empty() {
        return String::new();
    }
    if color {
        format!("{}{:>6}{} ~ {}", LABEL_COLOR, label.to_string(), RESET, value)
    } else {
        format!("{:>6} ~ {}", label.to_string(), value)
    }
}

/// Build the info column for a summary.
///
/// The first line is `user@host`; `pkgs` is left out when the count is zero.
pub fn info_lines(summary: &SystemSummary, color: bool) -> Vec<String> {
    let user_host = format!("{:>6}@{}", summary.user, summary.hostname);
    let mut lines = vec![if color {
        format!("{}{:>6}{}", LABEL_COLOR, user_host, RESET)
    } else {
        user_host
    }];

    for label in InfoLabel::iter() {
        if label == InfoLabel::Pkgs && summary.packages == 0 {
            continue;
        }
        lines.push(format_info(label, &label.value(summary), color));
    }
    lines
}

/// Pair logo and info lines, padding the shorter side with empty strings.
pub fn compose(logo: &[String], info: &[String]) -> Vec<String> {
    let rows = logo.len().max(info.len());
    (0..rows)
        .map(|i| {
            let art = logo.get(i).map(String::as_str).unwrap_or("");
            let text = info.get(i).map(String::as_str).unwrap_or("");
            format!("{:<width$}\t{}", art, text, width = LOGO_COLUMN_WIDTH)
        })
        .collect()
}

/// Write the composed rows, one per line.
pub fn print(out: &mut impl Write, logo: &[String], info: &[String]) -> io::Result<()> {
    for row in compose(logo, info) {
        writeln!(out, "{}", row)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(packages: usize) -> SystemSummary {
        SystemSummary {
            user: "ada".to_string(),
            hostname: "engine".to_string(),
            os: "Arch Linux".to_string(),
            kernel: "6.9.1-arch1-1".to_string(),
            uptime: "0d 01:05".to_string(),
            wm: String::new(),
            terminal: "xterm-256color".to_string(),
            cpu: "Example CPU".to_string(),
            memory: "512 / 2048 MiB".to_string(),
            model: "Test Box".to_string(),
            packages,
        }
    }

    #[test]
    fn test_label_display() {
        assert_eq!(InfoLabel::Kern.to_string(), "kern");
        assert_eq!(InfoLabel::Pkgs.to_string(), "pkgs");
    }

    #[test]
    fn test_format_info() {
        assert_eq!(format_info(InfoLabel::Os, "Void", false), "    os ~ Void");
        assert_eq!(
            format_info(InfoLabel::Os, "Void", true),
            "\x1b[34m    os\x1b[0m ~ Void"
        );
        assert_eq!(format_info(InfoLabel::Wm, "", true), "");
    }

    #[test]
    fn test_info_lines_without_packages() {
        let lines = info_lines(&summary(0), false);
        assert_eq!(lines[0], "   ada@engine");
        assert_eq!(lines[1], "    os ~ Arch Linux");
        // user@host plus eight labels, pkgs omitted
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[4], "");
        assert!(!lines.iter().any(|l| l.contains("pkgs")));
    }

    #[test]
    fn test_info_lines_with_packages() {
        let lines = info_lines(&summary(812), false);
        assert_eq!(lines.last().map(String::as_str), Some("  pkgs ~ 812"));
    }

    #[test]
    fn test_compose_pads_shorter_side() {
        let logo = vec!["/\\".to_string()];
        let info = vec!["a".to_string(), "b".to_string()];
        let rows = compose(&logo, &info);
        assert_eq!(rows, vec![format!("{:<15}\ta", "/\\"), format!("{:<15}\tb", "")]);

        let rows = compose(&info, &[]);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.ends_with('\t')));
    }

    #[test]
    fn test_print_writes_rows() {
        let mut buf = Vec::new();
        print(&mut buf, &["x".to_string()], &["y".to_string()]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), format!("{:<15}\ty\n", "x"));
    }
}
