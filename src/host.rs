//! Host detection
//!
//! Simple single-purpose reads for the info column: OS name, kernel, uptime,
//! memory, CPU, machine model, terminal, window manager and `user@host`.
//!
//! # Design
//!
//! - **Never fails**: every collector falls back to a placeholder or an empty
//!   string, and empty values are dropped from the output.
//! - **No shelling out**: everything comes from files, the environment or
//!   `sysinfo`. Package managers are the only external commands efetch runs.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::Path;
use sysinfo::System;
use tracing::{debug, warn};

const OS_RELEASE_FILES: &[&str] = &["/etc/os-release", "/usr/lib/os-release"];
const PRODUCT_NAME_FILE: &str = "/sys/devices/virtual/dmi/id/product_name";
const WM_PROCESS_PATTERN: &str = r"(awesome|xmonad.*|qtile|sway|i3|[bfo]*box|.*wm)";

/// Everything shown in the info column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemSummary {
    pub user: String,
    pub hostname: String,
    pub os: String,
    pub kernel: String,
    pub uptime: String,
    pub wm: String,
    pub terminal: String,
    pub cpu: String,
    pub memory: String,
    pub model: String,
    pub packages: usize,
}

impl SystemSummary {
    /// Gather host facts around an already-resolved OS name and package count.
    pub fn collect(os: String, packages: usize) -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();

        let summary = Self {
            user: current_user(),
            hostname: System::host_name().unwrap_or_else(|| "unknown".to_string()),
            os,
            kernel: System::kernel_version().unwrap_or_default(),
            uptime: format_uptime(System::uptime()),
            wm: window_manager(),
            terminal: terminal(),
            cpu: cpu_model(&sys),
            memory: format_memory(sys.used_memory(), sys.total_memory()),
            model: machine_model(),
            packages,
        };
        debug!("Collected host summary: {:?}", summary);
        summary
    }
}

// ============================================================================
// OS Identifier
// ============================================================================

/// Resolve the OS identifier: a non-empty override wins, otherwise the
/// release files are read.
pub fn resolve_os_identifier(override_name: Option<&str>) -> String {
    match override_name {
        Some(name) if !name.is_empty() => {
            debug!("OS identifier overridden: {:?}", name);
            name.to_string()
        }
        _ => detect_os_name(),
    }
}

/// `PRETTY_NAME` from the first readable os-release file, or `"Unknown OS"`.
pub fn detect_os_name() -> String {
    for file in OS_RELEASE_FILES {
        match fs::read_to_string(file) {
            Ok(content) => {
                if let Some(name) = parse_pretty_name(&content) {
                    return name;
                }
            }
            Err(e) => debug!("Cannot read {}: {}", file, e),
        }
    }
    "Unknown OS".to_string()
}

/// Extract `PRETTY_NAME` from os-release content, unquoting it.
pub fn parse_pretty_name(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("PRETTY_NAME="))
        .map(|value| value.trim_matches('"').to_string())
}

// ============================================================================
// Collectors
// ============================================================================

/// Uptime as `Nd HH:MM`.
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    format!("{}d {:02}:{:02}", days, hours, minutes)
}

/// Memory as `used / total MiB`; empty when the total is unknown.
pub fn format_memory(used_bytes: u64, total_bytes: u64) -> String {
    if total_bytes == 0 {
        return String::new();
    }
    format!("{} / {} MiB", used_bytes / 1_048_576, total_bytes / 1_048_576)
}

fn cpu_model(sys: &System) -> String {
    sys.cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .filter(|brand| !brand.is_empty())
        .unwrap_or_else(|| "Unknown CPU".to_string())
}

fn machine_model() -> String {
    read_first_line(Path::new(PRODUCT_NAME_FILE)).unwrap_or_else(|e| {
        debug!("No machine model: {:#}", e);
        "Unknown Model".to_string()
    })
}

fn read_first_line(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    content
        .lines()
        .next()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .with_context(|| format!("{} is empty", path.display()))
}

fn terminal() -> String {
    std::env::var("TERM").unwrap_or_default()
}

fn current_user() -> String {
    match nix::unistd::User::from_uid(nix::unistd::getuid()) {
        Ok(Some(user)) => user.name,
        Ok(None) => std::env::var("USER").unwrap_or_else(|_| "unknown".to_string()),
        Err(e) => {
            warn!("User lookup failed: {}", e);
            "unknown".to_string()
        }
    }
}

/// Desktop from the session environment, else the first running process
/// that looks like a window manager.
fn window_manager() -> String {
    for var in ["XDG_CURRENT_DESKTOP", "DESKTOP_SESSION"] {
        if let Ok(value) = std::env::var(var) {
            if !value.is_empty() {
                return value;
            }
        }
    }

    let mut sys = System::new();
    sys.refresh_processes(sysinfo::ProcessesToUpdate::All, true);
    let mut processes: Vec<_> = sys.processes().iter().collect();
    processes.sort_by_key(|(pid, _)| **pid);

    let names: Vec<String> = processes
        .into_iter()
        .map(|(_, process)| process.name().to_string_lossy().into_owned())
        .collect();
    match_window_manager(names.iter().map(String::as_str)).unwrap_or_default()
}

/// First process name that looks like a window manager.
pub fn match_window_manager<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let pattern = match Regex::new(WM_PROCESS_PATTERN) {
        Ok(pattern) => pattern,
        Err(e) => {
            warn!("Window manager pattern rejected: {}", e);
            return None;
        }
    };
    names
        .into_iter()
        .find(|name| pattern.is_match(name))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pretty_name() {
        let content = "NAME=\"Arch Linux\"\nPRETTY_NAME=\"Arch Linux\"\nID=arch\n";
        assert_eq!(parse_pretty_name(content).as_deref(), Some("Arch Linux"));
    }

    #[test]
    fn test_parse_pretty_name_unquoted() {
        assert_eq!(
            parse_pretty_name("PRETTY_NAME=Gentoo\n").as_deref(),
            Some("Gentoo")
        );
    }

    #[test]
    fn test_parse_pretty_name_missing() {
        assert!(parse_pretty_name("NAME=Void\nID=void\n").is_none());
    }

    #[test]
    fn test_resolve_os_identifier_override() {
        assert_eq!(resolve_os_identifier(Some("KISS")), "KISS");
    }

    #[test]
    fn test_resolve_os_identifier_empty_override_detects() {
        // Falls through to detection, which always yields something
        assert!(!resolve_os_identifier(Some("")).is_empty());
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0), "0d 00:00");
        assert_eq!(format_uptime(3_661), "0d 01:01");
        assert_eq!(format_uptime(2 * 86_400 + 23 * 3_600 + 59 * 60 + 59), "2d 23:59");
    }

    #[test]
    fn test_format_memory() {
        assert_eq!(format_memory(512 * 1_048_576, 2048 * 1_048_576), "512 / 2048 MiB");
        assert_eq!(format_memory(0, 0), "");
    }

    #[test]
    fn test_match_window_manager() {
        let names = ["systemd", "bash", "bspwm", "sway"];
        assert_eq!(match_window_manager(names).as_deref(), Some("bspwm"));
        assert_eq!(match_window_manager(["openbox"]).as_deref(), Some("openbox"));
        assert!(match_window_manager(["systemd", "sshd"]).is_none());
    }

    #[test]
    fn test_collect_keeps_inputs() {
        let summary = SystemSummary::collect("Test OS".to_string(), 42);
        assert_eq!(summary.os, "Test OS");
        assert_eq!(summary.packages, 42);
        assert!(!summary.uptime.is_empty());
    }
}
