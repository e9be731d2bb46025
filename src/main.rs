//! efetch - main entry point

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use efetch::cli::Cli;
use efetch::compositor;
use efetch::host::{self, SystemSummary};
use efetch::{ColorPalette, LogoRegistry, PackageAggregator, Settings};

/// Initialize logging to stderr.
///
/// `--verbose` forces debug output; otherwise `RUST_LOG` applies, defaulting
/// to warnings only so the summary stays clean.
fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    logo: &'a str,
    settings: &'a Settings,
    summary: &'a SystemSummary,
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    info!("efetch starting up");

    let registry = LogoRegistry::builtin();
    let mut stdout = io::stdout().lock();

    if cli.list_logos {
        for entry in registry.entries() {
            writeln!(stdout, "{}", entry.pattern()).context("Failed to write logo list")?;
        }
        return Ok(());
    }

    let settings = Settings::from_env().with_cli(&cli);
    debug!("Settings: {:?}", settings);

    let os = host::resolve_os_identifier(settings.os_name.as_deref());
    let packages = PackageAggregator::default().count(&os, &settings.excluded);
    let summary = SystemSummary::collect(os, packages);
    let logo = registry.select(&summary.os);

    if cli.json {
        let output = JsonOutput {
            logo: logo.pattern(),
            settings: &settings,
            summary: &summary,
        };
        serde_json::to_writer_pretty(&mut stdout, &output).context("Failed to write JSON")?;
        writeln!(stdout).context("Failed to write JSON")?;
        return Ok(());
    }

    let palette = if settings.color {
        ColorPalette::standard()
    } else {
        ColorPalette::plain()
    };
    let art = logo.render(&palette);
    let info_lines = compositor::info_lines(&summary, settings.color);
    compositor::print(&mut stdout, &art, &info_lines).context("Failed to write summary")?;

    Ok(())
}
