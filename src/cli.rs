use clap::Parser;

/// efetch - system summary beside your distribution's logo
#[derive(Parser, Debug, Default)]
#[command(name = "efetch")]
#[command(about = "Print a system summary beside your distribution's logo")]
#[command(version)]
pub struct Cli {
    /// OS identifier to use instead of detecting it.
    ///
    /// Takes precedence over EF_OSNAME. Drives both logo selection and which
    /// package sources are queried.
    #[arg(long, value_name = "NAME")]
    pub os_name: Option<String>,

    /// Comma-separated package source identifiers to skip (e.g. "pacman,rpm").
    ///
    /// Takes precedence over EF_EXCLUDE_PKGM.
    #[arg(long, value_name = "IDS")]
    pub exclude: Option<String>,

    /// Disable colors (also enabled by a non-empty NO_COLOR)
    #[arg(long)]
    pub no_color: bool,

    /// Print the summary as JSON instead of the logo view
    #[arg(long)]
    pub json: bool,

    /// List the logo patterns in the built-in catalog and exit
    #[arg(long)]
    pub list_logos: bool,

    /// Log debug information, including each package source's outcome
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
