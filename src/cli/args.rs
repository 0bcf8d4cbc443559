//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode};
use crate::consts::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::core::ChildOrder;

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "pxstats")]
#[command(about = "Interaction and video-watch analytics for the admin back-office", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Filter from date (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long, global = true)]
    pub(crate) since: Option<String>,

    /// Filter until date (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long, global = true)]
    pub(crate) until: Option<String>,

    /// Read a saved JSON export instead of calling the API ("-" for stdin)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub(crate) input: Option<PathBuf>,

    /// API root URL
    #[arg(long, global = true, value_name = "URL")]
    pub(crate) api_url: Option<String>,

    /// API token sent as "Authorization: Token <TOKEN>"
    #[arg(long, global = true, env = "PXSTATS_TOKEN", hide_env_values = true)]
    pub(crate) token: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub(crate) timeout: Option<u64>,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Output as CSV
    #[arg(long, global = true, conflicts_with = "json")]
    pub(crate) csv: bool,

    /// Expand a node: team=<name>, user=<id>, category=<user>/<category>, video=<title>
    #[arg(short, long, global = true, value_name = "KEY")]
    pub(crate) expand: Vec<String>,

    /// Expand every node
    #[arg(short = 'a', long, global = true)]
    pub(crate) expand_all: bool,

    /// Sort users, categories and items by total instead of first appearance
    #[arg(long, global = true)]
    pub(crate) sort_children: bool,

    /// Timezone for dates and times (e.g., "Asia/Tokyo", "UTC")
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // For boolean flags, config only applies if CLI is false (default)
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.sort_children && config.sort_children {
            self.sort_children = true;
        }
        if !self.expand_all && config.expand_all {
            self.expand_all = true;
        }

        if let Some(color) = config.color
            && self.color == ColorMode::Auto
        {
            self.color = match color {
                ConfigColorMode::Auto => ColorMode::Auto,
                ConfigColorMode::Always => ColorMode::Always,
                ConfigColorMode::Never => ColorMode::Never,
            };
        }

        if self.api_url.is_none() {
            self.api_url = config.api_url.clone();
        }
        if self.token.is_none() {
            self.token = config.token.clone();
        }
        if self.timeout.is_none() {
            self.timeout = config.timeout_secs;
        }
        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    pub(crate) fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.csv {
            OutputFormat::Csv
        } else {
            OutputFormat::Table
        }
    }

    pub(crate) fn child_order(&self) -> ChildOrder {
        if self.sort_children {
            ChildOrder::ByTotal
        } else {
            ChildOrder::Insertion
        }
    }

    pub(crate) fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["pxstats"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        assert_eq!(cli.output_format(), OutputFormat::Table);
        assert_eq!(cli.child_order(), ChildOrder::Insertion);
        assert_eq!(cli.api_url(), DEFAULT_API_URL);
        assert_eq!(cli.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["watch", "--video-title", "intro", "-j", "-e", "video=Intro"]);
        assert!(matches!(cli.command, Some(Commands::Watch(_))));
        assert_eq!(cli.output_format(), OutputFormat::Json);
        assert_eq!(cli.expand, vec!["video=Intro".to_string()]);
    }

    #[test]
    fn repeated_expand_keys() {
        let cli = parse(&["-e", "team=shop", "--expand", "user=u1"]);
        assert_eq!(cli.expand.len(), 2);
    }

    #[test]
    fn json_and_csv_conflict() {
        assert!(Cli::try_parse_from(["pxstats", "--json", "--csv"]).is_err());
    }

    #[test]
    fn config_fills_unset_values_only() {
        let config = Config {
            api_url: Some("https://admin.example.com/api/".into()),
            timeout_secs: Some(30),
            timezone: Some("Asia/Tokyo".into()),
            sort_children: true,
            color: Some(ConfigColorMode::Never),
            ..Config::default()
        };
        let cli = parse(&["--timezone", "UTC"]).with_config(&config);
        assert_eq!(cli.api_url(), "https://admin.example.com/api/");
        assert_eq!(cli.timeout(), Duration::from_secs(30));
        assert_eq!(cli.timezone.as_deref(), Some("UTC"));
        assert_eq!(cli.child_order(), ChildOrder::ByTotal);
        assert!(!cli.use_color());
    }

    #[test]
    fn explicit_color_beats_config() {
        let config = Config {
            color: Some(ConfigColorMode::Never),
            ..Config::default()
        };
        let cli = parse(&["--color", "always"]).with_config(&config);
        assert!(cli.use_color());
    }

    #[test]
    fn no_color_wins() {
        let cli = parse(&["--color", "always", "--no-color"]);
        assert!(!cli.use_color());
    }
}
