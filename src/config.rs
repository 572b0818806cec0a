use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::constants::{chain, poll};
use crate::theme::Theme;

/// htnx - Hoosat BlockDAG Explorer
///
/// Terminal explorer for the Hoosat REST API: network stats and transaction details.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "htnx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hoosat BlockDAG Explorer", long_about = None)]
pub struct CliArgs {
    /// Transaction id or deep link to open (e.g. htnx://txs/<id>)
    pub route: Option<String>,

    /// REST API base URL
    #[arg(long, env = "HTN_API_URL")]
    pub api_url: Option<String>,

    /// Full network stats refresh interval in milliseconds (1000-600000)
    #[arg(long, env = "STATS_INTERVAL_MS")]
    pub stats_interval_ms: Option<u64>,

    /// Mempool size refresh interval in milliseconds (250-60000)
    #[arg(long, env = "MEMPOOL_INTERVAL_MS")]
    pub mempool_interval_ms: Option<u64>,

    /// HTTP request timeout in milliseconds (1000-60000)
    #[arg(long, env = "HTTP_TIMEOUT_MS")]
    pub http_timeout_ms: Option<u64>,

    /// DAA score of the next scheduled hard fork
    #[arg(long, env = "HARD_FORK_DAA_SCORE")]
    pub hard_fork_daa_score: Option<u64>,

    /// Color theme: hoosat or nord
    #[arg(long, env = "HTNX_THEME", value_parser = clap::value_parser!(Theme))]
    pub theme: Option<Theme>,

    /// Write logs to this file (the TUI owns the terminal)
    #[arg(long, env = "HTNX_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Print a one-shot text report instead of starting the TUI
    #[arg(long)]
    pub print: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub stats_interval_ms: u64,
    pub mempool_interval_ms: u64,
    pub blue_score_interval_ms: u64,
    pub http_timeout_ms: u64,
    pub hard_fork_daa_score: u64,
    pub theme: Theme,
    pub log_file: Option<PathBuf>,
    pub print: bool,
    pub route: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            stats_interval_ms: poll::STATS_INTERVAL_MS,
            mempool_interval_ms: poll::MEMPOOL_INTERVAL_MS,
            blue_score_interval_ms: poll::BLUE_SCORE_INTERVAL_MS,
            http_timeout_ms: 8000,
            hard_fork_daa_score: chain::NEXT_HARD_FORK_DAA_SCORE,
            theme: Theme::default(),
            log_file: None,
            print: false,
            route: None,
        }
    }
}

const DEFAULT_API_URL: &str = "https://api.network.hoosat.fi";

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

/// Load configuration from CLI args and environment variables
/// Priority: CLI args > Environment variables > Defaults
pub fn load() -> Result<Config> {
    from_args(CliArgs::parse())
}

/// Resolve parsed arguments (env already merged by clap) into a validated config
pub fn from_args(args: CliArgs) -> Result<Config> {
    let defaults = Config::default();

    let api_url = args.api_url.unwrap_or(defaults.api_url);
    validate_url(&api_url, "HTN_API_URL")?;

    let stats_interval_ms = validate_in_range(
        args.stats_interval_ms.unwrap_or(defaults.stats_interval_ms),
        1000,
        600_000,
        "STATS_INTERVAL_MS",
    )?;
    let mempool_interval_ms = validate_in_range(
        args.mempool_interval_ms.unwrap_or(defaults.mempool_interval_ms),
        250,
        60_000,
        "MEMPOOL_INTERVAL_MS",
    )?;
    let http_timeout_ms = validate_in_range(
        args.http_timeout_ms.unwrap_or(defaults.http_timeout_ms),
        1000,
        60_000,
        "HTTP_TIMEOUT_MS",
    )?;

    Ok(Config {
        api_url,
        stats_interval_ms,
        mempool_interval_ms,
        blue_score_interval_ms: defaults.blue_score_interval_ms,
        http_timeout_ms,
        hard_fork_daa_score: args.hard_fork_daa_score.unwrap_or(defaults.hard_fork_daa_score),
        theme: args.theme.unwrap_or(defaults.theme),
        log_file: args.log_file,
        print: args.print,
        route: args.route,
    })
}

impl Config {
    /// Log the resolved configuration once the logger is up
    pub fn log_summary(&self) {
        log::info!("[config] API URL: {}", self.api_url);
        log::info!(
            "[config] stats every {}ms, mempool every {}ms, blue score every {}ms",
            self.stats_interval_ms,
            self.mempool_interval_ms,
            self.blue_score_interval_ms
        );
        log::info!("[config] HTTP timeout: {}ms", self.http_timeout_ms);
        log::info!("[config] hard fork DAA score: {}", self.hard_fork_daa_score);
        log::info!("[config] theme: {}", self.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config> {
        let mut argv = vec!["htnx"];
        argv.extend_from_slice(args);
        from_args(CliArgs::try_parse_from(argv)?)
    }

    #[test]
    fn explicit_flags_are_validated() {
        let cfg = parse(&[
            "--api-url",
            "http://localhost:8000/",
            "--stats-interval-ms",
            "5000",
            "--theme",
            "nord",
            "--print",
            "htnx://txs/abc",
        ])
        .unwrap();
        assert_eq!(cfg.api_url, "http://localhost:8000/");
        assert_eq!(cfg.stats_interval_ms, 5000);
        assert_eq!(cfg.theme, Theme::Nord);
        assert!(cfg.print);
        assert_eq!(cfg.route.as_deref(), Some("htnx://txs/abc"));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = parse(&["--mempool-interval-ms", "10", "--api-url", "https://x"]).unwrap_err();
        assert!(err.to_string().contains("MEMPOOL_INTERVAL_MS"));
        assert!(parse(&["--api-url", "ftp://x"]).is_err());
    }

    #[test]
    fn range_helper() {
        assert_eq!(validate_in_range(5, 1, 10, "X").unwrap(), 5);
        assert!(validate_in_range(11, 1, 10, "X").is_err());
    }
}
