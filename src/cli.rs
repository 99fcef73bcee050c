use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use crate::github::api::{get_github_token, ApiConfig, DEFAULT_API_BASE};
use crate::util::{self, DEFAULT_SINCE};

#[derive(Parser, Debug)]
#[command(
    name = "pr-activity-report",
    version,
    about = "Collect authored GitHub pull requests per user and summarize them per organization",
    long_about = None
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Option<Command>,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Fetch pull requests for every username and write a dated snapshot CSV
  Collect(CollectArgs),
  /// Summarize a snapshot CSV into per-user, per-org counts
  Aggregate(AggregateArgs),
  /// Collect, then aggregate the fresh snapshot
  Run(RunArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CollectArgs {
  /// Newline-delimited file of GitHub usernames
  #[arg(long, default_value = "data/usernames.txt")]
  pub usernames: PathBuf,

  /// Only pull requests created on or after this date (YYYY-MM-DD or RFC 3339)
  #[arg(long, default_value = DEFAULT_SINCE)]
  pub since: String,

  /// Directory for the prs-<timestamp>.csv snapshot
  #[arg(long, default_value = "data")]
  pub out_dir: PathBuf,

  /// GitHub REST API base URL
  #[arg(long, default_value = DEFAULT_API_BASE)]
  pub api_base: String,

  /// Per-request timeout in seconds
  #[arg(long, default_value_t = 30)]
  pub timeout_secs: u64,

  /// Retries per request on transport errors, 429 and 5xx (0 = none)
  #[arg(long, default_value_t = 0)]
  pub retries: u32,

  /// Override the completion timestamp used in file names (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
  /// Keep the trailing comma in the summary header (`...,total,`)
  #[arg(long)]
  pub legacy_header: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AggregateArgs {
  /// Snapshot CSV to summarize
  #[arg(long)]
  pub input: PathBuf,

  /// Summary CSV path (default: <input stem>-summary.csv beside the input)
  #[arg(long)]
  pub out: Option<PathBuf>,

  #[command(flatten)]
  pub summary: SummaryArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
  #[command(flatten)]
  pub collect: CollectArgs,

  #[command(flatten)]
  pub summary: SummaryArgs,
}

#[derive(Debug, Clone)]
pub struct CollectConfig {
  pub usernames: PathBuf,
  pub since: String,
  pub out_dir: PathBuf,
  pub api: ApiConfig,
  pub now_override: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct AggregateConfig {
  pub input: PathBuf,
  pub out: PathBuf,
  pub legacy_header: bool,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
  pub collect: CollectConfig,
  pub legacy_header: bool,
}

#[derive(Debug, Clone)]
pub enum EffectiveConfig {
  Collect(CollectConfig),
  Aggregate(AggregateConfig),
  Run(RunConfig),
}

/// Default summary path: `<dir>/<stem>-summary.csv`.
pub fn default_summary_path(input: &Path) -> PathBuf {
  let stem = input
    .file_stem()
    .map(|s| s.to_string_lossy().to_string())
    .unwrap_or_else(|| "snapshot".to_string());
  input.with_file_name(format!("{}-summary.csv", stem))
}

fn normalize_collect(args: CollectArgs, token: Option<String>) -> Result<CollectConfig> {
  let since = util::validate_since(&args.since)?;
  let now_override = util::parse_now(args.now_override.as_deref())?;

  if args.timeout_secs == 0 {
    bail!("--timeout-secs must be at least 1");
  }

  if token.is_none() {
    warn!("no GitHub token found (GITHUB_TOKEN, GH_TOKEN or `gh auth token`); using unauthenticated rate limits");
  }

  Ok(CollectConfig {
    usernames: args.usernames,
    since,
    out_dir: args.out_dir,
    api: ApiConfig {
      base: args.api_base,
      token,
      timeout: Duration::from_secs(args.timeout_secs),
      retries: args.retries,
    },
    now_override,
  })
}

/// Turn parsed arguments into a validated config. `token` comes from token discovery.
pub fn normalize_with_token(command: Command, token: impl FnOnce() -> Option<String>) -> Result<EffectiveConfig> {
  let cfg = match command {
    Command::Collect(args) => EffectiveConfig::Collect(normalize_collect(args, token())?),
    Command::Aggregate(args) => {
      let out = args.out.unwrap_or_else(|| default_summary_path(&args.input));
      EffectiveConfig::Aggregate(AggregateConfig {
        input: args.input,
        out,
        legacy_header: args.summary.legacy_header,
      })
    }
    Command::Run(args) => EffectiveConfig::Run(RunConfig {
      collect: normalize_collect(args.collect, token())?,
      legacy_header: args.summary.legacy_header,
    }),
  };

  Ok(cfg)
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let Some(command) = cli.command else {
    bail!("Provide a subcommand: collect, aggregate or run (see --help)")
  };
  normalize_with_token(command, get_github_token)
}
