// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for the subject list, timestamps, logging setup and man page rendering
// role: utilities/helpers
// inputs: Paths; DateTime; clap CommandFactory; RUST_LOG; .env load result
// outputs: Subject lists, file-name stamps, validated since values, man page text
// side_effects: init_tracing installs the global subscriber (stderr)
// invariants:
// - read_subjects keeps file order and drops blank lines
// - stamp is locale-independent and filesystem-safe
// errors: IO errors carry the path; invalid --since/--now-override values are usage errors
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use clap::CommandFactory;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Default lower bound for the `created:>=` search qualifier.
pub const DEFAULT_SINCE: &str = "2020-10-09T00:00:00Z";

/// Install a stderr `fmt` subscriber honoring `RUST_LOG` (default `info`).
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_ansi(std::io::stderr().is_terminal())
    .with_target(false)
    .try_init();
}

/// Log the outcome of `.env` loading. A missing file is the normal case and stays quiet.
pub fn report_dotenv(result: Result<PathBuf, dotenvy::Error>) {
  match result {
    Ok(path) => debug!(path = %path.display(), "loaded environment file"),
    Err(err) if err.not_found() => {}
    Err(err) => warn!(error = %err, "ignoring unreadable .env file"),
  }
}

/// One subject per non-empty trimmed line.
pub fn parse_subjects(text: &str) -> Vec<String> {
  text
    .lines()
    .map(str::trim)
    .filter(|l| !l.is_empty())
    .map(str::to_string)
    .collect()
}

pub fn read_subjects(path: &Path) -> Result<Vec<String>> {
  let text = std::fs::read_to_string(path).with_context(|| format!("reading usernames from {}", path.display()))?;
  Ok(parse_subjects(&text))
}

/// `YYYYmmdd-HHMMSS`, used in output file names.
pub fn stamp(at: DateTime<Utc>) -> String {
  at.format("%Y%m%d-%H%M%S").to_string()
}

/// Returns the effective "now" given an optional override.
pub fn effective_now(override_now: Option<DateTime<Utc>>) -> DateTime<Utc> {
  override_now.unwrap_or_else(Utc::now)
}

pub fn parse_now(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  let Some(s) = s else { return Ok(None) };
  let dt = DateTime::parse_from_rfc3339(s.trim()).with_context(|| format!("invalid --now-override {:?}", s))?;
  Ok(Some(dt.with_timezone(&Utc)))
}

/// Accept `YYYY-MM-DD` or RFC 3339. Dates pass through; timestamps are rewritten as UTC `Z`.
pub fn validate_since(s: &str) -> Result<String> {
  let s = s.trim();
  if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() {
    return Ok(s.to_string());
  }
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::AutoSi, true));
  }
  bail!("--since must be a YYYY-MM-DD date or an RFC 3339 timestamp, got {:?}", s)
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
