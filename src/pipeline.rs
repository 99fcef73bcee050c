// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate the collect and aggregate stages from an EffectiveConfig and report output locations
// role: processing/orchestrator
// inputs: EffectiveConfig (collect | aggregate | run)
// outputs: Snapshot and summary CSV files; stdout pointer (path, or {snapshot, summary} JSON for run)
// side_effects: Network calls (collect); creates directories; writes CSV files; prints to stdout
// invariants:
// - run aggregates the snapshot file it just wrote, not the in-memory records
// - stdout carries only the pointer; logs go to stderr
// errors: Subject list IO, snapshot parsing and file writes propagate with path context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::aggregate::aggregate;
use crate::cli::{default_summary_path, AggregateConfig, CollectConfig, EffectiveConfig, RunConfig};
use crate::collect::{collect, write_snapshot};
use crate::csvio::{read_snapshot_file, render_summary, write_text};
use crate::github::api::build_api;
use crate::util;

pub fn run_collect(cfg: &CollectConfig) -> Result<PathBuf> {
  let subjects = util::read_subjects(&cfg.usernames)?;

  if subjects.is_empty() {
    warn!(path = %cfg.usernames.display(), "no usernames found; snapshot will be empty");
  }

  let api = build_api(&cfg.api);
  let records = collect(api.as_ref(), &subjects, &cfg.since);
  let completed_at = util::effective_now(cfg.now_override);

  write_snapshot(&records, &cfg.out_dir, completed_at)
}

pub fn run_aggregate(cfg: &AggregateConfig) -> Result<PathBuf> {
  let rows = read_snapshot_file(&cfg.input)?;
  let summary = aggregate(&rows);

  if summary.is_empty() {
    warn!(path = %cfg.input.display(), "snapshot has no pull requests; summary will be header-only");
  }

  write_text(&cfg.out, &render_summary(summary.groups(), cfg.legacy_header))?;
  info!(groups = summary.groups().len(), path = %cfg.out.display(), "summary written");

  Ok(cfg.out.clone())
}

pub fn run_all(cfg: &RunConfig) -> Result<(PathBuf, PathBuf)> {
  let snapshot = run_collect(&cfg.collect)?;
  let summary = run_aggregate(&AggregateConfig {
    out: default_summary_path(&snapshot),
    input: snapshot.clone(),
    legacy_header: cfg.legacy_header,
  })?;

  Ok((snapshot, summary))
}

pub fn process(cfg: &EffectiveConfig) -> Result<()> {
  match cfg {
    EffectiveConfig::Collect(c) => {
      let path = run_collect(c)?;
      println!("{}", path.display());
    }
    EffectiveConfig::Aggregate(a) => {
      let path = run_aggregate(a)?;
      println!("{}", path.display());
    }
    EffectiveConfig::Run(r) => {
      let (snapshot, summary) = run_all(r)?;
      println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
          "snapshot": snapshot.display().to_string(),
          "summary": summary.display().to_string(),
        }))?
      );
    }
  }

  Ok(())
}
