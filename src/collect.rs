// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Sequence the page walker and merge lookups across subjects into one record set; persist it as a dated snapshot
// role: collection/orchestrator
// inputs: &dyn GithubApi, ordered subjects, since; snapshot directory and completion time
// outputs: Vec<PrRecord> in subject, page, item order; snapshot file path
// side_effects: Network calls through the API seam; writes prs-<timestamp>.csv
// invariants:
// - Subjects are processed one at a time, in input order
// - Merge lookups happen only for closed items carrying a detail URL
// - A failing subject never stops the next one
// errors: Per-item and per-page failures are logged; only snapshot IO errors propagate
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::csvio::{render_snapshot, write_text};
use crate::github::api::GithubApi;
use crate::github::merge::resolve_merged;
use crate::github::pages::walk;
use crate::model::{PrRecord, PrStatus};
use crate::normalize::normalize;
use crate::util::stamp;

fn collect_subject(api: &dyn GithubApi, subject: &str, since: &str, out: &mut Vec<PrRecord>) {
  let before = out.len();
  let mut pages = walk(api, subject, since);

  for raw in pages.by_ref() {
    let merged = match (raw.status(), raw.detail_url()) {
      (PrStatus::Closed, Some(url)) => resolve_merged(api, url),
      _ => false,
    };

    match normalize(&raw, subject, merged) {
      Ok(record) => out.push(record),
      Err(err) => warn!(subject, error = %err, "skipping search item"),
    }
  }

  info!(subject, pages = pages.pages_fetched(), count = out.len() - before, "collected pull requests");
}

/// Collect every subject's pull requests created on or after `since`.
pub fn collect(api: &dyn GithubApi, subjects: &[String], since: &str) -> Vec<PrRecord> {
  let mut records = Vec::new();

  for subject in subjects {
    collect_subject(api, subject, since, &mut records);
  }

  records
}

pub fn snapshot_path(dir: &Path, completed_at: DateTime<Utc>) -> PathBuf {
  dir.join(format!("prs-{}.csv", stamp(completed_at)))
}

/// Write the record set to `<dir>/prs-<timestamp>.csv` and return that path.
pub fn write_snapshot(records: &[PrRecord], dir: &Path, completed_at: DateTime<Utc>) -> Result<PathBuf> {
  let path = snapshot_path(dir, completed_at);
  write_text(&path, &render_snapshot(records))?;
  info!(count = records.len(), path = %path.display(), "wrote pull requests");

  Ok(path)
}
