// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: CSV text for snapshots and summaries; snapshot parsing for the aggregator
// role: io/csv
// inputs: PrRecord slices, AggregateGroup slices, snapshot CSV readers
// outputs: CSV strings with fixed headers; SnapshotRow values
// side_effects: write_text creates parent directories and writes files
// invariants:
// - A field containing a quote, comma or newline is quoted with embedded quotes doubled; all other fields are written bare
// - Snapshot parsing requires username, org/user, PR status and PR merged columns and trims every cell
// errors: Missing columns name the column; IO errors carry the file path
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::model::{AggregateGroup, PrRecord, PrStatus};

pub const SNAPSHOT_HEADER: [&str; 7] = [
  "username",
  "org/user",
  "repo",
  "PR link",
  "PR status",
  "PR merged",
  "PR date",
];

pub const SUMMARY_HEADER: [&str; 6] = ["username", "org", "open", "merged", "closed", "total"];

pub fn csv_escape(value: &str) -> Cow<'_, str> {
  if value.contains(['"', ',', '\n', '\r']) {
    Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
  } else {
    Cow::Borrowed(value)
  }
}

fn csv_line<S: AsRef<str>>(fields: &[S]) -> String {
  let escaped: Vec<Cow<'_, str>> = fields.iter().map(|f| csv_escape(f.as_ref())).collect();
  let mut line = escaped.join(",");
  line.push('\n');
  line
}

pub fn render_snapshot(records: &[PrRecord]) -> String {
  let mut out = csv_line(&SNAPSHOT_HEADER);

  for r in records {
    out.push_str(&csv_line(&[
      r.subject.as_str(),
      r.owner.as_str(),
      r.repo.as_str(),
      r.link.as_str(),
      r.status.as_str(),
      if r.merged { "true" } else { "false" },
      r.created_at.as_str(),
    ]));
  }

  out
}

/// Summary CSV. `legacy_header` keeps the trailing empty column older consumers expect.
pub fn render_summary(groups: &[AggregateGroup], legacy_header: bool) -> String {
  let mut out = SUMMARY_HEADER.join(",");
  if legacy_header {
    out.push(',');
  }
  out.push('\n');

  for g in groups {
    out.push_str(&csv_line(&[
      g.subject.clone(),
      g.org.clone(),
      g.open.to_string(),
      g.merged.to_string(),
      g.closed.to_string(),
      g.total.to_string(),
    ]));
  }

  out
}

pub fn write_text(path: &Path, content: &str) -> Result<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("creating directory {}", parent.display()))?;
  }
  std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))
}

/// The columns of a snapshot row the aggregator needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRow {
  pub subject: String,
  pub org: String,
  pub status: PrStatus,
  pub merged: bool,
}

impl From<&PrRecord> for SnapshotRow {
  fn from(r: &PrRecord) -> Self {
    Self {
      subject: r.subject.clone(),
      org: r.owner.clone(),
      status: r.status,
      merged: r.merged,
    }
  }
}

fn field<'r>(record: &'r csv::StringRecord, (name, idx): (&str, usize), line: u64) -> Result<&'r str> {
  record
    .get(idx)
    .map(str::trim)
    .ok_or_else(|| anyhow!("snapshot line {} has no value for column `{}`", line, name))
}

pub fn read_snapshot<R: Read>(reader: R) -> Result<Vec<SnapshotRow>> {
  let mut rdr = csv::ReaderBuilder::new()
    .has_headers(true)
    .flexible(true)
    .from_reader(reader);

  let headers = rdr.headers().context("reading snapshot header")?.clone();
  let column = |name: &str| -> Result<usize> {
    headers
      .iter()
      .position(|h| h.trim().eq_ignore_ascii_case(name))
      .ok_or_else(|| anyhow!("snapshot is missing required column `{}`", name))
  };

  let subject_col = ("username", column("username")?);
  let org_col = ("org/user", column("org/user")?);
  let status_col = ("PR status", column("PR status")?);
  let merged_col = ("PR merged", column("PR merged")?);

  let mut rows = Vec::new();

  for result in rdr.records() {
    let record = result.context("reading snapshot row")?;
    let line = record.position().map(|p| p.line()).unwrap_or(0);

    rows.push(SnapshotRow {
      subject: field(&record, subject_col, line)?.to_string(),
      org: field(&record, org_col, line)?.to_string(),
      status: PrStatus::parse(field(&record, status_col, line)?),
      merged: field(&record, merged_col, line)?.eq_ignore_ascii_case("true"),
    });
  }

  Ok(rows)
}

pub fn read_snapshot_file(path: &Path) -> Result<Vec<SnapshotRow>> {
  let file = std::fs::File::open(path).with_context(|| format!("opening snapshot {}", path.display()))?;
  read_snapshot(file).with_context(|| format!("parsing snapshot {}", path.display()))
}
