// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the records shared by collection and aggregation (raw search items, PR records, groups)
// role: model/types
// outputs: Deserializable search payloads; PrRecord; Disposition; GroupKey; AggregateGroup
// invariants:
// - PrRecord.merged is false whenever status is Open
// - AggregateGroup.total == open + merged + closed after every bump
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::Deserialize;

/// Search page size; the walker treats any shorter page as the last one.
pub const PER_PAGE: usize = 100;

/// One entry of the `items` array returned by `GET /search/issues`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RawItem {
  #[serde(default)]
  pub repository_url: String,
  #[serde(default)]
  pub html_url: String,
  #[serde(default)]
  pub state: String,
  #[serde(default)]
  pub created_at: String,
  #[serde(default)]
  pub pull_request: Option<PullRequestRef>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PullRequestRef {
  #[serde(default)]
  pub url: Option<String>,
}

impl RawItem {
  /// API URL of the pull request detail resource, when the item is a PR.
  pub fn detail_url(&self) -> Option<&str> {
    self
      .pull_request
      .as_ref()
      .and_then(|pr| pr.url.as_deref())
      .filter(|u| !u.trim().is_empty())
  }

  pub fn status(&self) -> PrStatus {
    PrStatus::parse(&self.state)
  }
}

/// Envelope of a search response. A missing `items` array reads as an empty page.
#[derive(Debug, Deserialize, Default)]
pub struct SearchResponse {
  #[serde(default)]
  pub items: Vec<RawItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrStatus {
  Open,
  Closed,
}

impl PrStatus {
  /// Case-insensitive; anything other than `open` counts as closed.
  pub fn parse(s: &str) -> Self {
    if s.trim().eq_ignore_ascii_case("open") {
      PrStatus::Open
    } else {
      PrStatus::Closed
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      PrStatus::Open => "open",
      PrStatus::Closed => "closed",
    }
  }
}

/// One observed pull request, as written to a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct PrRecord {
  pub subject: String,
  pub owner: String,
  pub repo: String,
  pub link: String,
  pub status: PrStatus,
  pub merged: bool,
  pub created_at: String,
}

/// Three-way classification of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
  Open,
  Merged,
  ClosedUnmerged,
}

impl Disposition {
  /// Open wins over the merge flag; the flag only matters for closed PRs.
  pub fn classify(status: PrStatus, merged: bool) -> Self {
    match (status, merged) {
      (PrStatus::Open, _) => Disposition::Open,
      (PrStatus::Closed, true) => Disposition::Merged,
      (PrStatus::Closed, false) => Disposition::ClosedUnmerged,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
  pub subject: String,
  pub org: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregateGroup {
  pub subject: String,
  pub org: String,
  pub open: u64,
  pub merged: u64,
  pub closed: u64,
  pub total: u64,
}

impl AggregateGroup {
  pub fn new(key: &GroupKey) -> Self {
    Self {
      subject: key.subject.clone(),
      org: key.org.clone(),
      open: 0,
      merged: 0,
      closed: 0,
      total: 0,
    }
  }

  pub fn bump(&mut self, disposition: Disposition) {
    match disposition {
      Disposition::Open => self.open += 1,
      Disposition::Merged => self.merged += 1,
      Disposition::ClosedUnmerged => self.closed += 1,
    }
    self.total += 1;
  }
}
