use anyhow::{bail, Result};

use crate::model::{PrRecord, PrStatus, RawItem};

/// Split `.../{owner}/{repo}` into its trailing two path segments.
pub fn owner_repo(repository_url: &str) -> Option<(String, String)> {
  let mut segments = repository_url.trim().trim_end_matches('/').rsplit('/');
  let repo = segments.next().filter(|s| !s.is_empty())?;
  let owner = segments.next().filter(|s| !s.is_empty() && !s.ends_with(':'))?;

  Some((owner.to_string(), repo.to_string()))
}

/// Build a `PrRecord` from a search item and its resolved merge flag.
///
/// The flag is dropped for open PRs and for items without a pull request
/// detail reference.
pub fn normalize(raw: &RawItem, subject: &str, merged: bool) -> Result<PrRecord> {
  let Some((owner, repo)) = owner_repo(&raw.repository_url) else {
    bail!(
      "cannot derive owner/repo from repository_url {:?} ({})",
      raw.repository_url,
      raw.html_url
    );
  };

  let status = raw.status();
  let merged = merged && status == PrStatus::Closed && raw.detail_url().is_some();

  Ok(PrRecord {
    subject: subject.to_string(),
    owner,
    repo,
    link: raw.html_url.clone(),
    status,
    merged,
    created_at: raw.created_at.clone(),
  })
}
