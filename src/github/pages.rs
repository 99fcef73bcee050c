// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Walk the paginated search results for one subject, yielding raw items lazily
// role: github/pagination
// inputs: &dyn GithubApi, subject, since
// outputs: Iterator<Item = RawItem> in page order, then within-page order
// side_effects: One search request per page; one progress log line per page
// invariants:
// - Pages are requested from 1 upward; a page is only requested after the previous one was fully yielded
// - A page with 0 items or fewer than PER_PAGE items is the last one
// - A failed page request ends the walk; items already yielded stay with the caller
// errors: Logged at error level, never returned
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use tracing::{error, info};

use crate::github::api::{GithubApi, SearchQuery};
use crate::model::{RawItem, PER_PAGE};

pub struct PageWalker<'a> {
  api: &'a dyn GithubApi,
  subject: &'a str,
  since: &'a str,
  page: u32,
  buffered: std::vec::IntoIter<RawItem>,
  exhausted: bool,
}

/// Start a fresh walk over `subject`'s pull requests created on or after `since`.
pub fn walk<'a>(api: &'a dyn GithubApi, subject: &'a str, since: &'a str) -> PageWalker<'a> {
  PageWalker {
    api,
    subject,
    since,
    page: 0,
    buffered: Vec::new().into_iter(),
    exhausted: false,
  }
}

impl PageWalker<'_> {
  /// Number of pages requested so far.
  pub fn pages_fetched(&self) -> u32 {
    self.page
  }

  fn fetch_next_page(&mut self) {
    self.page += 1;
    info!(subject = self.subject, page = self.page, "fetching pull requests");

    let query = SearchQuery {
      subject: self.subject,
      since: self.since,
      page: self.page,
    };

    match self.api.search_pull_requests(&query) {
      Ok(items) => {
        if items.is_empty() || items.len() < PER_PAGE {
          self.exhausted = true;
        }
        self.buffered = items.into_iter();
      }
      Err(err) => {
        error!(subject = self.subject, page = self.page, error = %format!("{:#}", err), "error fetching pull requests");
        self.exhausted = true;
      }
    }
  }
}

impl Iterator for PageWalker<'_> {
  type Item = RawItem;

  fn next(&mut self) -> Option<RawItem> {
    loop {
      if let Some(item) = self.buffered.next() {
        return Some(item);
      }
      if self.exhausted {
        return None;
      }
      self.fetch_next_page();
    }
  }
}
