use tracing::warn;

use crate::github::api::GithubApi;

/// Whether the pull request behind `detail_url` was merged.
///
/// Lookup failures of any kind resolve to `false`: a PR whose merge state is
/// unknown is counted as closed-unmerged, never as merged.
pub fn resolve_merged(api: &dyn GithubApi, detail_url: &str) -> bool {
  match api.pull_request_merged(detail_url) {
    Ok(merged) => merged,
    Err(err) => {
      warn!(url = detail_url, error = %format!("{:#}", err), "error fetching merge status; assuming not merged");
      false
    }
  }
}
