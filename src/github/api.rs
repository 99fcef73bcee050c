// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: GitHub transport seam (search + pull detail), token discovery, HTTP and env-fixture backends
// role: github/api
// inputs: ApiConfig (base URL, token, timeout, retries); env GITHUB_TOKEN/GH_TOKEN; optional `gh` CLI; env fixtures PRA_TEST_*
// outputs: Raw search items per page; merge flags per pull request detail URL
// side_effects: Network calls to the configured API base; spawns `gh` subprocess during token discovery
// invariants:
// - Any non-2xx status or transport failure is an Err; callers decide how far it propagates
// - Retries apply only to transport errors, 429 and 5xx, and never exceed ApiConfig.retries
// - Token discovery prefers GITHUB_TOKEN, then GH_TOKEN, then `gh auth token`
// errors: anyhow errors carrying the URL and HTTP status
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::model::{RawItem, SearchResponse, PER_PAGE};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = "pr-activity-report";

const ENV_SEARCH_FIXTURES: &str = "PRA_TEST_SEARCH_JSON";
const ENV_DETAIL_FIXTURES: &str = "PRA_TEST_PULL_DETAILS_JSON";

/// One page request against `GET /search/issues`.
#[derive(Debug, Clone, Copy)]
pub struct SearchQuery<'a> {
  pub subject: &'a str,
  pub since: &'a str,
  pub page: u32,
}

impl SearchQuery<'_> {
  /// The `q` parameter; `+` separates qualifiers the same way the web UI does.
  pub fn q(&self) -> String {
    format!(
      "author:{}+is:pr+created:>={}",
      encode_term(self.subject),
      encode_term(self.since)
    )
  }

  pub fn url(&self, base: &str) -> String {
    format!(
      "{}/search/issues?q={}&per_page={}&page={}",
      base.trim_end_matches('/'),
      self.q(),
      PER_PAGE,
      self.page
    )
  }
}

/// Escape the characters a query string would otherwise split or reinterpret.
fn encode_term(term: &str) -> String {
  let mut out = String::with_capacity(term.len());
  for c in term.chars() {
    match c {
      '+' => out.push_str("%2B"),
      ' ' => out.push_str("%20"),
      '&' => out.push_str("%26"),
      '#' => out.push_str("%23"),
      '%' => out.push_str("%25"),
      _ => out.push(c),
    }
  }
  out
}

// --- Trait seam for GitHub API ---
pub trait GithubApi {
  /// Fetch one page of pull requests authored by `query.subject`.
  fn search_pull_requests(&self, query: &SearchQuery<'_>) -> Result<Vec<RawItem>>;

  /// Read the `merged` flag from a pull request detail resource.
  fn pull_request_merged(&self, detail_url: &str) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base: String,
  pub token: Option<String>,
  pub timeout: Duration,
  pub retries: u32,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base: DEFAULT_API_BASE.to_string(),
      token: None,
      timeout: Duration::from_secs(30),
      retries: 0,
    }
  }
}

/// Discover a GitHub token: env vars first, then `gh auth token` if available.
pub fn get_github_token() -> Option<String> {
  for key in ["GITHUB_TOKEN", "GH_TOKEN"] {
    if let Ok(t) = std::env::var(key) {
      if !t.trim().is_empty() {
        return Some(t.trim().to_string());
      }
    }
  }

  if let Ok(output) = std::process::Command::new("gh").args(["auth", "token"]).output() {
    if output.status.success() {
      let t = String::from_utf8_lossy(&output.stdout).trim().to_string();

      if !t.is_empty() {
        return Some(t);
      }
    }
  }

  None
}

fn merged_flag(detail: &Value, detail_url: &str) -> Result<bool> {
  detail
    .get("merged")
    .and_then(Value::as_bool)
    .ok_or_else(|| anyhow!("pull request {} has no boolean `merged` field", detail_url))
}

struct GithubHttpApi {
  agent: ureq::Agent,
  base: String,
  token: Option<String>,
  retries: u32,
}

impl GithubHttpApi {
  fn new(cfg: &ApiConfig) -> Self {
    let agent = ureq::AgentBuilder::new()
      .timeout(cfg.timeout)
      .user_agent(USER_AGENT)
      .build();

    Self {
      agent,
      base: cfg.base.clone(),
      token: cfg.token.clone(),
      retries: cfg.retries,
    }
  }

  fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
    let mut attempt: u32 = 0;

    loop {
      let mut req = self.agent.get(url).set("Accept", ACCEPT);

      if let Some(token) = &self.token {
        req = req.set("Authorization", &format!("Bearer {}", token));
      }

      let err = match req.call() {
        Ok(resp) => {
          return resp
            .into_json::<T>()
            .with_context(|| format!("decoding JSON from {}", url));
        }
        Err(err) => err,
      };

      if attempt < self.retries && is_retryable(&err) {
        attempt += 1;
        warn!(url, attempt, error = %err, "retrying GitHub request");
        std::thread::sleep(Duration::from_millis(250 * u64::from(attempt)));
        continue;
      }

      return Err(describe(err, url));
    }
  }
}

fn is_retryable(err: &ureq::Error) -> bool {
  match err {
    ureq::Error::Status(code, _) => *code == 429 || *code >= 500,
    ureq::Error::Transport(_) => true,
  }
}

fn describe(err: ureq::Error, url: &str) -> anyhow::Error {
  match err {
    ureq::Error::Status(code, resp) => {
      anyhow!("GET {} returned HTTP {} {}", url, code, resp.status_text())
    }
    ureq::Error::Transport(t) => anyhow!("GET {} failed: {}", url, t),
  }
}

impl GithubApi for GithubHttpApi {
  fn search_pull_requests(&self, query: &SearchQuery<'_>) -> Result<Vec<RawItem>> {
    let page: SearchResponse = self.get_json(&query.url(&self.base))?;
    Ok(page.items)
  }

  fn pull_request_merged(&self, detail_url: &str) -> Result<bool> {
    let detail: Value = self.get_json(detail_url)?;
    merged_flag(&detail, detail_url)
  }
}

/// Fixture-backed API for CLI tests.
///
/// `PRA_TEST_SEARCH_JSON` maps subject -> list of pages; a page is either an
/// array of search items or `{"status": <code>}` to simulate a failed request.
/// `PRA_TEST_PULL_DETAILS_JSON` maps detail URL -> pull request JSON.
struct GithubEnvApi;

fn env_json(key: &str) -> Option<Value> {
  std::env::var(key)
    .ok()
    .and_then(|s| serde_json::from_str::<Value>(&s).ok())
}

fn fixture_status(v: &Value) -> Option<u64> {
  v.as_object()
    .and_then(|obj| obj.get("status"))
    .and_then(Value::as_u64)
}

impl GithubApi for GithubEnvApi {
  fn search_pull_requests(&self, query: &SearchQuery<'_>) -> Result<Vec<RawItem>> {
    let Some(fixtures) = env_json(ENV_SEARCH_FIXTURES) else {
      return Ok(Vec::new());
    };
    let idx = (query.page as usize).saturating_sub(1);
    let Some(page) = fixtures.get(query.subject).and_then(|pages| pages.get(idx)) else {
      return Ok(Vec::new());
    };

    if let Some(code) = fixture_status(page) {
      bail!("GET {} returned HTTP {}", query.url(DEFAULT_API_BASE), code);
    }

    serde_json::from_value::<Vec<RawItem>>(page.clone())
      .with_context(|| format!("decoding search fixture for {} page {}", query.subject, query.page))
  }

  fn pull_request_merged(&self, detail_url: &str) -> Result<bool> {
    let fixtures = env_json(ENV_DETAIL_FIXTURES).ok_or_else(|| anyhow!("no pull request fixtures loaded"))?;
    let detail = fixtures
      .get(detail_url)
      .ok_or_else(|| anyhow!("GET {} returned HTTP 404", detail_url))?;

    if let Some(code) = fixture_status(detail) {
      bail!("GET {} returned HTTP {}", detail_url, code);
    }

    merged_flag(detail, detail_url)
  }
}

fn env_wants_mock() -> bool {
  std::env::var(ENV_SEARCH_FIXTURES).is_ok() || std::env::var(ENV_DETAIL_FIXTURES).is_ok()
}

/// Select the backend: env fixtures when present, otherwise live HTTP.
pub fn build_api(cfg: &ApiConfig) -> Box<dyn GithubApi> {
  if env_wants_mock() {
    Box::new(GithubEnvApi)
  } else {
    Box::new(GithubHttpApi::new(cfg))
  }
}
