// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Namespace for GitHub access (transport seam, search pagination, merge lookups)
// role: github/namespace
// outputs: Public submodules isolating every network call behind the GithubApi trait
// invariants: Each network failure stays within its narrowest scope (one page or one lookup)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod api;
pub mod merge;
pub mod pages;
