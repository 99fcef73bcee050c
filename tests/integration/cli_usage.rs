use predicates::prelude::*;

#[test]
fn errors_when_no_subcommand() {
  test_support::cmd_bin("pr-activity-report")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Provide a subcommand: collect, aggregate or run"));
}

#[test]
fn rejects_unparseable_since() {
  let td = test_support::tempdir();
  let usernames = test_support::write_usernames(td.path(), &["alice"]);

  test_support::cmd_bin("pr-activity-report")
    .args(["collect", "--since", "last tuesday"])
    .arg("--usernames")
    .arg(&usernames)
    .arg("--out-dir")
    .arg(td.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("--since must be a YYYY-MM-DD date"));

  assert_eq!(std::fs::read_dir(td.path()).unwrap().count(), 1, "only the roster should exist");
}
