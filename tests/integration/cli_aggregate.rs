use std::collections::HashSet;

use predicates::prelude::*;

const BIN: &str = "pr-activity-report";

fn aggregate(input: &std::path::Path, out: &std::path::Path, extra: &[&str]) -> std::process::Output {
  test_support::cmd_bin(BIN)
    .arg("aggregate")
    .arg("--input")
    .arg(input)
    .arg("--out")
    .arg(out)
    .args(extra)
    .output()
    .unwrap()
}

#[test]
fn aggregate_counts_per_user_and_org() {
  let td = test_support::tempdir();
  let input = test_support::fixtures_dir().join("snapshot.csv");
  let out = td.path().join("summary.csv");

  let output = aggregate(&input, &out, &[]);

  assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
  assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), out.display().to_string());
  assert_eq!(
    std::fs::read_to_string(&out).unwrap(),
    "username,org,open,merged,closed,total\n\
     alice,acme,1,1,1,3\n\
     dave,\"we,ird\",0,1,0,1\n\
     bob,acme,0,0,1,1\n"
  );
}

#[test]
fn aggregate_legacy_header_keeps_trailing_comma() {
  let td = test_support::tempdir();
  let input = test_support::fixtures_dir().join("snapshot.csv");
  let out = td.path().join("summary.csv");

  assert!(aggregate(&input, &out, &["--legacy-header"]).status.success());

  let text = std::fs::read_to_string(&out).unwrap();
  assert_eq!(text.lines().next(), Some("username,org,open,merged,closed,total,"));
}

#[test]
fn reordered_snapshot_gives_same_rows() {
  let td = test_support::tempdir();
  let original = test_support::read_fixture_text("snapshot.csv");
  let mut lines: Vec<&str> = original.lines().collect();
  let header = lines.remove(0);
  lines.reverse();
  let reversed_input = td.path().join("reversed.csv");
  std::fs::write(&reversed_input, format!("{}\n{}\n", header, lines.join("\n"))).unwrap();

  let out_a = td.path().join("a.csv");
  let out_b = td.path().join("b.csv");
  assert!(aggregate(&test_support::fixtures_dir().join("snapshot.csv"), &out_a, &[]).status.success());
  assert!(aggregate(&reversed_input, &out_b, &[]).status.success());

  let rows = |p: &std::path::Path| -> HashSet<String> {
    std::fs::read_to_string(p).unwrap().lines().skip(1).map(str::to_string).collect()
  };
  assert_eq!(rows(&out_a), rows(&out_b));
}

#[test]
fn aggregate_header_only_snapshot_gives_header_only_summary() {
  let td = test_support::tempdir();
  let input = td.path().join("empty.csv");
  std::fs::write(&input, "username,org/user,repo,PR link,PR status,PR merged,PR date\n").unwrap();
  let out = td.path().join("summary.csv");

  assert!(aggregate(&input, &out, &[]).status.success());
  assert_eq!(std::fs::read_to_string(&out).unwrap(), "username,org,open,merged,closed,total\n");
}

#[test]
fn aggregate_missing_column_names_it() {
  let td = test_support::tempdir();
  let input = td.path().join("bad.csv");
  std::fs::write(&input, "username,PR status,PR merged\nalice,open,false\n").unwrap();

  test_support::cmd_bin(BIN)
    .arg("aggregate")
    .arg("--input")
    .arg(&input)
    .assert()
    .failure()
    .stderr(predicate::str::contains("missing required column `org/user`"));

  assert!(!td.path().join("bad-summary.csv").exists());
}

#[test]
fn aggregate_rejects_row_missing_cells() {
  let td = test_support::tempdir();
  let input = td.path().join("short.csv");
  std::fs::write(
    &input,
    "username,org/user,repo,PR link,PR status,PR merged,PR date\n\
     alice,acme,w,https://github.com/acme/w/pull/1,closed,true,2024-01-01T00:00:00Z\n\
     bob\n",
  )
  .unwrap();
  let out = td.path().join("summary.csv");

  test_support::cmd_bin(BIN)
    .arg("aggregate")
    .arg("--input")
    .arg(&input)
    .arg("--out")
    .arg(&out)
    .assert()
    .failure()
    .stderr(predicate::str::contains("line 3"))
    .stderr(predicate::str::contains("`org/user`"));

  assert!(!out.exists());
}
