use std::fs;

use predicates::prelude::*;

use super::common::TestEnv;

fn shared_entry(env: &TestEnv) -> std::path::PathBuf {
  let store = env.path("hoisted-resources");
  let entries: Vec<_> = fs::read_dir(&store)
    .unwrap()
    .map(|e| e.unwrap().path())
    .collect();
  assert_eq!(entries.len(), 1, "expected exactly one store entry, got {:?}", entries);
  entries.into_iter().next().unwrap()
}

#[cfg(unix)]
#[test]
fn hoist_links_duplicates_into_store() {
  let env = TestEnv::file_top();

  env
    .hoist_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Duplicate files hoisted"))
    .stdout(predicate::str::contains("Files scanned: 5"))
    .stdout(predicate::str::contains("Files hoisted: 2"));

  let entry = shared_entry(&env);
  assert_eq!(entry.extension().unwrap(), "md");
  assert_eq!(fs::read_to_string(&entry).unwrap(), "# shared\n");

  for name in ["fileTOP_04.md", "fileTOP_05.md"] {
    assert!(env.is_symlink(name));
    let target = fs::read_link(env.path(name)).unwrap();
    assert!(target.is_relative());
    assert!(target.starts_with("hoisted-resources"));
    assert_eq!(fs::read_to_string(env.path(name)).unwrap(), "# shared\n");
  }
  for name in ["fileTOP_01.md", "fileTOP_02.md", "fileTOP_03.md"] {
    assert!(!env.is_symlink(name));
  }
}

#[cfg(unix)]
#[test]
fn second_run_is_a_no_op() {
  let env = TestEnv::file_top();
  env.write_file("nested/dir/copy.md", "# shared\n");

  env.hoist_cmd().assert().success();
  let after_first = env.snapshot();

  env
    .hoist_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Files hoisted: 0"));

  assert_eq!(env.snapshot(), after_first);
}

#[cfg(unix)]
#[test]
fn nested_links_resolve_through_relative_targets() {
  let env = TestEnv::empty();
  env.write_file("a/b/c/deep.txt", "payload");
  env.write_file("top.txt", "payload");

  env.hoist_cmd().assert().success();

  let target = fs::read_link(env.path("a/b/c/deep.txt")).unwrap();
  assert!(target.starts_with("../../../hoisted-resources"));
  assert_eq!(fs::read_to_string(env.path("a/b/c/deep.txt")).unwrap(), "payload");
  assert_eq!(fs::read_to_string(env.path("top.txt")).unwrap(), "payload");
}

#[test]
fn dry_run_changes_nothing() {
  let env = TestEnv::file_top();
  let before = env.snapshot();

  env
    .hoist_cmd()
    .arg("--dry-run")
    .assert()
    .success()
    .stdout(predicate::str::contains("Dry run"))
    .stdout(predicate::str::contains("Files hoisted: 2"));

  assert_eq!(env.snapshot(), before);
  assert!(!env.path("hoisted-resources").exists());
}

#[cfg(unix)]
#[test]
fn custom_store_dir() {
  let env = TestEnv::file_top();

  env.hoist_cmd().args(["--store-dir", "blobs"]).assert().success();

  assert!(env.path("blobs").is_dir());
  assert!(!env.path("hoisted-resources").exists());
  assert!(fs::read_link(env.path("fileTOP_04.md")).unwrap().starts_with("blobs"));
}

#[cfg(unix)]
#[test]
fn json_output_is_valid() {
  let env = TestEnv::file_top();

  let output = env.hoist_cmd().args(["-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["files_scanned"], 5);
  assert_eq!(report["dry_run"], false);
  assert!(report["failures"].as_array().unwrap().is_empty());

  let entries = report["entries"].as_object().unwrap();
  assert_eq!(entries.len(), 1);
  let entry = entries.values().next().unwrap();
  assert_eq!(entry["folded"], 2);
  assert_eq!(entry["created"], true);
  assert_eq!(entry["size"], 9);
}

#[test]
fn files_inside_store_are_ignored() {
  let env = TestEnv::empty();
  env.write_file("hoisted-resources/stored.md", "# shared\n");
  env.write_file("only.md", "# shared\n");

  env
    .hoist_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Files scanned: 1"))
    .stdout(predicate::str::contains("Files hoisted: 0"));

  assert!(!env.is_symlink("only.md"));
}
