use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use rstest::rstest;
use tempfile::TempDir;

const SUM: &str = r#"
description: Return the sum of two integers
arguments:
  - name: a
    type: int64
  - name: b
    type: int64
output:
  name: total
  type: int64
examples:
  - arguments: [1, 2]
    output: 3
code: a + b
"#;

const CONFIG: &str = "default_gcp_project: p\ndefault_datasets: eu,us\n";

fn setup_project(config: Option<&str>) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("bigfunctions")).unwrap();
    std::fs::write(dir.path().join("bigfunctions/sum.yaml"), SUM).unwrap();
    std::fs::write(
        dir.path().join("bigfunctions/avg.yaml"),
        "description: Average\ncode: (a + b) / 2\n",
    )
    .unwrap();
    if let Some(config) = config {
        std::fs::write(dir.path().join("config.yaml"), config).unwrap();
    }
    dir
}

fn dry_run_stdout(dir: &TempDir, args: &[&str]) -> String {
    let output = cargo_bin_cmd!("bigfun")
        .current_dir(dir.path())
        .args(args)
        .arg("--dry-run")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn test_deploy_bare_name_to_default_datasets() {
    let dir = setup_project(Some(CONFIG));

    let stdout = dry_run_stdout(&dir, &["deploy", "sum"]);
    let eu = stdout.find("CREATE OR REPLACE FUNCTION `p.eu`.sum(a int64, b int64)");
    let us = stdout.find("CREATE OR REPLACE FUNCTION `p.us`.sum(a int64, b int64)");
    assert!(eu.is_some(), "missing p.eu.sum in:\n{}", stdout);
    assert!(us.is_some(), "missing p.us.sum in:\n{}", stdout);
    assert!(eu < us, "p.eu.sum must be deployed first");
    assert_eq!(stdout.matches("CREATE OR REPLACE FUNCTION").count(), 2);
}

#[test]
fn test_deploy_dataset_qualified() {
    let dir = setup_project(Some(CONFIG));

    let stdout = dry_run_stdout(&dir, &["deploy", "us.sum"]);
    assert!(stdout.contains("-- p.us.sum"));
    assert_eq!(stdout.matches("CREATE OR REPLACE FUNCTION").count(), 1);
}

#[test]
fn test_deploy_fully_qualified_leaves_config_alone() {
    let dir = setup_project(None);

    let stdout = dry_run_stdout(&dir, &["deploy", "p2.us.sum"]);
    assert!(stdout.contains("CREATE OR REPLACE FUNCTION `p2.us`.sum"));
    assert!(!dir.path().join("config.yaml").exists());
}

#[test]
fn test_deploy_wildcard() {
    let dir = setup_project(Some(CONFIG));

    let stdout = dry_run_stdout(&dir, &["deploy", "*"]);
    let order: Vec<_> = ["-- p.eu.avg", "-- p.eu.sum", "-- p.us.avg", "-- p.us.sum"]
        .iter()
        .map(|needle| stdout.find(needle).expect(needle))
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
}

#[rstest]
#[case("a.b.c.d")]
#[case("x.p.us.sum")]
fn test_deploy_malformed_identifier_fails(#[case] identifier: &str) {
    let dir = setup_project(Some(CONFIG));

    cargo_bin_cmd!("bigfun")
        .current_dir(dir.path())
        .args(["deploy", identifier, "--dry-run"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("malformed bigfunction identifier"));
}

#[test]
fn test_deploy_unknown_function_fails() {
    let dir = setup_project(Some(CONFIG));

    cargo_bin_cmd!("bigfun")
        .current_dir(dir.path())
        .args(["deploy", "median", "--dry-run"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("could not find median bigfunction"));
}

#[test]
fn test_deploy_without_terminal_cannot_prompt() {
    let dir = setup_project(None);

    cargo_bin_cmd!("bigfun")
        .current_dir(dir.path())
        .args(["deploy", "sum", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not prompt"));
    assert!(!dir.path().join("config.yaml").exists());
}

#[test]
fn test_test_passes_identifier_through() {
    let dir = setup_project(None);

    let stdout = dry_run_stdout(&dir, &["test", "p.eu.sum"]);
    assert!(stdout.contains("CREATE OR REPLACE FUNCTION `p.eu`.sum"));
    assert!(!dir.path().join("config.yaml").exists());
}

#[test]
fn test_test_does_not_resolve_defaults() {
    let dir = setup_project(Some(CONFIG));

    cargo_bin_cmd!("bigfun")
        .current_dir(dir.path())
        .args(["test", "sum", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed bigfunction identifier"));
}

#[test]
fn test_docs_generate() {
    let dir = setup_project(None);

    cargo_bin_cmd!("bigfun")
        .current_dir(dir.path())
        .args(["docs", "generate", "--output", "site"])
        .assert()
        .success();

    let sum = std::fs::read_to_string(dir.path().join("site/sum.md")).unwrap();
    assert!(sum.contains("# sum"));
    assert!(dir.path().join("site/avg.md").exists());
    assert!(dir.path().join("site/README.md").exists());
}

#[test]
fn test_custom_folder_and_config() {
    let dir = setup_project(None);
    std::fs::rename(dir.path().join("bigfunctions"), dir.path().join("defs")).unwrap();
    std::fs::write(dir.path().join("settings.yaml"), CONFIG).unwrap();

    let stdout = dry_run_stdout(
        &dir,
        &["--folder", "defs", "--config", "settings.yaml", "deploy", "eu.avg"],
    );
    assert!(stdout.contains("-- p.eu.avg"));
}

#[test]
fn test_missing_folder_fails() {
    let dir = tempfile::tempdir().unwrap();

    cargo_bin_cmd!("bigfun")
        .current_dir(dir.path())
        .args(["deploy", "sum"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bigfunctions folder not found"));
}
