use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const FIXTURE: &str = "tests/fixtures/vinfo.csv";

fn cmd() -> Command {
    cargo_bin_cmd!("v2o")
}

#[test]
fn summary_prints_estate_totals() {
    cmd()
        .args(["summary", FIXTURE])
        .assert()
        .success()
        .stdout(contains("Infrastructure Summary"))
        .stdout(contains("Found 2 VMs running Red Hat Enterprise Linux"))
        .stdout(contains("1 numeric cells could not be parsed"));
}

#[test]
fn summary_json_reports_resolved_columns() {
    let out = cmd()
        .args(["summary", FIXTURE, "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: Value = serde_json::from_slice(&out).expect("valid json output");
    assert_eq!(v["totals"]["vm_count"], 5.0);
    assert_eq!(v["totals"]["total_vcpu"], 30.0);
    assert_eq!(v["totals"]["total_ram_gib"], 94.0);
    assert_eq!(v["coerced_cells"], 1);
    assert_eq!(v["columns"]["OS"], "OS according to the configuration file");
    assert_eq!(v["columns"]["Disk"], "Total disk capacity MiB");
}

#[test]
fn missing_column_fails_with_field_name() {
    cmd()
        .args(["summary", "tests/fixtures/no_cpu_column.csv"])
        .assert()
        .failure()
        .stderr(contains("could not find a column for CPUs"));
}

#[test]
fn project_writes_tables_and_summary() {
    let tmp = TempDir::new().expect("create temp dir");
    let out_dir = tmp.path().join("out");
    let config = tmp.path().join("v2o.toml");
    fs::write(&config, "start_year = 2030\n").expect("write config");

    cmd()
        .args(["project", FIXTURE, "--horizon", "4", "--growth", "10", "--inflation", "0"])
        .arg("--config")
        .arg(&config)
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(contains("Cost Projection"))
        .stdout(contains("2033"));

    let sizing = fs::read_to_string(out_dir.join("sizing.csv")).expect("sizing.csv");
    assert!(sizing.starts_with("Year,VMs,vCPUs,RAM_GiB,Storage_TiB,Nodes"));
    assert_eq!(sizing.lines().count(), 5);

    let costs = fs::read_to_string(out_dir.join("costs.csv")).expect("costs.csv");
    assert!(costs.lines().nth(1).unwrap_or_default().starts_with("2030,"));

    let summary: Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("summary.json")).expect("summary.json"))
            .expect("valid json");
    assert_eq!(summary["horizon_years"], 4);
    assert_eq!(summary["start_year"], 2030);
    assert_eq!(summary["edition"], "container-platform");
}

#[test]
fn project_rejects_out_of_range_ratio() {
    let tmp = TempDir::new().expect("create temp dir");
    cmd()
        .current_dir(tmp.path())
        .arg("project")
        .arg(format!("{}/{}", env!("CARGO_MANIFEST_DIR"), FIXTURE))
        .args(["--ratio", "0"])
        .assert()
        .failure()
        .stderr(contains("consolidation ratio"));
}

#[test]
fn unknown_edition_is_an_error() {
    let tmp = TempDir::new().expect("create temp dir");
    cmd()
        .args(["project", FIXTURE, "--edition", "nope"])
        .arg("--out-dir")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(contains("unknown edition 'nope'"));
}

#[test]
fn sample_then_summary() {
    let tmp = TempDir::new().expect("create temp dir");
    let path = tmp.path().join("sample.csv");
    cmd()
        .args(["sample", "--count", "12", "--seed", "3", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout(contains("Generated 12 VMs"));

    let out = cmd()
        .arg("summary")
        .arg(&path)
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: Value = serde_json::from_slice(&out).expect("valid json output");
    assert_eq!(v["totals"]["vm_count"], 12.0);
    assert_eq!(v["coerced_cells"], 0);
}

#[test]
fn init_config_refuses_to_overwrite() {
    let tmp = TempDir::new().expect("create temp dir");
    let path = tmp.path().join("v2o.toml");
    cmd().args(["init-config", "--output"]).arg(&path).assert().success();
    let text = fs::read_to_string(&path).expect("config written");
    assert!(text.contains("[sizing]"));
    assert!(text.contains("consolidation_ratio"));

    cmd()
        .args(["init-config", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(contains("already exists"));
    cmd()
        .args(["init-config", "--force", "--output"])
        .arg(&path)
        .assert()
        .success();
}
