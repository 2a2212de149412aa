//! CLI tests for Stackforge
//!
//! Covers argument parsing, the synth/validate/list/graph subcommands,
//! config file loading, and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

// Helper to get a command for testing
fn stackforge_cmd() -> Command {
    let mut cmd = Command::cargo_bin("stackforge").unwrap();
    cmd.arg("--no-color");
    cmd
}

#[test]
fn synth_json_prints_the_template() {
    stackforge_cmd()
        .args(["synth", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AWSTemplateFormatVersion"))
        .stdout(predicate::str::contains("AWS::EC2::VPC"))
        .stdout(predicate::str::contains("AWS::RDS::DBInstance"))
        .stdout(predicate::str::contains(
            "AWS::ElasticLoadBalancingV2::Listener",
        ));
}

#[test]
fn synth_yaml_prints_the_template() {
    stackforge_cmd()
        .args(["synth", "--yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AWSTemplateFormatVersion"))
        .stdout(predicate::str::contains("Ref: Vpc"));
}

#[test]
fn synth_json_and_yaml_conflict() {
    stackforge_cmd()
        .args(["synth", "--json", "--yaml"])
        .assert()
        .failure();
}

#[test]
fn synth_writes_the_assembly() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("assembly");
    stackforge_cmd()
        .args(["synth", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("synthesized stack 'wordpress'"));

    assert!(out.join("wordpress.template.json").exists());
    assert!(out.join("manifest.json").exists());

    let template: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(out.join("wordpress.template.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        template["Resources"]["Vpc"]["Type"],
        serde_json::json!("AWS::EC2::VPC")
    );
}

#[test]
fn validate_reports_the_stack_as_valid() {
    stackforge_cmd()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("all references resolve"));
}

#[test]
fn list_names_every_declaration() {
    stackforge_cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Vpc"))
        .stdout(predicate::str::contains("RdsInstance"))
        .stdout(predicate::str::contains("AlbListener"));
}

#[test]
fn graph_prints_a_provisioning_order() {
    stackforge_cmd()
        .arg("graph")
        .assert()
        .success()
        .stdout(predicate::str::contains("1."))
        .stdout(predicate::str::contains("AlbListener"));
}

#[test]
fn graph_dot_emits_graphviz() {
    stackforge_cmd()
        .args(["graph", "--dot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("digraph"))
        .stdout(predicate::str::contains("Vpc"));
}

#[test]
fn config_file_overrides_the_stack_name() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("stackforge.toml");
    std::fs::write(
        &config_path,
        r#"
[wordpress]
stack_name = "blog"
db_username = "wp"
"#,
    )
    .unwrap();

    stackforge_cmd()
        .args(["synth", "--json", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"MasterUsername\": \"wp\""));
}

#[test]
fn env_overrides_reach_the_template() {
    stackforge_cmd()
        .env("STACKFORGE_DB_USERNAME", "from-env")
        .args(["synth", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"MasterUsername\": \"from-env\""));
}

#[test]
fn unknown_subcommand_fails() {
    stackforge_cmd().arg("deploy").assert().failure();
}
