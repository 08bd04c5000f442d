#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::io::Write;
use tempfile::NamedTempFile;

fn tasks_file(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("cli").expect("cli binary")
}

#[test]
fn cli_prints_activities_and_positions() {
    let file = tasks_file(
        "name,dependencies,t_pes,t_ver,t_opt,cost_reduction\n\
         t1,none,3,2,1,0\n\
         t2,none,2,2,2,0\n\
         t3,\"t1;t2\",1,1,1,0\n",
        ".csv",
    );
    cli()
        .arg(file.path())
        .assert()
        .success()
        .stdout(str_contains("Activities:"))
        .stdout(str_contains("dummy"))
        .stdout(str_contains("e3 (t3)"));
}

#[test]
fn cli_reports_unknown_dependency() {
    let file = tasks_file(
        r#"[{"name": "a", "dependencies": ["ghost"], "t_opt": 1, "t_ver": 1, "t_pes": 1}]"#,
        ".json",
    );
    cli()
        .arg(file.path())
        .assert()
        .failure()
        .stderr(str_contains("depends on unknown task 'ghost'"));
}

#[test]
fn cli_warns_on_cycle_fallback() {
    let file = tasks_file(
        r#"[
            {"name": "p", "dependencies": ["q"], "t_opt": 1, "t_ver": 1, "t_pes": 1},
            {"name": "q", "dependencies": ["none"], "t_opt": 1, "t_ver": 1, "t_pes": 1},
            {"name": "r", "dependencies": ["p", "q"], "t_opt": 1, "t_ver": 1, "t_pes": 1}
        ]"#,
        ".json",
    );
    cli()
        .arg(file.path())
        .assert()
        .success()
        .stdout(str_contains("warning: dummy arcs created a cycle"));
}
