use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    dir: TempDir,
    stats_path: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let stats_path = dir.path().join("stats.json");
        let stats = r#"{
            "players": [
                { "id": "1", "name": "Avery", "gender": "M", "outs": 20, "singles": 8, "doubles": 2, "homeruns": 1 },
                { "id": "2", "name": "Blake", "gender": "M", "outs": 22, "singles": 6, "triples": 1 },
                { "id": "3", "name": "Casey", "gender": "F", "outs": 18, "singles": 9, "doubles": 1 },
                { "id": "4", "name": "Drew",  "gender": "M", "outs": 25, "singles": 4, "homeruns": 2 },
                { "id": "5", "name": "Emery", "gender": "F", "outs": 21, "singles": 7 },
                { "id": "6", "name": "Finley","gender": "M", "outs": 19, "singles": 5, "doubles": 3 }
            ]
        }"#;
        fs::write(&stats_path, stats).unwrap();
        Self { dir, stats_path }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_lineupforge"))
            .args(args)
            .output()
            .expect("Failed to execute binary")
    }

    fn stats(&self) -> &str {
        self.stats_path.to_str().unwrap()
    }
}

#[test]
fn estimate_only_reports_index_space() {
    let ctx = TestContext::new();
    let output = ctx.run(&[
        "optimize",
        "--stats",
        ctx.stats(),
        "--lineup-type",
        "3",
        "--estimate-only",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("432 possible NO_CONSECUTIVE_FEMALES lineups"),
        "stdout was: {}",
        stdout
    );
}

#[test]
fn enumerate_prints_requested_range() {
    let ctx = TestContext::new();
    let output = ctx.run(&[
        "enumerate",
        "--stats",
        ctx.stats(),
        "--players",
        "Avery,Blake,Casey",
        "-n",
        "100",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let row = Regex::new(r"(?m)^\s+\d+\s{2}\S").unwrap();
    assert_eq!(row.find_iter(&stdout).count(), 6);
    assert!(stdout.contains("6 lineups of type ORDINARY"));
}

#[test]
fn optimize_writes_a_resumable_checkpoint() {
    let ctx = TestContext::new();
    let checkpoint = ctx.path("run.json");
    let output = ctx.run(&[
        "optimize",
        "--stats",
        ctx.stats(),
        "--players",
        "1,2,3,4",
        "--games",
        "5",
        "--innings",
        "2",
        "--threads",
        "2",
        "--seed",
        "11",
        "--checkpoint",
        checkpoint.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&checkpoint).unwrap()).unwrap();
    assert_eq!(doc["optimizer"], "MONTE_CARLO_EXHAUSTIVE");
    assert_eq!(doc["countTotal"], 24);
    assert_eq!(doc["countCompleted"], 24);
    assert_eq!(doc["lineup"].as_array().unwrap().len(), 4);

    let resumed = ctx.run(&[
        "optimize",
        "--stats",
        ctx.stats(),
        "--players",
        "1,2,3,4",
        "--resume",
        checkpoint.to_str().unwrap(),
    ]);
    assert!(resumed.status.success());
}

#[test]
fn resume_against_different_players_fails() {
    let ctx = TestContext::new();
    let checkpoint = ctx.path("small.json");
    let first = ctx.run(&[
        "optimize",
        "--stats",
        ctx.stats(),
        "--players",
        "1,2,3",
        "--games",
        "2",
        "--checkpoint",
        checkpoint.to_str().unwrap(),
    ]);
    assert!(first.status.success());

    let second = ctx.run(&[
        "optimize",
        "--stats",
        ctx.stats(),
        "--players",
        "1,2,3,4",
        "--games",
        "2",
        "--resume",
        checkpoint.to_str().unwrap(),
    ]);
    assert!(!second.status.success());
}

#[test]
fn unknown_player_exits_with_error() {
    let ctx = TestContext::new();
    let output = ctx.run(&[
        "optimize",
        "--stats",
        ctx.stats(),
        "--players",
        "1,nobody",
        "--estimate-only",
    ]);
    assert!(!output.status.success());
}
