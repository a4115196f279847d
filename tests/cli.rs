use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

const CYCLE: &str = "0 1 10\n1 2 10\n1 2 15\n2 0 20\n";

fn write_dataset(name: &str, content: &str) -> PathBuf {
    let dir = PathBuf::from("target/tmp/tests");
    fs::create_dir_all(&dir).unwrap();
    let file = dir.join(name);
    fs::write(&file, content).unwrap();
    file
}

#[test]
fn no_split_builds_one_graph_from_every_edge() -> Result<(), Box<dyn std::error::Error>> {
    let file = write_dataset("no_split.edges", CYCLE);

    let mut cmd = Command::cargo_bin("streamwalk")?;
    cmd.arg(&file)
        .args(["--no-split", "--undirected", "false"])
        .args(["--strategy", "uniform", "--length", "4"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Graph\n# nodes : 3\n# edges : 4"))
        .stdout(predicate::str::contains("Train graph").not())
        .stdout(predicate::str::contains("Temporal random walk: ["));

    fs::remove_file(file)?;
    Ok(())
}

#[test]
fn default_run_splits_mirrored_edges_by_time() -> Result<(), Box<dyn std::error::Error>> {
    let file = write_dataset("split.edges", CYCLE);

    // Distinct times 10, 15, 20: the 0.9 quantile is 19, so only t = 20 is held out.
    let mut cmd = Command::cargo_bin("streamwalk")?;
    cmd.arg(&file).args(["--test-size", "0.1"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Train graph\n# nodes : 3\n# edges : 6"))
        .stdout(predicate::str::contains("Test graph\n# nodes : 2\n# edges : 2"));

    fs::remove_file(file)?;
    Ok(())
}

#[test]
fn missing_dataset_fails_with_context() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("streamwalk")?;
    cmd.arg("target/tmp/tests/does-not-exist.edges");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open"));
    Ok(())
}
