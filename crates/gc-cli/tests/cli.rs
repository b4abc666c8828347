//! CLI command integration tests.
//! Each test uses a temp directory via GEOCOIN_DATA_DIR for full isolation.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn geocoin_cmd(data_dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("geocoin").unwrap();
    cmd.env("GEOCOIN_DATA_DIR", data_dir.path());
    cmd
}

#[test]
fn help_points_to_sensor_tool() {
    let dir = TempDir::new().unwrap();
    geocoin_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("gc_sensor"))
        .stdout(predicate::str::contains("not saved"));
}

#[test]
fn look_fresh_profile() {
    let dir = TempDir::new().unwrap();
    geocoin_cmd(&dir)
        .arg("look")
        .assert()
        .success()
        .stdout(predicate::str::contains("position: 36.9995,-122.0533 (cell 369995,-1220533)"))
        .stdout(predicate::str::contains("sensor:   idle"))
        .stdout(predicate::str::contains("wallet:   No coins yet..."))
        .stdout(predicate::str::contains("caches in view: 11"))
        .stdout(predicate::str::contains("369995,-1220532"));
}

#[test]
fn collect_persists_between_runs() {
    let dir = TempDir::new().unwrap();
    geocoin_cmd(&dir)
        .args(["collect", "369995", "-1220532"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "collected 369995:-1220532#38 from 369995,-1220532 (38 left)",
        ));

    geocoin_cmd(&dir)
        .arg("wallet")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 coins (Last coin: 369995:-1220532#38)"));

    geocoin_cmd(&dir)
        .args(["deposit", "369995", "-1220532"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(39 coins there)"));

    geocoin_cmd(&dir)
        .arg("wallet")
        .assert()
        .success()
        .stdout(predicate::str::contains("No coins yet..."));
}

#[test]
fn empty_wallet_deposit_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    geocoin_cmd(&dir)
        .args(["deposit", "369995", "-1220532"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing deposited"));
}

#[test]
fn collect_out_of_reach_fails() {
    let dir = TempDir::new().unwrap();
    geocoin_cmd(&dir)
        .args(["collect", "2", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of reach"));
}

#[test]
fn move_appends_history() {
    let dir = TempDir::new().unwrap();
    geocoin_cmd(&dir)
        .args(["move", "north"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cell 369996,-1220533"));

    let output = geocoin_cmd(&dir).arg("history").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 2);
    assert!(stdout.lines().next().unwrap().ends_with("36.9995,-122.0533"));
}

#[test]
fn move_rejects_unknown_direction() {
    let dir = TempDir::new().unwrap();
    geocoin_cmd(&dir)
        .args(["move", "up"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown direction"));
}

#[test]
fn locate_accepts_negative_coordinates() {
    let dir = TempDir::new().unwrap();
    geocoin_cmd(&dir)
        .args(["locate", "-33.8688", "151.2093"])
        .assert()
        .success()
        .stdout(predicate::str::contains("position: -33.8688,151.2093"));
}

#[test]
fn reset_discards_progress() {
    let dir = TempDir::new().unwrap();
    geocoin_cmd(&dir).args(["move", "east"]).assert().success();
    geocoin_cmd(&dir)
        .args(["collect", "369995", "-1220532"])
        .assert()
        .success();

    geocoin_cmd(&dir)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("progress discarded"))
        .stdout(predicate::str::contains("wallet:   No coins yet..."));

    let output = geocoin_cmd(&dir).arg("history").output().unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 1);
}

#[test]
fn profiles_are_isolated() {
    let dir = TempDir::new().unwrap();
    geocoin_cmd(&dir)
        .args(["collect", "369995", "-1220532", "--profile", "alice"])
        .assert()
        .success();

    geocoin_cmd(&dir)
        .args(["wallet", "--profile", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No coins yet..."));

    assert!(dir.path().join("profiles/alice.db").exists());
}

#[test]
fn config_file_changes_the_world() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[start]\nlat = 0.0\nlng = 0.0\n",
    )
    .unwrap();

    geocoin_cmd(&dir)
        .arg("look")
        .assert()
        .success()
        .stdout(predicate::str::contains("(cell 0,0)"))
        .stdout(predicate::str::contains("caches in view: 20"));

    geocoin_cmd(&dir)
        .args(["collect", "2", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("collected 2:2#25"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "spawn_probability = 7.0\n").unwrap();

    geocoin_cmd(&dir)
        .arg("look")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}
