use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

fn multimover() -> Command {
    Command::cargo_bin("multimover").unwrap()
}

fn fixture(names: &[&str]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for name in names {
        temp_dir.child(name).write_str(name).unwrap();
    }
    temp_dir
}

#[test]
fn test_help_exits_non_zero() {
    multimover()
        .arg("--help")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Usage: multimover"))
        .stdout(predicate::str::contains("--dryrun"))
        .stdout(predicate::str::contains("--sourcedir"))
        .stdout(predicate::str::contains("Example:").not());
}

#[test]
fn test_verbose_help_shows_examples() {
    multimover()
        .args(["-v", "-h"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Example:"))
        .stdout(predicate::str::contains("renamed-file-%1.txt"));
}

#[test]
fn test_version_command() {
    multimover()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("multimover"));
}

#[test]
fn test_unknown_option() {
    multimover()
        .args(["--bogus", "a", "b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--bogus"));
}

#[test]
fn test_option_missing_argument() {
    multimover()
        .arg("--sourcedir")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--sourcedir"));
}

#[test]
fn test_missing_destination_pattern_prints_usage() {
    multimover()
        .arg("file-%1{\\d+}.txt")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Usage: multimover"));
}

#[test]
fn test_renames_matching_file() {
    let temp_dir = fixture(&["file-42.txt", "file-abc.txt", "notes.txt"]);

    multimover()
        .current_dir(temp_dir.path())
        .args(["file-%1{\\d+}.txt", "renamed-%1.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moved"))
        .stdout(predicate::str::contains("renamed-42.txt"))
        .stderr(predicate::str::is_empty());

    temp_dir.child("renamed-42.txt").assert("file-42.txt");
    temp_dir.child("file-42.txt").assert(predicate::path::missing());
    temp_dir.child("file-abc.txt").assert(predicate::path::exists());
    temp_dir.child("notes.txt").assert(predicate::path::exists());
}

#[test]
fn test_source_and_target_dirs() {
    let temp_dir = TempDir::new().unwrap();
    temp_dir.child("in/2024-05-01.log").write_str("x").unwrap();
    temp_dir.child("out").create_dir_all().unwrap();

    multimover()
        .current_dir(temp_dir.path())
        .args([
            "-s",
            "in",
            "-t",
            "out",
            "%1{\\d+}-%2{\\d+}-%3{\\d+}.log",
            "%3.%2.%1.log",
        ])
        .assert()
        .success();

    temp_dir.child("out/01.05.2024.log").assert(predicate::path::exists());
    temp_dir.child("in/2024-05-01.log").assert(predicate::path::missing());
}

#[test]
fn test_dryrun_does_not_move() {
    let temp_dir = fixture(&["a-1.txt", "a-2.txt"]);

    multimover()
        .current_dir(temp_dir.path())
        .args(["--dryrun", "a-%1{\\d}.txt", "b-%1.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would move").count(2));

    temp_dir.child("a-1.txt").assert(predicate::path::exists());
    temp_dir.child("a-2.txt").assert(predicate::path::exists());
    temp_dir.child("b-1.txt").assert(predicate::path::missing());
}

#[test]
fn test_no_match_notice_on_stderr() {
    let temp_dir = fixture(&["notes.txt"]);

    multimover()
        .current_dir(temp_dir.path())
        .args(["%1{\\d+}.png", "%1.jpg"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Found no match to pattern").count(1));
}

#[test]
fn test_verbose_routes_notice_to_stdout() {
    let temp_dir = fixture(&["notes.txt"]);

    multimover()
        .current_dir(temp_dir.path())
        .args(["-v", "%1{\\d+}.png", "%1.jpg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found no match to pattern"))
        .stdout(predicate::str::contains("Source directory"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_existing_destination_reported() {
    let temp_dir = fixture(&["file-1.txt", "renamed-1.txt"]);

    multimover()
        .current_dir(temp_dir.path())
        .args(["file-%1{\\d+}.txt", "renamed-%1.txt"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to move"))
        .stderr(predicate::str::contains("Destination file already exists."));

    temp_dir.child("file-1.txt").assert(predicate::path::exists());
    temp_dir.child("renamed-1.txt").assert("renamed-1.txt");
}

#[test]
fn test_invalid_regex_aborts() {
    let temp_dir = fixture(&["a.txt"]);

    multimover()
        .current_dir(temp_dir.path())
        .args(["%1{[}.txt", "%1.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("%1{[}"));

    temp_dir.child("a.txt").assert(predicate::path::exists());
}

#[test]
fn test_json_output() {
    let temp_dir = fixture(&["x-7.dat"]);

    multimover()
        .current_dir(temp_dir.path())
        .args(["--output", "json", "x-%1{\\d}.dat", "y-%1.dat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"moved\""))
        .stdout(predicate::str::contains("\"captures\""));

    temp_dir.child("y-7.dat").assert(predicate::path::exists());
}
