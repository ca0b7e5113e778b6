use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

// Points the inspector at a program that does not exist, so every probe
// fails the same way on any machine and rows never depend on real media.
const NO_FFPROBE: &str = "/nonexistent/cutlist-test-ffprobe";

const SHOT_LIST: &str = "filename,range\n\
missing.mov,00:00:01:00 - 00:00:02:00\n\
present.mov,00:00:00:00 - 00:00:03:00\n";

fn cutlist_cmd() -> Command {
    let mut cmd = Command::cargo_bin("cutlist").expect("Failed to find cutlist binary");
    cmd.env("CUTLIST_FFPROBE", NO_FFPROBE).env("NO_COLOR", "1").env_remove("CUTLIST_VIDEO_DIR");
    cmd
}

fn project(dir: &Path) -> (PathBuf, PathBuf) {
    let videos = dir.join("footage");
    fs::create_dir_all(&videos).unwrap();
    fs::write(videos.join("present.mov"), b"not really a movie").unwrap();
    let shots = dir.join("promo.csv");
    fs::write(&shots, SHOT_LIST).unwrap();
    (shots, videos)
}

#[test]
fn test_help_lists_subcommands() {
    cutlist_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("scan"))
        .stdout(contains("fix"))
        .stdout(contains("generate"));
}

#[test]
fn test_scan_missing_shot_list_fails() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    cutlist_cmd()
        .arg("scan")
        .arg("--shots")
        .arg(dir.path().join("nope.csv"))
        .arg("--videos")
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(contains("[ERROR]"))
        .stderr(contains("does not exist"));
    Ok(())
}

#[test]
fn test_invalid_resolution_is_rejected() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let (shots, videos) = project(dir.path());
    cutlist_cmd()
        .arg("generate")
        .arg("--shots")
        .arg(&shots)
        .arg("--videos")
        .arg(&videos)
        .args(["--resolution", "0x720"])
        .assert()
        .failure()
        .stderr(contains("resolution"));
    Ok(())
}

#[test]
fn test_scan_json_and_gap_errors() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let (shots, videos) = project(dir.path());

    cutlist_cmd()
        .arg("scan")
        .arg("--shots")
        .arg(&shots)
        .env("CUTLIST_VIDEO_DIR", &videos)
        .args(["--json", "--gap-errors"])
        .assert()
        .success()
        .stdout(contains("\"type\":\"scan_started\""))
        .stdout(contains("\"status\":\"file_not_found\""))
        .stdout(contains("\"status\":\"probe_error\""))
        .stdout(contains("\"converted\":[1,2]"));

    let stored = fs::read_to_string(&shots)?;
    assert!(stored.starts_with(
        "\u{feff}filename,range,type,codec,framerate,color_profile,duration_frames,status"
    ));
    let statuses: Vec<&str> = stored
        .lines()
        .skip(1)
        .filter_map(|line| line.rsplit(',').next())
        .collect();
    assert_eq!(statuses, vec!["gap", "gap"]);
    Ok(())
}

#[test]
fn test_fix_gap_touches_one_row() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let (shots, videos) = project(dir.path());

    cutlist_cmd()
        .arg("scan")
        .arg("--shots")
        .arg(&shots)
        .arg("--videos")
        .arg(&videos)
        .assert()
        .success()
        .stdout(contains("File not found"))
        .stdout(contains("ROWS NEEDING ATTENTION"));

    cutlist_cmd()
        .arg("fix")
        .arg("--shots")
        .arg(&shots)
        .arg("--videos")
        .arg(&videos)
        .args(["--row", "1", "--gap"])
        .assert()
        .success()
        .stdout(contains("Saved to"));

    let stored = fs::read_to_string(&shots)?;
    let lines: Vec<&str> = stored.lines().collect();
    assert!(lines[1].starts_with("missing.mov,") && lines[1].ends_with(",gap"));
    assert!(lines[2].starts_with("present.mov,") && lines[2].contains("FFProbe Error"));

    cutlist_cmd()
        .arg("fix")
        .arg("--shots")
        .arg(&shots)
        .arg("--videos")
        .arg(&videos)
        .args(["--row", "9", "--gap"])
        .assert()
        .failure()
        .stderr(contains("Row 9 does not exist"));
    Ok(())
}

#[test]
fn test_fix_copies_missing_file() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let (shots, videos) = project(dir.path());
    let elsewhere = dir.path().join("card");
    fs::create_dir_all(&elsewhere)?;
    fs::write(elsewhere.join("missing.mov"), vec![7u8; 10_000])?;
    fs::write(elsewhere.join("wrong.mov"), b"x")?;

    cutlist_cmd()
        .arg("scan")
        .arg("--shots")
        .arg(&shots)
        .arg("--videos")
        .arg(&videos)
        .assert()
        .success();

    cutlist_cmd()
        .arg("fix")
        .arg("--shots")
        .arg(&shots)
        .arg("--videos")
        .arg(&videos)
        .args(["--row", "1", "--copy-from"])
        .arg(elsewhere.join("wrong.mov"))
        .assert()
        .failure()
        .stderr(contains("does not match"));

    cutlist_cmd()
        .arg("fix")
        .arg("--shots")
        .arg(&shots)
        .arg("--videos")
        .arg(&videos)
        .args(["--row", "1", "--copy-from"])
        .arg(elsewhere.join("missing.mov"))
        .assert()
        .success();

    assert_eq!(fs::read(videos.join("missing.mov"))?.len(), 10_000);
    let stored = fs::read_to_string(&shots)?;
    let first_row = stored.lines().nth(1).unwrap_or_default();
    assert!(!first_row.contains("File not found"));
    Ok(())
}

#[test]
fn test_fix_copy_leaves_present_media_alone() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let (shots, videos) = project(dir.path());

    cutlist_cmd()
        .arg("scan")
        .arg("--shots")
        .arg(&shots)
        .arg("--videos")
        .arg(&videos)
        .assert()
        .success();

    cutlist_cmd()
        .arg("fix")
        .arg("--shots")
        .arg(&shots)
        .arg("--videos")
        .arg(&videos)
        .args(["--row", "2", "--copy-from"])
        .arg(videos.join("present.mov"))
        .assert()
        .failure()
        .stderr(contains("Row 2:"))
        .stderr(contains("only rows whose file is missing"));

    assert_eq!(fs::read(videos.join("present.mov"))?, b"not really a movie");
    Ok(())
}

#[test]
fn test_generate_writes_document() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let (shots, videos) = project(dir.path());
    let output = dir.path().join("out").join("cut.xml");
    fs::create_dir_all(output.parent().unwrap())?;

    cutlist_cmd()
        .arg("scan")
        .arg("--shots")
        .arg(&shots)
        .arg("--videos")
        .arg(&videos)
        .arg("--gap-errors")
        .assert()
        .success();

    cutlist_cmd()
        .arg("generate")
        .arg("--shots")
        .arg(&shots)
        .arg("--videos")
        .arg(&videos)
        .arg("--output")
        .arg(&output)
        .args(["--name", "Promo Cut", "--timeline-fps", "25"])
        .assert()
        .success()
        .stdout(contains("Timeline written"));

    let xml = fs::read_to_string(&output)?;
    assert!(xml.contains("<xmeml version=\"4\">"));
    assert!(xml.contains("<name>Promo Cut</name>"));
    Ok(())
}

#[test]
fn test_log_dir_creates_log_file() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let (shots, videos) = project(dir.path());
    let logs = dir.path().join("logs");

    cutlist_cmd()
        .arg("--log-dir")
        .arg(&logs)
        .arg("scan")
        .arg("--shots")
        .arg(&shots)
        .arg("--videos")
        .arg(&videos)
        .assert()
        .success();

    let names: Vec<String> = fs::read_dir(&logs)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("cutlist_scan_") && names[0].ends_with(".log"));
    Ok(())
}
