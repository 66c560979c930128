use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn securepass(data_dir: &Path, passphrase: &str) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("securepass").unwrap();
    cmd.arg("--data-dir")
        .arg(data_dir)
        .env("SECUREPASS_PASSPHRASE", passphrase)
        .env_remove("SECUREPASS_PASSPHRASE_CONFIRM")
        .env_remove("SECUREPASS_DATA_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn add(data_dir: &Path, title: &str, username: &str, category: &str, password: &str) {
    securepass(data_dir, "master")
        .args(["add", title, username, "--category", category, "--password-stdin"])
        .write_stdin(format!("{password}\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Added entry"));
}

#[test]
fn generate_does_not_touch_the_vault() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    let out = securepass(&vault, "master")
        .args(["generate", "--length", "20", "--no-special"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let password = String::from_utf8(out).unwrap();
    let password = password.trim_end();
    assert_eq!(password.chars().count(), 20);
    assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    assert!(!vault.join("master.pwd").exists());
}

#[test]
fn generate_rejects_out_of_range_length() {
    let dir = tempdir().unwrap();
    securepass(dir.path(), "master")
        .args(["generate", "--length", "0"])
        .assert()
        .failure();
}

#[test]
fn first_run_creates_artifact_and_entries_round_trip() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    add(&vault, "Steam", "gamer123", "Games", "s3cret!");

    assert_eq!(fs::read(vault.join("master.pwd")).unwrap().len(), 32);

    securepass(&vault, "master")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Steam").and(predicate::str::contains("Loaded: 1 records")));

    securepass(&vault, "master")
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Password: s3cret!"));
}

#[test]
fn wrong_passphrase_is_rejected() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    add(&vault, "Mail", "me", "Email", "hunter22");

    securepass(&vault, "not-master")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("incorrect master password"));
}

#[test]
fn mismatched_confirmation_aborts_first_run() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    securepass(&vault, "master")
        .env("SECUREPASS_PASSPHRASE_CONFIRM", "masterr")
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("mismatch"));
    assert!(!vault.join("master.pwd").exists());
}

#[test]
fn too_short_entry_password_is_refused() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    securepass(&vault, "master")
        .args(["add", "Site", "user", "--password-stdin"])
        .write_stdin("abc\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid entry"));
}

#[test]
fn edit_keeps_password_and_missing_id_fails() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    add(&vault, "Yandex", "ivan", "Email", "pass1234");

    securepass(&vault, "master")
        .args(["edit", "1", "--title", "Yandex Mail"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated: Yandex Mail"));

    securepass(&vault, "master")
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Title: Yandex Mail").and(predicate::str::contains("Password: pass1234")));

    securepass(&vault, "master")
        .args(["edit", "99", "--title", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no entry with id 99"));
}

#[test]
fn search_and_category_filters() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    add(&vault, "Steam", "gamer123", "Games", "aaaa1");
    add(&vault, "Yandex", "ivan", "Email", "bbbb2");
    add(&vault, "Gmail", "steamfan", "Email", "cccc3");

    securepass(&vault, "master")
        .args(["list", "--search", "STEAM"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded: 2 records"));

    securepass(&vault, "master")
        .args(["list", "--category", "Email", "--search", "steam"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gmail").and(predicate::str::contains("Loaded: 1 records")));

    securepass(&vault, "master")
        .arg("categories")
        .assert()
        .success()
        .stdout("Email\nGames\n");

    securepass(&vault, "master")
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries: 3").and(predicate::str::contains("Categories: 2")));
}

#[test]
fn export_writes_plaintext_csv() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    add(&vault, "Steam", "gamer123", "Games", "pa;ss\"word");
    let out = dir.path().join("out.csv");

    securepass(&vault, "master")
        .arg("export")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 entries"));

    let csv = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Title;Username;Password;Category;CreatedDate");
    assert!(lines[1].starts_with("\"Steam\";\"gamer123\";\"pa;ss\"\"word\";\"Games\";\""));
}

#[test]
fn delete_with_yes_is_idempotent() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    add(&vault, "Temp", "user", "", "temp1234");

    securepass(&vault, "master")
        .args(["delete", "1", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted: Temp"));

    securepass(&vault, "master")
        .args(["delete", "1", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing deleted"));

    securepass(&vault, "master")
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries: 0"));
}

#[test]
fn delete_declined_keeps_entry() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    add(&vault, "Keep", "user", "", "keep1234");

    securepass(&vault, "master")
        .args(["delete", "1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));

    securepass(&vault, "master")
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries: 1"));
}

#[test]
fn repair_reports_examined_entries() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    add(&vault, "Steam", "gamer123", "Games", "aaaa1");
    add(&vault, "Yandex", "ivan", "Email", "bbbb2");

    securepass(&vault, "master")
        .arg("repair")
        .assert()
        .success()
        .stdout(predicate::str::contains("Examined 2 entries, repaired 0"));
}

#[test]
fn settings_file_drives_generator_and_default_category() {
    let dir = tempdir().unwrap();
    let vault = dir.path().join("vault");
    fs::create_dir_all(&vault).unwrap();
    fs::write(
        vault.join("settings.json"),
        br#"{"default_category":"Work","generator":{"length":24,"special":false}}"#,
    )
    .unwrap();

    let out = securepass(&vault, "master")
        .arg("generate")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let password = String::from_utf8(out).unwrap();
    let password = password.trim_end();
    assert_eq!(password.chars().count(), 24);
    assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));

    securepass(&vault, "master")
        .args(["add", "Jira", "dev", "--password-stdin"])
        .write_stdin("jira1234\n")
        .assert()
        .success();

    securepass(&vault, "master")
        .arg("categories")
        .assert()
        .success()
        .stdout("Work\n");
}
