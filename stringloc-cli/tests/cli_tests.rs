use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn stringloc_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("stringloc"))
}

const SOURCE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="app_name" translatable="false">Acme</string>
    <string name="title">Welcome</string>
    <string name="greeting">Hello %1$s</string>
    <string name="alias">@string/title</string>
    <plurals name="files">
        <item quantity="one">One file</item>
        <item quantity="other">%d files</item>
    </plurals>
</resources>
"#;

const FRENCH: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="title">Bienvenue</string>
    <string name="greeting">Bonjour %1$s</string>
    <string name="alias">@string/title</string>
    <plurals name="files">
        <item quantity="one">Un fichier</item>
        <item quantity="other">%d fichiers</item>
    </plurals>
</resources>
"#;

/// `res/values/strings.xml` plus one `res/values-<suffix>/strings.xml` per locale.
fn project(locales: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let res = dir.path().join("res");
    fs::create_dir_all(res.join("values")).expect("values dir");
    let input = res.join("values").join("strings.xml");
    fs::write(&input, SOURCE).expect("source file");
    for (suffix, content) in locales {
        let folder = res.join(format!("values-{}", suffix));
        fs::create_dir_all(&folder).expect("locale dir");
        fs::write(folder.join("strings.xml"), content).expect("locale file");
    }
    (dir, input)
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[test]
fn test_missing_input_is_usage_error() {
    let output = stringloc_cmd()
        .args(["validate", "-i", "does/not/exist/strings.xml"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("doesn't exist"), "stderr: {}", stderr);
    assert!(stderr.contains("Usage"), "help should be printed: {}", stderr);
}

#[test]
fn test_directory_input_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let output = stringloc_cmd()
        .args(["translate", "-i", &path_arg(dir.path())])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("is a directory"));
}

#[test]
fn test_no_locales_is_usage_error() {
    let (_dir, input) = project(&[]);
    let output = stringloc_cmd()
        .args(["validate", "-i", &path_arg(&input)])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Couldn't find any locale"));
}

#[test]
fn test_invalid_locale_list_is_usage_error() {
    let (_dir, input) = project(&[]);
    let output = stringloc_cmd()
        .args(["validate", "-i", &path_arg(&input), "-l", "fr,v21"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_validate_clean_locale() {
    let (_dir, input) = project(&[("fr", FRENCH), ("night", "<resources/>")]);
    let output = stringloc_cmd()
        .args(["validate", "-i", &path_arg(&input)])
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("in 1 locales: 0 issues"), "stdout: {}", stdout);
}

#[test]
fn test_validate_findings_do_not_fail_the_run() {
    let german = FRENCH
        .replace("Bienvenue", "Willkommen &amp; mehr")
        .replace("Bonjour %1$s", "Hallo");
    let (_dir, input) = project(&[("de", &german)]);
    let output = stringloc_cmd()
        .args(["validate", "-i", &path_arg(&input)])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[de] greeting: missing placeholders %1$s"));
    assert!(stdout.contains("[de] title: Warning characters &"));
    assert!(stdout.contains("[de] title: Wrong xml escaping"));
    assert!(stdout.contains("3 issues"));
}

#[test]
fn test_validate_missing_target_fails_only_that_locale() {
    let (dir, input) = project(&[("fr", FRENCH)]);
    let output = stringloc_cmd()
        .args([
            "validate",
            "-i",
            &path_arg(&input),
            "-o",
            &path_arg(&dir.path().join("res")),
            "-l",
            "fr,es",
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[es] target file not found"), "stderr: {}", stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("in 1 locales: 0 issues, 1 locales failed"));
}

#[test]
fn test_validate_writes_json_report() {
    let german = FRENCH.replace("Bonjour %1$s", "Hallo");
    let (dir, input) = project(&[("de", &german)]);
    let report = dir.path().join("report.json");
    let output = stringloc_cmd()
        .args([
            "validate",
            "-i",
            &path_arg(&input),
            "--report-json",
            &path_arg(&report),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    let leaves = json["reports"][0]["leaves"].as_array().unwrap();
    let greeting = leaves
        .iter()
        .find(|leaf| leaf["key"]["name"] == "greeting")
        .unwrap();
    assert_eq!(greeting["issues"][0]["issue"], "missing_placeholders");
    assert_eq!(greeting["issues"][0]["missing"][0], "%1$s");
    assert_eq!(json["failed"].as_array().unwrap().len(), 0);
}

#[test]
fn test_translate_with_complete_locale_reuses_everything() {
    let (dir, input) = project(&[("fr", FRENCH)]);
    let target = dir.path().join("res").join("values-fr").join("strings.xml");

    let output = stringloc_cmd()
        .args(["translate", "-i", &path_arg(&input), "-p", "2"])
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "Command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[fr] title: reused"));
    assert!(stdout.contains("[fr] app_name: dropped (not translatable)"));
    assert!(stdout.contains(
        "[fr] 0 translated, 4 reused, 1 references, 1 not translatable, 0 failed"
    ));
    assert_eq!(fs::read_to_string(target).unwrap(), FRENCH);
}

#[test]
fn test_translate_reads_options_from_config_file() {
    let (dir, input) = project(&[("fr", FRENCH)]);
    let config = dir.path().join("stringloc.toml");
    fs::write(&config, "workers = 1\nlocales = [\"fr\"]\n").unwrap();

    let output = stringloc_cmd()
        .args([
            "translate",
            "-i",
            &path_arg(&input),
            "--config",
            &path_arg(&config),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("[fr] 0 translated, 4 reused"));
}
