use indoc::indoc;
use std::fs;
use std::path::{Path, PathBuf};
use stringloc::locale::{default_output_root, discover_locales};
use stringloc::runner::{locale_file, run_locales, translate_file, validate_file};
use stringloc::{Error, Locale, Outcome, RunConfig, TranslateError, ValidationIssue};
use tempfile::TempDir;

const SOURCE: &str = indoc! {r#"
    <?xml version="1.0" encoding="utf-8"?>
    <resources xmlns:tools="http://schemas.android.com/tools">
        <!-- Main screen -->
        <string name="app_name" translatable="false">Acme</string>
        <string name="title">Welcome</string>
        <string name="greeting">Hello %1$s, you have %2$d messages</string>
        <string name="alias">@string/title</string>
        <string-array name="sizes">
            <item>Small</item>
            <item>Large</item>
        </string-array>
        <plurals name="files">
            <item quantity="one">One file</item>
            <item quantity="other">%d files</item>
        </plurals>
    </resources>
"#};

fn project() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let values = dir.path().join("res").join("values");
    fs::create_dir_all(&values).expect("values dir");
    let source = values.join("strings.xml");
    fs::write(&source, SOURCE).expect("source file");
    (dir, source)
}

fn upper(segment: &str, _: &str, _: &str) -> Result<String, TranslateError> {
    Ok(segment.to_uppercase())
}

fn seed_locale(root: &Path, suffix: &str) {
    let folder = root.join(format!("values-{}", suffix));
    fs::create_dir_all(&folder).expect("locale dir");
    fs::write(folder.join("strings.xml"), "<resources/>").expect("seed file");
}

#[test]
fn test_translate_discovered_locales_in_parallel() {
    let (_dir, source) = project();
    let root = default_output_root(&source);
    for suffix in ["fr", "de", "night"] {
        seed_locale(&root, suffix);
    }

    let locales = discover_locales(&root, "strings.xml").unwrap();
    let suffixes: Vec<&str> = locales.iter().map(|l| l.suffix()).collect();
    assert_eq!(suffixes, vec!["de", "fr"]);

    let config = RunConfig::default();
    let runs = run_locales(&locales, config.workers, |locale| {
        translate_file(&source, &root, locale, &config, &upper)
    })
    .unwrap();

    for run in &runs {
        let report = run.result.as_ref().unwrap();
        assert_eq!(report.translated(), 6);
        assert_eq!(report.references(), 1);
        assert_eq!(report.not_translatable(), 1);

        let path = locale_file(&source, &root, &run.locale).unwrap();
        let written = fs::read_to_string(path).unwrap();
        assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(written.contains("xmlns:tools"));
        assert!(written.contains("<!-- Main screen -->"));
        assert!(written.contains("<string name=\"title\">WELCOME</string>"));
        assert!(written.contains("<item quantity=\"other\">%D FILES</item>"));
        assert!(!written.contains("app_name"));
    }

    let night = fs::read_to_string(root.join("values-night").join("strings.xml")).unwrap();
    assert_eq!(night, "<resources/>");
}

#[test]
fn test_rerun_keeps_existing_translations() {
    let (_dir, source) = project();
    let root = default_output_root(&source);
    let locale: Locale = "fr".parse().unwrap();
    let config = RunConfig::default();

    translate_file(&source, &root, &locale, &config, &upper).unwrap();
    let first = fs::read_to_string(locale_file(&source, &root, &locale).unwrap()).unwrap();

    let never = |_: &str, _: &str, _: &str| -> Result<String, TranslateError> {
        Err(TranslateError::Backend("offline".to_string()))
    };
    let report = translate_file(&source, &root, &locale, &config, &never).unwrap();
    let second = fs::read_to_string(locale_file(&source, &root, &locale).unwrap()).unwrap();

    assert_eq!(first, second);
    assert_eq!(report.failed(), 0);
    assert!(
        report
            .outcomes
            .iter()
            .all(|o| o.outcome != Outcome::Translated)
    );
}

#[test]
fn test_force_retranslates_and_soft_failures_drop_leaves() {
    let (_dir, source) = project();
    let root = default_output_root(&source);
    let locale: Locale = "de".parse().unwrap();

    translate_file(&source, &root, &locale, &RunConfig::default(), &upper).unwrap();

    let forced = RunConfig {
        force: true,
        ..RunConfig::default()
    };
    let picky = |segment: &str, _: &str, _: &str| -> Result<String, TranslateError> {
        if segment == "Welcome" {
            Err(TranslateError::Status(429))
        } else {
            Ok(format!("de {}", segment))
        }
    };
    let report = translate_file(&source, &root, &locale, &forced, &picky).unwrap();
    assert_eq!(report.failed(), 1);
    assert_eq!(report.translated(), 5);

    let written = fs::read_to_string(locale_file(&source, &root, &locale).unwrap()).unwrap();
    assert!(!written.contains("name=\"title\""));
    assert!(written.contains("de Small"));
}

#[test]
fn test_validate_reports_issues_per_locale() {
    let (_dir, source) = project();
    let root = default_output_root(&source);
    let locale: Locale = "it".parse().unwrap();
    let folder = root.join("values-it");
    fs::create_dir_all(&folder).unwrap();
    fs::write(
        folder.join("strings.xml"),
        indoc! {r#"
            <resources>
                <string name="title">Benvenuto...</string>
                <string name="greeting">Ciao %1$s</string>
                <string-array name="sizes">
                    <item>Piccolo</item>
                    <item/>
                </string-array>
                <plurals name="files">
                    <item quantity="one">Un file</item>
                    <item quantity="other">%d file</item>
                </plurals>
            </resources>
        "#},
    )
    .unwrap();

    let report = validate_file(&source, &root, &locale, &RunConfig::default()).unwrap();
    let issues: Vec<&ValidationIssue> = report.issues().collect();
    assert_eq!(issues.len(), 3);
    assert!(matches!(issues[0], ValidationIssue::WarningCharacters { .. }));
    assert!(matches!(issues[1], ValidationIssue::MissingPlaceholders { .. }));
    assert!(matches!(issues[2], ValidationIssue::EmptyTranslation { .. }));
    assert_eq!(issues[2].key().to_string(), "sizes[1]");
}

#[test]
fn test_validate_fatal_errors_stay_per_locale() {
    let (_dir, source) = project();
    let root = default_output_root(&source);
    let folder = root.join("values-es");
    fs::create_dir_all(&folder).unwrap();
    fs::write(folder.join("strings.xml"), "<resources/>").unwrap();

    let locales: Vec<Locale> = vec!["es".parse().unwrap(), "ja".parse().unwrap()];
    let config = RunConfig::default();
    let runs = run_locales(&locales, 2, |locale| {
        validate_file(&source, &root, locale, &config)
    })
    .unwrap();

    assert!(matches!(
        runs[0].result,
        Err(Error::MissingTranslation { .. })
    ));
    assert!(matches!(runs[1].result, Err(Error::MissingTargetFile(_))));
}
