//! Integration tests for loading and validating compat data on disk.

use std::fs;
use std::path::{Path, PathBuf};

use compat_core::category::Category;
use compat_core::issue::IssueKind;
use compat_test_utils::fixtures::{example_registry, example_registry_json, feature_document};
use compat_tools::{
    collect_data_files, load_feature_file, load_registry, validate_data_directory, validate_file,
    validate_files, LintConfig, LintContext, LoadError, Style,
};
use serde_json::{json, Value};
use tempfile::TempDir;

fn write_json(path: &Path, value: &Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// Data root with a split registry, one clean file and two files with problems.
///
/// ```text
/// browsers/desktop.json   chrome, firefox
/// browsers/other.json     chrome_android, deno
/// api/Clean.json          chrome, firefox, deno
/// api/Foo.json            chrome (firefox missing)
/// css/properties/bar.json chrome, firefox, deno (deno invalid)
/// notes.txt
/// ```
fn data_root() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    let registry = example_registry_json();
    let browsers = &registry["browsers"];
    write_json(
        &root.join("browsers/desktop.json"),
        &json!({ "browsers": { "chrome": browsers["chrome"], "firefox": browsers["firefox"] } }),
    );
    write_json(
        &root.join("browsers/other.json"),
        &json!({ "browsers": { "chrome_android": browsers["chrome_android"], "deno": browsers["deno"] } }),
    );

    write_json(
        &root.join("api/Clean.json"),
        &feature_document("api", "Clean", &["chrome", "firefox", "deno"]),
    );
    write_json(&root.join("api/Foo.json"), &feature_document("api", "Foo", &["chrome"]));
    write_json(
        &root.join("css/properties/bar.json"),
        &feature_document("css", "bar", &["chrome", "firefox", "deno"]),
    );
    fs::write(root.join("notes.txt"), "not data").unwrap();

    dir
}

fn file_names(files: &[PathBuf], root: &Path) -> Vec<String> {
    files
        .iter()
        .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect()
}

#[test]
fn test_registry_directory_is_merged() {
    let dir = data_root();
    let registry = load_registry(&dir.path().join("browsers")).unwrap();
    assert_eq!(registry, example_registry());
}

#[test]
fn test_registry_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("browsers.json");
    write_json(&path, &example_registry_json());

    let registry = load_registry(&path).unwrap();
    assert_eq!(registry.len(), 4);
    assert!(registry.contains("deno"));
}

#[test]
fn test_registry_duplicate_across_files() {
    let dir = tempfile::tempdir().unwrap();
    let chrome = json!({ "browsers": { "chrome": { "type": "desktop" } } });
    write_json(&dir.path().join("a.json"), &chrome);
    write_json(&dir.path().join("b.json"), &chrome);

    let result = load_registry(dir.path());
    match result {
        Err(LoadError::RegistryError { path, .. }) => assert!(path.ends_with("b.json")),
        other => panic!("expected a registry conflict, got {other:?}"),
    }
}

#[test]
fn test_registry_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.json"), "{ \"browsers\": ").unwrap();

    let result = load_registry(dir.path());
    assert!(matches!(result, Err(LoadError::ParseError { .. })));
}

#[test]
fn test_collect_skips_registry_and_non_json() {
    let dir = data_root();
    let root = dir.path();

    let files = collect_data_files(&[root.to_path_buf()], Some(&root.join("browsers"))).unwrap();
    assert_eq!(
        file_names(&files, root),
        vec!["api/Clean.json", "api/Foo.json", "css/properties/bar.json"]
    );
}

#[test]
fn test_collect_dedups_overlapping_paths() {
    let dir = data_root();
    let root = dir.path();

    let paths = vec![root.join("api"), root.join("api/Foo.json")];
    let files = collect_data_files(&paths, None).unwrap();
    assert_eq!(file_names(&files, root), vec!["api/Clean.json", "api/Foo.json"]);
}

#[test]
fn test_collect_skips_hidden_and_tool_directories() {
    let dir = data_root();
    let root = dir.path();
    write_json(&root.join(".git/info.json"), &json!({ "x": 1 }));
    write_json(&root.join("node_modules/pkg/package.json"), &json!({ "name": "pkg" }));
    write_json(&root.join("target/report.json"), &json!({}));

    let files = collect_data_files(&[root.to_path_buf()], Some(&root.join("browsers"))).unwrap();
    assert_eq!(
        file_names(&files, root),
        vec!["api/Clean.json", "api/Foo.json", "css/properties/bar.json"]
    );
}

#[cfg(unix)]
#[test]
fn test_collect_does_not_follow_directory_symlinks() {
    let dir = data_root();
    let root = dir.path();
    std::os::unix::fs::symlink(root, root.join("api/loop")).unwrap();
    std::os::unix::fs::symlink(root.join("api/Foo.json"), root.join("api/Alias.json")).unwrap();

    let files = collect_data_files(&[root.join("api")], None).unwrap();
    assert_eq!(
        file_names(&files, root),
        vec!["api/Alias.json", "api/Clean.json", "api/Foo.json"]
    );
}

#[test]
fn test_load_feature_file_rejects_non_tree() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("package.json");
    fs::write(&path, r#"{ "name": "compat-data" }"#).unwrap();

    let result = load_feature_file(&path);
    match result {
        Err(LoadError::FeatureError { path: reported, .. }) => {
            assert!(reported.ends_with("package.json"));
        }
        other => panic!("expected a feature decode error, got {other:?}"),
    }
}

#[test]
fn test_validate_file_missing_required() {
    let dir = data_root();
    let ctx = LintContext::new(example_registry(), dir.path());

    let report = validate_file(&dir.path().join("api/Foo.json"), &ctx).unwrap();
    assert_eq!(report.category, Category::Api);
    assert!(!report.passed());

    let issues = report.logger.issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path, "api.Foo");
    assert_eq!(issues[0].kind, IssueKind::MissingRequired);
    assert_eq!(issues[0].browsers, vec!["firefox".to_string()]);
}

#[test]
fn test_validate_file_server_runtime_outside_api() {
    let dir = data_root();
    let ctx = LintContext::new(example_registry(), dir.path());

    let report = validate_file(&dir.path().join("css/properties/bar.json"), &ctx).unwrap();
    assert_eq!(report.category, Category::Other("css".to_string()));

    let issues = report.logger.issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::InvalidForCategory);
    assert_eq!(issues[0].browsers, vec!["deno".to_string()]);
}

#[test]
fn test_validate_files_keeps_input_order() {
    let dir = data_root();
    let root = dir.path();
    let ctx = LintContext::new(example_registry(), root);

    let files = vec![
        root.join("css/properties/bar.json"),
        root.join("api/Clean.json"),
        root.join("api/Foo.json"),
    ];
    let summary = validate_files(&files, &ctx, 2);

    let checked: Vec<_> = summary.reports.iter().map(|r| r.path.clone()).collect();
    assert_eq!(checked, files);
    assert!(summary.reports[1].passed());
    assert_eq!(summary.failing_files(), 2);
    assert_eq!(summary.issue_count(), 2);
    assert!(!summary.passed());
}

#[test]
fn test_unparseable_file_is_a_failure() {
    let dir = data_root();
    let root = dir.path();
    let broken = root.join("api/Broken.json");
    fs::write(&broken, "{ \"api\": { \"Broken\": 3 } }").unwrap();

    let ctx = LintContext::new(example_registry(), root);
    let summary = validate_files(&[broken.clone(), root.join("api/Clean.json")], &ctx, 0);

    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].path, broken);
    assert!(summary.failures[0].message.contains("Broken.json"));
    assert!(!summary.passed());
}

#[test]
fn test_clean_run_passes() {
    let dir = data_root();
    let root = dir.path();
    let ctx = LintContext::new(example_registry(), root);

    let summary = validate_files(&[root.join("api/Clean.json")], &ctx, 0);
    assert!(summary.passed());

    let mut out = Vec::new();
    summary.write_text(&mut out, Style::new(false)).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "✔ 1 files checked, no problems found\n"
    );
}

#[test]
fn test_text_report() {
    let dir = data_root();
    let root = dir.path();
    let ctx = LintContext::new(example_registry(), root);

    let summary = validate_files(&[root.join("api/Foo.json")], &ctx, 0);
    let mut out = Vec::new();
    summary.write_text(&mut out, Style::new(false)).unwrap();
    let text = String::from_utf8(out).unwrap();

    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("✖ ") && lines[0].ends_with("Foo.json"));
    assert_eq!(lines[1], "  Browsers – 1 problem:");
    assert_eq!(
        lines[2],
        "    api.Foo is missing the following browsers, which are required for api compat data: firefox"
    );
    assert_eq!(lines[3], "1 problems in 1 of 1 files, 0 files failed to load");
}

#[test]
fn test_json_report() {
    let dir = data_root();
    let root = dir.path();
    let ctx = LintContext::new(example_registry(), root);

    let summary = validate_files(&[root.join("css/properties/bar.json")], &ctx, 0);
    let mut out = Vec::new();
    summary.write_json(&mut out).unwrap();
    let value: Value = serde_json::from_slice(&out).unwrap();

    let report = &value["reports"][0];
    assert_eq!(report["category"], "css");
    assert_eq!(report["logger"]["title"], "Browsers");
    let issue = &report["logger"]["issues"][0];
    assert_eq!(issue["path"], "css.bar");
    assert_eq!(issue["kind"], "invalid_for_category");
    assert_eq!(issue["browsers"], json!(["deno"]));
    assert_eq!(value["failures"], json!([]));
}

#[test]
fn test_validate_data_directory() {
    let dir = data_root();
    let root = dir.path();

    let summary = validate_data_directory(root, &root.join("browsers")).unwrap();
    assert_eq!(summary.reports.len(), 3);
    assert!(summary.failures.is_empty());
    assert_eq!(summary.failing_files(), 2);
}

#[test]
fn test_config_file_drives_registry_location() {
    let dir = data_root();
    let root = dir.path();
    let config_path = root.join("compat-lint.ron");
    fs::write(
        &config_path,
        format!(
            "LintConfig(data_root: {:?}, registry: \"browsers\", jobs: 1, color: false)",
            root.display().to_string()
        ),
    )
    .unwrap();

    let config = LintConfig::load(&config_path).unwrap();
    assert_eq!(config.data_root, root);
    assert!(!config.color);

    let registry = load_registry(&config.registry_path()).unwrap();
    assert_eq!(registry, example_registry());
}
