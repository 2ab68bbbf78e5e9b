use super::{FileSettings, Settings, SettingsSource};

fn write_settings(dir: &std::path::Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("settings.json");
    std::fs::write(&path, contents.as_bytes()).expect("write settings");
    path
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let source = FileSettings::new(dir.path().join("absent.json"));
    let settings = source.snapshot().expect("snapshot");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.default_template, "default");
    assert_eq!(settings.preview_sets, 1);
    assert!(!settings.auto_validate);
    assert!(!settings.auto_preview);
}

#[test]
fn partial_file_keeps_defaults_for_omitted_keys() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_settings(dir.path(), r#"{ "autoValidate": true, "previewSets": 2 }"#);
    let settings = FileSettings::new(path).snapshot().expect("snapshot");
    assert!(settings.auto_validate);
    assert!(!settings.auto_preview);
    assert_eq!(settings.preview_sets, 2);
    assert_eq!(settings.default_template, "default");
}

#[test]
fn snapshot_reflects_edits_between_reads() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_settings(dir.path(), r#"{ "autoPreview": false }"#);
    let source = FileSettings::new(path.clone());
    assert!(!source.snapshot().expect("first snapshot").auto_preview);

    write_settings(dir.path(), r#"{ "autoPreview": true, "defaultTemplate": "compact" }"#);
    let settings = source.snapshot().expect("second snapshot");
    assert!(settings.auto_preview);
    assert_eq!(settings.default_template, "compact");
}

#[test]
fn rejects_unknown_keys_and_out_of_range_values() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_settings(dir.path(), r#"{ "autoValidat": true }"#);
    assert!(FileSettings::new(path).snapshot().is_err());

    let path = write_settings(dir.path(), r#"{ "previewSets": 0 }"#);
    let err = FileSettings::new(path).snapshot().expect_err("zero sets");
    assert!(err.to_string().contains("previewSets"));

    let path = write_settings(dir.path(), r#"{ "defaultTemplate": "  " }"#);
    assert!(FileSettings::new(path).snapshot().is_err());
}

#[test]
fn explicit_path_wins_resolution() {
    let explicit = std::path::Path::new("/tmp/custom-setwise.json");
    let source = FileSettings::resolve(Some(explicit)).expect("resolve");
    assert_eq!(source.path(), explicit);
}
