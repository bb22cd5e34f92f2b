//! SyncEngine against a real templates directory

use pretty_assertions::assert_eq;
use serde_json::json;
use tsync_core::{CheckStatus, ChangeKind, SyncConfiguration, SyncEngine, SyncSettings};
use tsync_fs::NormalizedPath;
use tsync_test_utils::{TemplatesDir, fixtures};

fn engine(dir: &TemplatesDir, languages: &[&str]) -> SyncEngine {
    let settings = SyncSettings {
        languages: Some(languages.iter().map(|l| l.to_string()).collect()),
        ..SyncSettings::default()
    };
    SyncEngine::new(NormalizedPath::new(dir.root()), settings)
}

#[test]
fn sync_updates_and_creates_language_files() {
    let dir = TemplatesDir::new();
    dir.write_master(&fixtures::master());
    dir.write_language("zh", &fixtures::derived_zh());

    let report = engine(&dir, &["zh", "ja"])
        .sync(&SyncConfiguration::default())
        .unwrap();

    assert!(report.success());
    assert_eq!(report.summary.files_processed, 2);
    assert_eq!(report.summary.templates_added, 2 + 3);
    assert_eq!(report.summary.templates_removed, 1);

    let zh = dir.read_json("index.zh.json");
    assert_eq!(zh[0]["title"], "图像");
    assert_eq!(zh[0]["templates"][0]["title"], "猫咪生成器");
    assert_eq!(zh[0]["templates"][0]["size"], 1.5);
    assert_eq!(zh[0]["templates"][0]["tags"], json!(["image"]));
    assert_eq!(zh[1]["title"], "Video");

    assert_eq!(dir.read_json("index.ja.json"), fixtures::master());

    let ja = &report.languages[1];
    assert!(ja.created);
    assert!(ja.written);
    assert!(ja.backup.is_none());
}

#[test]
fn written_files_use_compact_arrays_without_trailing_newline() {
    let dir = TemplatesDir::new();
    dir.write_master(&fixtures::master());

    engine(&dir, &["ja"])
        .sync(&SyncConfiguration::default())
        .unwrap();

    let text = dir.read_text("index.ja.json");
    assert!(text.contains("\"tags\": [\"image\", \"upscale\"],"));
    assert!(text.ends_with(']'));
}

#[test]
fn dry_run_reports_without_touching_disk() {
    let dir = TemplatesDir::new();
    dir.write_master(&fixtures::master());
    dir.write_language("zh", &fixtures::derived_zh());
    let before = dir.read_text("index.zh.json");

    let engine = engine(&dir, &["zh", "ja"]);
    let dry = engine
        .sync(&SyncConfiguration {
            dry_run: true,
            ..SyncConfiguration::default()
        })
        .unwrap();

    assert!(dry.dry_run);
    assert_eq!(dir.read_text("index.zh.json"), before);
    dir.assert_file_not_exists("index.ja.json");
    dir.assert_file_not_exists(".tsync");
    assert!(dry.languages.iter().all(|l| l.needs_write && !l.written));

    let real = engine.sync(&SyncConfiguration::default()).unwrap();
    assert_eq!(dry.summary, real.summary);
    assert_eq!(dry.languages[0].changes, real.languages[0].changes);
}

#[test]
fn existing_files_are_backed_up_once_before_writing() {
    let dir = TemplatesDir::new();
    dir.write_master(&fixtures::master());
    dir.write_language("zh", &fixtures::derived_zh());
    let original = dir.read_text("index.zh.json");

    let engine = engine(&dir, &["zh", "ja"]);
    let report = engine.sync(&SyncConfiguration::default()).unwrap();

    let zh = &report.languages[0];
    let backup = zh.backup.as_deref().unwrap();
    assert_eq!(std::fs::read_to_string(backup).unwrap(), original);
    assert!(report.languages[1].backup.is_none());

    let backups = engine.backups().unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(backups[0].metadata.files.len(), 1);
    assert_eq!(backups[0].metadata.files[0].file, "index.zh.json");
}

#[test]
fn unchanged_files_are_neither_written_nor_backed_up() {
    let dir = TemplatesDir::new();
    dir.write_master(&fixtures::master());
    let engine = engine(&dir, &["ja"]);
    engine.sync(&SyncConfiguration::default()).unwrap();

    let second = engine.sync(&SyncConfiguration::default()).unwrap();

    assert!(!second.languages[0].needs_write);
    assert!(!second.languages[0].written);
    assert!(!second.summary.has_changes());
    assert!(engine.backups().unwrap().is_empty());
}

#[test]
fn restore_brings_back_the_pre_sync_file() {
    let dir = TemplatesDir::new();
    dir.write_master(&fixtures::master());
    dir.write_language("zh", &fixtures::derived_zh());
    let original = dir.read_text("index.zh.json");

    let engine = engine(&dir, &["zh"]);
    engine.sync(&SyncConfiguration::default()).unwrap();
    assert_ne!(dir.read_text("index.zh.json"), original);

    engine.restore("zh").unwrap();
    assert_eq!(dir.read_text("index.zh.json"), original);
}

#[test]
fn backups_can_be_disabled() {
    let dir = TemplatesDir::new();
    dir.write_master(&fixtures::master());
    dir.write_language("zh", &fixtures::derived_zh());

    let settings = SyncSettings {
        languages: Some(vec!["zh".into()]),
        backup: false,
        ..SyncSettings::default()
    };
    let engine = SyncEngine::new(NormalizedPath::new(dir.root()), settings);
    let report = engine.sync(&SyncConfiguration::default()).unwrap();

    assert!(report.languages[0].written);
    assert!(report.languages[0].backup.is_none());
    dir.assert_file_not_exists(".tsync");
}

#[test]
fn settings_file_drives_language_discovery() {
    let dir = TemplatesDir::new();
    dir.write_master(&fixtures::master());
    dir.write_language("de", &json!([]));
    dir.write_language("pt-BR", &json!([]));
    dir.write_file("index.schema.json", "{}");
    dir.write_file("tsync.toml", "discover = true\nbackup = false\n");

    let engine = SyncEngine::open(NormalizedPath::new(dir.root())).unwrap();
    let codes: Vec<String> = engine.languages().unwrap().into_iter().map(|f| f.code).collect();
    assert_eq!(codes, vec!["de", "pt-BR"]);

    let report = engine.sync(&SyncConfiguration::default()).unwrap();
    assert_eq!(report.summary.files_processed, 2);
    dir.assert_file_not_exists("index.zh.json");
}

#[test]
fn check_reports_drift_missing_and_in_sync() {
    let dir = TemplatesDir::new();
    dir.write_master(&fixtures::master());
    dir.write_language("zh", &fixtures::derived_zh());
    let engine = engine(&dir, &["zh", "ja"]);

    let report = engine.check().unwrap();
    assert_eq!(report.status, CheckStatus::Drifted);
    assert!(report.messages.iter().any(|m| m.contains("index.ja.json")));
    assert!(report.drift.iter().all(|d| d.language == "zh"));
    assert!(
        report
            .drift
            .iter()
            .any(|d| d.kind == ChangeKind::RemovedEntity && d.template.as_deref() == Some("legacy_tool"))
    );

    engine.sync(&SyncConfiguration::default()).unwrap();
    let report = engine.check().unwrap();
    assert_eq!(report.status, CheckStatus::InSync, "{:?}", report);
}

#[test]
fn check_flags_formatting_only_differences() {
    let dir = TemplatesDir::new();
    dir.write_master(&fixtures::master());
    // Pretty-printed by serde_json: same content, multi-line arrays
    dir.write_language("ja", &fixtures::master());

    let report = engine(&dir, &["ja"]).check().unwrap();

    assert_eq!(report.status, CheckStatus::Drifted);
    assert!(report.drift.is_empty());
    assert!(report.messages[0].contains("formatting"));
}

#[test]
fn check_reports_broken_files() {
    let dir = TemplatesDir::new();
    dir.write_master(&fixtures::master());
    dir.write_file("index.ja.json", "{\"not\": \"a list\"}");

    let report = engine(&dir, &["ja"]).check().unwrap();
    assert_eq!(report.status, CheckStatus::Broken);

    let empty = TemplatesDir::new();
    let report = engine(&empty, &["ja"]).check().unwrap();
    assert_eq!(report.status, CheckStatus::Broken);
    assert!(report.messages[0].starts_with("master:"));
}

#[test]
fn diff_shows_pending_changes_only() {
    let dir = TemplatesDir::new();
    dir.write_master(&fixtures::master());
    dir.write_language("zh", &fixtures::derived_zh());
    let engine = engine(&dir, &["zh"]);

    let diffs = engine.diff(&SyncConfiguration::default()).unwrap();
    assert_eq!(diffs.len(), 1);
    assert!(diffs[0].unified.contains("-        \"name\": \"legacy_tool\","));
    assert!(diffs[0].unified.contains("+        \"size\": 1.5"));

    engine.sync(&SyncConfiguration::default()).unwrap();
    let diffs = engine.diff(&SyncConfiguration::default()).unwrap();
    assert!(diffs[0].is_empty());
}
