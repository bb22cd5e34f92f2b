//! Reconciliation behavior on realistic documents

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tsync_core::{
    ChangeKind, ChangeRecord, Document, SyncConfiguration, accumulate, reconcile,
};
use tsync_test_utils::fixtures;

fn doc(value: Value) -> Document {
    Document::from_value(value).unwrap()
}

fn entity_value(document: &Document, id: &str) -> Value {
    let (_, entity) = document.find_entity(id).unwrap();
    Value::Object(entity.fields().clone())
}

fn records_for<'a>(changes: &'a [ChangeRecord], id: &str) -> Vec<(Option<&'a str>, ChangeKind)> {
    changes
        .iter()
        .filter(|c| c.entity.as_deref() == Some(id))
        .map(|c| (c.field.as_deref(), c.kind))
        .collect()
}

#[test]
fn cat_generator_example() {
    let master = doc(json!([{"moduleName": "default", "templates": [
        {"name": "cat_generator", "title": "Cat Generator", "size": 1.5, "tags": ["image"]}
    ]}]));
    let derived = doc(json!([{"moduleName": "default", "templates": [
        {"name": "cat_generator", "title": "猫咪生成器", "size": 1.2}
    ]}]));

    let result = reconcile(&master, &derived, &SyncConfiguration::default()).unwrap();

    assert_eq!(
        entity_value(&result.document, "cat_generator"),
        json!({"name": "cat_generator", "title": "猫咪生成器", "size": 1.5, "tags": ["image"]})
    );
    assert_eq!(
        records_for(&result.changes, "cat_generator"),
        vec![
            (Some("title"), ChangeKind::Preserved),
            (Some("size"), ChangeKind::AutoSynced),
            (Some("tags"), ChangeKind::Added),
        ]
    );
}

#[test]
fn legacy_tool_example() {
    let master = doc(json!([{"moduleName": "default", "templates": [{"name": "kept"}]}]));
    let derived = doc(json!([{"moduleName": "default", "templates": [
        {"name": "kept"}, {"name": "legacy_tool", "title": "旧"}
    ]}]));

    let result = reconcile(&master, &derived, &SyncConfiguration::default()).unwrap();

    assert!(result.document.find_entity("legacy_tool").is_none());
    assert_eq!(
        result.changes,
        vec![ChangeRecord::entity("default", "legacy_tool", ChangeKind::RemovedEntity)]
    );
    assert_eq!(accumulate(&result.changes).templates_removed, 1);
}

#[test]
fn reconciling_twice_changes_nothing() {
    let master = doc(fixtures::master());
    let derived = doc(fixtures::derived_zh());
    let config = SyncConfiguration::default();

    let first = reconcile(&master, &derived, &config).unwrap();
    let second = reconcile(&master, &first.document, &config).unwrap();

    assert_eq!(second.document, first.document);
    assert!(!second.has_changes());
    assert!(
        second
            .changes
            .iter()
            .all(|c| c.kind == ChangeKind::Preserved)
    );
}

#[test]
fn output_follows_master_order() {
    let master = doc(json!([
        {"moduleName": "b", "templates": [{"name": "b2", "size": 1, "title": "B2"}, {"name": "b1"}]},
        {"moduleName": "a", "templates": [{"name": "a1"}]}
    ]));
    let derived = doc(json!([
        {"moduleName": "a", "templates": [{"name": "a1"}]},
        {"moduleName": "b", "templates": [{"name": "b1"}, {"title": "乙二", "name": "b2", "size": 1}]}
    ]));

    let result = reconcile(&master, &derived, &SyncConfiguration::default()).unwrap();
    let value = result.document.to_value();

    let categories: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["moduleName"].as_str().unwrap())
        .collect();
    assert_eq!(categories, vec!["b", "a"]);

    let b2_keys: Vec<&String> = value[0]["templates"][0].as_object().unwrap().keys().collect();
    assert_eq!(b2_keys, vec!["name", "size", "title"]);
    assert_eq!(value[0]["templates"][1]["name"], "b1");
    assert!(!result.has_changes());
}

#[rstest]
#[case::defaults(SyncConfiguration::default(), "猫咪生成器", json!(["图像"]))]
#[case::force_language(SyncConfiguration::new(false, false, true), "Cat Generator", json!(["图像"]))]
#[case::force_tags(SyncConfiguration::new(false, true, false), "猫咪生成器", json!(["image"]))]
#[case::force_both(SyncConfiguration::new(false, true, true), "Cat Generator", json!(["image"]))]
fn force_flags(#[case] config: SyncConfiguration, #[case] title: &str, #[case] tags: Value) {
    let master = doc(json!([{"moduleName": "m", "templates": [
        {"name": "cat_generator", "title": "Cat Generator", "description": "Cats", "tags": ["image"]}
    ]}]));
    let derived = doc(json!([{"moduleName": "m", "templates": [
        {"name": "cat_generator", "title": "猫咪生成器", "description": "Cats", "tags": ["图像"]}
    ]}]));

    let result = reconcile(&master, &derived, &config).unwrap();
    let entity = entity_value(&result.document, "cat_generator");

    assert_eq!(entity["title"], json!(title));
    assert_eq!(entity["tags"], tags);
    // An unchanged description is reported as preserved unless forced.
    let description: Vec<ChangeKind> = result
        .changes
        .iter()
        .filter(|c| c.field.as_deref() == Some("description"))
        .map(|c| c.kind)
        .collect();
    if config.force_sync_language_fields {
        assert!(description.is_empty());
    } else {
        assert_eq!(description, vec![ChangeKind::Preserved]);
    }

    let forced = result
        .changes
        .iter()
        .filter(|c| c.kind == ChangeKind::ForceOverwritten)
        .count();
    let expected = usize::from(config.force_sync_language_fields) + usize::from(config.force_sync_tags);
    assert_eq!(forced, expected);
}

#[test]
fn always_sync_fields_follow_master_without_flags() {
    let master = doc(json!([{"moduleName": "m", "templates": [{
        "name": "t", "models": ["A", "B"], "date": "2025-05-01", "size": 3,
        "mediaType": "image", "mediaSubtype": "png", "tutorialUrl": "https://x/t",
        "thumbnailVariant": "hoverDissolve"
    }]}]));
    let derived = doc(json!([{"moduleName": "m", "templates": [{
        "name": "t", "models": ["A"], "date": "2024-01-01", "size": "3",
        "mediaType": "video", "mediaSubtype": "webp", "tutorialUrl": "https://x/old",
        "thumbnailVariant": "compareSlider"
    }]}]));

    let result = reconcile(&master, &derived, &SyncConfiguration::default()).unwrap();

    assert_eq!(
        entity_value(&result.document, "t"),
        entity_value(&master, "t")
    );
    assert_eq!(
        result
            .changes
            .iter()
            .filter(|c| c.kind == ChangeKind::AutoSynced)
            .count(),
        7
    );
}

#[test]
fn unclassified_fields_are_kept_or_added() {
    let master = doc(json!([{"moduleName": "m", "templates": [
        {"name": "t", "vram": 8, "requiresCustomNodes": ["x"]}
    ]}]));
    let derived = doc(json!([{"moduleName": "m", "templates": [
        {"name": "t", "vram": 12, "localNote": "only here"}
    ]}]));

    let result = reconcile(&master, &derived, &SyncConfiguration::new(false, true, true)).unwrap();

    assert_eq!(
        entity_value(&result.document, "t"),
        json!({"name": "t", "vram": 12, "requiresCustomNodes": ["x"]})
    );
    assert_eq!(
        records_for(&result.changes, "t"),
        vec![(Some("requiresCustomNodes"), ChangeKind::Added)]
    );
}

#[test]
fn entity_moved_between_categories_keeps_translation() {
    let master = doc(fixtures::master());
    let derived = doc(json!([
        {"moduleName": "default", "category": "GENERATION TYPE", "title": "图像", "type": "image", "templates": [
            {"name": "cat_generator", "title": "猫"},
            {"name": "upscale", "title": "放大"},
            {"name": "clip", "title": "短片"}
        ]}
    ]));

    let result = reconcile(&master, &derived, &SyncConfiguration::default()).unwrap();

    let (category, clip) = result.document.find_entity("clip").unwrap();
    assert_eq!(category.get("type"), Some(&json!("video")));
    assert_eq!(clip.get("title"), Some(&json!("短片")));

    let moved: Vec<&ChangeRecord> = result
        .changes
        .iter()
        .filter(|c| c.kind == ChangeKind::MovedEntity)
        .collect();
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].entity.as_deref(), Some("clip"));
    assert_eq!(moved[0].category, "default/GENERATION TYPE/video");
    assert_eq!(moved[0].previous, Some(json!("default/GENERATION TYPE/image")));
    assert!(
        result
            .changes
            .iter()
            .any(|c| c.kind == ChangeKind::AddedCategory)
    );
    assert!(
        !result
            .changes
            .iter()
            .any(|c| c.kind == ChangeKind::RemovedEntity)
    );
}

#[test]
fn fixture_summary() {
    let master = doc(fixtures::master());
    let derived = doc(fixtures::derived_zh());

    let result = reconcile(&master, &derived, &SyncConfiguration::default()).unwrap();
    let summary = accumulate(&result.changes);

    // upscale and clip are new, legacy_tool is gone, cat_generator changed
    assert_eq!(summary.templates_added, 2);
    assert_eq!(summary.templates_removed, 1);
    assert_eq!(summary.templates_updated, 1);
    // cat_generator: tags added, size synced
    assert_eq!(summary.fields_updated, 2);
}

#[test]
fn empty_master_empties_derived() {
    let derived = doc(fixtures::derived_zh());
    let result = reconcile(&Document::empty(), &derived, &SyncConfiguration::default()).unwrap();

    assert!(result.document.is_empty());
    let kinds: Vec<ChangeKind> = result.changes.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ChangeKind::RemovedEntity,
            ChangeKind::RemovedEntity,
            ChangeKind::RemovedCategory
        ]
    );
}

#[test]
fn empty_derived_is_filled_from_master() {
    let master = doc(fixtures::master());
    let result = reconcile(&master, &Document::empty(), &SyncConfiguration::default()).unwrap();

    assert_eq!(result.document, master);
    let summary = accumulate(&result.changes);
    assert_eq!(summary.templates_added, 3);
    assert_eq!(summary.fields_updated, 0);
    assert_eq!(summary.templates_updated, 0);
}
