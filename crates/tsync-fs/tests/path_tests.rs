use pretty_assertions::assert_eq;
use rstest::rstest;
use tsync_fs::NormalizedPath;

#[rstest]
#[case("templates/index.json", "templates/index.json")]
#[case("templates\\index.zh.json", "templates/index.zh.json")]
#[case("a/./b//c", "a/b/c")]
#[case("a/../b", "b")]
#[case("../templates", "../templates")]
#[case("../../a/b", "../../a/b")]
#[case("/a/b/../../c", "/c")]
#[case("/..", "/")]
#[case("", ".")]
#[case("//server/share/index.json", "//server/share/index.json")]
fn test_normalization(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(NormalizedPath::new(input).as_str(), expected);
}

#[test]
fn test_join() {
    let base = NormalizedPath::new("/srv/templates");
    assert_eq!(base.join("index.ja.json").as_str(), "/srv/templates/index.ja.json");
    assert_eq!(base.join(".tsync/backups").as_str(), "/srv/templates/.tsync/backups");
    assert_eq!(base.join("").as_str(), "/srv/templates");
}

#[test]
fn test_join_with_trailing_slash() {
    let base = NormalizedPath::new("/srv/templates/");
    assert_eq!(base.join("index.json").as_str(), "/srv/templates/index.json");
}

#[test]
fn test_parent() {
    let path = NormalizedPath::new("/srv/templates/index.json");
    assert_eq!(path.parent().unwrap().as_str(), "/srv/templates");
    assert_eq!(NormalizedPath::new("/srv").parent().unwrap().as_str(), "/");
    assert!(NormalizedPath::new("/").parent().is_none());
    assert!(NormalizedPath::new("index.json").parent().is_none());
}

#[rstest]
#[case("/srv/index.zh-TW.json", Some("index.zh-TW.json"), Some("json"))]
#[case("tsync.toml", Some("tsync.toml"), Some("toml"))]
#[case("/srv/.tsync", Some(".tsync"), None)]
#[case("/", None, None)]
fn test_file_name_and_extension(
    #[case] input: &str,
    #[case] name: Option<&str>,
    #[case] extension: Option<&str>,
) {
    let path = NormalizedPath::new(input);
    assert_eq!(path.file_name(), name);
    assert_eq!(path.extension(), extension);
}

#[test]
fn test_canonicalize_existing_dir() {
    let temp = tempfile::tempdir().unwrap();
    let path = NormalizedPath::new(temp.path().join("."));
    let canonical = path.canonicalize().unwrap();
    assert!(canonical.is_dir());
    assert!(!canonical.as_str().ends_with("/."));
}

#[test]
fn test_canonicalize_missing_dir_is_not_found() {
    let err = NormalizedPath::new("/nonexistent/templates")
        .canonicalize()
        .unwrap_err();
    assert!(err.is_not_found());
}
