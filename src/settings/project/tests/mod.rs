use super::*;

use std::path::PathBuf;

use crate::settings::binding::translate;

#[test]
fn it_builds_from_a_minimal_config() {
    let project = Project::load(&fixture_path("default.json")).unwrap();

    assert_eq!(project.worker_name, "hello-worker");
    assert_eq!(project.main, DEFAULT_MAIN);
    assert_eq!(project.compatibility_date, DEFAULT_COMPATIBILITY_DATE);
    assert_eq!(project.format, ScriptFormat::Modules);
    assert!(project.routes.is_empty());
    assert!(project.kv_namespaces.is_empty());
    assert!(project.vars.is_empty());
    assert!(project.triggers.crons.is_empty());
    assert!(translate(&project).unwrap().is_empty());
}

#[test]
fn it_builds_from_config_with_bindings() {
    let project = Project::load(&fixture_path("bindings.json")).unwrap();

    let kv_1 = KvNamespace {
        id: "somecrazylongidentifierstring".to_string(),
        binding: "prodKV".to_string(),
    };
    let kv_2 = KvNamespace {
        id: "anotherwaytoolongidstring".to_string(),
        binding: "stagingKV".to_string(),
    };

    assert_eq!(project.kv_namespaces, vec![kv_1, kv_2]);
    assert_eq!(project.d1_databases[0].id, "d1-database-id");
    assert_eq!(project.r2_buckets[0].bucket_name, "site-assets");
    assert_eq!(project.triggers.crons, vec!["*/5 * * * *"]);
}

#[test]
fn vars_keep_their_file_order() {
    let project = Project::load(&fixture_path("bindings.json")).unwrap();

    let keys: Vec<&str> = project.vars.keys().map(String::as_str).collect();

    assert_eq!(keys, vec!["ENV", "API_HOST", "DEBUG"]);
}

#[test]
fn it_reads_routes_and_format() {
    let project = Project::load(&fixture_path("routes.json")).unwrap();

    assert_eq!(project.format, ScriptFormat::ServiceWorker);
    assert_eq!(project.zone_id.as_deref(), Some("zone123"));
    assert_eq!(project.routes.len(), 2);
    assert!(project.is_zoned());
}

#[test]
fn routes_without_a_zone_are_not_zoned() {
    let mut project = Project::generate("hello-worker".to_string());
    project.routes.push("example.com/*".to_string());

    assert!(!project.is_zoned());
}

#[test]
fn unknown_keys_are_ignored() {
    let project = Project::load(&fixture_path("unknown_keys.json")).unwrap();

    assert_eq!(project, Project::load(&fixture_path("default.json")).unwrap());
}

#[test]
fn a_missing_worker_name_is_named_in_the_error() {
    let err = Project::load(&fixture_path("missing_name.json")).unwrap_err();

    assert!(matches!(err, ConfigError::MissingField("worker_name")));
    assert!(err.to_string().contains("worker_name"));
}

#[test]
fn a_null_worker_name_is_missing() {
    let err = Project::load(&fixture_path("null_name.json")).unwrap_err();

    assert!(matches!(err, ConfigError::MissingField("worker_name")));
}

#[test]
fn a_mistyped_field_is_named_in_the_error() {
    let err = Project::load(&fixture_path("wrong_type.json")).unwrap_err();

    assert!(matches!(err, ConfigError::InvalidField { ref field, .. } if field == "routes"));
    assert!(err.to_string().contains("`routes`"));
}

#[test]
fn a_mistyped_binding_entry_names_its_category() {
    let err = Project::load(&fixture_path("wrong_nested_type.json")).unwrap_err();

    assert!(matches!(err, ConfigError::InvalidField { ref field, .. } if field == "kv_namespaces"));
}

#[test]
fn it_rejects_an_invalid_worker_name() {
    let err = Project::load(&fixture_path("invalid_name.json")).unwrap_err();

    assert!(matches!(err, ConfigError::InvalidWorkerName(name) if name == "Hello World"));
}

#[test]
fn it_rejects_an_invalid_compatibility_date() {
    let err = Project::load(&fixture_path("invalid_date.json")).unwrap_err();

    assert!(matches!(err, ConfigError::InvalidCompatibilityDate(_)));
}

#[test]
fn it_rejects_duplicate_bindings() {
    let err = Project::load(&fixture_path("duplicate_binding.json")).unwrap_err();

    assert!(matches!(
        err,
        ConfigError::DuplicateBinding { category: "kv_namespaces", ref binding } if binding == "CACHE"
    ));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = Project::load(&fixture_path("malformed.json")).unwrap_err();

    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn a_missing_file_is_not_found() {
    let err = Project::load(&fixture_path("nope.json")).unwrap_err();

    assert!(matches!(
        err,
        ConfigError::NotFound {
            default_path: false,
            ..
        }
    ));
}

#[test]
fn a_generated_project_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".cfworker.json");
    let project = Project::generate("my-worker".to_string());

    project.write(&path).unwrap();

    assert_eq!(Project::load(&path).unwrap(), project);
}

#[test]
fn a_generated_project_lists_the_default_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".cfworker.json");

    Project::generate("my-worker".to_string())
        .write(&path)
        .unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(written["main"], "worker.js");
    assert_eq!(written["kv_namespaces"], serde_json::json!([]));
    assert_eq!(written["triggers"], serde_json::json!({ "crons": [] }));
    assert!(written.get("zone_id").is_none());
}

#[test]
fn it_can_detect_invalid_worker_names() {
    for name in &["", "Upper", "has space", "-leading-dash", "dot.ted"] {
        assert!(!validate_worker_name(name), "{} should be invalid", name);
    }
    for name in &["hello", "hello-world", "_private", "worker_2"] {
        assert!(validate_worker_name(name), "{} should be valid", name);
    }
}

fn fixture_path(fixture: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("src")
        .join("settings")
        .join("project")
        .join("tests")
        .join("fixtures")
        .join(fixture)
}
