use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::ConfigError;
use crate::settings::project::Project;

pub const KV_NAMESPACES: &str = "kv_namespaces";
pub const D1_DATABASES: &str = "d1_databases";
pub const R2_BUCKETS: &str = "r2_buckets";
pub const VARS: &str = "vars";

/// A binding as the upload metadata spells it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Binding {
    #[allow(non_camel_case_types)]
    kv_namespace { name: String, namespace_id: String },
    #[allow(non_camel_case_types)]
    d1 { name: String, id: String },
    #[allow(non_camel_case_types)]
    r2_bucket { name: String, bucket_name: String },
    #[allow(non_camel_case_types)]
    plain_text { name: String, text: String },
}

impl Binding {
    pub fn new_kv_namespace(name: String, namespace_id: String) -> Binding {
        Binding::kv_namespace { name, namespace_id }
    }

    pub fn new_d1(name: String, id: String) -> Binding {
        Binding::d1 { name, id }
    }

    pub fn new_r2_bucket(name: String, bucket_name: String) -> Binding {
        Binding::r2_bucket { name, bucket_name }
    }

    pub fn new_plain_text(name: String, text: String) -> Binding {
        Binding::plain_text { name, text }
    }

    /// The identifier the script sees in its `env`.
    pub fn name(&self) -> &str {
        match self {
            Binding::kv_namespace { name, .. }
            | Binding::d1 { name, .. }
            | Binding::r2_bucket { name, .. }
            | Binding::plain_text { name, .. } => name,
        }
    }
}

/// Common shape of every resource-backed binding entry in the project file.
pub trait ResourceBinding {
    const CATEGORY: &'static str;
    const RESOURCE_FIELD: &'static str;

    fn binding_name(&self) -> &str;
    fn resource(&self) -> &str;
    fn to_binding(&self) -> Binding;
}

/// Projects the project's binding lists onto the wire array.
///
/// Categories are emitted in a fixed order (KV namespaces, D1 databases, R2
/// buckets, then plain-text vars) and entries keep their order within each
/// category, so the same project always yields the same metadata.
pub fn translate(project: &Project) -> Result<Vec<Binding>, ConfigError> {
    let mut bindings = Vec::new();

    push_resources(&mut bindings, &project.kv_namespaces)?;
    push_resources(&mut bindings, &project.d1_databases)?;
    push_resources(&mut bindings, &project.r2_buckets)?;

    for (index, (name, text)) in project.vars.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(ConfigError::MissingBindingField {
                category: VARS,
                index,
                field: "name",
            });
        }
        bindings.push(Binding::new_plain_text(name.clone(), text.clone()));
    }

    Ok(bindings)
}

fn push_resources<R: ResourceBinding>(
    bindings: &mut Vec<Binding>,
    entries: &[R],
) -> Result<(), ConfigError> {
    for (index, entry) in entries.iter().enumerate() {
        if entry.binding_name().trim().is_empty() {
            return Err(ConfigError::MissingBindingField {
                category: R::CATEGORY,
                index,
                field: "binding",
            });
        }
        if entry.resource().trim().is_empty() {
            return Err(ConfigError::MissingBindingField {
                category: R::CATEGORY,
                index,
                field: R::RESOURCE_FIELD,
            });
        }
        bindings.push(entry.to_binding());
    }
    Ok(())
}

static BINDING_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("binding regex is valid"));

pub fn validate_binding(binding: &str) -> bool {
    BINDING_NAME.is_match(binding)
}

/// Rejects malformed and duplicated names within one category. Entries
/// without a name are left for `translate` to report.
pub(crate) fn check_names<'a, I>(category: &'static str, names: I) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for name in names.into_iter().filter(|n| !n.trim().is_empty()) {
        if !validate_binding(name) {
            return Err(ConfigError::InvalidBindingName {
                category,
                binding: name.to_string(),
            });
        }
        if !seen.insert(name) {
            return Err(ConfigError::DuplicateBinding {
                category,
                binding: name.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::settings::project::{D1Database, KvNamespace, R2Bucket};

    fn project(value: serde_json::Value) -> Project {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn an_empty_project_has_no_bindings() {
        let bindings = translate(&project(json!({ "worker_name": "demo" }))).unwrap();
        assert!(bindings.is_empty());
    }

    #[test]
    fn it_translates_kv_and_vars_to_the_wire_shape() {
        let project = project(json!({
            "worker_name": "demo",
            "kv_namespaces": [{ "binding": "MY_KV", "id": "abc123" }],
            "vars": { "ENV": "prod" }
        }));

        let wire = serde_json::to_value(translate(&project).unwrap()).unwrap();

        assert_eq!(
            wire,
            json!([
                { "type": "kv_namespace", "name": "MY_KV", "namespace_id": "abc123" },
                { "type": "plain_text", "name": "ENV", "text": "prod" }
            ])
        );
    }

    #[test]
    fn it_keeps_input_order_and_category_order() {
        let mut project = project(json!({ "worker_name": "demo" }));
        for (name, value) in &[("ZULU", "1"), ("ALPHA", "2"), ("MIKE", "3")] {
            project.vars.insert(name.to_string(), value.to_string());
        }
        project.r2_buckets = vec![R2Bucket {
            binding: "ASSETS".to_string(),
            bucket_name: "assets-bucket".to_string(),
        }];
        project.d1_databases = vec![D1Database {
            binding: "DB".to_string(),
            id: "d1-id".to_string(),
        }];
        project.kv_namespaces = vec![
            KvNamespace {
                binding: "SECOND".to_string(),
                id: "2".to_string(),
            },
            KvNamespace {
                binding: "FIRST".to_string(),
                id: "1".to_string(),
            },
        ];

        let names: Vec<String> = translate(&project)
            .unwrap()
            .iter()
            .map(|b| b.name().to_string())
            .collect();

        assert_eq!(
            names,
            vec!["SECOND", "FIRST", "DB", "ASSETS", "ZULU", "ALPHA", "MIKE"]
        );
    }

    #[test]
    fn d1_and_r2_use_their_own_resource_fields() {
        let bindings = vec![
            Binding::new_d1("DB".to_string(), "d1-id".to_string()),
            Binding::new_r2_bucket("ASSETS".to_string(), "my-bucket".to_string()),
        ];

        assert_eq!(
            serde_json::to_value(&bindings).unwrap(),
            json!([
                { "type": "d1", "name": "DB", "id": "d1-id" },
                { "type": "r2_bucket", "name": "ASSETS", "bucket_name": "my-bucket" }
            ])
        );
    }

    #[test]
    fn an_entry_without_a_binding_name_fails_translation() {
        let project = project(json!({
            "worker_name": "demo",
            "kv_namespaces": [{ "binding": "OK", "id": "1" }, { "id": "2" }]
        }));

        let err = translate(&project).unwrap_err();

        match err {
            ConfigError::MissingBindingField {
                category,
                index,
                field,
            } => {
                assert_eq!(category, KV_NAMESPACES);
                assert_eq!(index, 1);
                assert_eq!(field, "binding");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn an_entry_without_a_resource_id_fails_translation() {
        let project = project(json!({
            "worker_name": "demo",
            "r2_buckets": [{ "binding": "ASSETS" }]
        }));

        let err = translate(&project).unwrap_err();

        assert!(err.to_string().contains("bucket_name"));
    }

    #[test]
    fn it_can_detect_invalid_binding() {
        let invalid_bindings = vec!["hi there", "1234", "with-dash"];
        for binding in invalid_bindings {
            assert!(!validate_binding(binding));
        }
    }

    #[test]
    fn it_can_detect_valid_binding() {
        let valid_bindings = vec!["ONE", "TWO_TWO", "__private_variable", "rud3_var"];
        for binding in valid_bindings {
            assert!(validate_binding(binding));
        }
    }

    #[test]
    fn it_rejects_duplicates_within_a_category() {
        let err = check_names(KV_NAMESPACES, vec!["CACHE", "SESSIONS", "CACHE"]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DuplicateBinding { binding, .. } if binding == "CACHE"
        ));
    }
}
