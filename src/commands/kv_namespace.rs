use anyhow::Result;

use crate::http::{WorkersApi, WorkersKvNamespace};
use crate::settings::binding::validate_binding;
use crate::settings::project::KvNamespace;
use crate::settings::Project;
use crate::terminal::message::{Message, StdOut};
use crate::terminal::to_display_string;

use super::remote_error;

pub fn list(api: &impl WorkersApi) -> Result<()> {
    let namespaces = api.list_kv_namespaces().map_err(remote_error)?;
    println!("{}", to_display_string(&namespaces)?);
    Ok(())
}

/// Creates `<worker_name>-<binding>` and prints the entry to add to the
/// project's `kv_namespaces`.
pub fn create(api: &impl WorkersApi, project: &Project, binding: &str) -> Result<KvNamespace> {
    if !validate_binding(binding) {
        anyhow::bail!(
            "A binding can only have alphanumeric and _ characters, and cannot begin with a number"
        );
    }
    if project.kv_namespaces.iter().any(|kv| kv.binding == binding) {
        anyhow::bail!(
            "A KV namespace with the binding \"{}\" is already in your configuration file",
            binding
        );
    }

    let title = format!("{}-{}", project.worker_name, binding);
    StdOut::working(&format!("Creating namespace with title \"{}\"", title));

    let created: WorkersKvNamespace = api.create_kv_namespace(&title).map_err(remote_error)?;
    let entry = KvNamespace {
        binding: binding.to_string(),
        id: created.id,
    };

    StdOut::success(&format!("Success: {}", entry));
    StdOut::info("Add the following to the \"kv_namespaces\" array of your configuration file:");
    println!("{}", serde_json::to_string_pretty(&entry)?);

    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::MockApi;

    #[test]
    fn it_names_the_namespace_after_the_worker() {
        let api = MockApi::default();

        let entry = create(&api, &Project::generate("demo".to_string()), "CACHE").unwrap();

        assert_eq!(api.calls(), vec!["create_kv_namespace demo-CACHE"]);
        assert_eq!(entry.binding, "CACHE");
        assert_eq!(entry.id, "demo-CACHE-id");
    }

    #[test]
    fn it_rejects_bad_bindings_before_calling_the_api() {
        let api = MockApi::default();

        assert!(create(&api, &Project::generate("demo".to_string()), "1 cache").is_err());
        assert!(api.calls().is_empty());
    }

    #[test]
    fn it_rejects_a_binding_already_configured() {
        let api = MockApi::default();
        let mut project = Project::generate("demo".to_string());
        project.kv_namespaces.push(KvNamespace {
            binding: "CACHE".to_string(),
            id: "existing".to_string(),
        });

        assert!(create(&api, &project, "CACHE").is_err());
        assert!(api.calls().is_empty());
    }
}
