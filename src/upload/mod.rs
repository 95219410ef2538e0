use reqwest::blocking::multipart::{Form, Part};
use serde::Serialize;

use crate::error::RemoteError;
use crate::settings::binding::Binding;
use crate::settings::project::ScriptFormat;

/// The `metadata` part of a script upload.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_part: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_module: Option<String>,
    pub bindings: Vec<Binding>,
    pub compatibility_date: String,
}

impl Metadata {
    /// Modules name their entry point with `main_module`, service workers
    /// with `body_part`. Either way it is the name of the script part.
    pub fn new(
        format: ScriptFormat,
        script_name: &str,
        bindings: Vec<Binding>,
        compatibility_date: String,
    ) -> Self {
        let (body_part, main_module) = match format {
            ScriptFormat::Modules => (None, Some(script_name.to_string())),
            ScriptFormat::ServiceWorker => (Some(script_name.to_string()), None),
        };

        Metadata {
            body_part,
            main_module,
            bindings,
            compatibility_date,
        }
    }
}

/// Everything sent by a single upload: metadata plus the script itself.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptUpload {
    pub script_name: String,
    pub format: ScriptFormat,
    pub metadata: Metadata,
    pub script: Vec<u8>,
}

impl ScriptUpload {
    pub fn new(
        script_name: String,
        format: ScriptFormat,
        bindings: Vec<Binding>,
        compatibility_date: String,
        script: Vec<u8>,
    ) -> Self {
        let metadata = Metadata::new(format, &script_name, bindings, compatibility_date);
        ScriptUpload {
            script_name,
            format,
            metadata,
            script,
        }
    }

    pub fn script_size(&self) -> usize {
        self.script.len()
    }

    pub fn form(&self) -> Result<Form, RemoteError> {
        let mut form = Form::new();

        // The upload endpoint reads the form as a stream and requires the
        // "metadata" part to come first.
        form = add_metadata(form, &self.metadata)?;
        form = add_script(form, self)?;

        log::info!("building form");
        log::debug!("{:#?}", &form);

        Ok(form)
    }
}

fn add_metadata(form: Form, metadata: &Metadata) -> Result<Form, RemoteError> {
    let metadata = Part::text(serde_json::to_string(metadata)?)
        .file_name("metadata.json")
        .mime_str("application/json")?;

    Ok(form.part("metadata", metadata))
}

fn add_script(form: Form, upload: &ScriptUpload) -> Result<Form, RemoteError> {
    let part = Part::bytes(upload.script.clone())
        .file_name(upload.script_name.clone())
        .mime_str(upload.format.content_type())?;

    Ok(form.part(upload.script_name.clone(), part))
}
