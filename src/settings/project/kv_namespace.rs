use std::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::binding::{Binding, ResourceBinding, KV_NAMESPACES};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct KvNamespace {
    pub binding: String,
    pub id: String,
}

impl fmt::Display for KvNamespace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "id: {}, binding: {}", self.id, self.binding)
    }
}

impl ResourceBinding for KvNamespace {
    const CATEGORY: &'static str = KV_NAMESPACES;
    const RESOURCE_FIELD: &'static str = "id";

    fn binding_name(&self) -> &str {
        &self.binding
    }

    fn resource(&self) -> &str {
        &self.id
    }

    fn to_binding(&self) -> Binding {
        Binding::new_kv_namespace(self.binding.clone(), self.id.clone())
    }
}
