use std::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::binding::{Binding, ResourceBinding, D1_DATABASES};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct D1Database {
    pub binding: String,
    pub id: String,
}

impl fmt::Display for D1Database {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "id: {}, binding: {}", self.id, self.binding)
    }
}

impl ResourceBinding for D1Database {
    const CATEGORY: &'static str = D1_DATABASES;
    const RESOURCE_FIELD: &'static str = "id";

    fn binding_name(&self) -> &str {
        &self.binding
    }

    fn resource(&self) -> &str {
        &self.id
    }

    fn to_binding(&self) -> Binding {
        Binding::new_d1(self.binding.clone(), self.id.clone())
    }
}
