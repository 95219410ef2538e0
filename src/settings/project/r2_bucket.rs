use std::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::binding::{Binding, ResourceBinding, R2_BUCKETS};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct R2Bucket {
    pub binding: String,
    #[serde(alias = "id")]
    pub bucket_name: String,
}

impl fmt::Display for R2Bucket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "binding: {}, bucket_name: {}",
            self.binding, self.bucket_name
        )
    }
}

impl ResourceBinding for R2Bucket {
    const CATEGORY: &'static str = R2_BUCKETS;
    const RESOURCE_FIELD: &'static str = "bucket_name";

    fn binding_name(&self) -> &str {
        &self.binding
    }

    fn resource(&self) -> &str {
        &self.bucket_name
    }

    fn to_binding(&self) -> Binding {
        Binding::new_r2_bucket(self.binding.clone(), self.bucket_name.clone())
    }
}
