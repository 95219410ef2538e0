use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Triggers {
    #[serde(default)]
    pub crons: Vec<String>,
}
