use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use starforge_core::GeneratorConfig;

// Bumped by hand when the stored shape changes. There is no migration path:
// older documents load as-is, newer ones are rejected.
pub const PRESET_VERSION: u32 = 1;

fn current_version() -> u32 {
    PRESET_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default = "current_version")]
    pub version: u32,
    pub config: GeneratorConfig,
}

impl PresetDoc {
    pub fn new(name: impl Into<String>, config: GeneratorConfig) -> Self {
        Self {
            id: None,
            name: name.into(),
            version: PRESET_VERSION,
            config,
        }
    }
}
