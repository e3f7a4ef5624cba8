// storage holds the MongoDB preset collection and the JSON import/export format

pub mod models;

use bson::doc;
use futures_util::stream::TryStreamExt;
use log::{debug, info};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use starforge_core::GenerationError;
use thiserror::Error;

use crate::models::{PRESET_VERSION, PresetDoc};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("malformed preset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("preset version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("preset `{0}` not found")]
    NotFound(String),

    #[error("preset holds an invalid configuration: {0}")]
    InvalidPreset(#[from] GenerationError),
}

pub type Result<T> = std::result::Result<T, StorageError>;

pub struct PresetStore {
    col: Collection<PresetDoc>,
}

impl PresetStore {
    // Connect and make sure preset names are unique
    pub async fn init(uri: &str, db_name: &str, col_name: &str) -> Result<Self> {
        let mut opts = ClientOptions::parse(uri).await?;
        opts.app_name = Some("Starforge".to_string());
        let client = Client::with_options(opts)?;
        let col = client.database(db_name).collection(col_name);

        let index_model = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        col.create_index(index_model).await?;
        info!("preset store ready at {db_name}.{col_name}");

        Ok(Self { col })
    }

    pub async fn list_names(&self) -> Result<Vec<String>> {
        let mut cursor = self.col.find(doc! {}).await?;
        let mut names = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            names.push(doc.name);
        }
        names.sort();
        Ok(names)
    }

    pub async fn read_by_name(&self, name: &str) -> Result<Option<PresetDoc>> {
        Ok(self.col.find_one(doc! { "name": name }).await?)
    }

    // Insert, or replace the preset with the same name
    pub async fn save(&self, preset: &PresetDoc) -> Result<()> {
        preset.config.validate()?;
        let replacement = PresetDoc {
            id: None,
            ..preset.clone()
        };
        let res = self
            .col
            .replace_one(doc! { "name": preset.name.as_str() }, replacement)
            .upsert(true)
            .await?;
        debug!(
            "saved preset `{}` (matched {}, upserted {})",
            preset.name,
            res.matched_count,
            res.upserted_id.is_some()
        );
        Ok(())
    }

    pub async fn delete_by_name(&self, name: &str) -> Result<()> {
        let res = self.col.delete_one(doc! { "name": name }).await?;
        if res.deleted_count == 0 {
            return Err(StorageError::NotFound(name.to_string()));
        }
        Ok(())
    }
}

// Portable JSON form of a preset (no database id)
pub fn export_json(preset: &PresetDoc) -> Result<String> {
    let portable = PresetDoc {
        id: None,
        ..preset.clone()
    };
    Ok(serde_json::to_string_pretty(&portable)?)
}

// Parse a preset file, rejecting future versions and invalid configs
pub fn import_json(text: &str) -> Result<PresetDoc> {
    let mut preset: PresetDoc = serde_json::from_str(text)?;
    if preset.version > PRESET_VERSION {
        return Err(StorageError::UnsupportedVersion {
            found: preset.version,
            supported: PRESET_VERSION,
        });
    }
    preset.config.validate()?;
    preset.id = None;
    Ok(preset)
}
