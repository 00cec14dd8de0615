//! Sheet fixtures shared by the integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use dex_content::decode::column;
use dex_runtime::{
    CacheStore, Dex, InMemoryStorage, ManualClock, RuntimeConfig, StaticDataSource,
    StaticImageProbe, StorageBackend,
};
use serde_json::{Value, json};

pub const IMAGE_BASE: &str = "https://img.test/dex/";
pub const SECRET: &str = "letmein";
pub const START_MILLIS: i64 = 1_700_000_000_000;

pub fn creature_row(id: u32, name: &str, primary_type: &str, tiers: [&str; 6]) -> Value {
    let mut row = vec![json!(""); 80];
    row[column::ID] = json!(id);
    row[column::NAME] = json!(name);
    row[column::PRIMARY_TYPE] = json!(primary_type);
    row[column::PRIMARY_ABILITY] = json!("Run Away");
    for (offset, tier) in tiers.iter().enumerate() {
        row[column::MOVE_TIERS.start + offset] = json!(tier);
    }
    Value::Array(row)
}

pub fn move_row(name: &str, move_type: &str) -> Value {
    json!([name, move_type, "", "1 action", 2, "Instant", "30 ft", "A move.", ""])
}

pub fn creature_rows() -> Vec<Value> {
    vec![
        creature_row(4, "Emberfox", "Fire", ["Scratch, Ember", "", "Flame Burst", "", "", ""]),
        creature_row(7, "Tidepup", "Water", ["Bubble", "", "", "", "", ""]),
        creature_row(70, "Voltkit", "Electric", ["Spark", "", "", "", "", ""]),
        creature_row(12, "Pyrovix", "Fire", ["Ember", "", "", "", "", "Inferno"]),
    ]
}

pub fn move_rows() -> Vec<Value> {
    vec![
        move_row("Scratch", "Normal"),
        move_row("Ember", "Fire"),
        move_row("Flame Burst", "Fire"),
        move_row("Bubble", "Water"),
        move_row("Spark", "Electric"),
        move_row("Inferno", "Fire"),
        move_row("Hyper Beam", "Normal"),
    ]
}

pub fn remote_config() -> Value {
    json!({
        "registered": ["Emberfox", "Tidepup", "Voltkit"],
        "splashCount": 12
    })
}

pub fn online_source() -> Arc<StaticDataSource> {
    Arc::new(StaticDataSource::new(creature_rows(), move_rows()).with_config(remote_config()))
}

pub fn settings() -> RuntimeConfig {
    RuntimeConfig {
        image_base_url: IMAGE_BASE.to_string(),
        admin_secret: SECRET.to_string(),
        ..RuntimeConfig::default()
    }
}

pub struct Env {
    pub storage: Arc<dyn StorageBackend>,
    pub clock: Arc<ManualClock>,
}

impl Env {
    pub fn new() -> Self {
        Self::with_storage(Arc::new(InMemoryStorage::new()))
    }

    pub fn with_storage(storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            storage,
            clock: Arc::new(ManualClock::new(START_MILLIS)),
        }
    }

    pub fn cache(&self) -> CacheStore {
        CacheStore::new(self.storage.clone(), self.clock.clone())
    }

    pub async fn load(&self, source: Arc<StaticDataSource>) -> dex_runtime::Result<Dex> {
        Dex::builder()
            .settings(settings())
            .source(source)
            .image_probe(Arc::new(StaticImageProbe::none()))
            .storage(self.storage.clone())
            .clock(self.clock.clone())
            .load()
            .await
    }
}
