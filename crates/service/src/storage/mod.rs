//! Storage abstraction consumed by the service layer.
//!
//! Engines stage changes with [`Storage::new`] and [`Storage::delete`] and make
//! them durable with [`Storage::save`]. Two engines ship with the crate:
//! [`file::FileStorage`] (JSON file) and [`db::DbStorage`] (sea-orm).

pub mod db;
pub mod file;

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use configs::{AppConfig, StorageKind};
use models::{city, state};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ServiceError;

/// Entity class stored by an engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    State,
    City,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::State => "State",
            Kind::City => "City",
        }
    }

    /// Storage key in `<Class>.<id>` form.
    pub fn key(self, id: &str) -> String {
        format!("{}.{}", self.as_str(), id)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// One stored entity, serialized with its class under `__class__`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__class__")]
pub enum Record {
    State(state::Model),
    City(city::Model),
}

impl Record {
    pub fn kind(&self) -> Kind {
        match self {
            Record::State(_) => Kind::State,
            Record::City(_) => Kind::City,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::State(s) => &s.id,
            Record::City(c) => &c.id,
        }
    }

    pub fn key(&self) -> String { self.kind().key(self.id()) }

    pub fn into_state(self) -> Option<state::Model> {
        match self {
            Record::State(s) => Some(s),
            Record::City(_) => None,
        }
    }

    pub fn into_city(self) -> Option<city::Model> {
        match self {
            Record::City(c) => Some(c),
            Record::State(_) => None,
        }
    }
}

impl From<state::Model> for Record {
    fn from(m: state::Model) -> Self { Record::State(m) }
}

impl From<city::Model> for Record {
    fn from(m: city::Model) -> Self { Record::City(m) }
}

/// Data-access object behind every handler.
///
/// `new` and `delete` only stage; nothing is durable until `save`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Every record, or only those of `kind`.
    async fn all(&self, kind: Option<Kind>) -> Result<Vec<Record>, ServiceError>;
    async fn get(&self, kind: Kind, id: &str) -> Result<Option<Record>, ServiceError>;
    /// Stage an insert, replacing any record with the same key.
    async fn new(&self, record: Record) -> Result<(), ServiceError>;
    async fn save(&self) -> Result<(), ServiceError>;
    /// Stage removal; absent ids are ignored.
    async fn delete(&self, kind: Kind, id: &str) -> Result<(), ServiceError>;
    /// Drop unsaved changes and release engine resources.
    async fn close(&self) -> Result<(), ServiceError>;

    async fn count(&self, kind: Option<Kind>) -> Result<usize, ServiceError> {
        Ok(self.all(kind).await?.len())
    }
}

/// Open the engine selected by `[storage] kind`.
pub async fn open(cfg: &AppConfig) -> Result<Arc<dyn Storage>, ServiceError> {
    match cfg.storage.kind {
        StorageKind::File => {
            info!(path = %cfg.storage.file_path, "using file storage");
            let store: Arc<dyn Storage> = file::FileStorage::open(&cfg.storage.file_path).await?;
            Ok(store)
        }
        StorageKind::Db => {
            info!("using database storage");
            let store: Arc<dyn Storage> = db::DbStorage::connect(&cfg.database).await?;
            Ok(store)
        }
    }
}
