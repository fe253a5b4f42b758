use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use common::metrics::STORAGE_SAVES_TOTAL;
use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

use models::{city, state};

use super::{Kind, Record, Storage};
use crate::errors::ServiceError;

#[derive(Clone, Debug)]
enum Pending {
    Upsert(Record),
    Remove(Kind, String),
}

impl Pending {
    fn key(&self) -> String {
        match self {
            Pending::Upsert(r) => r.key(),
            Pending::Remove(kind, id) => kind.key(id),
        }
    }
}

/// Relational engine on top of sea-orm.
///
/// Staged operations are queued in memory, visible to reads on this handle, and
/// applied in a single transaction by [`Storage::save`].
pub struct DbStorage {
    db: DatabaseConnection,
    pending: Mutex<Vec<Pending>>,
}

impl DbStorage {
    /// Connect with `cfg` and bring the schema up to date.
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Arc<Self>, ServiceError> {
        let db = models::db::connect(cfg).await.map_err(ServiceError::storage)?;
        migration::Migrator::up(&db, None).await?;
        info!("database schema up to date");
        Ok(Self::with_connection(db))
    }

    /// Wrap an existing connection whose schema is already migrated.
    pub fn with_connection(db: DatabaseConnection) -> Arc<Self> {
        Arc::new(Self { db, pending: Mutex::new(Vec::new()) })
    }

    async fn fetch_all(&self, kind: Kind) -> Result<Vec<Record>, ServiceError> {
        let records = match kind {
            Kind::State => state::Entity::find()
                .all(&self.db)
                .await?
                .into_iter()
                .map(Record::State)
                .collect(),
            Kind::City => city::Entity::find()
                .all(&self.db)
                .await?
                .into_iter()
                .map(Record::City)
                .collect(),
        };
        Ok(records)
    }

    async fn fetch_one(&self, kind: Kind, id: &str) -> Result<Option<Record>, ServiceError> {
        let record = match kind {
            Kind::State => state::Entity::find_by_id(id).one(&self.db).await?.map(Record::State),
            Kind::City => city::Entity::find_by_id(id).one(&self.db).await?.map(Record::City),
        };
        Ok(record)
    }
}

async fn upsert<C: ConnectionTrait>(conn: &C, record: Record) -> Result<(), ServiceError> {
    match record {
        Record::State(m) => {
            let exists = state::Entity::find_by_id(m.id.as_str()).one(conn).await?.is_some();
            let am = state::ActiveModel {
                id: Set(m.id),
                created_at: Set(m.created_at),
                updated_at: Set(m.updated_at),
                name: Set(m.name),
            };
            if exists {
                am.update(conn).await?;
            } else {
                state::Entity::insert(am).exec_without_returning(conn).await?;
            }
        }
        Record::City(m) => {
            let exists = city::Entity::find_by_id(m.id.as_str()).one(conn).await?.is_some();
            let am = city::ActiveModel {
                id: Set(m.id),
                created_at: Set(m.created_at),
                updated_at: Set(m.updated_at),
                name: Set(m.name),
                state_id: Set(m.state_id),
            };
            if exists {
                am.update(conn).await?;
            } else {
                city::Entity::insert(am).exec_without_returning(conn).await?;
            }
        }
    }
    Ok(())
}

async fn remove<C: ConnectionTrait>(conn: &C, kind: Kind, id: &str) -> Result<(), ServiceError> {
    match kind {
        Kind::State => {
            state::Entity::delete_by_id(id).exec(conn).await?;
        }
        Kind::City => {
            city::Entity::delete_by_id(id).exec(conn).await?;
        }
    }
    Ok(())
}

#[async_trait]
impl Storage for DbStorage {
    async fn all(&self, kind: Option<Kind>) -> Result<Vec<Record>, ServiceError> {
        let kinds = match kind {
            Some(k) => vec![k],
            None => vec![Kind::State, Kind::City],
        };
        let mut merged: HashMap<String, Record> = HashMap::new();
        for k in &kinds {
            for r in self.fetch_all(*k).await? {
                merged.insert(r.key(), r);
            }
        }
        let pending = self.pending.lock().await;
        for op in pending.iter() {
            match op {
                Pending::Upsert(r) if kinds.contains(&r.kind()) => {
                    merged.insert(r.key(), r.clone());
                }
                Pending::Remove(k, id) if kinds.contains(k) => {
                    merged.remove(&k.key(id));
                }
                _ => {}
            }
        }
        Ok(merged.into_values().collect())
    }

    async fn get(&self, kind: Kind, id: &str) -> Result<Option<Record>, ServiceError> {
        let key = kind.key(id);
        {
            let pending = self.pending.lock().await;
            if let Some(op) = pending.iter().rev().find(|op| op.key() == key) {
                return Ok(match op {
                    Pending::Upsert(r) => Some(r.clone()),
                    Pending::Remove(..) => None,
                });
            }
        }
        self.fetch_one(kind, id).await
    }

    async fn new(&self, record: Record) -> Result<(), ServiceError> {
        self.pending.lock().await.push(Pending::Upsert(record));
        Ok(())
    }

    #[instrument(skip(self))]
    async fn save(&self) -> Result<(), ServiceError> {
        let ops = std::mem::take(&mut *self.pending.lock().await);
        if ops.is_empty() {
            return Ok(());
        }
        let count = ops.len();
        let txn = self.db.begin().await?;
        for op in ops {
            let applied = match op {
                Pending::Upsert(record) => upsert(&txn, record).await,
                Pending::Remove(kind, id) => remove(&txn, kind, &id).await,
            };
            if let Err(e) = applied {
                error!(err = %e, "storage commit failed; rolling back");
                txn.rollback().await?;
                return Err(e);
            }
        }
        txn.commit().await?;
        STORAGE_SAVES_TOTAL.inc();
        debug!(count, "database storage saved");
        Ok(())
    }

    async fn delete(&self, kind: Kind, id: &str) -> Result<(), ServiceError> {
        self.pending.lock().await.push(Pending::Remove(kind, id.to_string()));
        Ok(())
    }

    /// Drop staged operations and close the pool.
    async fn close(&self) -> Result<(), ServiceError> {
        let dropped = std::mem::take(&mut *self.pending.lock().await).len();
        if dropped > 0 {
            debug!(dropped, "discarded unsaved operations");
        }
        self.db.clone().close().await?;
        Ok(())
    }
}
