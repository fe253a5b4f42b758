use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{base, city, errors};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "states")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { City }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::City => Entity::has_many(city::Entity).into() }
    }
}

impl Related<city::Entity> for Entity {
    fn to() -> RelationDef { Relation::City.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn create(name: &str) -> Result<Self, errors::ModelError> {
        base::validate_name(name)?;
        let now = base::now();
        Ok(Self { id: base::new_id(), created_at: now, updated_at: now, name: name.to_string() })
    }

    /// Apply a new name; `updated_at` only moves when the name actually changes.
    pub fn rename(&mut self, name: &str) -> Result<bool, errors::ModelError> {
        base::validate_name(name)?;
        if self.name == name {
            return Ok(false);
        }
        self.name = name.to_string();
        self.updated_at = base::now();
        Ok(true)
    }
}
