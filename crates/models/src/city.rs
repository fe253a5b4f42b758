use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{base, errors, state};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub name: String,
    pub state_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { State }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::State => Entity::belongs_to(state::Entity)
                .from(Column::StateId)
                .to(state::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<state::Entity> for Entity {
    fn to() -> RelationDef { Relation::State.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// New city owned by `state_id`; the owner is fixed for the city's lifetime.
    pub fn create(state_id: &str, name: &str) -> Result<Self, errors::ModelError> {
        base::validate_name(name)?;
        if state_id.trim().is_empty() {
            return Err(errors::ModelError::Validation("state_id required".into()));
        }
        let now = base::now();
        Ok(Self {
            id: base::new_id(),
            created_at: now,
            updated_at: now,
            name: name.to_string(),
            state_id: state_id.to_string(),
        })
    }

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
