//! The module contains the `Entry` type, one immutable line of the ledger.
use core::fmt;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Amount;

/// One ledger line attributed to a single participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub name: String,
    pub amount: Amount,
    pub note: String,
    pub time: DateTime<Utc>,
}

impl Entry {
    pub fn new(name: &str, amount: Amount, note: &str, time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            amount,
            note: note.to_string(),
            time,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.amount, self.note)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub amount: i64,
    pub note: String,
    pub time: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Entry {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            // Stored amounts are written through `Amount` and are never negative.
            amount: Amount::new(model.amount).unwrap_or_default(),
            note: model.note,
            time: model.time,
        }
    }
}

impl From<&Entry> for ActiveModel {
    fn from(entry: &Entry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.clone()),
            name: ActiveValue::Set(entry.name.clone()),
            amount: ActiveValue::Set(entry.amount.units()),
            note: ActiveValue::Set(entry.note.clone()),
            time: ActiveValue::Set(entry.time),
        }
    }
}
