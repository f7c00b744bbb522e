//! Expense primitives.
//!
//! An `Expense` is a purchase made by one member on behalf of a group. Its
//! cost is carried by one or more [`Split`](crate::Split)s which always sum to
//! `total`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, util::parse_uuid};

use super::splits;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseStatus {
    #[default]
    Pending,
}

impl ExpenseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
        }
    }
}

impl TryFrom<&str> for ExpenseStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "PENDING" => Ok(Self::Pending),
            other => Err(EngineError::Validation(format!(
                "invalid expense status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub total: MoneyCents,
    pub payer_id: Uuid,
    pub status: ExpenseStatus,
    pub created_at: DateTime<Utc>,
    pub splits: Vec<splits::Split>,
}

impl Expense {
    pub(crate) fn new(description: String, total: MoneyCents, payer_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            total,
            payer_id,
            status: ExpenseStatus::Pending,
            created_at: Utc::now(),
            splits: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub description: String,
    pub total_minor: i64,
    pub payer_id: String,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::splits::Entity")]
    Splits,
}

impl Related<super::splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Splits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            description: ActiveValue::Set(expense.description.clone()),
            total_minor: ActiveValue::Set(expense.total.cents()),
            payer_id: ActiveValue::Set(expense.payer_id.to_string()),
            status: ActiveValue::Set(expense.status.as_str().to_string()),
            created_at: ActiveValue::Set(expense.created_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            description: model.description,
            total: MoneyCents::new(model.total_minor),
            payer_id: parse_uuid(&model.payer_id, "payer")?,
            status: ExpenseStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
            splits: Vec::new(),
        })
    }
}
