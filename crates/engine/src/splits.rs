//! Expense splits.
//!
//! A [`Split`] is the share of an [`Expense`](crate::Expense) consumed by one
//! member. `responsible_id` is who owes it: the consumer itself, or a guardian
//! when the consumer is a proxy member.
//!
//! Splits are owned by their expense; deleting the expense deletes them.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DraftSplit, EngineError, MoneyCents, util::parse_uuid};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitStatus {
    #[default]
    Pending,
}

impl SplitStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
        }
    }
}

impl TryFrom<&str> for SplitStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "PENDING" => Ok(Self::Pending),
            other => Err(EngineError::Validation(format!(
                "invalid split status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub id: Uuid,
    pub expense_id: Uuid,
    pub consumer_id: Uuid,
    pub responsible_id: Uuid,
    pub amount: MoneyCents,
    pub status: SplitStatus,
}

impl Split {
    pub(crate) fn from_draft(expense_id: Uuid, draft: &DraftSplit) -> Self {
        Self {
            id: Uuid::new_v4(),
            expense_id,
            consumer_id: draft.consumer_id,
            responsible_id: draft.responsible_id,
            amount: draft.amount,
            status: SplitStatus::Pending,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "splits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub expense_id: String,
    /// Selection order within the expense.
    pub position: i32,
    pub consumer_id: String,
    pub responsible_id: String,
    pub amount_minor: i64,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Expenses,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_split(split: &Split, position: i32) -> Self {
        Self {
            id: ActiveValue::Set(split.id.to_string()),
            expense_id: ActiveValue::Set(split.expense_id.to_string()),
            position: ActiveValue::Set(position),
            consumer_id: ActiveValue::Set(split.consumer_id.to_string()),
            responsible_id: ActiveValue::Set(split.responsible_id.to_string()),
            amount_minor: ActiveValue::Set(split.amount.cents()),
            status: ActiveValue::Set(split.status.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for Split {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "split")?,
            expense_id: parse_uuid(&model.expense_id, "expense")?,
            consumer_id: parse_uuid(&model.consumer_id, "consumer")?,
            responsible_id: parse_uuid(&model.responsible_id, "responsible")?,
            amount: MoneyCents::new(model.amount_minor),
            status: SplitStatus::try_from(model.status.as_str())?,
        })
    }
}
