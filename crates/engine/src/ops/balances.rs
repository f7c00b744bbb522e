use std::collections::BTreeMap;

use sea_orm::{QueryFilter, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, ResultEngine, SplitStatus, expenses, splits, util::parse_uuid,
};

use super::Engine;

/// What one member owes another across all pending splits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub debtor_id: Uuid,
    pub creditor_id: Uuid,
    pub amount: MoneyCents,
}

impl Engine {
    /// Aggregates pending splits into debts from responsible party to payer.
    ///
    /// Shares a payer is responsible for on their own expense are skipped.
    /// Debts are not netted against each other.
    pub async fn outstanding_debts(&self) -> ResultEngine<Vec<Debt>> {
        let rows = splits::Entity::find()
            .filter(splits::Column::Status.eq(SplitStatus::Pending.as_str()))
            .find_also_related(expenses::Entity)
            .all(&self.database)
            .await?;

        let mut totals: BTreeMap<(Uuid, Uuid), MoneyCents> = BTreeMap::new();
        for (split, expense) in rows {
            let Some(expense) = expense else {
                continue;
            };
            let debtor_id = parse_uuid(&split.responsible_id, "responsible")?;
            let creditor_id = parse_uuid(&expense.payer_id, "payer")?;
            if debtor_id == creditor_id {
                continue;
            }
            let owed = totals.entry((debtor_id, creditor_id)).or_default();
            *owed = owed
                .checked_add(MoneyCents::new(split.amount_minor))
                .ok_or_else(|| {
                    EngineError::InvalidAmount(format!(
                        "debt of {debtor_id} to {creditor_id} is too large"
                    ))
                })?;
        }

        Ok(totals
            .into_iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|((debtor_id, creditor_id), amount)| Debt {
                debtor_id,
                creditor_id,
                amount,
            })
            .collect())
    }
}
