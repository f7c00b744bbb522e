use std::collections::HashSet;

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    DraftSplit, EngineError, Expense, MoneyCents, ResultEngine, Split, SubmitExpenseCmd, expenses,
    splits, util::normalize_required_text,
};

use super::{Engine, members::load_directory, with_tx};

/// A submission that passed every check that needs no database access.
#[derive(Debug)]
struct CheckedSubmission {
    description: String,
    total: MoneyCents,
    payer_id: Uuid,
    splits: Vec<DraftSplit>,
}

fn check_submission(cmd: SubmitExpenseCmd) -> ResultEngine<CheckedSubmission> {
    let SubmitExpenseCmd {
        description,
        total,
        payer_id,
        splits,
    } = cmd;

    let description = normalize_required_text(&description, "description")?;
    if !total.is_positive() {
        return Err(EngineError::Validation("total must be > 0".to_string()));
    }
    let payer_id =
        payer_id.ok_or_else(|| EngineError::Validation("payer is required".to_string()))?;
    if splits.is_empty() {
        return Err(EngineError::Validation(
            "at least one consumer is required".to_string(),
        ));
    }

    let mut consumers = HashSet::with_capacity(splits.len());
    let mut sum = MoneyCents::ZERO;
    for split in &splits {
        if !consumers.insert(split.consumer_id) {
            return Err(EngineError::Validation(format!(
                "consumer {} selected twice",
                split.consumer_id
            )));
        }
        if split.amount.is_negative() {
            return Err(EngineError::Validation(
                "split amount must be >= 0".to_string(),
            ));
        }
        sum = sum
            .checked_add(split.amount)
            .ok_or_else(|| EngineError::Validation("split amounts overflow".to_string()))?;
    }
    if sum != total {
        return Err(EngineError::Validation(format!(
            "splits sum to {sum}, expected {total}"
        )));
    }

    Ok(CheckedSubmission {
        description,
        total,
        payer_id,
        splits,
    })
}

fn into_expense(
    model: expenses::Model,
    mut split_models: Vec<splits::Model>,
) -> ResultEngine<Expense> {
    let mut expense = Expense::try_from(model)?;
    split_models.sort_by_key(|split| split.position);
    expense.splits = split_models
        .into_iter()
        .map(Split::try_from)
        .collect::<ResultEngine<_>>()?;
    Ok(expense)
}

impl Engine {
    /// Records an expense and all of its splits atomically.
    ///
    /// The command is validated before touching the store, then members are
    /// re-checked against the directory inside the transaction. Either the
    /// expense and every split are committed, or nothing is.
    pub async fn submit(&self, cmd: SubmitExpenseCmd) -> ResultEngine<Uuid> {
        let CheckedSubmission {
            description,
            total,
            payer_id,
            splits: drafts,
        } = check_submission(cmd)?;

        with_tx!(self, |db_tx| {
            let directory = load_directory(&db_tx).await?;
            directory.require(payer_id)?;
            for draft in &drafts {
                let consumer = directory.require(draft.consumer_id)?;
                directory.require_responsible(draft.responsible_id)?;
                if !consumer.is_proxy && draft.responsible_id != consumer.id {
                    return Err(EngineError::InvalidResponsibleParty(format!(
                        "{} pays for themselves",
                        consumer.display_name
                    )));
                }
            }

            let expense = Expense::new(description, total, payer_id);
            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;

            let split_models = drafts
                .iter()
                .enumerate()
                .map(|(position, draft)| {
                    let position = i32::try_from(position)
                        .map_err(|_| EngineError::Validation("too many splits".to_string()))?;
                    let split = Split::from_draft(expense.id, draft);
                    Ok(splits::ActiveModel::from_split(&split, position))
                })
                .collect::<ResultEngine<Vec<_>>>()?;
            splits::Entity::insert_many(split_models).exec(&db_tx).await?;

            Ok(expense.id)
        })
    }

    /// Returns an expense with its splits in selection order.
    pub async fn expense(&self, expense_id: Uuid) -> ResultEngine<Expense> {
        let model = expenses::Entity::find_by_id(expense_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(expense_id.to_string()))?;
        let split_models = model
            .find_related(splits::Entity)
            .order_by_asc(splits::Column::Position)
            .all(&self.database)
            .await?;
        into_expense(model, split_models)
    }

    /// Lists every expense, newest first.
    pub async fn list_expenses(&self) -> ResultEngine<Vec<Expense>> {
        let rows = expenses::Entity::find()
            .find_with_related(splits::Entity)
            .order_by_desc(expenses::Column::CreatedAt)
            .order_by_asc(expenses::Column::Id)
            .all(&self.database)
            .await?;
        rows.into_iter()
            .map(|(model, split_models)| into_expense(model, split_models))
            .collect()
    }

    /// Lists the expenses paid by `payer_id`, newest first.
    pub async fn expenses_paid_by(&self, payer_id: Uuid) -> ResultEngine<Vec<Expense>> {
        let rows = expenses::Entity::find()
            .filter(expenses::Column::PayerId.eq(payer_id.to_string()))
            .find_with_related(splits::Entity)
            .order_by_desc(expenses::Column::CreatedAt)
            .order_by_asc(expenses::Column::Id)
            .all(&self.database)
            .await?;
        rows.into_iter()
            .map(|(model, split_models)| into_expense(model, split_models))
            .collect()
    }
}
