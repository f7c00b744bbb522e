//! Expense split allocation.
//!
//! A [`Draft`] is the in-memory list of candidate splits a caller builds while
//! composing an expense. It is owned by the caller and handed to
//! [`Engine::submit`](crate::Engine::submit) once finalized; it has no
//! identity until then.
//!
//! Every mutating operation validates first and only then changes the draft,
//! so a failed call leaves it untouched.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Directory, EngineError, MoneyCents, ResultEngine};

/// A not-yet-persisted split.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSplit {
    /// Who benefited.
    pub consumer_id: Uuid,
    /// Who owes `amount`. Differs from `consumer_id` only for proxies.
    pub responsible_id: Uuid,
    pub amount: MoneyCents,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    payer_id: Option<Uuid>,
    splits: Vec<DraftSplit>,
}

impl Draft {
    /// Empty draft. `payer_id` is the fallback responsible party for proxies
    /// without a guardian.
    pub fn new(payer_id: Option<Uuid>) -> Self {
        Self {
            payer_id,
            splits: Vec::new(),
        }
    }

    /// Draft with the payer already consuming their own share.
    pub fn for_payer(payer_id: Uuid, directory: &Directory) -> ResultEngine<Self> {
        let mut draft = Self::new(Some(payer_id));
        draft.select(payer_id, directory)?;
        Ok(draft)
    }

    pub fn payer(&self) -> Option<Uuid> {
        self.payer_id
    }

    /// Splits in selection order.
    pub fn splits(&self) -> &[DraftSplit] {
        &self.splits
    }

    pub fn into_splits(self) -> Vec<DraftSplit> {
        self.splits
    }

    pub fn len(&self) -> usize {
        self.splits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    pub fn contains(&self, consumer_id: Uuid) -> bool {
        self.position(consumer_id).is_some()
    }

    /// Sum of the current split amounts.
    pub fn total(&self) -> MoneyCents {
        self.splits.iter().map(|split| split.amount).sum()
    }

    fn position(&self, consumer_id: Uuid) -> Option<usize> {
        self.splits
            .iter()
            .position(|split| split.consumer_id == consumer_id)
    }

    /// Adds `consumer_id` to the draft with a zero amount.
    ///
    /// Selecting a consumer twice is a no-op and returns the existing split.
    /// Proxies owe through their guardian, or through the payer when they
    /// have none; a proxy with neither is rejected. Whoever ends up owing a
    /// proxy's share must be a non-proxy member of the directory.
    pub fn select(
        &mut self,
        consumer_id: Uuid,
        directory: &Directory,
    ) -> ResultEngine<&DraftSplit> {
        let member = directory.require(consumer_id)?;
        if let Some(index) = self.position(consumer_id) {
            return Ok(&self.splits[index]);
        }

        let responsible_id = member
            .default_responsible(self.payer_id)
            .ok_or_else(|| EngineError::UnknownMember("payer".to_string()))?;
        if member.is_proxy {
            directory.require_responsible(responsible_id)?;
        }

        self.splits.push(DraftSplit {
            consumer_id,
            responsible_id,
            amount: MoneyCents::ZERO,
        });
        Ok(&self.splits[self.splits.len() - 1])
    }

    /// Removes `consumer_id` from the draft, if present.
    pub fn deselect(&mut self, consumer_id: Uuid) -> Option<DraftSplit> {
        self.position(consumer_id)
            .map(|index| self.splits.remove(index))
    }

    /// Splits `total` evenly across the draft.
    ///
    /// Leftover cents go one each to the earliest selected consumers. A
    /// negative total is treated as zero.
    pub fn redistribute(&mut self, total: MoneyCents) {
        let total = if total.is_negative() {
            MoneyCents::ZERO
        } else {
            total
        };
        let amounts = split_evenly(total, self.splits.len());
        for (split, amount) in self.splits.iter_mut().zip(amounts) {
            split.amount = amount;
        }
    }

    /// Overrides who owes a proxy consumer's share.
    ///
    /// Only proxies can be re-assigned, and only to an existing non-proxy
    /// member.
    pub fn set_responsible_party(
        &mut self,
        consumer_id: Uuid,
        responsible_id: Uuid,
        directory: &Directory,
    ) -> ResultEngine<()> {
        let index = self
            .position(consumer_id)
            .ok_or_else(|| EngineError::UnknownMember(consumer_id.to_string()))?;

        let consumer = directory.require(consumer_id)?;
        if !consumer.is_proxy {
            return Err(EngineError::InvalidResponsibleParty(format!(
                "{} pays for themselves",
                consumer.display_name
            )));
        }
        directory.require_responsible(responsible_id)?;

        self.splits[index].responsible_id = responsible_id;
        Ok(())
    }
}

/// Splits `total` into `parts` amounts that sum exactly to `total`.
///
/// Every part gets `total / parts` cents; the first `total % parts` parts get
/// one cent more. Returns an empty vector when `parts` is 0.
pub fn split_evenly(total: MoneyCents, parts: usize) -> Vec<MoneyCents> {
    let Ok(count) = i64::try_from(parts) else {
        return Vec::new();
    };
    if count == 0 {
        return Vec::new();
    }

    let cents = total.cents().max(0);
    let base = cents / count;
    let residual = cents % count;

    (0..count)
        .map(|index| MoneyCents::new(if index < residual { base + 1 } else { base }))
        .collect()
}
