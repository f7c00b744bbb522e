//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use uuid::Uuid;

use crate::{Draft, DraftSplit, MoneyCents};

/// Record a new expense together with its splits.
#[derive(Clone, Debug)]
pub struct SubmitExpenseCmd {
    pub description: String,
    pub total: MoneyCents,
    pub payer_id: Option<Uuid>,
    pub splits: Vec<DraftSplit>,
}

impl SubmitExpenseCmd {
    #[must_use]
    pub fn new(description: impl Into<String>, total: MoneyCents, payer_id: Uuid) -> Self {
        Self {
            description: description.into(),
            total,
            payer_id: Some(payer_id),
            splits: Vec::new(),
        }
    }

    /// Builds the command from a finalized draft, taking the payer from it.
    #[must_use]
    pub fn from_draft(description: impl Into<String>, total: MoneyCents, draft: Draft) -> Self {
        Self {
            description: description.into(),
            total,
            payer_id: draft.payer(),
            splits: draft.into_splits(),
        }
    }

    #[must_use]
    pub fn splits(mut self, splits: Vec<DraftSplit>) -> Self {
        self.splits = splits;
        self
    }
}

/// Register a member in the directory.
#[derive(Clone, Debug)]
pub struct NewMemberCmd {
    pub display_name: String,
    pub is_admin: bool,
    pub is_proxy: bool,
    pub guardian_id: Option<Uuid>,
}

impl NewMemberCmd {
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            is_admin: false,
            is_proxy: false,
            guardian_id: None,
        }
    }

    /// A proxy member, optionally with a guardian.
    #[must_use]
    pub fn proxy(display_name: impl Into<String>, guardian_id: Option<Uuid>) -> Self {
        Self {
            is_proxy: true,
            guardian_id,
            ..Self::new(display_name)
        }
    }

    #[must_use]
    pub fn admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}
