//! Shared expense engine.
//!
//! The engine turns "who paid, how much, who consumed" into per-member
//! obligations that always add up to the expense total:
//!
//! - [`Directory`] is a read-only view over the group's members.
//! - [`Draft`] is the caller-owned allocation being edited (select consumers,
//!   split the total, re-assign proxies).
//! - [`Engine::submit`] commits a finalized draft as one [`Expense`] and its
//!   [`Split`]s in a single transaction.

pub use allocation::{Draft, DraftSplit, split_evenly};
pub use commands::{NewMemberCmd, SubmitExpenseCmd};
pub use error::EngineError;
pub use expenses::{Expense, ExpenseStatus};
pub use members::{Directory, Member};
pub use money::MoneyCents;
pub use ops::{Debt, Engine, EngineBuilder};
pub use splits::{Split, SplitStatus};

mod allocation;
mod commands;
mod error;
mod expenses;
mod members;
mod money;
mod ops;
mod splits;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
