//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`UnknownMember`] thrown when a member id is not in the directory.
//! - [`InvalidResponsibleParty`] thrown when a split would be owed by a proxy,
//!   by a missing member, or when a non-proxy consumer is re-assigned.
//! - [`Validation`] thrown when a submission is malformed. Nothing is written.
//! - [`KeyNotFound`] thrown when a stored record is not found.
//! - [`Persistence`] thrown when the store fails. The transaction has already
//!   been rolled back.
//!
//!  [`UnknownMember`]: EngineError::UnknownMember
//!  [`InvalidResponsibleParty`]: EngineError::InvalidResponsibleParty
//!  [`Validation`]: EngineError::Validation
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Persistence`]: EngineError::Persistence
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" member not found!")]
    UnknownMember(String),
    #[error("Invalid responsible party: {0}")]
    InvalidResponsibleParty(String),
    #[error("Invalid expense: {0}")]
    Validation(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error(transparent)]
    Persistence(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UnknownMember(a), Self::UnknownMember(b)) => a == b,
            (Self::InvalidResponsibleParty(a), Self::InvalidResponsibleParty(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Persistence(a), Self::Persistence(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
