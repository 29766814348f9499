//! Error types for `vaxchain-core`.

use thiserror::Error;

use crate::command::Function;

/// A ledger backend error, erased so the core stays backend-agnostic.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which half of the ledger contract failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum StorageOp {
  Get,
  Put,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("incorrect number of arguments for {function}: expected {expected}, got {got}")]
  Arity {
    function: Function,
    expected: usize,
    got:      usize,
  },

  /// `position` is 1-based, matching how callers count their arguments.
  #[error("{field} on argument {position} {reason}")]
  Validation {
    field:    &'static str,
    position: usize,
    reason:   String,
  },

  #[error("failed to {op} state for {key}: {source}")]
  Storage {
    op:     StorageOp,
    key:    String,
    #[source]
    source: BoxError,
  },

  /// The write-back step of an append failed.
  #[error("failed to append to repository {key}: {source}")]
  Append {
    key:    String,
    #[source]
    source: BoxError,
  },

  #[error("gave up appending to repository {key} after {attempts} conflicting writes")]
  Contention { key: String, attempts: u32 },

  #[error("repository {key} holds data that is not a valid container: {source}")]
  Corruption {
    key:    String,
    #[source]
    source: serde_json::Error,
  },

  #[error("received unknown function invocation: {0}")]
  UnknownCommand(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  pub(crate) fn storage<E>(op: StorageOp, key: &str, source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Storage { op, key: key.to_owned(), source: Box::new(source) }
  }

  pub(crate) fn append<E>(key: &str, source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Append { key: key.to_owned(), source: Box::new(source) }
  }

  /// True for errors caused by the caller's input rather than the ledger.
  pub fn is_rejection(&self) -> bool {
    matches!(
      self,
      Self::Arity { .. } | Self::Validation { .. } | Self::UnknownCommand(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
