use std::{borrow::Cow, error::Error as StdError};
use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Classification of a failure reported by the database or by its connection.
///
/// The three predicates are independent, a driver maps its native error codes so
/// that each concrete error answers `true` to at most one of them.
pub trait DatabaseError: StdError + Send + Sync + 'static {
    fn is_syntax_error(&self) -> bool;
    fn is_constraint_failure(&self) -> bool;
    fn is_connection_closed(&self) -> bool;
}

#[derive(Debug, Error)]
pub enum Error {
    /// The abstract query or schema cannot be expressed as SQL.
    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Could not encode `{ty}`: {source}")]
    Encode {
        ty: Cow<'static, str>,
        #[source]
        source: BoxError,
    },

    #[error("Could not decode `{ty}`: {source}")]
    Decode {
        ty: Cow<'static, str>,
        #[source]
        source: BoxError,
    },

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// A statement that must not produce rows returned one.
    #[error("Statement returned a row while none was expected")]
    UnexpectedRow,

    #[error("{0}")]
    Database(Box<dyn DatabaseError>),

    /// The transaction body failed and the following ROLLBACK failed too.
    #[error("{error} (rollback failed: {rollback})")]
    Transaction {
        #[source]
        error: Box<Error>,
        rollback: Box<Error>,
    },
}

impl Error {
    pub fn encode(ty: impl Into<Cow<'static, str>>, source: impl Into<BoxError>) -> Self {
        Error::Encode {
            ty: ty.into(),
            source: source.into(),
        }
    }

    pub fn decode(ty: impl Into<Cow<'static, str>>, source: impl Into<BoxError>) -> Self {
        Error::Decode {
            ty: ty.into(),
            source: source.into(),
        }
    }

    pub fn database(error: impl DatabaseError) -> Self {
        Error::Database(Box::new(error))
    }

    /// The error that caused the failure, unwrapping a failed rollback.
    pub fn primary(&self) -> &Error {
        match self {
            Error::Transaction { error, .. } => error.primary(),
            _ => self,
        }
    }

    /// The rollback failure attached to a failed transaction, if any.
    pub fn rollback_error(&self) -> Option<&Error> {
        match self {
            Error::Transaction { rollback, .. } => Some(rollback),
            _ => None,
        }
    }

    /// Downcast the driver error carried by this error.
    pub fn database_error<T: DatabaseError>(&self) -> Option<&T> {
        match self.primary() {
            Error::Database(error) => {
                let error: &(dyn StdError + 'static) = error.as_ref();
                error.downcast_ref::<T>()
            }
            _ => None,
        }
    }
}

impl DatabaseError for Error {
    fn is_syntax_error(&self) -> bool {
        match self.primary() {
            Error::Database(e) => e.is_syntax_error(),
            _ => false,
        }
    }

    fn is_constraint_failure(&self) -> bool {
        match self.primary() {
            Error::Database(e) => e.is_constraint_failure(),
            _ => false,
        }
    }

    fn is_connection_closed(&self) -> bool {
        match self.primary() {
            Error::Database(e) => e.is_connection_closed(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
