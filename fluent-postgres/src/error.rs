use deadpool_postgres::PoolError;
use fluent_core::DatabaseError;
use thiserror::Error;
use tokio_postgres::error::SqlState;

/// Failure reported by the server or by the connection pool.
///
/// The original error is kept as it is, the classification is exposed through
/// [`DatabaseError`].
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error(transparent)]
    Server(#[from] tokio_postgres::Error),
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Portable category of a [`PostgresError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Syntax,
    Constraint,
    ConnectionClosed,
    Other,
}

static SYNTAX_ERRORS: &[SqlState] = &[
    SqlState::SYNTAX_ERROR_OR_ACCESS_RULE_VIOLATION,
    SqlState::SYNTAX_ERROR,
    SqlState::INSUFFICIENT_PRIVILEGE,
    SqlState::CANNOT_COERCE,
    SqlState::GROUPING_ERROR,
    SqlState::WINDOWING_ERROR,
    SqlState::INVALID_RECURSION,
    SqlState::INVALID_FOREIGN_KEY,
    SqlState::INVALID_NAME,
    SqlState::NAME_TOO_LONG,
    SqlState::RESERVED_NAME,
    SqlState::DATATYPE_MISMATCH,
    SqlState::INDETERMINATE_DATATYPE,
    SqlState::COLLATION_MISMATCH,
    SqlState::INDETERMINATE_COLLATION,
    SqlState::WRONG_OBJECT_TYPE,
    SqlState::UNDEFINED_COLUMN,
    SqlState::UNDEFINED_FUNCTION,
    SqlState::UNDEFINED_TABLE,
    SqlState::UNDEFINED_PARAMETER,
    SqlState::UNDEFINED_OBJECT,
    SqlState::DUPLICATE_COLUMN,
    SqlState::DUPLICATE_CURSOR,
    SqlState::DUPLICATE_DATABASE,
    SqlState::DUPLICATE_FUNCTION,
    SqlState::DUPLICATE_PSTATEMENT,
    SqlState::DUPLICATE_SCHEMA,
    SqlState::DUPLICATE_TABLE,
    SqlState::DUPLICATE_ALIAS,
    SqlState::DUPLICATE_OBJECT,
    SqlState::AMBIGUOUS_COLUMN,
    SqlState::AMBIGUOUS_FUNCTION,
    SqlState::AMBIGUOUS_PARAMETER,
    SqlState::AMBIGUOUS_ALIAS,
    SqlState::INVALID_COLUMN_REFERENCE,
    SqlState::INVALID_COLUMN_DEFINITION,
    SqlState::INVALID_CURSOR_DEFINITION,
    SqlState::INVALID_DATABASE_DEFINITION,
    SqlState::INVALID_FUNCTION_DEFINITION,
    SqlState::INVALID_PSTATEMENT_DEFINITION,
    SqlState::INVALID_SCHEMA_DEFINITION,
    SqlState::INVALID_TABLE_DEFINITION,
    SqlState::INVALID_OBJECT_DEFINITION,
];

static CONSTRAINT_ERRORS: &[SqlState] = &[
    SqlState::INTEGRITY_CONSTRAINT_VIOLATION,
    SqlState::RESTRICT_VIOLATION,
    SqlState::NOT_NULL_VIOLATION,
    SqlState::FOREIGN_KEY_VIOLATION,
    SqlState::UNIQUE_VIOLATION,
    SqlState::CHECK_VIOLATION,
    SqlState::EXCLUSION_VIOLATION,
];

impl ErrorClass {
    pub fn from_code(code: &SqlState) -> Self {
        if SYNTAX_ERRORS.contains(code) {
            ErrorClass::Syntax
        } else if CONSTRAINT_ERRORS.contains(code) {
            ErrorClass::Constraint
        } else {
            ErrorClass::Other
        }
    }
}

impl PostgresError {
    fn server(&self) -> Option<&tokio_postgres::Error> {
        match self {
            PostgresError::Server(e) | PostgresError::Pool(PoolError::Backend(e)) => Some(e),
            PostgresError::Pool(..) => None,
        }
    }

    /// SQLSTATE reported by the server.
    pub fn code(&self) -> Option<&SqlState> {
        self.server().and_then(tokio_postgres::Error::code)
    }

    pub fn is_closed(&self) -> bool {
        match self {
            PostgresError::Pool(PoolError::Closed) => true,
            _ => self.server().is_some_and(tokio_postgres::Error::is_closed),
        }
    }

    /// No connection became available within the configured wait timeout.
    pub fn is_pool_timeout(&self) -> bool {
        matches!(self, PostgresError::Pool(PoolError::Timeout(..)))
    }

    pub fn class(&self) -> ErrorClass {
        if self.is_closed() {
            return ErrorClass::ConnectionClosed;
        }
        self.code()
            .map(ErrorClass::from_code)
            .unwrap_or(ErrorClass::Other)
    }
}

impl DatabaseError for PostgresError {
    fn is_syntax_error(&self) -> bool {
        self.class() == ErrorClass::Syntax
    }

    fn is_constraint_failure(&self) -> bool {
        self.class() == ErrorClass::Constraint
    }

    fn is_connection_closed(&self) -> bool {
        self.class() == ErrorClass::ConnectionClosed
    }
}

impl From<PostgresError> for fluent_core::Error {
    fn from(value: PostgresError) -> Self {
        fluent_core::Error::database(value)
    }
}
