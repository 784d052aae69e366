use crate::{AsValue, DatabaseEnum, DatabaseQuery, DatabaseSchema, Result, Value};
use futures::future::BoxFuture;
use std::{borrow::Cow, fmt::Debug, future::Future};

/// Information about the caller a handle is created for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseContext {
    /// Target used for every log record the handle emits.
    pub logger: Cow<'static, str>,
    /// Execution context (event loop) the caller runs on, selects the pool to borrow from.
    pub affinity: Option<usize>,
}

impl DatabaseContext {
    pub fn new(logger: impl Into<Cow<'static, str>>) -> Self {
        Self {
            logger: logger.into(),
            affinity: None,
        }
    }

    pub fn with_affinity(mut self, affinity: usize) -> Self {
        self.affinity = Some(affinity);
        self
    }
}

impl Default for DatabaseContext {
    fn default() -> Self {
        Self::new("fluent")
    }
}

/// One row returned by the database.
///
/// Selected fields are aliased `<schema>_<field>`, [`DatabaseOutput::schema`]
/// returns a view reading the fields of another schema joined in the same row.
pub trait DatabaseOutput: Debug + Send {
    fn schema(&self, schema: &str) -> Self
    where
        Self: Sized;

    fn contains(&self, key: &str) -> bool;

    fn decode_value(&self, key: &str) -> Result<Value>;

    fn decode_nil(&self, key: &str) -> Result<bool> {
        Ok(self.decode_value(key)?.is_null())
    }

    fn decode<T: AsValue>(&self, key: &str) -> Result<T>
    where
        Self: Sized,
    {
        T::try_from_value(self.decode_value(key)?)
    }
}

/// Handle executing the abstract operations of the ORM.
///
/// A handle is either outside a transaction, borrowing a connection for every
/// operation, or inside one, bound to the connection the transaction started on.
pub trait Database: Send + Sync {
    type Output: DatabaseOutput;

    fn context(&self) -> &DatabaseContext;

    fn in_transaction(&self) -> bool;

    /// Runs the query calling `on_output` for every row, in the order the server returns them.
    fn execute_query<F>(
        &self,
        query: &DatabaseQuery,
        on_output: F,
    ) -> impl Future<Output = Result<()>> + Send
    where
        F: FnMut(Self::Output) -> Result<()> + Send;

    fn execute_schema(&self, schema: &DatabaseSchema) -> impl Future<Output = Result<()>> + Send;

    fn execute_enum(&self, value: &DatabaseEnum) -> impl Future<Output = Result<()>> + Send;

    /// Runs `closure` inside a transaction, committing on success and rolling back on error.
    ///
    /// When the handle is already inside a transaction the closure runs directly on it.
    fn transaction<T, F>(&self, closure: F) -> impl Future<Output = Result<T>> + Send
    where
        T: Send,
        F: for<'a> FnOnce(&'a Self) -> BoxFuture<'a, Result<T>> + Send;

    /// Runs `closure` with a handle pinned to one connection, without opening a transaction.
    fn with_connection<T, F>(&self, closure: F) -> impl Future<Output = Result<T>> + Send
    where
        T: Send,
        F: for<'a> FnOnce(&'a Self) -> BoxFuture<'a, Result<T>> + Send;

    /// Runs the query collecting every row.
    fn fetch_all(
        &self,
        query: &DatabaseQuery,
    ) -> impl Future<Output = Result<Vec<Self::Output>>> + Send {
        async move {
            let mut rows = Vec::new();
            self.execute_query(query, |row| {
                rows.push(row);
                Ok(())
            })
            .await?;
            Ok(rows)
        }
    }
}

/// Low level transaction statements, each one issued on its own.
///
/// These do not change [`Database::in_transaction`], the caller keeps using the
/// same handle between begin and commit.
pub trait TransactionControl: Send + Sync {
    fn begin_transaction(&self) -> impl Future<Output = Result<()>> + Send;
    fn commit_transaction(&self) -> impl Future<Output = Result<()>> + Send;
    fn rollback_transaction(&self) -> impl Future<Output = Result<()>> + Send;
}
