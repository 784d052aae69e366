use crate::{
    ConnectionSource, PostgresConnection, PostgresConverter, PostgresData, PostgresDataDecoder,
    PostgresDataEncoder, PostgresOutput, PostgresSqlWriter,
};
use deadpool_postgres::Pool;
use fluent_core::{
    Database, DatabaseContext, DatabaseEnum, DatabaseQuery, DatabaseSchema, EnumAction, Error,
    Result, SqlExpression, SqlQuery, SqlWriter, TransactionControl,
    future::BoxFuture,
    stream::StreamExt,
    truncate_long,
};
use std::{borrow::Cow, fmt, mem, ops::Deref, pin::pin, sync::Arc};

/// Services shared by every handle created by one driver.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub writer: PostgresSqlWriter,
    pub converter: PostgresConverter,
    pub encoder: PostgresDataEncoder,
    pub decoder: PostgresDataDecoder,
    /// Level of the record logging every statement.
    pub sql_log_level: log::Level,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            writer: PostgresSqlWriter::new(),
            converter: PostgresConverter::default(),
            encoder: PostgresDataEncoder::default(),
            decoder: PostgresDataDecoder::default(),
            sql_log_level: log::Level::Debug,
        }
    }
}

enum Lease<C> {
    Owned(C),
    Pinned(Arc<C>),
}

impl<C> Deref for Lease<C> {
    type Target = C;

    fn deref(&self) -> &C {
        match self {
            Lease::Owned(v) => v,
            Lease::Pinned(v) => v,
        }
    }
}

/// Rolls back a transaction whose future was dropped between BEGIN and the end of COMMIT or ROLLBACK.
///
/// The connection is kept out of the pool until the ROLLBACK has run.
struct RollbackOnDrop<C: PostgresConnection + 'static> {
    connection: Option<Arc<C>>,
    sql: String,
    logger: Cow<'static, str>,
}

impl<C: PostgresConnection + 'static> RollbackOnDrop<C> {
    fn disarm(&mut self) {
        self.connection = None;
    }
}

impl<C: PostgresConnection + 'static> Drop for RollbackOnDrop<C> {
    fn drop(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };
        let sql = mem::take(&mut self.sql);
        let logger = mem::take(&mut self.logger);
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                log::warn!(target: &*logger, "Transaction dropped before completing, rolling back");
                runtime.spawn(async move {
                    if let Err(e) = connection.simple_query(&sql).await {
                        log::error!(target: &*logger, "{}\nWhile running:\n{}", e, sql);
                    }
                });
            }
            Err(..) => log::error!(
                target: &*logger,
                "Transaction dropped outside of a runtime, the connection is left inside it"
            ),
        }
    }
}

/// Handle running the operations of the ORM on PostgreSQL.
///
/// Outside a transaction every operation borrows its own connection from the
/// source and gives it back when done. Handles passed to the closures of
/// [`Database::transaction`] and [`Database::with_connection`] are pinned to
/// one connection instead.
pub struct PostgresDatabase<S: ConnectionSource = Pool> {
    source: S,
    pinned: Option<Arc<S::Connection>>,
    settings: Arc<DatabaseSettings>,
    context: DatabaseContext,
    in_transaction: bool,
}

impl<S: ConnectionSource> PostgresDatabase<S> {
    pub fn new(source: S, settings: Arc<DatabaseSettings>, context: DatabaseContext) -> Self {
        Self {
            source,
            pinned: None,
            settings,
            context,
            in_transaction: false,
        }
    }

    pub fn settings(&self) -> &DatabaseSettings {
        &self.settings
    }

    fn pinned_to(&self, connection: Arc<S::Connection>, in_transaction: bool) -> Self {
        Self {
            source: self.source.clone(),
            pinned: Some(connection),
            settings: self.settings.clone(),
            context: self.context.clone(),
            in_transaction,
        }
    }

    async fn lease(&self) -> Result<Lease<S::Connection>> {
        Ok(match &self.pinned {
            Some(connection) => Lease::Pinned(connection.clone()),
            None => Lease::Owned(self.source.acquire().await?),
        })
    }

    async fn pin(&self) -> Result<Arc<S::Connection>> {
        Ok(match &self.pinned {
            Some(connection) => connection.clone(),
            None => Arc::new(self.source.acquire().await?),
        })
    }

    fn logger(&self) -> &str {
        &self.context.logger
    }

    fn log_sql(&self, sql: &str) {
        log::log!(
            target: self.logger(),
            self.settings.sql_log_level,
            "{}",
            truncate_long!(sql)
        );
    }

    fn report(&self, error: Error, sql: &str) -> Error {
        log::error!(
            target: self.logger(),
            "{}\nWhile running:\n{}",
            error,
            truncate_long!(sql)
        );
        error
    }

    fn encode_binds(&self, query: &SqlQuery) -> Result<Vec<PostgresData>> {
        query
            .binds
            .iter()
            .map(|v| self.settings.encoder.encode(v))
            .collect::<Result<_>>()
            .map_err(|e| self.report(e, &query.sql))
    }

    /// Runs a statement that must not produce rows.
    async fn run_statement(
        &self,
        connection: &S::Connection,
        expression: &SqlExpression,
    ) -> Result<()> {
        let query = self.settings.writer.serialize(expression);
        self.log_sql(&query.sql);
        let rows = if query.binds.is_empty() {
            connection
                .simple_query(&query.sql)
                .await
                .map_err(|e| self.report(e, &query.sql))?
        } else {
            let binds = self.encode_binds(&query)?;
            let mut stream = pin!(connection.query(&query.sql, &binds));
            let mut rows = 0;
            while let Some(row) = stream.next().await {
                row.map_err(|e| self.report(e, &query.sql))?;
                rows += 1;
            }
            rows
        };
        if rows > 0 {
            return Err(self.report(Error::UnexpectedRow, &query.sql));
        }
        Ok(())
    }

    async fn run_control(
        &self,
        connection: &S::Connection,
        write: fn(&PostgresSqlWriter, &mut String),
    ) -> Result<()> {
        let mut sql = String::new();
        write(&self.settings.writer, &mut sql);
        self.log_sql(&sql);
        connection
            .simple_query(&sql)
            .await
            .map_err(|e| self.report(e, &sql))?;
        Ok(())
    }
}

impl<S: ConnectionSource> fmt::Debug for PostgresDatabase<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("context", &self.context)
            .field("pinned", &self.pinned.is_some())
            .field("in_transaction", &self.in_transaction)
            .finish()
    }
}

impl<S: ConnectionSource> Database for PostgresDatabase<S> {
    type Output = PostgresOutput;

    fn context(&self) -> &DatabaseContext {
        &self.context
    }

    fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    async fn execute_query<F>(&self, query: &DatabaseQuery, mut on_output: F) -> Result<()>
    where
        F: FnMut(Self::Output) -> Result<()> + Send,
    {
        let expression = self.settings.converter.convert_query(query)?;
        let statement = self.settings.writer.serialize(&expression);
        let binds = self.encode_binds(&statement)?;
        let connection = self.lease().await?;
        self.log_sql(&statement.sql);
        let mut stream = pin!(connection.query(&statement.sql, &binds));
        while let Some(row) = stream.next().await {
            let row = row.map_err(|e| self.report(e, &statement.sql))?;
            on_output(PostgresOutput::new(row, self.settings.decoder.clone()))?;
        }
        Ok(())
    }

    async fn execute_schema(&self, schema: &DatabaseSchema) -> Result<()> {
        let expression = self.settings.converter.convert_schema(schema)?;
        let connection = self.lease().await?;
        self.run_statement(&connection, &expression).await
    }

    async fn execute_enum(&self, value: &DatabaseEnum) -> Result<()> {
        if value.action == EnumAction::Update && !value.delete_cases.is_empty() {
            let error = Error::Unsupported(format!(
                "PostgreSQL cannot delete the cases {:?} of enum `{}`, they are kept",
                value.delete_cases, value.name
            ));
            log::warn!(target: self.logger(), "{}", error);
        }
        let statements = self.settings.converter.convert_enum(value);
        if statements.is_empty() {
            return Ok(());
        }
        let connection = self.lease().await?;
        for statement in &statements {
            self.run_statement(&connection, statement).await?;
        }
        Ok(())
    }

    async fn transaction<T, F>(&self, closure: F) -> Result<T>
    where
        T: Send,
        F: for<'a> FnOnce(&'a Self) -> BoxFuture<'a, Result<T>> + Send,
    {
        if self.in_transaction {
            return closure(self).await;
        }
        let connection = self.pin().await?;
        let mut sql = String::new();
        self.settings.writer.write_transaction_rollback(&mut sql);
        let mut guard = RollbackOnDrop {
            connection: Some(connection.clone()),
            sql,
            logger: self.context.logger.clone(),
        };
        if let Err(error) = self
            .run_control(&connection, PostgresSqlWriter::write_transaction_begin)
            .await
        {
            guard.disarm();
            return Err(error);
        }
        let database = self.pinned_to(connection.clone(), true);
        let result = closure(&database).await;
        drop(database);
        match result {
            Ok(value) => {
                let committed = self
                    .run_control(&connection, PostgresSqlWriter::write_transaction_commit)
                    .await;
                guard.disarm();
                committed.map(|_| value)
            }
            Err(error) => {
                let rolled_back = self
                    .run_control(&connection, PostgresSqlWriter::write_transaction_rollback)
                    .await;
                guard.disarm();
                match rolled_back {
                    Ok(()) => Err(error),
                    Err(rollback) => {
                        log::error!(
                            target: self.logger(),
                            "Rollback failed after: {}",
                            error
                        );
                        Err(Error::Transaction {
                            error: Box::new(error),
                            rollback: Box::new(rollback),
                        })
                    }
                }
            }
        }
    }

    async fn with_connection<T, F>(&self, closure: F) -> Result<T>
    where
        T: Send,
        F: for<'a> FnOnce(&'a Self) -> BoxFuture<'a, Result<T>> + Send,
    {
        if self.pinned.is_some() {
            return closure(self).await;
        }
        let database = self.pinned_to(self.pin().await?, self.in_transaction);
        closure(&database).await
    }
}

impl<S: ConnectionSource> TransactionControl for PostgresDatabase<S> {
    async fn begin_transaction(&self) -> Result<()> {
        let connection = self.lease().await?;
        self.run_control(&connection, PostgresSqlWriter::write_transaction_begin)
            .await
    }

    async fn commit_transaction(&self) -> Result<()> {
        let connection = self.lease().await?;
        self.run_control(&connection, PostgresSqlWriter::write_transaction_commit)
            .await
    }

    async fn rollback_transaction(&self) -> Result<()> {
        let connection = self.lease().await?;
        self.run_control(&connection, PostgresSqlWriter::write_transaction_rollback)
            .await
    }
}
