use crate::{PostgresData, PostgresError, PostgresRow};
use async_stream::try_stream;
use deadpool_postgres::{Client, Pool};
use fluent_core::{
    Result,
    stream::{Stream, StreamExt},
};
use std::{future::Future, pin::pin, sync::Arc};
use tokio_postgres::SimpleQueryMessage;

/// One connection to the server.
///
/// Statements issued on the same connection run in issuance order.
pub trait PostgresConnection: Send + Sync {
    /// Runs a parameterized statement, `binds` are sent in the binary format with their own types.
    fn query<'s>(
        &'s self,
        sql: &'s str,
        binds: &'s [PostgresData],
    ) -> impl Stream<Item = Result<PostgresRow>> + Send + 's;

    /// Runs `sql` through the simple query protocol, returning the number of rows produced.
    fn simple_query<'s>(&'s self, sql: &'s str) -> impl Future<Output = Result<usize>> + Send + 's;
}

/// Where connections are borrowed from.
pub trait ConnectionSource: Clone + Send + Sync + 'static {
    type Connection: PostgresConnection + 'static;

    /// Waits for a free connection, failing once the acquisition timeout expires.
    fn acquire(&self) -> impl Future<Output = Result<Self::Connection>> + Send;

    /// Releases every idle connection and makes later acquisitions fail.
    fn close(&self);
}

impl PostgresConnection for Client {
    fn query<'s>(
        &'s self,
        sql: &'s str,
        binds: &'s [PostgresData],
    ) -> impl Stream<Item = Result<PostgresRow>> + Send + 's {
        try_stream! {
            let types = binds.iter().map(|v| v.ty.clone()).collect::<Vec<_>>();
            // Prepared statements are cached per connection
            let statement = self
                .prepare_typed_cached(sql, &types)
                .await
                .map_err(PostgresError::from)?;
            let labels = statement
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect::<Arc<[String]>>();
            let rows = self
                .query_raw(&statement, binds.iter())
                .await
                .map_err(PostgresError::from)?;
            let mut rows = pin!(rows);
            while let Some(row) = rows.next().await {
                let row = row.map_err(PostgresError::from)?;
                let values = (0..row.len())
                    .map(|i| row.try_get::<_, PostgresData>(i))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(PostgresError::from)?;
                yield PostgresRow::new(labels.clone(), values);
            }
        }
    }

    fn simple_query<'s>(&'s self, sql: &'s str) -> impl Future<Output = Result<usize>> + Send + 's {
        async move {
            let messages = tokio_postgres::Client::simple_query(self, sql)
                .await
                .map_err(PostgresError::from)?;
            Ok(messages
                .iter()
                .filter(|v| matches!(v, SimpleQueryMessage::Row(..)))
                .count())
        }
    }
}

impl ConnectionSource for Pool {
    type Connection = Client;

    async fn acquire(&self) -> Result<Client> {
        Ok(self.get().await.map_err(PostgresError::from)?)
    }

    fn close(&self) {
        Pool::close(self)
    }
}
