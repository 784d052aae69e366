use crate::{Database, DatabaseContext, SqlWriter, TransactionControl};

/// Entry point of a database backend.
pub trait Driver: Send + Sync {
    /// Name of the backend.
    const NAME: &'static str;
    type SqlWriter: SqlWriter;
    type Database: Database + TransactionControl;

    fn sql_writer(&self) -> Self::SqlWriter;

    /// Fresh handle, outside any transaction.
    fn make_database(&self, context: DatabaseContext) -> Self::Database;

    /// Releases every pooled connection, later operations fail as connection closed.
    fn shutdown(&self);
}
