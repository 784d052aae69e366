use crate::{ConnectionSource, DatabaseSettings, PostgresDatabase, PostgresSqlWriter};
use deadpool_postgres::Pool;
use fluent_core::{DatabaseContext, Driver};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Entry point of the PostgreSQL backend, one connection source per event loop.
pub struct PostgresDriver<S: ConnectionSource = Pool> {
    sources: Vec<S>,
    settings: Arc<DatabaseSettings>,
    next: AtomicUsize,
}

impl<S: ConnectionSource> PostgresDriver<S> {
    pub fn new(source: S, settings: DatabaseSettings) -> Self {
        Self {
            sources: vec![source],
            settings: Arc::new(settings),
            next: AtomicUsize::new(0),
        }
    }

    /// Adds the source used by one more event loop.
    pub fn with_source(mut self, source: S) -> Self {
        self.sources.push(source);
        self
    }

    pub fn sources(&self) -> &[S] {
        &self.sources
    }

    pub fn settings(&self) -> &DatabaseSettings {
        &self.settings
    }
}

impl<S: ConnectionSource> Driver for PostgresDriver<S> {
    const NAME: &'static str = "postgres";
    type SqlWriter = PostgresSqlWriter;
    type Database = PostgresDatabase<S>;

    fn sql_writer(&self) -> PostgresSqlWriter {
        self.settings.writer
    }

    fn make_database(&self, context: DatabaseContext) -> PostgresDatabase<S> {
        let index = match context.affinity {
            Some(affinity) => affinity,
            None => self.next.fetch_add(1, Ordering::Relaxed),
        } % self.sources.len();
        PostgresDatabase::new(self.sources[index].clone(), self.settings.clone(), context)
    }

    fn shutdown(&self) {
        log::debug!("Closing {} connection pool(s)", self.sources.len());
        for source in &self.sources {
            source.close();
        }
    }
}
