#[cfg(test)]
mod tests {
    use fluent_core::{
        DataType, Database, DatabaseContext, DatabaseEnum, DatabaseError, DatabaseOutput,
        DatabaseQuery, DatabaseSchema, Driver, Error, QueryAction, QueryValue, Result,
        TransactionControl, Value,
        stream::{self, Stream},
    };
    use fluent_postgres::{
        ConnectionSource, DatabaseSettings, ErrorClass, PostgresConnection, PostgresData,
        PostgresDataEncoder, PostgresDriver, PostgresRow,
    };
    use fluent_tests::{init_logs, silent_logs};
    use std::{
        future::{self, Future},
        sync::{Arc, Mutex},
        time::Duration,
    };

    #[derive(Debug, thiserror::Error)]
    #[error("server refused the statement ({0:?})")]
    struct RefusedError(ErrorClass);

    impl DatabaseError for RefusedError {
        fn is_syntax_error(&self) -> bool {
            self.0 == ErrorClass::Syntax
        }
        fn is_constraint_failure(&self) -> bool {
            self.0 == ErrorClass::Constraint
        }
        fn is_connection_closed(&self) -> bool {
            self.0 == ErrorClass::ConnectionClosed
        }
    }

    #[derive(Default)]
    struct State {
        /// Connection id and statement, in issuance order.
        statements: Vec<(usize, String)>,
        /// Statements starting with one of these prefixes fail.
        failures: Vec<(&'static str, ErrorClass)>,
        rows: Vec<PostgresRow>,
        simple_rows: usize,
        acquired: usize,
        closed: bool,
    }

    #[derive(Clone, Default)]
    struct RecordingSource {
        state: Arc<Mutex<State>>,
    }

    struct RecordingConnection {
        id: usize,
        state: Arc<Mutex<State>>,
    }

    impl RecordingSource {
        fn failing(self, prefix: &'static str, class: ErrorClass) -> Self {
            self.state.lock().unwrap().failures.push((prefix, class));
            self
        }

        fn returning(self, rows: Vec<PostgresRow>) -> Self {
            self.state.lock().unwrap().rows = rows;
            self
        }

        fn statements(&self) -> Vec<String> {
            self.state
                .lock()
                .unwrap()
                .statements
                .iter()
                .map(|(_, sql)| sql.clone())
                .collect()
        }

        fn connections(&self) -> Vec<usize> {
            self.state
                .lock()
                .unwrap()
                .statements
                .iter()
                .map(|(id, _)| *id)
                .collect()
        }

        fn acquired(&self) -> usize {
            self.state.lock().unwrap().acquired
        }
    }

    impl RecordingConnection {
        fn record(&self, sql: &str) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            state.statements.push((self.id, sql.to_string()));
            match state.failures.iter().find(|(v, _)| sql.starts_with(v)) {
                Some((_, class)) => Err(Error::database(RefusedError(*class))),
                None => Ok(()),
            }
        }
    }

    impl PostgresConnection for RecordingConnection {
        fn query<'s>(
            &'s self,
            sql: &'s str,
            _binds: &'s [PostgresData],
        ) -> impl Stream<Item = Result<PostgresRow>> + Send + 's {
            let items = match self.record(sql) {
                Ok(()) => self
                    .state
                    .lock()
                    .unwrap()
                    .rows
                    .iter()
                    .cloned()
                    .map(Ok)
                    .collect(),
                Err(e) => vec![Err(e)],
            };
            stream::iter(items)
        }

        fn simple_query<'s>(
            &'s self,
            sql: &'s str,
        ) -> impl Future<Output = Result<usize>> + Send + 's {
            let result = self
                .record(sql)
                .map(|_| self.state.lock().unwrap().simple_rows);
            future::ready(result)
        }
    }

    impl ConnectionSource for RecordingSource {
        type Connection = RecordingConnection;

        async fn acquire(&self) -> Result<RecordingConnection> {
            let mut state = self.state.lock().unwrap();
            if state.closed {
                return Err(Error::database(RefusedError(ErrorClass::ConnectionClosed)));
            }
            state.acquired += 1;
            Ok(RecordingConnection {
                id: state.acquired,
                state: self.state.clone(),
            })
        }

        fn close(&self) {
            self.state.lock().unwrap().closed = true;
        }
    }

    fn driver(source: &RecordingSource) -> PostgresDriver<RecordingSource> {
        PostgresDriver::new(source.clone(), DatabaseSettings::default())
    }

    fn insert(name: &str) -> DatabaseQuery {
        DatabaseQuery::new("crew")
            .action(QueryAction::Create)
            .input([("name", QueryValue::bind(name.to_string()))])
            .without_id_key()
    }

    fn abort() -> Error {
        Error::Conversion("abort".into())
    }

    #[tokio::test]
    async fn query_rows() {
        init_logs();
        let id = PostgresDataEncoder::default()
            .encode(&Value::Int64(Some(42)))
            .unwrap();
        let source = RecordingSource::default().returning(vec![PostgresRow::new(
            vec!["id".to_string()].into(),
            vec![id],
        )]);
        let database = driver(&source).make_database(DatabaseContext::default());
        let rows = database
            .fetch_all(
                &DatabaseQuery::new("crew")
                    .action(QueryAction::Create)
                    .input([("name", QueryValue::bind("Ripley"))]),
            )
            .await
            .expect("Insert failed");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].decode::<i64>("id").unwrap(), 42);
        assert!(rows[0].decode::<i64>("name").is_err());
        assert_eq!(
            source.statements(),
            ["INSERT INTO \"crew\" (\"name\") VALUES\n($1)\nRETURNING \"id\""]
        );
    }

    #[tokio::test]
    async fn callback_error_stops_the_query() {
        let data = PostgresDataEncoder::default()
            .encode(&Value::Int32(Some(1)))
            .unwrap();
        let row = PostgresRow::new(vec!["n".to_string()].into(), vec![data]);
        let source = RecordingSource::default().returning(vec![row.clone(), row]);
        let database = driver(&source).make_database(DatabaseContext::default());
        let mut calls = 0;
        let result = database
            .execute_query(&DatabaseQuery::new("crew"), |_| {
                calls += 1;
                Err(abort())
            })
            .await;
        assert!(matches!(result, Err(Error::Conversion(..))));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn conversion_errors_skip_the_server() {
        let source = RecordingSource::default();
        let database = driver(&source).make_database(DatabaseContext::default());
        let result = database
            .fetch_all(&DatabaseQuery::new("crew").action(QueryAction::Update))
            .await;
        assert!(matches!(result, Err(Error::Conversion(..))));
        assert_eq!(source.acquired(), 0);
        assert!(source.statements().is_empty());
    }

    async fn rejected<D: Database>(database: &D, query: &DatabaseQuery) -> Error {
        database
            .fetch_all(query)
            .await
            .expect_err("The query must fail")
    }

    #[tokio::test]
    async fn failures_through_any_database() {
        let source = RecordingSource::default().failing("SELECT", ErrorClass::Syntax);
        let database = driver(&source).make_database(DatabaseContext::default());
        let error = silent_logs! { rejected(&database, &DatabaseQuery::new("crew")).await };
        assert!(error.is_syntax_error());
        let update = DatabaseQuery::new("crew").action(QueryAction::Update);
        let error = rejected(&database, &update).await;
        assert!(matches!(error, Error::Conversion(..)));
    }

    #[tokio::test]
    async fn transaction_commits() {
        init_logs();
        let source = RecordingSource::default();
        let database = driver(&source).make_database(DatabaseContext::default());
        assert!(!database.in_transaction());
        let value = database
            .transaction(|db| {
                Box::pin(async move {
                    assert!(db.in_transaction());
                    db.execute_query(&insert("Ripley"), |_| Ok(())).await?;
                    db.execute_query(&insert("Dallas"), |_| Ok(())).await?;
                    Ok(7)
                })
            })
            .await
            .expect("The transaction failed");
        assert_eq!(value, 7);
        assert!(!database.in_transaction());
        let statements = source.statements();
        assert_eq!(statements.len(), 4);
        assert_eq!(statements[0], "BEGIN");
        assert!(statements[1].starts_with("INSERT INTO \"crew\""));
        assert!(statements[2].starts_with("INSERT INTO \"crew\""));
        assert_eq!(statements[3], "COMMIT");
        assert_eq!(source.acquired(), 1);
        assert!(source.connections().iter().all(|v| *v == 1));
    }

    #[tokio::test]
    async fn transaction_rolls_back() {
        let source = RecordingSource::default();
        let database = driver(&source).make_database(DatabaseContext::default());
        let result = database
            .transaction(|db| {
                Box::pin(async move {
                    db.execute_query(&insert("Ash"), |_| Ok(())).await?;
                    Err::<(), _>(abort())
                })
            })
            .await;
        assert!(matches!(result, Err(Error::Conversion(ref v)) if v == "abort"));
        let statements = source.statements();
        assert_eq!(statements.first().map(String::as_str), Some("BEGIN"));
        assert_eq!(statements.last().map(String::as_str), Some("ROLLBACK"));
        assert!(!statements.iter().any(|v| v == "COMMIT"));
    }

    #[tokio::test]
    async fn server_error_rolls_back() {
        let source = RecordingSource::default().failing("INSERT", ErrorClass::Constraint);
        let database = driver(&source).make_database(DatabaseContext::default());
        let result = silent_logs! {
            database
                .transaction(|db| {
                    Box::pin(async move { db.execute_query(&insert("Kane"), |_| Ok(())).await })
                })
                .await
        };
        let error = result.expect_err("The insert must fail");
        assert!(error.is_constraint_failure());
        assert!(error.rollback_error().is_none());
        assert_eq!(source.statements().last().map(String::as_str), Some("ROLLBACK"));
    }

    #[tokio::test]
    async fn failed_rollback_keeps_the_original_error() {
        let source =
            RecordingSource::default().failing("ROLLBACK", ErrorClass::ConnectionClosed);
        let database = driver(&source).make_database(DatabaseContext::default());
        let result = silent_logs! {
            database
                .transaction(|_| Box::pin(async move { Err::<(), _>(abort()) }))
                .await
        };
        let error = result.expect_err("The transaction must fail");
        assert!(matches!(error, Error::Transaction { .. }));
        assert!(matches!(error.primary(), Error::Conversion(v) if v == "abort"));
        assert!(
            error
                .rollback_error()
                .expect("The rollback failure must be attached")
                .is_connection_closed()
        );
        assert!(!error.is_connection_closed());
        assert_eq!(source.statements(), ["BEGIN", "ROLLBACK"]);
    }

    #[tokio::test]
    async fn failed_commit() {
        let source = RecordingSource::default().failing("COMMIT", ErrorClass::Other);
        let database = driver(&source).make_database(DatabaseContext::default());
        let result = silent_logs! {
            database
                .transaction(|_| Box::pin(async move { Ok(()) }))
                .await
        };
        assert!(matches!(result, Err(Error::Database(..))));
        assert_eq!(source.statements(), ["BEGIN", "COMMIT"]);
    }

    #[tokio::test]
    async fn failed_begin() {
        let source = RecordingSource::default().failing("BEGIN", ErrorClass::Other);
        let database = driver(&source).make_database(DatabaseContext::default());
        let mut invoked = false;
        let result = silent_logs! {
            database
                .transaction(|_| {
                    invoked = true;
                    Box::pin(async move { Ok(()) })
                })
                .await
        };
        assert!(result.is_err());
        assert!(!invoked);
        assert_eq!(source.statements(), ["BEGIN"]);
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back() {
        let source = RecordingSource::default();
        let database = driver(&source).make_database(DatabaseContext::default());
        let result = silent_logs! {
            tokio::time::timeout(
                Duration::from_millis(50),
                database.transaction(|db| {
                    Box::pin(async move {
                        db.execute_query(&insert("Kane"), |_| Ok(())).await?;
                        future::pending::<Result<()>>().await
                    })
                }),
            )
            .await
        };
        assert!(result.is_err());
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        let statements = source.statements();
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0], "BEGIN");
        assert!(statements[1].starts_with("INSERT INTO \"crew\""));
        assert_eq!(statements[2], "ROLLBACK");
        assert_eq!(source.connections(), [1, 1, 1]);
    }

    #[tokio::test]
    async fn completed_transactions_leave_nothing_behind() {
        let source = RecordingSource::default();
        let database = driver(&source).make_database(DatabaseContext::default());
        database
            .transaction(|_| Box::pin(async move { Ok(()) }))
            .await
            .expect("The transaction failed");
        let _ = silent_logs! {
            database
                .transaction(|_| Box::pin(async move { Err::<(), _>(abort()) }))
                .await
        };
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(source.statements(), ["BEGIN", "COMMIT", "BEGIN", "ROLLBACK"]);
    }

    #[tokio::test]
    async fn nested_transactions_pass_through() {
        let source = RecordingSource::default();
        let database = driver(&source).make_database(DatabaseContext::default());
        database
            .transaction(|db| {
                Box::pin(async move {
                    db.transaction(|db| {
                        Box::pin(async move {
                            assert!(db.in_transaction());
                            db.transaction(|db| {
                                Box::pin(async move {
                                    db.execute_query(&insert("Lambert"), |_| Ok(())).await
                                })
                            })
                            .await
                        })
                    })
                    .await
                })
            })
            .await
            .expect("The transaction failed");
        let statements = source.statements();
        assert_eq!(statements.iter().filter(|v| *v == "BEGIN").count(), 1);
        assert_eq!(statements.iter().filter(|v| *v == "COMMIT").count(), 1);
        assert_eq!(statements.len(), 3);

        // Inner failure rolls back the outer transaction once
        let source = RecordingSource::default();
        let database = driver(&source).make_database(DatabaseContext::default());
        let result = database
            .transaction(|db| {
                Box::pin(async move {
                    db.transaction(|_| Box::pin(async move { Err::<(), _>(abort()) }))
                        .await
                })
            })
            .await;
        assert!(result.is_err());
        assert_eq!(source.statements(), ["BEGIN", "ROLLBACK"]);
    }

    #[tokio::test]
    async fn explicit_control() {
        let source = RecordingSource::default();
        let database = driver(&source).make_database(DatabaseContext::default());

        // Every call borrows a connection of its own
        database.begin_transaction().await.unwrap();
        database.commit_transaction().await.unwrap();
        database.rollback_transaction().await.unwrap();
        assert_eq!(source.statements(), ["BEGIN", "COMMIT", "ROLLBACK"]);
        assert_eq!(source.connections(), [1, 2, 3]);
        assert!(!database.in_transaction());

        // Pinned handle
        let source = RecordingSource::default();
        let database = driver(&source).make_database(DatabaseContext::default());
        database
            .with_connection(|db| {
                Box::pin(async move {
                    db.begin_transaction().await?;
                    assert!(!db.in_transaction());
                    db.execute_query(&insert("Parker"), |_| Ok(())).await?;
                    db.commit_transaction().await
                })
            })
            .await
            .unwrap();
        assert_eq!(source.statements().len(), 3);
        assert_eq!(source.connections(), [1, 1, 1]);
    }

    #[tokio::test]
    async fn with_connection_inside_transaction() {
        let source = RecordingSource::default();
        let database = driver(&source).make_database(DatabaseContext::default());
        database
            .transaction(|db| {
                Box::pin(async move {
                    db.with_connection(|db| {
                        Box::pin(async move {
                            assert!(db.in_transaction());
                            db.execute_query(&insert("Brett"), |_| Ok(())).await
                        })
                    })
                    .await
                })
            })
            .await
            .unwrap();
        assert_eq!(source.acquired(), 1);
    }

    #[tokio::test]
    async fn schema_statements() {
        let source = RecordingSource::default();
        let database = driver(&source).make_database(DatabaseContext::default());
        database
            .execute_schema(&DatabaseSchema::create("crew").field("name", DataType::String, []))
            .await
            .unwrap();
        assert_eq!(
            source.statements(),
            ["CREATE TABLE \"crew\" (\n\"name\" TEXT\n)"]
        );

        source.state.lock().unwrap().simple_rows = 1;
        let result = silent_logs! {
            database
                .execute_schema(&DatabaseSchema::delete("crew"))
                .await
        };
        assert!(matches!(result, Err(Error::UnexpectedRow)));
    }

    #[tokio::test]
    async fn enum_statements() {
        init_logs();
        let source = RecordingSource::default();
        let database = driver(&source).make_database(DatabaseContext::default());
        database
            .execute_enum(&DatabaseEnum::create("rank", ["captain", "officer"]))
            .await
            .unwrap();
        database
            .execute_enum(
                &DatabaseEnum::update("rank")
                    .add_cases(["engineer", "android"])
                    .delete_cases(["officer"]),
            )
            .await
            .expect("Deleting cases must not abort the update");
        database
            .execute_enum(&DatabaseEnum::update("rank").delete_cases(["captain"]))
            .await
            .unwrap();
        database
            .execute_enum(&DatabaseEnum::delete("rank"))
            .await
            .unwrap();
        assert_eq!(
            source.statements(),
            [
                r#"CREATE TYPE "rank" AS ENUM ('captain', 'officer')"#,
                r#"ALTER TYPE "rank" ADD VALUE 'engineer'"#,
                r#"ALTER TYPE "rank" ADD VALUE 'android'"#,
                r#"DROP TYPE "rank""#,
            ]
        );
        // The additions share one connection
        assert_eq!(source.connections(), [1, 2, 2, 3]);
    }

    #[tokio::test]
    async fn enum_stops_at_the_first_failure() {
        let source = RecordingSource::default().failing(
            r#"ALTER TYPE "rank" ADD VALUE 'engineer'"#,
            ErrorClass::Syntax,
        );
        let database = driver(&source).make_database(DatabaseContext::default());
        let result = silent_logs! {
            database
                .execute_enum(&DatabaseEnum::update("rank").add_cases(["engineer", "android"]))
                .await
        };
        assert!(result.expect_err("The update must fail").is_syntax_error());
        assert_eq!(source.statements().len(), 1);
    }

    #[tokio::test]
    async fn driver_sources() {
        let first = RecordingSource::default();
        let second = RecordingSource::default();
        let driver = driver(&first).with_source(second.clone());
        assert_eq!(driver.sources().len(), 2);
        assert_eq!(<PostgresDriver<RecordingSource> as Driver>::NAME, "postgres");

        // Round robin
        for _ in 0..4 {
            driver
                .make_database(DatabaseContext::default())
                .begin_transaction()
                .await
                .unwrap();
        }
        assert_eq!(first.acquired(), 2);
        assert_eq!(second.acquired(), 2);

        // Affinity
        driver
            .make_database(DatabaseContext::new("crew").with_affinity(3))
            .begin_transaction()
            .await
            .unwrap();
        assert_eq!(second.acquired(), 3);
    }

    #[tokio::test]
    async fn shutdown() {
        let source = RecordingSource::default();
        let driver = driver(&source);
        driver.shutdown();
        let database = driver.make_database(DatabaseContext::default());
        let error = database
            .fetch_all(&DatabaseQuery::new("crew"))
            .await
            .expect_err("The driver is closed");
        assert!(error.is_connection_closed());
        let error = database
            .transaction(|_| Box::pin(async move { Ok(()) }))
            .await
            .expect_err("The driver is closed");
        assert!(error.is_connection_closed());
        assert!(source.statements().is_empty());
    }
}
