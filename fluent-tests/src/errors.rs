use fluent_core::{
    DataType, Database, DatabaseContext, DatabaseError, DatabaseQuery, DatabaseSchema, Driver,
    FieldConstraint, QueryAction, QueryValue, silent_logs,
};
use std::sync::LazyLock;
use tokio::sync::Mutex;

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub async fn errors<D: Driver>(driver: &D) {
    let _lock = MUTEX.lock().await;
    let database = driver.make_database(DatabaseContext::new("fluent::errors"));

    database
        .execute_schema(&DatabaseSchema::delete("probes").if_exists())
        .await
        .expect("Failed to drop the probes table");
    database
        .execute_schema(&DatabaseSchema::create("probes").field(
            "code",
            DataType::Int32,
            [FieldConstraint::Identifier { auto: false }],
        ))
        .await
        .expect("Failed to create the probes table");
    let insert = DatabaseQuery::new("probes")
        .action(QueryAction::Create)
        .input([("code", QueryValue::bind(7))])
        .without_id_key();
    database
        .fetch_all(&insert)
        .await
        .expect("Failed to insert the first probe");

    // Unique violation
    let error = silent_logs! { database.fetch_all(&insert).await }
        .expect_err("A duplicate key must be rejected");
    assert!(error.is_constraint_failure());
    assert!(!error.is_syntax_error());

    // Not null violation
    let error = silent_logs! {
        database
            .fetch_all(
                &DatabaseQuery::new("probes")
                    .action(QueryAction::Create)
                    .input([("code", QueryValue::Null)])
                    .without_id_key(),
            )
            .await
    }
    .expect_err("A null key must be rejected");
    assert!(error.is_constraint_failure());

    // Undefined table
    let error = silent_logs! { database.fetch_all(&DatabaseQuery::new("no_such_table")).await }
        .expect_err("Reading a missing table must fail");
    assert!(error.is_syntax_error());
    assert!(!error.is_constraint_failure());
    assert!(!error.is_connection_closed());

    // Creating an existing table
    let error = silent_logs! {
        database
            .execute_schema(&DatabaseSchema::create("probes").field("code", DataType::Int32, []))
            .await
    }
    .expect_err("Creating the table twice must fail");
    assert!(error.is_syntax_error());
    database
        .execute_schema(
            &DatabaseSchema::create("probes")
                .field("code", DataType::Int32, [])
                .ignore_existing(),
        )
        .await
        .expect("Creating with ignore existing must succeed");

    // Cleanup
    database
        .execute_schema(&DatabaseSchema::delete("probes"))
        .await
        .expect("Failed to drop the probes table");
}

/// Closes the driver, it must run last.
pub async fn shutdown<D: Driver>(driver: &D) {
    driver.shutdown();
    let database = driver.make_database(DatabaseContext::new("fluent::shutdown"));
    let error = silent_logs! { database.fetch_all(&DatabaseQuery::new("planets")).await }
        .expect_err("A closed driver cannot run queries");
    assert!(error.is_connection_closed());
    assert!(!error.is_syntax_error());
    assert!(!error.is_constraint_failure());
}
