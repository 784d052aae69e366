use fluent_core::{
    AggregateMethod, DataType, Database, DatabaseContext, DatabaseError, DatabaseOutput,
    DatabaseQuery, DatabaseSchema, Driver, Error, FieldConstraint, QueryAction, QueryField,
    QueryValue, TransactionControl, silent_logs,
};
use std::sync::LazyLock;
use tokio::sync::Mutex;

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

fn insert(name: &str) -> DatabaseQuery {
    DatabaseQuery::new("ledger")
        .action(QueryAction::Create)
        .input([("name", QueryValue::bind(name.to_string()))])
        .without_id_key()
}

async fn count<D: Database>(database: &D) -> i64 {
    let rows = database
        .fetch_all(
            &DatabaseQuery::new("ledger").action(QueryAction::Aggregate {
                method: AggregateMethod::Count,
                field: QueryField::new("ledger", "name"),
            }),
        )
        .await
        .expect("Failed to count the ledger entries");
    rows[0]
        .decode::<i64>("aggregate")
        .expect("Could not decode the count")
}

pub async fn transactions<D: Driver>(driver: &D) {
    let _lock = MUTEX.lock().await;
    let database = driver.make_database(DatabaseContext::new("fluent::transactions"));
    assert!(!database.in_transaction());

    // Setup
    database
        .execute_schema(&DatabaseSchema::delete("ledger").if_exists())
        .await
        .expect("Failed to drop the ledger table");
    database
        .execute_schema(&DatabaseSchema::create("ledger").field(
            "name",
            DataType::String,
            [FieldConstraint::Identifier { auto: false }],
        ))
        .await
        .expect("Failed to create the ledger table");

    // Commit
    let value = database
        .transaction(|db| {
            Box::pin(async move {
                assert!(db.in_transaction());
                db.execute_query(&insert("first"), |_| Ok(())).await?;
                db.execute_query(&insert("second"), |_| Ok(())).await?;
                Ok(count(db).await)
            })
        })
        .await
        .expect("The transaction should commit");
    assert_eq!(value, 2);
    assert_eq!(count(&database).await, 2);

    // Rollback on error, the original error is returned
    let result = database
        .transaction(|db| {
            Box::pin(async move {
                db.execute_query(&insert("third"), |_| Ok(())).await?;
                assert_eq!(count(db).await, 3);
                Err::<(), _>(Error::Conversion("abort".into()))
            })
        })
        .await;
    assert!(matches!(result, Err(Error::Conversion(ref v)) if v == "abort"));
    assert_eq!(count(&database).await, 2);

    // Rollback on a constraint failure
    let result = silent_logs! {
        database
            .transaction(|db| {
                Box::pin(async move {
                    db.execute_query(&insert("fourth"), |_| Ok(())).await?;
                    db.execute_query(&insert("first"), |_| Ok(())).await?;
                    Ok(())
                })
            })
            .await
    };
    let error = result.expect_err("Inserting a duplicate key must fail");
    assert!(error.is_constraint_failure());
    assert!(!error.is_syntax_error());
    assert!(!error.is_connection_closed());
    assert_eq!(count(&database).await, 2);

    // Nested transactions run inside the outer one
    let result = database
        .transaction(|db| {
            Box::pin(async move {
                db.execute_query(&insert("fifth"), |_| Ok(())).await?;
                let inner = db
                    .transaction(|db| {
                        Box::pin(async move {
                            assert!(db.in_transaction());
                            db.execute_query(&insert("sixth"), |_| Ok(())).await?;
                            Ok(count(db).await)
                        })
                    })
                    .await?;
                assert_eq!(inner, 4);
                Err::<(), _>(Error::Conversion("abort both".into()))
            })
        })
        .await;
    assert!(result.is_err());
    assert_eq!(count(&database).await, 2);

    // Explicit control on a pinned connection
    database
        .with_connection(|db| {
            Box::pin(async move {
                db.begin_transaction().await?;
                db.execute_query(&insert("seventh"), |_| Ok(())).await?;
                assert!(!db.in_transaction());
                db.rollback_transaction().await?;
                db.begin_transaction().await?;
                db.execute_query(&insert("eighth"), |_| Ok(())).await?;
                db.commit_transaction().await
            })
        })
        .await
        .expect("Explicit transaction control failed");
    assert_eq!(count(&database).await, 3);
}
