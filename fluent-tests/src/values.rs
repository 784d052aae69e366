use fluent_core::{
    DataType, Database, DatabaseContext, DatabaseOutput, DatabaseQuery, DatabaseSchema, Driver,
    FieldConstraint, FilterMethod, QueryAction, QueryField, QueryFilter, QueryValue,
};
use rust_decimal::Decimal;
use std::{str::FromStr, sync::LazyLock};
use time::{
    OffsetDateTime,
    macros::{datetime, time},
};
use tokio::sync::Mutex;
use uuid::Uuid;

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub async fn values<D: Driver>(driver: &D) {
    let _lock = MUTEX.lock().await;
    let database = driver.make_database(DatabaseContext::new("fluent::values"));

    // Setup
    database
        .execute_schema(&DatabaseSchema::delete("samples").if_exists())
        .await
        .expect("Failed to drop the samples table");
    database
        .execute_schema(
            &DatabaseSchema::create("samples")
                .field(
                    "id",
                    DataType::Uuid,
                    [FieldConstraint::Identifier { auto: false }],
                )
                .field("price", DataType::Decimal, [])
                .field("payload", DataType::Data, [])
                .field("opens", DataType::Time, [])
                .field("measured", DataType::Datetime, [])
                .field("ratio", DataType::Float, [])
                .field("tags", DataType::Array(DataType::String.into()), [])
                .field("scores", DataType::Array(DataType::Int64.into()), []),
        )
        .await
        .expect("Failed to create the samples table");

    let id = Uuid::new_v4();
    let price = Decimal::from_str("1249.95").expect("Invalid decimal");
    let measured = datetime!(2024-05-01 12:30:00 +02:00);
    let rows = database
        .fetch_all(
            &DatabaseQuery::new("samples")
                .action(QueryAction::Create)
                .input([
                    ("id", QueryValue::bind(id)),
                    ("price", QueryValue::bind(price)),
                    ("payload", QueryValue::bind(Box::<[u8]>::from(&b"\x00fluent\xff"[..]))),
                    ("opens", QueryValue::bind(time!(08:45:30))),
                    ("measured", QueryValue::bind(measured)),
                    ("ratio", QueryValue::bind(0.25f32)),
                    (
                        "tags",
                        QueryValue::bind(vec!["alpha".to_string(), "beta".to_string()]),
                    ),
                    ("scores", QueryValue::bind(Vec::<i64>::new())),
                ]),
        )
        .await
        .expect("Failed to insert a sample");
    assert_eq!(rows[0].decode::<Uuid>("id").unwrap(), id);

    // Null values keep their type
    database
        .fetch_all(
            &DatabaseQuery::new("samples")
                .action(QueryAction::Create)
                .input([
                    ("id", QueryValue::bind(Uuid::new_v4())),
                    ("price", QueryValue::bind(None::<Decimal>)),
                    ("tags", QueryValue::bind(None::<Vec<String>>)),
                ])
                .without_id_key(),
        )
        .await
        .expect("Failed to insert an empty sample");

    let rows = database
        .fetch_all(&DatabaseQuery::new("samples").filter(QueryFilter::value(
            QueryField::new("samples", "id"),
            FilterMethod::EQUAL,
            QueryValue::bind(id),
        )))
        .await
        .expect("Failed to read the sample");
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.decode::<Decimal>("price").unwrap(), price);
    assert_eq!(
        &*row.decode::<Box<[u8]>>("payload").unwrap(),
        b"\x00fluent\xff"
    );
    assert_eq!(row.decode::<time::Time>("opens").unwrap(), time!(08:45:30));
    assert_eq!(row.decode::<OffsetDateTime>("measured").unwrap(), measured);
    assert_eq!(row.decode::<f32>("ratio").unwrap(), 0.25);
    assert_eq!(row.decode::<Vec<String>>("tags").unwrap(), ["alpha", "beta"]);
    assert!(row.decode::<Vec<i64>>("scores").unwrap().is_empty());

    let rows = database
        .fetch_all(&DatabaseQuery::new("samples").filter(QueryFilter::value(
            QueryField::new("samples", "price"),
            FilterMethod::EQUAL,
            QueryValue::Null,
        )))
        .await
        .expect("Failed to read the empty sample");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].decode::<Option<Decimal>>("price").unwrap(), None);
    assert_eq!(rows[0].decode::<Option<Vec<String>>>("tags").unwrap(), None);
    assert!(rows[0].decode::<Decimal>("price").is_err());

    // Cleanup
    database
        .execute_schema(&DatabaseSchema::delete("samples"))
        .await
        .expect("Failed to drop the samples table");
}
