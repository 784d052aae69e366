use fluent_core::{
    DataType, Database, DatabaseContext, DatabaseEnum, DatabaseOutput, DatabaseQuery,
    DatabaseSchema, Driver, FieldConstraint, FilterMethod, QueryAction, QueryField, QueryFilter,
    QueryValue, silent_logs,
};
use std::sync::LazyLock;
use tokio::sync::Mutex;

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

fn insert(name: &str, kind: &str) -> DatabaseQuery {
    DatabaseQuery::new("worlds")
        .action(QueryAction::Create)
        .input([
            ("name", QueryValue::bind(name.to_string())),
            ("kind", QueryValue::EnumCase(kind.into())),
        ])
        .without_id_key()
}

pub async fn enums<D: Driver>(driver: &D) {
    let _lock = MUTEX.lock().await;
    let database = driver.make_database(DatabaseContext::new("fluent::enums"));

    // Setup
    database
        .execute_schema(&DatabaseSchema::delete("worlds").if_exists())
        .await
        .expect("Failed to drop the worlds table");
    let _ = silent_logs! {
        database
            .execute_enum(&DatabaseEnum::delete("world_kind"))
            .await
    };
    database
        .execute_enum(&DatabaseEnum::create("world_kind", ["rocky", "gaseous"]))
        .await
        .expect("Failed to create the world_kind enum");
    database
        .execute_schema(
            &DatabaseSchema::create("worlds")
                .field("name", DataType::String, [FieldConstraint::Required])
                .field(
                    "kind",
                    DataType::Enum {
                        name: "world_kind".into(),
                        cases: vec!["rocky".into(), "gaseous".into()],
                    },
                    [],
                ),
        )
        .await
        .expect("Failed to create the worlds table");
    database
        .fetch_all(&insert("Earth", "rocky"))
        .await
        .expect("Failed to insert Earth");

    // Unknown case
    let result = silent_logs! { database.fetch_all(&insert("Europa", "icy")).await };
    assert!(result.is_err());

    // Deleting cases is skipped, adding goes on
    database
        .execute_enum(
            &DatabaseEnum::update("world_kind")
                .add_cases(["icy", "lava"])
                .delete_cases(["gaseous"]),
        )
        .await
        .expect("Failed to update the world_kind enum");
    database
        .fetch_all(&insert("Europa", "icy"))
        .await
        .expect("Failed to insert Europa");
    database
        .fetch_all(&insert("Io", "lava"))
        .await
        .expect("Failed to insert Io");
    database
        .fetch_all(&insert("Jupiter", "gaseous"))
        .await
        .expect("The deleted case must still be there");

    let rows = database
        .fetch_all(&DatabaseQuery::new("worlds").filter(QueryFilter::value(
            QueryField::new("worlds", "name"),
            FilterMethod::EQUAL,
            QueryValue::bind("Europa"),
        )))
        .await
        .expect("Failed to read Europa");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].decode::<String>("kind").unwrap(), "icy");

    // Filter on a case
    let rows = database
        .fetch_all(&DatabaseQuery::new("worlds").filter(QueryFilter::value(
            QueryField::new("worlds", "kind"),
            FilterMethod::IN,
            QueryValue::Array(vec![
                QueryValue::EnumCase("rocky".into()),
                QueryValue::EnumCase("lava".into()),
            ]),
        )))
        .await
        .expect("Failed to filter on the kind");
    assert_eq!(rows.len(), 2);

    // Cleanup
    database
        .execute_schema(&DatabaseSchema::delete("worlds"))
        .await
        .expect("Failed to drop the worlds table");
    database
        .execute_enum(&DatabaseEnum::delete("world_kind"))
        .await
        .expect("Failed to drop the world_kind enum");
}
