use fluent_core::{
    AggregateMethod, ConstraintDefinition, ContainsMethod, DataType, Database, DatabaseContext,
    DatabaseOutput, DatabaseQuery, DatabaseSchema, Driver, FieldConstraint, FilterMethod,
    FilterRelation, QueryAction, QueryField, QueryFilter, QuerySort, QueryValue, SortDirection,
    Value,
};
use std::sync::LazyLock;
use time::macros::date;
use tokio::sync::Mutex;

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

fn field(name: &str) -> QueryField {
    QueryField::new("planets", name)
}

fn names<D: Database>(rows: &[D::Output]) -> Vec<String> {
    rows.iter()
        .map(|v| v.decode::<String>("name").expect("Could not decode the name"))
        .collect()
}

pub async fn planets<D: Driver>(driver: &D) {
    let _lock = MUTEX.lock().await;
    let database = driver.make_database(DatabaseContext::new("fluent::planets"));

    // Setup
    database
        .execute_schema(&DatabaseSchema::delete("planets").if_exists())
        .await
        .expect("Failed to drop the planets table");
    database
        .execute_schema(
            &DatabaseSchema::create("planets")
                .field(
                    "id",
                    DataType::Int64,
                    [FieldConstraint::Identifier { auto: true }],
                )
                .field("name", DataType::String, [FieldConstraint::Required])
                .field("mass", DataType::Double, [])
                .field(
                    "moons",
                    DataType::Int32,
                    [
                        FieldConstraint::Required,
                        FieldConstraint::Default(Value::Int32(Some(0))),
                    ],
                )
                .field("discovered", DataType::Date, [])
                .field("metadata", DataType::Dictionary, [])
                .constraint(ConstraintDefinition::unique(["name"])),
        )
        .await
        .expect("Failed to create the planets table");

    // Create
    let mut ids = Vec::new();
    for (name, mass, moons, discovered, discoverer) in [
        ("Mercury", 3.301e23, 0, None, None),
        ("Earth", 5.972e24, 1, None, None),
        ("Mars", 6.417e23, 2, None, None),
        ("Uranus", 8.681e25, 27, Some(date!(1781 - 03 - 13)), Some("Herschel")),
        ("Neptune", 1.024e26, 14, Some(date!(1846 - 09 - 23)), Some("Galle")),
    ] {
        let query = DatabaseQuery::new("planets").action(QueryAction::Create).input([
            ("name", QueryValue::bind(name)),
            ("mass", QueryValue::bind(mass)),
            ("moons", QueryValue::bind(moons)),
            ("discovered", QueryValue::bind(discovered)),
            (
                "metadata",
                match discoverer {
                    Some(v) => QueryValue::bind(serde_json::json!({ "discoverer": v })),
                    None => QueryValue::Null,
                },
            ),
        ]);
        let rows = database
            .fetch_all(&query)
            .await
            .expect("Failed to insert a planet");
        assert_eq!(rows.len(), 1);
        ids.push(rows[0].decode::<i64>("id").expect("Could not decode the id"));
    }
    assert_eq!(ids.len(), 5);
    assert!(ids.windows(2).all(|v| v[0] < v[1]));

    // Create without returning
    let rows = database
        .fetch_all(
            &DatabaseQuery::new("planets")
                .action(QueryAction::Create)
                .input([("name", QueryValue::bind("Venus"))])
                .without_id_key(),
        )
        .await
        .expect("Failed to insert Venus");
    assert!(rows.is_empty());

    // Read
    let rows = database
        .fetch_all(
            &DatabaseQuery::new("planets")
                .filter(QueryFilter::value(
                    field("name"),
                    FilterMethod::EQUAL,
                    QueryValue::bind("Earth"),
                ))
                .limit(1),
        )
        .await
        .expect("Failed to read Earth");
    assert_eq!(rows.len(), 1);
    let earth = &rows[0];
    assert_eq!(earth.decode::<i64>("id").unwrap(), ids[1]);
    assert_eq!(earth.decode::<f64>("mass").unwrap(), 5.972e24);
    assert_eq!(earth.decode::<i32>("moons").unwrap(), 1);
    assert!(earth.decode_nil("discovered").unwrap());
    assert!(earth.decode_nil("metadata").unwrap());
    assert_eq!(earth.decode::<Option<i32>>("moons").unwrap(), Some(1));

    // Default value
    let rows = database
        .fetch_all(&DatabaseQuery::new("planets").filter(QueryFilter::value(
            field("name"),
            FilterMethod::EQUAL,
            QueryValue::bind("Venus"),
        )))
        .await
        .expect("Failed to read Venus");
    assert_eq!(rows[0].decode::<i32>("moons").unwrap(), 0);

    // Sort, limit and offset
    let rows = database
        .fetch_all(
            &DatabaseQuery::new("planets")
                .filter(QueryFilter::value(
                    field("moons"),
                    FilterMethod::GREATER,
                    QueryValue::bind(0),
                ))
                .sort(QuerySort::Sort {
                    field: field("moons"),
                    direction: SortDirection::Descending,
                })
                .limit(2)
                .offset(1),
        )
        .await
        .expect("Failed to read the planets with moons");
    assert_eq!(names::<D::Database>(&rows), ["Neptune", "Mars"]);

    // Selected fields
    let rows = database
        .fetch_all(
            &DatabaseQuery::new("planets")
                .field(field("name"))
                .field(field("discovered"))
                .filter(QueryFilter::value(
                    field("discovered"),
                    FilterMethod::Equality { inverse: true },
                    QueryValue::Null,
                ))
                .sort(QuerySort::Sort {
                    field: field("discovered"),
                    direction: SortDirection::Ascending,
                }),
        )
        .await
        .expect("Failed to read the discovered planets");
    let rows = rows.iter().map(|v| v.schema("planets")).collect::<Vec<_>>();
    assert_eq!(names::<D::Database>(&rows), ["Uranus", "Neptune"]);
    assert_eq!(
        rows[0].decode::<time::Date>("discovered").unwrap(),
        date!(1781 - 03 - 13)
    );

    // Nested JSON field
    let rows = database
        .fetch_all(&DatabaseQuery::new("planets").filter(QueryFilter::value(
            QueryField::path("planets", ["metadata", "discoverer"]),
            FilterMethod::EQUAL,
            QueryValue::bind("Galle"),
        )))
        .await
        .expect("Failed to filter on the discoverer");
    assert_eq!(names::<D::Database>(&rows), ["Neptune"]);
    assert_eq!(
        rows[0]
            .decode::<serde_json::Value>("metadata")
            .expect("Could not decode the metadata"),
        serde_json::json!({ "discoverer": "Galle" })
    );

    // Subset and pattern
    let rows = database
        .fetch_all(
            &DatabaseQuery::new("planets")
                .filter(QueryFilter::group(
                    FilterRelation::Or,
                    [
                        QueryFilter::value(
                            field("name"),
                            FilterMethod::IN,
                            QueryValue::Array(vec![
                                QueryValue::bind("Mercury"),
                                QueryValue::bind("Pluto"),
                            ]),
                        ),
                        QueryFilter::value(
                            field("name"),
                            FilterMethod::Contains {
                                inverse: false,
                                method: ContainsMethod::Prefix,
                            },
                            QueryValue::bind("Ma"),
                        ),
                    ],
                ))
                .sort(QuerySort::Sort {
                    field: field("name"),
                    direction: SortDirection::Ascending,
                }),
        )
        .await
        .expect("Failed to read with IN and LIKE");
    assert_eq!(names::<D::Database>(&rows), ["Mars", "Mercury"]);

    let rows = database
        .fetch_all(&DatabaseQuery::new("planets").filter(QueryFilter::value(
            field("name"),
            FilterMethod::IN,
            QueryValue::Array(Vec::new()),
        )))
        .await
        .expect("Failed to read with an empty IN");
    assert!(rows.is_empty());

    // Update
    database
        .fetch_all(
            &DatabaseQuery::new("planets")
                .action(QueryAction::Update)
                .input([("moons", QueryValue::bind(95))])
                .filter(QueryFilter::value(
                    field("name"),
                    FilterMethod::EQUAL,
                    QueryValue::bind("Venus"),
                )),
        )
        .await
        .expect("Failed to update Venus");

    // Aggregate
    let count = |method, name: &str| {
        DatabaseQuery::new("planets").action(QueryAction::Aggregate {
            method,
            field: field(name),
        })
    };
    let rows = database
        .fetch_all(&count(AggregateMethod::Count, "id"))
        .await
        .expect("Failed to count the planets");
    assert_eq!(rows[0].decode::<i64>("aggregate").unwrap(), 6);
    let rows = database
        .fetch_all(&count(AggregateMethod::Sum, "moons"))
        .await
        .expect("Failed to sum the moons");
    assert_eq!(rows[0].decode::<i64>("aggregate").unwrap(), 139);
    let rows = database
        .fetch_all(&count(AggregateMethod::Maximum, "moons"))
        .await
        .expect("Failed to find the most moons");
    assert_eq!(rows[0].decode::<i32>("aggregate").unwrap(), 95);

    // Delete
    database
        .fetch_all(&DatabaseQuery::new("planets").action(QueryAction::Delete).filter(
            QueryFilter::value(field("mass"), FilterMethod::LESS, QueryValue::bind(1e24)),
        ))
        .await
        .expect("Failed to delete the small planets");
    let rows = database
        .fetch_all(&count(AggregateMethod::Count, "id"))
        .await
        .expect("Failed to count the planets");
    assert_eq!(rows[0].decode::<i64>("aggregate").unwrap(), 4);

    // Alter
    database
        .execute_schema(
            &DatabaseSchema::update("planets")
                .field("rings", DataType::Bool, [])
                .delete_field("metadata"),
        )
        .await
        .expect("Failed to alter the planets table");
    let rows = database
        .fetch_all(&DatabaseQuery::new("planets").limit(1))
        .await
        .expect("Failed to read after the alter");
    assert!(rows[0].contains("rings"));
    assert!(!rows[0].contains("metadata"));
    assert!(rows[0].decode_nil("rings").unwrap());
}
