#[cfg(test)]
mod tests {
    use fluent_core::{
        BinaryOpType, ForeignKeyAction, GenericSqlWriter, Order, Ordered, SqlAlterEnum,
        SqlAlterTable, SqlColumnConstraint, SqlColumnDefinition, SqlCreateEnum, SqlCreateTable,
        SqlDataType, SqlDelete, SqlExpression, SqlInsert, SqlLiteral, SqlReferences, SqlSelect,
        SqlTable, SqlTableConstraint, SqlTableConstraintAlgorithm, SqlUpdate, SqlWriter, Value,
    };
    use indoc::indoc;
    use time::macros::{date, datetime, time};

    const WRITER: GenericSqlWriter = GenericSqlWriter::new();

    fn planets() -> SqlTable {
        SqlTable::new(None, "planets")
    }

    #[test]
    fn select() {
        let select = SqlExpression::Select(Box::new(SqlSelect {
            columns: vec![
                SqlExpression::column("planets", "name").alias("planets_name"),
                SqlExpression::column("planets", "mass").alias("planets_mass"),
            ],
            from: vec![SqlExpression::Table(planets())],
            predicate: SqlExpression::fold(
                [
                    SqlExpression::binary(
                        SqlExpression::column("planets", "mass"),
                        BinaryOpType::Greater,
                        SqlExpression::bind(1.5),
                    ),
                    SqlExpression::binary(
                        SqlExpression::column("planets", "name"),
                        BinaryOpType::Like,
                        SqlExpression::bind("E%"),
                    ),
                ],
                BinaryOpType::And,
            ),
            order_by: vec![Ordered {
                expression: SqlExpression::column("planets", "name").alias("planets_name"),
                order: Order::DESC,
            }],
            limit: Some(SqlExpression::Literal(SqlLiteral::Numeric("10".into()))),
            ..Default::default()
        }));
        let query = WRITER.serialize(&select);
        assert_eq!(
            query.sql,
            indoc! {r#"
                SELECT "planets"."name" AS "planets_name", "planets"."mass" AS "planets_mass"
                FROM "planets"
                WHERE "planets"."mass" > ? AND "planets"."name" LIKE ?
                ORDER BY "planets"."name" DESC
                LIMIT 10"#}
        );
        assert_eq!(
            query.binds,
            [Value::Float64(Some(1.5)), Value::Varchar(Some("E%".into()))]
        );
    }

    #[test]
    fn select_everything() {
        let select = SqlExpression::Select(Box::new(SqlSelect {
            distinct: true,
            from: vec![SqlExpression::Table(
                SqlTable::new(Some("solar".into()), "planets").with_alias(Some("p".into())),
            )],
            ..Default::default()
        }));
        assert_eq!(
            WRITER.serialize(&select).sql,
            "SELECT DISTINCT *\nFROM \"solar\".\"planets\" AS \"p\""
        );
    }

    #[test]
    fn precedence() {
        let or = SqlExpression::binary(
            SqlExpression::binary(
                SqlExpression::identifier("a"),
                BinaryOpType::Equal,
                SqlExpression::bind(1),
            ),
            BinaryOpType::Or,
            SqlExpression::binary(
                SqlExpression::identifier("b"),
                BinaryOpType::Is,
                SqlExpression::Literal(SqlLiteral::Null),
            ),
        );
        let and = SqlExpression::binary(
            or,
            BinaryOpType::And,
            SqlExpression::binary(
                SqlExpression::identifier("c"),
                BinaryOpType::NotEqual,
                SqlExpression::bind(2),
            ),
        );
        let query = WRITER.serialize(&and);
        assert_eq!(query.sql, r#"("a" = ? OR "b" IS NULL) AND "c" <> ?"#);
        assert_eq!(query.binds.len(), 2);
    }

    #[test]
    fn serialize_twice() {
        let update = SqlExpression::Update(Box::new(SqlUpdate {
            table: planets(),
            values: vec![("name".into(), SqlExpression::bind("Terra"))],
            predicate: Some(SqlExpression::binary(
                SqlExpression::column("planets", "id"),
                BinaryOpType::Equal,
                SqlExpression::bind(3),
            )),
        }));
        let first = WRITER.serialize(&update);
        let second = WRITER.serialize(&update);
        assert_eq!(first, second);
        assert_eq!(
            first.sql,
            indoc! {r#"
                UPDATE "planets"
                SET "name" = ?
                WHERE "planets"."id" = ?"#}
        );
    }

    #[test]
    fn insert_returning() {
        let insert = SqlExpression::Returning {
            statement: Box::new(SqlExpression::Insert(Box::new(SqlInsert {
                table: planets(),
                columns: vec!["name".into(), "mass".into()],
                values: vec![
                    vec![SqlExpression::bind("Mars"), SqlExpression::bind(0.107)],
                    vec![
                        SqlExpression::bind("Venus"),
                        SqlExpression::Literal(SqlLiteral::Default),
                    ],
                ],
            }))),
            columns: vec![SqlExpression::identifier("id")],
        };
        let query = WRITER.serialize(&insert);
        assert_eq!(
            query.sql,
            indoc! {r#"
                INSERT INTO "planets" ("name", "mass") VALUES
                (?, ?),
                (?, DEFAULT)
                RETURNING "id""#}
        );
        assert_eq!(query.binds.len(), 3);
    }

    #[test]
    fn delete() {
        let delete = SqlExpression::Delete(Box::new(SqlDelete {
            table: planets(),
            predicate: Some(SqlExpression::binary(
                SqlExpression::column("planets", "name"),
                BinaryOpType::In,
                SqlExpression::List(vec![SqlExpression::bind("Pluto"), SqlExpression::bind("Ceres")])
                    .group(),
            )),
        }));
        assert_eq!(
            WRITER.serialize(&delete).sql,
            "DELETE FROM \"planets\"\nWHERE \"planets\".\"name\" IN (?, ?)"
        );
    }

    #[test]
    fn create_table_inlines_defaults() {
        let create = SqlExpression::CreateTable(Box::new(SqlCreateTable {
            table: planets(),
            if_not_exists: true,
            columns: vec![
                SqlColumnDefinition {
                    name: "id".into(),
                    data_type: SqlExpression::DataType(SqlDataType::BigInt),
                    constraints: vec![SqlColumnConstraint::PrimaryKey {
                        auto_increment: true,
                    }],
                },
                SqlColumnDefinition {
                    name: "name".into(),
                    data_type: SqlExpression::DataType(SqlDataType::Text),
                    constraints: vec![
                        SqlColumnConstraint::NotNull,
                        SqlColumnConstraint::Default(SqlExpression::bind("it's unknown")),
                    ],
                },
                SqlColumnDefinition {
                    name: "star_id".into(),
                    data_type: SqlExpression::DataType(SqlDataType::BigInt),
                    constraints: vec![],
                },
            ],
            constraints: vec![
                SqlTableConstraint {
                    name: Some("uq:planets.name".into()),
                    algorithm: SqlTableConstraintAlgorithm::Unique(vec!["name".into()]),
                },
                SqlTableConstraint {
                    name: None,
                    algorithm: SqlTableConstraintAlgorithm::ForeignKey {
                        columns: vec!["star_id".into()],
                        references: SqlReferences {
                            table: SqlTable::new(None, "stars"),
                            columns: vec!["id".into()],
                            on_delete: ForeignKeyAction::Cascade,
                            on_update: ForeignKeyAction::NoAction,
                        },
                    },
                },
            ],
        }));
        let query = WRITER.serialize(&create);
        assert_eq!(
            query.sql,
            indoc! {r#"
                CREATE TABLE IF NOT EXISTS "planets" (
                "id" BIGINT PRIMARY KEY GENERATED BY DEFAULT AS IDENTITY,
                "name" TEXT NOT NULL DEFAULT 'it''s unknown',
                "star_id" BIGINT,
                CONSTRAINT "uq:planets.name" UNIQUE ("name"),
                FOREIGN KEY ("star_id") REFERENCES "stars" ("id") ON DELETE CASCADE ON UPDATE NO ACTION
                )"#}
        );
        assert!(query.binds.is_empty());
    }

    #[test]
    fn alter_table() {
        let alter = SqlExpression::AlterTable(Box::new(SqlAlterTable {
            table: planets(),
            add_columns: vec![SqlColumnDefinition {
                name: "discovered".into(),
                data_type: SqlExpression::DataType(SqlDataType::Date),
                constraints: vec![],
            }],
            modify_columns: vec![(
                "mass".into(),
                SqlExpression::DataType(SqlDataType::Double),
            )],
            drop_columns: vec!["color".into()],
            drop_constraints: vec!["uq:planets.name".into()],
            ..Default::default()
        }));
        assert_eq!(
            WRITER.serialize(&alter).sql,
            indoc! {r#"
                ALTER TABLE "planets"
                ADD "discovered" DATE,
                ALTER COLUMN "mass" SET DATA TYPE DOUBLE PRECISION,
                DROP "color",
                DROP CONSTRAINT "uq:planets.name""#}
        );
    }

    #[test]
    fn enums() {
        let create = SqlExpression::CreateEnum(Box::new(SqlCreateEnum {
            name: "planet_type".into(),
            cases: vec!["rocky".into(), "gas_giant".into()],
        }));
        assert_eq!(
            WRITER.serialize(&create).sql,
            r#"CREATE TYPE "planet_type" AS ENUM ('rocky', 'gas_giant')"#
        );
        let alter = SqlExpression::AlterEnum(Box::new(SqlAlterEnum {
            name: "planet_type".into(),
            add_value: "dwarf".into(),
        }));
        assert_eq!(
            WRITER.serialize(&alter).sql,
            r#"ALTER TYPE "planet_type" ADD VALUE 'dwarf'"#
        );
    }

    #[test]
    fn literal_values() {
        let mut context = Default::default();
        let mut out = Default::default();
        for value in [
            Value::Null,
            Value::Boolean(Some(true)),
            Value::Int64(Some(-12)),
            Value::Float64(Some(f64::NEG_INFINITY)),
            Value::Varchar(Some("O'Neil \"x\"".into())),
            Value::Blob(Some([0xCA, 0xFE].into())),
            Value::Date(Some(date!(2025 - 03 - 09))),
            Value::Time(Some(time!(7:05:00.25))),
            Value::Timestamp(Some(datetime!(2025-03-09 07:05))),
            Value::TimestampWithTimezone(Some(datetime!(2025-03-09 07:05 +1))),
            Value::Int32(None),
        ] {
            WRITER.write_value(&mut context, &mut out, &value);
            out.push_str("; ");
        }
        assert_eq!(
            out.sql,
            "NULL; true; -12; CAST('-Infinity' AS DOUBLE PRECISION); 'O''Neil \"x\"'; X'CAFE'; \
             '2025-03-09'; '07:05:00.25'; '2025-03-09T07:05:00'; '2025-03-09T06:05:00+00:00'; NULL; "
        );
    }

    #[test]
    fn transaction_statements() {
        let mut out = String::new();
        WRITER.write_transaction_begin(&mut out);
        out.push(';');
        WRITER.write_transaction_commit(&mut out);
        out.push(';');
        WRITER.write_transaction_rollback(&mut out);
        assert_eq!(out, "BEGIN;COMMIT;ROLLBACK");
    }
}
