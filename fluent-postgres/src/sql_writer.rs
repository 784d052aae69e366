use fluent_core::{Context, SqlExpression, SqlQuery, SqlWriter, Value, separated_by};
use std::fmt::Write;

/// PostgreSQL dialect of the SQL writer.
#[derive(Default, Debug, Clone, Copy)]
pub struct PostgresSqlWriter {}

impl PostgresSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for PostgresSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_placeholder(&self, context: &mut Context, out: &mut SqlQuery) {
        let _ = write!(out, "${}", context.counter);
    }

    fn write_nested_subpath(
        &self,
        context: &mut Context,
        out: &mut SqlQuery,
        column: &SqlExpression,
        path: &[String],
    ) {
        self.write_expression(context, out, column);
        for (i, segment) in path.iter().enumerate() {
            out.push_str(if i + 1 == path.len() { "->>" } else { "->" });
            self.write_value_string(context, out, segment);
        }
    }

    fn write_value_i8(&self, _context: &mut Context, out: &mut SqlQuery, value: i8) {
        // No implicit cast from integers to "char"
        let _ = write!(out, "CAST({} AS \"char\")", value);
    }

    fn write_value_blob(&self, _context: &mut Context, out: &mut SqlQuery, value: &[u8]) {
        out.push_str("'\\x");
        for b in value {
            let _ = write!(out, "{:02X}", b);
        }
        out.push('\'');
    }

    fn write_value_list(&self, context: &mut Context, out: &mut SqlQuery, value: &[Value]) {
        out.push_str("ARRAY[");
        separated_by(
            out,
            value,
            |out, v| {
                self.write_value(context, out, v);
            },
            ",",
        );
        out.push(']');
    }
}

#[cfg(test)]
mod tests {
    use super::PostgresSqlWriter;
    use fluent_core::{
        BinaryOpType, Context, SqlExpression, SqlQuery, SqlSelect, SqlTable, SqlWriter, Value,
    };

    #[test]
    fn numbered_placeholders() {
        let writer = PostgresSqlWriter::new();
        let select = SqlExpression::Select(Box::new(SqlSelect {
            from: vec![SqlExpression::Table(SqlTable::new(None, "moons"))],
            predicate: SqlExpression::fold(
                ["a", "b", "c"].map(|column| {
                    SqlExpression::binary(
                        SqlExpression::column("moons", column),
                        BinaryOpType::Equal,
                        SqlExpression::bind(1),
                    )
                }),
                BinaryOpType::Or,
            ),
            ..Default::default()
        }));
        let expected = "SELECT *\nFROM \"moons\"\nWHERE \"moons\".\"a\" = $1 OR \"moons\".\"b\" = $2 OR \"moons\".\"c\" = $3";
        assert_eq!(writer.serialize(&select).sql, expected);
        assert_eq!(writer.serialize(&select).sql, expected);
    }

    #[test]
    fn json_path() {
        let writer = PostgresSqlWriter::new();
        let path = SqlExpression::NestedSubpath {
            column: Box::new(SqlExpression::column("planets", "metadata")),
            path: vec!["orbit".into(), "period".into()],
        };
        assert_eq!(
            writer.serialize(&path).sql,
            r#""planets"."metadata"->'orbit'->>'period'"#
        );
    }

    #[test]
    fn literals() {
        let writer = PostgresSqlWriter::new();
        let mut context = Context::default();
        let mut out = SqlQuery::default();
        writer.write_value(&mut context, &mut out, &Value::Blob(Some([0, 255].into())));
        out.push(' ');
        writer.write_value(
            &mut context,
            &mut out,
            &Value::List(
                Some(vec![Value::Int32(Some(1)), Value::Int32(Some(2))]),
                Box::new(Value::Int32(None)),
            ),
        );
        out.push(' ');
        writer.write_value(&mut context, &mut out, &Value::Int8(Some(65)));
        assert_eq!(out.sql, "'\\x00FF' ARRAY[1,2] CAST(65 AS \"char\")");
    }
}
