use crate::{
    BinaryOp, BinaryOpType, ForeignKeyAction, JoinType, Order, Ordered, SqlAlterEnum,
    SqlAlterTable, SqlColumnConstraint, SqlColumnDefinition, SqlCreateEnum, SqlCreateTable,
    SqlDataType, SqlDelete, SqlDropEnum, SqlDropTable, SqlExpression, SqlInsert, SqlJoin,
    SqlLiteral, SqlReferences, SqlSelect, SqlTable, SqlTableConstraint,
    SqlTableConstraintAlgorithm, SqlUpdate, Value, possibly_parenthesized, separated_by,
    writer::{Context, Fragment, SqlQuery},
};
use std::fmt::Write;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($this:ident, $context:ident, $out:ident, $value:expr) => {{
        if $value.is_infinite() {
            $this.write_value_infinity($context, $out, $value.is_sign_negative());
        } else if $value.is_nan() {
            $this.write_value_nan($context, $out);
        } else {
            let mut buffer = ryu::Buffer::new();
            $out.push_str(buffer.format($value));
        }
    }};
}

/// Dialect printer converting [`SqlExpression`] trees into SQL text and binds.
///
/// Every method has a generic implementation, dialects override the ones whose
/// syntax differs.
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    /// Serialize a whole expression. Each call starts from a fresh context, so
    /// placeholders are numbered from the first one every time.
    fn serialize(&self, expression: &SqlExpression) -> SqlQuery {
        let mut context = Context::default();
        let mut out = SqlQuery::default();
        self.write_expression(&mut context, &mut out, expression);
        out
    }

    /// Whether binds are printed as literals in the current fragment (DDL cannot take parameters).
    fn inline_binds(&self, context: &Context) -> bool {
        matches!(
            context.fragment,
            Fragment::SqlCreateTable
                | Fragment::SqlAlterTable
                | Fragment::SqlCreateType
                | Fragment::SqlAlterType
        )
    }

    /// Whether the current fragment declares table aliases.
    fn alias_declaration(&self, context: &Context) -> bool {
        matches!(context.fragment, Fragment::SqlSelectFrom | Fragment::SqlJoin)
    }

    fn write_expression(&self, context: &mut Context, out: &mut SqlQuery, value: &SqlExpression) {
        match value {
            SqlExpression::Raw(v) => out.push_str(v),
            SqlExpression::Identifier(v) => self.write_identifier_quoted(context, out, v),
            SqlExpression::Column { table, name } => {
                self.write_column(context, out, table.as_deref(), name)
            }
            SqlExpression::Table(v) => self.write_table(context, out, v),
            SqlExpression::Literal(v) => self.write_literal(context, out, v),
            SqlExpression::Bind(v) => self.write_bind(context, out, v),
            SqlExpression::Binary(v) => self.write_expression_binary_op(context, out, v),
            SqlExpression::Group(v) => {
                out.push('(');
                self.write_expression(context, out, v);
                out.push(')');
            }
            SqlExpression::List(v) => separated_by(
                out,
                v,
                |out, v| self.write_expression(context, out, v),
                ", ",
            ),
            SqlExpression::Function { name, args } => {
                self.write_function(context, out, name, args)
            }
            SqlExpression::Alias { expression, alias } => {
                self.write_alias(context, out, expression, alias)
            }
            SqlExpression::NestedSubpath { column, path } => {
                self.write_nested_subpath(context, out, column, path)
            }
            SqlExpression::DataType(v) => self.write_data_type(context, out, v),
            SqlExpression::Select(v) => self.write_select(context, out, v),
            SqlExpression::Insert(v) => self.write_insert(context, out, v),
            SqlExpression::Update(v) => self.write_update(context, out, v),
            SqlExpression::Delete(v) => self.write_delete(context, out, v),
            SqlExpression::Returning { statement, columns } => {
                self.write_returning(context, out, statement, columns)
            }
            SqlExpression::CreateTable(v) => self.write_create_table(context, out, v),
            SqlExpression::AlterTable(v) => self.write_alter_table(context, out, v),
            SqlExpression::DropTable(v) => self.write_drop_table(context, out, v),
            SqlExpression::CreateEnum(v) => self.write_create_enum(context, out, v),
            SqlExpression::AlterEnum(v) => self.write_alter_enum(context, out, v),
            SqlExpression::DropEnum(v) => self.write_drop_enum(context, out, v),
        }
    }

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(
        &self,
        _context: &mut Context,
        out: &mut SqlQuery,
        value: &str,
        search: char,
        replace: &str,
    ) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote identifiers ("name") doubling inner quotes.
    fn write_identifier_quoted(&self, context: &mut Context, out: &mut SqlQuery, value: &str) {
        out.push('"');
        self.write_escaped(context, out, value, '"', "\"\"");
        out.push('"');
    }

    fn write_table(&self, context: &mut Context, out: &mut SqlQuery, value: &SqlTable) {
        let declaration = self.alias_declaration(context);
        if declaration || value.alias.is_none() {
            if let Some(space) = &value.space {
                self.write_identifier_quoted(context, out, space);
                out.push('.');
            }
            self.write_identifier_quoted(context, out, &value.name);
        }
        if let Some(alias) = &value.alias {
            if declaration {
                out.push_str(" AS ");
            }
            self.write_identifier_quoted(context, out, alias);
        }
    }

    fn write_column(
        &self,
        context: &mut Context,
        out: &mut SqlQuery,
        table: Option<&str>,
        name: &str,
    ) {
        if let Some(table) = table.filter(|_| context.qualify_columns) {
            self.write_identifier_quoted(context, out, table);
            out.push('.');
        }
        self.write_identifier_quoted(context, out, name);
    }

    fn write_literal(&self, context: &mut Context, out: &mut SqlQuery, value: &SqlLiteral) {
        match value {
            SqlLiteral::Null => out.push_str("NULL"),
            SqlLiteral::Default => out.push_str("DEFAULT"),
            SqlLiteral::All => out.push('*'),
            SqlLiteral::Boolean(v) => self.write_value_bool(context, out, *v),
            SqlLiteral::Numeric(v) => out.push_str(v),
            SqlLiteral::String(v) => self.write_value_string(context, out, v),
        }
    }

    fn write_bind(&self, context: &mut Context, out: &mut SqlQuery, value: &Value) {
        if self.inline_binds(context) {
            return self.write_value(context, out, value);
        }
        context.counter += 1;
        out.binds.push(value.clone());
        self.write_placeholder(context, out);
    }

    /// Render parameter placeholder (dialect may override).
    fn write_placeholder(&self, _context: &mut Context, out: &mut SqlQuery) {
        out.push('?');
    }

    /// Render a concrete value (including proper quoting / escaping).
    fn write_value(&self, context: &mut Context, out: &mut SqlQuery, value: &Value) {
        match value {
            v if v.is_null() => self.write_value_none(context, out),
            Value::Boolean(Some(v)) => self.write_value_bool(context, out, *v),
            Value::Int8(Some(v)) => self.write_value_i8(context, out, *v),
            Value::Int16(Some(v)) => write_integer!(out, *v),
            Value::Int32(Some(v)) => write_integer!(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::UInt32(Some(v)) => write_integer!(out, *v),
            Value::Float32(Some(v)) => write_float!(self, context, out, *v),
            Value::Float64(Some(v)) => write_float!(self, context, out, *v),
            Value::Decimal(Some(v)) => {
                let _ = write!(out, "{}", v);
            }
            Value::Varchar(Some(v)) => self.write_value_string(context, out, v),
            Value::Blob(Some(v)) => self.write_value_blob(context, out, v),
            Value::Date(Some(v)) => self.write_value_date(context, out, v, false),
            Value::Time(Some(v)) => self.write_value_time(context, out, v, false),
            Value::Timestamp(Some(v)) => self.write_value_timestamp(context, out, v),
            Value::TimestampWithTimezone(Some(v)) => {
                self.write_value_timestamptz(context, out, v)
            }
            Value::Uuid(Some(v)) => {
                let _ = write!(out, "'{}'", v);
            }
            Value::Json(Some(v)) => self.write_value_string(context, out, &v.to_string()),
            Value::List(Some(v), ..) => self.write_value_list(context, out, v),
            _ => log::error!("Cannot write {:?}", value),
        }
    }

    /// Render NULL literal.
    fn write_value_none(&self, _context: &mut Context, out: &mut SqlQuery) {
        out.push_str("NULL");
    }

    /// Render single byte integer literal.
    fn write_value_i8(&self, _context: &mut Context, out: &mut SqlQuery, value: i8) {
        write_integer!(out, value);
    }

    /// Render boolean literal.
    fn write_value_bool(&self, _context: &mut Context, out: &mut SqlQuery, value: bool) {
        out.push_str(["false", "true"][value as usize]);
    }

    fn write_value_infinity(&self, context: &mut Context, out: &mut SqlQuery, negative: bool) {
        out.push_str("CAST(");
        self.write_value_string(
            context,
            out,
            if negative { "-Infinity" } else { "Infinity" },
        );
        out.push_str(" AS ");
        self.write_data_type(context, out, &SqlDataType::Double);
        out.push(')');
    }

    fn write_value_nan(&self, context: &mut Context, out: &mut SqlQuery) {
        out.push_str("CAST(");
        self.write_value_string(context, out, "NaN");
        out.push_str(" AS ");
        self.write_data_type(context, out, &SqlDataType::Double);
        out.push(')');
    }

    /// Render and escape a string literal using single quotes.
    fn write_value_string(&self, context: &mut Context, out: &mut SqlQuery, value: &str) {
        out.push('\'');
        self.write_escaped(context, out, value, '\'', "''");
        out.push('\'');
    }

    /// Render a blob literal using hex escapes.
    fn write_value_blob(&self, _context: &mut Context, out: &mut SqlQuery, value: &[u8]) {
        out.push_str("X'");
        for b in value {
            let _ = write!(out, "{:02X}", b);
        }
        out.push('\'');
    }

    /// Render a DATE literal (optionally as part of TIMESTAMP composition).
    fn write_value_date(
        &self,
        _context: &mut Context,
        out: &mut SqlQuery,
        value: &Date,
        timestamp: bool,
    ) {
        let b = if timestamp { "" } else { "'" };
        let _ = write!(
            out,
            "{b}{:04}-{:02}-{:02}{b}",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    /// Render a TIME literal (optionally as part of TIMESTAMP composition).
    fn write_value_time(
        &self,
        _context: &mut Context,
        out: &mut SqlQuery,
        value: &Time,
        timestamp: bool,
    ) {
        let b = if timestamp { "" } else { "'" };
        let _ = write!(
            out,
            "{b}{:02}:{:02}:{:02}",
            value.hour(),
            value.minute(),
            value.second(),
        );
        let mut subsecond = value.nanosecond();
        if subsecond != 0 {
            let mut width = 9;
            while subsecond % 10 == 0 {
                subsecond /= 10;
                width -= 1;
            }
            let _ = write!(out, ".{:0width$}", subsecond);
        }
        out.push_str(b);
    }

    /// Render a TIMESTAMP literal.
    fn write_value_timestamp(
        &self,
        context: &mut Context,
        out: &mut SqlQuery,
        value: &PrimitiveDateTime,
    ) {
        out.push('\'');
        self.write_value_date(context, out, &value.date(), true);
        out.push('T');
        self.write_value_time(context, out, &value.time(), true);
        out.push('\'');
    }

    /// Render a TIMESTAMPTZ literal, normalized to UTC.
    fn write_value_timestamptz(
        &self,
        context: &mut Context,
        out: &mut SqlQuery,
        value: &OffsetDateTime,
    ) {
        let date_time = value.to_utc();
        out.push('\'');
        self.write_value_date(context, out, &date_time.date(), true);
        out.push('T');
        self.write_value_time(context, out, &date_time.time(), true);
        out.push_str("+00:00'");
    }

    /// Render list literal.
    fn write_value_list(&self, context: &mut Context, out: &mut SqlQuery, value: &[Value]) {
        out.push('[');
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

    /// Generic type names.
    fn write_data_type(&self, _context: &mut Context, out: &mut SqlQuery, value: &SqlDataType) {
        out.push_str(match value {
            SqlDataType::SmallInt => "SMALLINT",
            SqlDataType::Int => "INTEGER",
            SqlDataType::BigInt => "BIGINT",
            SqlDataType::Text => "TEXT",
            SqlDataType::Real => "REAL",
            SqlDataType::Double => "DOUBLE PRECISION",
            SqlDataType::Numeric => "NUMERIC",
            SqlDataType::Boolean => "BOOLEAN",
            SqlDataType::Blob => "BLOB",
            SqlDataType::Date => "DATE",
            SqlDataType::Time => "TIME",
            SqlDataType::Timestamp => "TIMESTAMP",
            SqlDataType::Custom(v) => v,
        });
    }

    /// Precedence table for binary operators.
    fn expression_binary_op_precedence(&self, value: &BinaryOpType) -> i32 {
        match value {
            BinaryOpType::Or => 100,
            BinaryOpType::And => 200,
            BinaryOpType::Equal => 300,
            BinaryOpType::NotEqual => 300,
            BinaryOpType::Less => 300,
            BinaryOpType::Greater => 300,
            BinaryOpType::LessEqual => 300,
            BinaryOpType::GreaterEqual => 300,
            BinaryOpType::Custom(..) => 300,
            BinaryOpType::Is => 400,
            BinaryOpType::IsNot => 400,
            BinaryOpType::In => 400,
            BinaryOpType::NotIn => 400,
            BinaryOpType::Like => 400,
            BinaryOpType::NotLike => 400,
            BinaryOpType::Concatenate => 500,
        }
    }

    /// Render binary operator expression handling precedence / parenthesis.
    fn write_expression_binary_op(&self, context: &mut Context, out: &mut SqlQuery, value: &BinaryOp) {
        let precedence = self.expression_binary_op_precedence(&value.op);
        possibly_parenthesized!(
            out,
            value.lhs.precedence(self.as_dyn()) < precedence,
            self.write_expression(context, out, &value.lhs)
        );
        let _ = write!(out, " {} ", value.op);
        possibly_parenthesized!(
            out,
            value.rhs.precedence(self.as_dyn()) <= precedence,
            self.write_expression(context, out, &value.rhs)
        );
    }

    fn write_function(
        &self,
        context: &mut Context,
        out: &mut SqlQuery,
        name: &str,
        args: &[SqlExpression],
    ) {
        out.push_str(name);
        out.push('(');
        separated_by(
            out,
            args,
            |out, v| self.write_expression(context, out, v),
            ", ",
        );
        out.push(')');
    }

    fn write_alias(
        &self,
        context: &mut Context,
        out: &mut SqlQuery,
        expression: &SqlExpression,
        alias: &str,
    ) {
        self.write_expression(context, out, expression);
        if context.fragment != Fragment::SqlSelectOrderBy {
            out.push_str(" AS ");
            self.write_identifier_quoted(context, out, alias);
        }
    }

    /// Extract a value nested inside a JSON column.
    fn write_nested_subpath(
        &self,
        context: &mut Context,
        out: &mut SqlQuery,
        column: &SqlExpression,
        path: &[String],
    ) {
        out.push_str("JSON_VALUE(");
        self.write_expression(context, out, column);
        out.push_str(", ");
        let mut json_path = String::from("$");
        for segment in path {
            json_path.push('.');
            json_path.push_str(segment);
        }
        self.write_value_string(context, out, &json_path);
        out.push(')');
    }

    /// Render join keyword(s) for the given join type.
    fn write_join_type(&self, _context: &mut Context, out: &mut SqlQuery, join_type: &JoinType) {
        out.push_str(match join_type {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL JOIN",
            JoinType::Custom(v) => v,
        });
    }

    /// Render a JOIN clause.
    fn write_join(&self, context: &mut Context, out: &mut SqlQuery, join: &SqlJoin) {
        let mut context = context.switch_fragment(Fragment::SqlJoin);
        let len = out.len();
        self.write_join_type(&mut context.current, out, &join.join);
        if out.len() > len {
            out.push(' ');
        }
        self.write_expression(&mut context.current, out, &join.table);
        if let Some(on) = &join.on {
            out.push_str(" ON ");
            context.current.fragment = Fragment::SqlSelectWhere;
            self.write_expression(&mut context.current, out, on);
        }
    }

    /// Render ordered expression inside ORDER BY.
    fn write_ordered(&self, context: &mut Context, out: &mut SqlQuery, value: &Ordered) {
        self.write_expression(context, out, &value.expression);
        let order = match &value.order {
            Order::ASC => "ASC",
            Order::DESC => "DESC",
            Order::Custom(v) => v,
        };
        if !order.is_empty() {
            out.push(' ');
            out.push_str(order);
        }
    }

    /// Emit BEGIN statement.
    fn write_transaction_begin(&self, out: &mut String) {
        out.push_str("BEGIN");
    }

    /// Emit COMMIT statement.
    fn write_transaction_commit(&self, out: &mut String) {
        out.push_str("COMMIT");
    }

    /// Emit ROLLBACK statement.
    fn write_transaction_rollback(&self, out: &mut String) {
        out.push_str("ROLLBACK");
    }

    /// Emit SELECT statement (projection, FROM, JOIN, WHERE, ORDER, LIMIT, OFFSET).
    fn write_select(&self, context: &mut Context, out: &mut SqlQuery, value: &SqlSelect) {
        let mut context = context.switch_fragment(Fragment::SqlSelect);
        out.push_str("SELECT ");
        if value.distinct {
            out.push_str("DISTINCT ");
        }
        if value.columns.is_empty() {
            out.push('*');
        }
        separated_by(
            out,
            &value.columns,
            |out, v| self.write_expression(&mut context.current, out, v),
            ", ",
        );
        if !value.from.is_empty() {
            out.push_str("\nFROM ");
            let mut context = context.current.switch_fragment(Fragment::SqlSelectFrom);
            separated_by(
                out,
                &value.from,
                |out, v| self.write_expression(&mut context.current, out, v),
                ", ",
            );
        }
        for join in &value.joins {
            out.push('\n');
            self.write_join(&mut context.current, out, join);
        }
        if let Some(predicate) = &value.predicate {
            out.push_str("\nWHERE ");
            self.write_expression(
                &mut context.current.switch_fragment(Fragment::SqlSelectWhere).current,
                out,
                predicate,
            );
        }
        if !value.order_by.is_empty() {
            out.push_str("\nORDER BY ");
            let mut context = context.current.switch_fragment(Fragment::SqlSelectOrderBy);
            separated_by(
                out,
                &value.order_by,
                |out, v| self.write_ordered(&mut context.current, out, v),
                ", ",
            );
        }
        if let Some(limit) = &value.limit {
            out.push_str("\nLIMIT ");
            self.write_expression(&mut context.current, out, limit);
        }
        if let Some(offset) = &value.offset {
            out.push_str("\nOFFSET ");
            self.write_expression(&mut context.current, out, offset);
        }
    }

    /// Emit INSERT with one or more rows.
    fn write_insert(&self, context: &mut Context, out: &mut SqlQuery, value: &SqlInsert) {
        let mut context = context.switch_fragment(Fragment::SqlInsertInto);
        out.push_str("INSERT INTO ");
        self.write_table(&mut context.current, out, &value.table);
        out.push_str(" (");
        separated_by(
            out,
            &value.columns,
            |out, v| self.write_identifier_quoted(&mut context.current, out, v),
            ", ",
        );
        out.push_str(") VALUES\n");
        let mut context = context.current.switch_fragment(Fragment::SqlInsertIntoValues);
        separated_by(
            out,
            &value.values,
            |out, row| {
                out.push('(');
                separated_by(
                    out,
                    row,
                    |out, v| self.write_expression(&mut context.current, out, v),
                    ", ",
                );
                out.push(')');
            },
            ",\n",
        );
    }

    /// Emit UPDATE with SET list and WHERE clause.
    fn write_update(&self, context: &mut Context, out: &mut SqlQuery, value: &SqlUpdate) {
        let mut context = context.switch_fragment(Fragment::SqlUpdate);
        out.push_str("UPDATE ");
        self.write_table(&mut context.current, out, &value.table);
        out.push_str("\nSET ");
        {
            let mut context = context.current.switch_fragment(Fragment::SqlUpdateSet);
            separated_by(
                out,
                &value.values,
                |out, (column, v)| {
                    self.write_identifier_quoted(&mut context.current, out, column);
                    out.push_str(" = ");
                    self.write_expression(&mut context.current, out, v);
                },
                ", ",
            );
        }
        if let Some(predicate) = &value.predicate {
            out.push_str("\nWHERE ");
            self.write_expression(
                &mut context.current.switch_fragment(Fragment::SqlUpdateWhere).current,
                out,
                predicate,
            );
        }
    }

    /// Emit DELETE statement with WHERE clause.
    fn write_delete(&self, context: &mut Context, out: &mut SqlQuery, value: &SqlDelete) {
        let mut context = context.switch_fragment(Fragment::SqlDeleteFrom);
        out.push_str("DELETE FROM ");
        self.write_table(&mut context.current, out, &value.table);
        if let Some(predicate) = &value.predicate {
            out.push_str("\nWHERE ");
            self.write_expression(
                &mut context
                    .current
                    .switch_fragment(Fragment::SqlDeleteFromWhere)
                    .current,
                out,
                predicate,
            );
        }
    }

    fn write_returning(
        &self,
        context: &mut Context,
        out: &mut SqlQuery,
        statement: &SqlExpression,
        columns: &[SqlExpression],
    ) {
        self.write_expression(context, out, statement);
        out.push_str("\nRETURNING ");
        let mut context = context.switch_fragment(Fragment::SqlReturning);
        separated_by(
            out,
            columns,
            |out, v| self.write_expression(&mut context.current, out, v),
            ", ",
        );
    }

    /// Emit CREATE TABLE with columns and table constraints.
    fn write_create_table(&self, context: &mut Context, out: &mut SqlQuery, value: &SqlCreateTable) {
        let mut context = context.switch_fragment(Fragment::SqlCreateTable);
        out.push_str("CREATE TABLE ");
        if value.if_not_exists {
            out.push_str("IF NOT EXISTS ");
        }
        self.write_table(&mut context.current, out, &value.table);
        out.push_str(" (\n");
        separated_by(
            out,
            &value.columns,
            |out, v| self.write_column_definition(&mut context.current, out, v),
            ",\n",
        );
        if !value.columns.is_empty() && !value.constraints.is_empty() {
            out.push_str(",\n");
        }
        separated_by(
            out,
            &value.constraints,
            |out, v| self.write_table_constraint(&mut context.current, out, v),
            ",\n",
        );
        out.push_str("\n)");
    }

    /// Emit single column definition fragment.
    fn write_column_definition(
        &self,
        context: &mut Context,
        out: &mut SqlQuery,
        value: &SqlColumnDefinition,
    ) {
        self.write_identifier_quoted(context, out, &value.name);
        out.push(' ');
        self.write_expression(context, out, &value.data_type);
        for constraint in &value.constraints {
            self.write_column_constraint(context, out, constraint);
        }
    }

    fn write_column_constraint(
        &self,
        context: &mut Context,
        out: &mut SqlQuery,
        value: &SqlColumnConstraint,
    ) {
        match value {
            SqlColumnConstraint::NotNull => out.push_str(" NOT NULL"),
            SqlColumnConstraint::PrimaryKey { auto_increment } => {
                self.write_column_primary_key(context, out, *auto_increment)
            }
            SqlColumnConstraint::References(references) => {
                out.push(' ');
                self.write_references(context, out, references);
            }
            SqlColumnConstraint::Default(v) => {
                out.push_str(" DEFAULT ");
                self.write_expression(context, out, v);
            }
            SqlColumnConstraint::Custom(v) => {
                out.push(' ');
                self.write_expression(context, out, v);
            }
        }
    }

    fn write_column_primary_key(
        &self,
        _context: &mut Context,
        out: &mut SqlQuery,
        auto_increment: bool,
    ) {
        out.push_str(" PRIMARY KEY");
        if auto_increment {
            out.push_str(" GENERATED BY DEFAULT AS IDENTITY");
        }
    }

    fn write_references(&self, context: &mut Context, out: &mut SqlQuery, value: &SqlReferences) {
        out.push_str("REFERENCES ");
        self.write_table(context, out, &value.table);
        out.push_str(" (");
        separated_by(
            out,
            &value.columns,
            |out, v| self.write_identifier_quoted(context, out, v),
            ", ",
        );
        out.push_str(") ON DELETE ");
        self.write_references_action(context, out, &value.on_delete);
        out.push_str(" ON UPDATE ");
        self.write_references_action(context, out, &value.on_update);
    }

    /// Emit referential action keyword.
    fn write_references_action(
        &self,
        _context: &mut Context,
        out: &mut SqlQuery,
        action: &ForeignKeyAction,
    ) {
        out.push_str(match action {
            ForeignKeyAction::NoAction => "NO ACTION",
            ForeignKeyAction::Restrict => "RESTRICT",
            ForeignKeyAction::Cascade => "CASCADE",
            ForeignKeyAction::SetNull => "SET NULL",
            ForeignKeyAction::SetDefault => "SET DEFAULT",
        });
    }

    fn write_table_constraint(
        &self,
        context: &mut Context,
        out: &mut SqlQuery,
        value: &SqlTableConstraint,
    ) {
        if let Some(name) = &value.name {
            out.push_str("CONSTRAINT ");
            self.write_identifier_quoted(context, out, name);
            out.push(' ');
        }
        let mut columns = |out: &mut SqlQuery, columns: &[String]| {
            out.push('(');
            separated_by(
                out,
                columns,
                |out, v| self.write_identifier_quoted(context, out, v),
                ", ",
            );
            out.push(')');
        };
        match &value.algorithm {
            SqlTableConstraintAlgorithm::PrimaryKey(v) => {
                out.push_str("PRIMARY KEY ");
                columns(out, v);
            }
            SqlTableConstraintAlgorithm::Unique(v) => {
                out.push_str("UNIQUE ");
                columns(out, v);
            }
            SqlTableConstraintAlgorithm::ForeignKey {
                columns: v,
                references,
            } => {
                out.push_str("FOREIGN KEY ");
                columns(out, v);
                out.push(' ');
                self.write_references(context, out, references);
            }
            SqlTableConstraintAlgorithm::Custom(v) => self.write_expression(context, out, v),
        }
    }

    /// Emit ALTER TABLE with every change separated by commas.
    fn write_alter_table(&self, context: &mut Context, out: &mut SqlQuery, value: &SqlAlterTable) {
        let mut context = context.switch_fragment(Fragment::SqlAlterTable);
        let context = &mut context.current;
        out.push_str("ALTER TABLE ");
        self.write_table(context, out, &value.table);
        out.push('\n');
        let mut separate = false;
        let mut separator = |out: &mut SqlQuery| {
            if separate {
                out.push_str(",\n");
            }
            separate = true;
        };
        for column in &value.add_columns {
            separator(out);
            out.push_str("ADD ");
            self.write_column_definition(context, out, column);
        }
        for (name, data_type) in &value.modify_columns {
            separator(out);
            self.write_alter_column_type(context, out, name, data_type);
        }
        for name in &value.drop_columns {
            separator(out);
            out.push_str("DROP ");
            self.write_identifier_quoted(context, out, name);
        }
        for constraint in &value.add_constraints {
            separator(out);
            out.push_str("ADD ");
            self.write_table_constraint(context, out, constraint);
        }
        for name in &value.drop_constraints {
            separator(out);
            out.push_str("DROP CONSTRAINT ");
            self.write_identifier_quoted(context, out, name);
        }
    }

    fn write_alter_column_type(
        &self,
        context: &mut Context,
        out: &mut SqlQuery,
        name: &str,
        data_type: &SqlExpression,
    ) {
        out.push_str("ALTER COLUMN ");
        self.write_identifier_quoted(context, out, name);
        out.push_str(" SET DATA TYPE ");
        self.write_expression(context, out, data_type);
    }

    /// Emit DROP TABLE statement.
    fn write_drop_table(&self, context: &mut Context, out: &mut SqlQuery, value: &SqlDropTable) {
        let mut context = context.switch_fragment(Fragment::SqlDropTable);
        out.push_str("DROP TABLE ");
        if value.if_exists {
            out.push_str("IF EXISTS ");
        }
        self.write_table(&mut context.current, out, &value.table);
    }

    fn write_create_enum(&self, context: &mut Context, out: &mut SqlQuery, value: &SqlCreateEnum) {
        let mut context = context.switch_fragment(Fragment::SqlCreateType);
        out.push_str("CREATE TYPE ");
        self.write_identifier_quoted(&mut context.current, out, &value.name);
        out.push_str(" AS ENUM (");
        separated_by(
            out,
            &value.cases,
            |out, v| self.write_value_string(&mut context.current, out, v),
            ", ",
        );
        out.push(')');
    }

    fn write_alter_enum(&self, context: &mut Context, out: &mut SqlQuery, value: &SqlAlterEnum) {
        let mut context = context.switch_fragment(Fragment::SqlAlterType);
        out.push_str("ALTER TYPE ");
        self.write_identifier_quoted(&mut context.current, out, &value.name);
        out.push_str(" ADD VALUE ");
        self.write_value_string(&mut context.current, out, &value.add_value);
    }

    fn write_drop_enum(&self, context: &mut Context, out: &mut SqlQuery, value: &SqlDropEnum) {
        let mut context = context.switch_fragment(Fragment::SqlDropType);
        out.push_str("DROP TYPE ");
        if value.if_exists {
            out.push_str("IF EXISTS ");
        }
        self.write_identifier_quoted(&mut context.current, out, &value.name);
    }
}

/// Fallback generic SQL writer.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self
    }
}

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
