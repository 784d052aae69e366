#[cfg(test)]
mod tests {
    use fluent_core::{AsValue, Value};
    use rust_decimal::Decimal;
    use time::macros::date;

    #[test]
    fn value_none() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Float32(Some(1.0)), Value::Null);
        assert!(Value::Null.is_null());
        assert!(Value::Int32(None).is_null());
        assert!(!Value::Int32(Some(0)).is_null());
    }

    #[test]
    fn value_typed_null() {
        assert_eq!(Value::Int64(None), Value::Int64(None));
        assert_ne!(Value::Int64(None), Value::Int32(None));
        assert_eq!(Option::<String>::None.as_value(), Value::Varchar(None));
        assert_eq!(Value::Int16(Some(3)).as_null(), Value::Int16(None));
        assert_eq!(
            Vec::<i32>::new().as_value().as_null(),
            Value::List(None, Box::new(Value::Int32(None)))
        );
    }

    #[test]
    fn value_same_type() {
        let a = vec![1i64, 2].as_value();
        let b = Vec::<i64>::new().as_value();
        let c = vec![1i32, 2].as_value();
        assert!(a.same_type(&b));
        assert!(!a.same_type(&c));
        assert_ne!(a, c);
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Boolean(None).to_string(), "NULL");
        assert_eq!(Value::Varchar(Some("Earth".into())).to_string(), "\"Earth\"");
        assert_eq!(vec![1i32, 2, 3].as_value().to_string(), "[1, 2, 3]");
        assert_eq!(Decimal::new(1234, 2).as_value().to_string(), "12.34");
        assert_eq!(date!(2025 - 01 - 31).as_value().to_string(), "2025-01-31");
        assert_eq!(Value::Blob(Some([1, 2].into())).to_string(), "<2 bytes>");
    }

    #[test]
    fn value_type_name() {
        assert_eq!(Value::Int8(None).type_name(), "Int8");
        assert_eq!(Value::TimestampWithTimezone(None).type_name(), "TimestampWithTimezone");
        assert_eq!(Value::List(None, Box::new(Value::Null)).type_name(), "List");
    }
}
