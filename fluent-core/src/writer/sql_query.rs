use crate::Value;
use std::fmt::{self, Display, Write};

/// SQL text together with the values of its placeholders, in placeholder order.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub binds: Vec<Value>,
}

impl SqlQuery {
    pub fn push(&mut self, c: char) {
        self.sql.push(c);
    }

    pub fn push_str(&mut self, value: &str) {
        self.sql.push_str(value);
    }

    pub fn len(&self) -> usize {
        self.sql.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

impl Write for SqlQuery {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.sql.push_str(s);
        Ok(())
    }
}

impl AsRef<str> for SqlQuery {
    fn as_ref(&self) -> &str {
        &self.sql
    }
}

impl Display for SqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
