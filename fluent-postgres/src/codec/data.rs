use bytes::{Bytes, BytesMut};
use postgres_types::{FromSql, IsNull, ToSql, Type, to_sql_checked};
use std::error::Error;

/// A value in its wire representation, tagged with its PostgreSQL type.
///
/// `value` is `None` for NULL: the type is kept anyway so the server can still
/// use it when planning the statement.
#[derive(Debug, Clone, PartialEq)]
pub struct PostgresData {
    pub ty: Type,
    pub value: Option<Bytes>,
}

impl PostgresData {
    pub fn new(ty: Type, value: Option<Bytes>) -> Self {
        Self { ty, value }
    }

    pub fn null(ty: Type) -> Self {
        Self { ty, value: None }
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }
}

impl ToSql for PostgresData {
    fn to_sql(&self, _ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>>
    where
        Self: Sized,
    {
        match &self.value {
            Some(v) => {
                out.extend_from_slice(v);
                Ok(IsNull::No)
            }
            None => Ok(IsNull::Yes),
        }
    }

    fn accepts(_ty: &Type) -> bool
    where
        Self: Sized,
    {
        true
    }

    to_sql_checked!();
}

impl<'a> FromSql<'a> for PostgresData {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Self::from_sql_nullable(ty, Some(raw))
    }

    fn from_sql_null(ty: &Type) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Self::from_sql_nullable(ty, None)
    }

    fn from_sql_nullable(
        ty: &Type,
        raw: Option<&'a [u8]>,
    ) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Ok(Self {
            ty: ty.clone(),
            value: raw.map(Bytes::copy_from_slice),
        })
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}
