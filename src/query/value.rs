use chrono::{DateTime, Utc};
use sqlx::{Postgres, postgres::PgArguments, query::QueryScalar};

/// A value bound to a `$n` placeholder.
///
/// Every variant carries its own `Option` so that a NULL is still sent with
/// the column's type, which Postgres needs for inserts into typed columns.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Bool(Option<bool>),
    Int(Option<i64>),
    Float(Option<f64>),
    Text(Option<String>),
    Timestamp(Option<DateTime<Utc>>),
}

impl SqlValue {
    pub(crate) fn bind_scalar<'q, O>(
        self,
        query: QueryScalar<'q, Postgres, O, PgArguments>,
    ) -> QueryScalar<'q, Postgres, O, PgArguments> {
        match self {
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Int(v) => query.bind(v),
            SqlValue::Float(v) => query.bind(v),
            SqlValue::Text(v) => query.bind(v),
            SqlValue::Timestamp(v) => query.bind(v),
        }
    }

    pub(crate) fn bind_query<'q>(
        self,
        query: sqlx::query::Query<'q, Postgres, PgArguments>,
    ) -> sqlx::query::Query<'q, Postgres, PgArguments> {
        match self {
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Int(v) => query.bind(v),
            SqlValue::Float(v) => query.bind(v),
            SqlValue::Text(v) => query.bind(v),
            SqlValue::Timestamp(v) => query.bind(v),
        }
    }
}

macro_rules! sql_value_from {
    ($variant:ident, $($ty:ty => $conv:expr),+ $(,)?) => {
        $(
            impl From<$ty> for SqlValue {
                fn from(value: $ty) -> Self {
                    let conv: fn($ty) -> _ = $conv;
                    SqlValue::$variant(Some(conv(value)))
                }
            }

            impl From<Option<$ty>> for SqlValue {
                fn from(value: Option<$ty>) -> Self {
                    let conv: fn($ty) -> _ = $conv;
                    SqlValue::$variant(value.map(conv))
                }
            }
        )+
    };
}

sql_value_from!(Bool, bool => |v| v);
sql_value_from!(Int, i64 => |v| v, i32 => i64::from, u32 => i64::from);
sql_value_from!(Float, f64 => |v| v, f32 => f64::from);
sql_value_from!(Text, String => |v| v, &str => |v: &str| v.to_string());
sql_value_from!(Timestamp, DateTime<Utc> => |v| v);

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self {
        SqlValue::Text(Some(value.clone()))
    }
}

/// Ordered column/value pairs for INSERT and UPDATE.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, SqlValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing an earlier value for the same column.
    pub fn set(mut self, column: &str, value: impl Into<SqlValue>) -> Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| c == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column.to_string(), value)),
        }
        self
    }

    /// Set a column only when a value is present; used for partial updates.
    pub fn set_some<T: Into<SqlValue>>(self, column: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub(crate) fn into_parts(self) -> Vec<(String, SqlValue)> {
        self.fields
    }
}
