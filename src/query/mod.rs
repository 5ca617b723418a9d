//! Chainable query builder compiled to one parameterized Postgres statement.
//!
//! A [`Query`] is a plain description until it is executed. Execution
//! consumes the builder, so each builder runs at most once. Results come back
//! as JSON rows that can be decoded straight into the crate's models:
//!
//! ```ignore
//! let brands: Vec<Brand> = Query::table("brands")
//!     .order("name", SortOrder::Asc)
//!     .fetch(&state.pool)
//!     .await?;
//! ```

pub mod relation;
pub mod statement;
pub mod value;

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use sqlx::PgPool;
use thiserror::Error;
use utoipa::ToSchema;

pub use relation::Relation;
pub use statement::{Filter, FilterOp, Projection, Statement};
pub use value::{Record, SqlValue};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),

    #[error("{0} requires at least one filter")]
    UnfilteredMutation(&'static str),

    #[error("cannot write an empty record")]
    EmptyRecord,

    #[error("relation {relation:?} cannot be used on table `{table}`")]
    RelationMismatch { relation: Relation, table: String },

    #[error("relations can only be used with SELECT")]
    RelationOnMutation,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("could not decode row: {0}")]
    Decode(#[from] serde_json::Error),
}

impl QueryError {
    /// Unique, foreign-key or check constraint rejected the write.
    pub fn constraint_message(&self) -> Option<String> {
        match self {
            QueryError::Database(sqlx::Error::Database(err))
                if err.is_unique_violation()
                    || err.is_foreign_key_violation()
                    || err.is_check_violation() =>
            {
                Some(err.message().to_string())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum Action {
    Select,
    Count,
    Insert(Record),
    Update(Record),
    Delete,
}

#[derive(Debug)]
pub struct Query {
    pub(crate) table: String,
    pub(crate) projection: Option<Projection>,
    pub(crate) filters: Vec<Filter>,
    pub(crate) order: Option<(String, SortOrder)>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    pub(crate) single: bool,
    pub(crate) action: Action,
    pub(crate) relation: Option<Relation>,
}

impl Query {
    pub fn table(name: &str) -> Self {
        Self {
            table: name.to_string(),
            projection: None,
            filters: Vec::new(),
            order: None,
            limit: None,
            offset: None,
            single: false,
            action: Action::Select,
            relation: None,
        }
    }

    /// Set the projection. On INSERT/UPDATE/DELETE this also requests a
    /// `RETURNING` clause with the same columns.
    pub fn select(mut self, columns: &str) -> Self {
        self.projection = Some(Projection::parse(columns));
        self
    }

    pub fn eq(self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.filter(column, FilterOp::Eq, value)
    }

    pub fn gte(self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.filter(column, FilterOp::Gte, value)
    }

    pub fn lte(self, column: &str, value: impl Into<SqlValue>) -> Self {
        self.filter(column, FilterOp::Lte, value)
    }

    fn filter(mut self, column: &str, op: FilterOp, value: impl Into<SqlValue>) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn order(mut self, column: &str, order: SortOrder) -> Self {
        self.order = Some((column.to_string(), order));
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Force `LIMIT 1` and unwrap the result to one row or `null`.
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    /// Expand the query with one of the known joins.
    pub fn with(mut self, relation: Relation) -> Self {
        self.relation = Some(relation);
        self
    }

    /// Replace the projection with `count(*)`; the result is `{"count": n}`.
    pub fn count(mut self) -> Self {
        self.action = Action::Count;
        self
    }

    pub fn insert(mut self, record: Record) -> Self {
        self.action = Action::Insert(record);
        self
    }

    pub fn update(mut self, record: Record) -> Self {
        self.action = Action::Update(record);
        self
    }

    pub fn delete(mut self) -> Self {
        self.action = Action::Delete;
        self
    }

    /// Compile without executing.
    pub fn statement(&self) -> Result<Statement, QueryError> {
        statement::compile(self)
    }

    /// Compile and run on one pooled connection.
    ///
    /// The connection goes back to the pool when this returns, on success
    /// and on error alike.
    pub async fn execute(self, pool: &PgPool) -> Result<Value, QueryError> {
        if let Action::Update(record) = &self.action {
            if record.is_empty() {
                return Ok(Value::Null);
            }
        }
        let statement = self.statement()?;
        let mut conn = pool.acquire().await?;
        let result = statement.run(&mut conn).await;
        if let Err(err) = &result {
            tracing::debug!(table = %self.table, error = %err, "query failed");
        }
        result
    }

    /// Execute and decode the JSON result into `T`.
    ///
    /// Use `Vec<T>` for lists and `Option<T>` together with [`Query::single`].
    pub async fn fetch<T: DeserializeOwned>(self, pool: &PgPool) -> Result<T, QueryError> {
        let value = self.execute(pool).await?;
        Ok(serde_json::from_value(value)?)
    }
}
