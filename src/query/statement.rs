use serde_json::Value;
use sqlx::PgConnection;

use super::{
    Action, Query, QueryError,
    relation::{Relation, nest_row},
    value::SqlValue,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
}

impl FilterOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: SqlValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    All,
    Columns(Vec<String>),
}

impl Projection {
    /// Parse `"*"` or a comma-separated column list.
    pub fn parse(columns: &str) -> Self {
        let cols: Vec<String> = columns
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if cols.is_empty() || cols.iter().any(|c| c == "*") {
            Projection::All
        } else {
            Projection::Columns(cols)
        }
    }
}

/// A compiled statement: SQL text plus the values for its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
    pub returns_rows: bool,
    pub single: bool,
    pub relation: Option<Relation>,
    is_select: bool,
    /// ORDER BY re-applied over the JSON wrapper, which may reorder rows.
    outer_order: Option<String>,
}

impl Statement {
    /// Number of distinct `$n` placeholders in the SQL text.
    pub fn placeholder_count(&self) -> usize {
        let bytes = self.sql.as_bytes();
        let mut seen = std::collections::BTreeSet::new();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'$' {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                if end > start {
                    seen.insert(&self.sql[start..end]);
                }
                i = end.max(start);
            } else {
                i += 1;
            }
        }
        seen.len()
    }

    /// SQL that yields one JSON object per result row.
    pub fn json_sql(&self) -> String {
        if self.is_select {
            format!(
                "SELECT to_jsonb(q) FROM ({}) AS q{}",
                self.sql,
                self.outer_order.as_deref().unwrap_or_default()
            )
        } else {
            format!("WITH q AS ({}) SELECT to_jsonb(q) FROM q", self.sql)
        }
    }

    pub(crate) async fn run(self, conn: &mut PgConnection) -> Result<Value, QueryError> {
        if !self.returns_rows {
            let mut query = sqlx::query(&self.sql);
            for param in self.params.iter().cloned() {
                query = param.bind_query(query);
            }
            query.execute(&mut *conn).await?;
            return Ok(Value::Null);
        }

        let sql = self.json_sql();
        let mut query = sqlx::query_scalar::<_, Value>(&sql);
        for param in self.params.iter().cloned() {
            query = param.bind_scalar(query);
        }
        let rows: Vec<Value> = query.fetch_all(&mut *conn).await?;
        let rows: Vec<Value> = match self.relation {
            Some(_) => rows.into_iter().map(nest_row).collect(),
            None => rows,
        };

        if self.single {
            Ok(rows.into_iter().next().unwrap_or(Value::Null))
        } else {
            Ok(Value::Array(rows))
        }
    }
}

/// Validate and double-quote an identifier, allowing one `table.column` dot.
pub fn quote_ident(name: &str) -> Result<String, QueryError> {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() > 2 || parts.iter().any(|p| !is_valid_ident(p)) {
        return Err(QueryError::InvalidIdentifier(name.to_string()));
    }
    Ok(parts
        .iter()
        .map(|p| format!("\"{p}\""))
        .collect::<Vec<_>>()
        .join("."))
}

fn is_valid_ident(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Quote a column, prefixing it with `base` unless it is already qualified.
fn qualify(column: &str, base: Option<&str>) -> Result<String, QueryError> {
    match base {
        Some(table) if !column.contains('.') => quote_ident(&format!("{table}.{column}")),
        _ => quote_ident(column),
    }
}

fn projection_sql(projection: &Projection, base: Option<&str>) -> Result<String, QueryError> {
    match projection {
        Projection::All => Ok(match base {
            Some(table) => format!("{}.*", quote_ident(table)?),
            None => "*".to_string(),
        }),
        Projection::Columns(cols) => cols
            .iter()
            .map(|c| qualify(c, base))
            .collect::<Result<Vec<_>, _>>()
            .map(|cols| cols.join(", ")),
    }
}

fn where_sql(
    filters: &[Filter],
    base: Option<&str>,
    params: &mut Vec<SqlValue>,
) -> Result<String, QueryError> {
    if filters.is_empty() {
        return Ok(String::new());
    }
    let mut clauses = Vec::with_capacity(filters.len());
    for filter in filters {
        params.push(filter.value.clone());
        clauses.push(format!(
            "{} {} ${}",
            qualify(&filter.column, base)?,
            filter.op.as_sql(),
            params.len()
        ));
    }
    Ok(format!(" WHERE {}", clauses.join(" AND ")))
}

fn returning_sql(projection: Option<&Projection>) -> Result<String, QueryError> {
    match projection {
        Some(p) => Ok(format!(" RETURNING {}", projection_sql(p, None)?)),
        None => Ok(String::new()),
    }
}

/// LIMIT and OFFSET are bigints in Postgres.
const MAX_ROW_COUNT: u64 = i64::MAX as u64;

pub(crate) fn compile(query: &Query) -> Result<Statement, QueryError> {
    let table = quote_ident(&query.table)?;
    let mut params = Vec::new();

    if query.relation.is_some() && !matches!(query.action, Action::Select | Action::Count) {
        return Err(QueryError::RelationOnMutation);
    }

    let mut outer_order = None;
    let (sql, returns_rows, is_select) = match &query.action {
        Action::Select | Action::Count => {
            let (projection, from, base) = match query.relation {
                Some(relation) => {
                    if relation.base_table() != query.table {
                        return Err(QueryError::RelationMismatch {
                            relation,
                            table: query.table.clone(),
                        });
                    }
                    let mut cols = vec![projection_sql(
                        query.projection.as_ref().unwrap_or(&Projection::All),
                        Some(&query.table),
                    )?];
                    for joined in relation.joined_columns() {
                        cols.push(format!(
                            "\"{}\".\"{}\" AS \"{}\"",
                            joined.table, joined.column, joined.alias
                        ));
                    }
                    (
                        cols.join(", "),
                        relation.from_clause().to_string(),
                        Some(query.table.as_str()),
                    )
                }
                None => (
                    projection_sql(query.projection.as_ref().unwrap_or(&Projection::All), None)?,
                    table.clone(),
                    None,
                ),
            };

            let projection = if matches!(query.action, Action::Count) {
                "count(*) AS \"count\"".to_string()
            } else {
                projection
            };

            let mut sql = format!("SELECT {projection} FROM {from}");
            sql.push_str(&where_sql(&query.filters, base, &mut params)?);

            if !matches!(query.action, Action::Count) {
                if let Some((column, order)) = &query.order {
                    sql.push_str(&format!(" ORDER BY {} {}", qualify(column, base)?, order.as_sql()));
                    if let Some(output) = output_column(query, column) {
                        outer_order =
                            Some(format!(" ORDER BY q.{} {}", quote_ident(output)?, order.as_sql()));
                    }
                }
                let limit = if query.single { Some(1) } else { query.limit };
                if let Some(limit) = limit {
                    sql.push_str(&format!(" LIMIT {}", limit.min(MAX_ROW_COUNT)));
                }
                if let Some(offset) = query.offset {
                    sql.push_str(&format!(" OFFSET {}", offset.min(MAX_ROW_COUNT)));
                }
            }
            (sql, true, true)
        }
        Action::Insert(record) => {
            if record.is_empty() {
                return Err(QueryError::EmptyRecord);
            }
            let mut cols = Vec::with_capacity(record.len());
            let mut placeholders = Vec::with_capacity(record.len());
            for (column, value) in record.clone().into_parts() {
                cols.push(quote_ident(&column)?);
                params.push(value);
                placeholders.push(format!("${}", params.len()));
            }
            let sql = format!(
                "INSERT INTO {table} ({}) VALUES ({}){}",
                cols.join(", "),
                placeholders.join(", "),
                returning_sql(query.projection.as_ref())?
            );
            (sql, query.projection.is_some(), false)
        }
        Action::Update(record) => {
            if record.is_empty() {
                return Err(QueryError::EmptyRecord);
            }
            if query.filters.is_empty() {
                return Err(QueryError::UnfilteredMutation("UPDATE"));
            }
            let mut sets = Vec::with_capacity(record.len());
            for (column, value) in record.clone().into_parts() {
                params.push(value);
                sets.push(format!("{} = ${}", quote_ident(&column)?, params.len()));
            }
            let mut sql = format!("UPDATE {table} SET {}", sets.join(", "));
            sql.push_str(&where_sql(&query.filters, None, &mut params)?);
            sql.push_str(&returning_sql(query.projection.as_ref())?);
            (sql, query.projection.is_some(), false)
        }
        Action::Delete => {
            if query.filters.is_empty() {
                return Err(QueryError::UnfilteredMutation("DELETE"));
            }
            let mut sql = format!("DELETE FROM {table}");
            sql.push_str(&where_sql(&query.filters, None, &mut params)?);
            sql.push_str(&returning_sql(query.projection.as_ref())?);
            (sql, query.projection.is_some(), false)
        }
    };

    Ok(Statement {
        sql,
        params,
        returns_rows,
        single: query.single || matches!(query.action, Action::Count),
        relation: query.relation,
        is_select,
        outer_order,
    })
}

/// The result column an ORDER BY column appears under, if it is projected
/// from the base table.
fn output_column<'a>(query: &Query, column: &'a str) -> Option<&'a str> {
    let name = match column.split_once('.') {
        Some((table, name)) if table == query.table => name,
        Some(_) => return None,
        None => column,
    };
    match &query.projection {
        None | Some(Projection::All) => Some(name),
        Some(Projection::Columns(cols)) => cols
            .iter()
            .any(|c| match c.split_once('.') {
                Some((table, col)) => table == query.table && col == name,
                None => c == name,
            })
            .then_some(name),
    }
}
