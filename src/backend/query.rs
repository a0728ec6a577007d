//! Table query builder.
//!
//! A [`Query`] names a table and carries the column projection, equality
//! filters, ordering and limit. [`Query::to_pairs`] renders it as PostgREST
//! query-string pairs; [`Query::matches`] evaluates the filters against a row
//! for in-process backends.

use serde_json::Value;
use std::cmp::Ordering;

/// Sort direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

impl Order {
    fn as_str(self) -> &'static str {
        match self {
            Order::Ascending => "asc",
            Order::Descending => "desc",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    table: String,
    columns: Option<Vec<String>>,
    filters: Vec<(String, String)>,
    order: Option<(String, Order)>,
    limit: Option<usize>,
}

impl Query {
    /// Start a query against `table` selecting every column.
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: None,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Restrict the returned columns.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Keep rows whose `column` equals `value`.
    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push((column.to_string(), value.into()));
        self
    }

    pub fn order(mut self, column: &str, order: Order) -> Self {
        self.order = Some((column.to_string(), order));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn ordering(&self) -> Option<(&str, Order)> {
        self.order.as_ref().map(|(column, order)| (column.as_str(), *order))
    }

    pub fn row_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Filter pairs only, e.g. `("user_id", "eq.abc")`.
    ///
    /// Used on their own for PATCH and DELETE requests.
    pub fn filter_pairs(&self) -> Vec<(String, String)> {
        self.filters
            .iter()
            .map(|(column, value)| (column.clone(), format!("eq.{}", value)))
            .collect()
    }

    /// Full PostgREST query string pairs for a GET request.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        let select = match &self.columns {
            Some(columns) if !columns.is_empty() => columns.join(","),
            _ => "*".to_string(),
        };
        pairs.push(("select".to_string(), select));
        pairs.extend(self.filter_pairs());

        if let Some((column, order)) = &self.order {
            pairs.push(("order".to_string(), format!("{}.{}", column, order.as_str())));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }

        pairs
    }

    /// Whether a row satisfies every equality filter.
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|(column, expected)| match row.get(column) {
            Some(Value::String(actual)) => actual == expected,
            Some(Value::Null) | None => expected == "null",
            Some(other) => other.to_string() == *expected,
        })
    }

    /// Keep only the projected columns of a row.
    pub fn project(&self, row: &Value) -> Value {
        match (&self.columns, row) {
            (Some(columns), Value::Object(map)) if !columns.is_empty() => Value::Object(
                map.iter()
                    .filter(|(key, _)| columns.iter().any(|c| c == *key))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            ),
            _ => row.clone(),
        }
    }
}

/// Compare two JSON values for sorting: nulls first, then by type.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
