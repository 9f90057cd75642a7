use crate::error::{Result, ScopeError};
use serde_json::Value;

/// Represents different types of SQL conditions
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Simple {
        field: String,
        operator: String,
        value: Value,
    },
    In {
        field: String,
        values: Vec<Value>,
    },
    IsNull {
        field: String,
    },
    Raw {
        sql: String,
    },
}

impl Condition {
    /// Convert condition to SQL string
    pub fn to_sql(&self) -> String {
        match self {
            Condition::Simple {
                field,
                operator,
                value,
            } => {
                format!("{} {} {}", field, operator, format_value(value))
            }
            Condition::In { field, values } if values.is_empty() => {
                // `IN ()` is a syntax error; an empty candidate list matches nothing
                format!("{field} IN (NULL)")
            }
            Condition::In { field, values } => {
                let value_list = values
                    .iter()
                    .map(format_value)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{field} IN ({value_list})")
            }
            Condition::IsNull { field } => {
                format!("{field} IS NULL")
            }
            Condition::Raw { sql } => sql.clone(),
        }
    }

    /// Condition for one `column => expected` pair of a filter mapping
    pub fn for_column(field: &str, expected: &Value) -> Self {
        match expected {
            Value::Null => Condition::IsNull {
                field: field.to_string(),
            },
            Value::Array(values) => Condition::In {
                field: field.to_string(),
                values: values.clone(),
            },
            value => Condition::Simple {
                field: field.to_string(),
                operator: "=".to_string(),
                value: value.clone(),
            },
        }
    }
}

/// Conditions that must all hold
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub conditions: Vec<Condition>,
}

impl WhereClause {
    /// Create raw SQL condition
    pub fn raw(sql: &str) -> Self {
        Self::and(vec![Condition::Raw {
            sql: sql.to_string(),
        }])
    }

    /// Combine multiple conditions with AND
    pub fn and(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    /// Interpret a `conditions`/`having` option value
    ///
    /// - `{"col": v, ...}`: equality, `IN` for sequences, `IS NULL` for null
    /// - `"raw sql"`: used verbatim
    /// - `["col = ? AND other = ?", a, b]`: placeholders replaced by quoted values
    /// - `[filter, filter, ...]`: every filter must hold
    pub fn from_value(key: &str, value: &Value) -> Result<Self> {
        match value {
            Value::Object(columns) => Ok(Self::and(
                columns
                    .iter()
                    .map(|(field, expected)| Condition::for_column(field, expected))
                    .collect(),
            )),
            Value::String(sql) => Ok(Self::raw(sql)),
            Value::Array(items) => match items.split_first() {
                Some((Value::String(template), binds)) => {
                    Ok(Self::raw(&bind_placeholders(key, template, binds)?))
                }
                _ => {
                    let conditions = items
                        .iter()
                        .map(|item| {
                            Self::from_value(key, item).map(|clause| Condition::Raw {
                                sql: clause.to_sql(),
                            })
                        })
                        .collect::<Result<Vec<_>>>()?;
                    Ok(Self::and(conditions))
                }
            },
            other => Err(ScopeError::invalid_option(
                key,
                format!("expected a mapping, SQL string or [template, binds...], got {other}"),
            )),
        }
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        if self.conditions.is_empty() {
            return "1=1".to_string();
        }

        if self.conditions.len() == 1 {
            return self.conditions[0].to_sql();
        }

        let condition_sqls: Vec<String> = self.conditions.iter().map(|c| c.to_sql()).collect();

        format!("({})", condition_sqls.join(" AND "))
    }
}

/// Replace each `?` outside single-quoted literals with the next bind value
fn bind_placeholders(key: &str, template: &str, binds: &[Value]) -> Result<String> {
    let placeholders = placeholder_count(template);
    if placeholders != binds.len() {
        return Err(ScopeError::invalid_option(
            key,
            format!(
                "'{template}' has {placeholders} placeholders but {} values were given",
                binds.len()
            ),
        ));
    }

    let mut sql = String::with_capacity(template.len());
    let mut binds = binds.iter();
    let mut quoted = false;
    for ch in template.chars() {
        match ch {
            '\'' => quoted = !quoted,
            '?' if !quoted => {
                if let Some(value) = binds.next() {
                    sql.push_str(&format_bind(value));
                    continue;
                }
            }
            _ => {}
        }
        sql.push(ch);
    }
    Ok(sql)
}

/// `''` escapes toggle the quote state twice, so they need no special case
fn placeholder_count(template: &str) -> usize {
    let mut quoted = false;
    let mut count = 0;
    for ch in template.chars() {
        match ch {
            '\'' => quoted = !quoted,
            '?' if !quoted => count += 1,
            _ => {}
        }
    }
    count
}

/// Sequences bind as comma-separated lists so `col IN (?)` works
fn format_bind(value: &Value) -> String {
    match value {
        Value::Array(values) => values.iter().map(format_value).collect::<Vec<_>>().join(", "),
        value => format_value(value),
    }
}

/// Format a JSON value for SQL
pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string().to_uppercase(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        _ => format!("'{}'::jsonb", value.to_string().replace('\'', "''")),
    }
}
