use super::{Join, JoinType, Pagination, WhereClause};
use crate::constants::{params, switches};
use crate::error::{Result, ScopeError};
use crate::models::Association;
use crate::scopes::QueryOptions;
use serde_json::Value;
use sqlx::{PgPool, Row};
use std::collections::HashMap;

/// Main query builder for SQL generation from merged scope options
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    base_table: String,
    select_fields: Vec<String>,
    joins: Vec<Join>,
    where_clauses: Vec<WhereClause>,
    group_by: Vec<String>,
    having: Vec<WhereClause>,
    order_by: Vec<String>,
    pagination: Pagination,
    lock: Option<String>,
}

impl QueryBuilder {
    /// Create a new query builder for the given table
    pub fn new(table: &str) -> Self {
        Self {
            base_table: table.to_string(),
            select_fields: vec!["*".to_string()],
            joins: Vec::new(),
            where_clauses: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: Vec::new(),
            pagination: Pagination::default(),
            lock: None,
        }
    }

    /// Translate merged scope options for a model over `table`
    ///
    /// Association names in `joins` become INNER JOINs and in `include` LEFT
    /// OUTER JOINs; `readonly` only has to be a boolean.
    pub fn from_options(
        table: &str,
        associations: &HashMap<String, Association>,
        options: &QueryOptions,
    ) -> Result<Self> {
        let base_table = match options.present(params::FROM) {
            None => table.to_string(),
            Some(Value::String(source)) => source.clone(),
            Some(other) => {
                return Err(ScopeError::invalid_option(
                    params::FROM,
                    format!("expected a table or subquery, got {other}"),
                ))
            }
        };
        let mut query = Self::new(&base_table);
        let owner = owner_name(&base_table);

        if let Some(fields) = options.string_list(params::SELECT)? {
            query = query.select(&fields);
        }

        let mut joined: Vec<String> = Vec::new();
        for entry in options.string_list(params::JOINS)?.unwrap_or_default() {
            if Join::is_raw_sql(&entry) {
                query = query.join(Join::raw(&entry));
                continue;
            }
            let association = find_association(associations, params::JOINS, &entry)?;
            query = query.join(Join::association(JoinType::Inner, owner, association));
            joined.push(entry);
        }

        for name in options.string_list(params::INCLUDE)?.unwrap_or_default() {
            let association = find_association(associations, params::INCLUDE, &name)?;
            if !joined.contains(&name) {
                query = query.join(Join::association(JoinType::Left, owner, association));
                joined.push(name);
            }
        }

        if let Some(conditions) = options.present(params::CONDITIONS) {
            query = query.where_clause(WhereClause::from_value(params::CONDITIONS, conditions)?);
        }

        if let Some(fields) = options.string_list(params::GROUP)? {
            query = query.group_by(&fields);
        }

        if let Some(having) = options.present(params::HAVING) {
            query = query.having_clause(WhereClause::from_value(params::HAVING, having)?);
        }

        for term in options.string_list(params::ORDER)?.unwrap_or_default() {
            query = query.order(&term);
        }

        if let Some(limit) = options.non_negative(params::LIMIT)? {
            query = query.limit(limit);
        }
        if let Some(offset) = options.non_negative(params::OFFSET)? {
            query = query.offset(offset);
        }

        match options.get(switches::LOCK) {
            None | Some(Value::Bool(false)) => {}
            Some(Value::Bool(true)) => query = query.lock("FOR UPDATE"),
            Some(Value::String(clause)) => query = query.lock(clause),
            Some(other) => {
                return Err(ScopeError::invalid_option(
                    switches::LOCK,
                    format!("expected a boolean or lock clause, got {other}"),
                ))
            }
        }

        match options.get(switches::READONLY) {
            None | Some(Value::Bool(_)) => {}
            Some(other) => {
                return Err(ScopeError::invalid_option(
                    switches::READONLY,
                    format!("expected a boolean, got {other}"),
                ))
            }
        }

        Ok(query)
    }

    /// Set specific fields to select
    pub fn select<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        self.select_fields = fields.iter().map(|f| f.as_ref().to_string()).collect();
        self
    }

    /// Add a JOIN clause
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Add a WHERE clause
    pub fn where_clause(mut self, clause: WhereClause) -> Self {
        self.where_clauses.push(clause);
        self
    }

    /// Add GROUP BY clause
    pub fn group_by<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        self.group_by
            .extend(fields.iter().map(|f| f.as_ref().to_string()));
        self
    }

    /// Add HAVING clause
    pub fn having_clause(mut self, clause: WhereClause) -> Self {
        self.having.push(clause);
        self
    }

    /// Add an ORDER BY term as written, e.g. `"created_at DESC"`
    pub fn order(mut self, term: &str) -> Self {
        self.order_by.push(term.to_string());
        self
    }

    /// Add LIMIT clause
    pub fn limit(mut self, limit: u64) -> Self {
        self.pagination.limit = Some(limit);
        self
    }

    /// Add OFFSET clause
    pub fn offset(mut self, offset: u64) -> Self {
        self.pagination.offset = Some(offset);
        self
    }

    /// Restrict to a single row without widening an existing `LIMIT 0`
    pub fn first(mut self) -> Self {
        self.pagination.limit = Some(self.pagination.limit.map_or(1, |limit| limit.min(1)));
        self
    }

    /// Row-locking clause appended after LIMIT/OFFSET, e.g. `FOR UPDATE`
    pub fn lock(mut self, clause: &str) -> Self {
        self.lock = Some(clause.to_string());
        self
    }

    /// Build the complete SQL query string
    pub fn build_sql(&self) -> String {
        let mut sql = String::from("SELECT ");
        sql.push_str(&self.select_fields.join(", "));

        // FROM clause
        sql.push_str(&format!(" FROM {}", self.base_table));

        // JOIN clauses
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.to_sql());
        }

        // WHERE clauses
        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            let where_parts: Vec<String> = self
                .where_clauses
                .iter()
                .map(|clause| clause.to_sql())
                .collect();
            sql.push_str(&where_parts.join(" AND "));
        }

        // GROUP BY
        if !self.group_by.is_empty() {
            sql.push_str(&format!(" GROUP BY {}", self.group_by.join(", ")));
        }

        // HAVING
        if !self.having.is_empty() {
            sql.push_str(" HAVING ");
            let having_parts: Vec<String> =
                self.having.iter().map(|clause| clause.to_sql()).collect();
            sql.push_str(&having_parts.join(" AND "));
        }

        // ORDER BY
        if !self.order_by.is_empty() {
            sql.push_str(&format!(" ORDER BY {}", self.order_by.join(", ")));
        }

        // LIMIT/OFFSET
        sql.push_str(&self.pagination.to_sql());

        if let Some(ref lock) = self.lock {
            sql.push(' ');
            sql.push_str(lock);
        }

        sql
    }

    /// Execute the query and return all rows
    pub async fn fetch_all<T>(&self, pool: &PgPool) -> Result<Vec<T>>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let sql = self.build_sql();
        Ok(sqlx::query_as::<_, T>(&sql).fetch_all(pool).await?)
    }

    /// Execute the query and return optional row
    pub async fn fetch_optional<T>(&self, pool: &PgPool) -> Result<Option<T>>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let sql = self.build_sql();
        Ok(sqlx::query_as::<_, T>(&sql).fetch_optional(pool).await?)
    }

    /// SQL counting the rows this query would return
    pub fn count_sql(&self) -> String {
        let mut inner = self.clone();
        inner.order_by.clear();
        inner.lock = None;
        format!("SELECT COUNT(*) FROM ({}) AS scoped", inner.build_sql())
    }

    /// Execute count query
    pub async fn count(&self, pool: &PgPool) -> Result<i64> {
        let sql = self.count_sql();
        let row = sqlx::query(&sql).fetch_one(pool).await?;
        Ok(row.try_get::<i64, _>(0)?)
    }
}

/// Name association joins qualify the base table by: its alias if one is given
/// (`archived_posts AS posts`, `archived_posts p`), otherwise the table itself
fn owner_name(base_table: &str) -> &str {
    base_table.split_whitespace().last().unwrap_or(base_table)
}

fn find_association<'a>(
    associations: &'a HashMap<String, Association>,
    key: &str,
    name: &str,
) -> Result<&'a Association> {
    associations
        .get(name)
        .ok_or_else(|| ScopeError::invalid_option(key, format!("unknown association '{name}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_associations() -> HashMap<String, Association> {
        HashMap::from([
            (
                "author".to_string(),
                Association::belongs_to("author", "authors", "author_id"),
            ),
            (
                "comments".to_string(),
                Association::has_many("comments", "comments", "post_id"),
            ),
        ])
    }

    fn options(value: Value) -> QueryOptions {
        match value {
            Value::Object(map) => QueryOptions::from(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_basic_query_building() {
        let query = QueryBuilder::new("posts")
            .select(&["id", "title"])
            .where_clause(WhereClause::from_value("conditions", &json!({"author_id": 1})).unwrap())
            .order("created_at DESC")
            .limit(10);

        assert_eq!(
            query.build_sql(),
            "SELECT id, title FROM posts WHERE author_id = 1 ORDER BY created_at DESC LIMIT 10"
        );
    }

    #[test]
    fn test_from_options_full_chain() {
        let query = QueryBuilder::from_options(
            "posts",
            &post_associations(),
            &options(json!({
                "conditions": {"published": true},
                "joins": "author",
                "include": ["author", "comments"],
                "order": "posts.created_at DESC",
                "limit": 5,
                "offset": 10,
                "lock": true
            })),
        )
        .unwrap();

        assert_eq!(
            query.build_sql(),
            "SELECT * FROM posts \
             INNER JOIN authors ON authors.id = posts.author_id \
             LEFT OUTER JOIN comments ON comments.post_id = posts.id \
             WHERE published = TRUE \
             ORDER BY posts.created_at DESC LIMIT 5 OFFSET 10 FOR UPDATE"
        );
    }

    #[test]
    fn test_from_options_group_having_select() {
        let query = QueryBuilder::from_options(
            "posts",
            &HashMap::new(),
            &options(json!({
                "select": ["author_id", "COUNT(*) AS total"],
                "group": "author_id",
                "having": "COUNT(*) > 1",
                "from": "archived_posts"
            })),
        )
        .unwrap();

        assert_eq!(
            query.build_sql(),
            "SELECT author_id, COUNT(*) AS total FROM archived_posts GROUP BY author_id HAVING COUNT(*) > 1"
        );
    }

    #[test]
    fn test_raw_join_and_lock_clause() {
        let query = QueryBuilder::from_options(
            "posts",
            &HashMap::new(),
            &options(json!({
                "joins": "INNER JOIN tags ON tags.post_id = posts.id",
                "lock": "FOR SHARE"
            })),
        )
        .unwrap();

        assert_eq!(
            query.build_sql(),
            "SELECT * FROM posts INNER JOIN tags ON tags.post_id = posts.id FOR SHARE"
        );
    }

    #[test]
    fn test_bare_collapse_values_are_ignored() {
        let query = QueryBuilder::from_options(
            "posts",
            &HashMap::new(),
            &options(json!({"order": [], "limit": [], "conditions": []})),
        )
        .unwrap();
        assert_eq!(query.build_sql(), "SELECT * FROM posts");
    }

    #[test]
    fn test_unknown_association_is_rejected() {
        let result = QueryBuilder::from_options(
            "posts",
            &HashMap::new(),
            &options(json!({"include": "tags"})),
        );
        assert!(matches!(result, Err(ScopeError::InvalidOption { key, .. }) if key == "include"));
    }

    #[test]
    fn test_count_sql_wraps_query() {
        let query = QueryBuilder::new("posts").order("title").limit(3).lock("FOR UPDATE");
        assert_eq!(
            query.count_sql(),
            "SELECT COUNT(*) FROM (SELECT * FROM posts LIMIT 3) AS scoped"
        );
    }

    #[test]
    fn test_from_table_owns_association_joins() {
        let query = QueryBuilder::from_options(
            "posts",
            &post_associations(),
            &options(json!({
                "from": "archived_posts",
                "joins": "author",
                "include": "comments"
            })),
        )
        .unwrap();

        assert_eq!(
            query.build_sql(),
            "SELECT * FROM archived_posts \
             INNER JOIN authors ON authors.id = archived_posts.author_id \
             LEFT OUTER JOIN comments ON comments.post_id = archived_posts.id"
        );
    }

    #[test]
    fn test_aliased_from_table_owns_association_joins() {
        let query = QueryBuilder::from_options(
            "posts",
            &post_associations(),
            &options(json!({"from": "archived_posts AS p", "joins": "author"})),
        )
        .unwrap();

        assert_eq!(
            query.build_sql(),
            "SELECT * FROM archived_posts AS p INNER JOIN authors ON authors.id = p.author_id"
        );
    }

    #[test]
    fn test_first_keeps_a_tighter_limit() {
        assert_eq!(
            QueryBuilder::new("posts").first().build_sql(),
            "SELECT * FROM posts LIMIT 1"
        );
        assert_eq!(
            QueryBuilder::new("posts").limit(0).first().build_sql(),
            "SELECT * FROM posts LIMIT 0"
        );
        assert_eq!(
            QueryBuilder::new("posts").limit(20).offset(5).first().build_sql(),
            "SELECT * FROM posts LIMIT 1 OFFSET 5"
        );
    }
}
