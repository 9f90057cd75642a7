use crate::models::Association;

/// Represents different types of SQL JOINs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
}

impl JoinType {
    pub fn to_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT OUTER JOIN",
        }
    }
}

/// Represents a SQL JOIN clause
#[derive(Debug, Clone, PartialEq)]
pub enum Join {
    On {
        join_type: JoinType,
        table: String,
        on_condition: String,
    },
    /// Caller-written join fragment, e.g. `"INNER JOIN tags ON tags.post_id = posts.id"`
    Raw { sql: String },
}

impl Join {
    pub fn raw(sql: &str) -> Self {
        Self::Raw {
            sql: sql.to_string(),
        }
    }

    /// Join from `owner` to an association's table
    pub fn association(join_type: JoinType, owner: &str, association: &Association) -> Self {
        Self::On {
            join_type,
            table: association.table.clone(),
            on_condition: association.on_condition(owner),
        }
    }

    /// Whether a `joins` entry is already SQL rather than an association name
    pub fn is_raw_sql(entry: &str) -> bool {
        entry.trim().to_ascii_uppercase().contains("JOIN ")
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        match self {
            Join::On {
                join_type,
                table,
                on_condition,
            } => format!("{} {} ON {}", join_type.to_sql(), table, on_condition),
            Join::Raw { sql } => sql.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_many_left_join() {
        let comments = Association::has_many("comments", "comments", "post_id");
        let join = Join::association(JoinType::Left, "posts", &comments);
        assert_eq!(
            join.to_sql(),
            "LEFT OUTER JOIN comments ON comments.post_id = posts.id"
        );
    }

    #[test]
    fn test_raw_join_is_trimmed() {
        let join = Join::raw("  INNER JOIN tags ON tags.post_id = posts.id ");
        assert_eq!(join.to_sql(), "INNER JOIN tags ON tags.post_id = posts.id");
    }

    #[test]
    fn test_association_join() {
        let author = Association::belongs_to("author", "authors", "author_id");
        let join = Join::association(JoinType::Inner, "posts", &author);
        assert_eq!(
            join.to_sql(),
            "INNER JOIN authors ON authors.id = posts.author_id"
        );
    }

    #[test]
    fn test_raw_join_detection() {
        assert!(Join::is_raw_sql("left join tags on tags.post_id = posts.id"));
        assert!(!Join::is_raw_sql("comments"));
    }
}
