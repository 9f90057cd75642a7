/// Represents LIMIT/OFFSET parameters for SQL queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Pagination {
    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pagination_renders_nothing() {
        assert_eq!(Pagination::default().to_sql(), "");
    }

    #[test]
    fn test_offset_without_limit() {
        let pagination = Pagination {
            limit: None,
            offset: Some(15),
        };
        assert_eq!(pagination.to_sql(), " OFFSET 15");
    }

    #[test]
    fn test_limit_and_offset() {
        let pagination = Pagination {
            limit: Some(10),
            offset: Some(20),
        };
        assert_eq!(pagination.to_sql(), " LIMIT 10 OFFSET 20");
    }
}
