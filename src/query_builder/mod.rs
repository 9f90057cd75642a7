//! # Query Builder System
//!
//! SQL rendering for merged scope options.
//!
//! ## Key Components
//!
//! - [`builder`] - Core query builder with SQL generation and SQLx execution
//! - [`conditions`] - WHERE/HAVING clauses from option values
//! - [`joins`] - JOIN clauses for association names and raw fragments
//! - [`pagination`] - LIMIT/OFFSET
//! - [`sql_model`] - [`SqlModel`], the PostgreSQL host for scope chains
//!
//! ## Option Mapping
//!
//! | option       | SQL                                         |
//! |--------------|---------------------------------------------|
//! | `conditions` | `WHERE`                                     |
//! | `joins`      | `INNER JOIN` (association) or raw fragment  |
//! | `include`    | `LEFT OUTER JOIN` (association)             |
//! | `select`     | column list                                 |
//! | `from`       | base table                                  |
//! | `group`      | `GROUP BY`                                  |
//! | `having`     | `HAVING`                                    |
//! | `order`      | `ORDER BY`                                  |
//! | `limit`      | `LIMIT`                                     |
//! | `offset`     | `OFFSET`                                    |
//! | `lock`       | `FOR UPDATE` or the given clause            |

pub mod builder;
pub mod conditions;
pub mod joins;
pub mod pagination;
pub mod sql_model;

pub use builder::QueryBuilder;
pub use conditions::{Condition, WhereClause};
pub use joins::{Join, JoinType};
pub use pagination::Pagination;
pub use sql_model::SqlModel;
