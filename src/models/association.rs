use serde::{Deserialize, Serialize};

/// How two tables are linked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    /// Owner row carries `foreign_key` pointing at the target's `id`
    BelongsTo,
    /// Target rows carry `foreign_key` pointing at the owner's `id`
    HasMany,
}

/// Named relation from one model's table to another table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub name: String,
    pub table: String,
    pub foreign_key: String,
    pub kind: AssociationKind,
}

impl Association {
    pub fn belongs_to(name: &str, table: &str, foreign_key: &str) -> Self {
        Self {
            name: name.to_string(),
            table: table.to_string(),
            foreign_key: foreign_key.to_string(),
            kind: AssociationKind::BelongsTo,
        }
    }

    pub fn has_many(name: &str, table: &str, foreign_key: &str) -> Self {
        Self {
            name: name.to_string(),
            table: table.to_string(),
            foreign_key: foreign_key.to_string(),
            kind: AssociationKind::HasMany,
        }
    }

    /// Join predicate between `owner` and the associated table
    pub fn on_condition(&self, owner: &str) -> String {
        match self.kind {
            AssociationKind::BelongsTo => {
                format!("{}.id = {}.{}", self.table, owner, self.foreign_key)
            }
            AssociationKind::HasMany => {
                format!("{}.{} = {}.id", self.table, self.foreign_key, owner)
            }
        }
    }
}
