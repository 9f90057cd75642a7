pub mod strategies;

use query_scopes::models::{MemoryDatabase, MemoryModel};
use query_scopes::registry::{AliasVariant, ScopeTable};
use serde_json::json;

/// Blog fixture: two authors, four posts, three comments
pub fn blog_database() -> MemoryDatabase {
    let db = MemoryDatabase::new();

    for author in [
        json!({"id": 1, "name": "Ferris"}),
        json!({"id": 2, "name": "Corro"}),
    ] {
        db.insert("authors", author).expect("insert author");
    }

    for post in [
        json!({"id": 1, "title": "Ownership", "author_id": 1, "published": true, "views": 120, "category": "rust"}),
        json!({"id": 2, "title": "Borrowing", "author_id": 1, "published": false, "views": 40, "category": "rust"}),
        json!({"id": 3, "title": "Unsafe", "author_id": 2, "published": true, "views": 300, "category": "systems"}),
        json!({"id": 4, "title": "Async", "author_id": 2, "published": true, "views": 80, "category": "rust"}),
    ] {
        db.insert("posts", post).expect("insert post");
    }

    for comment in [
        json!({"id": 1, "post_id": 1, "body": "Great"}),
        json!({"id": 2, "post_id": 1, "body": "Thanks"}),
        json!({"id": 3, "post_id": 3, "body": "Scary"}),
    ] {
        db.insert("comments", comment).expect("insert comment");
    }

    db.insert("archived_posts", json!({"id": 100, "title": "Old news", "published": true}))
        .expect("insert archived post");

    db
}

pub fn posts_model(db: MemoryDatabase, variant: AliasVariant) -> MemoryModel {
    MemoryModel::with_scope_table(db, "posts", &ScopeTable::for_variant(variant))
        .belongs_to("author", "authors", "author_id")
        .has_many("comments", "comments", "post_id")
}

pub fn titles(records: &[query_scopes::models::Record]) -> Vec<&str> {
    records
        .iter()
        .filter_map(|record| record.get("title").and_then(|title| title.as_str()))
        .collect()
}
