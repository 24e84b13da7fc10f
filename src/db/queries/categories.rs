use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::StoreResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

pub async fn get_all_categories(pool: &SqlitePool) -> StoreResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        r#"
SELECT id, type
FROM categories
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn create_category(pool: &SqlitePool, kind: &str) -> StoreResult<i64> {
    let id = sqlx::query(
        r#"
INSERT INTO categories (type) VALUES (?1)
        "#,
    )
    .bind(kind)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Inserts categories keeping their ids. Ids already present are left alone.
/// Returns the number of inserted rows.
pub async fn import_categories(pool: &SqlitePool, categories: Vec<Category>) -> StoreResult<u64> {
    let existing: HashSet<i64> = get_all_categories(pool)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();

    let mut tx = pool.begin().await?;
    let mut inserted = 0;
    for category in categories
        .into_iter()
        .filter(|c| !existing.contains(&c.id))
    {
        inserted += sqlx::query(
            r#"
INSERT INTO categories (id, type) VALUES (?1, ?2)
            "#,
        )
        .bind(category.id)
        .bind(&category.kind)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }
    tx.commit().await?;
    Ok(inserted)
}
