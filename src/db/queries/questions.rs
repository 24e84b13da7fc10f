use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::db::{StoreError, StoreResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub difficulty: i64,
}

/// A question that passed request validation and has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: String,
    pub difficulty: i64,
}

const QUESTION_COLUMNS: &str = "id, question, answer, category, difficulty";

pub async fn get_all_questions(pool: &SqlitePool) -> StoreResult<Vec<Question>> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(questions)
}

/// `page` is zero based.
pub async fn get_questions_page(
    pool: &SqlitePool,
    page: u32,
    per_page: u32,
) -> StoreResult<Vec<Question>> {
    let offset = i64::from(page) * i64::from(per_page);
    let questions = sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
ORDER BY id
LIMIT ?1 OFFSET ?2
        "#,
    )
    .bind(i64::from(per_page))
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(questions)
}

pub async fn count_questions(pool: &SqlitePool) -> StoreResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn get_question_by_id(pool: &SqlitePool, id: i64) -> StoreResult<Question> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(StoreError::NotFound)
}

pub async fn create_question(pool: &SqlitePool, question: &NewQuestion) -> StoreResult<i64> {
    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&question.question)
    .bind(&question.answer)
    .bind(&question.category)
    .bind(question.difficulty)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

pub async fn delete_question(pool: &SqlitePool, id: i64) -> StoreResult<()> {
    let mut tx = pool.begin().await?;
    let found = sqlx::query_scalar::<_, i64>("SELECT id FROM questions WHERE questions.id = ?1")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if found.is_none() {
        return Err(StoreError::NotFound);
    }

    sqlx::query(
        r#"
DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(())
}

/// Case-insensitive substring match on the question text. Case is folded
/// with Unicode rules, which SQLite's `LIKE` and `lower()` only do for ASCII.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> StoreResult<Vec<Question>> {
    let needle = term.to_lowercase();
    let questions = get_all_questions(pool)
        .await?
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&needle))
        .collect();
    Ok(questions)
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: &str,
) -> StoreResult<Vec<Question>> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE questions.category = ?1
ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await?;
    Ok(questions)
}

/// Questions a quiz may still ask: optionally restricted to one category,
/// never one of `seen`.
pub async fn get_quiz_candidates(
    pool: &SqlitePool,
    category: Option<&str>,
    seen: &[i64],
) -> StoreResult<Vec<Question>> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ");
    query.push(QUESTION_COLUMNS);
    query.push(" FROM questions WHERE 1 = 1");

    if let Some(category) = category {
        query.push(" AND category = ");
        query.push_bind(category.to_owned());
    }
    if !seen.is_empty() {
        query.push(" AND id NOT IN (");
        let mut ids = query.separated(", ");
        for id in seen {
            ids.push_bind(*id);
        }
        ids.push_unseparated(")");
    }
    query.push(" ORDER BY id");

    let questions = query.build_query_as::<Question>().fetch_all(pool).await?;
    Ok(questions)
}

/// Inserts questions keeping their ids. Ids already present are left alone.
/// Returns the number of inserted rows.
pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> StoreResult<u64> {
    let existing: HashSet<i64> = get_all_questions(pool)
        .await?
        .into_iter()
        .map(|q| q.id)
        .collect();

    let mut tx = pool.begin().await?;
    let mut inserted = 0;
    for question in questions
        .into_iter()
        .filter(|q| !existing.contains(&q.id))
    {
        inserted += sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(&question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }
    tx.commit().await?;
    Ok(inserted)
}
