//! CSV import and export, used to seed categories and move question sets
//! between databases.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use super::queries::categories::{get_all_categories, import_categories};
use super::queries::questions::{get_all_questions, import_questions};
use super::{Category, Question};

pub const CATEGORIES_FILE: &str = "categories.csv";
pub const QUESTIONS_FILE: &str = "questions.csv";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub categories: u64,
    pub questions: u64,
}

fn write_to(path: &Path, data: Vec<impl Serialize>) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let mut rdr =
        csv::Reader::from_path(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record.with_context(|| format!("Bad record in {}", path.display()))?;
        out.push(record);
    }
    Ok(out)
}

pub async fn export_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !dir.exists() {
        std::fs::create_dir_all(dir)?
    }
    write_to(&dir.join(CATEGORIES_FILE), categories)?;
    write_to(&dir.join(QUESTIONS_FILE), questions)?;
    Ok(())
}

/// Imports whichever of the two files exist in `dir`.
pub async fn import_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    let categories_path = dir.join(CATEGORIES_FILE);
    if categories_path.exists() {
        let categories: Vec<Category> = read_from(&categories_path)?;
        summary.categories = import_categories(pool, categories).await?;
    }
    let questions_path = dir.join(QUESTIONS_FILE);
    if questions_path.exists() {
        let questions: Vec<Question> = read_from(&questions_path)?;
        summary.questions = import_questions(pool, questions).await?;
    }
    Ok(summary)
}
