#![forbid(unsafe_code)]

mod error;
mod requests;

pub use error::StoreError;
pub use requests::*;

use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use survey_core::category::{Category, CategoryError};
use survey_core::feedback::normalize_answer;
use survey_core::rating::Rating;

const DB_FILE_NAME: &str = "survey.db";
const SURVEY_TABLES: [&str; 3] = ["survey_feedback", "survey_ratings", "survey_responses"];

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE_NAME);
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        install_schema(&conn)?;

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Records one submission: a parent response row plus its rating and
    /// feedback children, committed atomically. Out-of-range ratings and
    /// blank feedback answers are skipped, not rejected. Returns the new
    /// response id.
    pub fn submit_survey(&mut self, request: SubmitSurveyRequest) -> Result<i64, StoreError> {
        let category = Category::try_new(request.category).map_err(|err| match err {
            CategoryError::Empty => StoreError::InvalidInput("category is required"),
            CategoryError::TooLong => StoreError::InvalidInput("category is too long"),
        })?;

        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO survey_responses(category, submitted_at_ms) VALUES (?1, ?2)",
            params![category.as_str(), request.submitted_at_ms],
        )?;
        let response_id = tx.last_insert_rowid();

        for (question, value) in &request.ratings {
            let Ok(rating) = Rating::try_new(*value) else {
                continue;
            };
            tx.execute(
                "INSERT INTO survey_ratings(response_id, question, rating) VALUES (?1, ?2, ?3)",
                params![response_id, question.trim(), rating.value()],
            )?;
        }

        for (question, answer) in &request.feedback {
            let Some(answer) = normalize_answer(answer) else {
                continue;
            };
            tx.execute(
                "INSERT INTO survey_feedback(response_id, question, answer) VALUES (?1, ?2, ?3)",
                params![response_id, question.trim(), answer],
            )?;
        }

        tx.commit()?;
        Ok(response_id)
    }

    /// Returns every stored response, most recent first, each joined with
    /// its ratings and feedback. The per-response child queries keep the
    /// shape simple; the data volume is survey-scale.
    pub fn list_surveys(&self) -> Result<Vec<SurveyRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category, submitted_at_ms \
             FROM survey_responses \
             ORDER BY submitted_at_ms DESC, id DESC",
        )?;

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();

        while let Some(row) = rows.next()? {
            let id = row.get::<_, i64>(0)?;
            out.push(SurveyRecord {
                id,
                category: row.get::<_, String>(1)?,
                submitted_at_ms: row.get::<_, i64>(2)?,
                ratings: self.ratings_for(id)?,
                feedback: self.feedback_for(id)?,
            });
        }

        Ok(out)
    }

    /// Raw aggregates for the stats surface; fails as a whole on any query
    /// error so partial stats are never returned.
    pub fn summary_stats(&self) -> Result<StoreStats, StoreError> {
        let total_responses = self.count_rows("survey_responses")?;
        let total_rating_rows = self.count_rows("survey_ratings")?;
        let feedback_count = self.count_rows("survey_feedback")?;

        let (positive_rating_count, positive_rating_sum) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(rating), 0) FROM survey_ratings WHERE rating > 0",
            [],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )?;

        let high_rating_count = self.conn.query_row(
            "SELECT COUNT(*) FROM survey_ratings WHERE rating >= 4",
            [],
            |row| row.get::<_, i64>(0),
        )?;

        let mut stmt = self.conn.prepare(
            "SELECT category, COUNT(*) FROM survey_responses GROUP BY category ORDER BY category",
        )?;
        let mut rows = stmt.query([])?;
        let mut category_breakdown = Vec::new();
        while let Some(row) = rows.next()? {
            category_breakdown.push(CategoryCount {
                category: row.get::<_, String>(0)?,
                count: row.get::<_, i64>(1)?,
            });
        }

        Ok(StoreStats {
            total_responses,
            positive_rating_count,
            positive_rating_sum,
            high_rating_count,
            total_rating_rows,
            feedback_count,
            category_breakdown,
        })
    }

    /// Deletes every survey row (children before parent) and restarts each
    /// table's identity counter at 1, in one transaction. The credential
    /// option row is untouched. Convergent under repetition.
    pub fn reset_all(&mut self) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;

        for table in SURVEY_TABLES {
            tx.execute(&format!("DELETE FROM {table}"), [])?;
        }
        reset_identity_counters_tx(&tx)?;

        tx.commit()?;
        Ok(())
    }

    pub fn option_get(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM service_options WHERE name=?1",
                params![name],
                |row| row.get::<_, String>(0),
            )
            .optional()?)
    }

    pub fn option_set(&mut self, name: &str, value: &str, now_ms: i64) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO service_options(name, value, updated_at_ms)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(name) DO UPDATE SET value=excluded.value, updated_at_ms=excluded.updated_at_ms
            "#,
            params![name, value, now_ms],
        )?;
        Ok(())
    }

    fn ratings_for(&self, response_id: i64) -> Result<BTreeMap<String, i64>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT question, rating FROM survey_ratings WHERE response_id=?1")?;
        let mut rows = stmt.query(params![response_id])?;
        let mut out = BTreeMap::new();
        while let Some(row) = rows.next()? {
            out.insert(row.get::<_, String>(0)?, row.get::<_, i64>(1)?);
        }
        Ok(out)
    }

    fn feedback_for(&self, response_id: i64) -> Result<BTreeMap<String, String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT question, answer FROM survey_feedback WHERE response_id=?1")?;
        let mut rows = stmt.query(params![response_id])?;
        let mut out = BTreeMap::new();
        while let Some(row) = rows.next()? {
            out.insert(row.get::<_, String>(0)?, row.get::<_, String>(1)?);
        }
        Ok(out)
    }

    fn count_rows(&self, table: &'static str) -> Result<i64, StoreError> {
        Ok(self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get::<_, i64>(0)
            })?)
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS survey_responses (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          category TEXT NOT NULL,
          submitted_at_ms INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_responses_category
          ON survey_responses(category);
        CREATE INDEX IF NOT EXISTS idx_responses_submitted_at
          ON survey_responses(submitted_at_ms);

        CREATE TABLE IF NOT EXISTS survey_ratings (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          response_id INTEGER NOT NULL,
          question TEXT NOT NULL,
          rating INTEGER NOT NULL,
          FOREIGN KEY(response_id) REFERENCES survey_responses(id) ON DELETE CASCADE,
          CHECK(rating >= 0 AND rating <= 5)
        );

        CREATE INDEX IF NOT EXISTS idx_ratings_response
          ON survey_ratings(response_id);
        CREATE INDEX IF NOT EXISTS idx_ratings_rating
          ON survey_ratings(rating);

        CREATE TABLE IF NOT EXISTS survey_feedback (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          response_id INTEGER NOT NULL,
          question TEXT NOT NULL,
          answer TEXT NOT NULL,
          FOREIGN KEY(response_id) REFERENCES survey_responses(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_feedback_response
          ON survey_feedback(response_id);

        CREATE TABLE IF NOT EXISTS service_options (
          name TEXT PRIMARY KEY,
          value TEXT NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );
        "#,
    )?;

    Ok(())
}

fn reset_identity_counters_tx(tx: &Transaction<'_>) -> Result<(), StoreError> {
    // AUTOINCREMENT counters live in sqlite_sequence; clearing the rows makes
    // the next insert start from 1 again. The table only exists once an
    // AUTOINCREMENT insert has happened, hence the existence probe.
    let has_sequence = tx
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='sqlite_sequence'",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .is_some();

    if has_sequence {
        for table in SURVEY_TABLES {
            tx.execute("DELETE FROM sqlite_sequence WHERE name=?1", params![table])?;
        }
    }

    Ok(())
}
