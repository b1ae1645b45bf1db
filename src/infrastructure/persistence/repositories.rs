use crate::domain::records::{PerformanceRecord, PerformanceSample, StudentInputs};
use crate::domain::repositories::PerformanceRecordRepository;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

const SELECT_RECORD: &str = r#"
    SELECT id, hours_studied, previous_scores, extracurricular, sleep_hours,
           sample_papers, performance_index, created_at, updated_at
    FROM performance_records
"#;

pub struct SqlitePerformanceRecordRepository {
    pool: SqlitePool,
}

impl SqlitePerformanceRecordRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Current time at microsecond precision, so what is stored reads back equal.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339, which keeps `ORDER BY created_at` chronological.
fn timestamp_text(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn column_u32(row: &SqliteRow, column: &str) -> Result<u32> {
    let value: i64 = row.try_get(column)?;
    u32::try_from(value).with_context(|| format!("Column {} out of range: {}", column, value))
}

fn column_timestamp(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>> {
    let raw: String = row.try_get(column)?;
    let parsed = DateTime::parse_from_rfc3339(&raw)
        .with_context(|| format!("Invalid timestamp in {}: {}", column, raw))?;
    Ok(parsed.with_timezone(&Utc))
}

fn map_row(row: &SqliteRow) -> Result<PerformanceRecord> {
    Ok(PerformanceRecord {
        id: row.try_get("id")?,
        inputs: StudentInputs {
            hours_studied: column_u32(row, "hours_studied")?,
            previous_scores: column_u32(row, "previous_scores")?,
            extracurricular: row.try_get("extracurricular")?,
            sleep_hours: column_u32(row, "sleep_hours")?,
            sample_papers: column_u32(row, "sample_papers")?,
        },
        performance_index: row.try_get("performance_index")?,
        created_at: column_timestamp(row, "created_at")?,
        updated_at: column_timestamp(row, "updated_at")?,
    })
}

#[async_trait]
impl PerformanceRecordRepository for SqlitePerformanceRecordRepository {
    async fn create(&self, sample: &PerformanceSample) -> Result<PerformanceRecord> {
        let created_at = now();
        let stamp = timestamp_text(&created_at);
        let inputs = &sample.inputs;

        let result = sqlx::query(
            r#"
            INSERT INTO performance_records (
                hours_studied, previous_scores, extracurricular, sleep_hours,
                sample_papers, performance_index, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(inputs.hours_studied as i64)
        .bind(inputs.previous_scores as i64)
        .bind(inputs.extracurricular)
        .bind(inputs.sleep_hours as i64)
        .bind(inputs.sample_papers as i64)
        .bind(sample.performance_index)
        .bind(&stamp)
        .bind(&stamp)
        .execute(&self.pool)
        .await
        .context("Failed to insert performance record")?;

        let id = result.last_insert_rowid();
        debug!("Persisted performance record {}", id);

        Ok(PerformanceRecord {
            id,
            inputs: sample.inputs,
            performance_index: sample.performance_index,
            created_at,
            updated_at: created_at,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PerformanceRecord>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_RECORD))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to load performance record")?;

        row.as_ref().map(map_row).transpose()
    }

    async fn get_all(&self) -> Result<Vec<PerformanceRecord>> {
        let rows = sqlx::query(&format!(
            "{} ORDER BY created_at DESC, id DESC",
            SELECT_RECORD
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list performance records")?;

        rows.iter().map(map_row).collect()
    }

    async fn update(
        &self,
        id: i64,
        sample: &PerformanceSample,
    ) -> Result<Option<PerformanceRecord>> {
        let inputs = &sample.inputs;
        let result = sqlx::query(
            r#"
            UPDATE performance_records
            SET hours_studied = ?, previous_scores = ?, extracurricular = ?,
                sleep_hours = ?, sample_papers = ?, performance_index = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(inputs.hours_studied as i64)
        .bind(inputs.previous_scores as i64)
        .bind(inputs.extracurricular)
        .bind(inputs.sleep_hours as i64)
        .bind(inputs.sample_papers as i64)
        .bind(sample.performance_index)
        .bind(timestamp_text(&now()))
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update performance record")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM performance_records WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete performance record")?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM performance_records")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count as usize)
    }

    async fn exists_similar(&self, sample: &PerformanceSample) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM performance_records
                WHERE hours_studied = ? AND previous_scores = ? AND performance_index = ?
            ) as found
            "#,
        )
        .bind(sample.inputs.hours_studied as i64)
        .bind(sample.inputs.previous_scores as i64)
        .bind(sample.performance_index)
        .fetch_one(&self.pool)
        .await
        .context("Failed to look up similar record")?;

        let found: i64 = row.try_get("found")?;
        Ok(found != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_text_is_fixed_width() {
        let at = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(timestamp_text(&at), "2026-01-02T03:04:05.000000Z");

        let later = at + chrono::Duration::microseconds(1_500);
        assert_eq!(timestamp_text(&later), "2026-01-02T03:04:05.001500Z");
        assert!(timestamp_text(&later) > timestamp_text(&at));
    }

    #[test]
    fn test_now_has_microsecond_precision() {
        let stamp = now();
        assert_eq!(stamp.timestamp_subsec_nanos() % 1_000, 0);
    }
}
