//! Repository Pattern Abstractions
//!
//! Persistence for performance records is expressed as a trait so the HTTP
//! layer and the import command never depend on SQLite directly.
//!
//! # Example
//!
//! ```rust,no_run
//! use perfindex::domain::records::{PerformanceSample, StudentInputs};
//! use perfindex::domain::repositories::PerformanceRecordRepository;
//! use perfindex::infrastructure::persistence::{Database, SqlitePerformanceRecordRepository};
//!
//! # async {
//! let db = Database::new("sqlite::memory:").await?;
//! let repo = SqlitePerformanceRecordRepository::new(db.pool.clone());
//! let sample = PerformanceSample::new(StudentInputs::new(6, 78, true, 7, 3), 72.45);
//! let record = repo.create(&sample).await?;
//! assert!(repo.find_by_id(record.id).await?.is_some());
//! # anyhow::Ok(())
//! # };
//! ```

use crate::domain::records::{PerformanceRecord, PerformanceSample};
use anyhow::Result;
use async_trait::async_trait;

/// Repository for persisting and retrieving performance records
#[async_trait]
pub trait PerformanceRecordRepository: Send + Sync {
    /// Insert a new record, stamping `created_at` and `updated_at`
    async fn create(&self, sample: &PerformanceSample) -> Result<PerformanceRecord>;

    /// Find a record by its identifier
    async fn find_by_id(&self, id: i64) -> Result<Option<PerformanceRecord>>;

    /// All records, newest first
    async fn get_all(&self) -> Result<Vec<PerformanceRecord>>;

    /// Replace the fields of an existing record, refreshing `updated_at`.
    /// Returns `None` when the record does not exist.
    async fn update(&self, id: i64, sample: &PerformanceSample)
    -> Result<Option<PerformanceRecord>>;

    /// Delete a record. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Count total number of records
    async fn count(&self) -> Result<usize>;

    /// Whether a record with the same hours studied, previous scores and
    /// performance index already exists. Used to keep dataset imports
    /// idempotent.
    async fn exists_similar(&self, sample: &PerformanceSample) -> Result<bool>;
}
