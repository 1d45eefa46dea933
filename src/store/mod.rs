//! Record store contract and its backends.
//!
//! The store owns both collections. The MySQL backend is the durable one;
//! the in-memory backend serves tests and demo runs.

pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::ids::IdKind;
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::model::employee::{Employee, EmployeeStatus};

/// MySQL SQLSTATE for integrity constraint violations (duplicate keys).
const SQLSTATE_INTEGRITY: &str = "23000";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(SQLSTATE_INTEGRITY) =>
            {
                StoreError::Duplicate(db_err.message().to_string())
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
            _ => StoreError::Database(err.to_string()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// `[offset, offset + limit)` slice of a sorted result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeFilter {
    /// Case-insensitive substring of the employee name.
    pub name: Option<String>,
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceFilter {
    /// Restrict to these employees. `Some(vec![])` matches nothing.
    pub employee_ids: Option<Vec<String>>,
    pub status: Option<AttendanceStatus>,
    pub date: Option<NaiveDate>,
}

/// Storage backend for employees and attendance.
///
/// Employee reads are ordered newest-created first. Attendance reads are
/// ordered by date descending, then newest-created first.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Atomically advance the counter for `kind` and return its previous
    /// value (0 on first use).
    async fn next_sequence(&self, kind: IdKind) -> StoreResult<u64>;

    async fn count_employees(&self, filter: &EmployeeFilter) -> StoreResult<u64>;

    /// `window: None` returns every match.
    async fn find_employees(
        &self,
        filter: &EmployeeFilter,
        window: Option<PageWindow>,
    ) -> StoreResult<Vec<Employee>>;

    async fn find_employee(&self, id: &str) -> StoreResult<Option<Employee>>;

    /// Ids of employees whose name contains `name`, ignoring case.
    async fn employee_ids_by_name(&self, name: &str) -> StoreResult<Vec<String>>;

    /// Fails with `Duplicate` when the id or email is already taken.
    async fn insert_employee(&self, employee: &Employee) -> StoreResult<()>;

    /// Replaces every field but `id`. Returns `false` when no employee has
    /// that id.
    async fn replace_employee(&self, employee: &Employee) -> StoreResult<bool>;

    /// Returns `false` when nothing was removed.
    async fn delete_employee(&self, id: &str) -> StoreResult<bool>;

    async fn count_attendance(&self, filter: &AttendanceFilter) -> StoreResult<u64>;

    async fn find_attendance(
        &self,
        filter: &AttendanceFilter,
        window: Option<PageWindow>,
    ) -> StoreResult<Vec<Attendance>>;

    /// Single atomic write keyed on `(employee_id, date)`. An existing record
    /// keeps its id and takes the new status; otherwise `record` is inserted.
    async fn upsert_attendance(&self, record: &Attendance) -> StoreResult<Attendance>;
}
