use std::sync::Arc;

use crate::store::{RecordStore, StoreResult};

/// Which collection an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Employee,
    Attendance,
}

impl IdKind {
    pub const fn prefix(self) -> &'static str {
        match self {
            IdKind::Employee => "EMP",
            IdKind::Attendance => "ATT",
        }
    }

    /// Number used for the first identifier of this kind.
    pub const fn base(self) -> u64 {
        match self {
            IdKind::Employee => 1001,
            IdKind::Attendance => 1,
        }
    }

    /// Key of the counter row that backs this kind.
    pub const fn sequence_name(self) -> &'static str {
        match self {
            IdKind::Employee => "employee",
            IdKind::Attendance => "attendance",
        }
    }

    /// `sequence` is the zero-based value drawn from the counter.
    pub fn format(self, sequence: u64) -> String {
        format!("{}-{}", self.prefix(), self.base() + sequence)
    }
}

/// Hands out `EMP-<n>` / `ATT-<n>` identifiers from the store's atomic
/// counters. Values are never handed out twice, including after deletes.
#[derive(Clone)]
pub struct IdGenerator {
    store: Arc<dyn RecordStore>,
}

impl IdGenerator {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn next_employee_id(&self) -> StoreResult<String> {
        self.next(IdKind::Employee).await
    }

    pub async fn next_attendance_id(&self) -> StoreResult<String> {
        self.next(IdKind::Attendance).await
    }

    async fn next(&self, kind: IdKind) -> StoreResult<String> {
        let sequence = self.store.next_sequence(kind).await?;
        Ok(kind.format(sequence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn formats_from_kind_base() {
        assert_eq!(IdKind::Employee.format(0), "EMP-1001");
        assert_eq!(IdKind::Employee.format(27), "EMP-1028");
        assert_eq!(IdKind::Attendance.format(0), "ATT-1");
        assert_eq!(IdKind::Attendance.format(9), "ATT-10");
    }

    #[actix_web::test]
    async fn counters_are_independent_per_kind() {
        let ids = IdGenerator::new(Arc::new(MemoryStore::new()));

        assert_eq!(ids.next_employee_id().await.unwrap(), "EMP-1001");
        assert_eq!(ids.next_employee_id().await.unwrap(), "EMP-1002");
        assert_eq!(ids.next_attendance_id().await.unwrap(), "ATT-1");
        assert_eq!(ids.next_employee_id().await.unwrap(), "EMP-1003");
        assert_eq!(ids.next_attendance_id().await.unwrap(), "ATT-2");
    }

    #[actix_web::test]
    async fn concurrent_draws_never_repeat() {
        let ids = IdGenerator::new(Arc::new(MemoryStore::new()));

        let draws = futures::future::join_all((0..50).map(|_| ids.next_employee_id())).await;
        let mut seen: Vec<String> = draws.into_iter().map(|id| id.unwrap()).collect();
        seen.sort();
        seen.dedup();

        assert_eq!(seen.len(), 50);
    }
}
