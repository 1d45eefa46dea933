use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::{
    AttendanceFilter, EmployeeFilter, PageWindow, RecordStore, StoreError, StoreResult,
};
use crate::ids::IdKind;
use crate::model::attendance::Attendance;
use crate::model::employee::Employee;

#[derive(Debug, Clone)]
struct Stored<T> {
    /// Insertion order; higher is newer.
    row: u64,
    record: T,
}

#[derive(Debug, Default)]
struct Collections {
    employees: Vec<Stored<Employee>>,
    attendance: Vec<Stored<Attendance>>,
    next_row: u64,
    sequences: HashMap<IdKind, u64>,
}

impl Collections {
    fn stamp<T>(&mut self, record: T) -> Stored<T> {
        self.next_row += 1;
        Stored {
            row: self.next_row,
            record,
        }
    }

    fn matching_employees(&self, filter: &EmployeeFilter) -> Vec<&Stored<Employee>> {
        let needle = filter.name.as_deref().map(str::to_lowercase);
        let mut rows: Vec<_> = self
            .employees
            .iter()
            .filter(|e| {
                needle
                    .as_deref()
                    .is_none_or(|n| e.record.name.to_lowercase().contains(n))
            })
            .filter(|e| filter.status.is_none_or(|s| e.record.status == s))
            .collect();
        rows.sort_by(|a, b| b.row.cmp(&a.row));
        rows
    }

    fn matching_attendance(&self, filter: &AttendanceFilter) -> Vec<&Stored<Attendance>> {
        let mut rows: Vec<_> = self
            .attendance
            .iter()
            .filter(|a| {
                filter
                    .employee_ids
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&a.record.employee_id))
            })
            .filter(|a| filter.status.is_none_or(|s| a.record.status == s))
            .filter(|a| filter.date.is_none_or(|d| a.record.date == d))
            .collect();
        rows.sort_by(|a, b| b.record.date.cmp(&a.record.date).then(b.row.cmp(&a.row)));
        rows
    }
}

fn page<'a, T: Clone + 'a>(
    rows: impl IntoIterator<Item = &'a Stored<T>>,
    window: Option<PageWindow>,
) -> Vec<T> {
    let rows = rows.into_iter().map(|s| s.record.clone());
    match window {
        Some(w) => rows
            .skip(usize::try_from(w.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(w.limit).unwrap_or(usize::MAX))
            .collect(),
        None => rows.collect(),
    }
}

/// Process-local store. Every operation runs under one lock, so counters and
/// upserts are atomic with respect to each other.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn next_sequence(&self, kind: IdKind) -> StoreResult<u64> {
        let mut state = self.write()?;
        let counter = state.sequences.entry(kind).or_insert(0);
        let current = *counter;
        *counter += 1;
        Ok(current)
    }

    async fn count_employees(&self, filter: &EmployeeFilter) -> StoreResult<u64> {
        Ok(self.read()?.matching_employees(filter).len() as u64)
    }

    async fn find_employees(
        &self,
        filter: &EmployeeFilter,
        window: Option<PageWindow>,
    ) -> StoreResult<Vec<Employee>> {
        let state = self.read()?;
        Ok(page(state.matching_employees(filter), window))
    }

    async fn find_employee(&self, id: &str) -> StoreResult<Option<Employee>> {
        Ok(self
            .read()?
            .employees
            .iter()
            .find(|e| e.record.id == id)
            .map(|e| e.record.clone()))
    }

    async fn employee_ids_by_name(&self, name: &str) -> StoreResult<Vec<String>> {
        let filter = EmployeeFilter {
            name: Some(name.to_string()),
            status: None,
        };
        Ok(self
            .read()?
            .matching_employees(&filter)
            .into_iter()
            .map(|e| e.record.id.clone())
            .collect())
    }

    async fn insert_employee(&self, employee: &Employee) -> StoreResult<()> {
        let mut state = self.write()?;
        if let Some(existing) = state
            .employees
            .iter()
            .find(|e| e.record.id == employee.id || e.record.email == employee.email)
        {
            let key = if existing.record.id == employee.id {
                format!("employee id '{}' already exists", employee.id)
            } else {
                format!("employee email '{}' already exists", employee.email)
            };
            return Err(StoreError::Duplicate(key));
        }

        let stored = state.stamp(employee.clone());
        state.employees.push(stored);
        Ok(())
    }

    async fn replace_employee(&self, employee: &Employee) -> StoreResult<bool> {
        let mut state = self.write()?;
        if state
            .employees
            .iter()
            .any(|e| e.record.id != employee.id && e.record.email == employee.email)
        {
            return Err(StoreError::Duplicate(format!(
                "employee email '{}' already exists",
                employee.email
            )));
        }

        match state.employees.iter_mut().find(|e| e.record.id == employee.id) {
            Some(stored) => {
                stored.record = employee.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_employee(&self, id: &str) -> StoreResult<bool> {
        let mut state = self.write()?;
        let before = state.employees.len();
        state.employees.retain(|e| e.record.id != id);
        Ok(state.employees.len() != before)
    }

    async fn count_attendance(&self, filter: &AttendanceFilter) -> StoreResult<u64> {
        Ok(self.read()?.matching_attendance(filter).len() as u64)
    }

    async fn find_attendance(
        &self,
        filter: &AttendanceFilter,
        window: Option<PageWindow>,
    ) -> StoreResult<Vec<Attendance>> {
        let state = self.read()?;
        Ok(page(state.matching_attendance(filter), window))
    }

    async fn upsert_attendance(&self, record: &Attendance) -> StoreResult<Attendance> {
        let mut state = self.write()?;

        if let Some(existing) = state.attendance.iter_mut().find(|a| {
            a.record.employee_id == record.employee_id && a.record.date == record.date
        }) {
            existing.record.status = record.status;
            return Ok(existing.record.clone());
        }

        if state.attendance.iter().any(|a| a.record.id == record.id) {
            return Err(StoreError::Duplicate(format!(
                "attendance id '{}' already exists",
                record.id
            )));
        }

        let stored = state.stamp(record.clone());
        state.attendance.push(stored);
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;
    use crate::model::employee::EmployeeStatus;
    use chrono::NaiveDate;

    fn employee(id: &str, name: &str, status: EmployeeStatus) -> Employee {
        Employee {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@corp.com", id.to_lowercase()),
            position: "Data Scientist".to_string(),
            department: "Data".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2022, 3, 14).unwrap(),
            salary: 72000.0,
            status,
        }
    }

    fn mark(id: &str, employee_id: &str, date: &str, status: AttendanceStatus) -> Attendance {
        Attendance {
            id: id.to_string(),
            employee_id: employee_id.to_string(),
            date: date.parse().unwrap(),
            status,
        }
    }

    #[actix_web::test]
    async fn employees_come_back_newest_first() {
        let store = MemoryStore::new();
        for (id, name) in [("EMP-1001", "Alice Smith"), ("EMP-1002", "Bob Johnson"), ("EMP-1003", "Charlie Williams")] {
            store
                .insert_employee(&employee(id, name, EmployeeStatus::Active))
                .await
                .unwrap();
        }

        let all = store
            .find_employees(&EmployeeFilter::default(), None)
            .await
            .unwrap();
        let ids: Vec<_> = all.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["EMP-1003", "EMP-1002", "EMP-1001"]);

        let window = store
            .find_employees(
                &EmployeeFilter::default(),
                Some(PageWindow { offset: 1, limit: 5 }),
            )
            .await
            .unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].id, "EMP-1002");
    }

    #[actix_web::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        let first = employee("EMP-1001", "Alice Smith", EmployeeStatus::Active);
        store.insert_employee(&first).await.unwrap();

        let mut clash = employee("EMP-1002", "Alice Clone", EmployeeStatus::Active);
        clash.email = first.email.clone();
        let err = store.insert_employee(&clash).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        let other = employee("EMP-1003", "Diana Brown", EmployeeStatus::Active);
        store.insert_employee(&other).await.unwrap();
        let mut renamed = other.clone();
        renamed.email = first.email.clone();
        let err = store.replace_employee(&renamed).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[actix_web::test]
    async fn email_uniqueness_is_case_sensitive() {
        let store = MemoryStore::new();
        let mut lower = employee("EMP-1001", "Alice Smith", EmployeeStatus::Active);
        lower.email = "alice.smith@corp.com".into();
        store.insert_employee(&lower).await.unwrap();

        let mut upper = employee("EMP-1002", "Alice Smith", EmployeeStatus::Active);
        upper.email = "Alice.Smith@corp.com".into();
        store.insert_employee(&upper).await.unwrap();

        let all = store
            .find_employees(&EmployeeFilter::default(), None)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[actix_web::test]
    async fn attendance_sorts_by_date_then_creation() {
        let store = MemoryStore::new();
        store.upsert_attendance(&mark("ATT-1", "EMP-1001", "2024-01-01", AttendanceStatus::Present)).await.unwrap();
        store.upsert_attendance(&mark("ATT-2", "EMP-1001", "2024-01-03", AttendanceStatus::Late)).await.unwrap();
        store.upsert_attendance(&mark("ATT-3", "EMP-1002", "2024-01-01", AttendanceStatus::Absent)).await.unwrap();

        let all = store
            .find_attendance(&AttendanceFilter::default(), None)
            .await
            .unwrap();
        let ids: Vec<_> = all.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["ATT-2", "ATT-3", "ATT-1"]);
    }

    #[actix_web::test]
    async fn upsert_keeps_one_record_per_employee_day() {
        let store = MemoryStore::new();
        store.upsert_attendance(&mark("ATT-1", "EMP-1001", "2024-01-01", AttendanceStatus::Present)).await.unwrap();
        let updated = store
            .upsert_attendance(&mark("ATT-2", "EMP-1001", "2024-01-01", AttendanceStatus::Late))
            .await
            .unwrap();

        assert_eq!(updated.id, "ATT-1");
        assert_eq!(updated.status, AttendanceStatus::Late);
        assert_eq!(
            store.count_attendance(&AttendanceFilter::default()).await.unwrap(),
            1
        );
    }

    #[actix_web::test]
    async fn empty_id_set_matches_nothing() {
        let store = MemoryStore::new();
        store.upsert_attendance(&mark("ATT-1", "EMP-1001", "2024-01-01", AttendanceStatus::Present)).await.unwrap();

        let filter = AttendanceFilter {
            employee_ids: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(store.count_attendance(&filter).await.unwrap(), 0);
    }
}
