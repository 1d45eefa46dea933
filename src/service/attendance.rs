use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use super::{Page, PageRequest, QueryService, normalize_filter};
use crate::error::{ServiceError, ServiceResult};
use crate::model::attendance::{Attendance, AttendanceMark, AttendanceStatus};
use crate::store::AttendanceFilter;

#[derive(Debug, Clone, Default)]
pub struct AttendanceQuery {
    /// Matched against the employee's name, not the employee id.
    pub name: Option<String>,
    pub status: Option<AttendanceStatus>,
    pub date: Option<NaiveDate>,
}

impl QueryService {
    #[instrument(name = "list_attendance", skip(self))]
    pub async fn list_attendance(
        &self,
        page: PageRequest,
        query: &AttendanceQuery,
    ) -> ServiceResult<Page<Attendance>> {
        const OP: &str = "Failed to fetch attendance page";

        let mut filter = AttendanceFilter {
            employee_ids: None,
            status: query.status,
            date: query.date,
        };

        if let Some(name) = normalize_filter(query.name.as_deref()) {
            let ids = self
                .store
                .employee_ids_by_name(&name)
                .await
                .map_err(|e| ServiceError::from_store(e, OP))?;

            if ids.is_empty() {
                debug!(%name, "No employee matches name filter");
                return Ok(Page::empty());
            }
            filter.employee_ids = Some(ids);
        }

        let total_count = self
            .store
            .count_attendance(&filter)
            .await
            .map_err(|e| ServiceError::from_store(e, OP))?;

        let data = self
            .store
            .find_attendance(&filter, Some(page.window()))
            .await
            .map_err(|e| ServiceError::from_store(e, OP))?;

        debug!(total_count, returned = data.len(), "Attendance listed");
        Ok(Page { data, total_count })
    }

    pub async fn all_attendance(&self) -> ServiceResult<Vec<Attendance>> {
        self.store
            .find_attendance(&AttendanceFilter::default(), None)
            .await
            .map_err(|e| ServiceError::from_store(e, "Failed to fetch all attendance"))
    }

    /// Records `mark.status` for the employee on `mark.date`, replacing any
    /// status already recorded for that day.
    pub async fn mark_attendance(&self, mark: AttendanceMark) -> ServiceResult<Attendance> {
        const OP: &str = "Failed to add attendance";

        let id = self
            .ids
            .next_attendance_id()
            .await
            .map_err(|e| ServiceError::from_store(e, OP))?;

        let stored = self
            .store
            .upsert_attendance(&mark.with_id(id))
            .await
            .map_err(|e| ServiceError::from_store(e, OP))?;

        info!(
            attendance_id = %stored.id,
            employee_id = %stored.employee_id,
            date = %stored.date,
            status = %stored.status,
            "Attendance recorded"
        );
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::EmployeeStatus;
    use crate::service::testing::{date, fields, memory_service};

    fn mark(employee_id: &str, day: &str, status: AttendanceStatus) -> AttendanceMark {
        AttendanceMark {
            employee_id: employee_id.to_string(),
            date: date(day),
            status,
        }
    }

    async fn populated() -> QueryService {
        let service = memory_service();
        for name in ["Alice Smith", "Bob Johnson", "Natalie Cole"] {
            service
                .create_employee(fields(name, EmployeeStatus::Active))
                .await
                .unwrap();
        }
        // EMP-1001 Alice, EMP-1002 Bob, EMP-1003 Natalie
        let marks = [
            ("EMP-1001", "2024-01-01", AttendanceStatus::Present),
            ("EMP-1002", "2024-01-01", AttendanceStatus::Absent),
            ("EMP-1003", "2024-01-01", AttendanceStatus::Late),
            ("EMP-1001", "2024-01-02", AttendanceStatus::Late),
            ("EMP-1002", "2024-01-02", AttendanceStatus::Present),
            ("EMP-1003", "2024-01-03", AttendanceStatus::Present),
        ];
        for (employee_id, day, status) in marks {
            service
                .mark_attendance(mark(employee_id, day, status))
                .await
                .unwrap();
        }
        service
    }

    #[actix_web::test]
    async fn second_mark_for_same_day_updates_in_place() {
        let service = memory_service();

        let first = service
            .mark_attendance(mark("EMP-1001", "2024-01-01", AttendanceStatus::Present))
            .await
            .unwrap();
        let second = service
            .mark_attendance(mark("EMP-1001", "2024-01-01", AttendanceStatus::Absent))
            .await
            .unwrap();

        assert_eq!(first.id, "ATT-1");
        assert_eq!(second.id, "ATT-1");
        assert_eq!(second.status, AttendanceStatus::Absent);

        let all = service.all_attendance().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, AttendanceStatus::Absent);
    }

    #[actix_web::test]
    async fn listing_is_date_descending_then_newest() {
        let service = populated().await;

        let all = service.all_attendance().await.unwrap();
        let order: Vec<_> = all.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(order, ["ATT-6", "ATT-5", "ATT-4", "ATT-3", "ATT-2", "ATT-1"]);
    }

    #[actix_web::test]
    async fn name_filter_goes_through_employee_names() {
        let service = populated().await;

        // "ali" hits Alice and Natalie, never the "EMP-…" ids themselves.
        let query = AttendanceQuery {
            name: Some("ALI".into()),
            ..Default::default()
        };
        let result = service
            .list_attendance(PageRequest::new(1, 10).unwrap(), &query)
            .await
            .unwrap();

        assert_eq!(result.total_count, 4);
        assert!(
            result
                .data
                .iter()
                .all(|a| a.employee_id == "EMP-1001" || a.employee_id == "EMP-1003")
        );

        let by_id = AttendanceQuery {
            name: Some("EMP-1002".into()),
            ..Default::default()
        };
        let result = service
            .list_attendance(PageRequest::new(1, 10).unwrap(), &by_id)
            .await
            .unwrap();
        assert_eq!(result, Page::empty());
    }

    #[actix_web::test]
    async fn unknown_name_short_circuits_to_empty() {
        let service = populated().await;

        let query = AttendanceQuery {
            name: Some("zelda".into()),
            status: Some(AttendanceStatus::Present),
            date: None,
        };
        let result = service
            .list_attendance(PageRequest::new(1, 10).unwrap(), &query)
            .await
            .unwrap();

        assert!(result.data.is_empty());
        assert_eq!(result.total_count, 0);
    }

    #[actix_web::test]
    async fn status_and_date_filters_combine() {
        let service = populated().await;

        let query = AttendanceQuery {
            name: None,
            status: Some(AttendanceStatus::Present),
            date: Some(date("2024-01-02")),
        };
        let result = service
            .list_attendance(PageRequest::new(1, 10).unwrap(), &query)
            .await
            .unwrap();

        assert_eq!(result.total_count, 1);
        assert_eq!(result.data[0].employee_id, "EMP-1002");
    }

    #[actix_web::test]
    async fn pages_keep_total_count() {
        let service = populated().await;

        let second = service
            .list_attendance(PageRequest::new(2, 4).unwrap(), &AttendanceQuery::default())
            .await
            .unwrap();
        assert_eq!(second.total_count, 6);
        let ids: Vec<_> = second.data.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["ATT-2", "ATT-1"]);

        let beyond = service
            .list_attendance(PageRequest::new(3, 4).unwrap(), &AttendanceQuery::default())
            .await
            .unwrap();
        assert!(beyond.data.is_empty());
        assert_eq!(beyond.total_count, 6);
    }

    #[actix_web::test]
    async fn orphaned_records_survive_employee_delete() {
        let service = populated().await;
        service.delete_employee("EMP-1003").await.unwrap();

        let all = service.all_attendance().await.unwrap();
        assert_eq!(all.iter().filter(|a| a.employee_id == "EMP-1003").count(), 2);
    }
}
