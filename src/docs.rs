use crate::api::attendance::{AttendanceListQuery, AttendanceListResponse};
use crate::api::employee::{EmployeeListQuery, EmployeeListResponse};
use crate::model::attendance::{Attendance, AttendanceMark, AttendanceStatus};
use crate::model::employee::{Employee, EmployeeFields, EmployeeStatus};
use crate::service::dashboard::{AttendanceSummary, StatusCounts};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Attendance API",
        version = "1.0.0",
        description = r#"
## Employee & Attendance Records

Backend for an HR dashboard: employee records, one attendance status per
employee per day, and a summary of today's and this month's attendance.

### Key Features
- **Employees**: create, update, delete, filtered and paginated listing
- **Attendance**: idempotent daily marking, filtered and paginated listing
- **Dashboard**: Present / Absent / Late counts

### Identifiers
Employee ids look like `EMP-1001`, attendance ids like `ATT-1`. Both are
assigned by the server and never reused.

### Response Format
- JSON, camelCase field names
- List endpoints return `{ data, totalCount, page, limit }`
- Errors return `{ message }`
"#,
    ),
    paths(
        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::all_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::list_attendance,
        crate::api::attendance::all_attendance,
        crate::api::attendance::mark_attendance,

        crate::api::dashboard::attendance_summary
    ),
    components(
        schemas(
            Employee,
            EmployeeFields,
            EmployeeStatus,
            EmployeeListQuery,
            EmployeeListResponse,
            Attendance,
            AttendanceMark,
            AttendanceStatus,
            AttendanceListQuery,
            AttendanceListResponse,
            AttendanceSummary,
            StatusCounts
        )
    ),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Dashboard", description = "Attendance summary"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/employee",
            "/api/employee/all",
            "/api/employee/{employee_id}",
            "/api/attendance",
            "/api/attendance/all",
            "/api/dashboard",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }
}
