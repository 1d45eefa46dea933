use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{optional_param, page_request};
use crate::{
    config::Config,
    error::ServiceError,
    model::attendance::{Attendance, AttendanceMark},
    service::{QueryService, attendance::AttendanceQuery},
};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AttendanceListQuery {
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[schema(example = 10)]
    /// Items per page
    pub limit: Option<u64>,
    #[schema(example = "smith")]
    /// Case-insensitive part of the employee name
    pub name: Option<String>,
    #[schema(example = "Late")]
    /// Present, Absent or Late
    pub status: Option<String>,
    #[schema(example = "2026-01-15")]
    /// Exact day, YYYY-MM-DD
    pub date: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceListResponse {
    pub data: Vec<Attendance>,
    #[schema(example = 420)]
    pub total_count: u64,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub limit: u64,
}

#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceListQuery),
    responses(
        (status = 200, description = "Paginated attendance, newest day first", body = AttendanceListResponse),
        (status = 400, description = "Invalid status or date filter", body = Object, example = json!({
            "message": "Invalid date: '2026-13-01'"
        }))
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    service: web::Data<QueryService>,
    config: web::Data<Config>,
    query: web::Query<AttendanceListQuery>,
) -> actix_web::Result<impl Responder> {
    let request = page_request(query.page, query.limit, &config)?;
    let filter = AttendanceQuery {
        name: query.name.clone(),
        status: optional_param("status", query.status.as_deref())?,
        date: optional_param::<NaiveDate>("date", query.date.as_deref())?,
    };

    let page = service.list_attendance(request, &filter).await?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data: page.data,
        total_count: page.total_count,
        page: request.page(),
        limit: request.limit(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/attendance/all",
    responses(
        (status = 200, description = "All attendance records", body = [Attendance])
    ),
    tag = "Attendance"
)]
pub async fn all_attendance(service: web::Data<QueryService>) -> actix_web::Result<impl Responder> {
    let records = service.all_attendance().await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Mark attendance
///
/// A second mark for the same employee and day replaces the status of the
/// existing record and returns it with its original id.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = AttendanceMark,
    responses(
        (status = 200, description = "Attendance recorded", body = Attendance),
        (status = 400, description = "Missing employee id", body = Object, example = json!({
            "message": "employeeId must not be empty"
        })),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "message": "Failed to add attendance"
        }))
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    service: web::Data<QueryService>,
    payload: web::Json<AttendanceMark>,
) -> actix_web::Result<impl Responder> {
    let mut mark = payload.into_inner();
    mark.employee_id = mark.employee_id.trim().to_string();
    if mark.employee_id.is_empty() {
        return Err(ServiceError::Validation("employeeId must not be empty".into()).into());
    }

    let record = service.mark_attendance(mark).await?;
    Ok(HttpResponse::Ok().json(record))
}
