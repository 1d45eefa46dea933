use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;

use crate::service::QueryService;

/// Attendance counts for today and the current month (UTC).
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Attendance summary", body = AttendanceSummary),
        (status = 503, description = "Record store unavailable", body = Object)
    ),
    tag = "Dashboard"
)]
pub async fn attendance_summary(
    service: web::Data<QueryService>,
) -> actix_web::Result<impl Responder> {
    let summary = service.attendance_summary(Utc::now().date_naive()).await?;
    Ok(HttpResponse::Ok().json(summary))
}
