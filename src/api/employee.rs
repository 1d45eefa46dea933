use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use super::{optional_param, page_request};
use crate::{
    config::Config,
    error::{ServiceError, ServiceResult},
    model::employee::{Employee, EmployeeFields},
    service::{QueryService, employee::EmployeeQuery},
};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeListQuery {
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[schema(example = 10)]
    /// Items per page
    pub limit: Option<u64>,
    #[schema(example = "ali")]
    /// Case-insensitive part of the employee name
    pub name: Option<String>,
    #[schema(example = "Active")]
    /// Active, On Leave or Terminated
    pub status: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 128)]
    pub total_count: u64,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub limit: u64,
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Input checks done by the API before anything reaches the service.
fn validate_employee(fields: &EmployeeFields) -> ServiceResult<()> {
    for (field, value) in [
        ("name", &fields.name),
        ("email", &fields.email),
        ("position", &fields.position),
        ("department", &fields.department),
    ] {
        if value.trim().is_empty() {
            return Err(ServiceError::Validation(format!("{} must not be empty", field)));
        }
    }

    if !looks_like_email(fields.email.trim()) {
        return Err(ServiceError::Validation(format!(
            "'{}' is not a valid email address",
            fields.email
        )));
    }

    if !fields.salary.is_finite() || fields.salary <= 0.0 {
        return Err(ServiceError::Validation("salary must be a positive number".into()));
    }

    Ok(())
}

fn trimmed(mut fields: EmployeeFields) -> EmployeeFields {
    fields.name = fields.name.trim().to_string();
    fields.email = fields.email.trim().to_string();
    fields.position = fields.position.trim().to_string();
    fields.department = fields.department.trim().to_string();
    fields
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employee",
    request_body = EmployeeFields,
    responses(
        (status = 201, description = "Employee created successfully", body = Employee),
        (status = 400, description = "Invalid employee fields", body = Object, example = json!({
            "message": "salary must be a positive number"
        })),
        (status = 409, description = "Email already in use", body = Object, example = json!({
            "message": "Failed to create employee: employee email 'alice.smith@corp.com' already exists"
        })),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "message": "Failed to create employee"
        }))
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    service: web::Data<QueryService>,
    payload: web::Json<EmployeeFields>,
) -> actix_web::Result<impl Responder> {
    let fields = trimmed(payload.into_inner());
    validate_employee(&fields)?;

    let employee = service.create_employee(fields).await?;
    Ok(HttpResponse::Created().json(employee))
}

#[utoipa::path(
    get,
    path = "/api/employee",
    params(EmployeeListQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse),
        (status = 400, description = "Invalid status filter")
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    service: web::Data<QueryService>,
    config: web::Data<Config>,
    query: web::Query<EmployeeListQuery>,
) -> actix_web::Result<impl Responder> {
    let request = page_request(query.page, query.limit, &config)?;
    let filter = EmployeeQuery {
        name: query.name.clone(),
        status: optional_param("status", query.status.as_deref())?,
    };

    let page = service.list_employees(request, &filter).await?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data: page.data,
        total_count: page.total_count,
        page: request.page(),
        limit: request.limit(),
    }))
}

/// Every employee, newest first, without paging
#[utoipa::path(
    get,
    path = "/api/employee/all",
    responses(
        (status = 200, description = "All employees", body = [Employee])
    ),
    tag = "Employee"
)]
pub async fn all_employees(service: web::Data<QueryService>) -> actix_web::Result<impl Responder> {
    let employees = service.all_employees().await?;
    Ok(HttpResponse::Ok().json(employees))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employee/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID, e.g. EMP-1001")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee EMP-1001 not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    service: web::Data<QueryService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee = service.employee(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/employee/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID, e.g. EMP-1001")
    ),
    request_body = EmployeeFields,
    responses(
        (status = 200, description = "Employee updated successfully", body = Employee),
        (status = 400, description = "Invalid employee fields"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee EMP-1001 not found"
        })),
        (status = 409, description = "Email already in use")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    service: web::Data<QueryService>,
    path: web::Path<String>,
    payload: web::Json<EmployeeFields>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let fields = trimmed(payload.into_inner());
    validate_employee(&fields)?;

    let employee = service.update_employee(&employee_id, fields).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employee/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID, e.g. EMP-1001")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee EMP-1001 not found"
        })),
        (status = 500, description = "Internal server error", body = Object)
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    service: web::Data<QueryService>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    service.delete_employee(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::EmployeeStatus;
    use chrono::NaiveDate;

    fn valid() -> EmployeeFields {
        EmployeeFields {
            name: "Hannah Davis".into(),
            email: "hannah.davis@corp.com".into(),
            position: "HR Manager".into(),
            department: "Human Resources".into(),
            hire_date: NaiveDate::from_ymd_opt(2020, 2, 29).unwrap(),
            salary: 61000.0,
            status: EmployeeStatus::Active,
        }
    }

    #[test]
    fn accepts_a_complete_employee() {
        assert!(validate_employee(&valid()).is_ok());
    }

    #[test]
    fn rejects_blank_fields_and_bad_salary() {
        let mut blank = valid();
        blank.position = "   ".into();
        assert!(matches!(validate_employee(&blank), Err(ServiceError::Validation(_))));

        for salary in [0.0, -10.0, f64::NAN] {
            let mut broke = valid();
            broke.salary = salary;
            assert!(validate_employee(&broke).is_err(), "salary {salary}");
        }
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("ian.martinez@corp.com"));
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("ian.martinez"));
        assert!(!looks_like_email("@corp.com"));
        assert!(!looks_like_email("ian@corp"));
        assert!(!looks_like_email("ian@.com"));
        assert!(!looks_like_email("ian@corp."));
        assert!(!looks_like_email("ian @corp.com"));
        assert!(!looks_like_email("ian@@corp.com"));
    }
}
