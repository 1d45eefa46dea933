use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum EmployeeStatus {
    #[default]
    Active,
    #[serde(rename = "On Leave")]
    #[strum(serialize = "On Leave")]
    OnLeave,
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "EMP-1001",
        "name": "Alice Smith",
        "email": "alice.smith@corp.com",
        "position": "Software Engineer",
        "department": "Engineering",
        "hireDate": "2024-01-01",
        "salary": 85000.0,
        "status": "Active"
    })
)]
pub struct Employee {
    #[schema(example = "EMP-1001")]
    pub id: String,

    #[schema(example = "Alice Smith")]
    pub name: String,

    #[schema(example = "alice.smith@corp.com")]
    pub email: String,

    #[schema(example = "Software Engineer")]
    pub position: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(
        example = "2024-01-01",
        value_type = String,
        format = "date"
    )]
    pub hire_date: NaiveDate,

    #[schema(example = 85000.0)]
    pub salary: f64,

    pub status: EmployeeStatus,
}

/// Every employee field except the generated `id`. Used as the body of both
/// create and update, since update replaces all mutable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFields {
    #[schema(example = "Alice Smith")]
    pub name: String,
    #[schema(example = "alice.smith@corp.com", format = "email")]
    pub email: String,
    #[schema(example = "Software Engineer")]
    pub position: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub hire_date: NaiveDate,
    #[schema(example = 85000.0)]
    pub salary: f64,
    #[serde(default)]
    pub status: EmployeeStatus,
}

impl EmployeeFields {
    pub fn with_id(self, id: impl Into<String>) -> Employee {
        Employee {
            id: id.into(),
            name: self.name,
            email: self.email,
            position: self.position,
            department: self.department,
            hire_date: self.hire_date,
            salary: self.salary,
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_display_names_on_the_wire() {
        assert_eq!(EmployeeStatus::OnLeave.to_string(), "On Leave");
        assert_eq!(
            "On Leave".parse::<EmployeeStatus>().ok(),
            Some(EmployeeStatus::OnLeave)
        );
        assert_eq!(
            serde_json::to_value(EmployeeStatus::OnLeave).unwrap(),
            serde_json::json!("On Leave")
        );
        assert!("on_leave".parse::<EmployeeStatus>().is_err());
    }

    #[test]
    fn status_defaults_to_active_when_omitted() {
        let fields: EmployeeFields = serde_json::from_value(serde_json::json!({
            "name": "Bob Johnson",
            "email": "bob.johnson@corp.com",
            "position": "UX Designer",
            "department": "Design",
            "hireDate": "2023-05-02",
            "salary": 64000
        }))
        .unwrap();

        assert_eq!(fields.status, EmployeeStatus::Active);
        let employee = fields.with_id("EMP-1001");
        assert_eq!(employee.id, "EMP-1001");
        assert_eq!(employee.hire_date, NaiveDate::from_ymd_opt(2023, 5, 2).unwrap());
    }
}
