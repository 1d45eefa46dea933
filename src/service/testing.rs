use std::sync::Arc;

use chrono::NaiveDate;

use super::QueryService;
use crate::model::employee::{EmployeeFields, EmployeeStatus};
use crate::store::memory::MemoryStore;

pub fn memory_service() -> QueryService {
    QueryService::new(Arc::new(MemoryStore::new()))
}

pub fn fields(name: &str, status: EmployeeStatus) -> EmployeeFields {
    EmployeeFields {
        name: name.to_string(),
        email: format!("{}@corp.com", name.to_lowercase().replace(' ', ".")),
        position: "Software Engineer".to_string(),
        department: "Engineering".to_string(),
        hire_date: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
        salary: 90000.0,
        status,
    }
}

pub fn date(value: &str) -> NaiveDate {
    value.parse().unwrap()
}
