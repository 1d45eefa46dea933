use tracing::{debug, info, instrument};

use super::{Page, PageRequest, QueryService, normalize_filter};
use crate::error::{ServiceError, ServiceResult};
use crate::model::employee::{Employee, EmployeeFields, EmployeeStatus};
use crate::store::EmployeeFilter;

#[derive(Debug, Clone, Default)]
pub struct EmployeeQuery {
    pub name: Option<String>,
    pub status: Option<EmployeeStatus>,
}

impl QueryService {
    #[instrument(name = "list_employees", skip(self))]
    pub async fn list_employees(
        &self,
        page: PageRequest,
        query: &EmployeeQuery,
    ) -> ServiceResult<Page<Employee>> {
        const OP: &str = "Failed to fetch employees";

        let filter = EmployeeFilter {
            name: normalize_filter(query.name.as_deref()),
            status: query.status,
        };

        let total_count = self
            .store
            .count_employees(&filter)
            .await
            .map_err(|e| ServiceError::from_store(e, OP))?;

        let data = self
            .store
            .find_employees(&filter, Some(page.window()))
            .await
            .map_err(|e| ServiceError::from_store(e, OP))?;

        debug!(total_count, returned = data.len(), "Employees listed");
        Ok(Page { data, total_count })
    }

    pub async fn all_employees(&self) -> ServiceResult<Vec<Employee>> {
        self.store
            .find_employees(&EmployeeFilter::default(), None)
            .await
            .map_err(|e| ServiceError::from_store(e, "Failed to fetch all employees"))
    }

    pub async fn employee(&self, id: &str) -> ServiceResult<Employee> {
        self.store
            .find_employee(id)
            .await
            .map_err(|e| ServiceError::from_store(e, "Failed to fetch employee"))?
            .ok_or_else(|| ServiceError::NotFound {
                entity: "Employee",
                id: id.to_string(),
            })
    }

    pub async fn create_employee(&self, fields: EmployeeFields) -> ServiceResult<Employee> {
        const OP: &str = "Failed to create employee";

        let id = self
            .ids
            .next_employee_id()
            .await
            .map_err(|e| ServiceError::from_store(e, OP))?;

        let employee = fields.with_id(id);
        self.store
            .insert_employee(&employee)
            .await
            .map_err(|e| ServiceError::from_store(e, OP))?;

        info!(employee_id = %employee.id, "Employee created");
        Ok(employee)
    }

    pub async fn update_employee(
        &self,
        id: &str,
        fields: EmployeeFields,
    ) -> ServiceResult<Employee> {
        let employee = fields.with_id(id);

        let found = self
            .store
            .replace_employee(&employee)
            .await
            .map_err(|e| ServiceError::from_store(e, "Failed to update employee"))?;

        if !found {
            return Err(ServiceError::NotFound {
                entity: "Employee",
                id: id.to_string(),
            });
        }

        info!(employee_id = %id, "Employee updated");
        Ok(employee)
    }

    pub async fn delete_employee(&self, id: &str) -> ServiceResult<()> {
        let removed = self
            .store
            .delete_employee(id)
            .await
            .map_err(|e| ServiceError::from_store(e, "Failed to delete employee"))?;

        if !removed {
            return Err(ServiceError::NotFound {
                entity: "Employee",
                id: id.to_string(),
            });
        }

        info!(employee_id = %id, "Employee deleted");
        Ok(())
    }
}
