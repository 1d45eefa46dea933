use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, MySqlPool};
use tracing::debug;

use super::{
    AttendanceFilter, EmployeeFilter, PageWindow, RecordStore, StoreError, StoreResult,
};
use crate::ids::IdKind;
use crate::model::attendance::Attendance;
use crate::model::employee::Employee;
use crate::utils::db_utils::{SqlValue, WhereClause, bind_query_as, bind_scalar, like_pattern};

const EMPLOYEE_COLUMNS: &str =
    "employee_id, name, email, position, department, hire_date, salary, status";
const ATTENDANCE_COLUMNS: &str = "attendance_id, employee_id, attendance_date, status";

#[derive(FromRow)]
struct EmployeeRow {
    employee_id: String,
    name: String,
    email: String,
    position: String,
    department: String,
    hire_date: NaiveDate,
    salary: f64,
    status: String,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = StoreError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|_| {
            StoreError::Database(format!(
                "employee {} has unknown status '{}'",
                row.employee_id, row.status
            ))
        })?;

        Ok(Employee {
            id: row.employee_id,
            name: row.name,
            email: row.email,
            position: row.position,
            department: row.department,
            hire_date: row.hire_date,
            salary: row.salary,
            status,
        })
    }
}

#[derive(FromRow)]
struct AttendanceRow {
    attendance_id: String,
    employee_id: String,
    attendance_date: NaiveDate,
    status: String,
}

impl TryFrom<AttendanceRow> for Attendance {
    type Error = StoreError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|_| {
            StoreError::Database(format!(
                "attendance {} has unknown status '{}'",
                row.attendance_id, row.status
            ))
        })?;

        Ok(Attendance {
            id: row.attendance_id,
            employee_id: row.employee_id,
            date: row.attendance_date,
            status,
        })
    }
}

fn employee_where(filter: &EmployeeFilter) -> WhereClause {
    let mut clause = WhereClause::new();

    if let Some(name) = &filter.name {
        clause.push("LOWER(name) LIKE ?", SqlValue::String(like_pattern(name)));
    }

    if let Some(status) = filter.status {
        clause.push("status = ?", SqlValue::String(status.to_string()));
    }

    clause
}

fn attendance_where(filter: &AttendanceFilter) -> WhereClause {
    let mut clause = WhereClause::new();

    if let Some(ids) = &filter.employee_ids {
        clause.push_in("employee_id", ids);
    }

    if let Some(status) = filter.status {
        clause.push("status = ?", SqlValue::String(status.to_string()));
    }

    if let Some(date) = filter.date {
        clause.push("attendance_date = ?", SqlValue::Date(date));
    }

    clause
}

fn limit_sql(window: Option<PageWindow>) -> String {
    match window {
        Some(w) => format!("LIMIT {} OFFSET {}", w.limit, w.offset),
        None => String::new(),
    }
}

/// The counter reports its new value; callers want the one before it.
fn previous_sequence(last_insert_id: u64, kind: IdKind) -> StoreResult<u64> {
    last_insert_id.checked_sub(1).ok_or_else(|| {
        StoreError::Database(format!(
            "id sequence '{}' reported no incremented value",
            kind.sequence_name()
        ))
    })
}

/// Durable store on the MySQL schema created by [`crate::db::ensure_schema`].
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn count(&self, table: &str, clause: &WhereClause) -> StoreResult<u64> {
        let count_sql = format!("SELECT COUNT(*) FROM {} {}", table, clause.sql());
        debug!(sql = %count_sql, bindings = ?clause.values(), "Counting records");

        let total = bind_scalar(sqlx::query_scalar::<_, i64>(&count_sql), clause.values())
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(total).unwrap_or_default())
    }
}

#[async_trait]
impl RecordStore for MySqlStore {
    async fn next_sequence(&self, kind: IdKind) -> StoreResult<u64> {
        // LAST_INSERT_ID(expr) reports the incremented value for this statement.
        let result = sqlx::query(
            "UPDATE id_sequences SET value = LAST_INSERT_ID(value + 1) WHERE name = ?",
        )
        .bind(kind.sequence_name())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Database(format!(
                "id sequence '{}' is missing",
                kind.sequence_name()
            )));
        }

        previous_sequence(result.last_insert_id(), kind)
    }

    async fn count_employees(&self, filter: &EmployeeFilter) -> StoreResult<u64> {
        self.count("employees", &employee_where(filter)).await
    }

    async fn find_employees(
        &self,
        filter: &EmployeeFilter,
        window: Option<PageWindow>,
    ) -> StoreResult<Vec<Employee>> {
        let clause = employee_where(filter);
        let data_sql = format!(
            "SELECT {} FROM employees {} ORDER BY row_id DESC {}",
            EMPLOYEE_COLUMNS,
            clause.sql(),
            limit_sql(window)
        );
        debug!(sql = %data_sql, bindings = ?clause.values(), ?window, "Fetching employees");

        let rows = bind_query_as(sqlx::query_as::<_, EmployeeRow>(&data_sql), clause.values())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Employee::try_from).collect()
    }

    async fn find_employee(&self, id: &str) -> StoreResult<Option<Employee>> {
        let sql = format!("SELECT {} FROM employees WHERE employee_id = ?", EMPLOYEE_COLUMNS);

        let row = sqlx::query_as::<_, EmployeeRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Employee::try_from).transpose()
    }

    async fn employee_ids_by_name(&self, name: &str) -> StoreResult<Vec<String>> {
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT employee_id FROM employees WHERE LOWER(name) LIKE ?",
        )
        .bind(like_pattern(name))
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn insert_employee(&self, employee: &Employee) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO employees
            (employee_id, name, email, position, department, hire_date, salary, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&employee.id)
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(&employee.position)
        .bind(&employee.department)
        .bind(employee.hire_date)
        .bind(employee.salary)
        .bind(employee.status.as_ref())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn replace_employee(&self, employee: &Employee) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET name = ?, email = ?, position = ?, department = ?,
                hire_date = ?, salary = ?, status = ?
            WHERE employee_id = ?
            "#,
        )
        .bind(&employee.name)
        .bind(&employee.email)
        .bind(&employee.position)
        .bind(&employee.department)
        .bind(employee.hire_date)
        .bind(employee.salary)
        .bind(employee.status.as_ref())
        .bind(&employee.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // MySQL reports 0 affected rows when every value was already equal.
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE employee_id = ? LIMIT 1)",
        )
        .bind(&employee.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn delete_employee(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE employee_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_attendance(&self, filter: &AttendanceFilter) -> StoreResult<u64> {
        self.count("attendance", &attendance_where(filter)).await
    }

    async fn find_attendance(
        &self,
        filter: &AttendanceFilter,
        window: Option<PageWindow>,
    ) -> StoreResult<Vec<Attendance>> {
        let clause = attendance_where(filter);
        let data_sql = format!(
            "SELECT {} FROM attendance {} ORDER BY attendance_date DESC, row_id DESC {}",
            ATTENDANCE_COLUMNS,
            clause.sql(),
            limit_sql(window)
        );
        debug!(sql = %data_sql, bindings = ?clause.values(), ?window, "Fetching attendance");

        let rows = bind_query_as(sqlx::query_as::<_, AttendanceRow>(&data_sql), clause.values())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Attendance::try_from).collect()
    }

    async fn upsert_attendance(&self, record: &Attendance) -> StoreResult<Attendance> {
        sqlx::query(
            r#"
            INSERT INTO attendance (attendance_id, employee_id, attendance_date, status)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE status = VALUES(status)
            "#,
        )
        .bind(&record.id)
        .bind(&record.employee_id)
        .bind(record.date)
        .bind(record.status.as_ref())
        .execute(&self.pool)
        .await?;

        let sql = format!(
            "SELECT {} FROM attendance WHERE employee_id = ? AND attendance_date = ?",
            ATTENDANCE_COLUMNS
        );
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(&record.employee_id)
            .bind(record.date)
            .fetch_one(&self.pool)
            .await?;

        Attendance::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;
    use crate::model::employee::EmployeeStatus;

    #[test]
    fn sequence_value_steps_back_one() {
        assert_eq!(previous_sequence(1, IdKind::Employee).unwrap(), 0);
        assert_eq!(previous_sequence(42, IdKind::Attendance).unwrap(), 41);
        assert!(matches!(
            previous_sequence(0, IdKind::Employee),
            Err(StoreError::Database(_))
        ));
    }

    #[test]
    fn employee_filter_builds_case_insensitive_like() {
        let clause = employee_where(&EmployeeFilter {
            name: Some("Ali".into()),
            status: Some(EmployeeStatus::OnLeave),
        });

        assert_eq!(clause.sql(), "WHERE LOWER(name) LIKE ? AND status = ?");
        assert_eq!(
            clause.values(),
            &[
                SqlValue::String("%ali%".into()),
                SqlValue::String("On Leave".into()),
            ]
        );
    }

    #[test]
    fn attendance_filter_orders_bindings_like_conditions() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let clause = attendance_where(&AttendanceFilter {
            employee_ids: Some(vec!["EMP-1001".into()]),
            status: Some(AttendanceStatus::Present),
            date: Some(date),
        });

        assert_eq!(
            clause.sql(),
            "WHERE employee_id IN (?) AND status = ? AND attendance_date = ?"
        );
        assert_eq!(
            clause.values(),
            &[
                SqlValue::String("EMP-1001".into()),
                SqlValue::String("Present".into()),
                SqlValue::Date(date),
            ]
        );
    }

    #[test]
    fn window_becomes_limit_offset() {
        assert_eq!(limit_sql(None), "");
        assert_eq!(
            limit_sql(Some(PageWindow { offset: 20, limit: 10 })),
            "LIMIT 10 OFFSET 20"
        );
    }
}
