use sqlx::MySqlPool;
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        row_id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        employee_id VARCHAR(32) NOT NULL,
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL,
        position VARCHAR(255) NOT NULL,
        department VARCHAR(255) NOT NULL,
        hire_date DATE NOT NULL,
        salary DOUBLE NOT NULL,
        status VARCHAR(16) NOT NULL DEFAULT 'Active',
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
        UNIQUE KEY uq_employees_employee_id (employee_id),
        UNIQUE KEY uq_employees_email (email),
        KEY idx_employees_name_status (name, status)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        row_id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        attendance_id VARCHAR(32) NOT NULL,
        employee_id VARCHAR(32) NOT NULL,
        attendance_date DATE NOT NULL,
        status VARCHAR(16) NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
        UNIQUE KEY uq_attendance_attendance_id (attendance_id),
        UNIQUE KEY uq_attendance_employee_date (employee_id, attendance_date),
        KEY idx_attendance_date_status (attendance_date, status)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS id_sequences (
        name VARCHAR(32) NOT NULL PRIMARY KEY,
        value BIGINT UNSIGNED NOT NULL
    )
    "#,
    "INSERT IGNORE INTO id_sequences (name, value) VALUES ('employee', 0), ('attendance', 0)",
];

pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    MySqlPool::connect(database_url).await
}

/// Creates the tables and counter rows if they are missing. Safe to run on
/// every start.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_key_compares_exact_bytes() {
        let employees = SCHEMA[0];
        assert!(employees.contains("email VARCHAR(255) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL"));
        assert!(employees.contains("UNIQUE KEY uq_employees_email (email)"));
    }
}
