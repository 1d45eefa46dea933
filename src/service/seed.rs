use chrono::{Days, NaiveDate};
use tracing::info;

use super::QueryService;
use crate::error::ServiceResult;
use crate::model::attendance::{AttendanceMark, AttendanceStatus};
use crate::model::employee::{EmployeeFields, EmployeeStatus};

const FIRST_NAMES: [&str; 10] = [
    "Alice", "Bob", "Charlie", "Diana", "Ethan", "Fiona", "George", "Hannah", "Ian", "Julia",
];
const LAST_NAMES: [&str; 10] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez",
];
const POSITIONS: [&str; 6] = [
    "Software Engineer",
    "Product Manager",
    "UX Designer",
    "Data Scientist",
    "Marketing Specialist",
    "HR Manager",
];
const DEPARTMENTS: [&str; 6] = [
    "Engineering",
    "Product",
    "Design",
    "Data",
    "Marketing",
    "Human Resources",
];
const STATUSES: [EmployeeStatus; 3] = [
    EmployeeStatus::Active,
    EmployeeStatus::OnLeave,
    EmployeeStatus::Terminated,
];
const ATTENDANCE_DAYS: u64 = 30;

fn demo_employee(i: usize, today: NaiveDate) -> EmployeeFields {
    let first = FIRST_NAMES[i % FIRST_NAMES.len()];
    let last = LAST_NAMES[(i / FIRST_NAMES.len()) % LAST_NAMES.len()];
    let round = i / (FIRST_NAMES.len() * LAST_NAMES.len());
    let email = if round == 0 {
        format!("{}.{}@corp.com", first, last).to_lowercase()
    } else {
        format!("{}.{}{}@corp.com", first, last, round).to_lowercase()
    };

    // Hired within the last five years.
    let days_ago = (i as u64 * 37) % 1825;

    EmployeeFields {
        name: format!("{} {}", first, last),
        email,
        position: POSITIONS[i % POSITIONS.len()].to_string(),
        department: DEPARTMENTS[i % DEPARTMENTS.len()].to_string(),
        hire_date: today.checked_sub_days(Days::new(days_ago)).unwrap_or(today),
        salary: 50_000.0 + ((i as u64 * 7_919) % 100_000) as f64,
        status: STATUSES[i % STATUSES.len()],
    }
}

/// Roughly 70% present, 10% late, 10% absent, 10% no record.
fn demo_status(day: u64, employee: usize) -> Option<AttendanceStatus> {
    match (day as usize * 7 + employee * 3) % 10 {
        0..=6 => Some(AttendanceStatus::Present),
        7 => Some(AttendanceStatus::Late),
        8 => Some(AttendanceStatus::Absent),
        _ => None,
    }
}

/// Fills an empty store with `employees` demo employees and the last 30 days
/// of attendance. Does nothing if any employee already exists.
pub async fn seed_if_empty(
    service: &QueryService,
    employees: usize,
    today: NaiveDate,
) -> ServiceResult<()> {
    if !service.all_employees().await?.is_empty() {
        info!("Store already has employees, skipping demo seed");
        return Ok(());
    }

    let mut ids = Vec::with_capacity(employees);
    for i in 0..employees {
        let employee = service.create_employee(demo_employee(i, today)).await?;
        ids.push(employee.id);
    }

    let mut marks = 0usize;
    for day in 0..ATTENDANCE_DAYS {
        let Some(date) = today.checked_sub_days(Days::new(day)) else {
            break;
        };
        for (j, employee_id) in ids.iter().enumerate() {
            if let Some(status) = demo_status(day, j) {
                service
                    .mark_attendance(AttendanceMark {
                        employee_id: employee_id.clone(),
                        date,
                        status,
                    })
                    .await?;
                marks += 1;
            }
        }
    }

    info!(employees, attendance = marks, "Demo data seeded");
    Ok(())
}
