use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use super::QueryService;
use crate::error::ServiceResult;
use crate::model::attendance::{Attendance, AttendanceStatus};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusCounts {
    #[schema(example = 3)]
    pub present: u64,
    #[schema(example = 1)]
    pub absent: u64,
    #[schema(example = 1)]
    pub late: u64,
}

impl StatusCounts {
    fn record(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Late => self.late += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    #[schema(example = "2026-01-15", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "2026-01")]
    pub month: String,
    pub today: StatusCounts,
    pub this_month: StatusCounts,
}

/// Counts statuses for `today` and for the calendar month containing it.
pub fn summarize(records: &[Attendance], today: NaiveDate) -> AttendanceSummary {
    let mut summary = AttendanceSummary {
        date: today,
        month: today.format("%Y-%m").to_string(),
        today: StatusCounts::default(),
        this_month: StatusCounts::default(),
    };

    for record in records {
        if record.date.year() != today.year() || record.date.month() != today.month() {
            continue;
        }
        summary.this_month.record(record.status);
        if record.date == today {
            summary.today.record(record.status);
        }
    }

    summary
}

impl QueryService {
    pub async fn attendance_summary(&self, today: NaiveDate) -> ServiceResult<AttendanceSummary> {
        let records = self.all_attendance().await?;
        Ok(summarize(&records, today))
    }
}
