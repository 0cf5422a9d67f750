// Work order statistics - counts per status and mean time to resolution
use super::calendar::parse_date_time;
use super::error::DomainError;
use super::work_order::{WorkOrderRecord, WorkOrderStatus};
use serde::Serialize;

/// Closing time assumed for completed orders that only carry a closing date
const DEFAULT_CLOSING_TIME: &str = "23:59";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkOrderStatistics {
    pub total: usize,
    pub open: usize,
    pub completed: usize,
    pub cancelled: usize,
    /// Hours from opening to closing, averaged over completed orders with a closing date
    pub mean_resolution_hours: f64,
}

pub fn summarize(records: &[WorkOrderRecord]) -> Result<WorkOrderStatistics, DomainError> {
    let count = |status: WorkOrderStatus| records.iter().filter(|r| r.details.status == status).count();

    let mut durations = Vec::new();
    for record in records {
        let d = &record.details;
        if d.status != WorkOrderStatus::Completed {
            continue;
        }
        let Some(closed_date) = d.closed_date.as_deref() else {
            continue;
        };

        let opened_at = parse_date_time(&d.opened_date, &d.opened_time)?;
        let closed_time = d.closed_time.as_deref().unwrap_or(DEFAULT_CLOSING_TIME);
        let closed_at = parse_date_time(closed_date, closed_time)?;

        durations.push((closed_at - opened_at).num_minutes() as f64 / 60.0);
    }

    let mean_resolution_hours = if durations.is_empty() {
        0.0
    } else {
        durations.iter().sum::<f64>() / durations.len() as f64
    };

    Ok(WorkOrderStatistics {
        total: records.len(),
        open: count(WorkOrderStatus::Open),
        completed: count(WorkOrderStatus::Completed),
        cancelled: count(WorkOrderStatus::Cancelled),
        mean_resolution_hours,
    })
}
