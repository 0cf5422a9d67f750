// Availability analysis - a day's report checked against an availability goal
use super::availability::AvailabilityReport;
use super::calendar::format_date;
use super::fleet::VehicleClass;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailabilityAnalysis {
    /// `DD-MM-YYYY`
    pub date: String,
    pub vehicle_class: VehicleClass,
    pub goal_percent: f64,
    pub goal_met: bool,
    pub report: AvailabilityReport,
}

impl AvailabilityAnalysis {
    pub fn new(
        date: NaiveDate,
        vehicle_class: VehicleClass,
        goal_percent: f64,
        report: AvailabilityReport,
    ) -> Self {
        Self {
            date: format_date(date),
            vehicle_class,
            goal_percent,
            goal_met: report.mean_availability_percent >= goal_percent,
            report,
        }
    }
}
