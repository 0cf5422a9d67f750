// Work order listing - filters, free-text search and display order
use super::calendar::parse_date_time;
use super::fleet::VehicleClass;
use super::work_order::{MaintenanceType, WorkOrderRecord, WorkOrderStatus};
use serde::Deserialize;
use std::cmp::Reverse;

/// Criteria for listing work orders. Absent fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WorkOrderQuery {
    pub status: Option<WorkOrderStatus>,
    pub maintenance_type: Option<MaintenanceType>,
    pub class: Option<VehicleClass>,
    pub vehicle_id: Option<String>,
    /// Case-insensitive search over id, description, plate, maintenance
    /// type and the vehicle's label
    pub q: Option<String>,
}

impl WorkOrderQuery {
    /// `vehicle_label` is the fleet name or composition identifier of the
    /// order's vehicle, empty when the vehicle is unknown.
    pub fn matches(&self, record: &WorkOrderRecord, vehicle_label: &str) -> bool {
        let d = &record.details;

        if self.status.is_some_and(|status| d.status != status) {
            return false;
        }
        if self.maintenance_type.is_some_and(|kind| d.maintenance_type != kind) {
            return false;
        }
        if self.class.is_some_and(|class| d.vehicle_class != class) {
            return false;
        }
        if self.vehicle_id.as_deref().is_some_and(|id| d.vehicle_id != id) {
            return false;
        }

        match self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => {
                let needle = q.to_lowercase();
                [
                    record.id.as_str(),
                    d.description.as_str(),
                    d.plate.as_str(),
                    d.maintenance_type.label(),
                    vehicle_label,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}

/// Completed orders last; otherwise the most recently opened first.
/// Orders whose opening does not parse go to the end of their group.
pub fn sort_for_listing(records: &mut [WorkOrderRecord]) {
    records.sort_by_cached_key(|r| {
        let opened_at = parse_date_time(&r.details.opened_date, &r.details.opened_time).ok();
        (r.details.status == WorkOrderStatus::Completed, Reverse(opened_at))
    });
}
