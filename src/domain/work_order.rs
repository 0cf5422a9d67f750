// Work order domain model - stored records and the parsed form used for availability
use super::calendar::{parse_date, parse_date_time, parse_time};
use super::error::DomainError;
use super::fleet::{new_record_id, VehicleClass};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkOrderStatus {
    #[serde(alias = "Aberta")]
    Open,
    #[serde(alias = "Concluída")]
    Completed,
    #[serde(alias = "Cancelada")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceType {
    #[serde(alias = "Preventiva")]
    Preventive,
    #[serde(alias = "Corretiva")]
    Corrective,
    #[serde(alias = "Pneu")]
    Tyre,
    #[serde(alias = "Elétrica")]
    Electrical,
    #[serde(alias = "SOS")]
    Sos,
    #[serde(alias = "TERMAC")]
    Termac,
    #[serde(alias = "ITR")]
    Itr,
    #[serde(alias = "STAND-BY")]
    StandBy,
    #[serde(alias = "MANUTENÇÃO EXTERNA")]
    External,
    #[serde(alias = "Outros")]
    Other,
}

impl MaintenanceType {
    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceType::Preventive => "preventive",
            MaintenanceType::Corrective => "corrective",
            MaintenanceType::Tyre => "tyre",
            MaintenanceType::Electrical => "electrical",
            MaintenanceType::Sos => "sos",
            MaintenanceType::Termac => "termac",
            MaintenanceType::Itr => "itr",
            MaintenanceType::StandBy => "stand_by",
            MaintenanceType::External => "external",
            MaintenanceType::Other => "other",
        }
    }
}

/// Work order fields supplied by a client, before an id is assigned.
///
/// Dates are `DD-MM-YYYY` and times `HH:MM`, the format existing records
/// are stored in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderDraft {
    pub vehicle_class: VehicleClass,
    pub vehicle_id: String,
    #[serde(default)]
    pub plate: String,
    #[serde(default)]
    pub driver_id: Option<String>,
    pub opened_date: String,
    pub opened_time: String,
    #[serde(default)]
    pub closed_date: Option<String>,
    #[serde(default)]
    pub closed_time: Option<String>,
    #[serde(default)]
    pub expected_release_date: Option<String>,
    #[serde(default)]
    pub expected_release_time: Option<String>,
    pub maintenance_type: MaintenanceType,
    #[serde(default)]
    pub description: String,
    pub status: WorkOrderStatus,
    #[serde(default)]
    pub is_stand_by: bool,
    #[serde(default)]
    pub origin_composition_id: Option<String>,
}

impl WorkOrderDraft {
    /// Free-text identifiers trimmed; dates and times are left to validation
    pub fn normalized(mut self) -> Self {
        self.vehicle_id = self.vehicle_id.trim().to_string();
        self.plate = self.plate.trim().to_string();
        self.description = self.description.trim().to_string();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderRecord {
    pub id: String,
    #[serde(flatten)]
    pub details: WorkOrderDraft,
    pub created_at: DateTime<Utc>,
}

impl WorkOrderRecord {
    pub fn from_draft(details: WorkOrderDraft) -> Self {
        Self {
            id: new_record_id(),
            details,
            created_at: Utc::now(),
        }
    }

    /// Parse the stored strings into the structured form.
    ///
    /// Every date and time that is present must parse. A closure only
    /// bounds the order when both its date and its time are present, but a
    /// closing date on its own still ends an open order.
    pub fn to_work_order(&self) -> Result<WorkOrder, DomainError> {
        let d = &self.details;
        let opened_at = parse_date_time(&d.opened_date, &d.opened_time)?;

        let closed_at = match (d.closed_date.as_deref(), d.closed_time.as_deref()) {
            (Some(date), Some(time)) => Some(parse_date_time(date, time)?),
            (Some(date), None) => {
                parse_date(date)?;
                None
            }
            (None, Some(time)) => {
                parse_time(time)?;
                None
            }
            (None, None) => None,
        };

        Ok(WorkOrder {
            vehicle_class: d.vehicle_class,
            status: d.status,
            opened_at,
            closed_at,
            closure_recorded: d.closed_date.is_some(),
        })
    }
}

/// The parts of a work order that decide whether it makes a vehicle unavailable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkOrder {
    pub vehicle_class: VehicleClass,
    pub status: WorkOrderStatus,
    pub opened_at: NaiveDateTime,
    pub closed_at: Option<NaiveDateTime>,
    /// A closing date was stored, with or without a time
    pub closure_recorded: bool,
}

impl WorkOrder {
    pub fn open(vehicle_class: VehicleClass, opened_at: NaiveDateTime) -> Self {
        Self {
            vehicle_class,
            status: WorkOrderStatus::Open,
            opened_at,
            closed_at: None,
            closure_recorded: false,
        }
    }

    pub fn completed(
        vehicle_class: VehicleClass,
        opened_at: NaiveDateTime,
        closed_at: NaiveDateTime,
    ) -> Self {
        Self {
            vehicle_class,
            status: WorkOrderStatus::Completed,
            opened_at,
            closed_at: Some(closed_at),
            closure_recorded: true,
        }
    }

    pub fn cancelled(vehicle_class: VehicleClass, opened_at: NaiveDateTime) -> Self {
        Self {
            vehicle_class,
            status: WorkOrderStatus::Cancelled,
            opened_at,
            closed_at: None,
            closure_recorded: false,
        }
    }

    /// Whether this order keeps its vehicle out of service at `moment`.
    ///
    /// Open orders cover everything from opening onwards; completed orders
    /// cover their window with both ends included. Cancelled orders, and
    /// open orders that carry any closing date, never cover.
    pub fn covers(&self, moment: NaiveDateTime) -> bool {
        match (self.status, self.closed_at) {
            (WorkOrderStatus::Open, None) if !self.closure_recorded => moment >= self.opened_at,
            (WorkOrderStatus::Completed, Some(closed_at)) => {
                self.opened_at <= moment && moment <= closed_at
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn draft(status: WorkOrderStatus) -> WorkOrderDraft {
        WorkOrderDraft {
            vehicle_class: VehicleClass::Unit,
            vehicle_id: "tractor-1".to_string(),
            plate: "ABC1D23".to_string(),
            driver_id: None,
            opened_date: "01-01-2024".to_string(),
            opened_time: "09:00".to_string(),
            closed_date: None,
            closed_time: None,
            expected_release_date: None,
            expected_release_time: None,
            maintenance_type: MaintenanceType::Corrective,
            description: "brake pads".to_string(),
            status,
            is_stand_by: false,
            origin_composition_id: None,
        }
    }

    #[test]
    fn test_to_work_order_parses_closure() {
        let mut details = draft(WorkOrderStatus::Completed);
        details.closed_date = Some("01-01-2024".to_string());
        details.closed_time = Some("11:00".to_string());

        let order = WorkOrderRecord::from_draft(details).to_work_order().unwrap();
        assert_eq!(order.opened_at, at(1, 9, 0));
        assert_eq!(order.closed_at, Some(at(1, 11, 0)));
    }

    #[test]
    fn test_closing_date_without_time_ends_open_order() {
        let mut details = draft(WorkOrderStatus::Open);
        details.closed_date = Some("02-01-2024".to_string());

        let order = WorkOrderRecord::from_draft(details).to_work_order().unwrap();
        assert_eq!(order.closed_at, None);
        assert!(order.closure_recorded);
        assert!(!order.covers(at(1, 12, 0)));
        assert!(!order.covers(at(3, 12, 0)));
    }

    #[test]
    fn test_closing_time_without_date_keeps_order_open() {
        let mut details = draft(WorkOrderStatus::Open);
        details.closed_time = Some("11:00".to_string());

        let order = WorkOrderRecord::from_draft(details).to_work_order().unwrap();
        assert!(!order.closure_recorded);
        assert!(order.covers(at(1, 12, 0)));
    }

    #[test]
    fn test_malformed_dates_fail() {
        let mut details = draft(WorkOrderStatus::Open);
        details.opened_date = "2024-01-01".to_string();
        assert_eq!(
            WorkOrderRecord::from_draft(details).to_work_order(),
            Err(DomainError::InvalidDate("2024-01-01".to_string()))
        );

        let mut details = draft(WorkOrderStatus::Open);
        details.closed_time = Some("25:00".to_string());
        assert_eq!(
            WorkOrderRecord::from_draft(details).to_work_order(),
            Err(DomainError::InvalidTime("25:00".to_string()))
        );
    }

    #[test]
    fn test_covers_completed_window_inclusive() {
        let order = WorkOrder::completed(VehicleClass::Unit, at(1, 8, 0), at(1, 10, 0));
        assert!(!order.covers(at(1, 7, 0)));
        assert!(order.covers(at(1, 8, 0)));
        assert!(order.covers(at(1, 10, 0)));
        assert!(!order.covers(at(1, 11, 0)));
    }

    #[test]
    fn test_covers_open_order_forever() {
        let order = WorkOrder::open(VehicleClass::Unit, at(1, 8, 30));
        assert!(!order.covers(at(1, 8, 0)));
        assert!(order.covers(at(1, 9, 0)));
        assert!(order.covers(at(31, 23, 0)));
    }

    #[test]
    fn test_cancelled_and_inconsistent_orders_never_cover() {
        assert!(!WorkOrder::cancelled(VehicleClass::Unit, at(1, 0, 0)).covers(at(1, 12, 0)));

        let open_with_closure = WorkOrder {
            closed_at: Some(at(2, 0, 0)),
            closure_recorded: true,
            ..WorkOrder::open(VehicleClass::Unit, at(1, 0, 0))
        };
        assert!(!open_with_closure.covers(at(1, 12, 0)));

        let completed_without_closure = WorkOrder {
            status: WorkOrderStatus::Completed,
            ..WorkOrder::open(VehicleClass::Unit, at(1, 0, 0))
        };
        assert!(!completed_without_closure.covers(at(1, 12, 0)));
    }

    #[test]
    fn test_record_deserializes_legacy_labels() {
        let json = r#"{
            "id": "os-1",
            "vehicle_class": "frota",
            "vehicle_id": "c-1",
            "opened_date": "01-01-2024",
            "opened_time": "09:00",
            "maintenance_type": "Elétrica",
            "status": "Concluída",
            "created_at": "2024-01-01T09:00:00Z"
        }"#;

        let record: WorkOrderRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.details.vehicle_class, VehicleClass::Unit);
        assert_eq!(record.details.status, WorkOrderStatus::Completed);
        assert_eq!(record.details.maintenance_type, MaintenanceType::Electrical);
    }
}
