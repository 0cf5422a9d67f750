// Whole-store backup - export and restore of every fleet collection
use super::error::DomainError;
use super::fleet::{Composition, Driver, Tractor};
use super::work_order::WorkOrderRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every stored collection, kept as one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    #[serde(default)]
    pub tractors: Vec<Tractor>,
    #[serde(default)]
    pub compositions: Vec<Composition>,
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub work_orders: Vec<WorkOrderRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetExport {
    #[serde(flatten)]
    pub snapshot: FleetSnapshot,
    pub exported_at: DateTime<Utc>,
}

impl FleetExport {
    pub fn new(snapshot: FleetSnapshot) -> Self {
        Self {
            snapshot,
            exported_at: Utc::now(),
        }
    }
}

/// A backup to restore. Collections left out keep their current contents;
/// collections present replace them wholesale. Unknown fields such as
/// `exported_at` are ignored, so an export can be fed back unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FleetImport {
    pub tractors: Option<Vec<Tractor>>,
    pub compositions: Option<Vec<Composition>>,
    pub drivers: Option<Vec<Driver>>,
    pub work_orders: Option<Vec<WorkOrderRecord>>,
}

impl FleetImport {
    /// Every imported work order must parse, so a restore can never leave
    /// the store in a state the availability report rejects.
    pub fn check(&self) -> Result<(), DomainError> {
        for record in self.work_orders.iter().flatten() {
            record.to_work_order()?;
        }
        Ok(())
    }

    pub fn apply_to(self, snapshot: &mut FleetSnapshot) {
        if let Some(tractors) = self.tractors {
            snapshot.tractors = tractors;
        }
        if let Some(compositions) = self.compositions {
            snapshot.compositions = compositions;
        }
        if let Some(drivers) = self.drivers {
            snapshot.drivers = drivers;
        }
        if let Some(work_orders) = self.work_orders {
            snapshot.work_orders = work_orders;
        }
    }
}
