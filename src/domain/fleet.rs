// Fleet domain model - tractors, compositions and drivers
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which fleet a record or work order belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    #[serde(alias = "frota")]
    Unit,
    #[serde(alias = "composicao")]
    Composition,
}

impl VehicleClass {
    pub fn label(&self) -> &'static str {
        match self {
            VehicleClass::Unit => "unit",
            VehicleClass::Composition => "composition",
        }
    }
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single mechanical tractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tractor {
    pub id: String,
    pub fleet_name: String,
    pub plate: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TractorDraft {
    pub fleet_name: String,
    pub plate: String,
}

impl TractorDraft {
    /// Surrounding whitespace removed from every field
    pub fn normalized(self) -> Self {
        Self {
            fleet_name: self.fleet_name.trim().to_string(),
            plate: self.plate.trim().to_string(),
        }
    }
}

impl Tractor {
    /// Same plate or fleet name, ignoring case
    pub fn clashes_with(&self, draft: &TractorDraft) -> bool {
        self.plate.eq_ignore_ascii_case(&draft.plate)
            || self.fleet_name.eq_ignore_ascii_case(&draft.fleet_name)
    }

    pub fn from_draft(draft: TractorDraft) -> Self {
        Self {
            id: new_record_id(),
            fleet_name: draft.fleet_name,
            plate: draft.plate,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, draft: TractorDraft) {
        self.fleet_name = draft.fleet_name;
        self.plate = draft.plate;
    }
}

/// A coupled set of trailers tracked as one unit of availability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub id: String,
    pub identifier: String,
    pub plates: Vec<String>,
    pub first_trailer: String,
    pub second_trailer: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionDraft {
    pub identifier: String,
    pub plates: Vec<String>,
    pub first_trailer: String,
    pub second_trailer: String,
}

impl CompositionDraft {
    pub fn normalized(self) -> Self {
        Self {
            identifier: self.identifier.trim().to_string(),
            plates: self.plates.iter().map(|p| p.trim().to_string()).collect(),
            first_trailer: self.first_trailer.trim().to_string(),
            second_trailer: self.second_trailer.trim().to_string(),
        }
    }
}

impl Composition {
    pub fn clashes_with(&self, draft: &CompositionDraft) -> bool {
        self.identifier.eq_ignore_ascii_case(&draft.identifier)
    }

    pub fn from_draft(draft: CompositionDraft) -> Self {
        Self {
            id: new_record_id(),
            identifier: draft.identifier,
            plates: draft.plates,
            first_trailer: draft.first_trailer,
            second_trailer: draft.second_trailer,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, draft: CompositionDraft) {
        self.identifier = draft.identifier;
        self.plates = draft.plates;
        self.first_trailer = draft.first_trailer;
        self.second_trailer = draft.second_trailer;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverDraft {
    pub name: String,
}

impl DriverDraft {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
        }
    }
}

impl Driver {
    pub fn clashes_with(&self, draft: &DriverDraft) -> bool {
        self.name.to_lowercase() == draft.name.to_lowercase()
    }

    pub fn from_draft(draft: DriverDraft) -> Self {
        Self {
            id: new_record_id(),
            name: draft.name,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, draft: DriverDraft) {
        self.name = draft.name;
    }
}

pub(crate) fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
