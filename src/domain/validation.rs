// Record validation - field rules applied before anything is stored
use super::calendar::{parse_date, parse_date_time, parse_time};
use super::error::DomainError;
use super::fleet::{CompositionDraft, DriverDraft, TractorDraft};
use super::work_order::{WorkOrderDraft, WorkOrderStatus};

const MIN_PLATE_LEN: usize = 3;
const MIN_DRIVER_NAME_LEN: usize = 2;

pub fn validate_tractor(draft: &TractorDraft) -> Result<(), DomainError> {
    let plate = draft.plate.trim();
    if plate.is_empty() {
        return Err(DomainError::validation("plate is required"));
    }
    if plate.chars().count() < MIN_PLATE_LEN {
        return Err(DomainError::validation(format!(
            "plate must have at least {MIN_PLATE_LEN} characters"
        )));
    }
    if draft.fleet_name.trim().is_empty() {
        return Err(DomainError::validation("fleet name is required"));
    }
    Ok(())
}

pub fn validate_composition(draft: &CompositionDraft) -> Result<(), DomainError> {
    if draft.identifier.trim().is_empty() {
        return Err(DomainError::validation("identifier is required"));
    }
    if draft.plates.is_empty() {
        return Err(DomainError::validation("at least one plate is required"));
    }
    if draft.plates.iter().any(|plate| plate.trim().is_empty()) {
        return Err(DomainError::validation("plates must not be blank"));
    }
    if draft.first_trailer.trim().is_empty() {
        return Err(DomainError::validation("first trailer is required"));
    }
    if draft.second_trailer.trim().is_empty() {
        return Err(DomainError::validation("second trailer is required"));
    }
    Ok(())
}

pub fn validate_driver(draft: &DriverDraft) -> Result<(), DomainError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name is required"));
    }
    if name.chars().count() < MIN_DRIVER_NAME_LEN {
        return Err(DomainError::validation(format!(
            "name must have at least {MIN_DRIVER_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Checks field formats and the ordering of opening and closing.
/// A closing date and time are given together or not at all, and a
/// completed order must carry them.
pub fn validate_work_order(draft: &WorkOrderDraft) -> Result<(), DomainError> {
    if draft.vehicle_id.trim().is_empty() {
        return Err(DomainError::validation("vehicle is required"));
    }

    let opened_at = parse_date_time(&draft.opened_date, &draft.opened_time)?;

    if let Some(date) = draft.closed_date.as_deref() {
        parse_date(date)?;
    }
    if let Some(time) = draft.closed_time.as_deref() {
        parse_time(time)?;
    }
    if let Some(date) = draft.expected_release_date.as_deref() {
        parse_date(date)?;
    }
    if let Some(time) = draft.expected_release_time.as_deref() {
        parse_time(time)?;
    }

    match (draft.closed_date.as_deref(), draft.closed_time.as_deref()) {
        (Some(date), Some(time)) => {
            if parse_date_time(date, time)? <= opened_at {
                return Err(DomainError::validation(
                    "closing date and time must be after the opening",
                ));
            }
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(DomainError::validation(
                "closing date and time must be given together",
            ));
        }
        _ if draft.status == WorkOrderStatus::Completed => {
            return Err(DomainError::validation(
                "a completed work order needs a closing date and time",
            ));
        }
        _ => {}
    }

    Ok(())
}
