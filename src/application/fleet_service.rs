// Fleet service - Use cases for maintaining tractors, compositions, drivers and work orders
use crate::application::error::{ServiceError, ServiceResult};
use crate::application::fleet_repository::FleetRepository;
use crate::domain::backup::{FleetExport, FleetImport};
use crate::domain::fleet::{
    Composition, CompositionDraft, Driver, DriverDraft, Tractor, TractorDraft, VehicleClass,
};
use crate::domain::statistics::{summarize, WorkOrderStatistics};
use crate::domain::validation::{
    validate_composition, validate_driver, validate_tractor, validate_work_order,
};
use crate::domain::work_order::{WorkOrderDraft, WorkOrderRecord, WorkOrderStatus};
use crate::domain::work_order_query::{sort_for_listing, WorkOrderQuery};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Outcome of a plain-text bulk import
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub errors: Vec<String>,
}

impl ImportSummary {
    fn record<T>(&mut self, line: &str, result: ServiceResult<T>) {
        match result {
            Ok(_) => self.imported += 1,
            Err(e) => self.errors.push(format!("line \"{line}\": {e}")),
        }
    }
}

/// Writes are serialized through `write_lock` so that a uniqueness check
/// and the save it guards see the same store.
#[derive(Clone)]
pub struct FleetService {
    repository: Arc<dyn FleetRepository>,
    write_lock: Arc<Mutex<()>>,
}

impl FleetService {
    pub fn new(repository: Arc<dyn FleetRepository>) -> Self {
        Self {
            repository,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    // Tractors

    pub async fn list_tractors(&self) -> ServiceResult<Vec<Tractor>> {
        Ok(self.repository.list_tractors().await?)
    }

    pub async fn add_tractor(&self, draft: TractorDraft) -> ServiceResult<Tractor> {
        let draft = draft.normalized();
        validate_tractor(&draft)?;

        let _guard = self.write_lock.lock().await;
        let tractors = self.repository.list_tractors().await?;
        if tractors.iter().any(|t| t.clashes_with(&draft)) {
            return Err(ServiceError::Conflict(
                "a tractor with this plate or fleet name already exists".to_string(),
            ));
        }

        let tractor = Tractor::from_draft(draft);
        self.repository.save_tractor(tractor.clone()).await?;
        tracing::info!("Added tractor {} ({})", tractor.fleet_name, tractor.id);
        Ok(tractor)
    }

    pub async fn update_tractor(&self, id: &str, draft: TractorDraft) -> ServiceResult<Tractor> {
        let draft = draft.normalized();
        validate_tractor(&draft)?;

        let _guard = self.write_lock.lock().await;
        let tractors = self.repository.list_tractors().await?;
        if tractors.iter().any(|t| t.id != id && t.clashes_with(&draft)) {
            return Err(ServiceError::Conflict(
                "a tractor with this plate or fleet name already exists".to_string(),
            ));
        }
        let mut tractor = tractors
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("tractor {id}")))?;

        tractor.apply(draft);
        self.repository.save_tractor(tractor.clone()).await?;
        Ok(tractor)
    }

    pub async fn delete_tractor(&self, id: &str) -> ServiceResult<()> {
        let _guard = self.write_lock.lock().await;
        if !self.repository.delete_tractor(id).await? {
            return Err(ServiceError::NotFound(format!("tractor {id}")));
        }
        tracing::info!("Deleted tractor {}", id);
        Ok(())
    }

    /// One `FLEET_NAME PLATE` pair per line
    pub async fn import_tractors(&self, text: &str) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for line in non_blank_lines(text) {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 2 {
                summary.errors.push(format!("invalid line: {line}"));
                continue;
            }

            let draft = TractorDraft {
                fleet_name: parts[0].to_string(),
                plate: parts[1].to_string(),
            };
            summary.record(line, self.add_tractor(draft).await);
        }

        tracing::info!(
            "Imported {} tractors ({} errors)",
            summary.imported,
            summary.errors.len()
        );
        summary
    }

    // Compositions

    pub async fn list_compositions(&self) -> ServiceResult<Vec<Composition>> {
        Ok(self.repository.list_compositions().await?)
    }

    pub async fn add_composition(&self, draft: CompositionDraft) -> ServiceResult<Composition> {
        let draft = draft.normalized();
        validate_composition(&draft)?;

        let _guard = self.write_lock.lock().await;
        let compositions = self.repository.list_compositions().await?;
        if compositions.iter().any(|c| c.clashes_with(&draft)) {
            return Err(ServiceError::Conflict(
                "a composition with this identifier already exists".to_string(),
            ));
        }

        let composition = Composition::from_draft(draft);
        self.repository.save_composition(composition.clone()).await?;
        tracing::info!("Added composition {} ({})", composition.identifier, composition.id);
        Ok(composition)
    }

    pub async fn update_composition(
        &self,
        id: &str,
        draft: CompositionDraft,
    ) -> ServiceResult<Composition> {
        let draft = draft.normalized();
        validate_composition(&draft)?;

        let _guard = self.write_lock.lock().await;
        let compositions = self.repository.list_compositions().await?;
        if compositions.iter().any(|c| c.id != id && c.clashes_with(&draft)) {
            return Err(ServiceError::Conflict(
                "a composition with this identifier already exists".to_string(),
            ));
        }
        let mut composition = compositions
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("composition {id}")))?;

        composition.apply(draft);
        self.repository.save_composition(composition.clone()).await?;
        Ok(composition)
    }

    pub async fn delete_composition(&self, id: &str) -> ServiceResult<()> {
        let _guard = self.write_lock.lock().await;
        if !self.repository.delete_composition(id).await? {
            return Err(ServiceError::NotFound(format!("composition {id}")));
        }
        tracing::info!("Deleted composition {}", id);
        Ok(())
    }

    /// `IDENTIFIER FIRST SECOND [MORE...]` per line; every token after the
    /// identifier is one of the composition's plates
    pub async fn import_compositions(&self, text: &str) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for line in non_blank_lines(text) {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 3 {
                summary.errors.push(format!("invalid line: {line}"));
                continue;
            }

            let draft = CompositionDraft {
                identifier: parts[0].to_string(),
                plates: parts[1..].iter().map(|p| p.to_string()).collect(),
                first_trailer: parts[1].to_string(),
                second_trailer: parts[2].to_string(),
            };
            summary.record(line, self.add_composition(draft).await);
        }

        tracing::info!(
            "Imported {} compositions ({} errors)",
            summary.imported,
            summary.errors.len()
        );
        summary
    }

    // Drivers

    pub async fn list_drivers(&self) -> ServiceResult<Vec<Driver>> {
        Ok(self.repository.list_drivers().await?)
    }

    pub async fn add_driver(&self, draft: DriverDraft) -> ServiceResult<Driver> {
        let draft = draft.normalized();
        validate_driver(&draft)?;

        let _guard = self.write_lock.lock().await;
        let drivers = self.repository.list_drivers().await?;
        if drivers.iter().any(|d| d.clashes_with(&draft)) {
            return Err(ServiceError::Conflict(
                "a driver with this name already exists".to_string(),
            ));
        }

        let driver = Driver::from_draft(draft);
        self.repository.save_driver(driver.clone()).await?;
        tracing::info!("Added driver {}", driver.id);
        Ok(driver)
    }

    pub async fn update_driver(&self, id: &str, draft: DriverDraft) -> ServiceResult<Driver> {
        let draft = draft.normalized();
        validate_driver(&draft)?;

        let _guard = self.write_lock.lock().await;
        let drivers = self.repository.list_drivers().await?;
        if drivers.iter().any(|d| d.id != id && d.clashes_with(&draft)) {
            return Err(ServiceError::Conflict(
                "a driver with this name already exists".to_string(),
            ));
        }
        let mut driver = drivers
            .into_iter()
            .find(|d| d.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("driver {id}")))?;

        driver.apply(draft);
        self.repository.save_driver(driver.clone()).await?;
        Ok(driver)
    }

    pub async fn delete_driver(&self, id: &str) -> ServiceResult<()> {
        let _guard = self.write_lock.lock().await;
        if !self.repository.delete_driver(id).await? {
            return Err(ServiceError::NotFound(format!("driver {id}")));
        }
        tracing::info!("Deleted driver {}", id);
        Ok(())
    }

    /// One driver name per line
    pub async fn import_drivers(&self, text: &str) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for line in non_blank_lines(text) {
            let draft = DriverDraft {
                name: line.to_string(),
            };
            summary.record(line, self.add_driver(draft).await);
        }

        tracing::info!(
            "Imported {} drivers ({} errors)",
            summary.imported,
            summary.errors.len()
        );
        summary
    }

    // Work orders

    /// Orders matching `query`, completed ones last and otherwise the most
    /// recently opened first
    pub async fn list_work_orders(
        &self,
        query: &WorkOrderQuery,
    ) -> ServiceResult<Vec<WorkOrderRecord>> {
        let snapshot = self.repository.snapshot().await?;

        let mut labels: HashMap<(VehicleClass, &str), &str> = HashMap::new();
        for t in &snapshot.tractors {
            labels.insert((VehicleClass::Unit, t.id.as_str()), t.fleet_name.as_str());
        }
        for c in &snapshot.compositions {
            labels.insert((VehicleClass::Composition, c.id.as_str()), c.identifier.as_str());
        }

        let mut records: Vec<WorkOrderRecord> = snapshot
            .work_orders
            .iter()
            .filter(|r| {
                let key = (r.details.vehicle_class, r.details.vehicle_id.as_str());
                query.matches(r, labels.get(&key).copied().unwrap_or(""))
            })
            .cloned()
            .collect();
        sort_for_listing(&mut records);

        tracing::debug!("Listed {} of {} work orders", records.len(), snapshot.work_orders.len());
        Ok(records)
    }

    /// Every order recorded against one vehicle
    pub async fn work_orders_for_vehicle(
        &self,
        vehicle_class: VehicleClass,
        vehicle_id: &str,
    ) -> ServiceResult<Vec<WorkOrderRecord>> {
        let query = WorkOrderQuery {
            class: Some(vehicle_class),
            vehicle_id: Some(vehicle_id.to_string()),
            ..Default::default()
        };
        self.list_work_orders(&query).await
    }

    pub async fn add_work_order(&self, draft: WorkOrderDraft) -> ServiceResult<WorkOrderRecord> {
        let draft = draft.normalized();
        validate_work_order(&draft)?;

        let _guard = self.write_lock.lock().await;
        let work_orders = self.repository.list_work_orders().await?;
        if has_open_order(&work_orders, &draft.vehicle_id, draft.vehicle_class) {
            return Err(ServiceError::Conflict(
                "this vehicle already has an open work order".to_string(),
            ));
        }

        let record = WorkOrderRecord::from_draft(draft);
        self.repository.save_work_order(record.clone()).await?;
        tracing::info!(
            "Opened work order {} for {} {}",
            record.id,
            record.details.vehicle_class,
            record.details.vehicle_id
        );
        Ok(record)
    }

    pub async fn update_work_order(
        &self,
        id: &str,
        draft: WorkOrderDraft,
    ) -> ServiceResult<WorkOrderRecord> {
        let draft = draft.normalized();
        validate_work_order(&draft)?;

        let _guard = self.write_lock.lock().await;
        let mut record = self
            .repository
            .list_work_orders()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("work order {id}")))?;

        record.details = draft;
        self.repository.save_work_order(record.clone()).await?;
        tracing::debug!("Updated work order {} ({:?})", record.id, record.details.status);
        Ok(record)
    }

    pub async fn delete_work_order(&self, id: &str) -> ServiceResult<()> {
        let _guard = self.write_lock.lock().await;
        if !self.repository.delete_work_order(id).await? {
            return Err(ServiceError::NotFound(format!("work order {id}")));
        }
        tracing::info!("Deleted work order {}", id);
        Ok(())
    }

    pub async fn work_order_statistics(&self) -> ServiceResult<WorkOrderStatistics> {
        let records = self.repository.list_work_orders().await?;
        Ok(summarize(&records)?)
    }

    // Backup

    pub async fn export_data(&self) -> ServiceResult<FleetExport> {
        let snapshot = self.repository.snapshot().await?;
        tracing::info!(
            "Exported fleet ({} tractors, {} compositions, {} drivers, {} work orders)",
            snapshot.tractors.len(),
            snapshot.compositions.len(),
            snapshot.drivers.len(),
            snapshot.work_orders.len()
        );
        Ok(FleetExport::new(snapshot))
    }

    /// Restore a backup; collections missing from it are left as they are
    pub async fn import_data(&self, import: FleetImport) -> ServiceResult<()> {
        import.check()?;

        let _guard = self.write_lock.lock().await;
        let mut snapshot = self.repository.snapshot().await?;
        import.apply_to(&mut snapshot);
        self.repository.replace_all(snapshot).await?;
        Ok(())
    }
}

fn has_open_order(records: &[WorkOrderRecord], vehicle_id: &str, class: VehicleClass) -> bool {
    records.iter().any(|r| {
        r.details.status == WorkOrderStatus::Open
            && r.details.vehicle_id == vehicle_id
            && r.details.vehicle_class == class
    })
}

fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}
