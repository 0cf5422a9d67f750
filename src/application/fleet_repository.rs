// Repository trait for fleet record access
use crate::domain::backup::FleetSnapshot;
use crate::domain::fleet::{Composition, Driver, Tractor};
use crate::domain::work_order::WorkOrderRecord;
use async_trait::async_trait;

/// Durable storage for fleet records.
///
/// `save_*` inserts or replaces by id; `delete_*` reports whether a record
/// with that id existed.
#[async_trait]
pub trait FleetRepository: Send + Sync {
    async fn list_tractors(&self) -> anyhow::Result<Vec<Tractor>>;
    async fn save_tractor(&self, tractor: Tractor) -> anyhow::Result<()>;
    async fn delete_tractor(&self, id: &str) -> anyhow::Result<bool>;

    async fn list_compositions(&self) -> anyhow::Result<Vec<Composition>>;
    async fn save_composition(&self, composition: Composition) -> anyhow::Result<()>;
    async fn delete_composition(&self, id: &str) -> anyhow::Result<bool>;

    async fn list_drivers(&self) -> anyhow::Result<Vec<Driver>>;
    async fn save_driver(&self, driver: Driver) -> anyhow::Result<()>;
    async fn delete_driver(&self, id: &str) -> anyhow::Result<bool>;

    async fn list_work_orders(&self) -> anyhow::Result<Vec<WorkOrderRecord>>;
    async fn save_work_order(&self, work_order: WorkOrderRecord) -> anyhow::Result<()>;
    async fn delete_work_order(&self, id: &str) -> anyhow::Result<bool>;

    /// Every collection as of one consistent moment
    async fn snapshot(&self) -> anyhow::Result<FleetSnapshot>;
    /// Replace every collection at once
    async fn replace_all(&self, snapshot: FleetSnapshot) -> anyhow::Result<()>;
}
