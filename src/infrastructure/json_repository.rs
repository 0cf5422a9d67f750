// JSON file repository implementation
use crate::application::fleet_repository::FleetRepository;
use crate::domain::backup::FleetSnapshot;
use crate::domain::fleet::{Composition, Driver, Tractor};
use crate::domain::work_order::WorkOrderRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

const STORE_FILE: &str = "fleet.json";

/// Keeps the fleet in memory and rewrites `fleet.json` after every change.
///
/// Writers hold the lock until the file is replaced, so the file always
/// matches a state some reader could have seen.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    snapshot: RwLock<FleetSnapshot>,
}

impl JsonFileRepository {
    /// Open the store in `data_dir`, creating the directory when missing
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
        let path = data_dir.join(STORE_FILE);

        let snapshot = if path.exists() {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_slice(&bytes)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            FleetSnapshot::default()
        };

        tracing::info!(
            "Opened fleet store {} ({} tractors, {} compositions, {} drivers, {} work orders)",
            path.display(),
            snapshot.tractors.len(),
            snapshot.compositions.len(),
            snapshot.drivers.len(),
            snapshot.work_orders.len()
        );

        Ok(Self {
            path,
            snapshot: RwLock::new(snapshot),
        })
    }

    async fn persist(&self, snapshot: &FleetSnapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot).context("Failed to serialize fleet")?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        tracing::debug!("Persisted {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }

    /// Apply `change` and write the result; memory is only updated once the
    /// file has been written.
    async fn update<F>(&self, change: F) -> Result<bool>
    where
        F: FnOnce(&mut FleetSnapshot) -> bool + Send,
    {
        let mut guard = self.snapshot.write().await;
        let mut next = guard.clone();
        if !change(&mut next) {
            return Ok(false);
        }
        self.persist(&next).await?;
        *guard = next;
        Ok(true)
    }
}

fn upsert<T>(records: &mut Vec<T>, record: T, id_of: impl Fn(&T) -> &str) {
    match records.iter().position(|r| id_of(r) == id_of(&record)) {
        Some(index) => records[index] = record,
        None => records.push(record),
    }
}

fn remove<T>(records: &mut Vec<T>, id: &str, id_of: impl Fn(&T) -> &str) -> bool {
    let before = records.len();
    records.retain(|r| id_of(r) != id);
    records.len() != before
}

#[async_trait]
impl FleetRepository for JsonFileRepository {
    async fn list_tractors(&self) -> Result<Vec<Tractor>> {
        Ok(self.snapshot.read().await.tractors.clone())
    }

    async fn save_tractor(&self, tractor: Tractor) -> Result<()> {
        self.update(|s| {
            upsert(&mut s.tractors, tractor, |t| t.id.as_str());
            true
        })
        .await?;
        Ok(())
    }

    async fn delete_tractor(&self, id: &str) -> Result<bool> {
        self.update(|s| remove(&mut s.tractors, id, |t| t.id.as_str())).await
    }

    async fn list_compositions(&self) -> Result<Vec<Composition>> {
        Ok(self.snapshot.read().await.compositions.clone())
    }

    async fn save_composition(&self, composition: Composition) -> Result<()> {
        self.update(|s| {
            upsert(&mut s.compositions, composition, |c| c.id.as_str());
            true
        })
        .await?;
        Ok(())
    }

    async fn delete_composition(&self, id: &str) -> Result<bool> {
        self.update(|s| remove(&mut s.compositions, id, |c| c.id.as_str())).await
    }

    async fn list_drivers(&self) -> Result<Vec<Driver>> {
        Ok(self.snapshot.read().await.drivers.clone())
    }

    async fn save_driver(&self, driver: Driver) -> Result<()> {
        self.update(|s| {
            upsert(&mut s.drivers, driver, |d| d.id.as_str());
            true
        })
        .await?;
        Ok(())
    }

    async fn delete_driver(&self, id: &str) -> Result<bool> {
        self.update(|s| remove(&mut s.drivers, id, |d| d.id.as_str())).await
    }

    async fn list_work_orders(&self) -> Result<Vec<WorkOrderRecord>> {
        Ok(self.snapshot.read().await.work_orders.clone())
    }

    async fn save_work_order(&self, work_order: WorkOrderRecord) -> Result<()> {
        self.update(|s| {
            upsert(&mut s.work_orders, work_order, |w| w.id.as_str());
            true
        })
        .await?;
        Ok(())
    }

    async fn delete_work_order(&self, id: &str) -> Result<bool> {
        self.update(|s| remove(&mut s.work_orders, id, |w| w.id.as_str())).await
    }

    async fn snapshot(&self) -> Result<FleetSnapshot> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn replace_all(&self, snapshot: FleetSnapshot) -> Result<()> {
        self.update(|s| {
            *s = snapshot;
            true
        })
        .await?;
        tracing::info!("Replaced fleet store {}", self.path.display());
        Ok(())
    }
}
