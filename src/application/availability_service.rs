// Availability service - Use case for analysing a day's mechanical availability
use crate::application::error::ServiceResult;
use crate::application::fleet_repository::FleetRepository;
use crate::domain::analysis::AvailabilityAnalysis;
use crate::domain::availability::compute;
use crate::domain::calendar::parse_date;
use crate::domain::fleet::VehicleClass;
use crate::domain::work_order::WorkOrder;
use crate::infrastructure::config::AvailabilitySettings;
use chrono::NaiveDateTime;
use std::sync::Arc;

/// Source of the local wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Arc<dyn FleetRepository>,
    clock: Arc<dyn Clock>,
    settings: AvailabilitySettings,
}

impl AvailabilityService {
    pub fn new(
        repository: Arc<dyn FleetRepository>,
        clock: Arc<dyn Clock>,
        settings: AvailabilitySettings,
    ) -> Self {
        Self {
            repository,
            clock,
            settings,
        }
    }

    /// Analyse `date` (`DD-MM-YYYY`, today when absent) for one vehicle class.
    ///
    /// The clock is read once. Any stored work order that fails to parse
    /// fails the whole analysis.
    pub async fn analyze(
        &self,
        date: Option<&str>,
        vehicle_class: VehicleClass,
        goal_percent: Option<f64>,
    ) -> ServiceResult<AvailabilityAnalysis> {
        let now = self.clock.now();
        let target_date = match date {
            Some(text) => parse_date(text)?,
            None => now.date(),
        };

        let fleet_size = self.fleet_size(vehicle_class).await?;
        let work_orders = self
            .repository
            .list_work_orders()
            .await?
            .iter()
            .map(|record| record.to_work_order())
            .collect::<Result<Vec<WorkOrder>, _>>()?;

        tracing::debug!(
            "Computing {} availability for {}: fleet {}, {} work orders",
            vehicle_class,
            target_date,
            fleet_size,
            work_orders.len()
        );

        let report = compute(fleet_size, &work_orders, target_date, vehicle_class, now);
        let goal = goal_percent.unwrap_or_else(|| self.settings.default_goal(vehicle_class));

        Ok(AvailabilityAnalysis::new(target_date, vehicle_class, goal, report))
    }

    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.settings.refresh_interval_secs)
    }

    async fn fleet_size(&self, vehicle_class: VehicleClass) -> ServiceResult<u32> {
        let count = match vehicle_class {
            VehicleClass::Unit => self.repository.list_tractors().await?.len(),
            VehicleClass::Composition => self.repository.list_compositions().await?.len(),
        };
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::application::error::ServiceError;
    use crate::domain::error::DomainError;
    use crate::domain::fleet::{Tractor, TractorDraft};
    use crate::domain::work_order::{
        MaintenanceType, WorkOrderDraft, WorkOrderRecord, WorkOrderStatus,
    };
    use crate::infrastructure::json_repository::JsonFileRepository;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    pub(crate) struct FixedClock(pub NaiveDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    fn clock_at(day: u32, hour: u32, minute: u32) -> Arc<dyn Clock> {
        let now = NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap();
        Arc::new(FixedClock(now))
    }

    fn work_order(opened_time: &str, closed: Option<&str>) -> WorkOrderRecord {
        WorkOrderRecord::from_draft(WorkOrderDraft {
            vehicle_class: VehicleClass::Unit,
            vehicle_id: "t-1".to_string(),
            plate: String::new(),
            driver_id: None,
            opened_date: "01-01-2024".to_string(),
            opened_time: opened_time.to_string(),
            closed_date: closed.map(|_| "01-01-2024".to_string()),
            closed_time: closed.map(str::to_string),
            expected_release_date: None,
            expected_release_time: None,
            maintenance_type: MaintenanceType::Sos,
            description: String::new(),
            status: if closed.is_some() {
                WorkOrderStatus::Completed
            } else {
                WorkOrderStatus::Open
            },
            is_stand_by: false,
            origin_composition_id: None,
        })
    }

    pub(crate) async fn seeded_repository(tractors: usize) -> (Arc<JsonFileRepository>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let repository = Arc::new(JsonFileRepository::open(dir.path()).unwrap());
        for i in 0..tractors {
            repository
                .save_tractor(Tractor::from_draft(TractorDraft {
                    fleet_name: format!("T{i:04}"),
                    plate: format!("PLT{i:04}"),
                }))
                .await
                .unwrap();
        }
        (repository, dir)
    }

    #[tokio::test]
    async fn test_analyze_past_day() {
        let (repository, _dir) = seeded_repository(2).await;
        repository
            .save_work_order(work_order("09:00", Some("11:00")))
            .await
            .unwrap();

        let service = AvailabilityService::new(
            repository,
            clock_at(15, 8, 0),
            AvailabilitySettings::default(),
        );
        let analysis = service
            .analyze(Some("01-01-2024"), VehicleClass::Unit, None)
            .await
            .unwrap();

        assert_eq!(analysis.date, "01-01-2024");
        assert_eq!(analysis.goal_percent, 90.0);
        assert!(analysis.goal_met);
        assert_eq!(analysis.report.fleet_size, 2);
        assert!(!analysis.report.is_live_day);
        assert_eq!(analysis.report.hourly[10].available_count(), Some(1));
        assert_eq!(analysis.report.mean_availability_percent, 93.75);
    }

    #[tokio::test]
    async fn test_analyze_defaults_to_today() {
        let (repository, _dir) = seeded_repository(1).await;
        repository.save_work_order(work_order("08:00", None)).await.unwrap();

        let service = AvailabilityService::new(
            repository,
            clock_at(1, 9, 30),
            AvailabilitySettings::default(),
        );
        let analysis = service
            .analyze(None, VehicleClass::Unit, Some(40.0))
            .await
            .unwrap();

        let report = &analysis.report;
        assert!(report.is_live_day);
        assert_eq!(report.current_hour, Some(9));
        assert!(report.hourly[10].is_future_hour());
        // hours 0..=7 up, 8 and 9 down
        assert_eq!(report.mean_availability_percent, 80.0);
        assert!(analysis.goal_met);
    }

    #[tokio::test]
    async fn test_composition_fleet_is_counted_separately() {
        let (repository, _dir) = seeded_repository(3).await;
        let service = AvailabilityService::new(
            repository,
            clock_at(15, 8, 0),
            AvailabilitySettings::default(),
        );

        let analysis = service
            .analyze(Some("01-01-2024"), VehicleClass::Composition, None)
            .await
            .unwrap();
        assert_eq!(analysis.report.fleet_size, 0);
        assert_eq!(analysis.report.mean_availability_percent, 100.0);
    }

    #[tokio::test]
    async fn test_malformed_date_fails() {
        let (repository, _dir) = seeded_repository(1).await;
        let service = AvailabilityService::new(
            repository,
            clock_at(15, 8, 0),
            AvailabilitySettings::default(),
        );

        let result = service
            .analyze(Some("2024-01-01"), VehicleClass::Unit, None)
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::Domain(DomainError::InvalidDate(_)))
        ));
    }
}
