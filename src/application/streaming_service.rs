// Streaming availability service - Live re-computation of today's report
use crate::application::availability_service::AvailabilityService;
use crate::domain::analysis::AvailabilityAnalysis;
use crate::domain::fleet::VehicleClass;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct StreamingAvailabilityService {
    availability_service: AvailabilityService,
    refresh_interval: Duration,
}

impl StreamingAvailabilityService {
    /// Intervals shorter than one second are raised to one second.
    pub fn new(availability_service: AvailabilityService, refresh_interval: Duration) -> Self {
        Self {
            availability_service,
            refresh_interval: refresh_interval.max(MIN_REFRESH_INTERVAL),
        }
    }

    /// Send today's analysis right away and then once per refresh interval.
    ///
    /// The task ends when the receiver is dropped. A failed refresh is
    /// logged and skipped; the next tick tries again.
    pub fn stream_availability(
        &self,
        vehicle_class: VehicleClass,
        goal_percent: Option<f64>,
    ) -> mpsc::Receiver<AvailabilityAnalysis> {
        let (tx, rx) = mpsc::channel(4);
        let service = self.availability_service.clone();
        let period = self.refresh_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut sent = 0u64;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = tx.closed() => break,
                }

                match service.analyze(None, vehicle_class, goal_percent).await {
                    Ok(analysis) => {
                        if tx.send(analysis).await.is_err() {
                            break;
                        }
                        sent += 1;
                    }
                    Err(e) => {
                        tracing::error!("Live {} availability refresh failed: {}", vehicle_class, e);
                    }
                }
            }

            tracing::debug!(
                "Live {} availability stream closed after {} updates",
                vehicle_class,
                sent
            );
        });

        rx
    }
}
