// Application state for HTTP handlers
use crate::application::availability_service::AvailabilityService;
use crate::application::fleet_service::FleetService;
use crate::application::streaming_service::StreamingAvailabilityService;

#[derive(Clone)]
pub struct AppState {
    pub fleet_service: FleetService,
    pub availability_service: AvailabilityService,
    pub streaming_service: StreamingAvailabilityService,
}
