// Application layer - Use cases over the fleet repository
pub mod availability_service;
pub mod error;
pub mod fleet_repository;
pub mod fleet_service;
pub mod streaming_service;
