// Domain layer - Fleet records, work orders and the availability calculator
pub mod analysis;
pub mod availability;
pub mod backup;
pub mod calendar;
pub mod error;
pub mod fleet;
pub mod statistics;
pub mod validation;
pub mod work_order;
pub mod work_order_query;
