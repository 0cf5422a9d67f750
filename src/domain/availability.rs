// Availability calculator - hourly mechanical availability for one calendar day
use super::fleet::VehicleClass;
use super::work_order::WorkOrder;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::ser::{Serialize, SerializeStruct, Serializer};

pub const HOURS_PER_DAY: u32 = 24;

/// Counts for an hour whose outcome is known
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourCounts {
    pub available_count: u32,
    pub unavailable_count: u32,
    pub availability_percent: f64,
}

/// One hour of the day. `counts` is `None` exactly when the hour is still
/// in the future on a live day.
#[derive(Debug, Clone, PartialEq)]
pub struct HourSample {
    pub hour: u32,
    pub counts: Option<HourCounts>,
}

impl HourSample {
    fn future(hour: u32) -> Self {
        Self { hour, counts: None }
    }

    fn known(hour: u32, counts: HourCounts) -> Self {
        Self {
            hour,
            counts: Some(counts),
        }
    }

    pub fn is_future_hour(&self) -> bool {
        self.counts.is_none()
    }

    pub fn available_count(&self) -> Option<u32> {
        self.counts.map(|c| c.available_count)
    }

    pub fn unavailable_count(&self) -> Option<u32> {
        self.counts.map(|c| c.unavailable_count)
    }

    pub fn availability_percent(&self) -> Option<f64> {
        self.counts.map(|c| c.availability_percent)
    }
}

// Future hours keep their slot with null counts.
impl Serialize for HourSample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("HourSample", 5)?;
        s.serialize_field("hour", &self.hour)?;
        s.serialize_field("available_count", &self.available_count())?;
        s.serialize_field("unavailable_count", &self.unavailable_count())?;
        s.serialize_field("availability_percent", &self.availability_percent())?;
        s.serialize_field("is_future_hour", &self.is_future_hour())?;
        s.end()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AvailabilityReport {
    pub fleet_size: u32,
    pub hourly: Vec<HourSample>,
    pub mean_availability_percent: f64,
    pub mean_available_count: f64,
    pub is_live_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_hour: Option<u32>,
}

/// Build the 24-hour availability profile of `vehicle_class` on `target_date`.
///
/// `now` is read once by the caller and stays fixed for the whole report.
/// When `target_date` is the calendar day of `now`, hours after the current
/// hour are reported as unknown and left out of the averages.
pub fn compute(
    fleet_size: u32,
    work_orders: &[WorkOrder],
    target_date: NaiveDate,
    vehicle_class: VehicleClass,
    now: NaiveDateTime,
) -> AvailabilityReport {
    let is_live_day = target_date == now.date();
    let current_hour = is_live_day.then(|| now.hour());
    let midnight = target_date.and_time(NaiveTime::MIN);

    let relevant: Vec<&WorkOrder> = work_orders
        .iter()
        .filter(|order| order.vehicle_class == vehicle_class)
        .collect();

    let hourly: Vec<HourSample> = (0..HOURS_PER_DAY)
        .map(|hour| {
            if current_hour.is_some_and(|current| hour > current) {
                return HourSample::future(hour);
            }

            let moment = midnight + Duration::hours(i64::from(hour));
            let covering = relevant.iter().filter(|order| order.covers(moment)).count();
            HourSample::known(hour, hour_counts(fleet_size, covering))
        })
        .collect();

    let valid: Vec<HourCounts> = hourly.iter().filter_map(|sample| sample.counts).collect();
    let (mean_availability_percent, mean_available_count) = if valid.is_empty() {
        (100.0, f64::from(fleet_size))
    } else {
        let n = valid.len() as f64;
        (
            valid.iter().map(|c| c.availability_percent).sum::<f64>() / n,
            valid.iter().map(|c| f64::from(c.available_count)).sum::<f64>() / n,
        )
    };

    AvailabilityReport {
        fleet_size,
        hourly,
        mean_availability_percent,
        mean_available_count,
        is_live_day,
        current_hour,
    }
}

fn hour_counts(fleet_size: u32, covering: usize) -> HourCounts {
    let unavailable_count = u32::try_from(covering).unwrap_or(u32::MAX);
    let available_count = fleet_size.saturating_sub(unavailable_count);
    let availability_percent = if fleet_size > 0 {
        100.0 * f64::from(available_count) / f64::from(fleet_size)
    } else {
        100.0
    };

    HourCounts {
        available_count,
        unavailable_count,
        availability_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calendar::parse_date;
    use crate::domain::work_order::WorkOrderRecord;
    use proptest::prelude::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn at(d: u32, hour: u32, minute: u32) -> NaiveDateTime {
        day(d).and_hms_opt(hour, minute, 0).unwrap()
    }

    /// A wall clock on a different day from every target used below
    fn elsewhere() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn sample(report: &AvailabilityReport, hour: u32) -> &HourSample {
        &report.hourly[hour as usize]
    }

    #[test]
    fn test_end_to_end_completed_order() {
        let orders = vec![WorkOrder::completed(VehicleClass::Unit, at(1, 9, 0), at(1, 11, 0))];
        let target = parse_date("01-01-2024").unwrap();
        let report = compute(2, &orders, target, VehicleClass::Unit, elsewhere());

        assert!(!report.is_live_day);
        assert_eq!(report.current_hour, None);

        for hour in [9, 10, 11] {
            let s = sample(&report, hour);
            assert_eq!(s.unavailable_count(), Some(1), "hour {hour}");
            assert_eq!(s.available_count(), Some(1), "hour {hour}");
            assert_eq!(s.availability_percent(), Some(50.0), "hour {hour}");
        }
        for hour in [8, 12] {
            let s = sample(&report, hour);
            assert_eq!(s.unavailable_count(), Some(0), "hour {hour}");
            assert_eq!(s.available_count(), Some(2), "hour {hour}");
            assert_eq!(s.availability_percent(), Some(100.0), "hour {hour}");
        }

        assert_eq!(report.mean_availability_percent, (21.0 * 100.0 + 3.0 * 50.0) / 24.0);
        assert_eq!(report.mean_available_count, (21.0 * 2.0 + 3.0 * 1.0) / 24.0);
    }

    #[test]
    fn test_completed_window_boundaries() {
        let orders = vec![WorkOrder::completed(VehicleClass::Unit, at(5, 8, 0), at(5, 10, 0))];
        let report = compute(3, &orders, day(5), VehicleClass::Unit, elsewhere());

        assert_eq!(sample(&report, 7).unavailable_count(), Some(0));
        assert_eq!(sample(&report, 8).unavailable_count(), Some(1));
        assert_eq!(sample(&report, 9).unavailable_count(), Some(1));
        assert_eq!(sample(&report, 10).unavailable_count(), Some(1));
        assert_eq!(sample(&report, 11).unavailable_count(), Some(0));
    }

    #[test]
    fn test_open_order_covers_following_days() {
        let orders = vec![WorkOrder::open(VehicleClass::Unit, at(5, 8, 0))];
        let report = compute(4, &orders, day(6), VehicleClass::Unit, elsewhere());

        for s in &report.hourly {
            assert_eq!(s.unavailable_count(), Some(1), "hour {}", s.hour);
            assert_eq!(s.available_count(), Some(3), "hour {}", s.hour);
        }
        assert_eq!(report.mean_availability_percent, 75.0);
    }

    #[test]
    fn test_open_order_not_counted_before_opening() {
        let orders = vec![WorkOrder::open(VehicleClass::Unit, at(5, 8, 30))];
        let report = compute(1, &orders, day(5), VehicleClass::Unit, elsewhere());

        assert_eq!(sample(&report, 8).unavailable_count(), Some(0));
        assert_eq!(sample(&report, 9).unavailable_count(), Some(1));
    }

    #[test]
    fn test_open_order_with_bare_closing_date_is_not_counted() {
        let record: WorkOrderRecord = serde_json::from_value(serde_json::json!({
            "id": "os-7",
            "vehicle_class": "unit",
            "vehicle_id": "t-1",
            "opened_date": "01-01-2024",
            "opened_time": "09:00",
            "closed_date": "01-01-2024",
            "maintenance_type": "corrective",
            "status": "open",
            "created_at": "2024-01-01T09:00:00Z"
        }))
        .unwrap();
        let orders = vec![record.to_work_order().unwrap()];
        let report = compute(1, &orders, day(1), VehicleClass::Unit, elsewhere());

        assert_eq!(sample(&report, 12).unavailable_count(), Some(0));
        assert_eq!(report.mean_availability_percent, 100.0);
    }

    #[test]
    fn test_other_class_ignored() {
        let orders = vec![WorkOrder::open(VehicleClass::Composition, at(1, 0, 0))];
        let report = compute(2, &orders, day(1), VehicleClass::Unit, elsewhere());

        assert!(report.hourly.iter().all(|s| s.unavailable_count() == Some(0)));
        assert_eq!(report.mean_availability_percent, 100.0);
    }

    #[test]
    fn test_live_day_boundary() {
        let now = at(10, 14, 37);
        let report = compute(5, &[], day(10), VehicleClass::Unit, now);

        assert!(report.is_live_day);
        assert_eq!(report.current_hour, Some(14));
        assert!(!sample(&report, 14).is_future_hour());
        assert!(sample(&report, 15).is_future_hour());
        assert_eq!(sample(&report, 15).available_count(), None);
        assert_eq!(sample(&report, 23).availability_percent(), None);
    }

    #[test]
    fn test_live_day_at_midnight_computes_hour_zero() {
        let orders = vec![WorkOrder::open(VehicleClass::Unit, at(9, 22, 0))];
        let report = compute(2, &orders, day(10), VehicleClass::Unit, at(10, 0, 5));

        assert!(!sample(&report, 0).is_future_hour());
        assert_eq!(sample(&report, 0).available_count(), Some(1));
        assert!(report.hourly[1..].iter().all(HourSample::is_future_hour));

        // averages use hour 0 only
        assert_eq!(report.mean_availability_percent, 50.0);
        assert_eq!(report.mean_available_count, 1.0);
    }

    #[test]
    fn test_future_calendar_day_is_fully_computed() {
        let orders = vec![WorkOrder::open(VehicleClass::Unit, at(1, 0, 0))];
        let report = compute(2, &orders, day(20), VehicleClass::Unit, at(10, 12, 0));

        assert!(!report.is_live_day);
        assert!(report.hourly.iter().all(|s| !s.is_future_hour()));
        assert_eq!(report.mean_availability_percent, 50.0);
    }

    #[test]
    fn test_zero_fleet_reports_full_availability() {
        let orders = vec![
            WorkOrder::open(VehicleClass::Unit, at(1, 0, 0)),
            WorkOrder::completed(VehicleClass::Unit, at(1, 3, 0), at(1, 5, 0)),
        ];
        let report = compute(0, &orders, day(1), VehicleClass::Unit, elsewhere());

        for s in &report.hourly {
            assert_eq!(s.availability_percent(), Some(100.0));
            assert_eq!(s.available_count(), Some(0));
        }
        assert_eq!(sample(&report, 4).unavailable_count(), Some(2));
        assert_eq!(report.mean_available_count, 0.0);
    }

    #[test]
    fn test_overlapping_orders_double_count_and_clamp() {
        // two orders on what may be the same vehicle
        let orders = vec![
            WorkOrder::open(VehicleClass::Unit, at(1, 0, 0)),
            WorkOrder::completed(VehicleClass::Unit, at(1, 0, 0), at(1, 23, 0)),
        ];
        let report = compute(1, &orders, day(1), VehicleClass::Unit, elsewhere());

        let s = sample(&report, 12);
        assert_eq!(s.unavailable_count(), Some(2));
        assert_eq!(s.available_count(), Some(0));
        assert_eq!(s.availability_percent(), Some(0.0));
    }

    #[test]
    fn test_live_day_without_orders_defaults() {
        let report = compute(7, &[], day(3), VehicleClass::Composition, at(3, 23, 59));
        assert_eq!(report.current_hour, Some(23));
        assert!(report.hourly.iter().all(|s| !s.is_future_hour()));
        assert_eq!(report.mean_available_count, 7.0);
        assert_eq!(report.mean_availability_percent, 100.0);
    }

    #[test]
    fn test_future_hours_serialize_as_null() {
        let report = compute(1, &[], day(10), VehicleClass::Unit, at(10, 0, 0));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["current_hour"], 0);
        assert_eq!(json["hourly"][0]["available_count"], 1);
        assert_eq!(json["hourly"][1]["hour"], 1);
        assert!(json["hourly"][1]["available_count"].is_null());
        assert!(json["hourly"][1]["availability_percent"].is_null());
        assert_eq!(json["hourly"][1]["is_future_hour"], true);

        let past = compute(1, &[], day(9), VehicleClass::Unit, at(10, 0, 0));
        let json = serde_json::to_value(&past).unwrap();
        assert!(json.get("current_hour").is_none());
    }

    fn arb_order() -> impl Strategy<Value = WorkOrder> {
        let class = prop_oneof![Just(VehicleClass::Unit), Just(VehicleClass::Composition)];
        (class, 0u8..3, 1u32..=3, 0u32..24, 0u32..60, 0i64..72 * 60).prop_map(
            |(class, status, d, h, m, length)| {
                let opened_at = at(d, h, m);
                match status {
                    0 => WorkOrder::open(class, opened_at),
                    1 => WorkOrder::completed(
                        class,
                        opened_at,
                        opened_at + Duration::minutes(length + 1),
                    ),
                    _ => WorkOrder::cancelled(class, opened_at),
                }
            },
        )
    }

    fn arb_now() -> impl Strategy<Value = NaiveDateTime> {
        (1u32..=3, 0u32..24, 0u32..60).prop_map(|(d, h, m)| at(d, h, m))
    }

    proptest! {
        #[test]
        fn test_report_shape_invariants(
            fleet_size in 0u32..10,
            orders in prop::collection::vec(arb_order(), 0..20),
            target in 1u32..=3,
            now in arb_now(),
        ) {
            let report = compute(fleet_size, &orders, day(target), VehicleClass::Unit, now);

            prop_assert_eq!(report.hourly.len(), 24);
            for (i, s) in report.hourly.iter().enumerate() {
                prop_assert_eq!(s.hour, i as u32);
                let expected_future = report.is_live_day && s.hour > now.hour();
                prop_assert_eq!(s.is_future_hour(), expected_future);
                prop_assert_eq!(s.available_count().is_none(), s.is_future_hour());
                if let Some(counts) = s.counts {
                    prop_assert!(counts.available_count <= fleet_size);
                    prop_assert!((0.0..=100.0).contains(&counts.availability_percent));
                }
            }
            prop_assert_eq!(report.current_hour.is_some(), report.is_live_day);
            prop_assert!(report.hourly.iter().any(|s| !s.is_future_hour()));
        }

        #[test]
        fn test_deterministic(
            fleet_size in 0u32..10,
            orders in prop::collection::vec(arb_order(), 0..20),
            target in 1u32..=3,
            now in arb_now(),
        ) {
            let first = compute(fleet_size, &orders, day(target), VehicleClass::Composition, now);
            let second = compute(fleet_size, &orders, day(target), VehicleClass::Composition, now);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn test_cancelled_orders_have_no_effect(
            fleet_size in 0u32..10,
            orders in prop::collection::vec(arb_order(), 0..20),
            cancelled in prop::collection::vec((1u32..=3, 0u32..24), 1..10),
            target in 1u32..=3,
            now in arb_now(),
        ) {
            let baseline = compute(fleet_size, &orders, day(target), VehicleClass::Unit, now);

            let mut with_cancelled = orders.clone();
            with_cancelled.extend(
                cancelled.into_iter().map(|(d, h)| WorkOrder::cancelled(VehicleClass::Unit, at(d, h, 0))),
            );
            let report = compute(fleet_size, &with_cancelled, day(target), VehicleClass::Unit, now);

            prop_assert_eq!(baseline, report);
        }
    }
}
