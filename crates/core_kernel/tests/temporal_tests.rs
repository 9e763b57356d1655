//! Tests for cover periods

use chrono::{Duration, TimeZone, Utc};
use core_kernel::temporal::{CoverPeriod, TemporalError};

#[test]
fn test_period_boundaries() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let period = CoverPeriod::days_from(start, 30).unwrap();

    assert!(period.contains(start));
    assert!(!period.contains(start - Duration::seconds(1)));
    assert!(!period.is_expired_at(period.expiry() - Duration::seconds(1)));
    assert!(period.is_expired_at(period.expiry()));
}

#[test]
fn test_zero_day_period_rejected() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

    assert!(matches!(
        CoverPeriod::days_from(start, 0),
        Err(TemporalError::InvalidPeriod { .. })
    ));
}

#[test]
fn test_period_equality_is_exact() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let a = CoverPeriod::days_from(start, 61).unwrap();
    let b = CoverPeriod::days_from(start, 61).unwrap();
    let c = CoverPeriod::days_from(start + Duration::seconds(1), 61).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_period_serde() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let period = CoverPeriod::days_from(start, 61).unwrap();

    let json = serde_json::to_string(&period).unwrap();
    let back: CoverPeriod = serde_json::from_str(&json).unwrap();
    assert_eq!(back, period);
}
