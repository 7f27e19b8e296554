//! Property tests for observation time resolution.

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use himawari_common::ObservationTime;
use rand::Rng;

/// Reference computation: one day back, floored to a 600 second boundary.
fn expected(now: DateTime<Utc>) -> DateTime<Utc> {
    let back = now - Duration::hours(24);
    let secs = back.timestamp();
    let floored = secs - secs.rem_euclid(600);
    Utc.timestamp_opt(floored, 0).unwrap()
}

#[test]
fn test_resolve_matches_reference_for_random_instants() {
    let mut rng = rand::thread_rng();
    // 2015-07-07 (first Himawari-8 imagery) through 2035
    let start = Utc.with_ymd_and_hms(2015, 7, 7, 0, 0, 0).unwrap().timestamp();
    let end = Utc.with_ymd_and_hms(2035, 1, 1, 0, 0, 0).unwrap().timestamp();

    for _ in 0..2000 {
        let secs = rng.gen_range(start..end);
        let nanos = rng.gen_range(0..1_000_000_000u32);
        let now = Utc.timestamp_opt(secs, nanos).unwrap();

        let resolved = ObservationTime::resolve(now);

        assert_eq!(resolved.minute() % 10, 0, "now = {now}");
        assert_eq!(resolved.second(), 0, "now = {now}");
        assert_eq!(resolved.as_utc().nanosecond(), 0, "now = {now}");
        assert_eq!(resolved.as_utc(), expected(now), "now = {now}");
    }
}

#[test]
fn test_resolve_is_idempotent_on_aligned_input_shifted_by_a_day() {
    let now = Utc.with_ymd_and_hms(2024, 9, 1, 3, 50, 0).unwrap();
    let first = ObservationTime::resolve(now);
    let second = ObservationTime::resolve(first.as_utc() + Duration::hours(24));
    assert_eq!(first, second);
}

#[test]
fn test_display_is_iso8601() {
    let now = Utc.with_ymd_and_hms(2024, 9, 1, 3, 57, 12).unwrap();
    assert_eq!(
        ObservationTime::resolve(now).to_string(),
        "2024-08-31T03:50:00Z"
    );
}

#[test]
fn test_serde_round_trip_preserves_alignment() {
    let t = ObservationTime::resolve(Utc.with_ymd_and_hms(2024, 9, 1, 3, 57, 12).unwrap());
    let json = serde_json::to_string(&t).unwrap();
    let back: ObservationTime = serde_json::from_str(&json).unwrap();
    assert_eq!(t, back);
}
