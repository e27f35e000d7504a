use proptest::prelude::*;

use lastthird::constants::MINUTES_PER_DAY;
use lastthird::night::{
    format_minutes, last_third, night_duration, normalize_minutes, parse_time_of_day,
};
use lastthird::{NightError, TimeOfDay};

fn any_time() -> impl Strategy<Value = TimeOfDay> {
    (0..MINUTES_PER_DAY).prop_map(TimeOfDay::from_minutes)
}

/// Two anchors that are not the same minute
fn distinct_anchors() -> impl Strategy<Value = (TimeOfDay, TimeOfDay)> {
    (any_time(), any_time()).prop_filter("anchors must differ", |(start, end)| start != end)
}

proptest! {
    #[test]
    fn test_duration_is_positive_and_within_one_day((start, end) in distinct_anchors()) {
        let duration = night_duration(start, end).unwrap();
        prop_assert!(duration > 0);
        prop_assert!(duration < MINUTES_PER_DAY);
    }

    #[test]
    fn test_duration_follows_rollover_formula((start, end) in distinct_anchors()) {
        let duration = night_duration(start, end).unwrap();
        let expected = if end.minutes() <= start.minutes() {
            end.minutes() + MINUTES_PER_DAY - start.minutes()
        } else {
            end.minutes() - start.minutes()
        };
        prop_assert_eq!(duration, expected);
    }

    #[test]
    fn test_equal_anchors_are_degenerate(time in any_time()) {
        let is_degenerate = matches!(
            night_duration(time, time),
            Err(NightError::DegenerateInterval { .. })
        );
        prop_assert!(is_degenerate);
    }

    #[test]
    fn test_canonical_strings_round_trip(hour in 0u32..24, minute in 0u32..60) {
        let text = format!("{:02}:{:02}", hour, minute);
        let parsed = parse_time_of_day(&text).unwrap();
        prop_assert_eq!(format_minutes(parsed.minutes()), text);
    }

    #[test]
    fn test_boundary_is_two_thirds_into_the_night((start, end) in distinct_anchors()) {
        let third = last_third(start, end).unwrap();
        let offset = third.boundary_raw - start.minutes() as f64;
        prop_assert!((offset - 2.0 * third.duration as f64 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_boundary_lies_inside_the_night((start, end) in distinct_anchors()) {
        let third = last_third(start, end).unwrap();
        prop_assert!(third.boundary_raw > start.minutes() as f64);
        prop_assert!(third.boundary_raw < third.end_adjusted as f64);
    }

    #[test]
    fn test_normalization_stays_in_range(minutes in -100_000i64..100_000) {
        let normalized = normalize_minutes(minutes);
        prop_assert!((0..MINUTES_PER_DAY).contains(&normalized));
        prop_assert_eq!((minutes - normalized).rem_euclid(MINUTES_PER_DAY), 0);

        let reparsed = parse_time_of_day(&format_minutes(minutes)).unwrap();
        prop_assert_eq!(reparsed.minutes(), normalized);
    }
}
