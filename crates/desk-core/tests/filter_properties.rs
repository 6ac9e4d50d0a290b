//! Property tests for call filtering and ordering

use calldesk_core::filter::{CallFilter, Selector, filter_calls, sort_by_recency};
use calldesk_core::models::{Call, CallDirection, CallStatus};
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn status_strategy() -> impl Strategy<Value = CallStatus> {
    prop::sample::select(CallStatus::ALL.to_vec())
}

fn direction_strategy() -> impl Strategy<Value = CallDirection> {
    prop_oneof![Just(CallDirection::Inbound), Just(CallDirection::Outbound)]
}

fn call_strategy() -> impl Strategy<Value = Call> {
    (
        "[A-Za-z]{1,8}( [A-Za-z]{1,8})?",
        "\\+1 \\(555\\) [0-9]{3}-[0-9]{4}",
        prop::option::of("[A-Za-z]{3,8}"),
        0i64..10_000,
        status_strategy(),
        direction_strategy(),
        prop::option::of("[a-z ]{0,20}"),
        0u32..3_600,
    )
        .prop_map(|(caller, number, agent, minutes_ago, status, direction, notes, secs)| Call {
            id: String::new(),
            caller,
            caller_number: number,
            agent,
            timestamp: epoch() - Duration::minutes(minutes_ago),
            duration: if status.is_live() { None } else { Some(secs) },
            status,
            direction,
            notes,
        })
}

fn calls_strategy() -> impl Strategy<Value = Vec<Call>> {
    prop::collection::vec(call_strategy(), 0..24).prop_map(|mut calls| {
        for (i, call) in calls.iter_mut().enumerate() {
            call.id = (i + 1).to_string();
        }
        calls
    })
}

fn ids(calls: &[&Call]) -> Vec<String> {
    calls.iter().map(|c| c.id.clone()).collect()
}

fn is_newest_first(calls: &[&Call]) -> bool {
    calls.windows(2).all(|w| w[0].timestamp >= w[1].timestamp)
}

proptest! {
    #[test]
    fn default_filter_keeps_every_call(calls in calls_strategy()) {
        let result = filter_calls(&calls, &CallFilter::default());

        prop_assert_eq!(result.len(), calls.len());
        prop_assert!(is_newest_first(&result));

        let mut got = ids(&result);
        let mut expected: Vec<String> = calls.iter().map(|c| c.id.clone()).collect();
        got.sort();
        expected.sort();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn status_filter_is_exact(calls in calls_strategy(), status in status_strategy()) {
        let filter = CallFilter::default().with_status(Selector::Only(status));
        let result = filter_calls(&calls, &filter);

        prop_assert!(result.iter().all(|c| c.status == status));
        prop_assert_eq!(result.len(), calls.iter().filter(|c| c.status == status).count());
        prop_assert!(is_newest_first(&result));
    }

    #[test]
    fn direction_and_status_compose(
        calls in calls_strategy(),
        status in status_strategy(),
        direction in direction_strategy(),
    ) {
        let filter = CallFilter::default()
            .with_status(Selector::Only(status))
            .with_direction(Selector::Only(direction));
        let result = filter_calls(&calls, &filter);

        let expected = calls
            .iter()
            .filter(|c| c.status == status && c.direction == direction)
            .count();
        prop_assert_eq!(result.len(), expected);
    }

    #[test]
    fn query_ignores_case(calls in calls_strategy(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!calls.is_empty());
        let caller = calls[pick.index(calls.len())].caller.clone();

        let lower = filter_calls(&calls, &CallFilter::default().with_query(caller.to_lowercase()));
        let upper = filter_calls(&calls, &CallFilter::default().with_query(caller.to_uppercase()));

        prop_assert!(!lower.is_empty());
        prop_assert_eq!(ids(&lower), ids(&upper));
    }

    #[test]
    fn sorting_is_idempotent(calls in calls_strategy()) {
        let mut once: Vec<&Call> = calls.iter().collect();
        sort_by_recency(&mut once);
        let mut twice = once.clone();
        sort_by_recency(&mut twice);

        prop_assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn generated_calls_keep_duration_invariant(calls in calls_strategy()) {
        for call in &calls {
            prop_assert!(call.validate().is_ok());
        }
    }
}
