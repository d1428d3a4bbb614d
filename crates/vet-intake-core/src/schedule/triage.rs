//! Triage ordering of the intake queue.
//!
//! Keys, in order: date (undated last), shift (Morning < Afternoon < Night <
//! unknown), priority (Emergency first), submission time (earliest first).
//! Auto-sort and the recommended-order view both go through
//! [`compare_triage`].

use std::cmp::Ordering;

use super::calendar;
use crate::models::IntakeRequest;

/// Total order over intake requests.
pub fn compare_triage(a: &IntakeRequest, b: &IntakeRequest) -> Ordering {
    calendar::orderable_instant(a.date_str())
        .cmp(&calendar::orderable_instant(b.date_str()))
        .then_with(|| a.shift.rank().cmp(&b.shift.rank()))
        .then_with(|| b.priority.rank().cmp(&a.priority.rank()))
        .then_with(|| a.created_at.cmp(&b.created_at))
}

/// Reorder `queue` in place. Stable, so full ties keep their current order.
pub fn sort_by_triage(queue: &mut [IntakeRequest]) {
    queue.sort_by(compare_triage);
}

/// Triage order as a read-only view; `queue` is left untouched.
pub fn recommended_order(queue: &[IntakeRequest]) -> Vec<&IntakeRequest> {
    let mut ordered: Vec<&IntakeRequest> = queue.iter().collect();
    ordered.sort_by(|a, b| compare_triage(a, b));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, Shift};
    use chrono::{DateTime, Duration, Utc};
    use proptest::prelude::*;

    fn base_time() -> DateTime<Utc> {
        "2024-05-01T08:00:00Z".parse().unwrap()
    }

    fn make_intake(
        id: &str,
        date: Option<&str>,
        shift: Shift,
        priority: Priority,
        offset_secs: i64,
    ) -> IntakeRequest {
        IntakeRequest {
            id: id.into(),
            tutor: "Ana".into(),
            pet: format!("pet-{}", id),
            priority,
            service: "Consulta".into(),
            date: date.map(String::from),
            shift,
            assigned_staff_id: None,
            created_at: base_time() + Duration::seconds(offset_secs),
        }
    }

    fn ids(queue: &[IntakeRequest]) -> Vec<&str> {
        queue.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_priority_dominates_created_at() {
        let routine = make_intake("routine", Some("2024-05-06"), Shift::Morning, Priority::Routine, 0);
        let emergency =
            make_intake("emergency", Some("2024-05-06"), Shift::Morning, Priority::Emergency, 3600);

        assert_eq!(compare_triage(&emergency, &routine), Ordering::Less);
        assert_eq!(compare_triage(&routine, &emergency), Ordering::Greater);
    }

    #[test]
    fn test_undated_sorts_last() {
        let undated = make_intake("undated", None, Shift::Morning, Priority::Emergency, 0);
        let dated = make_intake("dated", Some("2099-12-31"), Shift::Night, Priority::Routine, 10);
        let garbage = make_intake("garbage", Some("someday"), Shift::Morning, Priority::Emergency, 0);

        assert_eq!(compare_triage(&dated, &undated), Ordering::Less);
        assert_eq!(compare_triage(&dated, &garbage), Ordering::Less);
    }

    #[test]
    fn test_full_key_order() {
        let mut queue = vec![
            make_intake("undated", None, Shift::Morning, Priority::Emergency, 0),
            make_intake("may7-morning", Some("2024-05-07"), Shift::Morning, Priority::Routine, 0),
            make_intake("may6-night", Some("2024-05-06"), Shift::Night, Priority::Emergency, 0),
            make_intake("may6-morning-late", Some("2024-05-06"), Shift::Morning, Priority::Urgent, 20),
            make_intake("may6-morning-early", Some("2024-05-06"), Shift::Morning, Priority::Urgent, 10),
            make_intake("may6-odd-shift", Some("2024-05-06"), Shift::Unrecognized("Plantão".into()), Priority::Emergency, 0),
            make_intake("may6-afternoon", Some("2024-05-06"), Shift::Afternoon, Priority::Routine, 0),
        ];

        sort_by_triage(&mut queue);
        assert_eq!(
            ids(&queue),
            vec![
                "may6-morning-early",
                "may6-morning-late",
                "may6-afternoon",
                "may6-night",
                "may6-odd-shift",
                "may7-morning",
                "undated",
            ]
        );
    }

    #[test]
    fn test_unrecognized_priority_after_routine() {
        let routine = make_intake("routine", Some("2024-05-06"), Shift::Morning, Priority::Routine, 10);
        let odd = make_intake(
            "odd",
            Some("2024-05-06"),
            Shift::Morning,
            Priority::Unrecognized("Soon".into()),
            0,
        );
        assert_eq!(compare_triage(&routine, &odd), Ordering::Less);
    }

    #[test]
    fn test_recommended_order_leaves_queue_untouched() {
        let queue = vec![
            make_intake("b", Some("2024-05-07"), Shift::Morning, Priority::Routine, 0),
            make_intake("a", Some("2024-05-06"), Shift::Morning, Priority::Routine, 0),
        ];

        let view: Vec<&str> = recommended_order(&queue).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(view, vec!["a", "b"]);
        assert_eq!(ids(&queue), vec!["b", "a"]);
    }

    #[test]
    fn test_view_matches_in_place_sort() {
        let mut queue = vec![
            make_intake("1", None, Shift::Night, Priority::Urgent, 5),
            make_intake("2", Some("2024-05-06"), Shift::Night, Priority::Urgent, 5),
            make_intake("3", Some("2024-05-06"), Shift::Morning, Priority::Emergency, 9),
            make_intake("4", Some("2024-05-06"), Shift::Morning, Priority::Emergency, 1),
        ];

        let view: Vec<String> = recommended_order(&queue).iter().map(|i| i.id.clone()).collect();
        sort_by_triage(&mut queue);
        assert_eq!(view, ids(&queue));
    }

    fn arb_shift() -> impl Strategy<Value = Shift> {
        prop_oneof![
            Just(Shift::Morning),
            Just(Shift::Afternoon),
            Just(Shift::Night),
            "[A-Z][a-z]{2,6}".prop_map(Shift::Unrecognized),
        ]
    }

    fn arb_priority() -> impl Strategy<Value = Priority> {
        prop_oneof![
            Just(Priority::Emergency),
            Just(Priority::Urgent),
            Just(Priority::Routine),
            "[A-Z][a-z]{2,6}".prop_map(Priority::Unrecognized),
        ]
    }

    fn arb_date() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some("not-a-date".to_string())),
            (1u32..=28).prop_map(|day| Some(format!("2024-05-{:02}", day))),
        ]
    }

    fn arb_intake() -> impl Strategy<Value = IntakeRequest> {
        (arb_date(), arb_shift(), arb_priority(), 0i64..1_000, "[a-z]{6}").prop_map(
            |(date, shift, priority, offset, id)| IntakeRequest {
                id,
                tutor: "Ana".into(),
                pet: "Rex".into(),
                priority,
                service: "Consulta".into(),
                date,
                shift,
                assigned_staff_id: None,
                created_at: base_time() + Duration::seconds(offset),
            },
        )
    }

    proptest! {
        #[test]
        fn prop_compare_is_antisymmetric(a in arb_intake(), b in arb_intake()) {
            prop_assert_eq!(compare_triage(&a, &b), compare_triage(&b, &a).reverse());
        }

        #[test]
        fn prop_compare_is_transitive(a in arb_intake(), b in arb_intake(), c in arb_intake()) {
            if compare_triage(&a, &b) != Ordering::Greater && compare_triage(&b, &c) != Ordering::Greater {
                prop_assert_ne!(compare_triage(&a, &c), Ordering::Greater);
            }
        }

        #[test]
        fn prop_sort_is_idempotent(mut queue in proptest::collection::vec(arb_intake(), 0..24)) {
            sort_by_triage(&mut queue);
            let once = queue.clone();
            sort_by_triage(&mut queue);
            prop_assert_eq!(once, queue);
        }
    }
}
