use ride_lifecycle::domain::payment::PaymentStatus::{self, *};
use ride_lifecycle::domain::payment_lifecycle::{PaymentLifecycle, StatusChange};
use ride_lifecycle::error::LifecycleError;

/// Every legal edge, written out independently of the implementation.
const EDGES: &[(PaymentStatus, PaymentStatus)] = &[
    (Pending, Processing),
    (Pending, Failed),
    (Pending, Completed),
    (Processing, Completed),
    (Processing, Failed),
    (Completed, Refunded),
    (Failed, Pending),
];

#[test]
fn test_transition_table_is_exact() {
    for current in PaymentStatus::ALL {
        for proposed in PaymentStatus::ALL {
            let expected = EDGES.contains(&(current, proposed));
            assert_eq!(
                PaymentLifecycle::can_transition(current, proposed),
                expected,
                "{} -> {}",
                current,
                proposed
            );
            assert_eq!(
                PaymentLifecycle::assert_transition(current, proposed).is_ok(),
                expected
            );
        }
    }
}

#[test]
fn test_refunded_rejects_every_target() {
    for proposed in PaymentStatus::ALL {
        assert!(!PaymentLifecycle::can_transition(Refunded, proposed));
    }
}

#[test]
fn test_pending_is_only_reachable_from_failed() {
    for current in PaymentStatus::ALL {
        assert_eq!(
            PaymentLifecycle::can_transition(current, Pending),
            current == Failed
        );
    }
}

#[test]
fn test_delete_protection() {
    assert!(PaymentLifecycle::can_delete(Pending));
    assert!(PaymentLifecycle::can_delete(Failed));
    assert!(!PaymentLifecycle::can_delete(Completed));
    assert!(!PaymentLifecycle::can_delete(Refunded));
}

#[test]
fn test_processing_to_pending_scenario() {
    match PaymentLifecycle::assert_transition(Processing, Pending) {
        Err(LifecycleError::InvalidTransition { current, proposed }) => {
            assert_eq!(current, Processing);
            assert_eq!(proposed, Pending);
        }
        other => panic!("expected InvalidTransition, got {:?}", other),
    }
}

#[test]
fn test_plan_update_agrees_with_table() {
    for current in PaymentStatus::ALL {
        for proposed in PaymentStatus::ALL {
            let plan = PaymentLifecycle::plan_update(current, proposed);
            if current == proposed {
                assert_eq!(plan.unwrap(), StatusChange::Unchanged(current));
            } else if EDGES.contains(&(current, proposed)) {
                assert_eq!(
                    plan.unwrap(),
                    StatusChange::Transition {
                        from: current,
                        to: proposed
                    }
                );
            } else {
                assert!(matches!(
                    plan,
                    Err(LifecycleError::InvalidTransition { .. })
                ));
            }
        }
    }
}
