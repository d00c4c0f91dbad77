//! Order status pipeline tests.

use menulane_core::OrderStatus;

#[test]
fn pipeline_moves_strictly_forward() {
    use OrderStatus::{Completed, Confirmed, Pending, Preparing, Ready};

    assert!(Pending.can_transition_to(Confirmed));
    assert!(Confirmed.can_transition_to(Preparing));
    assert!(Preparing.can_transition_to(Ready));
    assert!(Ready.can_transition_to(Completed));

    // No skipping ahead.
    assert!(!Pending.can_transition_to(Preparing));
    assert!(!Pending.can_transition_to(Completed));
    assert!(!Confirmed.can_transition_to(Ready));

    // No moving backwards.
    assert!(!Ready.can_transition_to(Preparing));
    assert!(!Confirmed.can_transition_to(Pending));
}

#[test]
fn cancellation_is_allowed_from_any_open_state() {
    use OrderStatus::{Cancelled, Confirmed, Pending, Preparing, Ready};

    for open in [Pending, Confirmed, Preparing, Ready] {
        assert!(open.can_transition_to(Cancelled), "{open} should be cancellable");
    }
}

#[test]
fn terminal_states_accept_nothing() {
    use OrderStatus::{Cancelled, Completed, Confirmed, Pending, Preparing, Ready};

    for terminal in [Completed, Cancelled] {
        assert!(terminal.is_terminal());
        for next in [Pending, Confirmed, Preparing, Ready, Completed, Cancelled] {
            assert!(!terminal.can_transition_to(next));
        }
    }
}

#[test]
fn new_orders_start_pending() {
    assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    assert!(!OrderStatus::Pending.is_terminal());
}
