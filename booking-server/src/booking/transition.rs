//! Reservation status transitions
//!
//! The lifecycle graph lives on [`ReservationStatus::can_transition_to`];
//! this module layers the role policy on top:
//!
//! | actor        | scope                  | allowed targets            |
//! |--------------|------------------------|----------------------------|
//! | customer     | own reservations only  | `cancelled`                |
//! | shop_admin   | own shop only          | any legal edge             |
//! | super_admin  | everything             | any legal edge             |
//!
//! `completed` and `cancelled` are terminal for everyone.

use shared::models::{Reservation, ReservationStatus};

use super::{Actor, BookingError};

/// Authorize one status transition.
///
/// Setting the current status again is a no-op (used for notes-only
/// updates by administrators) and passes for anyone the role policy lets
/// touch the reservation at all.
pub fn authorize_transition(
    actor: &Actor,
    reservation: &Reservation,
    next: ReservationStatus,
) -> Result<(), BookingError> {
    // Role policy first: who may touch this reservation, and how far
    match actor {
        Actor::Guest => return Err(BookingError::Denied("Authentication required")),
        Actor::Customer { user_id } => {
            if reservation.user_id != Some(*user_id) {
                return Err(BookingError::Denied("Not your reservation"));
            }
            if next != ReservationStatus::Cancelled && next != reservation.status {
                return Err(BookingError::Denied("Customers may only cancel"));
            }
        }
        Actor::ShopAdmin { shop_id, .. } => {
            if reservation.shop_id != *shop_id {
                return Err(BookingError::Denied("Reservation belongs to another shop"));
            }
        }
        Actor::SuperAdmin { .. } => {}
    }

    // No-op transition: allowed (notes update), nothing to check
    if next == reservation.status {
        return Ok(());
    }

    // Lifecycle graph
    if !reservation.status.can_transition_to(next) {
        return Err(BookingError::IllegalTransition {
            from: reservation.status,
            to: next,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    fn reservation(shop_id: i64, user_id: Option<i64>, status: ReservationStatus) -> Reservation {
        Reservation {
            id: 1,
            shop_id,
            user_id,
            customer_name: "Bat".into(),
            customer_phone: None,
            customer_email: None,
            reservation_date: "2025-06-01".into(),
            reservation_time: "09:00".into(),
            slot_seq: 0,
            status,
            notes: None,
            created_at: 0,
            shop_name: None,
        }
    }

    #[test]
    fn lifecycle_graph_edges() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));

        // terminal states have no outgoing edges
        for next in [Pending, Confirmed, Completed, Cancelled] {
            assert!(!Completed.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
        // no skipping pending -> completed
        assert!(!Pending.can_transition_to(Completed));
    }

    #[test]
    fn customer_may_cancel_own_reservation_only() {
        let owner = Actor::Customer { user_id: 7 };
        let stranger = Actor::Customer { user_id: 8 };
        let r = reservation(1, Some(7), Pending);

        assert!(authorize_transition(&owner, &r, Cancelled).is_ok());
        assert!(matches!(
            authorize_transition(&stranger, &r, Cancelled),
            Err(BookingError::Denied(_))
        ));
        assert!(matches!(
            authorize_transition(&owner, &r, Confirmed),
            Err(BookingError::Denied(_))
        ));

        // confirmed -> cancelled still open to the customer
        let r = reservation(1, Some(7), Confirmed);
        assert!(authorize_transition(&owner, &r, Cancelled).is_ok());
    }

    #[test]
    fn shop_admin_is_scoped_to_their_shop() {
        let admin = Actor::ShopAdmin { user_id: 1, shop_id: 1 };
        let r = reservation(1, None, Pending);
        assert!(authorize_transition(&admin, &r, Confirmed).is_ok());

        let foreign = reservation(2, None, Pending);
        assert!(matches!(
            authorize_transition(&admin, &foreign, Confirmed),
            Err(BookingError::Denied(_))
        ));
    }

    #[test]
    fn terminal_states_stay_terminal_even_for_super_admin() {
        let root = Actor::SuperAdmin { user_id: 1 };
        let r = reservation(1, None, Cancelled);
        assert!(matches!(
            authorize_transition(&root, &r, Pending),
            Err(BookingError::IllegalTransition { .. })
        ));
        let r = reservation(1, None, Completed);
        assert!(matches!(
            authorize_transition(&root, &r, Confirmed),
            Err(BookingError::IllegalTransition { .. })
        ));
    }

    #[test]
    fn same_status_is_a_noop_for_authorized_actors() {
        let admin = Actor::ShopAdmin { user_id: 1, shop_id: 1 };
        let r = reservation(1, None, Confirmed);
        assert!(authorize_transition(&admin, &r, Confirmed).is_ok());

        let guest = Actor::Guest;
        assert!(matches!(
            authorize_transition(&guest, &r, Confirmed),
            Err(BookingError::Denied(_))
        ));
    }
}
