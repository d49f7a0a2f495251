//! Queue reconciliation arithmetic
//!
//! Both transfer directions are the same clamped, two-party exchange: the
//! requested quantity is reconciled against the counterpart's outstanding
//! queue depth, and whatever cannot transfer now rolls into the requesting
//! station's own queue so it persists for a future call. Keeping the
//! arithmetic in one pure function keeps both directions honest.

/// Outcome of reconciling one transfer request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    /// What remains in the counterpart's queue after the transfer
    pub counterpart_remaining: i64,

    /// The requesting station's own queue after the transfer
    pub requester_queue: i64,

    /// Quantity that actually moved
    pub transferred: i64,
}

/// Reconcile a request against the counterpart's queue depth
///
/// Shortfall (`available <= requested`): the counterpart queue drains to
/// zero, the unmet portion plus the requester's existing queue becomes the
/// new requester queue, and exactly `available` transfers.
///
/// Sufficient (`available > requested`): the counterpart queue shrinks by
/// `requested` and exactly `requested` transfers. The requester's queue is
/// reset to zero here rather than reduced, discarding `existing_debt`.
/// That matches the system this replaces; callers and tests treat it as a
/// pinned quirk, not an accounting model to extend.
pub fn reconcile(available: i64, requested: i64, existing_debt: i64) -> Reconciliation {
    if available - requested <= 0 {
        Reconciliation {
            counterpart_remaining: 0,
            requester_queue: requested - available + existing_debt,
            transferred: available,
        }
    } else {
        Reconciliation {
            counterpart_remaining: available - requested,
            requester_queue: 0,
            transferred: requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sufficient_supply() {
        let outcome = reconcile(10, 4, 0);
        assert_eq!(outcome.counterpart_remaining, 6);
        assert_eq!(outcome.requester_queue, 0);
        assert_eq!(outcome.transferred, 4);
    }

    #[test]
    fn test_shortfall_rolls_unmet_demand() {
        let outcome = reconcile(3, 4, 0);
        assert_eq!(outcome.counterpart_remaining, 0);
        assert_eq!(outcome.requester_queue, 1);
        assert_eq!(outcome.transferred, 3);
    }

    #[test]
    fn test_shortfall_accumulates_existing_debt() {
        let outcome = reconcile(3, 4, 5);
        assert_eq!(outcome.requester_queue, 4 - 3 + 5);
        assert_eq!(outcome.transferred, 3);
    }

    #[test]
    fn test_exact_match_is_shortfall_branch() {
        let outcome = reconcile(4, 4, 2);
        assert_eq!(outcome.counterpart_remaining, 0);
        assert_eq!(outcome.requester_queue, 2);
        assert_eq!(outcome.transferred, 4);
    }

    #[test]
    fn test_empty_counterpart_transfers_nothing() {
        let outcome = reconcile(0, 7, 1);
        assert_eq!(outcome.counterpart_remaining, 0);
        assert_eq!(outcome.requester_queue, 8);
        assert_eq!(outcome.transferred, 0);
    }

    // Pinned quirk: the sufficient branch resets the requester queue to
    // exactly zero, discarding pre-existing debt instead of carrying it.
    #[test]
    fn test_sufficient_branch_discards_existing_debt() {
        let outcome = reconcile(10, 4, 9);
        assert_eq!(outcome.requester_queue, 0);
        assert_eq!(outcome.transferred, 4);
    }

    #[test]
    fn test_counterpart_conservation() {
        for (available, requested, debt) in [(10, 4, 0), (3, 4, 2), (0, 9, 9), (5, 5, 1)] {
            let outcome = reconcile(available, requested, debt);
            assert_eq!(outcome.counterpart_remaining + outcome.transferred, available);
        }
    }
}
