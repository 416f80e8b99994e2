//! Turn and position inference.
//!
//! Pure functions over the present-seat order. The present list always
//! starts with the hero (seat 0) followed by the other present seats in
//! seat order; both blind placement and the acted-yet cutoff walk that list
//! cyclically from the dealer.

use layout::SEATS;

use super::state::{Action, Phase, Position};

/// Visual signals an action is inferred from.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionSignals {
    /// Yellow bet text visible in the seat's bet zone.
    pub bet_visible: bool,
    /// Red all-in text was detected on the stack.
    pub has_all_in: bool,
    /// Card backs still visible (the seat has not folded).
    pub cards_back: bool,
}

/// Assign a position to every seat given the dealer and the present order.
///
/// The seat after the dealer (cyclically, within the present list) is the
/// small blind, the one after that the big blind; remaining present seats
/// are `Other` and absent seats `Absent`. Returns `None` — positions stay
/// unset for the whole snapshot — when the dealer seat is missing from the
/// present list, which means the button detection and the presence
/// derivation disagree.
pub fn seat_positions(dealer_seat: usize, present: &[usize]) -> Option<[Position; SEATS]> {
    let dealer_pos = match present.iter().position(|&s| s == dealer_seat) {
        Some(pos) => pos,
        None => {
            tracing::warn!(dealer_seat, "dealer not among present seats; skipping position assignment");
            return None;
        }
    };

    let sb_seat = present[(dealer_pos + 1) % present.len()];
    let bb_seat = present[(dealer_pos + 2) % present.len()];

    let mut positions = [Position::Absent; SEATS];
    for seat in 0..SEATS {
        if !present.contains(&seat) {
            continue;
        }
        positions[seat] = if seat == dealer_seat {
            Position::Dealer
        } else if seat == bb_seat {
            Position::BigBlind
        } else if seat == sb_seat {
            Position::SmallBlind
        } else {
            Position::Other
        };
    }
    Some(positions)
}

/// Infer one present seat's action this betting round.
///
/// A seat has acted iff its index in the present order is strictly after
/// the reference index: the big blind preflop, the dealer postflop. Seats
/// that have not acted are `NotPlayed`; for the rest, a visible bet wins
/// over card backs, and neither means a fold.
pub fn infer_action(
    phase: Phase,
    seat: usize,
    signals: ActionSignals,
    dealer_seat: usize,
    present: &[usize],
) -> Action {
    let (dealer_pos, seat_pos) = match (
        present.iter().position(|&s| s == dealer_seat),
        present.iter().position(|&s| s == seat),
    ) {
        (Some(d), Some(p)) => (d, p),
        _ => {
            tracing::warn!(dealer_seat, seat, "dealer or seat not among present seats");
            return Action::Unknown;
        }
    };

    let has_acted = match phase {
        Phase::Preflop => {
            let bb_pos = (dealer_pos + 2) % present.len();
            seat_pos > bb_pos
        }
        Phase::Postflop => seat_pos > dealer_pos,
    };

    if !has_acted {
        return Action::NotPlayed;
    }

    if signals.bet_visible {
        if signals.has_all_in {
            Action::AllIn
        } else {
            Action::Bet
        }
    } else if signals.cards_back {
        Action::Check
    } else {
        Action::Fold
    }
}
