//! Symbolic table state: what one screenshot resolves to.
//!
//! A snapshot and its per-seat records are created fresh per extraction,
//! fully populated by one pass of the pipeline, and never mutated after.

use crate::cards::CardLabel;

/// Betting round, derived from community-card presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Preflop,
    Postflop,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Preflop => "preflop",
            Phase::Postflop => "postflop",
        }
    }
}

/// Whether a seat is occupied by an active player. Derived from the stack
/// reading, not observed directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    Absent,
}

/// A seat's inferred action this betting round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Bet,
    AllIn,
    Check,
    Fold,
    /// Seat order says this player has not had a turn yet.
    NotPlayed,
    /// Seat bookkeeping was inconsistent; nothing could be inferred.
    Unknown,
}

impl Action {
    /// Wire encoding consumed by the downstream reasoning service.
    pub fn code(self) -> &'static str {
        match self {
            Action::Bet => "B",
            Action::AllIn => "B-ALLIN",
            Action::Check => "C",
            Action::Fold => "F",
            Action::NotPlayed => "NP",
            Action::Unknown => "unknown",
        }
    }
}

/// Table position relative to the dealer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Dealer,
    SmallBlind,
    BigBlind,
    Other,
    Absent,
}

impl Position {
    pub fn label(self) -> &'static str {
        match self {
            Position::Dealer => "D",
            Position::SmallBlind => "SB",
            Position::BigBlind => "BB",
            Position::Other => "Other",
            Position::Absent => "absent",
        }
    }
}

/// Everything the pipeline resolved about one seat.
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    /// Fixed seat index; seat 0 is the hero.
    pub seat: usize,
    pub presence: Presence,
    /// Recognized stack text, or empty.
    pub stack: String,
    /// Recognized bet text, or empty.
    pub bet_amount: String,
    pub has_all_in: bool,
    /// Unset for absent seats and for snapshots where inference degraded.
    pub action: Option<Action>,
    /// Unset when position assignment was skipped (dealer inconsistency).
    pub position: Option<Position>,
}

impl PlayerRecord {
    pub fn absent(seat: usize) -> Self {
        Self {
            seat,
            presence: Presence::Absent,
            stack: String::new(),
            bet_amount: String::new(),
            has_all_in: false,
            action: None,
            position: None,
        }
    }

    pub fn is_present(&self) -> bool {
        self.presence == Presence::Present
    }
}

/// The complete symbolic state derived from one screenshot.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    pub phase: Phase,
    /// 0, 3, 4 or 5 community cards in slot order.
    pub community: Vec<CardLabel>,
    pub pot: String,
    /// Empty when the pot region yielded a single value.
    pub pot_total: String,
    pub dealer_seat: usize,
    /// The hero's two hole cards; unset when the hero seat is absent.
    pub hero_cards: Option<[CardLabel; 2]>,
    /// One record per seat, seat order.
    pub players: Vec<PlayerRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_codes_match_the_wire_format() {
        assert_eq!(Action::Bet.code(), "B");
        assert_eq!(Action::AllIn.code(), "B-ALLIN");
        assert_eq!(Action::Check.code(), "C");
        assert_eq!(Action::Fold.code(), "F");
        assert_eq!(Action::NotPlayed.code(), "NP");
        assert_eq!(Action::Unknown.code(), "unknown");
    }

    #[test]
    fn position_labels_match_the_wire_format() {
        assert_eq!(Position::Dealer.label(), "D");
        assert_eq!(Position::SmallBlind.label(), "SB");
        assert_eq!(Position::BigBlind.label(), "BB");
        assert_eq!(Position::Other.label(), "Other");
        assert_eq!(Position::Absent.label(), "absent");
    }
}
