//! Rendering a snapshot into the structured text blocks the downstream
//! reasoning service consumes.
//!
//! The line templates are a wire format: the consumer prompt was written
//! against them, so they are preserved character for character.

use serde::Serialize;

use super::state::{Phase, Position, TableSnapshot};

/// One block of lines about a single subject (a seat, or the table).
pub type TextBlock = Vec<String>;

/// The rendered snapshot: one block per seat in seat order, plus the table
/// block (phase, community cards, pot).
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotMessage {
    pub players: Vec<TextBlock>,
    pub table: TextBlock,
}

/// Render a snapshot. Infallible: degraded snapshots (unset positions)
/// render with the `unknown` placeholder rather than losing the line shape.
pub fn render(snapshot: &TableSnapshot) -> SnapshotMessage {
    let players = snapshot.players.iter().map(|player| {
        let n = player.seat + 1;

        if !player.is_present() {
            return vec![format!("Player {n} - Status: absent")];
        }

        let mut parts = vec![format!("Player {n}"), "Status: present".to_string()];
        if player.seat != 0 {
            let code = player.action.map(|a| a.code()).unwrap_or("unknown");
            parts.push(format!("Move: {code}"));
        }
        parts.push(format!("Position: {}", position_label(player.position)));

        let mut block = vec![parts.join(" - ")];

        if !player.has_all_in && !player.stack.is_empty() {
            block.push(format!("Stack: {}", player.stack));
        }
        if !player.bet_amount.is_empty() {
            block.push(format!("Bet: {}", player.bet_amount));
        }

        if player.seat == 0 {
            if let Some(cards) = &snapshot.hero_cards {
                let cards = cards.iter().map(|c| c.to_string()).collect::<Vec<_>>();
                block.push(format!("Player1 cards: {}", cards.join(", ")));
            }
        }

        block
    });

    let mut table = vec![snapshot.phase.label().to_string()];
    if snapshot.phase == Phase::Postflop {
        let cards = snapshot.community.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        table.push(cards.join(", "));
    }
    table.push(format!(
        "Pot {} and Pot total {}",
        snapshot.pot, snapshot.pot_total
    ));

    SnapshotMessage {
        players: players.collect(),
        table,
    }
}

fn position_label(position: Option<Position>) -> &'static str {
    position.map(Position::label).unwrap_or("unknown")
}
