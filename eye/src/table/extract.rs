//! Snapshot orchestrator: one screenshot in, one `TableSnapshot` out.
//!
//! The stages run in a fixed order because each consumes the previous
//! stage's output: phase before card extraction, presence before bets and
//! positions, dealer before positions and moves. Every stage is a pure
//! function of the screenshot plus earlier fragments; the snapshot is
//! assembled once at the end and never mutated after.

use layout::{Banks, LayoutProfile, RANK_LABELS, SEATS, SUIT_LABELS};

use super::infer::{self, ActionSignals};
use super::state::{Action, Phase, PlayerRecord, Presence, TableSnapshot};
use crate::cards::{CardLabel, CardReader};
use crate::classify::{BandDetector, Detect, OutlineDetector};
use crate::error::{ExtractError, Result};
use crate::image::Image;
use crate::ocr::TextRead;

/// Community card slots read unconditionally once a flop is detected.
const FLOP_SLOTS: usize = 3;

pub(crate) fn validate_banks(banks: &Banks) -> Result<()> {
    if banks.ranks.len() != RANK_LABELS.len() {
        return Err(ExtractError::BankSizeMismatch {
            bank: "rank",
            got: banks.ranks.len(),
            want: RANK_LABELS.len(),
        });
    }
    if banks.suits.len() != SUIT_LABELS.len() {
        return Err(ExtractError::BankSizeMismatch {
            bank: "suit",
            got: banks.suits.len(),
            want: SUIT_LABELS.len(),
        });
    }
    Ok(())
}

/// What the stack region yielded for one seat.
#[derive(Debug, Clone, Default)]
struct SeatReading {
    stack: String,
    has_all_in: bool,
}

impl SeatReading {
    fn is_present(&self) -> bool {
        !self.stack.is_empty() || self.has_all_in
    }
}

/// Runs the extraction pipeline over single screenshots.
///
/// Holds no per-screenshot state: every `snapshot` call owns its working
/// set, so concurrent extractions just need separate calls.
pub struct TableExtractor<'a> {
    profile: &'a LayoutProfile,
    cards: CardReader<'a>,
    ocr: &'a dyn TextRead,

    stack_text: BandDetector,
    bet_text: BandDetector,
    all_in_text: BandDetector,
    card_back: BandDetector,
    dealer_button: BandDetector,
    card_outline: OutlineDetector,
}

impl<'a> TableExtractor<'a> {
    pub fn new(profile: &'a LayoutProfile, banks: &'a Banks, ocr: &'a dyn TextRead) -> Result<Self> {
        validate_banks(banks)?;
        Ok(Self {
            profile,
            cards: CardReader::new(banks, profile),
            ocr,
            stack_text: BandDetector::new(profile.stack_text),
            bet_text: BandDetector::new(profile.bet_text),
            all_in_text: BandDetector::new(profile.all_in_text),
            card_back: BandDetector::new(profile.card_back),
            dealer_button: BandDetector::new(profile.dealer_button),
            card_outline: OutlineDetector::new(profile.card_outline),
        })
    }

    /// Run the full pipeline over one screenshot.
    pub fn snapshot(&self, shot: Image<'_>) -> Result<TableSnapshot> {
        let (phase, community) = self.board_cards(shot)?;

        let readings = self.seat_stacks(shot)?;
        let seat_present: Vec<bool> = readings.iter().map(SeatReading::is_present).collect();

        // The hero leads the present order regardless of its own reading:
        // it is the seat requesting a decision.
        let mut present = vec![0usize];
        present.extend((1..SEATS).filter(|&s| seat_present[s]));

        let (pot, pot_total) = self.pot_values(shot)?;
        let cards_back = self.card_backs(shot);
        let (bet_visible, bet_texts) = self.seat_bets(shot, &seat_present)?;

        let dealer_seat = self.dealer_seat(shot)?;
        let positions = infer::seat_positions(dealer_seat, &present);

        let mut players = Vec::with_capacity(SEATS);
        for seat in 0..SEATS {
            if !seat_present[seat] {
                players.push(PlayerRecord::absent(seat));
                continue;
            }

            let action = if seat == 0 {
                // The hero has not acted on this snapshot by definition.
                Action::NotPlayed
            } else {
                infer::infer_action(
                    phase,
                    seat,
                    ActionSignals {
                        bet_visible: bet_visible[seat],
                        has_all_in: readings[seat].has_all_in,
                        cards_back: cards_back[seat - 1],
                    },
                    dealer_seat,
                    &present,
                )
            };

            players.push(PlayerRecord {
                seat,
                presence: Presence::Present,
                stack: readings[seat].stack.clone(),
                bet_amount: bet_texts[seat].clone(),
                has_all_in: readings[seat].has_all_in,
                action: Some(action),
                position: positions.map(|p| p[seat]),
            });
        }

        let hero_cards = if seat_present[0] {
            Some(self.hero_cards(shot)?)
        } else {
            None
        };

        Ok(TableSnapshot {
            phase,
            community,
            pot,
            pot_total,
            dealer_seat,
            hero_cards,
            players,
        })
    }

    /// Stage 1: phase plus community cards.
    ///
    /// No card in slot 0 means preflop and nothing else is read. Otherwise
    /// the flop slots are read unconditionally and the turn/river slots only
    /// when their own presence check fires.
    fn board_cards(&self, shot: Image<'_>) -> Result<(Phase, Vec<CardLabel>)> {
        let p = self.profile;

        if !self.card_outline.detect(shot.crop(p.board_card_base)) {
            return Ok((Phase::Preflop, Vec::new()));
        }

        let mut cards = Vec::new();
        for slot in 0..layout::BOARD_SLOTS {
            let dx = slot as u32;
            if slot >= FLOP_SLOTS {
                let crop = shot.crop(p.board_card_base.shifted(dx * p.board_card_shift));
                if !self.card_outline.detect(crop) {
                    continue;
                }
            }

            let rank_crop = shot.crop(p.board_rank_base.shifted(dx * p.board_rank_shift));
            let suit_crop = shot.crop(p.board_suit_base.shifted(dx * p.board_suit_shift));
            cards.push(self.cards.card(rank_crop, suit_crop)?);
        }

        Ok((Phase::Postflop, cards))
    }

    /// Stage 2: stack readings. Presence is a side effect of these: a seat
    /// is present iff its stack read non-empty or its all-in text fired.
    fn seat_stacks(&self, shot: Image<'_>) -> Result<Vec<SeatReading>> {
        let mut readings = Vec::with_capacity(SEATS);
        for (seat, &region) in self.profile.stack_regions.iter().enumerate() {
            let crop = shot.crop(region);
            let reading = if self.stack_text.detect(crop) {
                SeatReading {
                    stack: self.read_value_or_empty(crop, "stack", seat)?,
                    has_all_in: false,
                }
            } else if self.all_in_text.detect(crop) {
                SeatReading {
                    stack: self.read_value_or_empty(crop, "stack", seat)?,
                    has_all_in: true,
                }
            } else {
                SeatReading::default()
            };
            readings.push(reading);
        }
        Ok(readings)
    }

    /// Stage 3: pot values. Two recognized lines are `[pot, pot_total]`;
    /// one line is the pot with an empty total.
    fn pot_values(&self, shot: Image<'_>) -> Result<(String, String)> {
        let crop = shot.crop(self.profile.pot_region);
        let mut lines = self.ocr.read_lines(crop).map_err(ExtractError::TextRead)?;

        if lines.is_empty() {
            // Same recognition-empty policy as the per-seat values.
            tracing::warn!(region = "pot", "recognition returned no text, substituting empty");
            return Ok((String::new(), String::new()));
        }

        if lines.len() == 2 {
            let pot_total = lines.pop().expect("two lines");
            let pot = lines.pop().expect("two lines");
            Ok((pot, pot_total))
        } else {
            Ok((lines.swap_remove(0), String::new()))
        }
    }

    /// Stage 4: card-back visibility for seats 2-5 (the hero's cards are
    /// face up and have no back to check).
    fn card_backs(&self, shot: Image<'_>) -> [bool; SEATS - 1] {
        let mut backs = [false; SEATS - 1];
        for (i, &region) in self.profile.card_back_regions.iter().enumerate() {
            backs[i] = self.card_back.detect(shot.crop(region));
        }
        backs
    }

    /// Stage 5: bet-zone presence and text for present non-hero seats, one
    /// entry per seat so later stages index by seat, never by a cursor.
    fn seat_bets(
        &self,
        shot: Image<'_>,
        seat_present: &[bool],
    ) -> Result<([bool; SEATS], Vec<String>)> {
        let mut visible = [false; SEATS];
        let mut texts = vec![String::new(); SEATS];

        for seat in 1..SEATS {
            if !seat_present[seat] {
                continue;
            }
            let crop = shot.crop(self.profile.bet_regions[seat]);
            if self.bet_text.detect(crop) {
                visible[seat] = true;
                texts[seat] = self.read_value_or_empty(crop, "bet", seat)?;
            }
        }

        Ok((visible, texts))
    }

    /// Stage 6: dealer seat. Exactly one button is visible on a sane
    /// screenshot; finding none is fatal for the whole snapshot.
    fn dealer_seat(&self, shot: Image<'_>) -> Result<usize> {
        for (seat, &region) in self.profile.button_regions.iter().enumerate() {
            if self.dealer_button.detect(shot.crop(region)) {
                return Ok(seat);
            }
        }
        Err(ExtractError::DealerButtonNotFound)
    }

    /// The hero's two hole cards.
    fn hero_cards(&self, shot: Image<'_>) -> Result<[CardLabel; 2]> {
        let p = self.profile;
        let card = |slot: u32| {
            self.cards.card(
                shot.crop(p.hero_rank_base.shifted(slot * p.hero_rank_shift)),
                shot.crop(p.hero_suit_base.shifted(slot * p.hero_suit_shift)),
            )
        };
        Ok([card(0)?, card(1)?])
    }

    fn read_value(&self, crop: Image<'_>, region: &'static str) -> Result<String> {
        let lines = self.ocr.read_lines(crop).map_err(ExtractError::TextRead)?;
        lines
            .into_iter()
            .next()
            .ok_or(ExtractError::RecognitionEmpty { region })
    }

    /// The explicit recognition-empty policy for single-value regions:
    /// substitute empty text, log, keep extracting.
    fn read_value_or_empty(
        &self,
        crop: Image<'_>,
        region: &'static str,
        seat: usize,
    ) -> Result<String> {
        match self.read_value(crop, region) {
            Err(ExtractError::RecognitionEmpty { region }) => {
                tracing::warn!(region, seat, "recognition returned no text, substituting empty");
                Ok(String::new())
            }
            other => other,
        }
    }
}
