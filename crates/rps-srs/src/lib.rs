//! SRS (Spaced Repetition System) library for Repaso
//!
//! This crate implements the Leitner box scheduler used to plan vocabulary reviews.
//! Cards start in box 1 when their lesson is completed, move up one box on a correct
//! answer and down one box on a wrong answer, and become due again after the interval
//! attached to their new box.
//!
//! Every function takes the current date as an argument. Nothing here reads the clock.

mod card;

pub use card::{ReviewCard, ReviewOutcome};

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Review intervals in days, indexed by box value.
///
/// Index 0 is never used. Box 1 maps to 0 days, box 2 to 2, box 3 to 4, box 4 to 8 and
/// box 5 to 16.
pub const BOX_INTERVALS: [u64; 6] = [0, 0, 2, 4, 8, 16];

/// Cards in this box or above count as mastered.
pub const MASTERED_BOX: u8 = 4;

/// A Leitner box number, always within `[LeitnerBox::MIN, LeitnerBox::MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct LeitnerBox(u8);

impl LeitnerBox {
    /// Lowest box, where new and forgotten cards live.
    pub const MIN: Self = Self(1);
    /// Highest box.
    pub const MAX: Self = Self(5);

    /// Build a box, clamping `value` into `[1, 5]`.
    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    /// Box number, always within `1..=5`.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Move up one box, saturating at box 5.
    pub fn promote(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// Move down one box, saturating at box 1.
    pub fn demote(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }

    /// Days until the next review for a card sitting in this box.
    pub const fn interval_days(self) -> u64 {
        BOX_INTERVALS[self.0 as usize]
    }

    /// Box 4 and 5 cards count as mastered.
    pub const fn is_mastered(self) -> bool {
        self.0 >= MASTERED_BOX
    }

    /// Learner-facing label for the box.
    pub const fn label(self) -> &'static str {
        match self.0 {
            1 => "Bago",
            2 => "Natutunan",
            3 => "Pamilyar",
            4 => "Magaling",
            _ => "Master",
        }
    }
}

impl Default for LeitnerBox {
    fn default() -> Self {
        Self::MIN
    }
}

// Stored blobs may carry any integer here; clamp instead of rejecting the whole state.
impl From<i64> for LeitnerBox {
    fn from(value: i64) -> Self {
        Self::new(value.clamp(0, i64::from(u8::MAX)) as u8)
    }
}

impl From<LeitnerBox> for u8 {
    fn from(value: LeitnerBox) -> Self {
        value.0
    }
}

/// Compute the next review date for a card that has just landed in `leitner_box`.
pub fn next_review_date(leitner_box: LeitnerBox, today: NaiveDate) -> NaiveDate {
    today
        .checked_add_days(Days::new(leitner_box.interval_days()))
        .unwrap_or(NaiveDate::MAX)
}

/// Create box-1 cards for every item of a completed lesson that is not tracked yet.
///
/// Existing cards are left untouched, so completing the same lesson again is a no-op.
/// Returns the number of cards created.
pub fn initialize_cards<S: AsRef<str>>(
    cards: &mut Vec<ReviewCard>,
    lesson_id: &str,
    item_ids: &[S],
    today: NaiveDate,
) -> usize {
    let mut tracked: HashSet<String> = cards.iter().map(|c| c.item_id.clone()).collect();
    let before = cards.len();

    for item_id in item_ids {
        let item_id = item_id.as_ref();
        if tracked.insert(item_id.to_string()) {
            cards.push(ReviewCard::new(item_id, lesson_id, today));
        }
    }

    cards.len() - before
}

/// Cards whose next review date is today or earlier, in stored order.
pub fn due_cards(cards: &[ReviewCard], today: NaiveDate) -> Vec<&ReviewCard> {
    cards.iter().filter(|c| c.is_due(today)).collect()
}

/// Record a review outcome for `item_id`.
///
/// Unknown items are ignored and yield `None`; a lesson may have been edited since its
/// cards were created.
pub fn review_card(
    cards: &mut [ReviewCard],
    item_id: &str,
    correct: bool,
    today: NaiveDate,
) -> Option<ReviewOutcome> {
    cards
        .iter_mut()
        .find(|c| c.item_id == item_id)
        .map(|card| card.record(correct, today))
}

/// Number of cards in box 4 or higher.
pub fn mastered_count(cards: &[ReviewCard]) -> usize {
    cards.iter().filter(|c| c.leitner_box.is_mastered()).count()
}

/// Number of cards per box; index 0 holds box 1.
pub fn box_distribution(cards: &[ReviewCard]) -> [usize; 5] {
    let mut counts = [0; 5];
    for card in cards {
        counts[usize::from(card.leitner_box.get()) - 1] += 1;
    }
    counts
}
