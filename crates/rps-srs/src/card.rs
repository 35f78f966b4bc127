use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{LeitnerBox, next_review_date};

/// Review state of a single vocabulary or phrase item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCard {
    /// Item being tracked, unique across the collection
    pub item_id: String,
    /// Lesson that introduced the item
    pub lesson_id: String,
    #[serde(rename = "box", default)]
    pub leitner_box: LeitnerBox,
    /// First day on which the card is due again
    pub next_review_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<NaiveDate>,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub incorrect_count: u32,
}

/// What a single review did to a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcome {
    /// Whether the answer was right
    pub correct: bool,
    /// Box before the review
    pub previous_box: LeitnerBox,
    /// Box after moving one step up or down
    pub new_box: LeitnerBox,
    /// Rescheduled due day, from the interval of `new_box`
    pub next_review_date: NaiveDate,
}

impl ReviewCard {
    /// A fresh box-1 card, due on `today`.
    pub fn new(item_id: impl Into<String>, lesson_id: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            item_id: item_id.into(),
            lesson_id: lesson_id.into(),
            leitner_box: LeitnerBox::MIN,
            next_review_date: today,
            last_reviewed: None,
            correct_count: 0,
            incorrect_count: 0,
        }
    }

    /// Due when the scheduled day is `today` or earlier.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review_date <= today
    }

    /// Apply one review: move one box, bump the matching counter and reschedule from
    /// `today` using the interval of the new box.
    pub fn record(&mut self, correct: bool, today: NaiveDate) -> ReviewOutcome {
        let previous_box = self.leitner_box;

        if correct {
            self.correct_count = self.correct_count.saturating_add(1);
            self.leitner_box = previous_box.promote();
        } else {
            self.incorrect_count = self.incorrect_count.saturating_add(1);
            self.leitner_box = previous_box.demote();
        }

        self.last_reviewed = Some(today);
        self.next_review_date = next_review_date(self.leitner_box, today);

        ReviewOutcome {
            correct,
            previous_box,
            new_box: self.leitner_box,
            next_review_date: self.next_review_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_json_shape() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let mut card = ReviewCard::new("ciao", "saluti", today);

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "itemId": "ciao",
                "lessonId": "saluti",
                "box": 1,
                "nextReviewDate": "2025-01-31",
                "correctCount": 0,
                "incorrectCount": 0
            })
        );

        card.record(true, today);
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["box"], 2);
        assert_eq!(json["lastReviewed"], "2025-01-31");
        assert_eq!(json["nextReviewDate"], "2025-02-02");
    }

    #[test]
    fn test_out_of_range_box_is_clamped_on_load() {
        let card: ReviewCard = serde_json::from_str(
            r#"{"itemId":"a","lessonId":"L1","box":7,"nextReviewDate":"2025-01-01","correctCount":3,"incorrectCount":0}"#,
        )
        .unwrap();
        assert_eq!(card.leitner_box, LeitnerBox::MAX);

        let card: ReviewCard = serde_json::from_str(
            r#"{"itemId":"a","lessonId":"L1","box":0,"nextReviewDate":"2025-01-01"}"#,
        )
        .unwrap();
        assert_eq!(card.leitner_box, LeitnerBox::MIN);
        assert_eq!(card.correct_count, 0);
    }

    #[test]
    fn test_record_saturating_counters() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut card = ReviewCard::new("a", "L1", today);
        card.correct_count = u32::MAX;

        card.record(true, today);
        assert_eq!(card.correct_count, u32::MAX);
    }
}
