use chrono::{DateTime, NaiveDate, Utc};
use rps_srs::{LeitnerBox, ReviewCard, ReviewOutcome};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Everything the app remembers about a learner's progress.
///
/// Fields this crate does not know about are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    /// Consecutive practice days
    #[serde(default, alias = "odayStreak")]
    pub day_streak: u32,
    /// Last day the learner practiced anything
    #[serde(
        default,
        deserialize_with = "empty_date_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_practice_date: Option<NaiveDate>,
    /// Completed lesson IDs, in completion order
    #[serde(default)]
    pub lessons_completed: Vec<String>,
    /// Flashcard reviews across all cards
    #[serde(default)]
    pub total_reviews: u64,
    /// Flashcard reviews answered correctly
    #[serde(default)]
    pub total_correct: u64,
    #[serde(default)]
    pub quiz_results: Vec<QuizResult>,
    #[serde(default)]
    pub review_cards: Vec<ReviewCard>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Direction of a multiple-choice quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizDirection {
    TagalogToItalian,
    ItalianToTagalog,
}

/// A finished quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub direction: QuizDirection,
    pub total_questions: u32,
    pub correct_answers: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<String>,
}

/// Quiz result as submitted by the caller, before it gets an ID and a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuizResult {
    #[serde(rename = "type")]
    pub direction: QuizDirection,
    pub total_questions: u32,
    pub correct_answers: u32,
    #[serde(default)]
    pub lesson_id: Option<String>,
}

/// Text size preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextSize {
    Normal,
    #[default]
    Malaki,
    MasMalaki,
}

/// User preferences, stored separately from progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub text_size: TextSize,
    pub audio_enabled: bool,
    /// Items per day
    pub daily_goal: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            text_size: TextSize::default(),
            audio_enabled: true,
            daily_goal: 10,
        }
    }
}

impl QuizResult {
    /// Rounded score in percent.
    pub fn score_percent(&self) -> u32 {
        percent(u64::from(self.correct_answers), u64::from(self.total_questions))
    }
}

impl ProgressState {
    /// Track every item of `lesson_id` that has no card yet. Returns the number of new cards.
    pub fn initialize_review_cards<S: AsRef<str>>(
        &mut self,
        lesson_id: &str,
        item_ids: &[S],
        today: NaiveDate,
    ) -> usize {
        rps_srs::initialize_cards(&mut self.review_cards, lesson_id, item_ids, today)
    }

    /// Record a flashcard answer and bump the aggregate counters.
    ///
    /// Does nothing when no card tracks `item_id`.
    pub fn review_card(
        &mut self,
        item_id: &str,
        correct: bool,
        today: NaiveDate,
    ) -> Option<ReviewOutcome> {
        let outcome = rps_srs::review_card(&mut self.review_cards, item_id, correct, today)?;

        self.total_reviews = self.total_reviews.saturating_add(1);
        if correct {
            self.total_correct = self.total_correct.saturating_add(1);
        }

        Some(outcome)
    }

    /// Returns `true` if the lesson was not completed before.
    pub fn mark_lesson_completed(&mut self, lesson_id: &str) -> bool {
        if self.lessons_completed.iter().any(|l| l == lesson_id) {
            return false;
        }
        self.lessons_completed.push(lesson_id.to_string());
        true
    }

    /// Count `today` as a practice day. Returns `false` if it was already counted.
    pub fn update_streak(&mut self, today: NaiveDate) -> bool {
        if self.last_practice_date == Some(today) {
            return false;
        }

        let continues = self.last_practice_date.is_some() && self.last_practice_date == today.pred_opt();
        self.day_streak = if continues {
            self.day_streak.saturating_add(1)
        } else {
            1
        };
        self.last_practice_date = Some(today);
        true
    }

    pub fn add_quiz_result(&mut self, result: NewQuizResult, now: DateTime<Utc>) -> &QuizResult {
        self.quiz_results.push(QuizResult {
            id: Uuid::new_v4().to_string(),
            date: now,
            direction: result.direction,
            total_questions: result.total_questions,
            correct_answers: result.correct_answers,
            lesson_id: result.lesson_id,
        });
        &self.quiz_results[self.quiz_results.len() - 1]
    }

    pub fn due_cards(&self, today: NaiveDate) -> Vec<&ReviewCard> {
        rps_srs::due_cards(&self.review_cards, today)
    }

    pub fn mastered_count(&self) -> usize {
        rps_srs::mastered_count(&self.review_cards)
    }

    pub fn box_distribution(&self) -> [usize; 5] {
        rps_srs::box_distribution(&self.review_cards)
    }

    pub fn card(&self, item_id: &str) -> Option<&ReviewCard> {
        self.review_cards.iter().find(|c| c.item_id == item_id)
    }

    /// Rounded share of correct flashcard reviews, 0 when nothing was reviewed yet.
    pub fn accuracy_percent(&self) -> u32 {
        percent(self.total_correct, self.total_reviews)
    }

    /// The `n` most recent quiz results, newest first.
    pub fn recent_quiz_results(&self, n: usize) -> Vec<&QuizResult> {
        let mut results: Vec<&QuizResult> = self.quiz_results.iter().collect();
        results.sort_by(|a, b| b.date.cmp(&a.date));
        results.truncate(n);
        results
    }
}

/// Per-box summary used by progress views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxCount {
    #[serde(rename = "box")]
    pub leitner_box: LeitnerBox,
    pub label: &'static str,
    pub cards: usize,
}

impl ProgressState {
    pub fn box_counts(&self) -> Vec<BoxCount> {
        self.box_distribution()
            .into_iter()
            .zip(1u8..)
            .map(|(cards, b)| {
                let leitner_box = LeitnerBox::new(b);
                BoxCount {
                    leitner_box,
                    label: leitner_box.label(),
                    cards,
                }
            })
            .collect()
    }
}

fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// Older blobs store "no date" as an empty string; unreadable dates are dropped too.
fn empty_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok()))
}
