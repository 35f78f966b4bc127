use chrono::{DateTime, NaiveDate, Utc};
use rps_srs::ReviewOutcome;
use serde::de::DeserializeOwned;

use crate::{
    AppSettings, KeyValueStore, NewQuizResult, PROGRESS_KEY, ProgressState, QuizResult,
    SETTINGS_KEY, StoreError,
};

/// Result of a lesson completion event.
#[derive(Debug, Clone)]
pub struct CompletedLesson {
    /// Review cards created for items seen for the first time
    pub cards_created: usize,
    pub progress: ProgressState,
}

/// Progress operations on top of a [`KeyValueStore`].
///
/// Loading never fails: missing or unreadable data falls back to the defaults.
/// Saving reports store errors.
#[derive(Debug, Clone)]
pub struct Progress<S> {
    store: S,
}

impl<S: KeyValueStore> Progress<S> {
    /// Wrap `store`; nothing is read until an operation runs.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying key-value store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored progress, or the empty default when it is missing or unreadable.
    pub fn load_progress(&self) -> ProgressState {
        self.load_or_default(PROGRESS_KEY)
    }

    /// Replace the stored progress.
    pub fn save_progress(&self, progress: &ProgressState) -> Result<(), StoreError> {
        self.store
            .set(PROGRESS_KEY, &serde_json::to_string(progress)?)
    }

    /// Stored settings, or the defaults when missing or unreadable.
    pub fn load_settings(&self) -> AppSettings {
        self.load_or_default(SETTINGS_KEY)
    }

    /// Replace the stored settings.
    pub fn save_settings(&self, settings: &AppSettings) -> Result<(), StoreError> {
        self.store
            .set(SETTINGS_KEY, &serde_json::to_string(settings)?)
    }

    /// Load, apply `f`, save. Returns whatever `f` returns.
    pub fn update<T>(&self, f: impl FnOnce(&mut ProgressState) -> T) -> Result<T, StoreError> {
        let mut progress = self.load_progress();
        let value = f(&mut progress);
        self.save_progress(&progress)?;
        Ok(value)
    }

    /// Create review cards for the items of a completed lesson.
    pub fn initialize_review_cards<I: AsRef<str>>(
        &self,
        lesson_id: &str,
        item_ids: &[I],
        today: NaiveDate,
    ) -> Result<usize, StoreError> {
        let created =
            self.update(|p| p.initialize_review_cards(lesson_id, item_ids, today))?;
        tracing::debug!(lesson_id, created, "Initialized review cards");
        Ok(created)
    }

    /// Record a flashcard answer. Nothing is written when `item_id` has no card.
    pub fn review_card(
        &self,
        item_id: &str,
        correct: bool,
        today: NaiveDate,
    ) -> Result<Option<ReviewOutcome>, StoreError> {
        let mut progress = self.load_progress();
        let Some(outcome) = progress.review_card(item_id, correct, today) else {
            tracing::debug!(item_id, "Ignoring review for untracked item");
            return Ok(None);
        };
        self.save_progress(&progress)?;
        Ok(Some(outcome))
    }

    /// Add `lesson_id` to the completed lessons if it is not there yet.
    pub fn mark_lesson_completed(&self, lesson_id: &str) -> Result<ProgressState, StoreError> {
        self.update(|p| {
            p.mark_lesson_completed(lesson_id);
            p.clone()
        })
    }

    /// Count `today` as a practice day. Nothing is written if it already was.
    pub fn update_streak(&self, today: NaiveDate) -> Result<ProgressState, StoreError> {
        let mut progress = self.load_progress();
        if progress.update_streak(today) {
            self.save_progress(&progress)?;
        }
        Ok(progress)
    }

    /// Lesson completion: mark the lesson done, start tracking its items and count
    /// the day towards the streak, in a single write.
    pub fn complete_lesson<I: AsRef<str>>(
        &self,
        lesson_id: &str,
        item_ids: &[I],
        today: NaiveDate,
    ) -> Result<CompletedLesson, StoreError> {
        let completed = self.update(|p| {
            p.mark_lesson_completed(lesson_id);
            let cards_created = p.initialize_review_cards(lesson_id, item_ids, today);
            p.update_streak(today);
            CompletedLesson {
                cards_created,
                progress: p.clone(),
            }
        })?;

        tracing::info!(
            lesson_id,
            cards_created = completed.cards_created,
            "Lesson completed"
        );
        Ok(completed)
    }

    /// Append a quiz result stamped with `now` and a fresh ID.
    pub fn save_quiz_result(
        &self,
        result: NewQuizResult,
        now: DateTime<Utc>,
    ) -> Result<QuizResult, StoreError> {
        self.update(|p| p.add_quiz_result(result, now).clone())
    }

    /// Remove all progress and settings.
    pub fn reset(&self) -> Result<(), StoreError> {
        self.store.remove(PROGRESS_KEY)?;
        self.store.remove(SETTINGS_KEY)?;
        tracing::info!("Progress and settings reset");
        Ok(())
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read stored value, using defaults");
                return T::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "Stored value is corrupt, using defaults");
            T::default()
        })
    }
}
