//! Local persistence for learner progress and settings.
//!
//! State is kept as serialized JSON under a handful of well-known keys in a
//! [`KeyValueStore`]. [`Progress`] wraps a store and runs every operation as a
//! load → mutate → save sequence.

pub mod error;
pub mod file;
pub mod memory;
pub mod models;
pub mod progress;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use models::{
    AppSettings, BoxCount, NewQuizResult, ProgressState, QuizDirection, QuizResult, TextSize,
};
pub use progress::{CompletedLesson, Progress};

/// Key holding the serialized [`ProgressState`].
pub const PROGRESS_KEY: &str = "italiano_progress";
/// Key holding the serialized [`AppSettings`].
pub const SETTINGS_KEY: &str = "italiano_settings";

/// Opaque string storage, one value per key.
pub trait KeyValueStore {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
