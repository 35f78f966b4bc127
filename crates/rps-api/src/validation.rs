use rps_store::{AppSettings, NewQuizResult};

use crate::error::ApiError;

/// Upper bound for the daily goal setting
pub const MAX_DAILY_GOAL: u32 = 100;

/// Item identifiers must be non-blank.
///
/// # Examples
/// ```
/// use rps_api::validation::validate_item_ids;
///
/// assert!(validate_item_ids(&["ciao".to_string()]).is_ok());
/// assert!(validate_item_ids(&[" ".to_string()]).is_err());
/// ```
pub fn validate_item_ids(item_ids: &[String]) -> Result<(), ApiError> {
    if let Some(pos) = item_ids.iter().position(|id| id.trim().is_empty()) {
        return Err(ApiError::Validation(format!(
            "Item ID at position {pos} is empty"
        )));
    }
    Ok(())
}

pub fn validate_quiz_result(result: &NewQuizResult) -> Result<(), ApiError> {
    if result.total_questions == 0 {
        return Err(ApiError::Validation(
            "A quiz must have at least one question".to_string(),
        ));
    }

    if result.correct_answers > result.total_questions {
        return Err(ApiError::Validation(format!(
            "Correct answers ({}) cannot exceed total questions ({})",
            result.correct_answers, result.total_questions
        )));
    }

    Ok(())
}

pub fn validate_settings(settings: &AppSettings) -> Result<(), ApiError> {
    if !(1..=MAX_DAILY_GOAL).contains(&settings.daily_goal) {
        return Err(ApiError::Validation(format!(
            "Daily goal must be between 1 and {MAX_DAILY_GOAL}"
        )));
    }
    Ok(())
}
