//! Profile Tools
//!
//! Save the calculator's targets to the profile store and read them back.

use serde::Serialize;

use crate::models::{ProfileStore, ProfileTargets, ProfileTargetsUpdate};
use crate::nutrition::{CalculatorSession, NutritionError};

/// Response for save_targets_to_profile
#[derive(Debug, Serialize)]
pub struct SaveTargetsResponse {
    pub success: bool,
    pub targets: ProfileTargets,
    pub message: String,
}

/// Response for get_profile_targets
#[derive(Debug, Serialize)]
pub struct GetTargetsResponse {
    pub targets: Option<ProfileTargets>,
    pub as_of: String,
}

/// Persist the session's last calories and macro grams
pub fn save_targets_to_profile<S: ProfileStore>(
    store: &S,
    session: &CalculatorSession,
) -> Result<SaveTargetsResponse, String> {
    let snapshot = session.targets().map_err(|e| match e {
        NutritionError::PrecursorMissing => {
            "Calculate calories and macros first (calculate_calories)".to_string()
        }
        other => other.to_string(),
    })?;

    let data = ProfileTargetsUpdate::from(snapshot);
    let targets = store
        .save_targets(&data)
        .map_err(|e| format!("Failed to save profile targets: {}", e))?;

    tracing::info!(calories = targets.last_calories, "saved targets to profile");

    Ok(SaveTargetsResponse {
        success: true,
        message: format!(
            "Saved {:.2} kcal, {:.2} g protein, {:.2} g carbs, {:.2} g fat",
            targets.last_calories, targets.last_protein, targets.last_carbs, targets.last_fats
        ),
        targets,
    })
}

/// Read the saved targets
pub fn get_profile_targets<S: ProfileStore>(store: &S) -> Result<GetTargetsResponse, String> {
    let targets = store
        .load_targets()
        .map_err(|e| format!("Failed to load profile targets: {}", e))?;
    Ok(GetTargetsResponse {
        targets,
        as_of: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
    })
}
