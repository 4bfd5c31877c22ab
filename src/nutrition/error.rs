//! Nutrition engine errors

use thiserror::Error;

/// Errors raised by the estimation engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NutritionError {
    /// A formula needs an input the caller did not supply
    #[error("Missing required input: {0}")]
    MissingRequiredInput(&'static str),

    /// Macros were requested before a TDEE was calculated
    #[error("Calories must be calculated before macros")]
    PrecursorMissing,
}

impl NutritionError {
    /// Katch-McArdle selected without a body fat percentage
    pub fn missing_body_fat() -> Self {
        NutritionError::MissingRequiredInput("body_fat_percent")
    }
}

/// A carb/fat split that cannot be represented
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitError {
    #[error("{field} must be between 0 and 100, got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("carb_percent and fat_percent must add up to 100, got {carb_percent} + {fat_percent}")]
    Unbalanced { carb_percent: f64, fat_percent: f64 },
}

/// Result type for engine operations
pub type CalcResult<T> = Result<T, NutritionError>;
