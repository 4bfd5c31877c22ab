//! Nutrition estimation engine
//!
//! Pure functions computing BMR, TDEE and the macronutrient split, plus the
//! stateful calculator session that owns the editable form.

pub mod bmr;
pub mod calculator;
pub mod error;
pub mod macros;
pub mod tdee;
pub mod types;

pub use bmr::{compute_bmr, lean_mass_kg};
pub use calculator::CalculatorSession;
pub use error::{CalcResult, NutritionError, SplitError};
pub use macros::{compute_macros, KCAL_PER_G_CARBS, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN};
pub use tdee::compute_tdee;
pub use types::{
    ActivityLevel, BiometricInput, Formula, Goal, Kcal, MacroSplit, Macros, NutritionResult,
    ProteinGoal, Sex,
};

/// Run the whole pipeline: BMR, goal-adjusted TDEE, then the macro split
pub fn estimate(input: &BiometricInput) -> CalcResult<NutritionResult> {
    let bmr_kcal = compute_bmr(input)?;
    let tdee_kcal = compute_tdee(bmr_kcal, input.activity_level, input.goal);
    let macros = compute_macros(Some(tdee_kcal), input.weight_kg, input.protein_goal, input.split)?;

    Ok(NutritionResult {
        bmr_kcal,
        tdee_kcal,
        macros,
    })
}
