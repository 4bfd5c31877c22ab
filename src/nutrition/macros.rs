//! Macronutrient distribution
//!
//! Protein is allocated first from body weight; whatever energy remains is
//! split between carbohydrates and fat.

use super::error::{CalcResult, NutritionError};
use super::types::{Kcal, MacroSplit, Macros, ProteinGoal};

/// Kilocalories per gram of protein
pub const KCAL_PER_G_PROTEIN: f64 = 4.1;
/// Kilocalories per gram of carbohydrate
pub const KCAL_PER_G_CARBS: f64 = 4.1;
/// Kilocalories per gram of fat
pub const KCAL_PER_G_FAT: f64 = 9.3;

/// Distribute `tdee` into protein, carbohydrate and fat.
///
/// `tdee` is `None` until calories have been calculated, which fails with
/// [`NutritionError::PrecursorMissing`]. Remaining calories after protein
/// are not clamped, so a low target with a high protein allocation yields
/// negative carb and fat figures.
pub fn compute_macros(
    tdee: Option<Kcal>,
    weight_kg: f64,
    protein_goal: ProteinGoal,
    split: MacroSplit,
) -> CalcResult<Macros> {
    let tdee = tdee.ok_or(NutritionError::PrecursorMissing)?;

    let protein_kcal = protein_goal.grams_per_kg() * weight_kg * KCAL_PER_G_PROTEIN;
    let remaining_kcal = tdee - protein_kcal;

    let carb_kcal = remaining_kcal * (split.carb_percent() / 100.0);
    let fat_kcal = remaining_kcal * (split.fat_percent() / 100.0);

    Ok(Macros {
        protein_g: protein_kcal / KCAL_PER_G_PROTEIN,
        protein_kcal,
        carb_g: carb_kcal / KCAL_PER_G_CARBS,
        carb_kcal,
        fat_g: fat_kcal / KCAL_PER_G_FAT,
        fat_kcal,
    })
}
