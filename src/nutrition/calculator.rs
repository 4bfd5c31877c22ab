//! Calculator session
//!
//! Holds the editable calculator form between tool calls. The form is a
//! draft [`BiometricInput`]; each calculation takes a copy of it, so the
//! engine only ever sees immutable input.

use serde::Serialize;

use super::bmr::compute_bmr;
use super::error::{CalcResult, NutritionError};
use super::macros::compute_macros;
use super::tdee::compute_tdee;
use super::types::{
    ActivityLevel, BiometricInput, Formula, Goal, Kcal, Macros, ProteinGoal, Sex,
};

/// Calories and macro grams ready to be written to a profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetSnapshot {
    pub calories: Kcal,
    pub protein_g: f64,
    pub carb_g: f64,
    pub fat_g: f64,
}

/// Editable calculator form plus the last calculated energy figures
#[derive(Debug, Clone, Default, Serialize)]
pub struct CalculatorSession {
    draft: BiometricInput,
    last_bmr: Option<Kcal>,
    last_tdee: Option<Kcal>,
}

impl CalculatorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current form contents
    pub fn draft(&self) -> &BiometricInput {
        &self.draft
    }

    pub fn last_bmr(&self) -> Option<Kcal> {
        self.last_bmr
    }

    pub fn last_tdee(&self) -> Option<Kcal> {
        self.last_tdee
    }

    // --- Field setters ---

    pub fn set_formula(&mut self, formula: Formula) {
        self.draft.formula = formula;
    }

    pub fn set_sex(&mut self, sex: Sex) {
        self.draft.sex = sex;
    }

    pub fn set_age_years(&mut self, age_years: u32) {
        self.draft.age_years = age_years;
    }

    pub fn set_weight_kg(&mut self, weight_kg: f64) {
        self.draft.weight_kg = weight_kg;
    }

    pub fn set_height_cm(&mut self, height_cm: f64) {
        self.draft.height_cm = height_cm;
    }

    pub fn set_body_fat_percent(&mut self, body_fat_percent: Option<f64>) {
        self.draft.body_fat_percent = body_fat_percent;
    }

    pub fn set_activity_level(&mut self, activity_level: ActivityLevel) {
        self.draft.activity_level = activity_level;
    }

    pub fn set_goal(&mut self, goal: Goal) {
        self.draft.goal = goal;
    }

    pub fn set_protein_goal(&mut self, protein_goal: ProteinGoal) {
        self.draft.protein_goal = protein_goal;
    }

    /// Set the carbohydrate share; fat becomes `100 - value`
    pub fn set_carb_percent(&mut self, value: f64) {
        self.draft.split.set_carb_percent(value);
    }

    /// Set the fat share; carbohydrates become `100 - value`
    pub fn set_fat_percent(&mut self, value: f64) {
        self.draft.split.set_fat_percent(value);
    }

    // --- Calculations ---

    /// Compute BMR and goal-adjusted TDEE from the current form.
    ///
    /// On error the previous results are left in place.
    pub fn calculate_calories(&mut self) -> CalcResult<(Kcal, Kcal)> {
        let input = self.draft;
        let bmr = compute_bmr(&input)?;
        let tdee = compute_tdee(bmr, input.activity_level, input.goal);

        tracing::debug!(
            formula = input.formula.as_str(),
            bmr,
            tdee,
            "calculated calories"
        );

        self.last_bmr = Some(bmr);
        self.last_tdee = Some(tdee);
        Ok((bmr, tdee))
    }

    /// Macro split of the last TDEE using the current weight, protein goal
    /// and carb/fat split
    pub fn macros(&self) -> CalcResult<Macros> {
        compute_macros(
            self.last_tdee,
            self.draft.weight_kg,
            self.draft.protein_goal,
            self.draft.split,
        )
    }

    /// Calorie and gram targets for saving to a profile
    pub fn targets(&self) -> CalcResult<TargetSnapshot> {
        let calories = self.last_tdee.ok_or(NutritionError::PrecursorMissing)?;
        let macros = self.macros()?;

        Ok(TargetSnapshot {
            calories,
            protein_g: macros.protein_g,
            carb_g: macros.carb_g,
            fat_g: macros.fat_g,
        })
    }

    /// Clear the form and any calculated values
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_session() -> CalculatorSession {
        let mut session = CalculatorSession::new();
        session.set_age_years(30);
        session.set_weight_kg(80.0);
        session.set_height_cm(180.0);
        session.set_activity_level(ActivityLevel::Moderate);
        session
    }

    #[test]
    fn test_defaults_match_blank_form() {
        let session = CalculatorSession::new();
        let draft = session.draft();
        assert_eq!(draft.formula, Formula::MifflinStJeor);
        assert_eq!(draft.sex, Sex::Male);
        assert_eq!(draft.age_years, 0);
        assert_eq!(draft.activity_level, ActivityLevel::Sedentary);
        assert_eq!(draft.protein_goal, ProteinGoal::Healthy);
        assert_eq!(draft.goal, Goal::Maintain);
        assert_eq!(draft.split.carb_percent(), 50.0);
        assert_eq!(session.last_tdee(), None);
    }

    #[test]
    fn test_paired_percent_setters() {
        let mut session = CalculatorSession::new();
        session.set_carb_percent(70.0);
        assert_eq!(session.draft().split.fat_percent(), 30.0);

        session.set_fat_percent(45.0);
        assert_eq!(session.draft().split.carb_percent(), 55.0);

        for value in [0.0, 12.5, 33.3, 100.0] {
            session.set_carb_percent(value);
            let split = session.draft().split;
            assert!((split.carb_percent() + split.fat_percent() - 100.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_macros_before_calculation() {
        let session = filled_session();
        assert_eq!(session.macros(), Err(NutritionError::PrecursorMissing));
        assert_eq!(session.targets(), Err(NutritionError::PrecursorMissing));
    }

    #[test]
    fn test_calculate_then_macros() {
        let mut session = filled_session();
        let (bmr, tdee) = session.calculate_calories().unwrap();
        assert!((bmr - 1780.0).abs() < 1e-9);
        assert!((tdee - 2759.0).abs() < 1e-9);

        let macros = session.macros().unwrap();
        assert!((macros.carb_kcal - 1215.5).abs() < 1e-9);

        let targets = session.targets().unwrap();
        assert_eq!(targets.calories, tdee);
        assert_eq!(targets.fat_g, macros.fat_g);
    }

    #[test]
    fn test_macros_follow_live_split() {
        let mut session = filled_session();
        session.calculate_calories().unwrap();
        session.set_carb_percent(100.0);

        let macros = session.macros().unwrap();
        assert!((macros.carb_kcal - 2431.0).abs() < 1e-9);
        assert!(macros.fat_kcal.abs() < 1e-9);
    }

    #[test]
    fn test_failed_calculation_keeps_previous_result() {
        let mut session = filled_session();
        session.calculate_calories().unwrap();

        session.set_formula(Formula::KatchMcArdle);
        let err = session.calculate_calories().unwrap_err();
        assert_eq!(err, NutritionError::MissingRequiredInput("body_fat_percent"));
        assert!((session.last_bmr().unwrap() - 1780.0).abs() < 1e-9);

        session.set_body_fat_percent(Some(20.0));
        let (bmr, _) = session.calculate_calories().unwrap();
        assert!((bmr - 1752.4).abs() < 1e-9);
    }

    #[test]
    fn test_reset() {
        let mut session = filled_session();
        session.calculate_calories().unwrap();
        session.reset();
        assert_eq!(session.last_tdee(), None);
        assert_eq!(session.draft().weight_kg, 0.0);
    }
}
