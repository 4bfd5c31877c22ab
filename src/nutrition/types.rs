//! Input and result types for the estimation engine
//!
//! Enums carry their own lookup tables (activity multipliers, protein per kg)
//! so the calculators stay a straight line of arithmetic.

use serde::{Deserialize, Serialize};

use super::error::SplitError;

/// Kilocalories per day
pub type Kcal = f64;

/// BMR prediction equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    #[default]
    MifflinStJeor,
    RevisedHarrisBenedict,
    /// Lean-mass based, needs a body fat percentage
    #[serde(rename = "katch_mcardle")]
    KatchMcArdle,
}

impl Formula {
    pub fn as_str(&self) -> &'static str {
        match self {
            Formula::MifflinStJeor => "mifflin_st_jeor",
            Formula::RevisedHarrisBenedict => "revised_harris_benedict",
            Formula::KatchMcArdle => "katch_mcardle",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match normalize(s).as_str() {
            "mifflin_st_jeor" | "mifflin" | "msj" => Some(Formula::MifflinStJeor),
            "revised_harris_benedict" | "harris_benedict" | "harris" => {
                Some(Formula::RevisedHarrisBenedict)
            }
            "katch_mcardle" | "katch" => Some(Formula::KatchMcArdle),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Formula::MifflinStJeor => "Mifflin-St Jeor",
            Formula::RevisedHarrisBenedict => "Revised Harris-Benedict",
            Formula::KatchMcArdle => "Katch-McArdle",
        }
    }
}

/// Biological sex, selects the constant term of the sex-dependent formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match normalize(s).as_str() {
            "male" | "m" | "man" | "männlich" => Some(Sex::Male),
            "female" | "f" | "woman" | "weiblich" => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

/// Lifestyle activity level used to scale BMR into TDEE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    #[default]
    Sedentary,
    /// Light exercise 1-3 days per week
    Light,
    /// Moderate exercise 3-5 days per week
    Moderate,
    /// Hard exercise 4-6 days per week
    VeryActive,
    /// Physical job plus hard training 5-7 days per week
    ExtremelyActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtremelyActive,
    ];

    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtremelyActive => 1.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtremelyActive => "extremely_active",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match normalize(s).as_str() {
            "sedentary" | "none" | "kaum" => Some(ActivityLevel::Sedentary),
            "light" | "lightly_active" | "leicht" => Some(ActivityLevel::Light),
            "moderate" | "moderately_active" | "mittelmäßig" => Some(ActivityLevel::Moderate),
            "very_active" | "sehr_aktiv" => Some(ActivityLevel::VeryActive),
            "extremely_active" | "extra_active" | "körperliche_arbeit_&_training" => {
                Some(ActivityLevel::ExtremelyActive)
            }
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::Light => "Lightly active",
            ActivityLevel::Moderate => "Moderately active",
            ActivityLevel::VeryActive => "Very active",
            ActivityLevel::ExtremelyActive => "Physical work & training",
        }
    }
}

/// Body weight goal, applied to TDEE after the activity multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Lose,
    #[default]
    Maintain,
    Gain,
}

impl Goal {
    /// Energy adjustment factor (10% deficit or surplus)
    pub fn factor(&self) -> f64 {
        match self {
            Goal::Lose => 0.90,
            Goal::Maintain => 1.00,
            Goal::Gain => 1.10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Lose => "lose",
            Goal::Maintain => "maintain",
            Goal::Gain => "gain",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match normalize(s).as_str() {
            "lose" | "cut" | "abnehmen" => Some(Goal::Lose),
            "maintain" | "maintenance" | "gewicht_halten" => Some(Goal::Maintain),
            "gain" | "bulk" | "aufbau" => Some(Goal::Gain),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Goal::Lose => "Lose weight",
            Goal::Maintain => "Maintain weight",
            Goal::Gain => "Gain weight",
        }
    }
}

/// Protein target, expressed as grams per kilogram of body weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProteinGoal {
    #[default]
    Healthy,
    AthleticActive,
    MaintainAndBuild,
}

impl ProteinGoal {
    pub fn grams_per_kg(&self) -> f64 {
        match self {
            ProteinGoal::Healthy => 1.0,
            ProteinGoal::AthleticActive => 1.2,
            ProteinGoal::MaintainAndBuild => 1.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProteinGoal::Healthy => "healthy",
            ProteinGoal::AthleticActive => "athletic_active",
            ProteinGoal::MaintainAndBuild => "maintain_and_build",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match normalize(s).as_str() {
            "healthy" | "gesund" => Some(ProteinGoal::Healthy),
            "athletic_active" | "athletic" | "sportlich_aktiv" => Some(ProteinGoal::AthleticActive),
            "maintain_and_build" | "build" | "erhalt_&_aufbau" => {
                Some(ProteinGoal::MaintainAndBuild)
            }
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProteinGoal::Healthy => "Healthy",
            ProteinGoal::AthleticActive => "Athletic / active",
            ProteinGoal::MaintainAndBuild => "Maintain & build",
        }
    }
}

/// Lowercase and fold separators so "Very Active", "very-active" and
/// "very_active" all compare equal
fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace(['-', ' '], "_")
}

/// Split of the non-protein calories between carbohydrates and fat.
///
/// The two percentages always sum to 100: every constructor and setter
/// derives one from the other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SplitRepr", into = "SplitRepr")]
pub struct MacroSplit {
    carb_percent: f64,
    fat_percent: f64,
}

impl MacroSplit {
    pub fn from_carb_percent(carb_percent: f64) -> Self {
        Self {
            carb_percent,
            fat_percent: 100.0 - carb_percent,
        }
    }

    pub fn from_fat_percent(fat_percent: f64) -> Self {
        Self {
            carb_percent: 100.0 - fat_percent,
            fat_percent,
        }
    }

    /// Resolve an optional carb/fat pair. One side is enough; when both are
    /// given they must add up to 100.
    pub fn try_from_parts(
        carb_percent: Option<f64>,
        fat_percent: Option<f64>,
    ) -> Result<Option<Self>, SplitError> {
        match (carb_percent, fat_percent) {
            (None, None) => Ok(None),
            (Some(carbs), None) => {
                let carbs = check_percent("carb_percent", carbs)?;
                Ok(Some(Self::from_carb_percent(carbs)))
            }
            (None, Some(fat)) => {
                let fat = check_percent("fat_percent", fat)?;
                Ok(Some(Self::from_fat_percent(fat)))
            }
            (Some(carbs), Some(fat)) => {
                let carbs = check_percent("carb_percent", carbs)?;
                let fat = check_percent("fat_percent", fat)?;
                if (carbs + fat - 100.0).abs() > SPLIT_TOLERANCE {
                    return Err(SplitError::Unbalanced {
                        carb_percent: carbs,
                        fat_percent: fat,
                    });
                }
                Ok(Some(Self::from_carb_percent(carbs)))
            }
        }
    }

    pub fn carb_percent(&self) -> f64 {
        self.carb_percent
    }

    pub fn fat_percent(&self) -> f64 {
        self.fat_percent
    }

    /// Set the carbohydrate share; fat takes the remainder
    pub fn set_carb_percent(&mut self, value: f64) {
        *self = Self::from_carb_percent(value);
    }

    /// Set the fat share; carbohydrates take the remainder
    pub fn set_fat_percent(&mut self, value: f64) {
        *self = Self::from_fat_percent(value);
    }
}

const SPLIT_TOLERANCE: f64 = 1e-9;

fn check_percent(field: &'static str, value: f64) -> Result<f64, SplitError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(SplitError::OutOfRange { field, value })
    }
}

impl Default for MacroSplit {
    fn default() -> Self {
        Self::from_carb_percent(50.0)
    }
}

/// Wire form of [`MacroSplit`]. Either side may be omitted; a pair that does
/// not add up to 100 is rejected.
#[derive(Serialize, Deserialize)]
struct SplitRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    carb_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fat_percent: Option<f64>,
}

impl TryFrom<SplitRepr> for MacroSplit {
    type Error = SplitError;

    fn try_from(repr: SplitRepr) -> Result<Self, Self::Error> {
        Ok(MacroSplit::try_from_parts(repr.carb_percent, repr.fat_percent)?.unwrap_or_default())
    }
}

impl From<MacroSplit> for SplitRepr {
    fn from(split: MacroSplit) -> Self {
        Self {
            carb_percent: Some(split.carb_percent),
            fat_percent: Some(split.fat_percent),
        }
    }
}

/// Biometric and lifestyle inputs for one calculation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BiometricInput {
    #[serde(default)]
    pub formula: Formula,
    #[serde(default)]
    pub sex: Sex,
    pub age_years: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    /// Only read by Katch-McArdle, where it is mandatory
    #[serde(default)]
    pub body_fat_percent: Option<f64>,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goal: Goal,
    #[serde(default)]
    pub protein_goal: ProteinGoal,
    #[serde(default)]
    pub split: MacroSplit,
}

/// Macronutrient allocation in grams and kilocalories
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Macros {
    pub protein_g: f64,
    pub protein_kcal: Kcal,
    pub carb_g: f64,
    pub carb_kcal: Kcal,
    pub fat_g: f64,
    pub fat_kcal: Kcal,
}

/// Output of a full estimation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionResult {
    pub bmr_kcal: Kcal,
    /// Goal-adjusted energy target
    pub tdee_kcal: Kcal,
    pub macros: Macros,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_setters_keep_sum() {
        let mut split = MacroSplit::default();
        assert_eq!(split.carb_percent(), 50.0);
        assert_eq!(split.fat_percent(), 50.0);

        split.set_carb_percent(65.0);
        assert_eq!(split.fat_percent(), 35.0);
        assert_eq!(split.carb_percent() + split.fat_percent(), 100.0);

        split.set_fat_percent(20.0);
        assert_eq!(split.carb_percent(), 80.0);
        assert_eq!(split.carb_percent() + split.fat_percent(), 100.0);
    }

    #[test]
    fn test_split_deserialize_derives_missing_side() {
        let split: MacroSplit = serde_json::from_str(r#"{"fat_percent": 30}"#).unwrap();
        assert_eq!(split.carb_percent(), 70.0);

        let split: MacroSplit =
            serde_json::from_str(r#"{"carb_percent": 40, "fat_percent": 60}"#).unwrap();
        assert_eq!(split.fat_percent(), 60.0);

        let split: MacroSplit = serde_json::from_str("{}").unwrap();
        assert_eq!(split, MacroSplit::default());
    }

    #[test]
    fn test_split_deserialize_rejects_inconsistent_pair() {
        let err = serde_json::from_str::<MacroSplit>(r#"{"carb_percent": 40, "fat_percent": 10}"#)
            .unwrap_err();
        assert!(err.to_string().contains("must add up to 100"));

        let err = serde_json::from_str::<MacroSplit>(r#"{"carb_percent": 250}"#).unwrap_err();
        assert!(err.to_string().contains("carb_percent must be between 0 and 100"));

        let input = serde_json::from_str::<BiometricInput>(
            r#"{"age_years": 30, "weight_kg": 80, "height_cm": 180,
                "split": {"carb_percent": 40, "fat_percent": 10}}"#,
        );
        assert!(input.is_err());
    }

    #[test]
    fn test_split_parts() {
        assert_eq!(MacroSplit::try_from_parts(None, None), Ok(None));
        assert_eq!(
            MacroSplit::try_from_parts(None, Some(25.0)).unwrap().unwrap().carb_percent(),
            75.0
        );
        assert_eq!(
            MacroSplit::try_from_parts(Some(60.0), Some(50.0)),
            Err(SplitError::Unbalanced {
                carb_percent: 60.0,
                fat_percent: 50.0
            })
        );
        assert!(MacroSplit::try_from_parts(Some(f64::NAN), None).is_err());
    }

    #[test]
    fn test_serde_names_match_as_str() {
        fn wire<T: Serialize>(value: T) -> String {
            serde_json::to_value(value).unwrap().as_str().unwrap().to_string()
        }

        for formula in [Formula::MifflinStJeor, Formula::RevisedHarrisBenedict, Formula::KatchMcArdle] {
            assert_eq!(wire(formula), formula.as_str());
            let parsed: Formula = serde_json::from_value(serde_json::json!(formula.as_str())).unwrap();
            assert_eq!(parsed, formula);
        }
        for sex in [Sex::Male, Sex::Female] {
            assert_eq!(wire(sex), sex.as_str());
        }
        for level in ActivityLevel::ALL {
            assert_eq!(wire(level), level.as_str());
        }
        for goal in [Goal::Lose, Goal::Maintain, Goal::Gain] {
            assert_eq!(wire(goal), goal.as_str());
        }
        for goal in [ProteinGoal::Healthy, ProteinGoal::AthleticActive, ProteinGoal::MaintainAndBuild] {
            assert_eq!(wire(goal), goal.as_str());
        }
    }

    #[test]
    fn test_katch_input_deserializes_by_documented_name() {
        let input: BiometricInput = serde_json::from_str(
            r#"{"formula": "katch_mcardle", "age_years": 30, "weight_kg": 80,
                "height_cm": 180, "body_fat_percent": 20}"#,
        )
        .unwrap();
        assert_eq!(input.formula, Formula::KatchMcArdle);
    }

    #[test]
    fn test_enum_parsing_aliases() {
        assert_eq!(Formula::from_str("Katch-McArdle"), Some(Formula::KatchMcArdle));
        assert_eq!(Formula::from_str("Mifflin-St Jeor"), Some(Formula::MifflinStJeor));
        assert_eq!(Formula::from_str("Revised Harris-Benedict"), Some(Formula::RevisedHarrisBenedict));
        assert_eq!(Sex::from_str("weiblich"), Some(Sex::Female));
        assert_eq!(ActivityLevel::from_str("Mittelmäßig"), Some(ActivityLevel::Moderate));
        assert_eq!(ActivityLevel::from_str("Körperliche Arbeit & Training"), Some(ActivityLevel::ExtremelyActive));
        assert_eq!(ActivityLevel::from_str("very active"), Some(ActivityLevel::VeryActive));
        assert_eq!(Goal::from_str("Gewicht halten"), Some(Goal::Maintain));
        assert_eq!(ProteinGoal::from_str("Erhalt & Aufbau"), Some(ProteinGoal::MaintainAndBuild));
        assert_eq!(Goal::from_str("shred"), None);
    }

    #[test]
    fn test_as_str_round_trips_through_from_str() {
        for level in ActivityLevel::ALL {
            assert_eq!(ActivityLevel::from_str(level.as_str()), Some(level));
        }
    }

    #[test]
    fn test_input_deserialize_defaults() {
        let input: BiometricInput =
            serde_json::from_str(r#"{"age_years": 30, "weight_kg": 80, "height_cm": 180}"#).unwrap();
        assert_eq!(input.formula, Formula::MifflinStJeor);
        assert_eq!(input.sex, Sex::Male);
        assert_eq!(input.activity_level, ActivityLevel::Sedentary);
        assert_eq!(input.goal, Goal::Maintain);
        assert_eq!(input.body_fat_percent, None);
        assert_eq!(input.split.carb_percent(), 50.0);
    }
}
