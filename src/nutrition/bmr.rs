//! Basal metabolic rate
//!
//! Three prediction equations, selected by [`Formula`]. Inputs are trusted:
//! implausible biometrics produce implausible (possibly negative) values
//! rather than errors.

use super::error::{CalcResult, NutritionError};
use super::types::{BiometricInput, Formula, Kcal, Sex};

// ============================================================================
// Formula Coefficients
// ============================================================================

/// Mifflin-St Jeor: 10·W + 6.25·H − 5·A + s
mod mifflin {
    pub const WEIGHT: f64 = 10.0;
    pub const HEIGHT: f64 = 6.25;
    pub const AGE: f64 = 5.0;
    pub const MALE: f64 = 5.0;
    pub const FEMALE: f64 = -161.0;
}

/// Revised Harris-Benedict (Roza & Shizgal, 1984)
mod harris_benedict {
    pub mod male {
        pub const BASE: f64 = 88.362;
        pub const WEIGHT: f64 = 13.397;
        pub const HEIGHT: f64 = 4.799;
        pub const AGE: f64 = 5.677;
    }

    pub mod female {
        pub const BASE: f64 = 447.593;
        pub const WEIGHT: f64 = 9.247;
        pub const HEIGHT: f64 = 3.098;
        pub const AGE: f64 = 4.330;
    }
}

/// Katch-McArdle: 370 + 21.6·LBM
mod katch {
    pub const BASE: f64 = 370.0;
    pub const LEAN_MASS: f64 = 21.6;
}

/// Compute BMR for the formula selected in `input`.
///
/// Fails with [`NutritionError::MissingRequiredInput`] when Katch-McArdle is
/// selected without a body fat percentage. No default is substituted.
pub fn compute_bmr(input: &BiometricInput) -> CalcResult<Kcal> {
    let weight = input.weight_kg;
    let height = input.height_cm;
    let age = f64::from(input.age_years);

    match input.formula {
        Formula::MifflinStJeor => Ok(mifflin_st_jeor(weight, height, age, input.sex)),
        Formula::RevisedHarrisBenedict => {
            Ok(revised_harris_benedict(weight, height, age, input.sex))
        }
        Formula::KatchMcArdle => {
            let body_fat = input
                .body_fat_percent
                .ok_or_else(NutritionError::missing_body_fat)?;
            Ok(katch_mcardle(weight, body_fat))
        }
    }
}

/// Lean body mass in kilograms
pub fn lean_mass_kg(weight_kg: f64, body_fat_percent: f64) -> f64 {
    weight_kg * (1.0 - body_fat_percent / 100.0)
}

fn mifflin_st_jeor(weight: f64, height: f64, age: f64, sex: Sex) -> Kcal {
    let constant = match sex {
        Sex::Male => mifflin::MALE,
        Sex::Female => mifflin::FEMALE,
    };
    mifflin::WEIGHT * weight + mifflin::HEIGHT * height - mifflin::AGE * age + constant
}

fn revised_harris_benedict(weight: f64, height: f64, age: f64, sex: Sex) -> Kcal {
    use harris_benedict::{female, male};

    match sex {
        Sex::Male => male::BASE + male::WEIGHT * weight + male::HEIGHT * height - male::AGE * age,
        Sex::Female => {
            female::BASE + female::WEIGHT * weight + female::HEIGHT * height - female::AGE * age
        }
    }
}

fn katch_mcardle(weight: f64, body_fat_percent: f64) -> Kcal {
    katch::BASE + katch::LEAN_MASS * lean_mass_kg(weight, body_fat_percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(formula: Formula, sex: Sex) -> BiometricInput {
        BiometricInput {
            formula,
            sex,
            age_years: 30,
            weight_kg: 80.0,
            height_cm: 180.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_mifflin_male() {
        // 800 + 1125 - 150 + 5
        let bmr = compute_bmr(&input(Formula::MifflinStJeor, Sex::Male)).unwrap();
        assert!((bmr - 1780.0).abs() < 1e-9);
    }

    #[test]
    fn test_mifflin_female_differs_by_166() {
        let male = compute_bmr(&input(Formula::MifflinStJeor, Sex::Male)).unwrap();
        let female = compute_bmr(&input(Formula::MifflinStJeor, Sex::Female)).unwrap();
        assert!((female - 1614.0).abs() < 1e-9);
        assert!((male - female - 166.0).abs() < 1e-9);
    }

    #[test]
    fn test_harris_benedict() {
        // 88.362 + 1071.76 + 863.82 - 170.31
        let male = compute_bmr(&input(Formula::RevisedHarrisBenedict, Sex::Male)).unwrap();
        assert!((male - 1853.632).abs() < 1e-6);

        // 447.593 + 739.76 + 557.64 - 129.9
        let female = compute_bmr(&input(Formula::RevisedHarrisBenedict, Sex::Female)).unwrap();
        assert!((female - 1615.093).abs() < 1e-6);
    }

    #[test]
    fn test_katch_mcardle_ignores_sex() {
        let mut male = input(Formula::KatchMcArdle, Sex::Male);
        male.body_fat_percent = Some(20.0);
        let mut female = male;
        female.sex = Sex::Female;

        // lean mass 64 kg: 370 + 21.6 * 64
        let bmr = compute_bmr(&male).unwrap();
        assert!((bmr - 1752.4).abs() < 1e-9);
        assert_eq!(compute_bmr(&female).unwrap(), bmr);
    }

    #[test]
    fn test_katch_mcardle_requires_body_fat() {
        let result = compute_bmr(&input(Formula::KatchMcArdle, Sex::Male));
        assert_eq!(result, Err(NutritionError::MissingRequiredInput("body_fat_percent")));
    }

    #[test]
    fn test_body_fat_ignored_by_other_formulas() {
        let plain = input(Formula::MifflinStJeor, Sex::Male);
        let mut with_fat = plain;
        with_fat.body_fat_percent = Some(35.0);
        assert_eq!(compute_bmr(&plain).unwrap(), compute_bmr(&with_fat).unwrap());
    }

    #[test]
    fn test_deterministic() {
        let data = input(Formula::RevisedHarrisBenedict, Sex::Female);
        let first = compute_bmr(&data).unwrap();
        let second = compute_bmr(&data).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_implausible_input_goes_negative() {
        let data = BiometricInput {
            formula: Formula::MifflinStJeor,
            sex: Sex::Female,
            age_years: 120,
            weight_kg: 1.0,
            height_cm: 1.0,
            ..Default::default()
        };
        assert!(compute_bmr(&data).unwrap() < 0.0);
    }

    #[test]
    fn test_lean_mass() {
        assert!((lean_mass_kg(80.0, 25.0) - 60.0).abs() < 1e-9);
        assert_eq!(lean_mass_kg(80.0, 0.0), 80.0);
    }
}
