//! Total daily energy expenditure
//!
//! Two-stage transform: BMR × activity multiplier, then the goal adjustment.

use super::types::{ActivityLevel, Goal, Kcal};

/// Scale BMR by activity level and adjust for the body weight goal.
///
/// `Maintain` returns `bmr × multiplier` untouched.
pub fn compute_tdee(bmr: Kcal, activity_level: ActivityLevel, goal: Goal) -> Kcal {
    let tdee = bmr * activity_level.multiplier();

    match goal {
        Goal::Maintain => tdee,
        Goal::Lose | Goal::Gain => tdee * goal.factor(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maintain_is_exact_multiplier() {
        let bmr = 1780.0;
        for level in ActivityLevel::ALL {
            let tdee = compute_tdee(bmr, level, Goal::Maintain);
            assert_eq!(tdee.to_bits(), (bmr * level.multiplier()).to_bits());
        }
    }

    #[test]
    fn test_moderate_maintain() {
        let tdee = compute_tdee(1780.0, ActivityLevel::Moderate, Goal::Maintain);
        assert!((tdee - 2759.0).abs() < 1e-9);
    }

    #[test]
    fn test_goal_adjustment() {
        let bmr = 2759.0 / 1.2;
        let lose = compute_tdee(bmr, ActivityLevel::Sedentary, Goal::Lose);
        assert!((lose - 2483.1).abs() < 1e-6);

        let gain = compute_tdee(bmr, ActivityLevel::Sedentary, Goal::Gain);
        assert!((gain - 3034.9).abs() < 1e-6);
    }

    #[test]
    fn test_multiplier_table() {
        assert_eq!(ActivityLevel::Sedentary.multiplier(), 1.2);
        assert_eq!(ActivityLevel::Light.multiplier(), 1.375);
        assert_eq!(ActivityLevel::Moderate.multiplier(), 1.55);
        assert_eq!(ActivityLevel::VeryActive.multiplier(), 1.725);
        assert_eq!(ActivityLevel::ExtremelyActive.multiplier(), 1.9);
    }

    #[test]
    fn test_negative_bmr_propagates() {
        let tdee = compute_tdee(-100.0, ActivityLevel::Light, Goal::Gain);
        assert!(tdee < 0.0);
    }
}
