//! Calculator Tools
//!
//! Boundary between tool calls and the estimation engine: parses enum names,
//! range-checks biometrics and shapes responses. The engine itself trusts
//! its input, so every check lives here.

use serde::{Deserialize, Serialize};

use crate::nutrition::{
    self, compute_bmr, compute_macros, compute_tdee, lean_mass_kg, ActivityLevel, BiometricInput,
    CalculatorSession, Formula, Goal, Kcal, MacroSplit, Macros, NutritionResult, ProteinGoal, Sex,
};

/// Calculator fields as they arrive from a tool call.
///
/// Every field is optional: stateless tools fill gaps with defaults (or
/// reject missing biometrics), the session only changes what is present.
/// The `estimate` binary reads the same shape from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputFields {
    pub formula: Option<String>,
    pub sex: Option<String>,
    pub age_years: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub body_fat_percent: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub protein_goal: Option<String>,
    pub carb_percent: Option<f64>,
    pub fat_percent: Option<f64>,
}

// ============================================================================
// Responses
// ============================================================================

/// Response for calculate_bmr
#[derive(Debug, Serialize)]
pub struct BmrResponse {
    pub formula: &'static str,
    pub formula_display: &'static str,
    pub bmr_kcal: Kcal,
    pub lean_mass_kg: Option<f64>,
    pub summary: String,
}

/// Response for calculate_tdee
#[derive(Debug, Serialize)]
pub struct TdeeResponse {
    pub bmr_kcal: Kcal,
    pub activity_level: &'static str,
    pub activity_multiplier: f64,
    pub goal: &'static str,
    pub goal_factor: f64,
    pub tdee_kcal: Kcal,
    pub summary: String,
}

/// Macro split with a human-readable breakdown
#[derive(Debug, Serialize)]
pub struct MacrosResponse {
    pub protein_goal: &'static str,
    pub carb_percent: f64,
    pub fat_percent: f64,
    #[serde(flatten)]
    pub macros: Macros,
    pub summary: Vec<String>,
}

/// Response for estimate_nutrition
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub input: BiometricInput,
    #[serde(flatten)]
    pub result: NutritionResult,
    pub summary: Vec<String>,
}

/// Response for calculate_calories
#[derive(Debug, Serialize)]
pub struct CaloriesResponse {
    pub formula: &'static str,
    pub bmr_kcal: Kcal,
    pub tdee_kcal: Kcal,
    pub summary: Vec<String>,
}

/// Snapshot of the calculator session
#[derive(Debug, Serialize)]
pub struct CalculatorStateResponse {
    pub form: BiometricInput,
    pub last_bmr_kcal: Option<Kcal>,
    pub last_tdee_kcal: Option<Kcal>,
    pub macros: Option<Macros>,
}

impl From<&CalculatorSession> for CalculatorStateResponse {
    fn from(session: &CalculatorSession) -> Self {
        Self {
            form: *session.draft(),
            last_bmr_kcal: session.last_bmr(),
            last_tdee_kcal: session.last_tdee(),
            macros: session.macros().ok(),
        }
    }
}

fn macro_lines(macros: &Macros) -> Vec<String> {
    vec![
        format!("Protein: {:.2} g ({:.2} kcal)", macros.protein_g, macros.protein_kcal),
        format!("Carbohydrates: {:.2} g ({:.2} kcal)", macros.carb_g, macros.carb_kcal),
        format!("Fat: {:.2} g ({:.2} kcal)", macros.fat_g, macros.fat_kcal),
    ]
}

fn macros_response(macros: Macros, protein_goal: ProteinGoal, split: MacroSplit) -> MacrosResponse {
    if macros.carb_kcal < 0.0 || macros.fat_kcal < 0.0 {
        tracing::warn!(
            protein_kcal = macros.protein_kcal,
            "protein allocation exceeds the calorie target"
        );
    }

    MacrosResponse {
        protein_goal: protein_goal.as_str(),
        carb_percent: split.carb_percent(),
        fat_percent: split.fat_percent(),
        summary: macro_lines(&macros),
        macros,
    }
}

// ============================================================================
// Parsing & Validation
// ============================================================================

fn parse_enum<T>(
    value: &str,
    kind: &str,
    allowed: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, String> {
    parse(value).ok_or_else(|| format!("Unknown {} '{}'. Use one of: {}", kind, value, allowed))
}

fn parse_formula(value: &str) -> Result<Formula, String> {
    parse_enum(
        value,
        "formula",
        "mifflin_st_jeor, revised_harris_benedict, katch_mcardle",
        Formula::from_str,
    )
}

fn parse_sex(value: &str) -> Result<Sex, String> {
    parse_enum(value, "sex", "male, female", Sex::from_str)
}

pub fn parse_activity_level(value: &str) -> Result<ActivityLevel, String> {
    parse_enum(
        value,
        "activity level",
        "sedentary, light, moderate, very_active, extremely_active",
        ActivityLevel::from_str,
    )
}

pub fn parse_goal(value: &str) -> Result<Goal, String> {
    parse_enum(value, "goal", "lose, maintain, gain", Goal::from_str)
}

pub fn parse_protein_goal(value: &str) -> Result<ProteinGoal, String> {
    parse_enum(
        value,
        "protein goal",
        "healthy, athletic_active, maintain_and_build",
        ProteinGoal::from_str,
    )
}

fn check_positive(name: &str, value: f64) -> Result<f64, String> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("{} must be a positive number, got {}", name, value))
    }
}

fn check_percent(name: &str, value: f64) -> Result<f64, String> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} must be between 0 and 100, got {}", name, value))
    }
}

fn check_age(value: u32) -> Result<u32, String> {
    if value == 0 {
        Err("age_years must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Resolve the carb/fat pair. One side is enough; both must add up to 100.
pub fn parse_split(
    carb_percent: Option<f64>,
    fat_percent: Option<f64>,
) -> Result<Option<MacroSplit>, String> {
    MacroSplit::try_from_parts(carb_percent, fat_percent).map_err(|e| e.to_string())
}

/// Build a complete engine input from tool fields.
///
/// Weight is always required. Age and height are required unless the
/// formula is Katch-McArdle, which only needs weight and body fat.
pub fn build_input(fields: &InputFields) -> Result<BiometricInput, String> {
    let formula = fields
        .formula
        .as_deref()
        .map(parse_formula)
        .transpose()?
        .unwrap_or_default();
    let needs_profile = formula != Formula::KatchMcArdle;

    let weight_kg = fields
        .weight_kg
        .ok_or_else(|| "weight_kg is required".to_string())
        .and_then(|w| check_positive("weight_kg", w))?;

    let age_years = match fields.age_years {
        Some(age) => check_age(age)?,
        None if needs_profile => {
            return Err(format!("age_years is required for {}", formula.display_name()));
        }
        None => 0,
    };

    let height_cm = match fields.height_cm {
        Some(height) => check_positive("height_cm", height)?,
        None if needs_profile => {
            return Err(format!("height_cm is required for {}", formula.display_name()));
        }
        None => 0.0,
    };

    Ok(BiometricInput {
        formula,
        sex: fields.sex.as_deref().map(parse_sex).transpose()?.unwrap_or_default(),
        age_years,
        weight_kg,
        height_cm,
        body_fat_percent: fields
            .body_fat_percent
            .map(|bf| check_percent("body_fat_percent", bf))
            .transpose()?,
        activity_level: fields
            .activity_level
            .as_deref()
            .map(parse_activity_level)
            .transpose()?
            .unwrap_or_default(),
        goal: fields.goal.as_deref().map(parse_goal).transpose()?.unwrap_or_default(),
        protein_goal: fields
            .protein_goal
            .as_deref()
            .map(parse_protein_goal)
            .transpose()?
            .unwrap_or_default(),
        split: parse_split(fields.carb_percent, fields.fat_percent)?.unwrap_or_default(),
    })
}

// ============================================================================
// Stateless Tools
// ============================================================================

/// Compute BMR only
pub fn calculate_bmr(fields: &InputFields) -> Result<BmrResponse, String> {
    let input = build_input(fields)?;
    let bmr = compute_bmr(&input).map_err(|e| e.to_string())?;

    let lean_mass = match input.formula {
        Formula::KatchMcArdle => input
            .body_fat_percent
            .map(|bf| lean_mass_kg(input.weight_kg, bf)),
        _ => None,
    };

    Ok(BmrResponse {
        formula: input.formula.as_str(),
        formula_display: input.formula.display_name(),
        bmr_kcal: bmr,
        lean_mass_kg: lean_mass,
        summary: format!("Basal metabolic rate (BMR): {:.2} kcal", bmr),
    })
}

/// Apply activity multiplier and goal to a BMR
pub fn calculate_tdee(
    bmr_kcal: f64,
    activity_level: Option<&str>,
    goal: Option<&str>,
) -> Result<TdeeResponse, String> {
    if !bmr_kcal.is_finite() {
        return Err(format!("bmr_kcal must be a finite number, got {}", bmr_kcal));
    }
    let activity_level = activity_level
        .map(parse_activity_level)
        .transpose()?
        .unwrap_or_default();
    let goal = goal.map(parse_goal).transpose()?.unwrap_or_default();

    let tdee = compute_tdee(bmr_kcal, activity_level, goal);

    Ok(TdeeResponse {
        bmr_kcal,
        activity_level: activity_level.as_str(),
        activity_multiplier: activity_level.multiplier(),
        goal: goal.as_str(),
        goal_factor: goal.factor(),
        tdee_kcal: tdee,
        summary: format!("Total daily energy expenditure (TDEE): {:.2} kcal", tdee),
    })
}

/// Split a calorie target into macros
pub fn calculate_macros(
    tdee_kcal: Option<f64>,
    weight_kg: f64,
    protein_goal: Option<&str>,
    carb_percent: Option<f64>,
    fat_percent: Option<f64>,
) -> Result<MacrosResponse, String> {
    if let Some(tdee) = tdee_kcal {
        if !tdee.is_finite() {
            return Err(format!("tdee_kcal must be a finite number, got {}", tdee));
        }
    }
    let weight_kg = check_positive("weight_kg", weight_kg)?;
    let protein_goal = protein_goal
        .map(parse_protein_goal)
        .transpose()?
        .unwrap_or_default();
    let split = parse_split(carb_percent, fat_percent)?.unwrap_or_default();

    let macros =
        compute_macros(tdee_kcal, weight_kg, protein_goal, split).map_err(|e| e.to_string())?;
    Ok(macros_response(macros, protein_goal, split))
}

/// Full pipeline: BMR, TDEE and macros in one call
pub fn estimate_nutrition(fields: &InputFields) -> Result<EstimateResponse, String> {
    let input = build_input(fields)?;
    let result = nutrition::estimate(&input).map_err(|e| e.to_string())?;

    tracing::info!(
        formula = input.formula.as_str(),
        bmr = result.bmr_kcal,
        tdee = result.tdee_kcal,
        "estimated nutrition"
    );
    if result.macros.carb_kcal < 0.0 || result.macros.fat_kcal < 0.0 {
        tracing::warn!(
            protein_kcal = result.macros.protein_kcal,
            "protein allocation exceeds the calorie target"
        );
    }

    let mut summary = vec![
        format!("Basal metabolic rate (BMR): {:.2} kcal", result.bmr_kcal),
        format!("Total daily energy expenditure (TDEE): {:.2} kcal", result.tdee_kcal),
    ];
    summary.extend(macro_lines(&result.macros));

    Ok(EstimateResponse {
        input,
        result,
        summary,
    })
}

// ============================================================================
// Session Tools
// ============================================================================

/// Apply the present fields to the session.
///
/// All fields are validated before any is applied, so a rejected update
/// leaves the form untouched. `clear_body_fat` removes the stored body fat
/// percentage and cannot be combined with a new one.
pub fn update_calculator(
    session: &mut CalculatorSession,
    fields: &InputFields,
    clear_body_fat: bool,
) -> Result<CalculatorStateResponse, String> {
    if clear_body_fat && fields.body_fat_percent.is_some() {
        return Err("body_fat_percent and clear_body_fat cannot be combined".to_string());
    }

    let formula = fields.formula.as_deref().map(parse_formula).transpose()?;
    let sex = fields.sex.as_deref().map(parse_sex).transpose()?;
    let age_years = fields.age_years.map(check_age).transpose()?;
    let weight_kg = fields.weight_kg.map(|w| check_positive("weight_kg", w)).transpose()?;
    let height_cm = fields.height_cm.map(|h| check_positive("height_cm", h)).transpose()?;
    let body_fat = fields
        .body_fat_percent
        .map(|bf| check_percent("body_fat_percent", bf))
        .transpose()?;
    let activity_level = fields
        .activity_level
        .as_deref()
        .map(parse_activity_level)
        .transpose()?;
    let goal = fields.goal.as_deref().map(parse_goal).transpose()?;
    let protein_goal = fields
        .protein_goal
        .as_deref()
        .map(parse_protein_goal)
        .transpose()?;
    let split = parse_split(fields.carb_percent, fields.fat_percent)?;

    if let Some(formula) = formula {
        session.set_formula(formula);
    }
    if let Some(sex) = sex {
        session.set_sex(sex);
    }
    if let Some(age_years) = age_years {
        session.set_age_years(age_years);
    }
    if let Some(weight_kg) = weight_kg {
        session.set_weight_kg(weight_kg);
    }
    if let Some(height_cm) = height_cm {
        session.set_height_cm(height_cm);
    }
    if let Some(body_fat) = body_fat {
        session.set_body_fat_percent(Some(body_fat));
    }
    if clear_body_fat {
        session.set_body_fat_percent(None);
    }
    if let Some(activity_level) = activity_level {
        session.set_activity_level(activity_level);
    }
    if let Some(goal) = goal {
        session.set_goal(goal);
    }
    if let Some(protein_goal) = protein_goal {
        session.set_protein_goal(protein_goal);
    }
    if let Some(split) = split {
        session.set_carb_percent(split.carb_percent());
    }

    Ok(CalculatorStateResponse::from(&*session))
}

/// The form starts blank (weight, age and height all zero), so check it the
/// way `build_input` checks stateless input before computing.
fn check_draft(draft: &BiometricInput) -> Result<(), String> {
    if !(draft.weight_kg.is_finite() && draft.weight_kg > 0.0) {
        return Err("weight_kg is required; set it with update_calculator".to_string());
    }
    if draft.formula == Formula::KatchMcArdle {
        return Ok(());
    }
    if draft.age_years == 0 {
        return Err(format!(
            "age_years is required for {}; set it with update_calculator",
            draft.formula.display_name()
        ));
    }
    if !(draft.height_cm.is_finite() && draft.height_cm > 0.0) {
        return Err(format!(
            "height_cm is required for {}; set it with update_calculator",
            draft.formula.display_name()
        ));
    }
    Ok(())
}

/// Compute BMR and TDEE from the session form
pub fn calculate_calories(session: &mut CalculatorSession) -> Result<CaloriesResponse, String> {
    check_draft(session.draft())?;

    let (bmr, tdee) = session.calculate_calories().map_err(|e| match e {
        nutrition::NutritionError::MissingRequiredInput(field) => format!(
            "Missing required input: {}. Katch-McArdle needs the body fat percentage; \
             set it with update_calculator.",
            field
        ),
        other => other.to_string(),
    })?;

    Ok(CaloriesResponse {
        formula: session.draft().formula.as_str(),
        bmr_kcal: bmr,
        tdee_kcal: tdee,
        summary: vec![
            format!("Basal metabolic rate (BMR): {:.2} kcal", bmr),
            format!("Total daily energy expenditure (TDEE): {:.2} kcal", tdee),
        ],
    })
}

/// Macro split of the session's last TDEE
pub fn get_calculator_macros(session: &CalculatorSession) -> Result<MacrosResponse, String> {
    let macros = session.macros().map_err(|e| e.to_string())?;
    let draft = session.draft();
    Ok(macros_response(macros, draft.protein_goal, draft.split))
}

/// Clear the session
pub fn reset_calculator(session: &mut CalculatorSession) -> CalculatorStateResponse {
    session.reset();
    CalculatorStateResponse::from(&*session)
}
