//! Nutricalc MCP Server Implementation
//!
//! Exposes the estimation engine, the calculator session and the profile
//! store as MCP tools.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::nutrition::CalculatorSession;
use crate::tools::calculator::{self, InputFields};
use crate::tools::profile;
use crate::tools::status::StatusTracker;

/// Nutricalc MCP Service
#[derive(Clone)]
pub struct NutricalcService {
    status_tracker: Arc<StatusTracker>,
    database: Database,
    tool_router: ToolRouter<NutricalcService>,
    /// One calculator form per server process
    session: Arc<Mutex<CalculatorSession>>,
}

impl NutricalcService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(StatusTracker::new(database_path)),
            database,
            tool_router: Self::tool_router(),
            session: Arc::new(Mutex::new(CalculatorSession::new())),
        }
    }

    fn session(&self) -> Result<MutexGuard<'_, CalculatorSession>, McpError> {
        self.session
            .lock()
            .map_err(|_| McpError::internal_error("Calculator session lock poisoned", None))
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn invalid(message: String) -> McpError {
    McpError::invalid_params(message, None)
}

// ============================================================================
// Calculator Parameter Structs
// ============================================================================

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct BiometricParams {
    /// BMR formula: mifflin_st_jeor (default), revised_harris_benedict, katch_mcardle
    pub formula: Option<String>,
    /// Sex: male (default) or female. Ignored by katch_mcardle
    pub sex: Option<String>,
    /// Age in whole years
    pub age_years: Option<u32>,
    /// Body weight in kilograms
    pub weight_kg: Option<f64>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Body fat percentage (0-100). Required for katch_mcardle
    pub body_fat_percent: Option<f64>,
    /// Activity level: sedentary (default), light, moderate, very_active, extremely_active
    pub activity_level: Option<String>,
    /// Goal: lose, maintain (default), gain
    pub goal: Option<String>,
    /// Protein goal: healthy (default), athletic_active, maintain_and_build
    pub protein_goal: Option<String>,
    /// Share of non-protein calories from carbohydrates (0-100). Fat gets the rest
    pub carb_percent: Option<f64>,
    /// Share of non-protein calories from fat (0-100). Carbohydrates get the rest
    pub fat_percent: Option<f64>,
}

impl From<BiometricParams> for InputFields {
    fn from(p: BiometricParams) -> Self {
        Self {
            formula: p.formula,
            sex: p.sex,
            age_years: p.age_years,
            weight_kg: p.weight_kg,
            height_cm: p.height_cm,
            body_fat_percent: p.body_fat_percent,
            activity_level: p.activity_level,
            goal: p.goal,
            protein_goal: p.protein_goal,
            carb_percent: p.carb_percent,
            fat_percent: p.fat_percent,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateCalculatorParams {
    #[serde(flatten)]
    pub fields: BiometricParams,
    /// Remove the stored body fat percentage (default false). Cannot be
    /// combined with body_fat_percent
    #[serde(default)]
    pub clear_body_fat: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateTdeeParams {
    /// Basal metabolic rate in kcal
    pub bmr_kcal: f64,
    /// Activity level: sedentary (default), light, moderate, very_active, extremely_active
    pub activity_level: Option<String>,
    /// Goal: lose, maintain (default), gain
    pub goal: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateMacrosParams {
    /// Goal-adjusted TDEE in kcal, from calculate_tdee
    pub tdee_kcal: Option<f64>,
    /// Body weight in kilograms
    pub weight_kg: f64,
    /// Protein goal: healthy (default), athletic_active, maintain_and_build
    pub protein_goal: Option<String>,
    /// Share of non-protein calories from carbohydrates (0-100)
    pub carb_percent: Option<f64>,
    /// Share of non-protein calories from fat (0-100)
    pub fat_percent: Option<f64>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl NutricalcService {
    // --- Status ---

    #[tool(description = "Get the current status of the Nutricalc service including build info, database status, and process information")]
    fn nutricalc_status(&self) -> Result<CallToolResult, McpError> {
        let status = self.status_tracker.get_status(&self.database);
        to_json(&status)
    }

    #[tool(description = "Get instructions for the calorie and macro calculator: workflow, formulas, activity levels and the carb/fat split. Call this before the first calculation.")]
    fn calculator_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::CALCULATOR_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(CALCULATOR_INSTRUCTIONS)]))
    }

    // --- Stateless calculations ---

    #[tool(description = "Calculate basal metabolic rate (BMR). Needs weight_kg, plus age_years and height_cm unless formula is katch_mcardle, which needs body_fat_percent instead")]
    fn calculate_bmr(&self, Parameters(p): Parameters<BiometricParams>) -> Result<CallToolResult, McpError> {
        let result = calculator::calculate_bmr(&p.into()).map_err(invalid)?;
        to_json(&result)
    }

    #[tool(description = "Calculate total daily energy expenditure (TDEE) from a BMR, activity level and goal")]
    fn calculate_tdee(&self, Parameters(p): Parameters<CalculateTdeeParams>) -> Result<CallToolResult, McpError> {
        let result = calculator::calculate_tdee(p.bmr_kcal, p.activity_level.as_deref(), p.goal.as_deref())
            .map_err(invalid)?;
        to_json(&result)
    }

    #[tool(description = "Split a TDEE into protein, carbohydrate and fat (grams and kcal). Protein comes from body weight; the rest is split by carb_percent/fat_percent")]
    fn calculate_macros(&self, Parameters(p): Parameters<CalculateMacrosParams>) -> Result<CallToolResult, McpError> {
        let result = calculator::calculate_macros(
            p.tdee_kcal,
            p.weight_kg,
            p.protein_goal.as_deref(),
            p.carb_percent,
            p.fat_percent,
        )
        .map_err(invalid)?;
        to_json(&result)
    }

    #[tool(description = "Calculate BMR, TDEE and macros in one call without touching the calculator session")]
    fn estimate_nutrition(&self, Parameters(p): Parameters<BiometricParams>) -> Result<CallToolResult, McpError> {
        let result = calculator::estimate_nutrition(&p.into()).map_err(invalid)?;
        to_json(&result)
    }

    // --- Calculator session ---

    #[tool(description = "Update the calculator form. Only the fields passed change. Setting carb_percent sets fat_percent to the remainder and vice versa")]
    fn update_calculator(&self, Parameters(p): Parameters<UpdateCalculatorParams>) -> Result<CallToolResult, McpError> {
        let mut session = self.session()?;
        let fields = p.fields.into();
        let result = calculator::update_calculator(&mut session, &fields, p.clear_body_fat)
            .map_err(invalid)?;
        to_json(&result)
    }

    #[tool(description = "Get the calculator form, the last BMR/TDEE and the current macro split")]
    fn get_calculator(&self) -> Result<CallToolResult, McpError> {
        let session = self.session()?;
        to_json(&calculator::CalculatorStateResponse::from(&*session))
    }

    #[tool(description = "Calculate BMR and goal-adjusted TDEE from the calculator form")]
    fn calculate_calories(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session()?;
        let result = calculator::calculate_calories(&mut session).map_err(invalid)?;
        to_json(&result)
    }

    #[tool(description = "Get the macro split for the last calculated TDEE, using the form's current weight, protein goal and carb/fat split")]
    fn get_calculator_macros(&self) -> Result<CallToolResult, McpError> {
        let session = self.session()?;
        let result = calculator::get_calculator_macros(&session).map_err(invalid)?;
        to_json(&result)
    }

    #[tool(description = "Reset the calculator form and clear calculated values")]
    fn reset_calculator(&self) -> Result<CallToolResult, McpError> {
        let mut session = self.session()?;
        to_json(&calculator::reset_calculator(&mut session))
    }

    // --- Profile ---

    #[tool(description = "Save the last calculated calories and macro grams to the profile. Requires calculate_calories first")]
    fn save_targets_to_profile(&self) -> Result<CallToolResult, McpError> {
        let session = self.session()?;
        let result = profile::save_targets_to_profile(&self.database, &session)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get the calories and macro grams last saved to the profile")]
    fn get_profile_targets(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile_targets(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutricalcService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: crate::build_info::NAME.into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutricalc".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutricalc - calorie (BMR/TDEE) and macronutrient calculator. \
                 IMPORTANT: Call calculator_instructions before the first calculation. \
                 One-off: calculate_bmr, calculate_tdee, calculate_macros, estimate_nutrition. \
                 Session: update_calculator, get_calculator, calculate_calories, get_calculator_macros, reset_calculator. \
                 Profile: save_targets_to_profile, get_profile_targets. \
                 Status: nutricalc_status."
                    .into(),
            ),
        }
    }
}
