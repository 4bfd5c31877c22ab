//! Status Tool
//!
//! Runtime status of the service and usage instructions for the calculator.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::{migrations, Database};

/// Calculator instructions for AI assistants
pub const CALCULATOR_INSTRUCTIONS: &str = r#"
# Nutricalc Instructions

This calculator estimates daily energy needs and a macronutrient split from
personal data and activity level. Body weight and lean mass change as the
plan takes effect, so recalculate regularly.

## Workflow

1. `update_calculator` with the person's data. Only the fields you pass change.
2. `calculate_calories` to get BMR and the goal-adjusted TDEE.
3. `get_calculator_macros` for protein, carbohydrate and fat in grams and kcal.
4. `save_targets_to_profile` to store calories and macro grams.

For one-off questions use `estimate_nutrition`, or the individual steps
`calculate_bmr`, `calculate_tdee`, `calculate_macros`. These do not touch the
calculator session.

## Formulas

| Formula | Needs | Typical error |
|---------|-------|---------------|
| `mifflin_st_jeor` | weight, height, age, sex | ~5% |
| `revised_harris_benedict` | weight, height, age, sex | ~10% |
| `katch_mcardle` | weight, **body fat %** | 2-5%, depends on body fat measurement |

- **Mifflin-St Jeor** is the most widely used and more accurate than older equations.
- **Revised Harris-Benedict** is the updated form of the original Harris-Benedict equation.
- **Katch-McArdle** works from lean body mass. Recommended for people who know
  their body fat percentage, especially athletic and muscular people.
  Calculation fails without `body_fat_percent`; ask for it, never guess.

## Activity Levels

| Value | Description | Multiplier |
|-------|-------------|------------|
| `sedentary` | Little or no exercise | 1.2 |
| `light` | Light exercise 1-3 days/week | 1.375 |
| `moderate` | Moderate exercise 3-5 days/week | 1.55 |
| `very_active` | Hard exercise 4-6 days/week | 1.725 |
| `extremely_active` | Physical work and hard training 5-7 days/week | 1.9 |

## Goal

`lose` (-10%), `maintain`, `gain` (+10%), applied to TDEE.

## Protein Goal

| Value | g per kg body weight |
|-------|----------------------|
| `healthy` | 1.0 |
| `athletic_active` | 1.2 |
| `maintain_and_build` | 1.5 |

## Carbohydrate / Fat Split

Protein is allocated first. The remaining calories are split between carbs
and fat. `carb_percent` and `fat_percent` always add up to 100: setting one
sets the other. Energy densities used: protein 4.1, carbs 4.1, fat 9.3 kcal/g.

A very low calorie target with a high protein goal leaves negative
carbohydrate and fat values. They are reported as-is; point this out to the
user instead of hiding it.
"#;

/// Service status information
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_current: Option<bool>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, database: &Database) -> ServiceStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let schema_current = match database.with_conn(migrations::needs_migration) {
            Ok(needs) => Some(!needs),
            Err(e) => {
                tracing::warn!(error = %e, "could not read schema version");
                None
            }
        };

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ServiceStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            schema_current,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
