//! One-shot estimate: reads calculator fields as JSON and prints the result
//!
//! Usage: `estimate [input.json]` (reads stdin when no file is given)
//!
//! Accepts the same fields as the `estimate_nutrition` tool and runs the
//! same checks:
//!
//! ```json
//! {"formula": "mifflin_st_jeor", "sex": "male", "age_years": 30,
//!  "weight_kg": 80, "height_cm": 180, "activity_level": "moderate",
//!  "goal": "maintain", "protein_goal": "healthy", "carb_percent": 50}
//! ```

use std::io::Read;

use nutricalc::tools::calculator::{self, InputFields};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    nutricalc::config::init_logging()?;

    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let fields: InputFields = serde_json::from_str(&raw)?;
    let response = calculator::estimate_nutrition(&fields)?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
