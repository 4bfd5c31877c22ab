//! Profile model
//!
//! Stores the last saved daily targets. The profile is a single row
//! (id = 1); saving overwrites it.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{Database, DbError, DbResult};
use crate::nutrition::calculator::TargetSnapshot;

/// Last saved calorie and macro targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileTargets {
    pub last_calories: f64,
    pub last_protein: f64,
    pub last_carbs: f64,
    pub last_fats: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Values written by a save
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileTargetsUpdate {
    pub last_calories: f64,
    pub last_protein: f64,
    pub last_carbs: f64,
    pub last_fats: f64,
}

impl From<TargetSnapshot> for ProfileTargetsUpdate {
    fn from(targets: TargetSnapshot) -> Self {
        Self {
            last_calories: targets.calories,
            last_protein: targets.protein_g,
            last_carbs: targets.carb_g,
            last_fats: targets.fat_g,
        }
    }
}

impl ProfileTargets {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            last_calories: row.get("last_calories")?,
            last_protein: row.get("last_protein")?,
            last_carbs: row.get("last_carbs")?,
            last_fats: row.get("last_fats")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get the saved targets, if any
    pub fn get(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profile WHERE id = 1")?;

        match stmt.query_row([], Self::from_row) {
            Ok(targets) => Ok(Some(targets)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Save targets (upsert)
    pub fn set(conn: &Connection, data: &ProfileTargetsUpdate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO profile (id, last_calories, last_protein, last_carbs, last_fats)
            VALUES (1, ?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                last_calories = excluded.last_calories,
                last_protein = excluded.last_protein,
                last_carbs = excluded.last_carbs,
                last_fats = excluded.last_fats,
                updated_at = datetime('now')
            "#,
            params![
                data.last_calories,
                data.last_protein,
                data.last_carbs,
                data.last_fats
            ],
        )?;

        Self::get(conn)?.ok_or(DbError::ProfileMissing)
    }
}

/// Where calculated targets are persisted.
///
/// The calculator never talks to storage directly; the service layer hands
/// it a store.
pub trait ProfileStore {
    fn load_targets(&self) -> DbResult<Option<ProfileTargets>>;
    fn save_targets(&self, data: &ProfileTargetsUpdate) -> DbResult<ProfileTargets>;
}

impl ProfileStore for Database {
    fn load_targets(&self) -> DbResult<Option<ProfileTargets>> {
        self.with_conn(ProfileTargets::get)
    }

    fn save_targets(&self, data: &ProfileTargetsUpdate) -> DbResult<ProfileTargets> {
        self.with_conn(|conn| ProfileTargets::set(conn, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn store() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(run_migrations).unwrap();
        db
    }

    fn update(calories: f64) -> ProfileTargetsUpdate {
        ProfileTargetsUpdate {
            last_calories: calories,
            last_protein: 80.0,
            last_carbs: 296.46,
            last_fats: 130.70,
        }
    }

    #[test]
    fn test_empty_profile() {
        assert_eq!(store().load_targets().unwrap(), None);
    }

    #[test]
    fn test_save_and_load() {
        let db = store();
        let saved = db.save_targets(&update(2759.0)).unwrap();
        assert_eq!(saved.last_calories, 2759.0);
        assert_eq!(saved.last_fats, 130.70);

        let loaded = db.load_targets().unwrap().unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_save_overwrites() {
        let db = store();
        db.save_targets(&update(2759.0)).unwrap();
        let saved = db.save_targets(&update(2483.1)).unwrap();
        assert_eq!(saved.last_calories, 2483.1);

        let rows: i64 = db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM profile", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_negative_values_are_stored() {
        let db = store();
        let mut data = update(500.0);
        data.last_carbs = -29.02;
        let saved = db.save_targets(&data).unwrap();
        assert_eq!(saved.last_carbs, -29.02);
    }

    #[test]
    fn test_from_snapshot() {
        let snapshot = TargetSnapshot {
            calories: 2000.0,
            protein_g: 70.0,
            carb_g: 200.0,
            fat_g: 60.0,
        };
        let data = ProfileTargetsUpdate::from(snapshot);
        assert_eq!(data.last_calories, 2000.0);
        assert_eq!(data.last_carbs, 200.0);
    }
}
