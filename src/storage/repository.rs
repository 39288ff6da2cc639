//! SQLite repository for historical horse records

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::schema::create_tables;

/// Historical record for one horse, keyed by (name, age)
///
/// The age column is free-form text maintained by the data provider; it
/// always starts with the age in digits (e.g. "5 år").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorseRecord {
    pub name: String,
    pub age: String,
    pub country: String,
    pub breed: String,
    pub father: String,
    pub mother: String,
    pub races: i64,
    pub first: i64,
    pub second: i64,
    pub third: i64,
    pub fourth: i64,
    pub first_percent: i64,
    pub second_percent: i64,
    pub third_percent: i64,
    pub fourth_percent: i64,
    pub earnings: Option<f64>,
}

/// Repository for the horse store
pub struct HorseRepository {
    conn: Mutex<Connection>,
}

impl HorseRepository {
    /// Open the store, initializing the database if needed
    pub fn open(db_path: &Path) -> Result<Self> {
        // Create parent directories if needed
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let conn = Connection::open(db_path).context("Failed to open database")?;

        // Create tables if they don't exist
        create_tables(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory repository (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to lock connection: {}", e))
    }

    /// Insert a horse record (upsert on the (name, age) key)
    pub fn insert_horse(&self, horse: &HorseRecord) -> Result<()> {
        self.conn()?.execute(
            r#"
            INSERT OR REPLACE INTO horses
            (name, age, country, breed, father, mother, races,
             first, second, third, fourth,
             first_percent, second_percent, third_percent, fourth_percent, earnings)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
            params![
                horse.name,
                horse.age,
                horse.country,
                horse.breed,
                horse.father,
                horse.mother,
                horse.races,
                horse.first,
                horse.second,
                horse.third,
                horse.fourth,
                horse.first_percent,
                horse.second_percent,
                horse.third_percent,
                horse.fourth_percent,
                horse.earnings,
            ],
        )?;
        Ok(())
    }

    /// Look up the record whose name and age both start with the given
    /// prefixes (case-insensitive for ASCII, per SQLite LIKE).
    ///
    /// When several rows match, ties are broken by full name then age so
    /// repeated lookups always return the same row.
    pub fn find_by_prefix(
        &self,
        name_prefix: &str,
        age_prefix: &str,
    ) -> Result<Option<HorseRecord>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                r#"
                SELECT name, age, country, breed, father, mother, races,
                       first, second, third, fourth,
                       first_percent, second_percent, third_percent, fourth_percent, earnings
                FROM horses
                WHERE name LIKE ?1 || '%' AND age LIKE ?2 || '%'
                ORDER BY name, age
                LIMIT 1
                "#,
                params![name_prefix, age_prefix],
                |row| {
                    Ok(HorseRecord {
                        name: row.get(0)?,
                        age: row.get(1)?,
                        country: row.get(2)?,
                        breed: row.get(3)?,
                        father: row.get(4)?,
                        mother: row.get(5)?,
                        races: row.get(6)?,
                        first: row.get(7)?,
                        second: row.get(8)?,
                        third: row.get(9)?,
                        fourth: row.get(10)?,
                        first_percent: row.get(11)?,
                        second_percent: row.get(12)?,
                        third_percent: row.get(13)?,
                        fourth_percent: row.get(14)?,
                        earnings: row.get(15)?,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    /// List (name, age) pairs whose name starts with the query, for
    /// autocompletion. Ordered by name, capped at `limit` rows.
    pub fn complete_names(&self, name_prefix: &str, limit: usize) -> Result<Vec<(String, String)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT name, age FROM horses
            WHERE name LIKE ?1 || '%'
            ORDER BY name
            LIMIT ?2
            "#,
        )?;

        let rows = stmt
            .query_map(params![name_prefix, limit as i64], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Get horse count
    pub fn horse_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM horses", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_horse(name: &str, age: &str) -> HorseRecord {
        HorseRecord {
            name: name.to_string(),
            age: age.to_string(),
            country: "SE".to_string(),
            breed: "Varmblodig travare".to_string(),
            father: "Storm".to_string(),
            mother: "Dream".to_string(),
            races: 20,
            first: 6,
            second: 4,
            third: 3,
            fourth: 2,
            first_percent: 30,
            second_percent: 20,
            third_percent: 15,
            fourth_percent: 10,
            earnings: Some(125_000.0),
        }
    }

    #[test]
    fn test_insert_and_find_by_prefix() {
        let repo = HorseRepository::in_memory().unwrap();
        repo.insert_horse(&create_test_horse("Rainbow Dream", "5 år"))
            .unwrap();

        let found = repo.find_by_prefix("Rainbow", "5").unwrap().unwrap();
        assert_eq!(found.name, "Rainbow Dream");
        assert_eq!(found.age, "5 år");
        assert_eq!(found.first, 6);
        assert_eq!(found.earnings, Some(125_000.0));
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let repo = HorseRepository::in_memory().unwrap();
        repo.insert_horse(&create_test_horse("Rainbow Dream", "5 år"))
            .unwrap();

        assert!(repo.find_by_prefix("rainbow", "5").unwrap().is_some());
        assert!(repo.find_by_prefix("RAINBOW", "5").unwrap().is_some());
    }

    #[test]
    fn test_find_miss_returns_none() {
        let repo = HorseRepository::in_memory().unwrap();
        repo.insert_horse(&create_test_horse("Rainbow Dream", "5 år"))
            .unwrap();

        assert!(repo.find_by_prefix("Sunset", "5").unwrap().is_none());
        // Right name, wrong age
        assert!(repo.find_by_prefix("Rainbow", "7").unwrap().is_none());
    }

    #[test]
    fn test_find_requires_both_prefixes() {
        let repo = HorseRepository::in_memory().unwrap();
        repo.insert_horse(&create_test_horse("Rainbow Dream", "5 år"))
            .unwrap();
        repo.insert_horse(&create_test_horse("Rainbow Dancer", "12 år"))
            .unwrap();

        // The age prefix disambiguates horses sharing a name prefix
        let found = repo.find_by_prefix("Rainbow", "1").unwrap().unwrap();
        assert_eq!(found.name, "Rainbow Dancer");
    }

    #[test]
    fn test_find_tie_break_is_deterministic() {
        let repo = HorseRepository::in_memory().unwrap();
        // Inserted out of name order on purpose
        repo.insert_horse(&create_test_horse("Rainbow Runner", "5 år"))
            .unwrap();
        repo.insert_horse(&create_test_horse("Rainbow Dream", "5 år"))
            .unwrap();

        for _ in 0..3 {
            let found = repo.find_by_prefix("Rainbow", "5").unwrap().unwrap();
            assert_eq!(found.name, "Rainbow Dream");
        }
    }

    #[test]
    fn test_upsert_horse() {
        let repo = HorseRepository::in_memory().unwrap();
        let mut horse = create_test_horse("Rainbow Dream", "5 år");

        repo.insert_horse(&horse).unwrap();
        assert_eq!(repo.horse_count().unwrap(), 1);

        horse.first = 7;
        repo.insert_horse(&horse).unwrap();

        // Should still be 1 horse (upsert)
        assert_eq!(repo.horse_count().unwrap(), 1);
        let found = repo.find_by_prefix("Rainbow", "5").unwrap().unwrap();
        assert_eq!(found.first, 7);
    }

    #[test]
    fn test_complete_names() {
        let repo = HorseRepository::in_memory().unwrap();
        repo.insert_horse(&create_test_horse("Rainbow Runner", "5 år"))
            .unwrap();
        repo.insert_horse(&create_test_horse("Rainbow Dream", "7 år"))
            .unwrap();
        repo.insert_horse(&create_test_horse("Sunset Boulevard", "4 år"))
            .unwrap();

        let rows = repo.complete_names("Rainbow", 10).unwrap();
        assert_eq!(rows.len(), 2);
        // Ordered by name
        assert_eq!(rows[0].0, "Rainbow Dream");
        assert_eq!(rows[1].0, "Rainbow Runner");

        let rows = repo.complete_names("Rainbow", 1).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
