//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Helper assertions

use crate::models::{BodyArea, InjurySeverity, InjuryStatus, NewInjury, NewWorkout};
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed the database with test workouts, one per day going back from today
/// Cycles crossfit (push tagged), strength and mtb. Returns the created IDs
pub async fn seed_test_workouts(pool: &SqlitePool, count: usize) -> Vec<i64> {
  let mut workout_ids = Vec::new();

  for i in 0..count {
    let (workout_type, tags_json, distance_km) = match i % 3 {
      0 => ("crossfit", Some(r#"["push"]"#), None),
      1 => ("strength", None, None),
      _ => ("mtb", None, Some(18.5)),
    };

    let result = sqlx::query(
      r#"
      INSERT INTO workouts (workout_type, date, duration_minutes, tags_json, distance_km)
      VALUES (?1, ?2, ?3, ?4, ?5)
      "#,
    )
    .bind(workout_type)
    .bind(datetime_days_ago(i as i64))
    .bind(60)
    .bind(tags_json)
    .bind(distance_km)
    .execute(pool)
    .await
    .expect("Failed to insert test workout");

    workout_ids.push(result.last_insert_rowid());
  }

  workout_ids
}

/// Seed a severe active shoulder injury and a resolved knee injury
pub async fn seed_test_injuries(pool: &SqlitePool) -> Vec<i64> {
  let injuries = [
    ("shoulder", "Rotator cuff strain", "severe", "active", None),
    ("knee", "Patellar tendinitis", "moderate", "resolved", Some(datetime_days_ago(2))),
  ];

  let mut ids = Vec::new();
  for (area, name, severity, status, end_date) in injuries {
    let result = sqlx::query(
      r#"
      INSERT INTO injuries (body_area, name, severity, status, start_date, end_date)
      VALUES (?1, ?2, ?3, ?4, ?5, ?6)
      "#,
    )
    .bind(area)
    .bind(name)
    .bind(severity)
    .bind(status)
    .bind(datetime_days_ago(14))
    .bind(end_date)
    .execute(pool)
    .await
    .expect("Failed to insert test injury");

    ids.push(result.last_insert_rowid());
  }

  ids
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn mock_new_workout(workout_type: &str, days_ago: i64) -> NewWorkout {
  NewWorkout {
    workout_type: workout_type.to_string(),
    date: datetime_days_ago(days_ago),
    duration_minutes: Some(60),
    ..Default::default()
  }
}

pub fn mock_new_injury(body_area: BodyArea, severity: InjurySeverity) -> NewInjury {
  NewInjury {
    body_area,
    name: format!("{} {}", severity, body_area),
    severity,
    status: InjuryStatus::Active,
    notes: None,
    start_date: datetime_days_ago(3),
  }
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Create a DateTime N days ago from now
pub fn datetime_days_ago(days: i64) -> DateTime<Utc> {
  Utc::now() - Duration::days(days)
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('workouts', 'injuries', 'locations', 'personal_records')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 4, "Expected 4 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_helpers_insert_rows() {
    let pool = setup_test_db().await;

    let ids = seed_test_workouts(&pool, 5).await;
    assert_eq!(ids.len(), 5);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workouts")
      .fetch_one(&pool)
      .await
      .expect("Failed to count workouts");
    assert_eq!(count, 5);

    assert_eq!(seed_test_injuries(&pool).await.len(), 2);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let workout = mock_new_workout("mtb", 2);
    assert_eq!(workout.workout_type, "mtb");
    assert!(workout.tags.is_empty());

    let injury = mock_new_injury(BodyArea::Wrist, InjurySeverity::Mild);
    assert_eq!(injury.name, "mild wrist");
    assert!(injury.status.is_current());
  }

  #[test]
  fn test_datetime_helpers_produce_correct_dates() {
    let diff = Utc::now() - datetime_days_ago(7);
    // Allow for slight timing differences (6-8 days is acceptable)
    assert!(diff.num_days() >= 6 && diff.num_days() <= 8,
            "Expected ~7 days difference, got {}", diff.num_days());
  }
}
