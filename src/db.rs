//! SQLite store for workouts, injuries, venues and personal records

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::CoachConfig;
use crate::intensity::{CROSSFIT_TAGS, PILATES_CLASS_TYPES};
use crate::models::{
  normalize_exercise_name, Injury, InjuryStatus, InjuryUpdate, Location, NewInjury, NewPersonalRecord,
  NewWorkout, PersonalRecord, Workout,
};

pub type DbPool = SqlitePool;

/// Application state holding the database connection pool
pub struct AppState {
  pub db: DbPool,
  pub config: CoachConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration failed: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Failed to encode {field}: {source}")]
  Encode {
    field: &'static str,
    source: serde_json::Error,
  },

  #[error("{0} not found")]
  NotFound(String),

  #[error("Invalid input: {0}")]
  Invalid(String),
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(config: &CoachConfig) -> Result<DbPool, StoreError> {
  tracing::info!(url = %config.database_url, "Initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&config.database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("Database initialized successfully");

  Ok(pool)
}

/// ---------------------------------------------------------------------------
/// Workouts
/// ---------------------------------------------------------------------------

/// Lowercased tags, rejecting anything outside the CrossFit vocabulary
fn normalize_tags(tags: &[String]) -> Result<Vec<String>, StoreError> {
  let mut normalized: Vec<String> = Vec::new();
  for tag in tags {
    let tag = tag.trim().to_lowercase();
    if !CROSSFIT_TAGS.contains(&tag.as_str()) {
      return Err(StoreError::Invalid(format!("unknown tag '{}'", tag)));
    }
    if !normalized.contains(&tag) {
      normalized.push(tag);
    }
  }
  Ok(normalized)
}

fn normalize_class_type(class_type: Option<&str>) -> Result<Option<String>, StoreError> {
  let Some(class_type) = class_type else {
    return Ok(None);
  };
  let class_type = class_type.trim().to_lowercase();
  if !PILATES_CLASS_TYPES.contains(&class_type.as_str()) {
    return Err(StoreError::Invalid(format!("unknown class type '{}'", class_type)));
  }
  Ok(Some(class_type))
}

pub async fn insert_workout(pool: &DbPool, workout: &NewWorkout) -> Result<i64, StoreError> {
  if workout.workout_type.trim().is_empty() {
    return Err(StoreError::Invalid("workout type is required".to_string()));
  }

  let tags = normalize_tags(&workout.tags)?;
  let class_type = normalize_class_type(workout.class_type.as_deref())?;

  let tags_json = if tags.is_empty() {
    None
  } else {
    Some(serde_json::to_string(&tags).map_err(|source| StoreError::Encode { field: "tags", source })?)
  };

  let result = sqlx::query(
    r#"
    INSERT INTO workouts (
      workout_type, date, location_id, duration_minutes, notes, class_type,
      tags_json, exercises_json, distance_km, elevation_m, calories
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    "#,
  )
  .bind(workout.workout_type.trim().to_lowercase())
  .bind(workout.date)
  .bind(&workout.location_id)
  .bind(workout.duration_minutes)
  .bind(&workout.notes)
  .bind(class_type)
  .bind(tags_json)
  .bind(&workout.exercises_json)
  .bind(workout.distance_km)
  .bind(workout.elevation_m)
  .bind(workout.calories)
  .execute(pool)
  .await?;

  let id = result.last_insert_rowid();
  tracing::debug!(workout_id = id, workout_type = %workout.workout_type, "Workout stored");

  Ok(id)
}

/// Workouts on or after `since`, most recent first
pub async fn list_workouts_since(pool: &DbPool, since: DateTime<Utc>) -> Result<Vec<Workout>, StoreError> {
  let workouts = sqlx::query_as::<_, Workout>("SELECT * FROM workouts WHERE date >= ?1 ORDER BY date DESC")
    .bind(since)
    .fetch_all(pool)
    .await?;

  Ok(workouts)
}

pub async fn list_recent_workouts(pool: &DbPool, limit: i64) -> Result<Vec<Workout>, StoreError> {
  let workouts = sqlx::query_as::<_, Workout>("SELECT * FROM workouts ORDER BY date DESC LIMIT ?1")
    .bind(limit)
    .fetch_all(pool)
    .await?;

  Ok(workouts)
}

pub async fn count_workouts(pool: &DbPool) -> Result<i64, StoreError> {
  let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workouts").fetch_one(pool).await?;
  Ok(count.0)
}

/// ---------------------------------------------------------------------------
/// Injuries
/// ---------------------------------------------------------------------------

pub async fn insert_injury(pool: &DbPool, injury: &NewInjury) -> Result<i64, StoreError> {
  if injury.name.trim().is_empty() {
    return Err(StoreError::Invalid("injury name is required".to_string()));
  }

  let result = sqlx::query(
    r#"
    INSERT INTO injuries (body_area, name, severity, status, notes, start_date)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#,
  )
  .bind(injury.body_area.as_str())
  .bind(injury.name.trim())
  .bind(injury.severity.as_str())
  .bind(injury.status.as_str())
  .bind(&injury.notes)
  .bind(injury.start_date)
  .execute(pool)
  .await?;

  let id = result.last_insert_rowid();
  tracing::info!(injury_id = id, body_area = %injury.body_area, severity = %injury.severity, "Injury logged");

  Ok(id)
}

/// Resolving stamps `end_date`; moving back to a current status clears it
pub async fn update_injury_status(pool: &DbPool, id: i64, status: InjuryStatus) -> Result<(), StoreError> {
  let end_date = match status {
    InjuryStatus::Resolved => Some(Utc::now()),
    InjuryStatus::Active | InjuryStatus::Recovering => None,
  };

  let result = sqlx::query("UPDATE injuries SET status = ?1, end_date = ?2 WHERE id = ?3")
    .bind(status.as_str())
    .bind(end_date)
    .bind(id)
    .execute(pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(StoreError::NotFound(format!("Injury {}", id)));
  }

  tracing::info!(injury_id = id, status = %status, "Injury status updated");
  Ok(())
}

/// Apply a partial edit. Resolving without an explicit end date stamps now.
pub async fn update_injury(pool: &DbPool, id: i64, update: &InjuryUpdate) -> Result<Injury, StoreError> {
  let existing = find_injury(pool, id).await?;

  let name = match update.name.as_deref().map(str::trim) {
    Some("") => return Err(StoreError::Invalid("injury name is required".to_string())),
    Some(name) => name.to_string(),
    None => existing.name.clone(),
  };
  let body_area = update
    .body_area
    .map(|a| a.as_str().to_string())
    .unwrap_or(existing.body_area);
  let severity = update
    .severity
    .map(|s| s.as_str().to_string())
    .unwrap_or(existing.severity);
  let status = update
    .status
    .map(|s| s.as_str().to_string())
    .unwrap_or(existing.status);
  let notes = update.notes.clone().or(existing.notes);

  let mut end_date = update.end_date.or(existing.end_date);
  if end_date.is_none() && update.status == Some(InjuryStatus::Resolved) {
    end_date = Some(Utc::now());
  }

  let updated = sqlx::query_as::<_, Injury>(
    r#"
    UPDATE injuries
    SET body_area = ?1, name = ?2, severity = ?3, status = ?4, notes = ?5, end_date = ?6
    WHERE id = ?7
    RETURNING *
    "#,
  )
  .bind(body_area)
  .bind(name)
  .bind(severity)
  .bind(status)
  .bind(notes)
  .bind(end_date)
  .bind(id)
  .fetch_one(pool)
  .await?;

  tracing::info!(injury_id = id, status = %updated.status, "Injury updated");
  Ok(updated)
}

pub async fn delete_injury(pool: &DbPool, id: i64) -> Result<(), StoreError> {
  let result = sqlx::query("DELETE FROM injuries WHERE id = ?1")
    .bind(id)
    .execute(pool)
    .await?;

  if result.rows_affected() == 0 {
    return Err(StoreError::NotFound(format!("Injury {}", id)));
  }

  tracing::info!(injury_id = id, "Injury deleted");
  Ok(())
}

pub async fn find_injury(pool: &DbPool, id: i64) -> Result<Injury, StoreError> {
  sqlx::query_as::<_, Injury>("SELECT * FROM injuries WHERE id = ?1")
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| StoreError::NotFound(format!("Injury {}", id)))
}

/// Injuries whose status is in `statuses` (all of them when empty), newest first
pub async fn list_injuries(pool: &DbPool, statuses: &[InjuryStatus]) -> Result<Vec<Injury>, StoreError> {
  let mut query = sqlx::QueryBuilder::<sqlx::Sqlite>::new("SELECT * FROM injuries");

  if !statuses.is_empty() {
    query.push(" WHERE status IN (");
    let mut separated = query.separated(", ");
    for status in statuses {
      separated.push_bind(status.as_str());
    }
    separated.push_unseparated(")");
  }
  query.push(" ORDER BY start_date DESC, id DESC");

  let injuries = query.build_query_as::<Injury>().fetch_all(pool).await?;
  Ok(injuries)
}

/// ---------------------------------------------------------------------------
/// Locations
/// ---------------------------------------------------------------------------

pub async fn list_locations(pool: &DbPool) -> Result<Vec<Location>, StoreError> {
  let locations = sqlx::query_as::<_, Location>("SELECT * FROM locations ORDER BY location_type, name")
    .fetch_all(pool)
    .await?;

  Ok(locations)
}

/// ---------------------------------------------------------------------------
/// Personal Records
/// ---------------------------------------------------------------------------

/// Insert or replace the record for the normalized exercise name
pub async fn upsert_personal_record(pool: &DbPool, record: &NewPersonalRecord) -> Result<PersonalRecord, StoreError> {
  let exercise_name = normalize_exercise_name(&record.display_name);
  if exercise_name.is_empty() {
    return Err(StoreError::Invalid(format!("exercise name '{}'", record.display_name)));
  }
  if !record.max_weight.is_finite() || record.max_weight <= 0.0 {
    return Err(StoreError::Invalid(format!("max weight {}", record.max_weight)));
  }

  let saved = sqlx::query_as::<_, PersonalRecord>(
    r#"
    INSERT INTO personal_records (exercise_name, display_name, max_weight, date, notes)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT(exercise_name) DO UPDATE SET
      display_name = excluded.display_name,
      max_weight = excluded.max_weight,
      date = excluded.date,
      notes = excluded.notes
    RETURNING *
    "#,
  )
  .bind(&exercise_name)
  .bind(record.display_name.trim())
  .bind(record.max_weight)
  .bind(Utc::now())
  .bind(&record.notes)
  .fetch_one(pool)
  .await?;

  tracing::info!(exercise = %saved.exercise_name, max_weight = saved.max_weight, "Personal record saved");

  Ok(saved)
}

pub async fn list_personal_records(pool: &DbPool) -> Result<Vec<PersonalRecord>, StoreError> {
  let records = sqlx::query_as::<_, PersonalRecord>("SELECT * FROM personal_records ORDER BY display_name")
    .fetch_all(pool)
    .await?;

  Ok(records)
}

/// Lookup accepts any spelling that normalizes to the stored key
pub async fn find_personal_record(pool: &DbPool, exercise: &str) -> Result<Option<PersonalRecord>, StoreError> {
  let record = sqlx::query_as::<_, PersonalRecord>("SELECT * FROM personal_records WHERE exercise_name = ?1")
    .bind(normalize_exercise_name(exercise))
    .fetch_optional(pool)
    .await?;

  Ok(record)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{BodyArea, InjurySeverity};
  use crate::test_utils::{datetime_days_ago, mock_new_injury, mock_new_workout, setup_test_db, teardown_test_db};

  #[tokio::test]
  async fn test_migrations_seed_locations() {
    let pool = setup_test_db().await;

    let locations = list_locations(&pool).await.unwrap();
    assert_eq!(locations.len(), 5);
    assert!(locations.iter().all(|l| l.kind().is_some()));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_insert_and_list_workouts_since() {
    let pool = setup_test_db().await;

    let mut crossfit = mock_new_workout("CrossFit", 1);
    crossfit.tags = vec!["push".to_string(), "cardio".to_string()];
    insert_workout(&pool, &crossfit).await.unwrap();
    insert_workout(&pool, &mock_new_workout("strength", 3)).await.unwrap();
    insert_workout(&pool, &mock_new_workout("mtb", 40)).await.unwrap();

    let recent = list_workouts_since(&pool, datetime_days_ago(30)).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].workout_type, "crossfit");
    assert_eq!(recent[0].tags(), vec!["push", "cardio"]);
    assert_eq!(recent[1].workout_type, "strength");
    assert!(recent[1].tags().is_empty());

    assert_eq!(count_workouts(&pool).await.unwrap(), 3);
    assert_eq!(list_recent_workouts(&pool, 1).await.unwrap().len(), 1);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_insert_workout_rejects_blank_type() {
    let pool = setup_test_db().await;

    let result = insert_workout(&pool, &mock_new_workout("  ", 0)).await;
    assert!(matches!(result, Err(StoreError::Invalid(_))));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_insert_workout_normalizes_vocabulary() {
    let pool = setup_test_db().await;

    let mut crossfit = mock_new_workout("crossfit", 0);
    crossfit.tags = vec![" Push".to_string(), "CARDIO".to_string(), "push".to_string()];
    insert_workout(&pool, &crossfit).await.unwrap();

    let mut sculpt = mock_new_workout("pilates", 1);
    sculpt.class_type = Some("Sculpt".to_string());
    insert_workout(&pool, &sculpt).await.unwrap();

    let stored = list_recent_workouts(&pool, 10).await.unwrap();
    assert_eq!(stored[0].tags(), vec!["push", "cardio"]);
    assert_eq!(stored[1].class_type.as_deref(), Some("sculpt"));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_insert_workout_rejects_unknown_vocabulary() {
    let pool = setup_test_db().await;

    let mut crossfit = mock_new_workout("crossfit", 0);
    crossfit.tags = vec!["legs".to_string()];
    assert!(matches!(insert_workout(&pool, &crossfit).await, Err(StoreError::Invalid(_))));

    let mut pilates = mock_new_workout("pilates", 0);
    pilates.class_type = Some("barre".to_string());
    assert!(matches!(insert_workout(&pool, &pilates).await, Err(StoreError::Invalid(_))));

    assert_eq!(count_workouts(&pool).await.unwrap(), 0);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_injury_status_lifecycle() {
    let pool = setup_test_db().await;

    let id = insert_injury(&pool, &mock_new_injury(BodyArea::Knee, InjurySeverity::Moderate))
      .await
      .unwrap();

    let active = list_injuries(&pool, &[InjuryStatus::Active]).await.unwrap();
    assert_eq!(active.len(), 1);
    assert!(active[0].end_date.is_none());

    update_injury_status(&pool, id, InjuryStatus::Resolved).await.unwrap();
    let resolved = find_injury(&pool, id).await.unwrap();
    assert_eq!(resolved.status, "resolved");
    assert!(resolved.end_date.is_some());

    assert!(list_injuries(&pool, &[InjuryStatus::Active, InjuryStatus::Recovering])
      .await
      .unwrap()
      .is_empty());
    assert_eq!(list_injuries(&pool, &[]).await.unwrap().len(), 1);

    update_injury_status(&pool, id, InjuryStatus::Recovering).await.unwrap();
    assert!(find_injury(&pool, id).await.unwrap().end_date.is_none());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_update_injury_keeps_unset_fields() {
    let pool = setup_test_db().await;

    let id = insert_injury(&pool, &mock_new_injury(BodyArea::Knee, InjurySeverity::Moderate))
      .await
      .unwrap();

    let update = InjuryUpdate {
      name: Some("Meniscus issue".to_string()),
      severity: Some(InjurySeverity::Mild),
      notes: Some("cleared for cycling".to_string()),
      ..Default::default()
    };
    let updated = update_injury(&pool, id, &update).await.unwrap();
    assert_eq!(updated.name, "Meniscus issue");
    assert_eq!(updated.severity, "mild");
    assert_eq!(updated.body_area, "knee");
    assert_eq!(updated.status, "active");
    assert_eq!(updated.notes.as_deref(), Some("cleared for cycling"));
    assert!(updated.end_date.is_none());

    let resolve = InjuryUpdate {
      status: Some(InjuryStatus::Resolved),
      ..Default::default()
    };
    let resolved = update_injury(&pool, id, &resolve).await.unwrap();
    assert_eq!(resolved.status, "resolved");
    assert!(resolved.end_date.is_some());
    assert_eq!(resolved.notes.as_deref(), Some("cleared for cycling"));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_update_injury_rejects_blank_name() {
    let pool = setup_test_db().await;

    let id = insert_injury(&pool, &mock_new_injury(BodyArea::Hip, InjurySeverity::Mild))
      .await
      .unwrap();
    let update = InjuryUpdate {
      name: Some("   ".to_string()),
      ..Default::default()
    };
    assert!(matches!(update_injury(&pool, id, &update).await, Err(StoreError::Invalid(_))));
    assert!(matches!(
      update_injury(&pool, 404, &InjuryUpdate::default()).await,
      Err(StoreError::NotFound(_))
    ));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_delete_injury() {
    let pool = setup_test_db().await;

    let id = insert_injury(&pool, &mock_new_injury(BodyArea::Ankle, InjurySeverity::Severe))
      .await
      .unwrap();
    delete_injury(&pool, id).await.unwrap();

    assert!(list_injuries(&pool, &[]).await.unwrap().is_empty());
    assert!(matches!(delete_injury(&pool, id).await, Err(StoreError::NotFound(_))));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_update_missing_injury_is_not_found() {
    let pool = setup_test_db().await;

    let result = update_injury_status(&pool, 999, InjuryStatus::Resolved).await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_personal_record_upsert_replaces() {
    let pool = setup_test_db().await;

    let first = NewPersonalRecord {
      display_name: "Back Squat".to_string(),
      max_weight: 100.0,
      notes: None,
    };
    let saved = upsert_personal_record(&pool, &first).await.unwrap();
    assert_eq!(saved.exercise_name, "back_squat");

    let second = NewPersonalRecord {
      display_name: "Back Squat".to_string(),
      max_weight: 110.0,
      notes: Some("belt".to_string()),
    };
    upsert_personal_record(&pool, &second).await.unwrap();

    let records = list_personal_records(&pool).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].max_weight, 110.0);

    let found = find_personal_record(&pool, " back  SQUAT ").await.unwrap();
    assert_eq!(found.map(|r| r.max_weight), Some(110.0));
    assert!(find_personal_record(&pool, "deadlift").await.unwrap().is_none());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_personal_record_rejects_bad_input() {
    let pool = setup_test_db().await;

    let zero = NewPersonalRecord {
      display_name: "Deadlift".to_string(),
      max_weight: 0.0,
      notes: None,
    };
    assert!(matches!(upsert_personal_record(&pool, &zero).await, Err(StoreError::Invalid(_))));

    let unnamed = NewPersonalRecord {
      display_name: "!!".to_string(),
      max_weight: 50.0,
      notes: None,
    };
    assert!(matches!(upsert_personal_record(&pool, &unnamed).await, Err(StoreError::Invalid(_))));

    teardown_test_db(pool).await;
  }
}
