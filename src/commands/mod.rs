pub mod injuries;
pub mod records;
pub mod workouts;

use chrono::{Duration, Utc};

use crate::db::{self, AppState};
use crate::models::{InjuryRecord, InjuryStatus, WorkoutRecord};
use crate::recommendation::{generate_recommendation, Recommendation};
use crate::stats::{TrainingStats, MONTHLY_WINDOW_DAYS, WEEKLY_WINDOW_DAYS};

/// Injuries the engine treats as current
pub(crate) const CURRENT_STATUSES: [InjuryStatus; 2] = [InjuryStatus::Active, InjuryStatus::Recovering];

/// Current injuries as engine records
pub(crate) async fn current_injuries(state: &AppState) -> Result<Vec<InjuryRecord>, String> {
  let injuries = db::list_injuries(&state.db, &CURRENT_STATUSES)
    .await
    .map_err(|e| format!("Failed to fetch injuries: {}", e))?;

  Ok(injuries.iter().map(|i| i.to_record()).collect())
}

/// Next-workout recommendation from the configured history window. The
/// latest workout is always included so long breaks are still detected.
pub async fn get_recommendation(state: &AppState) -> Result<Recommendation, String> {
  let since = Utc::now() - Duration::days(state.config.history_days);

  let mut history = db::list_workouts_since(&state.db, since)
    .await
    .map_err(|e| format!("Failed to fetch workouts: {}", e))?;

  // A non-empty window already holds the latest workout
  if history.is_empty() {
    history = db::list_recent_workouts(&state.db, 1)
      .await
      .map_err(|e| format!("Failed to fetch workouts: {}", e))?;
  }

  let workouts: Vec<WorkoutRecord> = history.iter().map(|w| w.to_record()).collect();

  let locations = db::list_locations(&state.db)
    .await
    .map_err(|e| format!("Failed to fetch locations: {}", e))?;

  let injuries = current_injuries(state).await?;

  tracing::debug!(
    workouts = workouts.len(),
    injuries = injuries.len(),
    "Generating recommendation"
  );

  Ok(generate_recommendation(&workouts, &locations, &injuries))
}

/// Weekly counts, monthly balance and the all-time total
pub async fn get_training_stats(state: &AppState) -> Result<TrainingStats, String> {
  let now = Utc::now();
  let week_start = now - Duration::days(WEEKLY_WINDOW_DAYS);

  let monthly: Vec<WorkoutRecord> = db::list_workouts_since(&state.db, now - Duration::days(MONTHLY_WINDOW_DAYS))
    .await
    .map_err(|e| format!("Failed to fetch workouts: {}", e))?
    .iter()
    .map(|w| w.to_record())
    .collect();

  let weekly: Vec<WorkoutRecord> = monthly.iter().filter(|w| w.date >= week_start).cloned().collect();

  let all_time_total = db::count_workouts(&state.db)
    .await
    .map_err(|e| format!("Failed to count workouts: {}", e))?;

  Ok(TrainingStats::compute(&weekly, &monthly, all_time_total))
}


#[cfg(test)]
mod tests {
  use super::test_support::test_state;
  use super::*;
  use crate::recommendation::RecommendationKind;
  use crate::test_utils::{mock_new_workout, seed_test_injuries, seed_test_workouts, teardown_test_db};

  #[tokio::test]
  async fn test_recommendation_for_empty_history() {
    let state = test_state().await;

    let rec = get_recommendation(&state).await.unwrap();
    assert_eq!(rec.kind(), RecommendationKind::Workout);
    assert_eq!(rec.title(), "Well-balanced training!");
    assert_eq!(
      rec.suggested_workout().and_then(|s| s.location.as_deref()),
      Some("CrossFit Kerosene")
    );

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_recommendation_respects_current_injuries() {
    let state = test_state().await;
    seed_test_workouts(&state.db, 3).await;
    seed_test_injuries(&state.db).await;

    let rec = get_recommendation(&state).await.unwrap();
    assert_eq!(rec.title(), "Injury-aware recommendation");

    // Only the active shoulder injury is current, the resolved knee is ignored
    let guidance = rec.injury().unwrap();
    assert_eq!(guidance.warnings.len(), 1);
    assert!(guidance.warnings[0].starts_with("Rotator cuff strain"));
    assert_eq!(guidance.weight_recommendation.as_ref().map(|w| w.percentage), Some(0));

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_recommendation_welcomes_back_after_break() {
    let state = test_state().await;
    db::insert_workout(&state.db, &mock_new_workout("strength", 6)).await.unwrap();

    let rec = get_recommendation(&state).await.unwrap();
    assert_eq!(rec.kind(), RecommendationKind::Insight);
    assert_eq!(rec.title(), "Welcome back!");

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_recommendation_welcomes_back_after_history_window() {
    let state = test_state().await;
    db::insert_workout(&state.db, &mock_new_workout("strength", 60)).await.unwrap();
    db::insert_workout(&state.db, &mock_new_workout("mtb", 45)).await.unwrap();

    // Last session is outside the 30 day window but still counts
    let rec = get_recommendation(&state).await.unwrap();
    assert_eq!(rec.title(), "Welcome back!");
    assert!(rec.description().contains("45 days"));
    assert_eq!(rec.insights().total_intensity, 0.0);

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_recommendation_with_unrecognized_stored_body_area() {
    let state = test_state().await;
    sqlx::query(
      "INSERT INTO injuries (body_area, name, severity, status, start_date) VALUES ('toe', 'Stubbed toe', 'severe', 'active', ?1)",
    )
    .bind(Utc::now())
    .execute(&state.db)
    .await
    .unwrap();

    // Custom areas restrict nothing, so the injury rule stays quiet
    let rec = get_recommendation(&state).await.unwrap();
    assert_eq!(rec.title(), "Well-balanced training!");
    assert!(rec.injury().is_none());

    let overview = injuries::get_injury_overview(&state).await.unwrap();
    assert_eq!(overview.modifications.warnings.len(), 1);
    assert!(overview.modifications.warnings[0].contains("Listen to your body"));

    teardown_test_db(state.db).await;
  }

  #[tokio::test]
  async fn test_training_stats_windows() {
    let state = test_state().await;
    seed_test_workouts(&state.db, 5).await;
    db::insert_workout(&state.db, &mock_new_workout("pilates", 20)).await.unwrap();
    db::insert_workout(&state.db, &mock_new_workout("pilates", 60)).await.unwrap();

    let stats = get_training_stats(&state).await.unwrap();
    assert_eq!(stats.weekly.total, 5);
    assert_eq!(stats.weekly.by_type.get("crossfit"), Some(&2));
    assert_eq!(stats.weekly.by_type.get("strength"), Some(&2));
    assert_eq!(stats.weekly.by_type.get("mtb"), Some(&1));
    assert_eq!(stats.weekly.by_type.get("pilates"), None);
    assert_eq!(stats.all_time_total, 7);

    // Monthly core: 4 x 0.5 (crossfit, strength) + 0.5 (mtb) + 0.75 (20-day-old pilates)
    crate::assert_approx_eq!(stats.monthly.muscle_balance.core, 3.3, 0.01);

    teardown_test_db(state.db).await;
  }
}
