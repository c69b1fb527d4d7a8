//! Injury tracking and per-exercise load checks

use serde::{Deserialize, Serialize};

use crate::commands::current_injuries;
use crate::db::{self, AppState};
use crate::injury::{
  common_injuries, exercise_recommendation, resolve, workouts_for_injuries, ExerciseRecommendation,
  InjuryModifications, InjuryWorkoutGuidance,
};
use crate::models::{BodyArea, Injury, InjuryStatus, InjuryUpdate, NewInjury};

/// Whether an exercise is safe today, with a concrete weight when a PR exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseCheck {
  pub exercise: String,
  #[serde(flatten)]
  pub recommendation: ExerciseRecommendation,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub max_weight: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub working_weight: Option<f64>,
}

/// Restrictions and activity guidance implied by the current injuries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryOverview {
  pub modifications: InjuryModifications,
  pub guidance: InjuryWorkoutGuidance,
}

pub async fn log_injury(state: &AppState, injury: NewInjury) -> Result<i64, String> {
  db::insert_injury(&state.db, &injury)
    .await
    .map_err(|e| format!("Failed to log injury: {}", e))
}

pub async fn update_injury_status(state: &AppState, id: i64, status: InjuryStatus) -> Result<Injury, String> {
  db::update_injury_status(&state.db, id, status)
    .await
    .map_err(|e| format!("Failed to update injury: {}", e))?;

  db::find_injury(&state.db, id)
    .await
    .map_err(|e| format!("Failed to fetch injury: {}", e))
}

pub async fn edit_injury(state: &AppState, id: i64, update: InjuryUpdate) -> Result<Injury, String> {
  db::update_injury(&state.db, id, &update)
    .await
    .map_err(|e| format!("Failed to update injury: {}", e))
}

pub async fn delete_injury(state: &AppState, id: i64) -> Result<(), String> {
  db::delete_injury(&state.db, id)
    .await
    .map_err(|e| format!("Failed to delete injury: {}", e))
}

/// Preset injury names for a body area
pub fn get_common_injuries(body_area: BodyArea) -> Vec<String> {
  common_injuries(body_area).into_iter().map(str::to_string).collect()
}

/// Injuries with any of the given statuses; all injuries when none are given
pub async fn list_injuries(state: &AppState, statuses: &[InjuryStatus]) -> Result<Vec<Injury>, String> {
  db::list_injuries(&state.db, statuses)
    .await
    .map_err(|e| format!("Failed to fetch injuries: {}", e))
}

pub async fn get_injury_overview(state: &AppState) -> Result<InjuryOverview, String> {
  let injuries = current_injuries(state).await?;
  let modifications = resolve(&injuries);
  let guidance = workouts_for_injuries(&modifications);

  Ok(InjuryOverview {
    modifications,
    guidance,
  })
}

pub async fn check_exercise(state: &AppState, exercise: &str) -> Result<ExerciseCheck, String> {
  let injuries = current_injuries(state).await?;
  let recommendation = exercise_recommendation(exercise, &injuries);

  let record = db::find_personal_record(&state.db, exercise)
    .await
    .map_err(|e| format!("Failed to fetch personal record: {}", e))?;

  let working_weight = record
    .as_ref()
    .map(|pr| pr.working_weight(recommendation.recommended_percentage));

  Ok(ExerciseCheck {
    exercise: exercise.trim().to_string(),
    max_weight: record.map(|pr| pr.max_weight),
    working_weight,
    recommendation,
  })
}
