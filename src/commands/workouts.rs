//! Workout logging and history

use serde::{Deserialize, Serialize};

use crate::db::{self, AppState};
use crate::intensity::{muscle_groups_for, MuscleGroup};
use crate::models::{NewWorkout, Workout};

const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// A stored workout with the muscle groups it loads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutWithGroups {
  #[serde(flatten)]
  pub workout: Workout,
  pub tags: Vec<String>,
  pub muscle_groups: Vec<MuscleGroup>,
}

impl From<Workout> for WorkoutWithGroups {
  fn from(workout: Workout) -> Self {
    let tags = workout.tags();
    let muscle_groups = muscle_groups_for(&workout.workout_type, workout.class_type.as_deref(), &tags);
    Self {
      workout,
      tags,
      muscle_groups,
    }
  }
}

pub async fn log_workout(state: &AppState, workout: NewWorkout) -> Result<i64, String> {
  db::insert_workout(&state.db, &workout)
    .await
    .map_err(|e| format!("Failed to log workout: {}", e))
}

/// Most recent workouts first, 50 unless a limit is given
pub async fn list_workouts(state: &AppState, limit: Option<i64>) -> Result<Vec<WorkoutWithGroups>, String> {
  let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_HISTORY_LIMIT);

  let workouts = db::list_recent_workouts(&state.db, limit)
    .await
    .map_err(|e| format!("Failed to fetch workouts: {}", e))?;

  Ok(workouts.into_iter().map(WorkoutWithGroups::from).collect())
}
