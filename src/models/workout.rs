use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Workout {
  pub id: i64,
  pub workout_type: String,
  pub date: DateTime<Utc>,
  pub location_id: Option<String>,
  pub duration_minutes: Option<i64>,
  pub notes: Option<String>,
  /// Pilates only: hiit, pilates, sculpt
  pub class_type: Option<String>,
  /// CrossFit only: JSON array of tags, e.g. `["push","cardio"]`
  pub tags_json: Option<String>,
  /// Strength only: JSON array of logged exercises
  pub exercises_json: Option<String>,
  /// Mountain biking only
  pub distance_km: Option<f64>,
  pub elevation_m: Option<f64>,
  pub calories: Option<i64>,
  pub created_at: Option<DateTime<Utc>>,
}

/// For inserting new workouts (without id, created_at)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewWorkout {
  pub workout_type: String,
  pub date: DateTime<Utc>,
  pub location_id: Option<String>,
  pub duration_minutes: Option<i64>,
  pub notes: Option<String>,
  pub class_type: Option<String>,
  pub tags: Vec<String>,
  pub exercises_json: Option<String>,
  pub distance_km: Option<f64>,
  pub elevation_m: Option<f64>,
  pub calories: Option<i64>,
}

/// The slice of a workout the coaching engine reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
  pub workout_type: String,
  pub class_type: Option<String>,
  #[serde(default)]
  pub tags: Vec<String>,
  pub date: DateTime<Utc>,
}

impl Workout {
  /// Parsed CrossFit tags. Malformed JSON counts as untagged.
  pub fn tags(&self) -> Vec<String> {
    let Some(raw) = self.tags_json.as_deref() else {
      return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
      Ok(tags) => tags,
      Err(e) => {
        tracing::warn!(workout_id = self.id, error = %e, "Ignoring malformed workout tags");
        Vec::new()
      }
    }
  }

  pub fn to_record(&self) -> WorkoutRecord {
    WorkoutRecord {
      workout_type: self.workout_type.clone(),
      class_type: self.class_type.clone(),
      tags: self.tags(),
      date: self.date,
    }
  }
}

impl WorkoutRecord {
  pub fn new(workout_type: &str, date: DateTime<Utc>) -> Self {
    Self {
      workout_type: workout_type.to_string(),
      class_type: None,
      tags: Vec::new(),
      date,
    }
  }

  pub fn with_class(mut self, class_type: &str) -> Self {
    self.class_type = Some(class_type.to_string());
    self
  }

  pub fn with_tags(mut self, tags: &[&str]) -> Self {
    self.tags = tags.iter().map(|t| t.to_string()).collect();
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn stored(tags_json: Option<&str>) -> Workout {
    Workout {
      id: 7,
      workout_type: "crossfit".to_string(),
      date: Utc::now(),
      location_id: None,
      duration_minutes: Some(60),
      notes: None,
      class_type: None,
      tags_json: tags_json.map(|s| s.to_string()),
      exercises_json: None,
      distance_km: None,
      elevation_m: None,
      calories: None,
      created_at: None,
    }
  }

  #[test]
  fn test_tags_parse_from_json() {
    let workout = stored(Some(r#"["push","cardio"]"#));
    assert_eq!(workout.tags(), vec!["push".to_string(), "cardio".to_string()]);
    assert_eq!(workout.to_record().tags.len(), 2);
  }

  #[test]
  fn test_malformed_tags_degrade_to_empty() {
    assert!(stored(Some("push,cardio")).tags().is_empty());
    assert!(stored(None).tags().is_empty());
  }
}
