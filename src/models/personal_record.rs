use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Best recorded lift for a named exercise
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PersonalRecord {
  pub id: i64,
  /// Normalized key, see `normalize_exercise_name`
  pub exercise_name: String,
  pub display_name: String,
  pub max_weight: f64,
  pub date: DateTime<Utc>,
  pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPersonalRecord {
  pub display_name: String,
  pub max_weight: f64,
  pub notes: Option<String>,
}

impl PersonalRecord {
  /// Weight to load for a given percentage of max, rounded to the nearest unit
  pub fn working_weight(&self, percentage: u8) -> f64 {
    (self.max_weight * f64::from(percentage) / 100.0).round()
  }
}

/// "Bench Press" -> "bench_press", "Clean & Jerk" -> "clean__jerk"
pub fn normalize_exercise_name(name: &str) -> String {
  name
    .trim()
    .to_lowercase()
    .split_whitespace()
    .collect::<Vec<_>>()
    .join("_")
    .chars()
    .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_normalize_exercise_name() {
    assert_eq!(normalize_exercise_name("Bench Press"), "bench_press");
    assert_eq!(normalize_exercise_name("  Pull-ups "), "pullups");
    assert_eq!(normalize_exercise_name("Clean & Jerk"), "clean__jerk");
  }

  #[test]
  fn test_working_weight_rounds() {
    let pr = PersonalRecord {
      id: 1,
      exercise_name: "back_squat".to_string(),
      display_name: "Back Squat".to_string(),
      max_weight: 225.0,
      date: Utc::now(),
      notes: None,
    };
    assert_eq!(pr.working_weight(70), 158.0);
    assert_eq!(pr.working_weight(0), 0.0);
    assert_eq!(pr.working_weight(100), 225.0);
  }
}
