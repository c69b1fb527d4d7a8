//! Dashboard statistics: weekly counts, monthly muscle balance, all-time total

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::balance::{aggregate, balance_score, find_imbalances, Imbalances};
use crate::intensity::IntensityVector;
use crate::models::WorkoutRecord;

pub const WEEKLY_WINDOW_DAYS: i64 = 7;
pub const MONTHLY_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStats {
  pub total: usize,
  pub by_type: BTreeMap<String, usize>,
  /// Most recent first
  pub workouts: Vec<WorkoutRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBalance {
  pub muscle_balance: IntensityVector,
  pub imbalances: Imbalances,
  pub balance_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
  pub weekly: WeeklyStats,
  pub monthly: MonthlyBalance,
  pub all_time_total: i64,
}

impl TrainingStats {
  /// `weekly` and `monthly` are the workouts inside each window
  pub fn compute(weekly: &[WorkoutRecord], monthly: &[WorkoutRecord], all_time_total: i64) -> Self {
    let mut by_type = BTreeMap::new();
    for w in weekly {
      *by_type.entry(w.workout_type.to_lowercase()).or_insert(0) += 1;
    }

    let mut workouts = weekly.to_vec();
    workouts.sort_by(|a, b| b.date.cmp(&a.date));

    let muscle_balance = aggregate(monthly);

    Self {
      weekly: WeeklyStats {
        total: weekly.len(),
        by_type,
        workouts,
      },
      monthly: MonthlyBalance {
        imbalances: find_imbalances(&muscle_balance),
        balance_score: balance_score(&muscle_balance),
        muscle_balance,
      },
      all_time_total,
    }
  }
}
