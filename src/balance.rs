//! Muscle balance aggregation
//!
//! Folds a set of workouts into cumulative per-group load and derives the
//! balance signals the recommendation engine reads: neglected/overtrained
//! groups, a 0-100 balance score and the strongest/weakest areas.

use serde::{Deserialize, Serialize};

use crate::intensity::{intensity_for, IntensityVector, MuscleGroup};
use crate::models::WorkoutRecord;

/// Below this share of the average a group is neglected
const NEGLECTED_RATIO: f64 = 0.5;
/// Above this share of the average a group is overtrained
const OVERTRAINED_RATIO: f64 = 1.5;

/// Cumulative load over the given workouts (summed, not averaged), rounded
/// to one decimal per group.
pub fn aggregate(workouts: &[WorkoutRecord]) -> IntensityVector {
  let mut totals = IntensityVector::ZERO;

  for w in workouts {
    totals += intensity_for(&w.workout_type, w.class_type.as_deref(), &w.tags);
  }

  totals.rounded()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Imbalances {
  pub neglected: Vec<MuscleGroup>,
  pub overtrained: Vec<MuscleGroup>,
}

impl Imbalances {
  pub fn is_balanced(&self) -> bool {
    self.neglected.is_empty() && self.overtrained.is_empty()
  }
}

/// Groups far below or above the mean load. No training at all flags nothing.
pub fn find_imbalances(balance: &IntensityVector) -> Imbalances {
  let avg = balance.total() / MuscleGroup::ALL.len() as f64;
  let mut imbalances = Imbalances::default();

  if avg <= 0.0 {
    return imbalances;
  }

  for (group, value) in balance.iter() {
    if value < avg * NEGLECTED_RATIO {
      imbalances.neglected.push(group);
    } else if value > avg * OVERTRAINED_RATIO {
      imbalances.overtrained.push(group);
    }
  }

  imbalances
}

pub fn total_intensity(balance: &IntensityVector) -> f64 {
  balance.total()
}

/// Ratio of least to most trained group as a percentage. An all-zero vector
/// is vacuously balanced (100).
pub fn balance_score(balance: &IntensityVector) -> u8 {
  let max = balance.iter().map(|(_, v)| v).fold(f64::MIN, f64::max);
  let min = balance.iter().map(|(_, v)| v).fold(f64::MAX, f64::min);

  if max <= 0.0 {
    return 100;
  }

  ((min / max) * 100.0).round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedAreas {
  pub strongest: Vec<MuscleGroup>,
  pub weakest: Vec<MuscleGroup>,
}

/// Top two groups with any load, and the bottom two that sit under half of
/// the single highest group. The filters are deliberately asymmetric, so
/// either list may hold fewer than two entries.
pub fn areas_by_intensity(balance: &IntensityVector) -> RankedAreas {
  let mut sorted: Vec<(MuscleGroup, f64)> = balance.iter().collect();
  // Stable sort keeps canonical order on ties
  sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

  let highest = sorted.first().map(|(_, v)| *v).unwrap_or(0.0);

  let strongest = sorted
    .iter()
    .take(2)
    .filter(|(_, v)| *v > 0.0)
    .map(|(g, _)| *g)
    .collect();

  let weakest = sorted
    .iter()
    .skip(sorted.len().saturating_sub(2))
    .filter(|(_, v)| *v < highest * 0.5)
    .map(|(g, _)| *g)
    .collect();

  RankedAreas { strongest, weakest }
}

/// Display band for an accumulated intensity value
pub fn intensity_label(value: f64) -> &'static str {
  match value {
    v if v <= 0.0 => "none",
    v if v < 1.0 => "minimal",
    v if v < 2.0 => "light",
    v if v < 3.0 => "moderate",
    v if v < 4.0 => "solid",
    _ => "heavy",
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
