//! Intensity profiles for each workout type
//!
//! Every logged workout maps to a six-component load vector, one weight per
//! muscle group. Weights follow a coarse scale:
//! 0 = none, 0.25 = light, 0.5 = moderate, 0.75 = heavy, 1.0 = very heavy.
//!
//! Fixed-format classes (pilates, hiit, sculpt), strength and mountain biking
//! have hand-tuned profiles. CrossFit varies day to day, so its profile is
//! built from the tags picked when the session was logged.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// ---------------------------------------------------------------------------
/// Muscle Groups
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MuscleGroup {
  Push,
  Pull,
  Upper,
  Lower,
  Cardio,
  Core,
}

impl MuscleGroup {
  /// Canonical order, used for iteration and tie-breaking everywhere
  pub const ALL: [MuscleGroup; 6] = [
    MuscleGroup::Push,
    MuscleGroup::Pull,
    MuscleGroup::Upper,
    MuscleGroup::Lower,
    MuscleGroup::Cardio,
    MuscleGroup::Core,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      MuscleGroup::Push => "push",
      MuscleGroup::Pull => "pull",
      MuscleGroup::Upper => "upper",
      MuscleGroup::Lower => "lower",
      MuscleGroup::Cardio => "cardio",
      MuscleGroup::Core => "core",
    }
  }

  /// The group that offsets this one when it dominates training
  pub fn opposite(&self) -> MuscleGroup {
    match self {
      MuscleGroup::Push => MuscleGroup::Pull,
      MuscleGroup::Pull => MuscleGroup::Push,
      MuscleGroup::Upper => MuscleGroup::Lower,
      MuscleGroup::Lower => MuscleGroup::Upper,
      MuscleGroup::Cardio => MuscleGroup::Core,
      MuscleGroup::Core => MuscleGroup::Cardio,
    }
  }
}

impl std::fmt::Display for MuscleGroup {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for MuscleGroup {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "push" => Ok(Self::Push),
      "pull" => Ok(Self::Pull),
      "upper" => Ok(Self::Upper),
      "lower" => Ok(Self::Lower),
      "cardio" => Ok(Self::Cardio),
      "core" => Ok(Self::Core),
      _ => Err(format!("Unknown muscle group: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Intensity Vector
/// ---------------------------------------------------------------------------

/// Load per muscle group. Per-workout values stay within 0.0-1.0; sums over
/// several workouts are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IntensityVector {
  pub push: f64,
  pub pull: f64,
  pub upper: f64,
  pub lower: f64,
  pub cardio: f64,
  pub core: f64,
}

impl IntensityVector {
  pub const ZERO: IntensityVector = IntensityVector::uniform(0.0);

  pub const fn new(push: f64, pull: f64, upper: f64, lower: f64, cardio: f64, core: f64) -> Self {
    Self {
      push,
      pull,
      upper,
      lower,
      cardio,
      core,
    }
  }

  pub const fn uniform(value: f64) -> Self {
    Self::new(value, value, value, value, value, value)
  }

  pub fn get(&self, group: MuscleGroup) -> f64 {
    match group {
      MuscleGroup::Push => self.push,
      MuscleGroup::Pull => self.pull,
      MuscleGroup::Upper => self.upper,
      MuscleGroup::Lower => self.lower,
      MuscleGroup::Cardio => self.cardio,
      MuscleGroup::Core => self.core,
    }
  }

  pub fn set(&mut self, group: MuscleGroup, value: f64) {
    let slot = match group {
      MuscleGroup::Push => &mut self.push,
      MuscleGroup::Pull => &mut self.pull,
      MuscleGroup::Upper => &mut self.upper,
      MuscleGroup::Lower => &mut self.lower,
      MuscleGroup::Cardio => &mut self.cardio,
      MuscleGroup::Core => &mut self.core,
    };
    *slot = value;
  }

  /// (group, value) pairs in canonical order
  pub fn iter(&self) -> impl Iterator<Item = (MuscleGroup, f64)> + '_ {
    MuscleGroup::ALL.iter().map(move |g| (*g, self.get(*g)))
  }

  pub fn total(&self) -> f64 {
    self.iter().map(|(_, v)| v).sum()
  }

  /// Each component rounded to one decimal place
  pub fn rounded(&self) -> Self {
    let mut out = *self;
    for group in MuscleGroup::ALL {
      out.set(group, round_to_tenth(self.get(group)));
    }
    out
  }
}

impl AddAssign for IntensityVector {
  fn add_assign(&mut self, rhs: Self) {
    for group in MuscleGroup::ALL {
      self.set(group, self.get(group) + rhs.get(group));
    }
  }
}

/// Round half-up to one decimal. Inputs are non-negative, so `f64::round`
/// (half away from zero) behaves as half-up.
pub fn round_to_tenth(value: f64) -> f64 {
  (value * 10.0).round() / 10.0
}

/// ---------------------------------------------------------------------------
/// Profile Tables
/// ---------------------------------------------------------------------------

/// Profiles keyed by workout type
const TYPE_PROFILES: &[(&str, IntensityVector)] = &[
  // Pilates (default class): light push/pull, moderate core, light-moderate lower
  ("pilates", IntensityVector::new(0.25, 0.25, 0.25, 0.5, 0.25, 0.75)),
  // Heavy weights, no cardio
  ("strength", IntensityVector::new(1.0, 1.0, 0.75, 0.75, 0.0, 0.5)),
  // Very high cardio, moderate-heavy lower, light upper
  ("mtb", IntensityVector::new(0.25, 0.25, 0.25, 0.75, 1.0, 0.5)),
];

/// Profiles keyed by pilates class type
const CLASS_PROFILES: &[(&str, IntensityVector)] = &[
  ("hiit", IntensityVector::new(0.25, 0.25, 0.25, 0.5, 1.0, 0.5)),
  ("pilates", IntensityVector::new(0.25, 0.25, 0.25, 0.5, 0.25, 0.75)),
  ("sculpt", IntensityVector::new(0.5, 0.5, 0.5, 0.5, 0.25, 0.5)),
];

/// CrossFit always carries a cardio and core component
const CROSSFIT_BASE: IntensityVector = IntensityVector::new(0.0, 0.0, 0.0, 0.0, 0.75, 0.5);
const CROSSFIT_TAGGED: f64 = 0.75;
const CROSSFIT_CARDIO_TAGGED: f64 = 1.0;

/// Unrecognized workout types still count as light full-body work
const UNKNOWN_PROFILE: IntensityVector = IntensityVector::uniform(0.25);

pub const CROSSFIT_TAGS: [&str; 5] = ["push", "pull", "upper", "lower", "cardio"];
pub const PILATES_CLASS_TYPES: [&str; 3] = ["hiit", "pilates", "sculpt"];

fn lookup(table: &[(&str, IntensityVector)], key: &str) -> Option<IntensityVector> {
  table
    .iter()
    .find(|(name, _)| name.eq_ignore_ascii_case(key))
    .map(|(_, profile)| *profile)
}

fn crossfit_profile(tags: &[String]) -> IntensityVector {
  let mut weights = CROSSFIT_BASE;

  for tag in tags {
    if let Ok(group) = tag.parse::<MuscleGroup>() {
      weights.set(group, CROSSFIT_TAGGED);
    }
  }

  if tags.iter().any(|t| t.trim().eq_ignore_ascii_case("cardio")) {
    weights.cardio = CROSSFIT_CARDIO_TAGGED;
  }

  weights
}

/// Resolve the intensity profile of a single workout.
///
/// `class_type` is only read for pilates and `tags` only for crossfit.
/// Always returns a full vector; unknown types get the flat default.
pub fn intensity_for(workout_type: &str, class_type: Option<&str>, tags: &[String]) -> IntensityVector {
  let workout_type = workout_type.trim();

  if workout_type.eq_ignore_ascii_case("pilates") {
    if let Some(profile) = class_type.and_then(|c| lookup(CLASS_PROFILES, c.trim())) {
      return profile;
    }
  }

  if workout_type.eq_ignore_ascii_case("crossfit") {
    return crossfit_profile(tags);
  }

  lookup(TYPE_PROFILES, workout_type).unwrap_or(UNKNOWN_PROFILE)
}

/// Muscle groups a workout touches at all (any weight above zero)
pub fn muscle_groups_for(workout_type: &str, class_type: Option<&str>, tags: &[String]) -> Vec<MuscleGroup> {
  intensity_for(workout_type, class_type, tags)
    .iter()
    .filter(|(_, v)| *v > 0.0)
    .map(|(g, _)| g)
    .collect()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  fn tags(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn test_pilates_class_profiles() {
    let hiit = intensity_for("pilates", Some("hiit"), &[]);
    assert_eq!(hiit.cardio, 1.0);
    assert_eq!(hiit.core, 0.5);
    assert_eq!(hiit.lower, 0.5);
    assert_eq!(hiit.push, 0.25);

    let sculpt = intensity_for("pilates", Some("sculpt"), &[]);
    assert_eq!(sculpt, IntensityVector::new(0.5, 0.5, 0.5, 0.5, 0.25, 0.5));
  }

  #[test]
  fn test_pilates_without_or_unknown_class_uses_default() {
    let default = intensity_for("pilates", None, &[]);
    assert_eq!(default.core, 0.75);
    assert_eq!(intensity_for("pilates", Some("barre"), &[]), default);
  }

  #[test]
  fn test_class_type_ignored_for_other_types() {
    let strength = intensity_for("strength", Some("hiit"), &[]);
    assert_eq!(strength, IntensityVector::new(1.0, 1.0, 0.75, 0.75, 0.0, 0.5));
  }

  #[test]
  fn test_crossfit_push_and_cardio_tags() {
    let v = intensity_for("crossfit", None, &tags(&["push", "cardio"]));
    assert_eq!(v.push, 0.75);
    assert_eq!(v.cardio, 1.0);
    assert_eq!(v.core, 0.5);
    assert_eq!(v.pull, 0.0);
    assert_eq!(v.upper, 0.0);
    assert_eq!(v.lower, 0.0);
  }

  #[test]
  fn test_crossfit_untagged_is_base_profile() {
    let v = intensity_for("crossfit", None, &[]);
    assert_eq!(v, IntensityVector::new(0.0, 0.0, 0.0, 0.0, 0.75, 0.5));
  }

  #[test]
  fn test_crossfit_ignores_unknown_tags() {
    let v = intensity_for("crossfit", None, &tags(&["legs", "pull"]));
    assert_eq!(v.pull, 0.75);
    assert_eq!(v.total(), 0.75 + 0.75 + 0.5);
  }

  #[test]
  fn test_unknown_type_gets_flat_default() {
    let v = intensity_for("yoga", None, &[]);
    assert_eq!(v, IntensityVector::uniform(0.25));
  }

  #[test]
  fn test_type_matching_is_case_insensitive() {
    assert_eq!(intensity_for("MTB", None, &[]).cardio, 1.0);
  }

  #[test]
  fn test_muscle_groups_for_skips_zero_weights() {
    let groups = muscle_groups_for("strength", None, &[]);
    assert!(!groups.contains(&MuscleGroup::Cardio));
    assert_eq!(groups.len(), 5);

    let groups = muscle_groups_for("crossfit", None, &tags(&["pull"]));
    assert_eq!(groups, vec![MuscleGroup::Pull, MuscleGroup::Cardio, MuscleGroup::Core]);
  }

  #[test]
  fn test_vector_rounding_and_total() {
    let v = IntensityVector::new(0.25, 0.15, 0.0, 1.04, 2.0, 0.05).rounded();
    assert_eq!(v.push, 0.3);
    assert_eq!(v.lower, 1.0);
    assert_eq!(v.core, 0.1);

    let mut sum = IntensityVector::ZERO;
    sum += IntensityVector::uniform(0.5);
    sum += IntensityVector::uniform(0.25);
    assert_eq!(sum.total(), 4.5);
  }

  #[test]
  fn test_opposite_groups_pair_up() {
    for group in MuscleGroup::ALL {
      assert_eq!(group.opposite().opposite(), group);
    }
  }
}
