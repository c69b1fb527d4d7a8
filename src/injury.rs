//! Injury impact resolution
//!
//! Maps body areas to the muscle groups they affect, the movements to stay
//! away from and safer alternatives, then derives the restrictions a set of
//! current injuries puts on training.
//!
//! Severity decides how hard an injury bites:
//! - severe: affected groups are off limits (hard restriction)
//! - moderate: groups stay eligible but listed movements are flagged
//! - mild: informational only

use serde::{Deserialize, Serialize};

use crate::intensity::MuscleGroup;
use crate::intensity::MuscleGroup::{Cardio, Core, Lower, Pull, Push, Upper};
pub use crate::models::{BodyArea, InjuryRecord, InjurySeverity, InjuryStatus};

/// ---------------------------------------------------------------------------
/// Body Area Impact Table
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct BodyAreaImpact {
  pub affected_groups: &'static [MuscleGroup],
  pub avoid_movements: &'static [&'static str],
  pub alternatives: &'static [&'static str],
}

const BODY_AREA_IMPACTS: &[(BodyArea, BodyAreaImpact)] = &[
  (
    BodyArea::Shoulder,
    BodyAreaImpact {
      affected_groups: &[Push, Pull, Upper],
      avoid_movements: &["Overhead press", "Bench press", "Pull-ups", "Dips", "Push-ups", "Lateral raises"],
      alternatives: &["Lower body focus", "Core work", "Light resistance bands", "Cardio (bike/walking)"],
    },
  ),
  (
    BodyArea::Knee,
    BodyAreaImpact {
      affected_groups: &[Lower, Cardio],
      avoid_movements: &["Squats", "Lunges", "Box jumps", "Running", "Leg press", "Jump rope"],
      alternatives: &["Upper body strength", "Swimming", "Seated exercises", "Core work"],
    },
  ),
  (
    BodyArea::Back,
    BodyAreaImpact {
      affected_groups: &[Pull, Core, Lower],
      avoid_movements: &["Deadlifts", "Rows", "Good mornings", "Heavy squats", "Sit-ups"],
      alternatives: &["Light stretching", "Swimming", "Walking", "Upper body (light)", "Bird dogs"],
    },
  ),
  (
    BodyArea::Wrist,
    BodyAreaImpact {
      affected_groups: &[Push, Pull, Upper],
      avoid_movements: &["Push-ups", "Front rack positions", "Cleans", "Snatches", "Planks on hands"],
      alternatives: &["Lower body work", "Cardio", "Machines", "Fist push-ups", "Forearm planks"],
    },
  ),
  (
    BodyArea::Ankle,
    BodyAreaImpact {
      affected_groups: &[Lower, Cardio],
      avoid_movements: &["Running", "Jumping", "Box jumps", "Calf raises", "Lunges"],
      alternatives: &["Upper body strength", "Swimming", "Cycling", "Seated exercises"],
    },
  ),
  (
    BodyArea::Hip,
    BodyAreaImpact {
      affected_groups: &[Lower, Core],
      avoid_movements: &["Squats", "Lunges", "Hip hinges", "Running", "Leg raises"],
      alternatives: &["Upper body work", "Swimming", "Gentle stretching", "Core (modified)"],
    },
  ),
  (
    BodyArea::Neck,
    BodyAreaImpact {
      affected_groups: &[Upper, Core],
      avoid_movements: &["Overhead press", "Shrugs", "Sit-ups", "Heavy carries"],
      alternatives: &["Lower body work", "Light cardio", "Gentle mobility", "Massage"],
    },
  ),
  (
    BodyArea::Elbow,
    BodyAreaImpact {
      affected_groups: &[Push, Pull, Upper],
      avoid_movements: &["Curls", "Tricep extensions", "Pull-ups", "Push-ups", "Rows"],
      alternatives: &["Lower body focus", "Cardio", "Core work", "Light resistance bands"],
    },
  ),
  (
    BodyArea::Custom,
    BodyAreaImpact {
      affected_groups: &[],
      avoid_movements: &[],
      alternatives: &["Consult with a professional", "Listen to your body"],
    },
  ),
];

const NO_IMPACT: BodyAreaImpact = BodyAreaImpact {
  affected_groups: &[],
  avoid_movements: &[],
  alternatives: &[],
};

pub fn impact_for(area: BodyArea) -> BodyAreaImpact {
  BODY_AREA_IMPACTS
    .iter()
    .find(|(a, _)| *a == area)
    .map(|(_, impact)| *impact)
    .unwrap_or(NO_IMPACT)
}

/// Named presets offered when logging an injury
const COMMON_INJURIES: &[(BodyArea, &str)] = &[
  (BodyArea::Shoulder, "Rotator cuff strain"),
  (BodyArea::Shoulder, "Shoulder impingement"),
  (BodyArea::Shoulder, "AC joint pain"),
  (BodyArea::Knee, "Patellar tendinitis"),
  (BodyArea::Knee, "IT band syndrome"),
  (BodyArea::Knee, "Meniscus issue"),
  (BodyArea::Back, "Lower back strain"),
  (BodyArea::Back, "Upper back tightness"),
  (BodyArea::Back, "Disc issue"),
  (BodyArea::Wrist, "Wrist strain"),
  (BodyArea::Wrist, "Carpal tunnel"),
  (BodyArea::Ankle, "Ankle sprain"),
  (BodyArea::Ankle, "Achilles tendinitis"),
  (BodyArea::Hip, "Hip flexor strain"),
  (BodyArea::Hip, "Hip bursitis"),
  (BodyArea::Neck, "Neck strain"),
  (BodyArea::Neck, "Cervical tension"),
  (BodyArea::Elbow, "Tennis elbow"),
  (BodyArea::Elbow, "Golfer's elbow"),
];

pub fn common_injuries(area: BodyArea) -> Vec<&'static str> {
  COMMON_INJURIES
    .iter()
    .filter(|(a, _)| *a == area)
    .map(|(_, name)| *name)
    .collect()
}

/// ---------------------------------------------------------------------------
/// Injury Modifications
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InjuryModifications {
  /// Groups no suggestion may touch (severe injuries only)
  pub avoid_groups: Vec<MuscleGroup>,
  pub avoid_movements: Vec<String>,
  pub alternatives: Vec<String>,
  pub warnings: Vec<String>,
}

impl InjuryModifications {
  pub fn has_hard_restrictions(&self) -> bool {
    !self.avoid_groups.is_empty()
  }

  pub fn avoids(&self, group: MuscleGroup) -> bool {
    self.avoid_groups.contains(&group)
  }
}

fn push_unique<T: PartialEq>(set: &mut Vec<T>, item: T) {
  if !set.contains(&item) {
    set.push(item);
  }
}

fn join_groups(groups: &[MuscleGroup]) -> String {
  groups.iter().map(|g| g.as_str()).collect::<Vec<_>>().join(", ")
}

fn injury_warning(injury: &InjuryRecord, impact: &BodyAreaImpact) -> String {
  if impact.affected_groups.is_empty() {
    return format!("{}: Listen to your body and back off if pain increases", injury.name);
  }

  match injury.severity {
    InjurySeverity::Severe => format!(
      "{}: Avoid {} work",
      injury.name,
      join_groups(impact.affected_groups)
    ),
    InjurySeverity::Moderate => format!(
      "{}: Modify or avoid: {}",
      injury.name,
      impact.avoid_movements.iter().take(3).copied().collect::<Vec<_>>().join(", ")
    ),
    InjurySeverity::Mild => format!(
      "{}: Be mindful during {} movements",
      injury.name,
      join_groups(impact.affected_groups)
    ),
  }
}

/// Restrictions, alternatives and warnings from all current injuries.
/// Resolved injuries are ignored entirely.
pub fn resolve(injuries: &[InjuryRecord]) -> InjuryModifications {
  let mut mods = InjuryModifications::default();

  for injury in injuries.iter().filter(|i| i.status.is_current()) {
    let impact = impact_for(injury.body_area);

    match injury.severity {
      InjurySeverity::Severe => {
        for group in impact.affected_groups {
          push_unique(&mut mods.avoid_groups, *group);
        }
        for movement in impact.avoid_movements {
          push_unique(&mut mods.avoid_movements, movement.to_string());
        }
      }
      InjurySeverity::Moderate => {
        for movement in impact.avoid_movements {
          push_unique(&mut mods.avoid_movements, movement.to_string());
        }
      }
      InjurySeverity::Mild => {}
    }

    mods.warnings.push(injury_warning(injury, &impact));

    for alternative in impact.alternatives {
      push_unique(&mut mods.alternatives, alternative.to_string());
    }
  }

  mods
}

/// ---------------------------------------------------------------------------
/// Workout Guidance
/// ---------------------------------------------------------------------------

/// Activity categories to favor and avoid given the hard restrictions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InjuryWorkoutGuidance {
  pub recommended: Vec<String>,
  pub avoid: Vec<String>,
  pub modifications: Vec<String>,
}

pub fn workouts_for_injuries(mods: &InjuryModifications) -> InjuryWorkoutGuidance {
  let mut guidance = InjuryWorkoutGuidance::default();
  let upper_restricted = mods.avoids(Push) || mods.avoids(Pull) || mods.avoids(Upper);

  if upper_restricted {
    guidance.avoid.push("Heavy strength training (upper body)".to_string());
    guidance
      .modifications
      .push("Focus on lower body and core for strength work".to_string());
  }

  if mods.avoids(Lower) {
    guidance.avoid.push("Running, jumping, heavy squats/lunges".to_string());
    guidance
      .modifications
      .push("Swimming, cycling, or upper body focus".to_string());
    guidance.recommended.push("Upper body strength".to_string());
    guidance.recommended.push("Swimming".to_string());
  }

  if mods.avoids(Cardio) {
    guidance.avoid.push("High-impact cardio (running, jumping)".to_string());
    guidance
      .modifications
      .push("Low-impact: cycling, swimming, walking".to_string());
    guidance.recommended.push("Strength training".to_string());
    push_unique(&mut guidance.recommended, "Swimming".to_string());
  }

  if !mods.avoids(Core) {
    guidance.recommended.push("Core work (modified as needed)".to_string());
  }

  if !mods.avoids(Lower) && !mods.avoids(Cardio) {
    guidance.recommended.push("Pilates".to_string());
    guidance.recommended.push("Walking".to_string());
    guidance.recommended.push("Light cycling".to_string());
  }

  guidance
}

/// ---------------------------------------------------------------------------
/// Load Percentage
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightRecommendation {
  /// Share of max weight, 0-100
  pub percentage: u8,
  pub reason: String,
}

/// Fixed severity x status table. Resolved never reaches it.
fn percentage_for(injury: &InjuryRecord) -> WeightRecommendation {
  let name = &injury.name;
  let (percentage, reason) = match (injury.severity, injury.status) {
    (InjurySeverity::Severe, InjuryStatus::Recovering) => {
      (30, format!("Start light at 30% - recovering from severe {}", name))
    }
    (InjurySeverity::Severe, _) => (
      0,
      format!("Rest the area and avoid loading - {} is severe and active", name),
    ),
    (InjurySeverity::Moderate, InjuryStatus::Recovering) => {
      (70, format!("Progress to 70% - {} is recovering well", name))
    }
    (InjurySeverity::Moderate, _) => (50, format!("Stay at 50% - {} is still active", name)),
    (InjurySeverity::Mild, InjuryStatus::Recovering) => {
      (90, format!("Almost there! 90% - {} is nearly resolved", name))
    }
    (InjurySeverity::Mild, _) => (
      70,
      format!("Train at 70% - mild {}, listen to your body", name),
    ),
  };

  WeightRecommendation { percentage, reason }
}

/// Load recommendation for the most relevant current injury: the first one
/// in `body_area` when given, otherwise the first current injury.
pub fn recommended_percentage(injuries: &[InjuryRecord], body_area: Option<BodyArea>) -> WeightRecommendation {
  let mut current = injuries.iter().filter(|i| i.status.is_current());

  let relevant = match body_area {
    Some(area) => current.find(|i| i.body_area == area),
    None => current.next(),
  };

  match relevant {
    Some(injury) => percentage_for(injury),
    None => WeightRecommendation {
      percentage: 100,
      reason: "No active injuries - train at full capacity".to_string(),
    },
  }
}

/// ---------------------------------------------------------------------------
/// Exercise Checks
/// ---------------------------------------------------------------------------

/// Body areas an exercise primarily stresses, keyed by lowercase name
const EXERCISE_BODY_AREAS: &[(&str, &[BodyArea])] = &[
  ("bench press", &[BodyArea::Shoulder, BodyArea::Elbow, BodyArea::Wrist]),
  ("overhead press", &[BodyArea::Shoulder, BodyArea::Back, BodyArea::Wrist]),
  ("push press", &[BodyArea::Shoulder, BodyArea::Back, BodyArea::Wrist]),
  ("squat", &[BodyArea::Knee, BodyArea::Back, BodyArea::Hip]),
  ("back squat", &[BodyArea::Knee, BodyArea::Back, BodyArea::Hip]),
  ("front squat", &[BodyArea::Knee, BodyArea::Back, BodyArea::Wrist]),
  ("deadlift", &[BodyArea::Back, BodyArea::Hip, BodyArea::Knee]),
  ("romanian deadlift", &[BodyArea::Back, BodyArea::Hip]),
  ("clean", &[BodyArea::Wrist, BodyArea::Shoulder, BodyArea::Back, BodyArea::Knee]),
  ("snatch", &[BodyArea::Wrist, BodyArea::Shoulder, BodyArea::Back]),
  ("clean & jerk", &[BodyArea::Wrist, BodyArea::Shoulder, BodyArea::Back, BodyArea::Knee]),
  ("pull-ups", &[BodyArea::Shoulder, BodyArea::Elbow]),
  ("barbell row", &[BodyArea::Back, BodyArea::Shoulder]),
  ("lunges", &[BodyArea::Knee, BodyArea::Hip, BodyArea::Ankle]),
  ("leg press", &[BodyArea::Knee, BodyArea::Hip]),
  ("dips", &[BodyArea::Shoulder, BodyArea::Elbow]),
  ("thruster", &[BodyArea::Shoulder, BodyArea::Knee, BodyArea::Back]),
];

pub fn exercise_body_areas(exercise: &str) -> &'static [BodyArea] {
  let needle = exercise.trim().to_lowercase();
  EXERCISE_BODY_AREAS
    .iter()
    .find(|(name, _)| *name == needle)
    .map(|(_, areas)| *areas)
    .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecommendation {
  pub can_perform: bool,
  pub recommended_percentage: u8,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub warning: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub alternative: Option<String>,
}

/// Whether and how heavy an exercise can be loaded given current injuries.
/// Exercises missing from the table are never restricted.
pub fn exercise_recommendation(exercise: &str, injuries: &[InjuryRecord]) -> ExerciseRecommendation {
  let areas = exercise_body_areas(exercise);

  let relevant = injuries
    .iter()
    .filter(|i| i.status.is_current())
    .find(|i| areas.contains(&i.body_area));

  let Some(injury) = relevant else {
    return ExerciseRecommendation {
      can_perform: true,
      recommended_percentage: 100,
      warning: None,
      alternative: None,
    };
  };

  let weight = percentage_for(injury);

  ExerciseRecommendation {
    can_perform: weight.percentage > 0,
    recommended_percentage: weight.percentage,
    warning: Some(weight.reason),
    alternative: impact_for(injury.body_area)
      .alternatives
      .first()
      .map(|a| a.to_string()),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
