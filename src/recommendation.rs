//! Recommendation engine
//!
//! Combines the trailing week of training, current injuries and known venues
//! into exactly one coaching recommendation. Signals compete, so the rules
//! live in an ordered table and the first rule that matches wins:
//!
//! 1. injury_aware    - a severe injury puts muscle groups off limits
//! 2. welcome_back    - no workout in 5+ days
//! 3. high_load       - heavy week trained on 3+ consecutive days
//! 4. neglected_group - a group sits well under the average load
//! 5. overtrained     - a group sits well over the average load
//! 6. add_strength    - cardio dwarfs push/pull work
//! 7. add_cardio      - push/pull work dwarfs cardio
//! 8. well_balanced   - fallback, always matches
//!
//! The engine is pure: it reads caller-supplied records and never fails.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::balance::{
  aggregate, areas_by_intensity, balance_score, find_imbalances, intensity_label, total_intensity,
  Imbalances,
};
use crate::injury::{
  recommended_percentage, resolve, workouts_for_injuries, InjuryModifications, InjuryRecord,
  InjuryWorkoutGuidance, WeightRecommendation,
};
use crate::intensity::{round_to_tenth, IntensityVector, MuscleGroup};
use crate::models::{venue_name, Location, LocationType, WorkoutRecord};

/// Trailing window used for balance and intensity
pub const RECENT_WINDOW_DAYS: i64 = 7;
/// Days without training before the welcome-back rule fires
pub const WELCOME_BACK_DAYS: i64 = 5;
/// Weekly intensity above which a training streak calls for rest
pub const HIGH_LOAD_INTENSITY: f64 = 12.0;
pub const HIGH_LOAD_STREAK_DAYS: usize = 3;

/// ---------------------------------------------------------------------------
/// Output Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
  pub total_intensity: f64,
  /// 0-100, higher is more balanced
  pub balance_score: u8,
  pub strongest_areas: Vec<MuscleGroup>,
  pub weakest_areas: Vec<MuscleGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedWorkout {
  pub workout_type: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub focus: Vec<MuscleGroup>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub exercises: Vec<String>,
}

impl SuggestedWorkout {
  fn new(workout_type: &str, location: Option<String>, focus: &[MuscleGroup]) -> Self {
    Self {
      workout_type: workout_type.to_string(),
      location,
      focus: focus.to_vec(),
      exercises: Vec::new(),
    }
  }

  fn with_exercises(mut self, exercises: &[&str]) -> Self {
    self.exercises = exercises.iter().map(|e| e.to_string()).collect();
    self
  }
}

/// Injury data attached to injury-aware recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryGuidance {
  pub warnings: Vec<String>,
  pub alternatives: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub weight_recommendation: Option<WeightRecommendation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
  Workout,
  Rest,
  Insight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
  Workout {
    title: String,
    description: String,
    suggested_workout: SuggestedWorkout,
    #[serde(skip_serializing_if = "Option::is_none")]
    injury: Option<InjuryGuidance>,
    insights: Insights,
  },
  Rest {
    title: String,
    description: String,
    insights: Insights,
  },
  Insight {
    title: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggested_workout: Option<SuggestedWorkout>,
    insights: Insights,
  },
}

impl Recommendation {
  pub fn kind(&self) -> RecommendationKind {
    match self {
      Recommendation::Workout { .. } => RecommendationKind::Workout,
      Recommendation::Rest { .. } => RecommendationKind::Rest,
      Recommendation::Insight { .. } => RecommendationKind::Insight,
    }
  }

  pub fn title(&self) -> &str {
    match self {
      Recommendation::Workout { title, .. }
      | Recommendation::Rest { title, .. }
      | Recommendation::Insight { title, .. } => title,
    }
  }

  pub fn description(&self) -> &str {
    match self {
      Recommendation::Workout { description, .. }
      | Recommendation::Rest { description, .. }
      | Recommendation::Insight { description, .. } => description,
    }
  }

  pub fn insights(&self) -> &Insights {
    match self {
      Recommendation::Workout { insights, .. }
      | Recommendation::Rest { insights, .. }
      | Recommendation::Insight { insights, .. } => insights,
    }
  }

  pub fn suggested_workout(&self) -> Option<&SuggestedWorkout> {
    match self {
      Recommendation::Workout { suggested_workout, .. } => Some(suggested_workout),
      Recommendation::Insight { suggested_workout, .. } => suggested_workout.as_ref(),
      Recommendation::Rest { .. } => None,
    }
  }

  pub fn injury(&self) -> Option<&InjuryGuidance> {
    match self {
      Recommendation::Workout { injury, .. } => injury.as_ref(),
      _ => None,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Rule Context
/// ---------------------------------------------------------------------------

/// Everything the rules read, computed once per invocation
pub struct RuleContext<'a> {
  now: DateTime<Utc>,
  /// All supplied workouts, most recent first
  history: Vec<&'a WorkoutRecord>,
  recent_sessions: usize,
  balance: IntensityVector,
  total_intensity: f64,
  balance_score: u8,
  imbalances: Imbalances,
  insights: Insights,
  injuries: &'a [InjuryRecord],
  modifications: InjuryModifications,
  injury_guidance: InjuryWorkoutGuidance,
  locations: &'a [Location],
}

impl<'a> RuleContext<'a> {
  pub fn build(
    workouts: &'a [WorkoutRecord],
    locations: &'a [Location],
    injuries: &'a [InjuryRecord],
    now: DateTime<Utc>,
  ) -> Self {
    let mut history: Vec<&WorkoutRecord> = workouts.iter().collect();
    history.sort_by(|a, b| b.date.cmp(&a.date));

    let window_start = now - Duration::days(RECENT_WINDOW_DAYS);
    let recent: Vec<WorkoutRecord> = history
      .iter()
      .filter(|w| w.date >= window_start)
      .map(|w| (*w).clone())
      .collect();

    let balance = aggregate(&recent);
    let total = total_intensity(&balance);
    let score = balance_score(&balance);
    let areas = areas_by_intensity(&balance);

    let insights = Insights {
      total_intensity: round_to_tenth(total),
      balance_score: score,
      strongest_areas: areas.strongest,
      weakest_areas: areas.weakest,
    };

    let modifications = resolve(injuries);
    let injury_guidance = workouts_for_injuries(&modifications);

    Self {
      now,
      history,
      recent_sessions: recent.len(),
      balance,
      total_intensity: total,
      balance_score: score,
      imbalances: find_imbalances(&balance),
      insights,
      injuries,
      modifications,
      injury_guidance,
      locations,
    }
  }

  fn venue(&self, kind: LocationType) -> Option<String> {
    venue_name(self.locations, kind)
  }

  fn days_since_last_workout(&self) -> Option<i64> {
    self.history.first().map(|w| (self.now - w.date).num_days())
  }

  /// Mean of push and pull load
  fn strength_intensity(&self) -> f64 {
    (self.balance.push + self.balance.pull) / 2.0
  }
}

/// Length of the run of consecutive calendar days (UTC) with training,
/// counted back from the most recent training day.
pub fn consecutive_training_days(workouts: &[&WorkoutRecord]) -> usize {
  let mut days: Vec<NaiveDate> = workouts.iter().map(|w| w.date.date_naive()).collect();
  days.sort_unstable_by(|a, b| b.cmp(a));
  days.dedup();

  let Some(first) = days.first() else {
    return 0;
  };

  let mut streak = 1;
  let mut previous = *first;
  for day in days.iter().skip(1) {
    if (previous - *day).num_days() <= 1 {
      streak += 1;
      previous = *day;
    } else {
      break;
    }
  }

  streak
}

/// ---------------------------------------------------------------------------
/// Rules
/// ---------------------------------------------------------------------------

pub struct Rule {
  pub name: &'static str,
  evaluate: fn(&RuleContext<'_>) -> Option<Recommendation>,
}

impl Rule {
  pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
    (self.evaluate)(ctx)
  }
}

/// Evaluated top to bottom; the last rule always matches
pub const RULES: [Rule; 8] = [
  Rule { name: "injury_aware", evaluate: injury_aware },
  Rule { name: "welcome_back", evaluate: welcome_back },
  Rule { name: "high_load", evaluate: high_load },
  Rule { name: "neglected_group", evaluate: neglected_group },
  Rule { name: "overtrained", evaluate: overtrained },
  Rule { name: "add_strength", evaluate: add_strength },
  Rule { name: "add_cardio", evaluate: add_cardio },
  Rule { name: "well_balanced", evaluate: well_balanced_rule },
];

fn injury_aware(ctx: &RuleContext<'_>) -> Option<Recommendation> {
  let mods = &ctx.modifications;
  if !mods.has_hard_restrictions() {
    return None;
  }

  let focus = match ctx.injury_guidance.recommended.as_slice() {
    [] => "gentle mobility".to_string(),
    recommended => recommended.iter().take(2).cloned().collect::<Vec<_>>().join(" or "),
  };
  let description = match mods.warnings.first() {
    Some(warning) => format!("With your current injuries, focus on {}. {}", focus, warning),
    None => format!("With your current injuries, focus on {}.", focus),
  };

  Some(Recommendation::Workout {
    title: "Injury-aware recommendation".to_string(),
    description,
    suggested_workout: safe_workout(mods, ctx),
    injury: Some(InjuryGuidance {
      warnings: mods.warnings.clone(),
      alternatives: mods.alternatives.clone(),
      weight_recommendation: Some(recommended_percentage(ctx.injuries, None)),
    }),
    insights: ctx.insights.clone(),
  })
}

/// A workout that touches none of the restricted groups
fn safe_workout(mods: &InjuryModifications, ctx: &RuleContext<'_>) -> SuggestedWorkout {
  use MuscleGroup::*;

  let allowed = |groups: &[MuscleGroup]| -> Vec<MuscleGroup> {
    groups.iter().copied().filter(|g| !mods.avoids(*g)).collect()
  };

  if mods.avoids(Lower) || mods.avoids(Cardio) {
    return SuggestedWorkout::new("strength", ctx.venue(LocationType::Box), &allowed(&[Upper, Push, Pull]))
      .with_exercises(&["Upper body focus", "Seated exercises", "Core work"]);
  }

  if mods.avoids(Push) || mods.avoids(Pull) || mods.avoids(Upper) {
    return SuggestedWorkout::new("pilates", ctx.venue(LocationType::Studio), &allowed(&[Lower, Core]))
      .with_exercises(&["Lower body focus", "Light cardio", "Core work"]);
  }

  SuggestedWorkout::new("pilates", ctx.venue(LocationType::Studio), &allowed(&[Core]))
    .with_exercises(&["Light stretching", "Gentle movement", "Recovery focus"])
}

fn welcome_back(ctx: &RuleContext<'_>) -> Option<Recommendation> {
  let days = ctx.days_since_last_workout()?;
  if days < WELCOME_BACK_DAYS {
    return None;
  }

  let venue = ctx.venue(LocationType::Studio);
  let at_venue = venue.as_ref().map(|v| format!(" at {}", v)).unwrap_or_default();

  Some(Recommendation::Insight {
    title: "Welcome back!".to_string(),
    description: format!(
      "It's been {} days since your last workout. A light Sculpt class{} could be a good way to ease back in with moderate full-body intensity.",
      days, at_venue
    ),
    suggested_workout: Some(SuggestedWorkout::new(
      "pilates",
      venue,
      &[MuscleGroup::Core, MuscleGroup::Lower],
    )),
    insights: ctx.insights.clone(),
  })
}

fn high_load(ctx: &RuleContext<'_>) -> Option<Recommendation> {
  if ctx.total_intensity <= HIGH_LOAD_INTENSITY {
    return None;
  }
  if consecutive_training_days(&ctx.history) < HIGH_LOAD_STREAK_DAYS {
    return None;
  }

  Some(Recommendation::Rest {
    title: "High training load detected".to_string(),
    description: format!(
      "You've accumulated {} training intensity over {} sessions in the past week. Consider active recovery like walking, mobility work or an easy spin to optimize gains.",
      intensity_label(ctx.total_intensity),
      ctx.recent_sessions
    ),
    insights: ctx.insights.clone(),
  })
}

/// How to address each neglected group
struct NeglectedPlan {
  group: MuscleGroup,
  title: &'static str,
  /// Name used in "Your ... intensity is"
  label: &'static str,
  pitch: &'static str,
  workout_type: &'static str,
  venue: LocationType,
  focus: &'static [MuscleGroup],
  exercises: &'static [&'static str],
}

const NEGLECTED_PLANS: [NeglectedPlan; 6] = [
  NeglectedPlan {
    group: MuscleGroup::Pull,
    title: "Pull movements needed",
    label: "pull",
    pitch: "A pull-focused CrossFit session would significantly improve your balance.",
    workout_type: "crossfit",
    venue: LocationType::Box,
    focus: &[MuscleGroup::Pull],
    exercises: &["Pull-ups", "Rows", "Deadlifts", "Face pulls"],
  },
  NeglectedPlan {
    group: MuscleGroup::Push,
    title: "Push movements needed",
    label: "push",
    pitch: "Time to add some pressing movements to balance your pulling work.",
    workout_type: "crossfit",
    venue: LocationType::Box,
    focus: &[MuscleGroup::Push],
    exercises: &["Bench press", "Overhead press", "Push-ups", "Dips"],
  },
  NeglectedPlan {
    group: MuscleGroup::Cardio,
    title: "Cardio conditioning gap",
    label: "cardio",
    pitch: "A HIIT class or mountain bike ride would significantly boost your conditioning.",
    workout_type: "mtb",
    venue: LocationType::Trail,
    focus: &[MuscleGroup::Cardio, MuscleGroup::Lower],
    exercises: &[],
  },
  NeglectedPlan {
    group: MuscleGroup::Core,
    title: "Core strength gap",
    label: "core",
    pitch: "A Pilates class would strengthen your foundation and improve performance in all other movements.",
    workout_type: "pilates",
    venue: LocationType::Studio,
    focus: &[MuscleGroup::Core],
    exercises: &[],
  },
  NeglectedPlan {
    group: MuscleGroup::Lower,
    title: "Lower body focus needed",
    label: "lower body",
    pitch: "Consider a session targeting this area.",
    workout_type: "pilates",
    venue: LocationType::Studio,
    focus: &[MuscleGroup::Lower],
    exercises: &[],
  },
  NeglectedPlan {
    group: MuscleGroup::Upper,
    title: "Upper body focus needed",
    label: "upper body",
    pitch: "Consider a session targeting this area.",
    workout_type: "strength",
    venue: LocationType::Box,
    focus: &[MuscleGroup::Upper],
    exercises: &[],
  },
];

fn neglected_group(ctx: &RuleContext<'_>) -> Option<Recommendation> {
  let primary = *ctx.imbalances.neglected.first()?;
  let plan = NEGLECTED_PLANS.iter().find(|p| p.group == primary)?;
  let intensity = ctx.balance.get(primary);

  Some(Recommendation::Workout {
    title: plan.title.to_string(),
    description: format!(
      "Your {} intensity is {} ({:.1}). {}",
      plan.label,
      intensity_label(intensity),
      intensity,
      plan.pitch
    ),
    suggested_workout: SuggestedWorkout::new(plan.workout_type, ctx.venue(plan.venue), plan.focus)
      .with_exercises(plan.exercises),
    injury: None,
    insights: ctx.insights.clone(),
  })
}

fn overtrained(ctx: &RuleContext<'_>) -> Option<Recommendation> {
  let groups = &ctx.imbalances.overtrained;
  if groups.is_empty() {
    return None;
  }

  let named = groups.iter().map(|g| g.as_str()).collect::<Vec<_>>().join(" and ");

  let mut opposites: Vec<MuscleGroup> = Vec::new();
  for group in groups {
    let opposite = group.opposite();
    if !opposites.contains(&opposite) {
      opposites.push(opposite);
    }
  }
  let opposites = opposites.iter().map(|g| g.as_str()).collect::<Vec<_>>().join(" or ");

  Some(Recommendation::Insight {
    title: "Training balance check".to_string(),
    description: format!(
      "Your {} training is significantly higher than other areas. Consider a session focusing on {} to balance your overall load.",
      named, opposites
    ),
    suggested_workout: None,
    insights: ctx.insights.clone(),
  })
}

fn add_strength(ctx: &RuleContext<'_>) -> Option<Recommendation> {
  let cardio = ctx.balance.cardio;
  let strength = ctx.strength_intensity();
  if !(cardio > strength * 2.0 && strength < 2.0) {
    return None;
  }

  Some(Recommendation::Workout {
    title: "Add some strength work".to_string(),
    description: format!(
      "Your cardio conditioning is strong ({:.1} intensity), but your pushing/pulling work is light. A CrossFit or strength session would round out your training.",
      cardio
    ),
    suggested_workout: SuggestedWorkout::new(
      "crossfit",
      ctx.venue(LocationType::Box),
      &[MuscleGroup::Push, MuscleGroup::Pull],
    ),
    injury: None,
    insights: ctx.insights.clone(),
  })
}

fn add_cardio(ctx: &RuleContext<'_>) -> Option<Recommendation> {
  let cardio = ctx.balance.cardio;
  let strength = ctx.strength_intensity();
  if !(strength > cardio * 2.0 && cardio < 1.5) {
    return None;
  }

  Some(Recommendation::Workout {
    title: "Cardio boost recommended".to_string(),
    description: "You've been hitting the weights hard, but cardio is lagging. A HIIT class or mountain bike ride would improve your overall conditioning.".to_string(),
    suggested_workout: SuggestedWorkout::new("pilates", ctx.venue(LocationType::Studio), &[MuscleGroup::Cardio]),
    injury: None,
    insights: ctx.insights.clone(),
  })
}

fn well_balanced(ctx: &RuleContext<'_>) -> Recommendation {
  Recommendation::Workout {
    title: "Well-balanced training!".to_string(),
    description: format!(
      "Your training balance score is {}%. You're hitting all muscle groups with good intensity distribution. Keep up the variety!",
      ctx.balance_score
    ),
    suggested_workout: SuggestedWorkout::new(
      "crossfit",
      ctx.venue(LocationType::Box),
      &[MuscleGroup::Push, MuscleGroup::Pull],
    ),
    injury: None,
    insights: ctx.insights.clone(),
  }
}

fn well_balanced_rule(ctx: &RuleContext<'_>) -> Option<Recommendation> {
  Some(well_balanced(ctx))
}

/// ---------------------------------------------------------------------------
/// Engine
/// ---------------------------------------------------------------------------

/// First matching rule and its recommendation
pub fn evaluate_rules(ctx: &RuleContext<'_>) -> (&'static str, Recommendation) {
  RULES
    .iter()
    .find_map(|rule| rule.evaluate(ctx).map(|rec| (rule.name, rec)))
    .unwrap_or_else(|| ("well_balanced", well_balanced(ctx)))
}

/// Recommendation as of `now`. Workouts may arrive in any order.
pub fn generate_recommendation_at(
  workouts: &[WorkoutRecord],
  locations: &[Location],
  injuries: &[InjuryRecord],
  now: DateTime<Utc>,
) -> Recommendation {
  let ctx = RuleContext::build(workouts, locations, injuries, now);
  let (rule, recommendation) = evaluate_rules(&ctx);

  tracing::debug!(
    rule,
    kind = ?recommendation.kind(),
    total_intensity = ctx.total_intensity,
    balance_score = ctx.balance_score,
    "Recommendation selected"
  );

  recommendation
}

pub fn generate_recommendation(
  workouts: &[WorkoutRecord],
  locations: &[Location],
  injuries: &[InjuryRecord],
) -> Recommendation {
  generate_recommendation_at(workouts, locations, injuries, Utc::now())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
