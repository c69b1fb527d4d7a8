//! Command-line front end. Results print to stdout as pretty JSON, logs go
//! to stderr.
//!
//! ```bash
//! workout-coach log-workout crossfit --tags push,cardio --duration 60
//! workout-coach log-injury knee "Patellar tendinitis" --severity moderate
//! workout-coach recommend
//! workout-coach check-exercise "back squat"
//! ```

use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

use workout_coach_lib::commands::{self, injuries, records, workouts};
use workout_coach_lib::config::CoachConfig;
use workout_coach_lib::db::AppState;
use workout_coach_lib::logging;
use workout_coach_lib::models::{
  BodyArea, InjurySeverity, InjuryStatus, InjuryUpdate, NewInjury, NewPersonalRecord, NewWorkout,
};

#[derive(Parser)]
#[command(
  name = "workout-coach",
  about = "Rule-based training coach",
  long_about = "Log workouts and injuries, then get a next-workout recommendation based on muscle balance and current injuries."
)]
struct Cli {
  #[command(subcommand)]
  command: Command,

  /// Database URL override
  #[arg(long, global = true)]
  database_url: Option<String>,
}

#[derive(Subcommand)]
enum Command {
  /// Recommend the next workout
  Recommend,

  /// Weekly counts and monthly muscle balance
  Stats,

  /// Log a workout
  LogWorkout {
    /// crossfit, pilates, strength or mtb
    workout_type: String,

    /// RFC 3339 timestamp, defaults to now
    #[arg(long)]
    date: Option<DateTime<Utc>>,

    /// Pilates class type (hiit, pilates, sculpt)
    #[arg(long = "class")]
    class_type: Option<String>,

    /// CrossFit focus tags, comma-separated
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,

    /// Duration in minutes
    #[arg(long)]
    duration: Option<i64>,

    #[arg(long)]
    location: Option<String>,

    #[arg(long)]
    notes: Option<String>,

    #[arg(long)]
    distance_km: Option<f64>,

    #[arg(long)]
    elevation_m: Option<f64>,

    #[arg(long)]
    calories: Option<i64>,
  },

  /// Log an injury
  LogInjury {
    /// shoulder, knee, back, wrist, ankle, hip, neck, elbow or custom
    body_area: BodyArea,

    name: String,

    #[arg(long, default_value = "mild")]
    severity: InjurySeverity,

    #[arg(long, default_value = "active")]
    status: InjuryStatus,

    #[arg(long)]
    notes: Option<String>,

    /// RFC 3339 timestamp, defaults to now
    #[arg(long)]
    start_date: Option<DateTime<Utc>>,
  },

  /// Change an injury's status
  #[command(name = "injury-status")]
  SetInjuryStatus { id: i64, status: InjuryStatus },

  /// Edit fields of a logged injury; omitted fields are kept
  EditInjury {
    id: i64,

    #[arg(long)]
    body_area: Option<BodyArea>,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    severity: Option<InjurySeverity>,

    #[arg(long)]
    status: Option<InjuryStatus>,

    #[arg(long)]
    notes: Option<String>,

    /// RFC 3339 timestamp
    #[arg(long)]
    end_date: Option<DateTime<Utc>>,
  },

  /// Delete a logged injury
  DeleteInjury { id: i64 },

  /// Preset injury names for a body area
  CommonInjuries { body_area: BodyArea },

  /// List injuries, optionally filtered by status
  Injuries {
    /// Comma-separated statuses, e.g. active,recovering
    #[arg(long, value_delimiter = ',')]
    status: Vec<InjuryStatus>,
  },

  /// Restrictions and activity guidance for current injuries
  Guidance,

  /// Whether an exercise is safe to load today
  CheckExercise { exercise: String },

  /// Record a personal best
  Pr {
    exercise: String,
    max_weight: f64,

    #[arg(long)]
    notes: Option<String>,
  },

  /// List personal records
  Prs,

  /// Recent workouts with the muscle groups they load
  History {
    #[arg(long)]
    limit: Option<i64>,
  },
}

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();

  let mut config = match CoachConfig::load() {
    Ok(config) => config,
    Err(e) => {
      eprintln!("Configuration error: {}", e);
      return ExitCode::FAILURE;
    }
  };
  if let Some(url) = cli.database_url {
    config.database_url = url;
  }

  logging::init(config.log_format);

  let state = match workout_coach_lib::open(config).await {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = %e, "Failed to initialize database");
      return ExitCode::FAILURE;
    }
  };

  let result = run(&state, cli.command).await;
  state.db.close().await;

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!(error = %e, "Command failed");
      ExitCode::FAILURE
    }
  }
}

async fn run(state: &AppState, command: Command) -> Result<(), String> {
  match command {
    Command::Recommend => print_json(&commands::get_recommendation(state).await?),
    Command::Stats => print_json(&commands::get_training_stats(state).await?),
    Command::LogWorkout {
      workout_type,
      date,
      class_type,
      tags,
      duration,
      location,
      notes,
      distance_km,
      elevation_m,
      calories,
    } => {
      let workout = NewWorkout {
        workout_type,
        date: date.unwrap_or_else(Utc::now),
        location_id: location,
        duration_minutes: duration,
        notes,
        class_type,
        tags,
        exercises_json: None,
        distance_km,
        elevation_m,
        calories,
      };
      let id = workouts::log_workout(state, workout).await?;
      print_json(&serde_json::json!({ "id": id }))
    }
    Command::LogInjury {
      body_area,
      name,
      severity,
      status,
      notes,
      start_date,
    } => {
      let injury = NewInjury {
        body_area,
        name,
        severity,
        status,
        notes,
        start_date: start_date.unwrap_or_else(Utc::now),
      };
      let id = injuries::log_injury(state, injury).await?;
      print_json(&serde_json::json!({ "id": id }))
    }
    Command::SetInjuryStatus { id, status } => print_json(&injuries::update_injury_status(state, id, status).await?),
    Command::EditInjury {
      id,
      body_area,
      name,
      severity,
      status,
      notes,
      end_date,
    } => {
      let update = InjuryUpdate {
        body_area,
        name,
        severity,
        status,
        notes,
        end_date,
      };
      print_json(&injuries::edit_injury(state, id, update).await?)
    }
    Command::DeleteInjury { id } => {
      injuries::delete_injury(state, id).await?;
      print_json(&serde_json::json!({ "deleted": id }))
    }
    Command::CommonInjuries { body_area } => print_json(&injuries::get_common_injuries(body_area)),
    Command::Injuries { status } => print_json(&injuries::list_injuries(state, &status).await?),
    Command::Guidance => print_json(&injuries::get_injury_overview(state).await?),
    Command::CheckExercise { exercise } => print_json(&injuries::check_exercise(state, &exercise).await?),
    Command::Pr {
      exercise,
      max_weight,
      notes,
    } => {
      let record = NewPersonalRecord {
        display_name: exercise,
        max_weight,
        notes,
      };
      print_json(&records::save_personal_record(state, record).await?)
    }
    Command::Prs => print_json(&records::list_personal_records(state).await?),
    Command::History { limit } => print_json(&workouts::list_workouts(state, limit).await?),
  }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
  let rendered = serde_json::to_string_pretty(value).map_err(|e| format!("Failed to render output: {}", e))?;
  println!("{}", rendered);
  Ok(())
}
