pub mod injury;
pub mod location;
pub mod personal_record;
pub mod workout;

pub use injury::{BodyArea, Injury, InjuryRecord, InjurySeverity, InjuryStatus, InjuryUpdate, NewInjury};
pub use location::{venue_name, Location, LocationType};
pub use personal_record::{normalize_exercise_name, NewPersonalRecord, PersonalRecord};
pub use workout::{NewWorkout, Workout, WorkoutRecord};
