//! Personal records

use crate::db::{self, AppState};
use crate::models::{NewPersonalRecord, PersonalRecord};

pub async fn save_personal_record(state: &AppState, record: NewPersonalRecord) -> Result<PersonalRecord, String> {
  db::upsert_personal_record(&state.db, &record)
    .await
    .map_err(|e| format!("Failed to save personal record: {}", e))
}

pub async fn list_personal_records(state: &AppState) -> Result<Vec<PersonalRecord>, String> {
  db::list_personal_records(&state.db)
    .await
    .map_err(|e| format!("Failed to fetch personal records: {}", e))
}
