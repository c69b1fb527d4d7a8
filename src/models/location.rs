use serde::{Deserialize, Serialize};

/// Venue categories a suggested workout can be decorated with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
  Studio,
  Box,
  Trail,
}

impl LocationType {
  pub fn as_str(&self) -> &'static str {
    match self {
      LocationType::Studio => "studio",
      LocationType::Box => "box",
      LocationType::Trail => "trail",
    }
  }
}

impl std::str::FromStr for LocationType {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "studio" => Ok(Self::Studio),
      "box" => Ok(Self::Box),
      "trail" => Ok(Self::Trail),
      _ => Err(format!("Unknown location type: {}", s)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Location {
  pub id: String,
  pub name: String,
  pub location_type: String,
}

impl Location {
  pub fn new(id: &str, name: &str, kind: LocationType) -> Self {
    Self {
      id: id.to_string(),
      name: name.to_string(),
      location_type: kind.as_str().to_string(),
    }
  }

  pub fn kind(&self) -> Option<LocationType> {
    self.location_type.parse().ok()
  }
}

/// Name of the first venue of the given type
pub fn venue_name(locations: &[Location], kind: LocationType) -> Option<String> {
  locations
    .iter()
    .find(|l| l.kind() == Some(kind))
    .map(|l| l.name.clone())
}
