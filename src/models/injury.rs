use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Injury Vocabulary
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyArea {
  Shoulder,
  Knee,
  Back,
  Wrist,
  Ankle,
  Hip,
  Neck,
  Elbow,
  /// Anything outside the list above; never drives hard restrictions
  #[serde(other)]
  Custom,
}

impl BodyArea {
  pub const ALL: [BodyArea; 9] = [
    BodyArea::Shoulder,
    BodyArea::Knee,
    BodyArea::Back,
    BodyArea::Wrist,
    BodyArea::Ankle,
    BodyArea::Hip,
    BodyArea::Neck,
    BodyArea::Elbow,
    BodyArea::Custom,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      BodyArea::Shoulder => "shoulder",
      BodyArea::Knee => "knee",
      BodyArea::Back => "back",
      BodyArea::Wrist => "wrist",
      BodyArea::Ankle => "ankle",
      BodyArea::Hip => "hip",
      BodyArea::Neck => "neck",
      BodyArea::Elbow => "elbow",
      BodyArea::Custom => "custom",
    }
  }
}

impl std::fmt::Display for BodyArea {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for BodyArea {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let needle = s.trim().to_lowercase();
    BodyArea::ALL
      .iter()
      .find(|area| area.as_str() == needle)
      .copied()
      .ok_or_else(|| format!("Unknown body area: {}", s))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjurySeverity {
  Mild,
  Moderate,
  Severe,
}

impl InjurySeverity {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Mild => "mild",
      Self::Moderate => "moderate",
      Self::Severe => "severe",
    }
  }
}

impl std::fmt::Display for InjurySeverity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for InjurySeverity {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "mild" => Ok(Self::Mild),
      "moderate" => Ok(Self::Moderate),
      "severe" => Ok(Self::Severe),
      _ => Err(format!("Unknown injury severity: {}", s)),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjuryStatus {
  Active,
  Recovering,
  Resolved,
}

impl InjuryStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Active => "active",
      Self::Recovering => "recovering",
      Self::Resolved => "resolved",
    }
  }

  /// Active and recovering injuries shape training; resolved ones are inert
  pub fn is_current(&self) -> bool {
    matches!(self, Self::Active | Self::Recovering)
  }
}

impl std::fmt::Display for InjuryStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for InjuryStatus {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "active" => Ok(Self::Active),
      "recovering" => Ok(Self::Recovering),
      "resolved" => Ok(Self::Resolved),
      _ => Err(format!("Unknown injury status: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Stored Injuries
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Injury {
  pub id: i64,
  pub body_area: String,
  pub name: String,
  pub severity: String,
  pub status: String,
  pub notes: Option<String>,
  pub start_date: DateTime<Utc>,
  pub end_date: Option<DateTime<Utc>>,
  pub created_at: Option<DateTime<Utc>>,
}

/// For inserting new injuries (without id, created_at)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInjury {
  pub body_area: BodyArea,
  pub name: String,
  pub severity: InjurySeverity,
  pub status: InjuryStatus,
  pub notes: Option<String>,
  pub start_date: DateTime<Utc>,
}

/// Partial edit of a stored injury; `None` keeps the current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InjuryUpdate {
  pub body_area: Option<BodyArea>,
  pub name: Option<String>,
  pub severity: Option<InjurySeverity>,
  pub status: Option<InjuryStatus>,
  pub notes: Option<String>,
  pub end_date: Option<DateTime<Utc>>,
}

/// The slice of an injury the coaching engine reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryRecord {
  pub name: String,
  pub body_area: BodyArea,
  pub severity: InjurySeverity,
  pub status: InjuryStatus,
  pub start_date: DateTime<Utc>,
}

impl Injury {
  /// Typed view of a stored row. Unrecognized values degrade instead of
  /// failing: unknown areas become `custom`, unknown severities `mild`,
  /// unknown statuses `resolved`.
  pub fn to_record(&self) -> InjuryRecord {
    let body_area = self.body_area.parse().unwrap_or_else(|e: String| {
      tracing::warn!(injury_id = self.id, "{}, treating as custom", e);
      BodyArea::Custom
    });
    let severity = self.severity.parse().unwrap_or_else(|e: String| {
      tracing::warn!(injury_id = self.id, "{}, treating as mild", e);
      InjurySeverity::Mild
    });
    let status = self.status.parse().unwrap_or_else(|e: String| {
      tracing::warn!(injury_id = self.id, "{}, treating as resolved", e);
      InjuryStatus::Resolved
    });

    InjuryRecord {
      name: self.name.clone(),
      body_area,
      severity,
      status,
      start_date: self.start_date,
    }
  }
}

impl InjuryRecord {
  pub fn new(name: &str, body_area: BodyArea, severity: InjurySeverity, status: InjuryStatus) -> Self {
    Self {
      name: name.to_string(),
      body_area,
      severity,
      status,
      start_date: Utc::now(),
    }
  }
}
