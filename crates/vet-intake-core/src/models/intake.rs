//! Intake request models: the pending clinical visits in the triage queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Service category counted as surgery on the dashboard.
pub const SURGERY_SERVICE: &str = "Cirurgia";

/// Clinical priority of an intake.
///
/// Stored values that match none of the known labels are kept verbatim in
/// `Unrecognized` so a snapshot round-trips exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Emergency,
    Urgent,
    Routine,
    Unrecognized(String),
}

impl Priority {
    /// Parse a stored or submitted label. Accepts the clinic's Portuguese
    /// labels and the English names, case-insensitively.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "emergência" | "emergencia" | "emergency" => Self::Emergency,
            "urgente" | "urgent" => Self::Urgent,
            "rotina" | "routine" => Self::Routine,
            _ => Self::Unrecognized(value.to_string()),
        }
    }

    /// Stored label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Emergency => "Emergência",
            Self::Urgent => "Urgente",
            Self::Routine => "Rotina",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Triage weight; higher sorts earlier.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Emergency => 3,
            Self::Urgent => 2,
            Self::Routine => 1,
            Self::Unrecognized(_) => 0,
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Work shift, shared by intakes and staff records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Shift {
    Morning,
    Afternoon,
    Night,
    Unrecognized(String),
}

impl Shift {
    /// Parse a stored or submitted label (Portuguese or English).
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "manhã" | "manha" | "morning" => Self::Morning,
            "tarde" | "afternoon" => Self::Afternoon,
            "noite" | "night" => Self::Night,
            _ => Self::Unrecognized(value.to_string()),
        }
    }

    /// Stored label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Morning => "Manhã",
            Self::Afternoon => "Tarde",
            Self::Night => "Noite",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Triage weight; lower sorts earlier. Unknown shifts go after every
    /// known one.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Morning => 1,
            Self::Afternoon => 2,
            Self::Night => 3,
            Self::Unrecognized(_) => 99,
        }
    }
}

impl From<String> for Shift {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Shift> for String {
    fn from(value: Shift) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pending clinical visit. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRequest {
    /// Unique intake ID
    pub id: String,
    /// Owner/client name
    pub tutor: String,
    /// Patient name
    pub pet: String,
    pub priority: Priority,
    /// Service category (free text)
    pub service: String,
    /// Calendar date (`YYYY-MM-DD`); `None` means undated
    #[serde(default, deserialize_with = "empty_as_none")]
    pub date: Option<String>,
    pub shift: Shift,
    /// Staff record this intake is booked with (lookup key, not ownership)
    #[serde(rename = "professionalId", default, deserialize_with = "empty_as_none")]
    pub assigned_staff_id: Option<String>,
    /// Submission time, the final triage tie-breaker
    pub created_at: DateTime<Utc>,
}

impl IntakeRequest {
    /// Date as a plain string, empty when undated.
    pub fn date_str(&self) -> &str {
        self.date.as_deref().unwrap_or("")
    }

    /// Whether this intake falls in the surgery category.
    pub fn is_surgery(&self) -> bool {
        let service = self.service.trim();
        service.eq_ignore_ascii_case(SURGERY_SERVICE) || service.eq_ignore_ascii_case("surgery")
    }
}

/// Deserialize an optional string, folding `""` and `null` into `None`.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_intake(service: &str) -> IntakeRequest {
        IntakeRequest {
            id: "intake-1".into(),
            tutor: "Ana".into(),
            pet: "Rex".into(),
            priority: Priority::Urgent,
            service: service.into(),
            date: Some("2024-05-06".into()),
            shift: Shift::Morning,
            assigned_staff_id: Some("staff-1".into()),
            created_at: "2024-05-01T12:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_priority_parse_labels() {
        assert_eq!(Priority::parse("Emergência"), Priority::Emergency);
        assert_eq!(Priority::parse("urgent"), Priority::Urgent);
        assert_eq!(Priority::parse(" Rotina "), Priority::Routine);
        assert_eq!(
            Priority::parse("Whenever"),
            Priority::Unrecognized("Whenever".into())
        );
    }

    #[test]
    fn test_priority_rank_order() {
        assert!(Priority::Emergency.rank() > Priority::Urgent.rank());
        assert!(Priority::Urgent.rank() > Priority::Routine.rank());
        assert!(Priority::Routine.rank() > Priority::Unrecognized("x".into()).rank());
    }

    #[test]
    fn test_shift_parse_and_rank() {
        assert_eq!(Shift::parse("Manhã"), Shift::Morning);
        assert_eq!(Shift::parse("AFTERNOON"), Shift::Afternoon);
        assert_eq!(Shift::parse("Noite"), Shift::Night);
        assert_eq!(Shift::parse("Madrugada").rank(), 99);
        assert!(Shift::Morning.rank() < Shift::Afternoon.rank());
        assert!(Shift::Afternoon.rank() < Shift::Night.rank());
    }

    #[test]
    fn test_intake_json_shape() {
        let intake = make_intake("Consulta");
        let json = serde_json::to_value(&intake).unwrap();

        assert_eq!(json["professionalId"], "staff-1");
        assert_eq!(json["shift"], "Manhã");
        assert_eq!(json["priority"], "Urgente");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_empty_date_reads_as_undated() {
        let json = r#"{
            "id": "a", "tutor": "Ana", "pet": "Rex", "priority": "Rotina",
            "service": "Consulta", "date": "", "shift": "Tarde",
            "professionalId": "", "createdAt": "2024-05-01T12:00:00.000Z"
        }"#;
        let intake: IntakeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(intake.date, None);
        assert_eq!(intake.assigned_staff_id, None);
        assert_eq!(intake.date_str(), "");
    }

    #[test]
    fn test_is_surgery() {
        assert!(make_intake("Cirurgia").is_surgery());
        assert!(make_intake("surgery").is_surgery());
        assert!(!make_intake("Consulta").is_surgery());
    }
}
