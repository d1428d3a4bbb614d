//! Staff availability models.
//!
//! A staff record covers exactly one shift and carries one of three
//! availability modes. The typed [`Availability`] makes the mode/field
//! invariant unrepresentable once a record is loaded; the flat
//! [`StaffRecord`] is the persisted shape and the only place an inconsistent
//! record can exist.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::intake::Shift;
use crate::schedule::calendar;

/// Availability mode, as selected on the schedule form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvailabilityMode {
    AllDays,
    FixedDate,
    Weekday,
}

impl AvailabilityMode {
    /// Parse a stored mode. Unknown values fall back to `AllDays`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "date" | "fixed_date" | "fixeddate" => Self::FixedDate,
            "weekday" => Self::Weekday,
            _ => Self::AllDays,
        }
    }

    /// Stored mode label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllDays => "all",
            Self::FixedDate => "date",
            Self::Weekday => "weekday",
        }
    }

    fn is_known(value: &str) -> bool {
        matches!(
            value.trim().to_lowercase().as_str(),
            "all" | "all_days" | "alldays" | "date" | "fixed_date" | "fixeddate" | "weekday"
        )
    }
}

/// When a staff member works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// Every day
    AllDays,
    /// One specific calendar date (`YYYY-MM-DD`), never empty
    FixedDate(String),
    /// The same weekday every week
    Weekday(Weekday),
}

impl Availability {
    pub fn mode(&self) -> AvailabilityMode {
        match self {
            Self::AllDays => AvailabilityMode::AllDays,
            Self::FixedDate(_) => AvailabilityMode::FixedDate,
            Self::Weekday(_) => AvailabilityMode::Weekday,
        }
    }

    /// Human-readable description for schedule listings.
    pub fn label(&self) -> String {
        match self {
            Self::AllDays => "Every day".to_string(),
            Self::FixedDate(date) => format!("Date: {}", date),
            Self::Weekday(weekday) => {
                format!("Weekly: {}", calendar::weekday_short_name(*weekday))
            }
        }
    }
}

/// One staff member's work commitment. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StaffRecord", into = "StaffRecord")]
pub struct StaffAvailability {
    pub id: String,
    pub staff_name: String,
    pub role: String,
    pub shift: Shift,
    pub availability: Availability,
    pub created_at: Option<DateTime<Utc>>,
}

impl StaffAvailability {
    /// Display label, e.g. `Dr. A (Vet - Manhã)`.
    pub fn label(&self) -> String {
        format!("{} ({} - {})", self.staff_name, self.role, self.shift)
    }
}

/// Weekday as persisted: a number, or a numeric string from older form data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeekdayValue {
    Index(i64),
    Text(String),
}

impl WeekdayValue {
    pub fn to_weekday(&self) -> Option<Weekday> {
        match self {
            Self::Index(index) => calendar::weekday_from_index(*index),
            Self::Text(text) => text
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(calendar::weekday_from_index),
        }
    }
}

/// Persisted shape of a staff record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffRecord {
    pub id: String,
    pub staff: String,
    #[serde(default)]
    pub role: String,
    pub shift: Shift,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub work_date: Option<String>,
    #[serde(default)]
    pub weekday: Option<WeekdayValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl StaffRecord {
    /// Availability described by this record, or `None` if the mode and its
    /// fields disagree (or the mode is unknown).
    pub fn resolved_availability(&self) -> Option<Availability> {
        let raw_mode = self.availability.as_deref().unwrap_or("all");
        if !AvailabilityMode::is_known(raw_mode) {
            return None;
        }

        match AvailabilityMode::parse(raw_mode) {
            AvailabilityMode::AllDays => Some(Availability::AllDays),
            AvailabilityMode::FixedDate => self
                .work_date
                .as_ref()
                .filter(|date| !date.trim().is_empty())
                .map(|date| Availability::FixedDate(date.clone())),
            AvailabilityMode::Weekday => self
                .weekday
                .as_ref()
                .and_then(WeekdayValue::to_weekday)
                .map(Availability::Weekday),
        }
    }

    /// Whether the record satisfies the mode/field invariant as stored.
    ///
    /// A missing mode counts as inconsistent: it is coerced to `AllDays`.
    pub fn is_consistent(&self) -> bool {
        self.availability.is_some() && self.resolved_availability().is_some()
    }
}

impl From<StaffRecord> for StaffAvailability {
    fn from(record: StaffRecord) -> Self {
        let availability = record
            .resolved_availability()
            .unwrap_or(Availability::AllDays);

        Self {
            id: record.id,
            staff_name: record.staff,
            role: record.role,
            shift: record.shift,
            availability,
            created_at: record.created_at,
        }
    }
}

impl From<StaffAvailability> for StaffRecord {
    fn from(staff: StaffAvailability) -> Self {
        let (work_date, weekday) = match &staff.availability {
            Availability::AllDays => (None, None),
            Availability::FixedDate(date) => (Some(date.clone()), None),
            Availability::Weekday(weekday) => (
                None,
                Some(WeekdayValue::Index(calendar::weekday_index(*weekday) as i64)),
            ),
        };

        Self {
            id: staff.id,
            staff: staff.staff_name,
            role: staff.role,
            shift: staff.shift,
            availability: Some(staff.availability.mode().as_str().to_string()),
            work_date: Some(work_date.unwrap_or_default()),
            weekday,
            created_at: staff.created_at,
        }
    }
}
