//! Form validation and entity construction.
//!
//! Intakes are re-checked against the current roster at the moment they are
//! built, so a selection list built from stale state cannot slip an
//! unavailable staff member through.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::availability::available_staff;
use super::calendar;
use crate::models::{
    Availability, AvailabilityMode, IntakeRequest, Priority, Shift, StaffAvailability,
};

/// Validation errors surfaced to the person filling in a form.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("A date is required for fixed-date availability")]
    MissingWorkDate,

    #[error("A weekday is required for weekly availability")]
    MissingWeekday,

    #[error("Weekday must be between 0 (Sunday) and 6 (Saturday), got {0}")]
    InvalidWeekday(i64),

    #[error("No staff member selected")]
    NoStaffSelected,

    #[error("Staff {staff_id} is not available on {date} ({shift})")]
    StaffUnavailable {
        staff_id: String,
        date: String,
        shift: String,
    },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Identity and time stamped onto a new entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamp {
    pub id: String,
    pub at: DateTime<Utc>,
}

impl Stamp {
    /// Fresh UUID and the current time.
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            at: Utc::now(),
        }
    }
}

impl Default for Stamp {
    fn default() -> Self {
        Self::new()
    }
}

/// Submitted intake form.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeFields {
    pub tutor: String,
    pub pet: String,
    pub priority: Priority,
    pub service: String,
    pub date: Option<String>,
    pub shift: Shift,
    pub assigned_staff_id: Option<String>,
}

/// Submitted schedule form.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffFields {
    pub staff_name: String,
    pub role: String,
    pub shift: Shift,
    pub mode: AvailabilityMode,
    pub work_date: Option<String>,
    pub weekday: Option<i64>,
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn required(value: &str, field: &'static str) -> ValidationResult<String> {
    trimmed(Some(value)).ok_or(ValidationError::MissingField(field))
}

/// Require `staff_id` to be among the staff available for `date`/`shift`.
pub fn validate_assignment(
    roster: &[StaffAvailability],
    date: &str,
    shift: &Shift,
    staff_id: &str,
) -> ValidationResult<()> {
    if available_staff(roster, date, shift)
        .iter()
        .any(|staff| staff.id == staff_id)
    {
        Ok(())
    } else {
        Err(ValidationError::StaffUnavailable {
            staff_id: staff_id.to_string(),
            date: date.to_string(),
            shift: shift.to_string(),
        })
    }
}

/// Validate an intake form against the current roster and build the request.
pub fn validate_and_build_intake(
    fields: IntakeFields,
    roster: &[StaffAvailability],
    stamp: Stamp,
) -> ValidationResult<IntakeRequest> {
    let tutor = required(&fields.tutor, "tutor")?;
    let pet = required(&fields.pet, "pet")?;
    let date = trimmed(fields.date.as_deref());
    let staff_id =
        trimmed(fields.assigned_staff_id.as_deref()).ok_or(ValidationError::NoStaffSelected)?;

    validate_assignment(
        roster,
        date.as_deref().unwrap_or(""),
        &fields.shift,
        &staff_id,
    )?;

    Ok(IntakeRequest {
        id: stamp.id,
        tutor,
        pet,
        priority: fields.priority,
        service: fields.service.trim().to_string(),
        date,
        shift: fields.shift,
        assigned_staff_id: Some(staff_id),
        created_at: stamp.at,
    })
}

/// Validate a schedule form and build the staff record.
pub fn validate_and_build_staff_record(
    fields: StaffFields,
    stamp: Stamp,
) -> ValidationResult<StaffAvailability> {
    let staff_name = required(&fields.staff_name, "staff name")?;

    let availability = match fields.mode {
        AvailabilityMode::AllDays => Availability::AllDays,
        AvailabilityMode::FixedDate => {
            let date = trimmed(fields.work_date.as_deref()).ok_or(ValidationError::MissingWorkDate)?;
            Availability::FixedDate(date)
        }
        AvailabilityMode::Weekday => {
            let index = fields.weekday.ok_or(ValidationError::MissingWeekday)?;
            let weekday =
                calendar::weekday_from_index(index).ok_or(ValidationError::InvalidWeekday(index))?;
            Availability::Weekday(weekday)
        }
    };

    Ok(StaffAvailability {
        id: stamp.id,
        staff_name,
        role: fields.role.trim().to_string(),
        shift: fields.shift,
        availability,
        created_at: Some(stamp.at),
    })
}
